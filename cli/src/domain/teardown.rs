//! Registered cleanup actions, released last-in-first-out.

use std::collections::BTreeMap;

use crate::domain::ec2::KeyPair;

/// Input variables handed to `terraform apply` / `terraform destroy`.
pub type TerraformVars = BTreeMap<String, String>;

/// An external resource that must be released at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// A built AMI plus its backing snapshots.
    Image { region: String, image_id: String },
    /// The temporary EC2 key pair.
    KeyPair(KeyPair),
    /// Everything `terraform apply` created.
    Infrastructure { vars: TerraformVars },
}

impl Resource {
    /// Human-readable description for progress and error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Image { region, image_id } => format!("image {image_id} in {region}"),
            Self::KeyPair(kp) => format!("key pair {} in {}", kp.name, kp.region),
            Self::Infrastructure { .. } => "terraform infrastructure".to_string(),
        }
    }
}

/// Stack of resources awaiting release.
///
/// Each registered resource is popped exactly once; `pop` yields them in
/// reverse registration order.
#[derive(Debug, Default)]
pub struct TeardownStack {
    entries: Vec<Resource>,
}

impl TeardownStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resource: Resource) {
        self.entries.push(resource);
    }

    pub fn pop(&mut self) -> Option<Resource> {
        self.entries.pop()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
