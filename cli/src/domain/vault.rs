//! Vault verification steps run on the provisioned host.
//!
//! The command strings must match what the image installs exactly.

use crate::domain::error::HarnessError;

pub const VAULT_INIT_SCRIPT: &str = "/etc/vault.d/scripts/vault_init.sh";
pub const VAULT_UNSEAL_SCRIPT: &str = "/etc/vault.d/scripts/vault_unseal.sh";
pub const VAULT_TOKEN_PATH: &str = "/etc/vault.d/.vault-token";
pub const VAULT_ADDR: &str = "http://127.0.0.1:8200";
pub const LOGIN_SUCCESS_MARKER: &str = "Success! You are now authenticated.";

/// The three remote checks, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStep {
    Init,
    Unseal,
    Login,
}

impl VerifyStep {
    pub const ALL: [Self; 3] = [Self::Init, Self::Unseal, Self::Login];

    /// Shell command executed over SSH.
    #[must_use]
    pub fn command(self) -> String {
        match self {
            Self::Init => VAULT_INIT_SCRIPT.to_string(),
            Self::Unseal => VAULT_UNSEAL_SCRIPT.to_string(),
            Self::Login => {
                format!("VAULT_ADDR='{VAULT_ADDR}' vault login $(sudo cat {VAULT_TOKEN_PATH})")
            }
        }
    }

    /// Short name used in log lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Init => "vault_init.sh",
            Self::Unseal => "vault_unseal.sh",
            Self::Login => "vault login",
        }
    }

    /// Assert on the combined output of a command that exited zero.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnexpectedOutput`] when the output does not
    /// match what the step requires.
    pub fn check_output(self, output: &str) -> Result<(), HarnessError> {
        match self {
            Self::Init if !output.trim().is_empty() => Err(HarnessError::UnexpectedOutput {
                label: self.label(),
                want: "''".to_string(),
                got: output.to_string(),
            }),
            Self::Login if !output.contains(LOGIN_SUCCESS_MARKER) => {
                Err(HarnessError::UnexpectedOutput {
                    label: self.label(),
                    want: format!("'{LOGIN_SUCCESS_MARKER}'"),
                    got: output.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}
