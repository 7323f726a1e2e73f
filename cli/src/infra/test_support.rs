//! Scripted `CommandRunner` shared by adapter tests.

use std::cell::RefCell;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::CommandRunner;

/// Replays queued outputs in order and records every invocation as
/// `"program arg arg ..."`.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: RefCell<Vec<Output>>,
    pub calls: RefCell<Vec<String>>,
    pub timeouts: RefCell<Vec<Duration>>,
}

impl ScriptedRunner {
    pub fn new(mut replies: Vec<Output>) -> Self {
        replies.reverse();
        Self {
            replies: RefCell::new(replies),
            ..Self::default()
        }
    }

    pub fn call(&self, i: usize) -> String {
        self.calls.borrow()[i].clone()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, Duration::ZERO).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.borrow_mut().push(line);
        self.timeouts.borrow_mut().push(timeout);
        self.replies
            .borrow_mut()
            .pop()
            .ok_or_else(|| anyhow::anyhow!("no scripted reply for {program}"))
    }
}
