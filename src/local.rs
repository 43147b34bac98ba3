//! Local command execution.
//!
//! `CommandRunner` is what the vagrant connector shells out through.
//! `LocalShell` spawns `sh -c <cmd>`; `MockRunner` answers from canned
//! per-command responses and records what was asked of it.

use crate::error::CommandError;
use log::debug;
use std::collections::HashMap;
use std::process::Command;
use std::sync::{Mutex, PoisonError};

pub trait CommandRunner: Send + Sync {
    /// Runs `command` and returns its stdout split into lines.
    fn run(&self, command: &str) -> Result<Vec<String>, CommandError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalShell;

impl CommandRunner for LocalShell {
    fn run(&self, command: &str) -> Result<Vec<String>, CommandError> {
        debug!("Running local command: {command}");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                command: command.to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(String::from)
            .collect())
    }
}

/// Test double keyed by the exact command string, so answers do not depend on
/// the order concurrent callers reach it in.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, Result<String, String>>,
    commands: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, command: &str, stdout: &str) -> Self {
        self.responses
            .insert(command.to_string(), Ok(stdout.to_string()));
        self
    }

    pub fn with_failure(mut self, command: &str, stderr: &str) -> Self {
        self.responses
            .insert(command.to_string(), Err(stderr.to_string()));
        self
    }

    pub fn executed_commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str) -> Result<Vec<String>, CommandError> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.to_string());

        match self.responses.get(command) {
            Some(Ok(stdout)) => Ok(stdout.lines().map(String::from).collect()),
            Some(Err(stderr)) => Err(CommandError::Failed {
                command: command.to_string(),
                status: 1,
                stderr: stderr.clone(),
            }),
            None => Err(CommandError::Failed {
                command: command.to_string(),
                status: 127,
                stderr: String::from("command not found"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_shell_splits_stdout_into_lines() {
        let lines = LocalShell.run("printf 'one\\ntwo\\n\\nthree\\n'").unwrap();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn test_local_shell_reports_exit_status() {
        let err = LocalShell.run("echo nope >&2; exit 3").unwrap_err();
        match err {
            CommandError::Failed { status, stderr, .. } => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mock_runner_records_commands() {
        let runner = MockRunner::new()
            .with_output("echo hello", "hello")
            .with_output("echo world", "world");

        assert_eq!(runner.run("echo hello").unwrap(), vec!["hello"]);
        assert_eq!(runner.run("echo world").unwrap(), vec!["world"]);
        assert_eq!(runner.executed_commands(), vec!["echo hello", "echo world"]);
    }

    #[test]
    fn test_mock_runner_failures() {
        let runner = MockRunner::new().with_failure("vagrant status", "boom");

        assert!(matches!(
            runner.run("vagrant status"),
            Err(CommandError::Failed { status: 1, .. })
        ));
        assert!(matches!(
            runner.run("unknown"),
            Err(CommandError::Failed { status: 127, .. })
        ));
    }
}
