//! Shell command execution.
//!
//! Commands run via `sh -c` with combined stdout/stderr capture and no
//! sandboxing (a known, documented gap). Comma-stripping mirrors the modeled
//! behavior: a heuristic against naive prompt-injected argument lists, not a
//! security boundary.

use async_trait::async_trait;
use tracing::debug;

/// Remove comma characters before execution.
pub fn sanitize_command(command: &str) -> String {
    command.replace(',', "")
}

/// Outcome of one command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited successfully.
    pub success: bool,
    /// Combined stdout and stderr, trimmed.
    pub output: String,
}

/// Executes a command string and captures its combined output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command. `Err` means the command could not be started at all;
    /// a command that ran and failed is `Ok` with `success == false`.
    async fn run(&self, command: &str) -> std::io::Result<CommandOutput>;
}

/// Runs commands through `sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> std::io::Result<CommandOutput> {
        debug!(command = %command, "Spawning shell command");
        let out = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .await?;

        let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&out.stderr));

        Ok(CommandOutput {
            success: out.status.success(),
            output: combined.trim().to_string(),
        })
    }
}
