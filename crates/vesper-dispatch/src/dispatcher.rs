//! The feedback loop: execute actions, report command outcomes back to the
//! model, and dispatch its corrected follow-up plan.
//!
//! Runs as an iterative trampoline rather than call-stack recursion: each
//! command outcome that triggers a round-trip replaces the current action
//! list and bumps the branch counter. A branch counter past the configured
//! bound fails closed before any feedback message is sent.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vesper_session::ConversationSession;

use crate::error::DispatchError;
use crate::parser::ResponseParser;
use crate::runner::{sanitize_command, CommandRunner};
use crate::speaker::Speaker;
use crate::types::{Action, CONCLUSION_ROLE};

/// Drives the execute → report-back → re-dispatch cycle.
pub struct Dispatcher {
    parser: ResponseParser,
    speaker: Arc<dyn Speaker>,
    runner: Arc<dyn CommandRunner>,
    max_branches: u32,
}

impl Dispatcher {
    pub fn new(
        speaker: Arc<dyn Speaker>,
        runner: Arc<dyn CommandRunner>,
        max_branches: u32,
    ) -> Self {
        Self {
            parser: ResponseParser::new(),
            speaker,
            runner,
            max_branches,
        }
    }

    /// Dispatch an action list, following command outcomes through as many
    /// feedback branches as the model needs, up to the configured bound.
    ///
    /// A whole logical turn runs on the caller's task; feedback branches are
    /// not scheduled concurrently.
    pub async fn dispatch(
        &self,
        session: &mut ConversationSession,
        actions: Vec<Action>,
    ) -> Result<(), DispatchError> {
        let mut pending = actions;
        let mut branch: u32 = 1;

        'branches: loop {
            let current = std::mem::take(&mut pending);
            for action in current {
                match action {
                    Action::Script { message, role } => {
                        self.handle_script(&message, &role, branch).await;
                    }
                    Action::Command { command } => {
                        if let Some(feedback) = self.handle_command(&command, branch).await? {
                            if branch >= self.max_branches {
                                warn!(
                                    branch,
                                    limit = self.max_branches,
                                    "Feedback branch limit reached; abandoning follow-up"
                                );
                                return Err(DispatchError::BranchLimitExceeded {
                                    limit: self.max_branches,
                                });
                            }
                            // A command outcome short-circuits the rest of
                            // this response; the model's follow-up is a
                            // self-contained corrected plan.
                            let reply = session.send_turn(&feedback).await?;
                            pending = self.parser.parse(&reply)?;
                            branch += 1;
                            debug!(branch, actions = pending.len(), "Feedback branch started");
                            continue 'branches;
                        }
                    }
                }
            }
            return Ok(());
        }
    }

    /// Speak a script line, suppressing nested sign-offs.
    async fn handle_script(&self, message: &str, role: &str, branch: u32) {
        if role == CONCLUSION_ROLE && branch > 1 {
            debug!(branch, "Suppressing conclusion inside feedback branch");
            return;
        }
        info!(role = %role, "Speaking script line");
        if let Err(e) = self.speaker.speak(message).await {
            warn!(error = %e, "Failed to speak");
        }
    }

    /// Execute one command. Returns the feedback message to send when the
    /// outcome requires a model round-trip, `None` to continue in place.
    async fn handle_command(
        &self,
        command: &str,
        branch: u32,
    ) -> Result<Option<String>, DispatchError> {
        let sanitized = sanitize_command(command);
        info!(branch, command = %sanitized, "Executing command");

        match self.runner.run(&sanitized).await {
            Err(e) => {
                warn!(error = %e, "Command could not be started");
                Ok(Some(failure_feedback(&format!(
                    "failed to execute command: {}",
                    e
                ))))
            }
            Ok(out) if !out.success => {
                warn!(output = %out.output, "Command failed");
                let detail = if out.output.is_empty() {
                    "command exited with a failure status".to_string()
                } else {
                    out.output
                };
                Ok(Some(failure_feedback(&detail)))
            }
            Ok(out) if out.output.is_empty() => {
                debug!("Command succeeded with no output");
                Ok(None)
            }
            Ok(out) => {
                debug!(len = out.output.len(), "Command succeeded with output");
                Ok(Some(success_feedback(&out.output)))
            }
        }
    }
}

/// Feedback message for a failed command, embedding the error and any
/// partial output.
fn failure_feedback(detail: &str) -> String {
    format!(
        "Command failed: {}. Please analyze the error and generate a new solution.",
        detail
    )
}

/// Feedback message for a successful command with output.
fn success_feedback(output: &str) -> String {
    format!(
        "The command succeeded with the following output:\n{}\nPlease interpret this output and respond to the user.",
        output
    )
}
