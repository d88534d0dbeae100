//! Typed actions decoded from a model reply.

use serde::Deserialize;

/// Script role marking the final sign-off line of a response.
pub const CONCLUSION_ROLE: &str = "conclusion";

/// A single instruction decoded from the model's reply.
///
/// Dispatch order is the decode order, which is the order the model emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Speak a line to the user.
    Script { message: String, role: String },
    /// Run a shell command.
    Command { command: String },
}

/// Wire payload of a `"script"` record.
#[derive(Debug, Deserialize)]
pub struct ScriptPayload {
    pub message: String,
    pub role: String,
}

/// Wire payload of a `"command"` record.
#[derive(Debug, Deserialize)]
pub struct CommandPayload {
    pub command: String,
}
