//! Conversation transcript types shared across the workspace.
//!
//! The history file on disk is a JSON array of these records, so the serde
//! shape here *is* the persistence format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a turn in the conversation transcript.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human operator.
    User,
    /// The language model (also used for synthetic priming and feedback turns).
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// One role-tagged message in the conversation transcript.
///
/// A turn is immutable once appended; the transcript order is the append
/// order and is handed to the LLM transport verbatim on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<String>,
}

impl Turn {
    /// Create a user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![text.into()],
        }
    }

    /// Create a model turn with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![text.into()],
        }
    }

    /// All parts joined into one string.
    pub fn text(&self) -> String {
        self.parts.join("")
    }
}
