use thiserror::Error;

/// Top-level error type for the Vesper system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for VesperError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VesperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No content generated")]
    NoContent,

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for VesperError {
    fn from(err: toml::de::Error) -> Self {
        VesperError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VesperError {
    fn from(err: toml::ser::Error) -> Self {
        VesperError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VesperError {
    fn from(err: serde_json::Error) -> Self {
        VesperError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Vesper operations.
pub type Result<T> = std::result::Result<T, VesperError>;
