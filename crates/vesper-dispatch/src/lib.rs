//! Vesper dispatch crate - the response-dispatch and command-execution
//! feedback loop.
//!
//! Decodes structured model output into typed actions, executes them
//! (speak / run-command), and feeds command outcomes back to the model for
//! another round of actions.

pub mod dispatcher;
pub mod error;
pub mod parser;
pub mod runner;
pub mod speaker;
pub mod types;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, ParseError};
pub use parser::ResponseParser;
pub use runner::{sanitize_command, CommandOutput, CommandRunner, ShellRunner};
pub use speaker::{ConsoleSpeaker, Speaker};
pub use types::{Action, CONCLUSION_ROLE};
