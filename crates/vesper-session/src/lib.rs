//! Vesper session crate - conversation history persistence and the session
//! object that drives the LLM transport.

pub mod error;
pub mod history;
pub mod session;

pub use error::SessionError;
pub use history::HistoryStore;
pub use session::ConversationSession;
