//! Vesper core crate - shared error type, configuration, primer catalog,
//! machine information, and conversation transcript types.

pub mod config;
pub mod error;
pub mod prompts;
pub mod sysinfo;
pub mod types;

pub use config::VesperConfig;
pub use error::{Result, VesperError};
pub use prompts::PrimerCatalog;
pub use types::{Role, Turn};
