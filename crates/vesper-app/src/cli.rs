//! CLI argument definitions for the Vesper assistant.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Vesper — a voice-and-text assistant that runs shell commands for you.
#[derive(Parser, Debug)]
#[command(name = "vesper", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Path to the conversation history file.
    #[arg(long = "history-file")]
    pub history_file: Option<PathBuf>,

    /// Path to the primer prompts file.
    #[arg(long = "prompts")]
    pub prompts: Option<PathBuf>,

    /// Primer to seed a fresh conversation with.
    #[arg(long = "primer")]
    pub primer: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Capture spoken input from the microphone instead of reading stdin.
    #[arg(long = "listen")]
    pub listen: bool,

    /// Print responses instead of speaking them.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VESPER_CONFIG env var > platform default
    /// (~/.vesper/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VESPER_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the history file path.
    ///
    /// Priority: --history-file flag > config file value.
    pub fn resolve_history_file(&self, config_value: &str) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| expand_home(config_value))
    }

    /// Resolve the prompts file path.
    ///
    /// Priority: --prompts flag > config file value.
    pub fn resolve_prompts_file(&self, config_value: &str) -> PathBuf {
        self.prompts
            .clone()
            .unwrap_or_else(|| expand_home(config_value))
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_value: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_value.to_string())
    }
}

/// Expand a leading ~ to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path.starts_with("~/") || path.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&path[2..])
    } else {
        PathBuf::from(path)
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".vesper").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".vesper").join("config.toml");
    }
    PathBuf::from("config.toml")
}
