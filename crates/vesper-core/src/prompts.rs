//! Primer catalog: named prompt templates used to seed a fresh session.
//!
//! The catalog file is JSON of the form `{"primers": {"Default": "...", ...}}`.
//! The `Default` and `SystemScan` templates must both be present; a missing
//! key is a configuration error raised at startup, never mid-session.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, VesperError};

/// Primer used for an already-established machine.
pub const PRIMER_DEFAULT: &str = "Default";
/// Primer used the first time a history file is created.
pub const PRIMER_SYSTEM_SCAN: &str = "SystemScan";

/// The template names that must resolve before the loop starts.
pub const REQUIRED_PRIMERS: [&str; 2] = [PRIMER_DEFAULT, PRIMER_SYSTEM_SCAN];

/// Mapping from template name to prompt template string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimerCatalog {
    pub primers: HashMap<String, String>,
}

impl PrimerCatalog {
    /// Load the catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VesperError::Config(format!("failed to open prompts file: {}", e)))?;
        let catalog: PrimerCatalog = serde_json::from_str(&content)
            .map_err(|e| VesperError::Config(format!("failed to decode prompts file: {}", e)))?;
        info!(
            path = %path.display(),
            primers = catalog.primers.len(),
            "Primer catalog loaded"
        );
        Ok(catalog)
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Result<&str> {
        self.primers
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| VesperError::Config(format!("primer not found: {}", name)))
    }

    /// Verify that every required template is resolvable.
    pub fn validate(&self) -> Result<()> {
        for name in REQUIRED_PRIMERS {
            if !self.primers.contains_key(name) {
                return Err(VesperError::Config(format!("primer not found: {}", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_catalog() -> PrimerCatalog {
        let mut primers = HashMap::new();
        primers.insert(PRIMER_DEFAULT.to_string(), "You are Vesper.".to_string());
        primers.insert(
            PRIMER_SYSTEM_SCAN.to_string(),
            "Scan the machine.".to_string(),
        );
        PrimerCatalog { primers }
    }

    #[test]
    fn test_get_existing_primer() {
        let catalog = full_catalog();
        assert_eq!(catalog.get("Default").unwrap(), "You are Vesper.");
    }

    #[test]
    fn test_get_missing_primer_is_config_error() {
        let catalog = full_catalog();
        let err = catalog.get("Nope").unwrap_err();
        assert!(matches!(err, VesperError::Config(_)));
        assert!(err.to_string().contains("primer not found: Nope"));
    }

    #[test]
    fn test_validate_full_catalog() {
        assert!(full_catalog().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_system_scan() {
        let mut catalog = full_catalog();
        catalog.primers.remove(PRIMER_SYSTEM_SCAN);
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, VesperError::Config(_)));
        assert!(err.to_string().contains("SystemScan"));
    }

    #[test]
    fn test_validate_empty_catalog() {
        let catalog = PrimerCatalog::default();
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        std::fs::write(
            &path,
            r#"{"primers":{"Default":"hello","SystemScan":"scan"}}"#,
        )
        .unwrap();

        let catalog = PrimerCatalog::load(&path).unwrap();
        assert_eq!(catalog.get("SystemScan").unwrap(), "scan");
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = PrimerCatalog::load(Path::new("/nonexistent/prompts.json")).unwrap_err();
        assert!(matches!(err, VesperError::Config(_)));
        assert!(err.to_string().contains("failed to open prompts file"));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        std::fs::write(&path, "{ broken").unwrap();

        let err = PrimerCatalog::load(&path).unwrap_err();
        assert!(matches!(err, VesperError::Config(_)));
        assert!(err.to_string().contains("failed to decode prompts file"));
    }
}
