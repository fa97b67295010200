//! Configuration structures for the statement pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::statement::Field;
use crate::error::{Result, StmtError};

/// Main configuration for the stmtx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Largest document accepted, in bytes.
    pub max_file_size: u64,

    /// Below this many characters of text the document is reported as
    /// likely scanned, protected or corrupt.
    pub min_text_length: usize,

    /// Retry with page-level lopdf extraction when pdf-extract fails.
    pub use_fallback: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            min_text_length: 100,
            use_fallback: true,
        }
    }
}

/// How the record builder chooses among rule sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Run only the generic rule set; always yields a record.
    #[default]
    Generic,
    /// Run issuer-specific rule sets and keep the most complete record.
    Ranked,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Rule set selection mode.
    pub mode: ParseMode,

    /// Minimum number of recovered fields for a ranked result.
    pub min_fields: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::Generic,
            min_fields: 2,
        }
    }
}

impl StmtConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| StmtError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| StmtError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings no document could satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.pdf.max_file_size == 0 {
            return Err(StmtError::Config("pdf.max_file_size must be positive".to_string()));
        }
        if self.extraction.min_fields > Field::ALL.len() {
            return Err(StmtError::Config(format!(
                "extraction.min_fields must be at most {}",
                Field::ALL.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StmtConfig =
            serde_json::from_str(r#"{"extraction": {"mode": "ranked"}}"#).unwrap();
        assert_eq!(config.extraction.mode, ParseMode::Ranked);
        assert_eq!(config.extraction.min_fields, 2);
        assert_eq!(config.pdf.max_file_size, 5 * 1024 * 1024);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StmtConfig::default();
        config.pdf.min_text_length = 42;
        config.save(&path).unwrap();

        let loaded = StmtConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.min_text_length, 42);
        assert_eq!(loaded.extraction.mode, ParseMode::Generic);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{"extraction": {"min_fields": 7}}"#).unwrap();
        let err = StmtConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("min_fields"));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            StmtConfig::from_file(&path),
            Err(StmtError::Config(_))
        ));
    }
}
