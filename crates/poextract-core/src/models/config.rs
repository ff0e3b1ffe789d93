//! Configuration structures for batch extraction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PoError, Result};
use crate::export::ExportFormat;

/// Main configuration for the poextract pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoConfig {
    /// Input discovery configuration.
    pub scan: ScanConfig,

    /// Dataset export configuration.
    pub export: ExportConfig,

    /// Batch behaviour.
    pub batch: BatchConfig,
}

/// How documents are discovered in a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Deepest subfolder level visited below the root (0 = root only).
    pub max_depth: usize,

    /// Files whose lowercase name contains this marker are skipped.
    pub skip_marker: String,

    /// Also accept `.txt` files holding previously extracted text.
    pub include_text_files: bool,

    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            skip_marker: "preuve_".to_string(),
            include_text_files: false,
            follow_links: false,
        }
    }
}

/// Where and how the dataset is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output format.
    pub format: ExportFormat,

    /// Output file stem, written next to the scanned folder.
    pub output_file_name: String,

    /// Save the extracted text of each PDF as a `.txt` file.
    pub save_text: bool,

    /// Folder (relative to the scanned root) receiving text dumps.
    pub text_dir_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            output_file_name: "resultats_extraction".to_string(),
            save_text: false,
            text_dir_name: "txt_extraits".to_string(),
        }
    }
}

/// Batch error policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Record unreadable documents and keep going.
    pub continue_on_error: bool,
}

impl PoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PoError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| PoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Output file name including the format extension.
    pub fn output_file(&self) -> String {
        format!(
            "{}.{}",
            self.export.output_file_name,
            self.export.format.extension()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoConfig::default();
        assert_eq!(config.scan.max_depth, 1);
        assert_eq!(config.scan.skip_marker, "preuve_");
        assert_eq!(config.output_file(), "resultats_extraction.csv");
        assert!(!config.batch.continue_on_error);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PoConfig =
            serde_json::from_str(r#"{"export": {"format": "xlsx", "save_text": true}}"#).unwrap();
        assert_eq!(config.export.format, ExportFormat::Xlsx);
        assert!(config.export.save_text);
        assert_eq!(config.export.text_dir_name, "txt_extraits");
        assert_eq!(config.output_file(), "resultats_extraction.xlsx");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PoConfig::default();
        config.scan.max_depth = 3;
        config.save(&path).unwrap();

        let loaded = PoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.scan.max_depth, 3);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"scan": {"max_depth": "deep"}}"#).unwrap();

        let err = PoConfig::from_file(&path).unwrap_err();
        assert!(matches!(&err, PoError::Config(msg) if msg.contains("config.json")));

        assert!(matches!(
            PoConfig::from_file(&dir.path().join("missing.json")),
            Err(PoError::Io(_))
        ));
    }
}
