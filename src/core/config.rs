//! Project configuration loaded from `recordkit.toml`.
//!
//! The file is optional. Missing keys fall back to the default layout:
//! records in `docs/records/`, feature designs in `designs/`.

use crate::core::error::RecordkitError;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path};

pub const CONFIG_FILE: &str = "recordkit.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecordkitConfig {
    /// Directory (relative to the project root) holding project-wide records and the index.
    pub docs_dir: String,
    /// Directory (relative to the project root) holding numbered feature designs.
    pub designs_dir: String,
    /// Name of the records folder inside each feature design.
    pub records_dir_name: String,
    /// File name of the index document inside `docs_dir`.
    pub index_name: String,
}

impl Default for RecordkitConfig {
    fn default() -> Self {
        Self {
            docs_dir: "docs/records".to_string(),
            designs_dir: "designs".to_string(),
            records_dir_name: "records".to_string(),
            index_name: "INDEX.md".to_string(),
        }
    }
}

/// Load `recordkit.toml` from the project root.
/// No config file means the defaults (not an error).
pub fn load_config(project_root: &Path) -> Result<RecordkitConfig, RecordkitError> {
    let config_path = project_root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(RecordkitConfig::default());
    }

    let content = fs::read_to_string(&config_path)?;
    let config: RecordkitConfig = toml::from_str(&content)?;
    config.check()?;
    Ok(config)
}

impl RecordkitConfig {
    fn check(&self) -> Result<(), RecordkitError> {
        let fields = [
            ("docs_dir", &self.docs_dir),
            ("designs_dir", &self.designs_dir),
            ("records_dir_name", &self.records_dir_name),
            ("index_name", &self.index_name),
        ];
        for (key, value) in fields {
            if value.trim().is_empty() {
                return Err(RecordkitError::ValidationError(format!(
                    "{} in {} must not be empty",
                    key, CONFIG_FILE
                )));
            }
            if Path::new(value.as_str()).is_absolute() {
                return Err(RecordkitError::PathError(format!(
                    "{} in {} must be relative to the project root: {}",
                    key, CONFIG_FILE, value
                )));
            }
            if Path::new(value.as_str())
                .components()
                .any(|c| c == Component::ParentDir)
            {
                return Err(RecordkitError::PathError(format!(
                    "{} in {} must stay inside the project root (no '..'): {}",
                    key, CONFIG_FILE, value
                )));
            }
        }
        if self.records_dir_name.contains('/') || self.index_name.contains('/') {
            return Err(RecordkitError::PathError(format!(
                "records_dir_name and index_name in {} must be plain names",
                CONFIG_FILE
            )));
        }
        Ok(())
    }
}
