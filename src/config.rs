//! YAML configuration for diagram generation.
//!
//! Every field is optional in the file; command line flags override
//! whatever the file sets.

use crate::diagram::{OutputFileFormat, DEFAULT_LIMIT_SIZE, DEFAULT_RENDERER, DEFAULT_TITLE};
use crate::error::{ErdError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Diagram settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Diagram title
    pub title: String,
    /// Output path; the extension is replaced per artifact
    pub filename: Option<PathBuf>,
    /// Image format
    pub format: OutputFileFormat,
    /// Also persist the PlantUML text next to the image
    pub generate_plantuml_file: bool,
    /// Render relationships pointing at tables outside the diagram
    pub show_orphan_foreign_keys: bool,
    /// Maximum image dimension in pixels
    pub limit_size: u32,
    /// PlantUML executable
    pub renderer: String,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            filename: None,
            format: OutputFileFormat::default(),
            generate_plantuml_file: false,
            show_orphan_foreign_keys: false,
            limit_size: DEFAULT_LIMIT_SIZE,
            renderer: DEFAULT_RENDERER.to_string(),
        }
    }
}

impl DiagramConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ErdError::io(path, e))?;
        Self::from_yaml(&content).map_err(|source| ErdError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(yaml)
    }

    /// Reject values the renderer cannot use
    pub fn validate(&self) -> Result<()> {
        if self.limit_size == 0 {
            return Err(ErdError::InvalidConfig(
                "limit_size must be a positive number of pixels".to_string(),
            ));
        }
        if self.renderer.trim().is_empty() {
            return Err(ErdError::InvalidConfig(
                "renderer must name an executable".to_string(),
            ));
        }
        Ok(())
    }
}
