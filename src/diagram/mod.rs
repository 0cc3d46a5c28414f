//! Diagram production from assembled tables.
//!
//! This module provides:
//! - The [`DiagramProducer`] seam consumed by the generator
//! - A PlantUML class-diagram producer
//! - The [`Renderer`] seam that turns diagram text into an image

mod plantuml;
mod render;

pub use plantuml::{PlantUmlProducer, DEFAULT_LIMIT_SIZE, DEFAULT_TITLE};
pub use render::{PlantUmlCommand, Renderer, DEFAULT_RENDERER};

use crate::error::Result;
use crate::schema::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Turns a complete list of tables into a diagram artifact
pub trait DiagramProducer {
    fn generate_diagram(&self, tables: &[Table]) -> Result<()>;
}

impl<D: DiagramProducer + ?Sized> DiagramProducer for &D {
    fn generate_diagram(&self, tables: &[Table]) -> Result<()> {
        (**self).generate_diagram(tables)
    }
}

/// Image format of the rendered diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFileFormat {
    /// Raster output
    #[default]
    Png,
    /// Vector output
    Svg,
}

impl FromStr for OutputFileFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" | "raster" => Ok(OutputFileFormat::Png),
            "svg" | "vector" => Ok(OutputFileFormat::Svg),
            _ => Err(format!(
                "Unknown output format: {}. Valid options: png, svg",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFileFormat::Png => write!(f, "png"),
            OutputFileFormat::Svg => write!(f, "svg"),
        }
    }
}

impl OutputFileFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFileFormat::Png => "png",
            OutputFileFormat::Svg => "svg",
        }
    }

    /// PlantUML command line type flag
    pub fn plantuml_flag(&self) -> &'static str {
        match self {
            OutputFileFormat::Png => "-tpng",
            OutputFileFormat::Svg => "-tsvg",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(OutputFileFormat::Png),
            "svg" => Some(OutputFileFormat::Svg),
            _ => None,
        }
    }
}
