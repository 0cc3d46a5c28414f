//! Error types shared by the generator, diagram producer and sources.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors raised while assembling or emitting a diagram.
///
/// Lines that do not match a parser pattern are never errors; they surface as
/// `None` from the [`SyntaxParser`](crate::parser::SyntaxParser) methods.
#[derive(Debug, thiserror::Error)]
pub enum ErdError {
    /// Diagram generation was requested for zero tables.
    #[error("unable to convert an empty table list to a diagram")]
    EmptyTableList,

    /// An output artifact was requested but no filename is configured.
    #[error("a filename is required to generate a .{extension} file")]
    MissingFilename {
        /// Extension of the artifact that needed the filename.
        extension: &'static str,
    },

    /// Configuration value outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendering executable could not be started.
    #[error("renderer '{program}' not found, install PlantUML or pass --renderer")]
    RendererNotFound { program: String },

    /// The rendering executable ran but reported failure.
    #[error("renderer '{program}' failed with status: {status}")]
    RenderFailed { program: String, status: ExitStatus },

    /// A source directory is missing or not a directory.
    #[error("source directory does not exist: {0}")]
    InvalidDirectory(PathBuf),

    /// A file glob could not be compiled.
    #[error("invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A YAML configuration file could not be parsed.
    #[error("failed to parse config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

impl ErdError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ErdError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ErdError>;
