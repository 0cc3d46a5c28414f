//! External rendering of diagram text into an image.

use super::OutputFileFormat;
use crate::error::{ErdError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Executable used when no renderer is configured
pub const DEFAULT_RENDERER: &str = "plantuml";

/// Environment variable PlantUML reads for the maximum image dimension
const LIMIT_SIZE_ENV: &str = "PLANTUML_LIMIT_SIZE";

/// Renders diagram description text to an image file
pub trait Renderer {
    fn render(
        &self,
        source: &str,
        format: OutputFileFormat,
        limit_size: u32,
        output: &Path,
    ) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(
        &self,
        source: &str,
        format: OutputFileFormat,
        limit_size: u32,
        output: &Path,
    ) -> Result<()> {
        (**self).render(source, format, limit_size, output)
    }
}

/// Runs the PlantUML executable in pipe mode.
///
/// The diagram text is written to the child's stdin and its stdout is
/// collected. The output file is written only once the child exits
/// successfully, so a failed run leaves any earlier image untouched. The
/// size ceiling is set only in the child's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantUmlCommand {
    program: String,
}

impl PlantUmlCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for PlantUmlCommand {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

impl Renderer for PlantUmlCommand {
    fn render(
        &self,
        source: &str,
        format: OutputFileFormat,
        limit_size: u32,
        output: &Path,
    ) -> Result<()> {
        debug!(program = %self.program, output = %output.display(), %format, "rendering diagram");

        let mut child = Command::new(&self.program)
            .arg("-pipe")
            .arg(format.plantuml_flag())
            .arg("-charset")
            .arg("UTF-8")
            .env(LIMIT_SIZE_ENV, limit_size.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    ErdError::RendererNotFound {
                        program: self.program.clone(),
                    }
                } else {
                    ErdError::io(&self.program, e)
                }
            })?;

        // Stdin is fed from its own thread while stdout is collected
        let feeder = child.stdin.take().map(|mut stdin| {
            let source = source.to_string();
            thread::spawn(move || stdin.write_all(source.as_bytes()))
        });

        let rendered = child
            .wait_with_output()
            .map_err(|e| ErdError::io(&self.program, e))?;

        if let Some(feeder) = feeder {
            // A child that exits early is reported through its status below
            match feeder.join() {
                Ok(Err(e)) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(ErdError::io(&self.program, e));
                }
                _ => {}
            }
        }

        if !rendered.status.success() {
            return Err(ErdError::RenderFailed {
                program: self.program.clone(),
                status: rendered.status,
            });
        }

        fs::write(output, &rendered.stdout).map_err(|e| ErdError::io(output, e))?;
        Ok(())
    }
}
