//! PlantUML class-diagram output for ERD diagrams.
//!
//! Each table becomes a `class` block with one `{field}` line per column;
//! foreign keys become `Table::column -- Other::column` links.

use super::{DiagramProducer, OutputFileFormat, PlantUmlCommand, Renderer};
use crate::config::DiagramConfig;
use crate::error::{ErdError, Result};
use crate::schema::{Column, ForeignKey, Table};
use ahash::AHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Title used when none is configured
pub const DEFAULT_TITLE: &str = "Entity Relationship Diagram";

/// Default maximum image dimension in pixels (4096x4096)
pub const DEFAULT_LIMIT_SIZE: u32 = 4096;

const PLANTUML_EXT: &str = "puml";
const START: &str = "@startuml";
const END: &str = "@enduml";
const COLOUR: &str = "#FFAAAA";
const FOREIGN_KEY: &str = "<<FK>>";
const PRIMARY_KEY: &str = "<<PK>>";
const NULL: &str = "null";

/// Produces PlantUML diagram text and renders it through a [`Renderer`]
#[derive(Debug, Clone)]
pub struct PlantUmlProducer<R = PlantUmlCommand> {
    title: String,
    filename: Option<PathBuf>,
    output_format: OutputFileFormat,
    show_orphan_foreign_keys: bool,
    limit_size: u32,
    generate_plantuml_file: bool,
    renderer: R,
}

impl PlantUmlProducer<PlantUmlCommand> {
    /// Create a producer writing `<filename>.png` through the `plantuml`
    /// executable
    pub fn new(title: impl Into<String>, filename: Option<PathBuf>) -> Self {
        Self {
            title: title.into(),
            filename,
            output_format: OutputFileFormat::default(),
            show_orphan_foreign_keys: false,
            limit_size: DEFAULT_LIMIT_SIZE,
            generate_plantuml_file: false,
            renderer: PlantUmlCommand::default(),
        }
    }

    /// Create a producer from a validated configuration
    pub fn from_config(config: &DiagramConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.title.clone(), config.filename.clone())
            .with_format(config.format)
            .with_orphan_foreign_keys(config.show_orphan_foreign_keys)
            .with_limit_size(config.limit_size)
            .with_plantuml_file(config.generate_plantuml_file)
            .with_renderer(PlantUmlCommand::new(config.renderer.clone())))
    }
}

impl<R: Renderer> PlantUmlProducer<R> {
    /// Set the image format
    pub fn with_format(mut self, format: OutputFileFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Render relationships whose referenced table is not in the diagram
    pub fn with_orphan_foreign_keys(mut self, show: bool) -> Self {
        self.show_orphan_foreign_keys = show;
        self
    }

    /// Set the maximum image dimension passed to the renderer
    pub fn with_limit_size(mut self, limit_size: u32) -> Self {
        self.limit_size = limit_size;
        self
    }

    /// Also write the diagram text to `<filename>.puml`
    pub fn with_plantuml_file(mut self, generate: bool) -> Self {
        self.generate_plantuml_file = generate;
        self
    }

    /// Replace the rendering collaborator
    pub fn with_renderer<R2: Renderer>(self, renderer: R2) -> PlantUmlProducer<R2> {
        PlantUmlProducer {
            title: self.title,
            filename: self.filename,
            output_format: self.output_format,
            show_orphan_foreign_keys: self.show_orphan_foreign_keys,
            limit_size: self.limit_size,
            generate_plantuml_file: self.generate_plantuml_file,
            renderer,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Path of the persisted diagram text, if a filename is configured
    pub fn plantuml_path(&self) -> Option<PathBuf> {
        self.filename
            .as_deref()
            .map(|f| artifact_path(f, PLANTUML_EXT))
    }

    /// Path of the rendered image, if a filename is configured
    pub fn image_path(&self) -> Option<PathBuf> {
        self.filename
            .as_deref()
            .map(|f| artifact_path(f, self.output_format.extension()))
    }

    /// Number of relationship lines [`describe`](Self::describe) emits
    /// for `tables`
    pub fn rendered_relationships(&self, tables: &[Table]) -> usize {
        let index = name_index(tables);
        tables
            .iter()
            .flat_map(|t| &t.foreign_keys)
            .filter(|fk| self.should_render(fk, &index))
            .count()
    }

    /// Build the complete diagram text for `tables`
    pub fn describe(&self, tables: &[Table]) -> String {
        let mut output = String::new();
        output.push_str(START);
        output.push('\n');
        output.push_str(&format!("Title: {}\n", self.title));

        for table in tables {
            output.push_str(&table_block(table));
        }

        let index = name_index(tables);

        for table in tables {
            for fk in &table.foreign_keys {
                if self.should_render(fk, &index) {
                    output.push_str(&relationship_line(table, fk));
                    output.push('\n');
                } else {
                    warn!(
                        table = %table.name,
                        column = fk.foreign_key_name.as_deref().unwrap_or(NULL),
                        references = fk.source_table.as_deref().unwrap_or(NULL),
                        "omitting relationship to a table outside the diagram"
                    );
                }
            }
        }
        output.push('\n');

        output.push_str(END);
        output.push('\n');
        output
    }

    fn should_render(&self, fk: &ForeignKey, index: &AHashMap<&str, &Table>) -> bool {
        let known = fk
            .source_table
            .as_deref()
            .is_some_and(|name| index.contains_key(name));
        known || self.show_orphan_foreign_keys
    }

    fn write_plantuml_file(&self, path: &Path, source: &str) -> Result<()> {
        fs::write(path, source).map_err(|e| ErdError::io(path, e))?;
        info!(path = %path.display(), "wrote diagram source");
        Ok(())
    }
}

impl<R: Renderer> DiagramProducer for PlantUmlProducer<R> {
    fn generate_diagram(&self, tables: &[Table]) -> Result<()> {
        if tables.is_empty() {
            return Err(ErdError::EmptyTableList);
        }

        let plantuml_path = if self.generate_plantuml_file {
            Some(self.plantuml_path().ok_or(ErdError::MissingFilename {
                extension: PLANTUML_EXT,
            })?)
        } else {
            None
        };
        let image_path = self.image_path().ok_or(ErdError::MissingFilename {
            extension: self.output_format.extension(),
        })?;

        let source = self.describe(tables);

        match plantuml_path {
            Some(path) => self.write_plantuml_file(&path, &source)?,
            None => debug!(diagram = %source, "generated diagram source"),
        }

        self.renderer
            .render(&source, self.output_format, self.limit_size, &image_path)?;
        info!(path = %image_path.display(), tables = tables.len(), "rendered diagram");
        Ok(())
    }
}

/// Tables by name; the last table wins on duplicate names
fn name_index(tables: &[Table]) -> AHashMap<&str, &Table> {
    tables.iter().map(|t| (t.name.as_str(), t)).collect()
}

/// `filename` with the artifact extension.
///
/// A known artifact extension (`png`, `svg`, `puml`) is replaced; anything
/// else, e.g. `schema.v2`, keeps its name and gets the extension appended.
fn artifact_path(filename: &Path, extension: &str) -> PathBuf {
    let known = filename
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            OutputFileFormat::from_extension(e).is_some() || e.eq_ignore_ascii_case(PLANTUML_EXT)
        });

    if known {
        filename.with_extension(extension)
    } else {
        let mut path = filename.as_os_str().to_os_string();
        path.push(".");
        path.push(extension);
        PathBuf::from(path)
    }
}

/// Class block for one table
pub(crate) fn table_block(table: &Table) -> String {
    let mut block = format!("class {} << (T,{}) >> {{\n", table.name, COLOUR);
    let lines: Vec<String> = table.columns.iter().map(column_line).collect();
    block.push_str(&lines.join("\n"));
    block.push('\n');
    block.push_str("}\n");
    block
}

/// Field line for one column, e.g. `\t{field} <b>id</b> int(11) <<PK>>`
pub(crate) fn column_line(column: &Column) -> String {
    let mut line = format!("\t{{field}} <b>{}</b>", column.name);
    line.push_str(&type_fragment(column));

    if column.foreign {
        line.push(' ');
        line.push_str(FOREIGN_KEY);
    }
    if column.primary {
        line.push(' ');
        line.push_str(PRIMARY_KEY);
    }
    line
}

/// ` type` or ` type(scale)`; empty when the type is unknown
fn type_fragment(column: &Column) -> String {
    match (&column.column_type, &column.scale) {
        (Some(ty), Some(scale)) => format!(" {}({})", ty, scale),
        (Some(ty), None) => format!(" {}", ty),
        (None, _) => String::new(),
    }
}

/// `Table::column -- Other::column`, with `null` for absent parts
pub(crate) fn relationship_line(table: &Table, fk: &ForeignKey) -> String {
    format!(
        "{}::{} -- {}::{}",
        table.name,
        fk.foreign_key_name.as_deref().unwrap_or(NULL),
        fk.source_table.as_deref().unwrap_or(NULL),
        fk.source_column.as_deref().unwrap_or(NULL)
    )
}
