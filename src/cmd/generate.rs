//! Generate command implementation.

use anyhow::{bail, Context, Result};
use ddl_erd::config::DiagramConfig;
use ddl_erd::diagram::{OutputFileFormat, PlantUmlProducer};
use ddl_erd::generator::Generator;
use ddl_erd::parser::MySqlRegexParser;
use ddl_erd::schema::Table;
use ddl_erd::source::{DumpSource, FileSource};
use std::path::PathBuf;

/// Options of the generate command
pub struct GenerateArgs {
    pub input: PathBuf,
    pub pattern: String,
    pub dump: bool,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub format: Option<String>,
    pub puml: bool,
    pub show_orphans: bool,
    pub limit_size: Option<u32>,
    pub renderer: Option<String>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

type LineGroups = Box<dyn Iterator<Item = ddl_erd::Result<Vec<String>>>>;

/// Run the generate command
pub fn run(args: GenerateArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    let source: LineGroups = if args.dump {
        if !args.input.is_file() {
            bail!("dump file does not exist: {}", args.input.display());
        }
        Box::new(DumpSource::open(&args.input)?)
    } else {
        Box::new(FileSource::new(&args.input, Some(&args.pattern))?)
    };

    let producer = PlantUmlProducer::from_config(&config)?;
    let generator = Generator::new(MySqlRegexParser::new(), producer);

    if args.json {
        let mut tables = Vec::new();
        for group in source {
            tables.extend(generator.to_table(&group?));
        }
        if tables.is_empty() {
            bail!("no CREATE TABLE statements found in {}", args.input.display());
        }
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    eprintln!(
        "Generating ERD: {} [format: {}]",
        args.input.display(),
        config.format
    );

    let tables = generator
        .generate(source)
        .with_context(|| format!("failed to generate diagram from {}", args.input.display()))?;

    let producer = generator.producer();
    if let Some(path) = producer
        .plantuml_path()
        .filter(|_| config.generate_plantuml_file)
    {
        eprintln!("PlantUML source written to: {}", path.display());
    }
    if let Some(path) = producer.image_path() {
        eprintln!("ERD written to: {}", path.display());
    }

    print_summary(&tables, producer.rendered_relationships(&tables));
    Ok(())
}

/// Merge the config file (if any) with command line flags
fn resolve_config(args: &GenerateArgs) -> Result<DiagramConfig> {
    let mut config = match args.config {
        Some(ref path) => DiagramConfig::load(path)?,
        None => DiagramConfig::default(),
    };

    if let Some(ref title) = args.title {
        config.title = title.clone();
    }
    if let Some(ref output) = args.output {
        config.filename = Some(output.clone());
    }

    if let Some(ref f) = args.format {
        config.format = f.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
    } else if let Some(format) = args
        .output
        .as_ref()
        .and_then(|out| out.extension())
        .and_then(|e| e.to_str())
        .and_then(OutputFileFormat::from_extension)
    {
        config.format = format;
    }

    if args.puml {
        config.generate_plantuml_file = true;
    }
    if args.show_orphans {
        config.show_orphan_foreign_keys = true;
    }
    if let Some(limit_size) = args.limit_size {
        config.limit_size = limit_size;
    }
    if let Some(ref renderer) = args.renderer {
        config.renderer = renderer.clone();
    }

    Ok(config)
}

fn print_summary(tables: &[Table], relationships: usize) {
    let columns: usize = tables.iter().map(|t| t.columns.len()).sum();
    let foreign_keys: usize = tables.iter().map(|t| t.foreign_keys.len()).sum();
    eprintln!(
        "\nERD: {} tables, {} columns, {} relationships",
        tables.len(),
        columns,
        relationships
    );
    if foreign_keys > relationships {
        eprintln!(
            "  {} foreign keys to tables outside the diagram omitted (use --show-orphans)",
            foreign_keys - relationships
        );
    }
}
