mod generate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "ddl-erd")]
#[command(version)]
#[command(about = "Generate entity relationship diagrams from MySQL CREATE TABLE statements", long_about = None)]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a diagram from SHOW CREATE TABLE output
    Generate {
        /// Directory of .sql files (one table per file), or a dump file with --dump
        input: PathBuf,

        /// File name pattern inside the input directory
        #[arg(short, long, default_value = "*.sql", conflicts_with = "dump")]
        pattern: String,

        /// Treat INPUT as a single dump file containing many CREATE TABLE statements
        #[arg(long)]
        dump: bool,

        /// Output file; the extension is replaced by the image format
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Diagram title
        #[arg(long)]
        title: Option<String>,

        /// Image format: png or svg (detected from --output if not specified)
        #[arg(short, long)]
        format: Option<String>,

        /// Also write the PlantUML source next to the image
        #[arg(long)]
        puml: bool,

        /// Draw relationships to tables that are not part of the diagram
        #[arg(long)]
        show_orphans: bool,

        /// Maximum image dimension in pixels
        #[arg(long)]
        limit_size: Option<u32>,

        /// PlantUML executable
        #[arg(long)]
        renderer: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the parsed schema as JSON instead of rendering
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Generate {
            input,
            pattern,
            dump,
            output,
            title,
            format,
            puml,
            show_orphans,
            limit_size,
            renderer,
            config,
            json,
        } => generate::run(generate::GenerateArgs {
            input,
            pattern,
            dump,
            output,
            title,
            format,
            puml,
            show_orphans,
            limit_size,
            renderer,
            config,
            json,
        }),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ddl-erd", &mut io::stdout());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
