//! # xsd-cli
//!
//! Command-line interface for merging XSD schemas and flattening them into
//! layer tables.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xsd_export::{ExportConfig, ExportFormat, Orientation};
use xsd_pipeline::{Pipeline, PipelineConfig, PipelineResult};
use xsd_schema::{SchemaLoader, SchemaSummary};

#[derive(Debug, Parser)]
#[command(name = "xsdflat")]
#[command(about = "Merge XSD schemas and flatten complex types into layer tables")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge a master schema with its imports into one document
    Merge(MergeArgs),
    /// Merge a schema and export its layers as XLSX or CSV
    Extract(ExtractArgs),
    /// Run a pipeline configuration file
    Run(RunArgs),
    /// Print construct counts of one schema document
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Master schema file
    master: PathBuf,

    /// Imported schema, in merge order; repeatable. Without any, the
    /// master's schemaLocation references are followed.
    #[arg(short, long = "import")]
    imports: Vec<PathBuf>,

    /// Output file for the merged schema
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Master schema file; imports are followed via schemaLocation
    schema: PathBuf,

    /// Layer file (YAML or JSON); defaults to the CESOP layers
    #[arg(short, long)]
    layers: Option<PathBuf>,

    /// Output workbook (xlsx) or directory (csv)
    #[arg(short, long)]
    output: PathBuf,

    /// Output format; inferred from the output path when omitted
    #[arg(short, long)]
    format: Option<CliFormat>,

    /// Table layout
    #[arg(long, default_value = "rows")]
    orientation: CliOrientation,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Pipeline configuration file (YAML)
    #[arg(short, long)]
    config: PathBuf,
}

#[derive(Debug, Args)]
struct SummaryArgs {
    /// Schema file
    schema: PathBuf,
}

/// CLI-specific output format with clap value parsing
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliFormat {
    Xlsx,
    Csv,
}

impl From<CliFormat> for ExportFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Xlsx => Self::Xlsx,
            CliFormat::Csv => Self::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOrientation {
    Rows,
    Columns,
}

impl From<CliOrientation> for Orientation {
    fn from(orientation: CliOrientation) -> Self {
        match orientation {
            CliOrientation::Rows => Self::Rows,
            CliOrientation::Columns => Self::Columns,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins unless `-v` is given; the default level is `info`
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> anyhow::Result<()> {
    debug!(?command, "Dispatching command");
    match command {
        Command::Merge(args) => merge(&args),
        Command::Extract(args) => extract(args),
        Command::Run(args) => run_config(&args.config),
        Command::Summary(args) => summary(&args.schema),
    }
}

fn merge(args: &MergeArgs) -> anyhow::Result<()> {
    let loader = SchemaLoader::new();
    let (mut master, imports) = if args.imports.is_empty() {
        loader.load_with_imports(&args.master)?
    } else {
        (loader.load_from_file(&args.master)?, loader.load_all(&args.imports)?)
    };

    let report = xsd_schema::merge(&mut master, &imports)?;
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    xsd_schema::write_to_file(&master, &args.output)?;

    println!(
        "Merged {} import(s), {} complex type(s), into {}",
        report.documents,
        report.merged_types.len(),
        args.output.display()
    );
    Ok(())
}

fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    let mut config = PipelineConfig::new(args.schema)
        .with_tables_output(args.output)
        .with_export_config(ExportConfig::new().orientation(args.orientation.into()));
    if let Some(layers) = args.layers {
        config = config.with_layer_file(layers);
    }
    if let Some(format) = args.format {
        config = config.with_format(format.into());
    }

    let result = Pipeline::new(config).run()?;
    report(&result);
    Ok(())
}

fn run_config(path: &Path) -> anyhow::Result<()> {
    let config = PipelineConfig::load_from_file(path)?;
    let result = Pipeline::new(config).run()?;
    report(&result);
    Ok(())
}

fn summary(path: &Path) -> anyhow::Result<()> {
    let document = SchemaLoader::new().load_from_file(path)?;
    let summary = SchemaSummary::of(&document)?;
    println!("{}", document.source_name());
    println!("  elements:      {}", summary.elements);
    println!("  complex types: {}", summary.complex_types);
    println!("  simple types:  {}", summary.simple_types);
    println!("  imports:       {}", summary.imports);
    println!("  nodes:         {}", summary.total_nodes);
    println!("  max depth:     {}", summary.max_depth);
    Ok(())
}

fn report(result: &PipelineResult) {
    for diagnostic in result.warnings() {
        eprintln!("warning: {diagnostic}");
    }
    for table in &result.tables {
        println!("{}: {} column(s)", table.name, table.len());
    }
    for path in &result.written {
        println!("wrote {}", path.display());
    }
}
