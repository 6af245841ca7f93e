use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use picasa_embed::config::{Config, Dialect};
use picasa_embed::embed::{validate_directories, Embedder};
use picasa_embed::export::{export_report, ReportFormat};
use picasa_embed::logging;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DialectArg {
    Exiftool,
    Exiv2,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Exiftool => Dialect::ExifTool,
            DialectArg::Exiv2 => Dialect::Exiv2,
        }
    }
}

/// Embed Picasa tags from .picasa.ini files into image files.
///
/// .picasa.ini files are searched for in every directory of the input tree.
/// Images are copied (or converted) into the same layout under the output
/// directory and their captions, keywords and face regions are written there.
#[derive(Parser, Debug)]
#[command(name = "picasa-embed", version)]
struct Cli {
    /// Directory tree holding the images and .picasa.ini files
    input: Option<PathBuf>,

    /// Directory the tagged images are written to
    output: Option<PathBuf>,

    /// Path to config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// Tag writer to target
    #[arg(long, value_enum)]
    dialect: Option<DialectArg>,

    /// Convert images to this format (extension), e.g. png
    #[arg(long)]
    format: Option<String>,

    /// Process directories in parallel
    #[arg(long, action = ArgAction::SetTrue)]
    parallel: bool,

    /// Log the commands instead of running them
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Write a run report (.json or .csv)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log to a daily file in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_dir.clone())?;

    if cli.init_config {
        let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
        Config::default().save_to(&config_path)?;
        println!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    let (Some(input), Some(output)) = (cli.input.as_ref(), cli.output.as_ref()) else {
        anyhow::bail!("Usage: picasa-embed <INPUT> <OUTPUT>, see --help");
    };

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(dialect) = cli.dialect {
        config.embed.dialect = dialect.into();
    }
    if let Some(format) = cli.format {
        config.output.format = Some(format).filter(|f| !f.is_empty());
    }
    if cli.parallel {
        config.scanner.parallel = true;
    }

    validate_directories(input, output)?;

    let report_format = cli
        .report
        .as_deref()
        .map(ReportFormat::from_path)
        .transpose()?;

    info!(
        "Embedding tags with {} from {} into {}",
        config.embed.dialect.name(),
        input.display(),
        output.display()
    );

    let summary = Embedder::new(config, cli.dry_run).run(input, output)?;

    info!(
        "Done: {} directories ({} skipped), {} images, {} tagged, {} warnings",
        summary.directories,
        summary.directories_skipped,
        summary.images,
        summary.tagged,
        summary.warnings()
    );

    if let (Some(path), Some(format)) = (cli.report.as_ref(), report_format) {
        export_report(&summary, path, format)
            .with_context(|| format!("Failed to write {} report", format.name()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
