//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use fairsync_core::{
    CsvRecordSource, ImageManifest, NoInputReason, ProgressReporter, RecordSummary, SyncConfig,
    SyncOutcome, SyncReport, build_manifest, list_records, sync_page, write_manifest,
};
use fairsync_shared::{AppConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// fairsync — keep the past-fairs listing in step with the spreadsheet.
#[derive(Parser)]
#[command(
    name = "fairsync",
    version,
    about = "Regenerate the past-fairs section of a static HTML page from CSV data and photo folders.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./fairsync.toml when present).
    #[arg(long, global = true, env = "FAIRSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rewrite the listing section of the document from the records CSV.
    Update {
        /// Records CSV (overrides `paths.records`).
        #[arg(long)]
        records: Option<PathBuf>,

        /// HTML document to rewrite (overrides `paths.document`).
        #[arg(long)]
        document: Option<PathBuf>,

        /// Photo folder root (overrides `media.root`).
        #[arg(long)]
        media_root: Option<PathBuf>,

        /// Report what would change without writing the document.
        #[arg(long)]
        dry_run: bool,

        /// HTML-escape record fields instead of inserting them verbatim.
        #[arg(long)]
        escape: bool,

        /// Report format.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// List records in order with their located photo counts.
    List {
        /// Records CSV (overrides `paths.records`).
        #[arg(long)]
        records: Option<PathBuf>,

        /// Photo folder root (overrides `media.root`).
        #[arg(long)]
        media_root: Option<PathBuf>,

        /// Report format.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Write the JSON image inventory used by the front-end carousel.
    Manifest {
        /// Records CSV (overrides `paths.records`).
        #[arg(long)]
        records: Option<PathBuf>,

        /// Photo folder root (overrides `media.root`).
        #[arg(long)]
        media_root: Option<PathBuf>,

        /// Output file (overrides `paths.manifest`).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the manifest instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default fairsync.toml in the current directory.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so reports on
/// stdout stay machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "fairsync=warn",
        1 => "fairsync=info",
        _ => "fairsync=debug",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Update {
            records,
            document,
            media_root,
            dry_run,
            escape,
            format,
        } => {
            let mut config = resolve_config(cli.config.as_deref())?;
            override_paths(&mut config, records, document, media_root);
            config.render.escape_fields |= escape;
            cmd_update(&config, dry_run, format)
        }
        Command::List {
            records,
            media_root,
            format,
        } => {
            let mut config = resolve_config(cli.config.as_deref())?;
            override_paths(&mut config, records, None, media_root);
            cmd_list(&config, format)
        }
        Command::Manifest {
            records,
            media_root,
            out,
            dry_run,
        } => {
            let mut config = resolve_config(cli.config.as_deref())?;
            override_paths(&mut config, records, None, media_root);
            if let Some(out) = out {
                config.paths.manifest = out;
            }
            cmd_manifest(&config, dry_run)
        }
        Command::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(force),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        },
    }
}

/// Config file from `--config`, else `./fairsync.toml`, else defaults.
fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let config = match explicit {
        Some(path) => load_config_from(path)?,
        None => {
            let cwd = std::env::current_dir().wrap_err("cannot determine working directory")?;
            load_config(&cwd)?
        }
    };
    Ok(config)
}

fn override_paths(
    config: &mut AppConfig,
    records: Option<PathBuf>,
    document: Option<PathBuf>,
    media_root: Option<PathBuf>,
) {
    if let Some(records) = records {
        config.paths.records = records;
    }
    if let Some(document) = document {
        config.paths.document = document;
    }
    if let Some(root) = media_root {
        config.media.root = root;
    }
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

fn cmd_update(config: &AppConfig, dry_run: bool, format: OutputFormat) -> Result<ExitCode> {
    let mut sync_config = SyncConfig::from(config);
    sync_config.dry_run = dry_run;
    let source = CsvRecordSource::new(&config.paths.records);

    info!(
        records = %config.paths.records.display(),
        document = %config.paths.document.display(),
        media_root = %config.media.root.display(),
        dry_run,
        "updating fairs page"
    );

    let reporter = CliProgress::new(format == OutputFormat::Text);
    let report = sync_page(&sync_config, &source, &reporter)?;

    match format {
        OutputFormat::Text => print_update_text(&report, &config.paths.records),
        OutputFormat::Json => print_json(&JsonReport::from(&report))?,
    }

    Ok(ExitCode::from(report.outcome.exit_code()))
}

fn print_update_text(report: &SyncReport, records_path: &Path) {
    let document = report.document.display();

    println!();
    match &report.outcome {
        SyncOutcome::NoInput { reason } => {
            let why = match reason {
                NoInputReason::SourceMissing => "not found",
                NoInputReason::Empty => "has no rows",
            };
            println!("  No fair data: {} {why}.", records_path.display());
            println!("  {document} was left untouched.");
            println!();
            return;
        }
        SyncOutcome::AnchorNotFound => {
            println!("  Warning: could not find the fairs-grid section in {document}.");
            println!("  No changes made.");
        }
        SyncOutcome::AnchorAmbiguous { matches } => {
            println!("  Warning: the fairs-grid section appears {matches} times in {document}.");
            println!("  No changes made.");
        }
        SyncOutcome::Unchanged => {
            println!("  {document} is already up to date.");
        }
        SyncOutcome::Updated { written: true } => {
            println!("  Fairs page updated: {document}");
        }
        SyncOutcome::Updated { written: false } => {
            println!("  Dry run: {document} would be updated.");
        }
    }

    println!();
    print_records(&report.records);
    println!("  Time: {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn cmd_list(config: &AppConfig, format: OutputFormat) -> Result<ExitCode> {
    let source = CsvRecordSource::new(&config.paths.records);
    let Some(records) = list_records(&config.media, &source)? else {
        println!("No fair data: {} not found.", config.paths.records.display());
        return Ok(ExitCode::from(2));
    };

    match format {
        OutputFormat::Text => {
            println!();
            println!("  Fairs found in {}:", config.paths.records.display());
            print_records(&records);
            println!();
        }
        OutputFormat::Json => print_json(&records)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn print_records(records: &[RecordSummary]) {
    for (i, record) in records.iter().enumerate() {
        let photos = match record.asset_count {
            0 => "no photos yet".to_string(),
            1 => "1 photo".to_string(),
            n => format!("{n} photos"),
        };
        println!(
            "  {}. {} - {} at {} ({photos})",
            i + 1,
            record.title,
            record.date,
            record.location
        );
    }
}

// ---------------------------------------------------------------------------
// manifest
// ---------------------------------------------------------------------------

fn cmd_manifest(config: &AppConfig, dry_run: bool) -> Result<ExitCode> {
    let source = CsvRecordSource::new(&config.paths.records);
    let Some(manifest) = build_manifest(&config.media, &source)? else {
        println!("No fair data: {} not found.", config.paths.records.display());
        return Ok(ExitCode::from(2));
    };

    if dry_run {
        print!("{}", manifest.to_json()?);
        return Ok(ExitCode::SUCCESS);
    }

    let path = &config.paths.manifest;
    let written = write_manifest(path, &manifest)?;

    println!();
    if written {
        println!("  Image manifest updated: {}", path.display());
    } else {
        println!("  {} is already up to date.", path.display());
    }
    print_manifest(&manifest);
    println!();
    Ok(ExitCode::SUCCESS)
}

fn print_manifest(manifest: &ImageManifest) {
    for (identifier, images) in &manifest.images {
        println!("  {identifier}: {} images", images.len());
    }
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    outcome: &'a SyncOutcome,
    document: String,
    records: &'a [RecordSummary],
    elapsed_ms: u64,
}

impl<'a> From<&'a SyncReport> for JsonReport<'a> {
    fn from(report: &'a SyncReport) -> Self {
        Self {
            outcome: &report.outcome,
            document: report.document.display().to_string(),
            records: &report.records,
            elapsed_ms: u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new(visible: bool) -> Self {
        if !visible {
            return Self {
                spinner: ProgressBar::hidden(),
            };
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn record_rendered(&self, identifier: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {identifier}"));
    }

    fn done(&self, _report: &SyncReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init(force: bool) -> Result<ExitCode> {
    let cwd = std::env::current_dir().wrap_err("cannot determine working directory")?;
    let path = init_config(&cwd, force)?;
    println!("Config initialized at: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(explicit: Option<&Path>) -> Result<ExitCode> {
    let config = resolve_config(explicit)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}
