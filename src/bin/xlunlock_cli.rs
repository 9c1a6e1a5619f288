//! CLI tool for xlunlock - strips sheet and workbook protection from a file
//!
//! Usage:
//!   xlunlock_cli Book1.xlsx                 # writes Book1_unprotected.xlsx if protected
//!   xlunlock_cli Book1.xlsx -o open.xlsx    # always writes open.xlsx
//!   xlunlock_cli Book1.xlsx --dry-run --json

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::{LevelFilter, Metadata, Record};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use xlunlock::host::{is_supported_file_name, SUPPORTED_EXTENSIONS};
use xlunlock::naming::DEFAULT_SUFFIX;
use xlunlock::{remove_protection_with, UnprotectOptions, UnprotectReport};

#[derive(Parser)]
#[command(name = "xlunlock_cli")]
#[command(about = "Remove sheet and workbook protection from Excel workbooks", long_about = None)]
#[command(version)]
struct Cli {
    /// Workbook to unprotect (.xlsx, .xlsm)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the result (default: derived name next to INPUT)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Report what would be removed without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Suffix for the derived output name
    #[arg(long, value_name = "S", default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Leave <sheetProtection> in place
    #[arg(long)]
    keep_sheet_protection: bool,

    /// Leave <workbookProtection> in place
    #[arg(long)]
    keep_workbook_protection: bool,

    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    input: String,
    output: Option<String>,
    changed: bool,
    report: &'a UnprotectReport,
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    // Only fails if a logger is already installed
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file_name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", cli.input.display()))?;
    if !is_supported_file_name(&file_name) {
        bail!(
            "Unsupported file type: {file_name} (expected one of {})",
            SUPPORTED_EXTENSIONS.join(", ")
        );
    }

    let data =
        fs::read(&cli.input).with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let options = UnprotectOptions {
        sheet_protection: !cli.keep_sheet_protection,
        workbook_protection: !cli.keep_workbook_protection,
        output_suffix: cli.suffix.clone(),
    };
    let result = remove_protection_with(&data, &file_name, &options)
        .with_context(|| format!("Failed to unprotect {}", cli.input.display()))?;
    let changed = result.changed();

    let destination = match (&cli.output, changed) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(sibling(&cli.input, &result.file_name)),
        (None, false) => None,
    };

    if !cli.dry_run {
        if let Some(path) = &destination {
            fs::write(path, &result.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    if cli.json {
        let summary = JsonSummary {
            input: cli.input.display().to_string(),
            output: destination.as_ref().map(|p| p.display().to_string()),
            changed,
            report: &result.report,
        };
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print_human(&cli, &result.report, destination.as_deref());
    }

    Ok(())
}

/// `name` placed in the same directory as `input`.
fn sibling(input: &Path, name: &str) -> PathBuf {
    input.with_file_name(name)
}

fn print_human(cli: &Cli, report: &UnprotectReport, destination: Option<&Path>) {
    if report.removed.is_empty() {
        println!(
            "{}: no protection found ({} parts scanned)",
            cli.input.display(),
            report.parts_scanned.len()
        );
    }
    for removed in &report.removed {
        let password = if removed.password_protected {
            " (password)"
        } else {
            ""
        };
        println!(
            "removed {} from {}{password}",
            removed.kind.element_name(),
            removed.part
        );
    }

    match destination {
        Some(path) if cli.dry_run => println!("would write {}", path.display()),
        Some(path) => println!("wrote {}", path.display()),
        None => {}
    }
}
