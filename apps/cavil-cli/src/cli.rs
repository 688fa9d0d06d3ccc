//! Command-line argument parsing and dispatch for `cavil`.
//!
//! The CLI is a thin front end: it turns flags into a [`Settings`], reads
//! the named files, hands them to [`cavil_driver::run`], and renders
//! whatever comes back. All analysis logic lives in `cavil-checks` and
//! `cavil-driver`; this crate only wires flags to behavior.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cavil_checks::Settings;
use cavil_diagnostics::{DedupStrategy, ErrorLogger, RenderMode, RenderOptions, Severity, StdLogger};
use cavil_driver::AnalysisUnit;

/// Static analysis for C-family source files.
#[derive(Parser)]
#[command(name = "cavil")]
#[command(about = "Static analysis for C-family source files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Source files to analyze.
    pub files: Vec<PathBuf>,

    /// Number of worker threads. 1 runs fully sequentially.
    #[arg(short = 'j', long, default_value_t = 1)]
    pub jobs: u32,

    /// Enable style checks (redundant conditions, inefficient size checks).
    #[arg(long)]
    pub enable_style: bool,

    /// Also run checks with a higher false-positive rate.
    #[arg(long)]
    pub inconclusive: bool,

    /// Print progress and per-file informational output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress informational output, printing only diagnostics.
    #[arg(long)]
    pub errors_only: bool,

    /// Emit XML instead of plain text.
    #[arg(long)]
    pub xml: bool,

    /// XML schema version (only meaningful with `--xml`).
    #[arg(long, default_value_t = 1)]
    pub xml_version: u8,

    /// Exit with this code if any diagnostic is an error, instead of 0.
    #[arg(long, default_value_t = 0)]
    pub exit_code: i32,
}

impl Cli {
    fn to_settings(&self) -> Settings {
        Settings {
            jobs: self.jobs,
            verbose: self.verbose,
            check_coding_style: self.enable_style,
            inconclusive: self.inconclusive,
            errors_only: self.errors_only,
            exit_code: self.exit_code,
            xml: self.xml,
            xml_version: self.xml_version,
            ..Settings::default()
        }
    }
}

/// Parses `std::env::args`, runs the analysis, and returns the process's
/// exit code. A non-zero code is either `1` (a file could not be read) or
/// `settings.exit_code` if at least one `Error`-severity diagnostic fired
/// and `exit_code` is non-zero.
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();
    let settings = cli.to_settings();

    let mut units = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match fs::read_to_string(path) {
            Ok(source) => units.push(AnalysisUnit::new(path.display().to_string(), source)),
            Err(err) => {
                eprintln!("cavil: cannot read {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    let messages = cavil_driver::run(&units, &settings);

    let mode = if settings.xml {
        RenderMode::Xml { version: settings.xml_version }
    } else {
        RenderMode::PlainText
    };
    let options = RenderOptions { mode, verbose: settings.verbose };
    let mut logger = StdLogger::new(io::stdout(), options, DedupStrategy::RenderedString, settings.errors_only);

    if settings.xml {
        println!("{}", cavil_diagnostics::xml::header(settings.xml_version));
    }

    let mut saw_error = false;
    for message in &messages {
        saw_error |= message.severity == Severity::Error;
        logger.report_error(message);
    }
    let _ = io::stdout().flush();

    if settings.xml {
        println!("{}", cavil_diagnostics::xml::footer());
    }

    if saw_error && settings.exit_code != 0 {
        ExitCode::from(settings.exit_code as u8)
    } else {
        ExitCode::SUCCESS
    }
}
