// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use log::{LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subshift::app_config::{self, Config};
use subshift::app_controller::{Controller, ShiftOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for subshift
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ShiftArgs {
    /// Subtitle files or directories to process
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Amount of time to shift, in milliseconds (negative moves subtitles earlier)
    #[arg(short, long, value_name = "MS", allow_hyphen_values = true, required = true)]
    shift: Option<i64>,

    /// Apply the shift only to a subtitle index range (e.g. 5-10)
    #[arg(short, long, value_name = "START-END")]
    range: Option<String>,

    /// Apply the shift to subtitles starting at or after this time (e.g. 00:01:23,456)
    #[arg(long, value_name = "TIME")]
    from: Option<String>,

    /// Apply the shift to subtitles ending at or before this time (e.g. 00:02:00,000)
    #[arg(long, value_name = "TIME")]
    to: Option<String>,

    /// Path for the output file (single input only)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Directory for the shifted files, keeping their names
    #[arg(long, value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Modify the files in place (overwrites the originals)
    #[arg(long)]
    in_place: bool,

    /// Preview the shifted subtitles without saving
    #[arg(long)]
    dry_run: bool,

    /// Show the timecode changes without saving
    #[arg(long)]
    diff: bool,

    /// Also process hidden files and directories
    #[arg(long)]
    include_hidden: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "subshift.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subshift - shift timecodes in SRT subtitle files
#[derive(Parser, Debug)]
#[command(name = "subshift")]
#[command(version)]
#[command(about = "Shift timecodes in SRT subtitle files")]
#[command(long_about = "subshift moves the timecodes of SRT subtitle files by a fixed number of milliseconds.

EXAMPLES:
    subshift movie.srt -s 500                              # Writes movie.shifted.srt
    subshift movie.srt -s -1200 --in-place                 # Move everything 1.2s earlier
    subshift movie.srt -s 800 -r 10-25                     # Only entries 10 to 25
    subshift movie.srt -s 800 --from 00:01:00,000 --to 00:02:00,000
    subshift movie.srt -s 500 --diff                       # Show the changes only
    subshift season1/ -s 250 --outdir fixed/               # Process a whole directory
    subshift completions bash > subshift.bash              # Generate bash completions

CONFIGURATION:
    Settings are read from subshift.json when it exists. You can specify a
    different file with --config-path.")]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    shift: ShiftArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN", "1;33"),
            Level::Info => ("INFO", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} [{}] {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subshift", &mut std::io::stdout());
            Ok(())
        }
        None => run_shift(cli.shift),
    }
}

fn run_shift(args: ShiftArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &args.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.level_filter());
    }

    let mut config = Config::load_or_default(&args.config_path)?;

    // Override config with CLI options if provided
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone().into();
    }
    if args.include_hidden {
        config.include_hidden = true;
    }

    config.validate()
        .context("Configuration validation failed")?;
    log::set_max_level(config.log_level.level_filter());

    let shift_ms = args.shift
        .ok_or_else(|| anyhow!("--shift is required"))?;

    let options = ShiftOptions {
        shift_ms,
        range: args.range,
        from: args.from,
        to: args.to,
        output: args.output,
        outdir: args.outdir,
        in_place: args.in_place,
        dry_run: args.dry_run,
        diff: args.diff,
    };

    let controller = Controller::with_config(config)?;
    let summary = controller.run(&args.inputs, &options)?;

    if summary.has_failures() {
        return Err(anyhow!(
            "{} of {} file(s) could not be processed",
            summary.failed.len(),
            summary.total_files
        ));
    }

    Ok(())
}
