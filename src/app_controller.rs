use anyhow::{anyhow, Context, Result};
use log::{error, warn, info, debug};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use crate::app_config::Config;
use crate::errors::{AppError, SubtitleError};
use crate::file_utils::FileManager;
use crate::subtitle_processor::{FileStats, SubtitleDocument};
use crate::time_shift::{apply_shift, timing_changes, ShiftRequest};

// @module: Application controller for batch subtitle shifting

/// Options for one run, as given on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftOptions {
    /// Milliseconds to shift by
    pub shift_ms: i64,

    /// Index range such as `5-10`
    pub range: Option<String>,

    /// Start of a time window
    pub from: Option<String>,

    /// End of a time window
    pub to: Option<String>,

    /// Explicit output file, single input only
    pub output: Option<PathBuf>,

    /// Directory receiving the shifted files under their original names
    pub outdir: Option<PathBuf>,

    /// Overwrite the input files
    pub in_place: bool,

    /// Print the shifted SRT instead of saving
    pub dry_run: bool,

    /// Print the timing changes instead of saving
    pub diff: bool,
}

impl ShiftOptions {
    /// Reject contradictory option combinations before any file is touched
    pub fn validate(&self, input_count: usize) -> Result<(), AppError> {
        let conflict = |message: &str| -> Result<(), AppError> {
            Err(AppError::Config(message.to_string()))
        };

        if self.range.is_some() && (self.from.is_some() || self.to.is_some()) {
            return conflict("You cannot use -r/--range together with --from or --to");
        }
        if self.from.is_some() != self.to.is_some() {
            return conflict("You must use both --from and --to together");
        }
        if self.in_place && self.output.is_some() {
            return conflict("You cannot use --in-place together with -o/--output");
        }
        if self.in_place && self.outdir.is_some() {
            return conflict("You cannot use --in-place together with --outdir");
        }
        if self.output.is_some() && self.outdir.is_some() {
            return conflict("You cannot use -o/--output together with --outdir");
        }
        if self.dry_run && self.diff {
            return conflict("You cannot use --dry-run together with --diff");
        }
        if self.output.is_some() && input_count > 1 {
            return conflict("-o/--output can only be used with a single input file");
        }
        Ok(())
    }

    /// Build the shift request these options describe
    pub fn shift_request(&self) -> Result<ShiftRequest, SubtitleError> {
        ShiftRequest::from_cli(
            self.shift_ms,
            self.range.as_deref(),
            self.from.as_deref(),
            self.to.as_deref(),
        )
    }

    /// Whether results are printed rather than saved
    pub fn is_preview(&self) -> bool {
        self.dry_run || self.diff
    }
}

/// A file that went through the whole pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    /// Input file
    pub source: PathBuf,

    /// Written file, `None` for previews
    pub output: Option<PathBuf>,

    /// Entry counts of the shifted document
    pub stats: FileStats,
}

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total_files: usize,
    pub successful: Vec<ProcessedFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Main application controller for subtitle shifting
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shift every subtitle file found under `inputs`.
    ///
    /// Files are processed one after another; a failing file is recorded in the
    /// summary and does not stop the batch.
    pub fn run<P: AsRef<Path>>(&self, inputs: &[P], options: &ShiftOptions) -> Result<BatchSummary> {
        options.validate(inputs.len())?;
        let request = options.shift_request()?;

        let files = FileManager::collect_subtitle_files(
            inputs,
            &self.config.extensions,
            self.config.include_hidden,
            self.config.follow_links,
        )?;

        if files.is_empty() {
            warn!("No subtitle files found (extensions: {})", self.config.extensions.join(", "));
            return Ok(BatchSummary::default());
        }
        if options.output.is_some() && files.len() > 1 {
            return Err(anyhow!(
                "-o/--output can only be used with a single input file, found {} files",
                files.len()
            ));
        }

        info!("Shifting {} file(s) by {}", files.len(), request);

        let progress_bar = if files.len() > 1 && !options.is_preview() {
            let progress_bar = ProgressBar::new(files.len() as u64);
            let template_result = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
                .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            progress_bar.set_style(template_result.progress_chars("█▓▒░"));
            progress_bar
        } else {
            ProgressBar::hidden()
        };

        let mut summary = BatchSummary {
            total_files: files.len(),
            ..BatchSummary::default()
        };

        for file in &files {
            progress_bar.set_message(
                file.file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            match self.process_file(file, options, &request) {
                Ok(processed) => summary.successful.push(processed),
                Err(e) => {
                    progress_bar.suspend(|| error!("Error processing file {}: {:#}", file.display(), e));
                    summary.failed.push(FailedFile {
                        path: file.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        if summary.total_files > 1 {
            Self::log_summary(&summary);
        }

        Ok(summary)
    }

    /// Run one file through parse, shift, format and save (or preview)
    pub fn process_file(&self, input: &Path, options: &ShiftOptions, request: &ShiftRequest) -> Result<ProcessedFile> {
        let content = FileManager::read_to_string(input)?;

        let document = SubtitleDocument::from_srt(&content, self.output_target(input, options))
            .with_context(|| format!("Failed to parse subtitle file: {}", input.display()))?;

        let mut shifted = apply_shift(&document, request)
            .with_context(|| format!("Failed to shift subtitle file: {}", input.display()))?;

        debug!(
            "{}: shifted {} of {} entries",
            input.display(),
            shifted.stats.blocks_shifted,
            shifted.stats.blocks_total
        );

        if !options.in_place && options.outdir.is_none() {
            shifted.apply_output_name(&self.config.output_suffix, options.output.is_some())?;
        }

        let mut processed = ProcessedFile {
            source: input.to_path_buf(),
            output: None,
            stats: shifted.stats,
        };

        if options.diff {
            Self::print_diff(&document, &shifted);
            return Ok(processed);
        }

        let output_text = shifted.to_srt()
            .with_context(|| format!("Failed to format subtitle file: {}", input.display()))?;

        if options.dry_run {
            println!("{}", Self::paint("=== Dry Run Preview ===", "1;33"));
            println!("{}", output_text);
            return Ok(processed);
        }

        FileManager::write_to_file(&shifted.file_path, &output_text)?;
        info!("File processed and saved: {}", shifted.file_path.display());

        processed.output = Some(shifted.file_path);
        Ok(processed)
    }

    // @returns: Path the shifted document is named after
    fn output_target(&self, input: &Path, options: &ShiftOptions) -> PathBuf {
        if let Some(output) = &options.output {
            output.clone()
        } else if let Some(outdir) = &options.outdir {
            outdir.join(input.file_name().unwrap_or_default())
        } else {
            input.to_path_buf()
        }
    }

    fn print_diff(before: &SubtitleDocument, after: &SubtitleDocument) {
        println!("{}", Self::paint("===== Diff Preview =====", "1;33"));

        for change in timing_changes(before, after) {
            for line in change.to_string().lines() {
                let painted = if line.starts_with(" -") {
                    Self::paint(line, "31")
                } else if line.starts_with(" +") {
                    Self::paint(line, "32")
                } else {
                    line.to_string()
                };
                println!("{}", painted);
            }
        }
    }

    // @returns: Text wrapped in an ANSI color when stdout is a terminal
    fn paint(text: &str, color: &str) -> String {
        if std::io::stdout().is_terminal() {
            format!("\x1B[{}m{}\x1B[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn log_summary(summary: &BatchSummary) {
        info!("=== Batch Processing Summary ===");
        info!("Total files processed: {}", summary.total_files);
        info!("Successfully processed: {}", summary.successful.len());
        if summary.has_failures() {
            warn!("Failed files: {}", summary.failed.len());
        }

        for file in &summary.successful {
            info!(
                "File: {} (total blocks: {}, blocks shifted: {})",
                file.output.as_deref().unwrap_or(file.source.as_path()).display(),
                file.stats.blocks_total,
                file.stats.blocks_shifted
            );
        }

        for file in &summary.failed {
            error!("  {}: {}", file.path.display(), file.error);
        }
    }
}
