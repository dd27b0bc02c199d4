use anyhow::{anyhow, Context, Result};
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading and validating the JSON configuration file.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// File extensions picked up when an input is a directory
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether dot-files and dot-directories are processed
    #[serde(default)]
    pub include_hidden: bool,

    /// Whether directory traversal follows symbolic links
    #[serde(default = "default_true")]
    pub follow_links: bool,

    /// Suffix inserted before the extension of shifted copies
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log crate
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![".srt".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_output_suffix() -> String {
    "shifted".to_string()
}

impl Config {
    /// Load the configuration from `path`, or fall back to defaults when the
    /// file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(anyhow!("At least one subtitle extension must be configured"));
        }

        if let Some(ext) = self.extensions.iter().find(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(anyhow!("Invalid subtitle extension: {:?}", ext));
        }

        if self.output_suffix.is_empty() {
            return Err(anyhow!("Output suffix cannot be empty"));
        }

        if self.output_suffix.contains(['/', '\\']) {
            return Err(anyhow!("Output suffix cannot contain path separators: {}", self.output_suffix));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            extensions: default_extensions(),
            include_hidden: false,
            follow_links: default_true(),
            output_suffix: default_output_suffix(),
        }
    }
}
