use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use crate::errors::{SubtitleError, TimecodeError};
use crate::timecode::{format_timecode, parse_timecode};

// @module: Subtitle document model, SRT parsing and SRT formatting

// @const: Entry separator, one or more empty lines in either line-ending style.
// Lines holding only spaces or tabs are caption text, not separators.
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n(?:\r?\n)+").unwrap()
});

const TIMECODE_ARROW: &str = " --> ";

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number as written in the source
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: i64,

    // @field: End time in ms, may fall below zero after a shift
    pub end_time_ms: i64,

    // @field: Caption text, one item per line
    pub lines: Vec<String>,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: i64, end_time_ms: i64, lines: Vec<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            lines,
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> Result<String, TimecodeError> {
        format_timecode(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> Result<String, TimecodeError> {
        format_timecode(self.end_time_ms)
    }

    /// The timecode line, `<start> --> <end>`
    pub fn timecode_line(&self) -> Result<String, TimecodeError> {
        Ok(format!("{}{}{}", self.format_start_time()?, TIMECODE_ARROW, self.format_end_time()?))
    }

    /// Caption text with lines joined by `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Format the entry as one SRT block without a trailing newline
    pub fn format_block(&self) -> Result<String, TimecodeError> {
        Ok(format!("{}\n{}\n{}", self.seq_num, self.timecode_line()?, self.text()))
    }
}

/// Entry counts for the last shift applied to a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Number of entries found at parse time
    pub blocks_total: usize,

    /// Number of entries moved by the last shift
    pub blocks_shifted: usize,
}

/// Parsed subtitle file with the path metadata used for output naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleDocument {
    /// Entries in source order
    pub entries: Vec<SubtitleEntry>,

    /// Target path the document will be written to
    pub file_path: PathBuf,

    /// File name without extension
    pub file_name: String,

    /// Directory part of the target path
    pub file_dir: PathBuf,

    /// Lowercased extension including the leading dot, or empty
    pub extension: String,

    /// Entry counts
    pub stats: FileStats,
}

impl SubtitleDocument {
    /// Create a document from entries and a target path.
    ///
    /// The path is only split into its components, never touched on disk.
    pub fn new<P: AsRef<Path>>(entries: Vec<SubtitleEntry>, path: P) -> Self {
        let path = path.as_ref();

        let file_dir = match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::new(),
        };
        let file_name = path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        let stats = FileStats {
            blocks_total: entries.len(),
            blocks_shifted: 0,
        };

        SubtitleDocument {
            entries,
            file_path: path.to_path_buf(),
            file_name,
            file_dir,
            extension,
            stats,
        }
    }

    /// Parse SRT text into a document targeting `path`
    pub fn from_srt<P: AsRef<Path>>(content: &str, path: P) -> Result<Self, SubtitleError> {
        let entries = Self::parse_srt_string(content)?;
        Ok(Self::new(entries, path))
    }

    /// Parse SRT format string into subtitle entries.
    ///
    /// Fails on the first malformed block; entries keep their source order and
    /// sequence numbers.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let blocks: Vec<&str> = BLOCK_SEPARATOR
            .split(content)
            .map(|block| block.trim_matches(|c: char| c == '\r' || c == '\n'))
            .filter(|block| !block.trim().is_empty())
            .collect();

        if blocks.is_empty() {
            return Err(SubtitleError::EmptyDocument);
        }

        blocks.into_iter().map(Self::parse_entry).collect()
    }

    fn parse_entry(block: &str) -> Result<SubtitleEntry, SubtitleError> {
        let lines: Vec<&str> = block.lines().collect();

        let [index_line, timecode_line, text_lines @ ..] = lines.as_slice() else {
            return Err(SubtitleError::MalformedEntry { entry: block.to_string() });
        };
        if text_lines.is_empty() {
            return Err(SubtitleError::MalformedEntry { entry: block.to_string() });
        }

        let seq_num = Self::parse_index(index_line)?;
        let (start_time_ms, end_time_ms) = Self::parse_timecode_line(timecode_line)?;
        let lines = text_lines.iter().map(|line| line.to_string()).collect();

        Ok(SubtitleEntry::new(seq_num, start_time_ms, end_time_ms, lines))
    }

    fn parse_index(line: &str) -> Result<usize, SubtitleError> {
        let trimmed = line.trim();
        let invalid = || SubtitleError::InvalidIndex { value: line.to_string() };

        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match trimmed.parse::<usize>() {
            Ok(0) | Err(_) => Err(invalid()),
            Ok(index) => Ok(index),
        }
    }

    /// Parse a `<start> --> <end>` line into a pair of millisecond values
    pub fn parse_timecode_line(line: &str) -> Result<(i64, i64), SubtitleError> {
        let sides: Vec<&str> = line.trim().split(TIMECODE_ARROW).collect();

        if sides.len() != 2 || sides.iter().any(|side| side.trim().is_empty()) {
            let source = TimecodeError::invalid(line, "expected <start> --> <end>");
            return Err(Self::timecode_line_error(line, source));
        }

        let start = parse_timecode(sides[0].trim())
            .map_err(|source| Self::timecode_line_error(line, source))?;
        let end = parse_timecode(sides[1].trim())
            .map_err(|source| Self::timecode_line_error(line, source))?;

        Ok((start, end))
    }

    fn timecode_line_error(line: &str, source: TimecodeError) -> SubtitleError {
        SubtitleError::InvalidTimecodeLine {
            line: line.to_string(),
            source,
        }
    }

    /// Rename the target path for a shifted copy.
    ///
    /// Unless `manual_name` is set, `.<suffix>` is appended to the file name
    /// (`movie.srt` becomes `movie.shifted.srt`).
    pub fn apply_output_name(&mut self, suffix: &str, manual_name: bool) -> Result<(), SubtitleError> {
        if self.file_dir.as_os_str().is_empty() {
            return Err(SubtitleError::InvalidOutputPath("directory"));
        }
        if self.extension.is_empty() {
            return Err(SubtitleError::InvalidOutputPath("extension"));
        }

        if !manual_name {
            self.file_name = format!("{}.{}", self.file_name, suffix);
        }
        self.file_path = self.file_dir.join(format!("{}{}", self.file_name, self.extension));

        Ok(())
    }

    /// Serialize the document as SRT text
    pub fn to_srt(&self) -> Result<String, TimecodeError> {
        format_srt(&self.entries)
    }
}

/// Serialize entries as SRT: blocks separated by exactly one blank line, no
/// leading or trailing blank line. No entries yields an empty string.
///
/// Fails with `TimecodeError::Negative` when a shift left a time below zero.
pub fn format_srt(entries: &[SubtitleEntry]) -> Result<String, TimecodeError> {
    let blocks = entries
        .iter()
        .map(SubtitleEntry::format_block)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(blocks.join("\n\n"))
}
