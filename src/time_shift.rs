/*!
 * Timecode shifting for subtitle documents.
 *
 * A `ShiftRequest` pairs a signed millisecond delta with a `Selection` policy.
 * `apply_shift` never touches the document it is given: it returns a new
 * document whose entries are independent copies, so callers can compare the
 * two versions side by side.
 */

use std::fmt;

use crate::errors::{SubtitleError, TimecodeError};
use crate::subtitle_processor::{FileStats, SubtitleDocument, SubtitleEntry};
use crate::timecode::{format_timecode, parse_timecode};

/// Inclusive range of sequence numbers, `1 <= start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    start: usize,
    end: usize,
}

impl IndexRange {
    pub fn new(start: usize, end: usize) -> Result<Self, SubtitleError> {
        if start < 1 || end < start {
            return Err(SubtitleError::InvalidIndexRange {
                range: format!("{}-{}", start, end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn contains(&self, seq_num: usize) -> bool {
        (self.start..=self.end).contains(&seq_num)
    }
}

/// Inclusive time window in ms, `0 <= from_ms < to_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    from_ms: i64,
    to_ms: i64,
}

impl TimeWindow {
    pub fn new(from_ms: i64, to_ms: i64) -> Result<Self, SubtitleError> {
        if from_ms < 0 || from_ms >= to_ms {
            return Err(SubtitleError::InvalidTimeRange {
                from: describe_ms(from_ms),
                to: describe_ms(to_ms),
            });
        }
        Ok(Self { from_ms, to_ms })
    }

    pub fn from_ms(&self) -> i64 {
        self.from_ms
    }

    pub fn to_ms(&self) -> i64 {
        self.to_ms
    }

    /// Whether the entry lies entirely inside the window
    pub fn contains(&self, entry: &SubtitleEntry) -> bool {
        entry.start_time_ms >= self.from_ms && entry.end_time_ms <= self.to_ms
    }
}

/// Which entries a shift applies to.
///
/// The range and window payloads can only be built through their validating
/// constructors, so a `Selection` never holds an empty or reversed bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every entry
    #[default]
    All,

    /// Entries whose sequence number lies in the range
    IndexRange(IndexRange),

    /// Entries lying entirely inside the window
    TimeWindow(TimeWindow),
}

impl Selection {
    /// Build an index range, requiring `1 <= start <= end`
    pub fn index_range(start: usize, end: usize) -> Result<Self, SubtitleError> {
        IndexRange::new(start, end).map(Self::IndexRange)
    }

    /// Build a time window, requiring `0 <= from_ms < to_ms`
    pub fn time_window(from_ms: i64, to_ms: i64) -> Result<Self, SubtitleError> {
        TimeWindow::new(from_ms, to_ms).map(Self::TimeWindow)
    }

    /// Parse an index range written as `<start>-<end>`, e.g. `5-10`
    pub fn parse_index_range(range: &str) -> Result<Self, SubtitleError> {
        let invalid = || SubtitleError::InvalidIndexRange { range: range.to_string() };

        let (start, end) = range.split_once('-').ok_or_else(invalid)?;
        let start = parse_index(start).ok_or_else(invalid)?;
        let end = parse_index(end).ok_or_else(invalid)?;

        Self::index_range(start, end).map_err(|_| invalid())
    }

    /// Parse a time window from two `HH:MM:SS,mmm` timecodes
    pub fn parse_time_window(from: &str, to: &str) -> Result<Self, SubtitleError> {
        let from_ms = parse_timecode(from)?;
        let to_ms = parse_timecode(to)?;

        Self::time_window(from_ms, to_ms).map_err(|_| SubtitleError::InvalidTimeRange {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Whether `entry` is selected. Both bounds are inclusive.
    pub fn matches(&self, entry: &SubtitleEntry) -> bool {
        match self {
            Self::All => true,
            Self::IndexRange(range) => range.contains(entry.seq_num),
            Self::TimeWindow(window) => window.contains(entry),
        }
    }
}

fn parse_index(text: &str) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

// @returns: Timecode text, or the raw count when it has no timecode form
fn describe_ms(ms: i64) -> String {
    format_timecode(ms).unwrap_or_else(|_| format!("{} ms", ms))
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all entries"),
            Self::IndexRange(range) => write!(f, "indices {}-{}", range.start, range.end),
            Self::TimeWindow(window) => write!(
                f,
                "time range {} to {}",
                describe_ms(window.from_ms),
                describe_ms(window.to_ms)
            ),
        }
    }
}

/// A signed offset plus the entries it applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftRequest {
    /// Milliseconds to add, negative to move subtitles earlier
    pub delta_ms: i64,

    /// Entries to shift
    pub selection: Selection,
}

impl ShiftRequest {
    /// Shift every entry by `delta_ms`
    pub fn new(delta_ms: i64) -> Self {
        Self {
            delta_ms,
            selection: Selection::All,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Build a request from command line strings.
    ///
    /// `range` is an index range such as `5-10`; `from` and `to` are timecodes
    /// that must be given together. A range and a time window exclude each other.
    pub fn from_cli(
        delta_ms: i64,
        range: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Self, SubtitleError> {
        let selection = match (range, from, to) {
            (None, None, None) => Selection::All,
            (Some(range), None, None) => Selection::parse_index_range(range)?,
            (None, Some(from), Some(to)) => Selection::parse_time_window(from, to)?,
            (Some(_), _, _) => return Err(SubtitleError::ConflictingSelection),
            (None, _, _) => return Err(SubtitleError::IncompleteTimeWindow),
        };

        Ok(Self::new(delta_ms).with_selection(selection))
    }
}

impl fmt::Display for ShiftRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.delta_ms)?;
        if self.selection != Selection::All {
            write!(f, " for {}", self.selection)?;
        }
        Ok(())
    }
}

/// Return a copy of `entry` with both times moved by `delta_ms`.
///
/// Only the start time is checked against zero. The end time is stored as is,
/// even below zero, and such an entry fails later when it is formatted.
pub fn shift_entry(entry: &SubtitleEntry, delta_ms: i64) -> Result<SubtitleEntry, SubtitleError> {
    let start = offset(entry.start_time_ms, delta_ms)?;
    if start < 0 {
        return Err(SubtitleError::NegativeResultingTime {
            index: entry.seq_num,
            start_ms: start,
        });
    }

    Ok(SubtitleEntry {
        seq_num: entry.seq_num,
        start_time_ms: start,
        end_time_ms: offset(entry.end_time_ms, delta_ms)?,
        lines: entry.lines.clone(),
    })
}

fn offset(ms: i64, delta_ms: i64) -> Result<i64, TimecodeError> {
    ms.checked_add(delta_ms)
        .ok_or_else(|| TimecodeError::OutOfRange(i128::from(ms) + i128::from(delta_ms)))
}

/// Apply `request` to `document`, returning the shifted copy.
///
/// The operation is all or nothing: on error no shifted document exists and
/// the input is unchanged. `stats.blocks_shifted` counts the selected entries.
pub fn apply_shift(
    document: &SubtitleDocument,
    request: &ShiftRequest,
) -> Result<SubtitleDocument, SubtitleError> {
    let mut entries = Vec::with_capacity(document.entries.len());
    let mut blocks_shifted = 0;

    for entry in &document.entries {
        if request.selection.matches(entry) {
            entries.push(shift_entry(entry, request.delta_ms)?);
            blocks_shifted += 1;
        } else {
            entries.push(entry.clone());
        }
    }

    Ok(SubtitleDocument {
        entries,
        file_path: document.file_path.clone(),
        file_name: document.file_name.clone(),
        file_dir: document.file_dir.clone(),
        extension: document.extension.clone(),
        stats: FileStats {
            blocks_total: document.stats.blocks_total,
            blocks_shifted,
        },
    })
}

/// Timing of one entry before and after a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingChange {
    pub seq_num: usize,
    pub old_start_ms: i64,
    pub old_end_ms: i64,
    pub new_start_ms: i64,
    pub new_end_ms: i64,
}

impl fmt::Display for TimingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Index {}:", self.seq_num)?;
        writeln!(f, " - {} --> {}", describe_ms(self.old_start_ms), describe_ms(self.old_end_ms))?;
        write!(f, " + {} --> {}", describe_ms(self.new_start_ms), describe_ms(self.new_end_ms))
    }
}

/// List entries whose start or end time differs between two versions of a
/// document, pairing entries by position.
pub fn timing_changes(before: &SubtitleDocument, after: &SubtitleDocument) -> Vec<TimingChange> {
    before
        .entries
        .iter()
        .zip(&after.entries)
        .filter(|(old, new)| {
            old.start_time_ms != new.start_time_ms || old.end_time_ms != new.end_time_ms
        })
        .map(|(old, new)| TimingChange {
            seq_num: old.seq_num,
            old_start_ms: old.start_time_ms,
            old_end_ms: old.end_time_ms,
            new_start_ms: new.start_time_ms,
            new_end_ms: new.end_time_ms,
        })
        .collect()
}
