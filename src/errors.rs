/*!
 * Error types for the subshift application.
 *
 * The parse/shift/format core reports failures through `TimecodeError` and
 * `SubtitleError`. `AppError` wraps them together with the failures of the
 * file and configuration layers. All types use the thiserror crate.
 */

use thiserror::Error;

/// Errors raised by the timecode codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// Text that is not a `HH:MM:SS,mmm` timecode
    #[error("Invalid timecode format: {input} | {reason}")]
    InvalidFormat {
        /// The rejected text
        input: String,
        /// What was wrong with it
        reason: &'static str,
    },

    /// A millisecond value below zero cannot be rendered as a timecode
    #[error("Negative time values are not supported: {0} ms")]
    Negative(i64),

    /// A millisecond value too large to store
    #[error("Time value out of range: {0} ms")]
    OutOfRange(i128),
}

impl TimecodeError {
    pub(crate) fn invalid(input: &str, reason: &'static str) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
            reason,
        }
    }
}

/// Errors that can occur while parsing, shifting or formatting subtitles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// The input holds no non-blank entry block
    #[error("No subtitle entries found")]
    EmptyDocument,

    /// An entry block lacks its index, timecode or text lines
    #[error("Invalid subtitle entry:\n{entry}")]
    MalformedEntry {
        /// The raw block text
        entry: String,
    },

    /// The index line is not a positive integer
    #[error("Invalid subtitle index: {value:?}")]
    InvalidIndex {
        /// The raw index line
        value: String,
    },

    /// The timecode line is not `<start> --> <end>` with two valid timecodes
    #[error("Invalid timecode line: {line}")]
    InvalidTimecodeLine {
        /// The raw timecode line
        line: String,
        /// Codec failure for the offending side
        #[source]
        source: TimecodeError,
    },

    /// A codec failure outside of entry parsing
    #[error(transparent)]
    Timecode(#[from] TimecodeError),

    /// Index range text that is not `<start>-<end>` with 1 <= start <= end
    #[error("Invalid index range: {range} | expected format: <start-end> eg 5-10")]
    InvalidIndexRange {
        /// The rejected range text
        range: String,
    },

    /// A time window whose start is not strictly before its end
    #[error("Invalid time range: {from} - {to} | start time must be before end time")]
    InvalidTimeRange {
        /// Window start as given
        from: String,
        /// Window end as given
        to: String,
    },

    /// Both an index range and a time window were requested
    #[error("An index range cannot be combined with a time range")]
    ConflictingSelection,

    /// Only one bound of a time window was given
    #[error("A time range needs both a start and an end time")]
    IncompleteTimeWindow,

    /// Shifting moved an entry's start time below zero
    #[error("Subtitle start time cannot be negative: entry {index} would start at {start_ms} ms")]
    NegativeResultingTime {
        /// Sequence number of the offending entry
        index: usize,
        /// The start time the shift would have produced
        start_ms: i64,
    },

    /// Path metadata is incomplete for building an output name
    #[error("File does not have a valid {0}")]
    InvalidOutputPath(&'static str),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Invalid configuration or option combination
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<TimecodeError> for AppError {
    fn from(error: TimecodeError) -> Self {
        Self::Subtitle(error.into())
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
