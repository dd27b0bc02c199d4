/*!
 * SRT timecode codec.
 *
 * Converts between the textual `HH:MM:SS,mmm` form and a signed millisecond
 * count. Only non-negative counts have a textual form. Hours are not capped:
 * values past 99 hours simply render with more digits.
 */

use crate::errors::TimecodeError;

// @module: Timecode parsing and formatting

pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_SECOND: i64 = 1_000;

const EXPECTED_FORMAT: &str = "expected format: HH:MM:SS,mmm";

/// Parse a `HH:MM:SS,mmm` timecode into milliseconds.
///
/// A milliseconds field shorter than three digits is a decimal fraction of the
/// second, so `00:00:01,5` is 1500 ms.
pub fn parse_timecode(text: &str) -> Result<i64, TimecodeError> {
    if text.starts_with('-') {
        return Err(TimecodeError::invalid(
            text,
            "negative timecodes are not supported",
        ));
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
        return Err(TimecodeError::invalid(text, EXPECTED_FORMAT));
    }

    let (seconds_part, millis_part) = parts[2]
        .split_once(',')
        .filter(|(secs, millis)| !secs.is_empty() && !millis.is_empty())
        .ok_or_else(|| TimecodeError::invalid(text, EXPECTED_FORMAT))?;

    let hours = parse_field(parts[0], text)?;
    let minutes = parse_field(parts[1], text)?;
    let seconds = parse_field(seconds_part, text)?;

    if minutes >= 60 || seconds >= 60 {
        return Err(TimecodeError::invalid(
            text,
            "minutes and seconds must be between 00 and 59",
        ));
    }
    if millis_part.len() > 3 {
        return Err(TimecodeError::invalid(
            text,
            "milliseconds take at most three digits",
        ));
    }
    let millis = parse_field(&format!("{:0<3}", millis_part), text)?;

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|total| total.checked_add(minutes * MS_PER_MINUTE))
        .and_then(|total| total.checked_add(seconds * MS_PER_SECOND))
        .and_then(|total| total.checked_add(millis))
        .ok_or_else(|| TimecodeError::invalid(text, "timecode is out of range"))
}

/// Format a millisecond count in SRT format (HH:MM:SS,mmm), rejecting
/// negative values.
pub fn format_timecode(ms: i64) -> Result<String, TimecodeError> {
    if ms < 0 {
        return Err(TimecodeError::Negative(ms));
    }

    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    Ok(format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis))
}

fn parse_field(field: &str, text: &str) -> Result<i64, TimecodeError> {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimecodeError::invalid(text, EXPECTED_FORMAT));
    }
    field
        .parse()
        .map_err(|_| TimecodeError::invalid(text, "timecode is out of range"))
}
