/*!
 * Tests for shift requests, selection policies and the shift engine
 */

use anyhow::Result;
use subshift::errors::{SubtitleError, TimecodeError};
use subshift::time_shift::{apply_shift, shift_entry, timing_changes, IndexRange, Selection, ShiftRequest, TimeWindow};
use crate::common::{mock_document, mock_entry, three_entry_document};

fn starts_and_ends(document: &subshift::SubtitleDocument) -> Vec<(i64, i64)> {
    document
        .entries
        .iter()
        .map(|entry| (entry.start_time_ms, entry.end_time_ms))
        .collect()
}

#[test]
fn test_shift_entry_withPositiveDelta_shouldMoveBothTimes() -> Result<()> {
    let entry = mock_entry(1, 1000, 2000, &["test"]);

    let shifted = shift_entry(&entry, 500)?;

    assert_eq!(shifted.start_time_ms, 1500);
    assert_eq!(shifted.end_time_ms, 2500);
    assert_eq!(shifted.lines, entry.lines);
    assert_eq!(entry.start_time_ms, 1000);

    Ok(())
}

#[test]
fn test_shift_entry_withStartBelowZero_shouldFail() {
    let entry = mock_entry(4, 100, 1000, &["test"]);

    let error = shift_entry(&entry, -200).unwrap_err();

    assert_eq!(error, SubtitleError::NegativeResultingTime { index: 4, start_ms: -100 });
    assert!(error.to_string().contains("Subtitle start time cannot be negative"));
}

#[test]
fn test_shift_entry_withStartReachingZero_shouldSucceed() -> Result<()> {
    let shifted = shift_entry(&mock_entry(1, 200, 900, &["x"]), -200)?;

    assert_eq!(shifted.start_time_ms, 0);
    assert_eq!(shifted.end_time_ms, 700);

    Ok(())
}

#[test]
fn test_shift_entry_withEndGoingNegative_shouldOnlyCheckStart() -> Result<()> {
    // end before start is accepted by the parser
    let entry = mock_entry(1, 5000, 1000, &["x"]);

    let shifted = shift_entry(&entry, -2000)?;

    assert_eq!((shifted.start_time_ms, shifted.end_time_ms), (3000, -1000));
    assert_eq!(shifted.format_block(), Err(TimecodeError::Negative(-1000)));

    Ok(())
}

#[test]
fn test_apply_shift_withEndGoingNegative_shouldSucceedAndFailOnFormat() -> Result<()> {
    let document = mock_document(vec![
        mock_entry(1, 2000, 3000, &["fine"]),
        mock_entry(2, 5000, 1000, &["backwards"]),
    ]);

    let shifted = apply_shift(&document, &ShiftRequest::new(-1000))?;

    assert_eq!(starts_and_ends(&shifted), vec![(1000, 2000), (4000, 0)]);
    assert_eq!(shifted.stats.blocks_shifted, 2);

    let shifted = apply_shift(&document, &ShiftRequest::new(-1001))?;
    let changes = timing_changes(&document, &shifted);

    assert_eq!(changes[1].new_end_ms, -1);
    assert!(changes[1].to_string().ends_with(" + 00:00:03,999 --> -1 ms"));
    assert_eq!(shifted.to_srt(), Err(TimecodeError::Negative(-1)));

    Ok(())
}

#[test]
fn test_shift_entry_withOverflowingDelta_shouldReportOutOfRange() {
    let entry = mock_entry(1, 1000, 2000, &["x"]);

    let error = shift_entry(&entry, i64::MAX).unwrap_err();

    assert!(matches!(error, SubtitleError::Timecode(TimecodeError::OutOfRange(_))));
}

#[test]
fn test_apply_shift_withNoSelection_shouldShiftAllEntries() -> Result<()> {
    let document = three_entry_document();

    let shifted = apply_shift(&document, &ShiftRequest::new(1000))?;

    assert_eq!(starts_and_ends(&shifted), vec![(2000, 3000), (4000, 5000), (6000, 7000)]);
    assert_eq!(shifted.stats.blocks_shifted, 3);
    assert_eq!(shifted.stats.blocks_total, 3);

    Ok(())
}

#[test]
fn test_apply_shift_withIndexRange_shouldShiftOnlySelectedEntries() -> Result<()> {
    let document = three_entry_document();
    let request = ShiftRequest::new(500).with_selection(Selection::index_range(2, 3)?);

    let shifted = apply_shift(&document, &request)?;

    assert_eq!(starts_and_ends(&shifted), vec![(1000, 2000), (3500, 4500), (5500, 6500)]);
    assert_eq!(shifted.stats.blocks_shifted, 2);

    Ok(())
}

#[test]
fn test_apply_shift_withTimeWindow_shouldShiftFullyContainedEntries() -> Result<()> {
    let document = three_entry_document();
    let request = ShiftRequest::new(250).with_selection(Selection::time_window(3000, 6000)?);

    let shifted = apply_shift(&document, &request)?;

    assert_eq!(starts_and_ends(&shifted), vec![(1000, 2000), (3250, 4250), (5250, 6250)]);
    assert_eq!(shifted.stats.blocks_shifted, 2);

    Ok(())
}

#[test]
fn test_apply_shift_withPartialOverlap_shouldLeaveEntryUntouched() -> Result<()> {
    let document = three_entry_document();
    let request = ShiftRequest::new(100).with_selection(Selection::time_window(1500, 5500)?);

    let shifted = apply_shift(&document, &request)?;

    assert_eq!(starts_and_ends(&shifted), vec![(1000, 2000), (3100, 4100), (5000, 6000)]);
    assert_eq!(shifted.stats.blocks_shifted, 1);

    Ok(())
}

#[test]
fn test_apply_shift_withNegativeResult_shouldAbortAndKeepInput() {
    let document = mock_document(vec![
        mock_entry(1, 5000, 6000, &["fine"]),
        mock_entry(2, 100, 900, &["too early"]),
        mock_entry(3, 7000, 8000, &["fine"]),
    ]);
    let before = document.clone();

    let error = apply_shift(&document, &ShiftRequest::new(-500)).unwrap_err();

    assert!(matches!(error, SubtitleError::NegativeResultingTime { index: 2, .. }));
    assert_eq!(document, before);
}

#[test]
fn test_apply_shift_withUnselectedEarlyEntry_shouldNotCheckIt() -> Result<()> {
    let document = mock_document(vec![
        mock_entry(1, 100, 900, &["early"]),
        mock_entry(2, 5000, 6000, &["late"]),
    ]);
    let request = ShiftRequest::new(-1000).with_selection(Selection::index_range(2, 2)?);

    let shifted = apply_shift(&document, &request)?;

    assert_eq!(starts_and_ends(&shifted), vec![(100, 900), (4000, 5000)]);

    Ok(())
}

#[test]
fn test_apply_shift_withRetainedOriginal_shouldNotAlias() -> Result<()> {
    let document = three_entry_document();

    let mut shifted = apply_shift(&document, &ShiftRequest::new(1000))?;
    shifted.entries[0].lines[0].push_str(" edited");

    assert_eq!(document.entries[0].start_time_ms, 1000);
    assert_eq!(document.entries[0].lines, vec!["A"]);
    assert_eq!(document.stats.blocks_shifted, 0);
    assert_eq!(shifted.file_path, document.file_path);

    Ok(())
}

#[test]
fn test_selection_index_range_withBoundaries_shouldBeInclusive() -> Result<()> {
    let selection = Selection::index_range(2, 3)?;

    assert!(!selection.matches(&mock_entry(1, 0, 1, &["x"])));
    assert!(selection.matches(&mock_entry(2, 0, 1, &["x"])));
    assert!(selection.matches(&mock_entry(3, 0, 1, &["x"])));
    assert!(!selection.matches(&mock_entry(4, 0, 1, &["x"])));

    Ok(())
}

#[test]
fn test_selection_time_window_withBoundaries_shouldBeInclusive() -> Result<()> {
    let selection = Selection::time_window(3000, 6000)?;

    assert!(selection.matches(&mock_entry(1, 3000, 6000, &["x"])));
    assert!(!selection.matches(&mock_entry(2, 2999, 4000, &["x"])));
    assert!(!selection.matches(&mock_entry(3, 5000, 6001, &["x"])));

    Ok(())
}

#[test]
fn test_selection_constructors_withInvalidBounds_shouldFail() {
    assert!(matches!(Selection::index_range(0, 3), Err(SubtitleError::InvalidIndexRange { .. })));
    assert!(matches!(Selection::index_range(5, 4), Err(SubtitleError::InvalidIndexRange { .. })));
    assert!(matches!(Selection::time_window(6000, 6000), Err(SubtitleError::InvalidTimeRange { .. })));
    assert!(matches!(Selection::time_window(7000, 6000), Err(SubtitleError::InvalidTimeRange { .. })));
    assert!(matches!(Selection::time_window(-1, 6000), Err(SubtitleError::InvalidTimeRange { .. })));
}

#[test]
fn test_range_payloads_withValidBounds_shouldExposeBounds() -> Result<()> {
    let range = IndexRange::new(5, 10)?;
    assert_eq!((range.start(), range.end()), (5, 10));
    assert!(range.contains(5) && range.contains(10) && !range.contains(11));

    let window = TimeWindow::new(3000, 6000)?;
    assert_eq!((window.from_ms(), window.to_ms()), (3000, 6000));
    assert_eq!(Selection::time_window(3000, 6000)?, Selection::TimeWindow(window));

    assert_eq!(
        IndexRange::new(5, 1).unwrap_err().to_string(),
        "Invalid index range: 5-1 | expected format: <start-end> eg 5-10"
    );
    assert_eq!(
        TimeWindow::new(-500, 6000).unwrap_err().to_string(),
        "Invalid time range: -500 ms - 00:00:06,000 | start time must be before end time"
    );

    Ok(())
}

#[test]
fn test_parse_index_range_withValidRange_shouldParse() -> Result<()> {
    assert_eq!(Selection::parse_index_range("5-10")?, Selection::index_range(5, 10)?);
    assert_eq!(Selection::parse_index_range("3-3")?, Selection::index_range(3, 3)?);
    Ok(())
}

#[test]
fn test_parse_index_range_withInvalidInput_shouldFailWithMessage() {
    for range in ["a-b", "10-5", "-10", "5-", "0-4", "5", ""] {
        let error = Selection::parse_index_range(range).unwrap_err();
        assert_eq!(
            error.to_string(),
            format!("Invalid index range: {} | expected format: <start-end> eg 5-10", range)
        );
    }
}

#[test]
fn test_parse_time_window_withValidTimes_shouldParse() -> Result<()> {
    assert_eq!(
        Selection::parse_time_window("00:00:00,000", "00:01:00,000")?,
        Selection::time_window(0, 60000)?
    );
    Ok(())
}

#[test]
fn test_parse_time_window_withReversedOrEqualTimes_shouldFail() {
    assert_eq!(
        Selection::parse_time_window("00:01:00,000", "00:00:00,000").unwrap_err().to_string(),
        "Invalid time range: 00:01:00,000 - 00:00:00,000 | start time must be before end time"
    );
    assert!(matches!(
        Selection::parse_time_window("00:00:00,000", "00:00:00,000"),
        Err(SubtitleError::InvalidTimeRange { .. })
    ));
}

#[test]
fn test_parse_time_window_withBadTimecode_shouldReportCodecError() {
    let error = Selection::parse_time_window("00:00:00", "00:01:00,000").unwrap_err();

    assert_eq!(
        error.to_string(),
        "Invalid timecode format: 00:00:00 | expected format: HH:MM:SS,mmm"
    );
}

#[test]
fn test_shift_request_from_cli_withCombinations_shouldBuildOrReject() -> Result<()> {
    assert_eq!(ShiftRequest::from_cli(300, None, None, None)?, ShiftRequest::new(300));
    assert_eq!(
        ShiftRequest::from_cli(-300, Some("2-4"), None, None)?.selection,
        Selection::index_range(2, 4)?
    );
    assert_eq!(
        ShiftRequest::from_cli(300, None, Some("00:00:01,000"), Some("00:00:02,000"))?.selection,
        Selection::time_window(1000, 2000)?
    );
    assert_eq!(
        ShiftRequest::from_cli(300, Some("2-4"), Some("00:00:01,000"), Some("00:00:02,000")),
        Err(SubtitleError::ConflictingSelection)
    );
    assert_eq!(
        ShiftRequest::from_cli(300, None, Some("00:00:01,000"), None),
        Err(SubtitleError::IncompleteTimeWindow)
    );

    Ok(())
}

#[test]
fn test_shift_request_display_withSelections_shouldDescribeRequest() -> Result<()> {
    assert_eq!(ShiftRequest::new(500).to_string(), "500 ms");
    assert_eq!(
        ShiftRequest::new(-250).with_selection(Selection::index_range(5, 10)?).to_string(),
        "-250 ms for indices 5-10"
    );
    assert_eq!(
        ShiftRequest::new(1).with_selection(Selection::time_window(0, 60000)?).to_string(),
        "1 ms for time range 00:00:00,000 to 00:01:00,000"
    );
    Ok(())
}

#[test]
fn test_timing_changes_withPartialShift_shouldListChangedEntries() -> Result<()> {
    let document = three_entry_document();
    let request = ShiftRequest::new(500).with_selection(Selection::index_range(2, 2)?);
    let shifted = apply_shift(&document, &request)?;

    let changes = timing_changes(&document, &shifted);

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].seq_num, 2);
    assert_eq!((changes[0].old_start_ms, changes[0].new_start_ms), (3000, 3500));
    assert_eq!(
        changes[0].to_string(),
        "Index 2:\n - 00:00:03,000 --> 00:00:04,000\n + 00:00:03,500 --> 00:00:04,500"
    );

    Ok(())
}
