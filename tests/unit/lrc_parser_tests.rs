/*!
 * Tests for LRC parsing functionality
 */

use std::fmt::Write;
use anyhow::Result;
use lrcplay::lrc_parser::{LrcDocument, LrcFragment};
use lrcplay::errors::LrcError;
use crate::common;

/// Test single-timestamp line parsing
#[test]
fn test_parse_str_withSingleTimestamp_shouldYieldOneFragment() {
    let document = LrcDocument::parse_str("[00:01.50]hello");

    assert_eq!(document.len(), 1);
    assert_eq!(document.fragments()[0].start_time_ms, 1500);
    assert_eq!(document.fragments()[0].text, "hello");
}

/// Test millisecond conversion across all timestamp fields
#[test]
fn test_parse_str_withAllTimestampFields_shouldConvertToMilliseconds() {
    let document = LrcDocument::parse_str("[12:34.56]text");

    assert_eq!(document.fragments()[0].start_time_ms, 12 * 60_000 + 34 * 1_000 + 560);
}

/// Test multi-timestamp line sharing one text
#[test]
fn test_parse_str_withMultipleTimestamps_shouldRepeatText() {
    let document = LrcDocument::parse_str("[00:00.00][00:05.00]same text");

    assert_eq!(document.len(), 2);
    assert_eq!(document.fragments()[0].start_time_ms, 0);
    assert_eq!(document.fragments()[0].text, "same text");
    assert_eq!(document.fragments()[1].start_time_ms, 5000);
    assert_eq!(document.fragments()[1].text, "same text");
}

/// Test inline karaoke-style timestamps splitting a line
#[test]
fn test_parse_str_withInlineTimestamps_shouldSplitLine() {
    let document = LrcDocument::parse_str("[00:00.00]a<00:01.00>b<00:02.00>c");

    let expected = [(0, "a"), (1000, "b"), (2000, "c")];
    assert_eq!(document.len(), expected.len());
    for (fragment, (ms, text)) in document.fragments().iter().zip(expected) {
        assert_eq!(fragment.start_time_ms, ms);
        assert_eq!(fragment.text, text);
    }
}

/// Test that inline segments are whitespace-trimmed
#[test]
fn test_parse_str_withSpacedInlineSegments_shouldTrimText() {
    let document = LrcDocument::parse_str("[00:00.00]first words <00:01.00> second words ");

    assert_eq!(document.len(), 2);
    assert_eq!(document.fragments()[0].text, "first words");
    assert_eq!(document.fragments()[1].text, "second words");
}

/// Test that a literal '<' in content does not split the line
#[test]
fn test_parse_str_withLiteralAngleBracket_shouldKeepTextIntact() {
    let document = LrcDocument::parse_str("[00:01.00]a < b <not a stamp> c");

    assert_eq!(document.len(), 1);
    assert_eq!(document.fragments()[0].text, "a < b <not a stamp> c");
}

/// Test that metadata tag lines contribute no fragments
#[test]
fn test_parse_str_withMetadataTags_shouldSkipThem() {
    let content = "[ar:Artist]\n[ti:Title]\n[al:Album]\n[00:01.00]lyric";
    let document = LrcDocument::parse_str(content);

    assert_eq!(document.len(), 1);
    assert_eq!(document.fragments()[0].text, "lyric");
}

/// Test that a malformed line does not abort parsing of later lines
#[test]
fn test_parse_str_withMalformedLine_shouldContinueParsing() {
    let content = "[bad]text\n[00:01.00]good\n[00:0x.00]also bad\n[00:02.00]also good";
    let document = LrcDocument::parse_str(content);

    assert_eq!(document.len(), 2);
    assert_eq!(document.fragments()[0].text, "good");
    assert_eq!(document.fragments()[1].text, "also good");
}

/// Test that blank lines and surrounding whitespace are tolerated
#[test]
fn test_parse_str_withBlankLinesAndPadding_shouldIgnoreThem() {
    let content = "\n   \n  [00:01.00]padded line  \n\n";
    let document = LrcDocument::parse_str(content);

    assert_eq!(document.len(), 1);
    assert_eq!(document.fragments()[0].text, "padded line");
}

/// Test that variable-width timestamps are rejected
#[test]
fn test_parse_str_withWrongWidthTimestamp_shouldSkipLine() {
    let content = "[0:01.00]narrow\n[00:01.000]wide\n[00:01,00]wrong separator";
    let document = LrcDocument::parse_str(content);

    assert!(document.is_empty());
}

/// Test that output is sorted ascending regardless of input order
#[test]
fn test_parse_str_withUnorderedLines_shouldSortByStartTime() {
    let content = "[00:10.00]third\n[00:01.00]first\n[00:05.00]second";
    let document = LrcDocument::parse_str(content);

    let times: Vec<u64> = document.fragments().iter().map(|f| f.start_time_ms).collect();
    assert_eq!(times, vec![1000, 5000, 10000]);
    assert_eq!(document.fragments()[0].text, "first");
}

/// Test that equal timestamps keep input order
#[test]
fn test_parse_str_withEqualTimestamps_shouldKeepInputOrder() {
    let content = "[00:01.00]one\n[00:01.00]two\n[00:01.00]three";
    let document = LrcDocument::parse_str(content);

    let texts: Vec<&str> = document.fragments().iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

/// Test that parsing is deterministic
#[test]
fn test_parse_str_withSameInputTwice_shouldYieldEqualDocuments() {
    let content = "[00:04.00][00:08.00]chorus\n[00:01.00]a<00:02.00>b\n[x]skip me";

    let first = LrcDocument::parse_str(content);
    let second = LrcDocument::parse_str(content);

    assert_eq!(first, second);
}

/// Test parsing an empty input
#[test]
fn test_parse_str_withEmptyInput_shouldYieldEmptyDocument() {
    let document = LrcDocument::parse_str("");

    assert!(document.is_empty());
    assert_eq!(document.len(), 0);
}

/// Test reading from an in-memory reader
#[test]
fn test_from_reader_withValidContent_shouldMatchParseStr() -> Result<()> {
    let content = "[00:01.00]hello\n[00:02.00]world";

    let from_reader = LrcDocument::from_reader(content.as_bytes())?;
    let from_str = LrcDocument::parse_str(content);

    assert_eq!(from_reader, from_str);
    Ok(())
}

/// Test opening a lyrics file from disk
#[test]
fn test_open_withSampleFile_shouldParseAllFragments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = common::create_test_lyrics(&temp_dir.path().to_path_buf(), "test.lrc")?;

    let document = LrcDocument::open(&file_path)?;

    let times: Vec<u64> = document.fragments().iter().map(|f| f.start_time_ms).collect();
    assert_eq!(times, vec![1000, 2500, 4000, 6000, 6500, 7000, 8000]);
    assert_eq!(document.fragments()[2].text, "Repeated line");
    assert_eq!(document.fragments()[6].text, "Repeated line");
    assert_eq!(document.fragments()[3].text, "word1");
    Ok(())
}

/// Test opening a missing file
#[test]
fn test_open_withMissingFile_shouldReturnReadError() {
    let result = LrcDocument::open("definitely/not/here.lrc");

    assert!(matches!(result, Err(LrcError::Read(_))));
}

/// Test timestamp formatting round trip
#[test]
fn test_format_timestamp_withKnownOffsets_shouldRenderFixedWidth() {
    assert_eq!(LrcFragment::format_timestamp(0), "00:00.00");
    assert_eq!(LrcFragment::format_timestamp(1500), "00:01.50");
    assert_eq!(LrcFragment::format_timestamp(12 * 60_000 + 34 * 1_000 + 560), "12:34.56");
}

/// Test fragment display formatting
#[test]
fn test_fragment_display_withValidFragment_shouldRenderLrcLine() {
    let fragment = LrcFragment::new(1500, "  hello  ");
    let mut output = String::new();
    write!(output, "{}", fragment).unwrap();

    assert_eq!(output, "[00:01.50]hello");
}

/// Test JSON serialization of fragments
#[test]
fn test_fragment_serialization_withValidDocument_shouldProduceJson() -> Result<()> {
    let document = LrcDocument::parse_str("[00:01.50]hello");
    let json = serde_json::to_string(document.fragments())?;

    assert_eq!(json, r#"[{"start_time_ms":1500,"text":"hello"}]"#);
    Ok(())
}
