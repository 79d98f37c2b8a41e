use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;
use serde::Serialize;
use crate::errors::LrcError;

// @module: LRC lyrics parsing
// Format reference: https://en.wikipedia.org/wiki/LRC_(file_format)

// @const: Inner shape of one timestamp token, "MM:SS.CC"
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2})\.(\d{2})$").unwrap()
});

/// Byte length of one bracketed timestamp token, e.g. `[01:23.45]`
const TIMESTAMP_TOKEN_LEN: usize = 10;

// @struct: Single timed lyric fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LrcFragment {
    // @field: Offset from the start of the timed content, in ms
    pub start_time_ms: u64,

    // @field: Lyric text, whitespace-trimmed, possibly empty
    pub text: String,
}

impl LrcFragment {
    /// Creates a new fragment with trimmed text
    pub fn new(start_time_ms: u64, text: &str) -> Self {
        LrcFragment {
            start_time_ms,
            text: text.trim().to_string(),
        }
    }

    /// Convert the fragment's start time to LRC timestamp form
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Format a millisecond offset as an LRC timestamp (MM:SS.CC)
    pub fn format_timestamp(ms: u64) -> String {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let centis = (ms % 1_000) / 10;

        format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
    }
}

impl fmt::Display for LrcFragment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]{}", self.format_start_time(), self.text)
    }
}

/// An immutable lyrics document: all fragments from one parsed input,
/// sorted ascending by start time. Equal start times keep input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LrcDocument {
    /// Sorted list of lyric fragments
    fragments: Vec<LrcFragment>,
}

impl LrcDocument {
    /// Open and parse an LRC file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LrcError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse LRC content from any readable source.
    ///
    /// Lines that are not timed lyric lines (metadata tags, malformed
    /// timestamps, blanks) are skipped. A read failure of the source
    /// itself is fatal: the error is returned and any fragments
    /// accumulated before the failure are discarded.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LrcError> {
        let mut fragments = Vec::new();

        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            collect_line_fragments(&line, idx + 1, &mut fragments);
        }

        Ok(Self::from_fragments(fragments))
    }

    /// Parse LRC content already held in memory.
    /// Infallible: string input has no read-failure mode.
    pub fn parse_str(content: &str) -> Self {
        let mut fragments = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            collect_line_fragments(line, idx + 1, &mut fragments);
        }

        Self::from_fragments(fragments)
    }

    fn from_fragments(mut fragments: Vec<LrcFragment>) -> Self {
        // Stable sort: equal timestamps keep the order lines were read in
        fragments.sort_by_key(|fragment| fragment.start_time_ms);
        LrcDocument { fragments }
    }

    /// All fragments, ascending by start time
    pub fn fragments(&self) -> &[LrcFragment] {
        &self.fragments
    }

    /// Number of fragments in the document
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the document contains no fragments
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl fmt::Display for LrcDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for fragment in &self.fragments {
            writeln!(f, "{}", fragment)?;
        }
        Ok(())
    }
}

// @handles: One raw input line; skipped lines are logged, never fatal
fn collect_line_fragments(line: &str, line_no: usize, fragments: &mut Vec<LrcFragment>) {
    match parse_line(line, line_no) {
        Ok(mut line_fragments) => fragments.append(&mut line_fragments),
        Err(e) => debug!("Skipping non-lyric line: {}", e),
    }
}

/// Parse one line into zero or more fragments
fn parse_line(line: &str, line_no: usize) -> Result<Vec<LrcFragment>, LrcError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }

    let first_ms = parse_timestamp_token(line, b'[', b']').ok_or(LrcError::MalformedLine {
        line_no,
        reason: "no leading [MM:SS.CC] timestamp",
    })?;
    let mut rest = &line[TIMESTAMP_TOKEN_LEN..];

    // A line may open with several adjacent timestamps that all share
    // the trailing text, e.g. a chorus repeated at multiple instants:
    //   [00:12.00][01:40.00]And the chorus goes
    let mut extra_ms = Vec::new();
    while let Some(ms) = parse_timestamp_token(rest, b'[', b']') {
        extra_ms.push(ms);
        rest = &rest[TIMESTAMP_TOKEN_LEN..];
    }

    let text = rest.trim();
    if !extra_ms.is_empty() {
        let mut fragments = Vec::with_capacity(extra_ms.len() + 1);
        fragments.push(LrcFragment::new(first_ms, text));
        for ms in extra_ms {
            fragments.push(LrcFragment::new(ms, text));
        }
        return Ok(fragments);
    }

    Ok(split_inline_timestamps(text, first_ms))
}

/// Split a single line's text on karaoke-style inline timestamps:
///   word1 <00:02.00>word2 <00:03.50>word3
/// Each `<MM:SS.CC>` token closes the preceding segment and opens the
/// next one at the new time. A `<` that does not open a valid timestamp
/// is ordinary text; scanning resumes one byte past it.
fn split_inline_timestamps(text: &str, start_time_ms: u64) -> Vec<LrcFragment> {
    if !text.contains('<') {
        return vec![LrcFragment::new(start_time_ms, text)];
    }

    let mut fragments = Vec::new();
    let mut previous_ms = start_time_ms;
    let mut segment_start = 0;
    let mut scan_from = 0;

    while let Some(offset) = text[scan_from..].find('<') {
        let idx = scan_from + offset;
        if let Some(ms) = parse_timestamp_token(&text[idx..], b'<', b'>') {
            fragments.push(LrcFragment::new(previous_ms, &text[segment_start..idx]));
            segment_start = idx + TIMESTAMP_TOKEN_LEN;
            previous_ms = ms;
        }
        scan_from = idx + 1;
    }

    fragments.push(LrcFragment::new(previous_ms, &text[segment_start..]));
    fragments
}

// @returns: Milliseconds for a leading bracketed timestamp token, or None.
// The token is fixed-width: open bracket, two-digit minutes, ':',
// two-digit seconds, '.', two-digit centiseconds, close bracket.
fn parse_timestamp_token(line: &str, open: u8, close: u8) -> Option<u64> {
    let token = line.get(..TIMESTAMP_TOKEN_LEN)?;
    let bytes = token.as_bytes();
    if bytes[0] != open || bytes[TIMESTAMP_TOKEN_LEN - 1] != close {
        return None;
    }

    let caps = TIMESTAMP_REGEX.captures(&token[1..TIMESTAMP_TOKEN_LEN - 1])?;
    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: u64 = caps[2].parse().ok()?;
    let centis: u64 = caps[3].parse().ok()?;

    Some(minutes * 60_000 + seconds * 1_000 + centis * 10)
}
