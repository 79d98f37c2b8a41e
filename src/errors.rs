/*!
 * Error types for the lrcplay library.
 *
 * This module contains custom error types for the parsing layer,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when loading and parsing LRC lyrics
#[derive(Error, Debug)]
pub enum LrcError {
    /// Error reading from the underlying lyrics source.
    /// This is the only fatal parse condition: malformed lines are
    /// skipped, an unreadable source aborts the whole parse.
    #[error("failed to read lyrics input: {0}")]
    Read(#[from] std::io::Error),

    /// A single line could not be classified as a timed lyric line.
    /// Produced per line during parsing and handled internally by the
    /// document loaders (the line is skipped); never fatal on its own.
    #[error("line {line_no}: {reason}")]
    MalformedLine {
        /// 1-based line number in the input
        line_no: usize,
        /// Short description of what failed to parse
        reason: &'static str,
    },
}
