/*!
 * # lrcplay
 *
 * A Rust library for parsing LRC lyrics files and replaying them in
 * real time.
 *
 * ## Features
 *
 * - Parse timestamp-tagged LRC lines into timed lyric fragments
 * - Multi-timestamp lines sharing one text (repeated chorus shorthand)
 * - Inline karaoke-style `<MM:SS.CC>` timestamps splitting a line into
 *   word-by-word fragments
 * - Metadata tag and malformed-line tolerance (skip and continue)
 * - Drift-corrected real-time playback with concurrent listener fan-out
 *   and cooperative cancellation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `lrc_parser`: LRC parsing into an immutable timed document
 * - `lrc_timer`: Real-time playback scheduling over a parsed document
 * - `app_config`: Configuration management for the player binary
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod lrc_parser;
pub mod lrc_timer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::LrcError;
pub use lrc_parser::{LrcDocument, LrcFragment};
pub use lrc_timer::{LrcListener, LrcTimer};
