// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use log::{info, LevelFilter, Level, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use clap::{Parser, ValueEnum};

use crate::app_config::{Config, LogLevel};
use crate::lrc_parser::LrcDocument;
use crate::lrc_timer::LrcTimer;

mod app_config;
mod errors;
mod lrc_parser;
mod lrc_timer;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// lrcplay - LRC lyrics player
///
/// Parses an LRC lyrics file and replays it in real time, printing each
/// lyric line to stdout at the moment it becomes current.
#[derive(Parser, Debug)]
#[command(name = "lrcplay")]
#[command(version = "1.0.0")]
#[command(about = "Real-time LRC lyrics player")]
#[command(long_about = "lrcplay parses timestamp-tagged LRC lyrics files and replays them \
in real time on stdout.

EXAMPLES:
    lrcplay song.lrc                  # Play lyrics in real time
    lrcplay -t song.lrc               # Prefix each line with its timestamp
    lrcplay -d song.lrc               # Dump parsed fragments as JSON
    lrcplay --log-level debug song.lrc # Show skipped lines while parsing

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, built-in defaults are used.")]
struct CommandLineOptions {
    /// Input LRC file to play
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Parse only: print the fragments as JSON and exit
    #[arg(short, long)]
    dump: bool,

    /// Prefix each printed line with its [MM:SS.CC] stamp
    #[arg(short = 't', long)]
    show_timestamps: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    // Level filtering goes through log::max_level so the level can be
    // raised after the config is loaded
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Load the configuration, falling back to defaults when absent
    let config = Config::from_file_or_default(&cli.config_path)?;

    // CLI log level wins over the config's
    let log_level = cli
        .log_level
        .map(LogLevel::from)
        .unwrap_or(config.log_level);
    log::set_max_level(log_level.to_level_filter());

    let document = LrcDocument::open(&cli.input_path)
        .with_context(|| format!("Failed to open lyrics file: {}", cli.input_path.display()))?;
    info!(
        "Parsed {} lyric fragments from {}",
        document.len(),
        cli.input_path.display()
    );

    if cli.dump {
        let json = serde_json::to_string_pretty(document.fragments())
            .context("Failed to serialize fragments")?;
        println!("{}", json);
        return Ok(());
    }

    let show_timestamps = cli.show_timestamps || config.show_timestamps;
    let timer = Arc::new(LrcTimer::new(Arc::new(document)));
    timer.add_listener(Arc::new(move |start_time_ms, text, _last| {
        if show_timestamps {
            println!("[{}] {}", lrc_parser::LrcFragment::format_timestamp(start_time_ms), text);
        } else {
            println!("{}", text);
        }
    }));

    // Play until the last fragment fires, or stop on ctrl-c
    tokio::select! {
        _ = timer.start() => {
            info!("Playback complete");
        }
        _ = tokio::signal::ctrl_c() => {
            timer.stop();
            info!("Playback cancelled");
        }
    }

    Ok(())
}
