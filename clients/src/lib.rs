//! Shared command-line plumbing for the Structura binaries.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use clap::{ArgAction, Args, ValueEnum};
use log::LevelFilter;
use structura_model::GeneratorKind;

/// Base log level.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Progress messages.
    Info,
    /// Per-artifact detail.
    Debug,
    /// Everything.
    Trace,
}

const LEVELS: [LevelFilter; 5] = [
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

impl LogLevel {
    fn index(self) -> usize {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
            LogLevel::Trace => 4,
        }
    }
}

/// Logging flags shared by every binary.
#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    /// Set the base log level (use -v / -q to adjust relative to this level)
    #[arg(
        long,
        value_enum,
        default_value_t = LogLevel::Info,
        global = true,
        help = "error | warn | info | debug | trace"
    )]
    pub log_level: LogLevel,

    /// Increase logging verbosity (can be used multiple times)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease logging verbosity (can be used multiple times)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

impl LoggingArgs {
    /// Returns the effective level after applying `-v` and `-q`.
    pub fn filter(&self) -> LevelFilter {
        let adjusted = (self.log_level.index() as i16 + i16::from(self.verbose)
            - i16::from(self.quiet))
        .clamp(0, LEVELS.len() as i16 - 1);
        LEVELS[adjusted as usize]
    }

    /// Installs the global logger. `RUST_LOG` is read first; the flags
    /// override its default level.
    pub fn init(&self) {
        env_logger::Builder::from_default_env()
            .format_target(false)
            .filter_level(self.filter())
            .init();
    }
}

/// Parses an artifact name as used in manifests (`xml-schema`, `sparql`,
/// `xslt-lifting`, `xslt-lowering`).
///
/// # Errors
///
/// Returns the list of valid names if `s` is none of them.
pub fn parse_kind(s: &str) -> Result<GeneratorKind, String> {
    GeneratorKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == s)
        .ok_or_else(|| {
            let names: Vec<&str> = GeneratorKind::ALL.iter().map(|k| k.as_str()).collect();
            format!("unknown artifact {s:?}, expected one of {}", names.join(", "))
        })
}
