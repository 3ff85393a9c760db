//! Logging initialization and configuration.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::config::{LogFormat, LoggingConfig};

/// Initialize the tracing subscriber based on configuration.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;

    let (writer, is_terminal) = make_writer(&config.output)?;
    let registry = tracing_subscriber::registry().with(filter);

    match (config.format, config.timestamps) {
        (LogFormat::Text, true) => registry
            .with(text_layer(config, is_terminal).with_writer(writer))
            .init(),
        (LogFormat::Text, false) => registry
            .with(text_layer(config, is_terminal).with_writer(writer).without_time())
            .init(),
        (LogFormat::Json, true) => registry
            .with(json_layer(config).with_writer(writer))
            .init(),
        (LogFormat::Json, false) => registry
            .with(json_layer(config).with_writer(writer).without_time())
            .init(),
    }

    Ok(())
}

fn text_layer<S>(config: &LoggingConfig, is_terminal: bool) -> fmt::Layer<S> {
    fmt::layer()
        .with_ansi(config.color && is_terminal)
        .with_target(config.target)
        .with_span_events(FmtSpan::NONE)
}

fn json_layer<S>(
    config: &LoggingConfig,
) -> fmt::Layer<S, fmt::format::JsonFields, fmt::format::Format<fmt::format::Json>> {
    fmt::layer()
        .json()
        .with_target(config.target)
        .with_span_events(FmtSpan::NONE)
}

fn make_writer(output: &str) -> Result<(BoxMakeWriter, bool), LoggingError> {
    match output {
        "stdout" => Ok((BoxMakeWriter::new(io::stdout), io::stdout().is_terminal())),
        "stderr" => Ok((BoxMakeWriter::new(io::stderr), io::stderr().is_terminal())),
        path => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LoggingError::FileOpen(path.to_string(), e))?;
            Ok((BoxMakeWriter::new(file), false))
        }
    }
}

/// Errors that can occur during logging initialization.
#[derive(Debug)]
pub enum LoggingError {
    /// Invalid log filter string.
    InvalidFilter(String),
    /// Failed to open log file.
    FileOpen(String, io::Error),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter(msg) => write!(f, "Invalid log filter: {}", msg),
            LoggingError::FileOpen(path, e) => {
                write!(f, "Failed to open log file '{}': {}", path, e)
            }
        }
    }
}

impl std::error::Error for LoggingError {}
