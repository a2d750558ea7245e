//! Structured logging for the SQLGate server
//!
//! Human-readable console output for development, JSON for production,
//! optional daily-rotated log files.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format for development
    Pretty,
    /// JSON format for production (structured logging)
    Json,
    /// Compact format for testing
    Compact,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    File,
    Both,
}

impl LogOutput {
    fn parse(value: &str) -> Self {
        match value {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Stdout,
        }
    }
}

/// Initialize the logging system from the loaded configuration.
///
/// `RUST_LOG` takes precedence over the configured level, and noisy
/// third-party crates are filtered down to warnings.
pub fn init(config: &LoggingConfig) {
    let format = LogFormat::parse(&config.format);
    let output = LogOutput::parse(&config.output);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive("hyper=warn".parse().expect("static directive"))
        .add_directive("tokio=warn".parse().expect("static directive"))
        .add_directive("tower=warn".parse().expect("static directive"));

    let stdout_layer = match (output, format) {
        (LogOutput::File, _) => None,
        (_, LogFormat::Pretty) => Some(
            fmt::layer()
                .pretty()
                .with_thread_ids(true)
                .with_target(true)
                .boxed(),
        ),
        (_, LogFormat::Json) => Some(fmt::layer().json().with_current_span(true).boxed()),
        (_, LogFormat::Compact) => Some(fmt::layer().compact().boxed()),
    };

    let file_layer = match output {
        LogOutput::Stdout => None,
        LogOutput::File | LogOutput::Both => {
            std::fs::create_dir_all(&config.directory).ok();
            let file_appender =
                RollingFileAppender::new(Rotation::DAILY, &config.directory, "sqlgate-server.log");
            Some(fmt::layer().with_writer(file_appender).with_ansi(false).boxed())
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::info!(?format, ?output, "logging initialized");
}
