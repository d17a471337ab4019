//! Structured logging configuration.
//!
//! Uses `tracing` with `tracing-subscriber` for configurable log levels and
//! structured output. Logs go to stderr so stdout stays clean for the
//! scraped result.
//!
//! ## Environment Variables
//!
//! - `MSGSCRAPE_LOG` or `RUST_LOG`: log filter (e.g. `debug`, `msgscrape=debug,warn`)
//! - `MSGSCRAPE_LOG_FORMAT`: output format (`pretty`, `compact`, `json`)

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "msgscrape=info,warn";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// Multi-line output with colors and indentation
    Pretty,
    /// JSON output for log aggregation
    Json,
}

impl LogFormat {
    /// Parse from string (case-insensitive), defaulting to compact
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Initialize the global tracing subscriber from the environment.
///
/// Should be called once at program start; later calls are ignored.
/// `verbose` forces debug-level output for the crate regardless of the
/// filter variables.
pub fn init_from_env(verbose: bool) {
    let filter = if verbose {
        "msgscrape=debug,info".to_string()
    } else {
        std::env::var("MSGSCRAPE_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_FILTER.to_string())
    };

    let format = std::env::var("MSGSCRAPE_LOG_FORMAT")
        .map(|s| LogFormat::parse(&s))
        .unwrap_or_default();

    init(&filter, format);
}

/// Initialize the global tracing subscriber with an explicit filter and
/// format.
pub fn init(filter: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match format {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr));
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr));
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr));
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Compact);
    }
}
