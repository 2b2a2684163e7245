// Tracing log adapter - Structured logging setup using the tracing crate

use tracing_subscriber::EnvFilter;

use crate::domain::errors::*;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    /// Filter directive for this level
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Tracing log adapter
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Install the global subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over `level` when set. Calling this twice is harmless.
    pub fn init(level: LogLevel, json: bool) -> Result<(), DomainError> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.as_directive()))
            .map_err(|e| DomainError::BadArgs(format!("Invalid log filter: {}", e)))?;

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);

        // A subscriber may already be installed (tests, embedding)
        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::parse(" warn ").unwrap(), LogLevel::Warn);
        assert!(LogLevel::parse("loud").is_err());
        assert!(LogLevel::Debug < LogLevel::Error);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        TracingLogAdapter::init(LogLevel::Warn, false).unwrap();
        TracingLogAdapter::init(LogLevel::Debug, true).unwrap();
    }
}
