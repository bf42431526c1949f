//! Logging setup for schema_baseline
//!
//! Builds a `tracing-subscriber` fmt subscriber from [`LoggingConfig`].

use std::fs::File;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Parse a level name, falling back to INFO
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the event filter: `RUST_LOG` first, then the configured crate level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directive = format!("schema_baseline={}", parse_level(&config.level))
        .parse()
        .map_err(|e| Error::ConfigError(format!("Invalid log directive: {}", e)))?;

    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Initialize logging based on configuration
///
/// Without a configuration nothing is installed and events are discarded.
/// Events go to the configured file, else to stdout or stderr, so they never
/// mix with a report written to stdout unless asked to.
pub fn init_logging(config: &Option<LoggingConfig>) -> Result<()> {
    let config = match config {
        Some(cfg) => cfg,
        None => return Ok(()),
    };

    let env_filter = build_filter(config)?;
    let json = config.format.eq_ignore_ascii_case("json");

    let result = if let Some(file_path) = &config.file {
        if let Some(parent) = Path::new(file_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(file_path)?;
        let builder = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file));

        if json {
            tracing::subscriber::set_global_default(builder.json().finish())
        } else {
            tracing::subscriber::set_global_default(builder.finish())
        }
    } else if config.stdout {
        let builder = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stdout);

        if json {
            tracing::subscriber::set_global_default(builder.json().finish())
        } else {
            tracing::subscriber::set_global_default(builder.finish())
        }
    } else {
        let builder = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr);

        if json {
            tracing::subscriber::set_global_default(builder.json().finish())
        } else {
            tracing::subscriber::set_global_default(builder.finish())
        }
    };

    result.map_err(|e| Error::ConfigError(format!("Failed to install logger: {}", e)))
}
