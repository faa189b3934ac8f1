//! Logging setup for the Parley comments widget
//!
//! Every crate in the workspace logs through `tracing` with structured
//! fields. This crate installs the subscriber: JSON lines by default,
//! pretty console output for development, and `RUST_LOG` always takes
//! precedence over the configured levels.
//!
//! # Quick Start
//!
//! ```ignore
//! use parley_logging::{LogConfig, ParleySubscriberBuilder};
//!
//! // JSON lines to the console
//! ParleySubscriberBuilder::new().init();
//!
//! // Development mode with pretty human-readable output
//! ParleySubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//! ```

pub mod config;

pub use config::{ConsoleConfig, FilterConfig, LogConfig};

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Errors from installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Builder for configuring and initializing the logging subscriber
///
/// By default, console output uses JSON lines. Use
/// `LogConfig::development()` for human-readable output.
pub struct ParleySubscriberBuilder {
    config: LogConfig,
}

impl ParleySubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Add an `EnvFilter` directive such as `parley_store=trace`
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.config.filters.directives.push(directive.into());
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(self.config.filter_string())?),
        }
    }

    fn console_layer(&self, filter: EnvFilter) -> Option<BoxedLayer> {
        let console = &self.config.console;
        if !console.enabled {
            return None;
        }
        let layer = if console.pretty {
            fmt::layer()
                .with_ansi(console.ansi)
                .with_target(true)
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .json()
                .with_current_span(true)
                .flatten_event(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter)
                .boxed()
        };
        Some(layer)
    }

    /// Try to initialize the subscriber globally
    ///
    /// Fails if the filter does not parse or a global subscriber is
    /// already set.
    pub fn try_init(self) -> Result<(), LoggingError> {
        let filter = self.env_filter()?;
        Registry::default()
            .with(self.console_layer(filter))
            .try_init()?;
        Ok(())
    }

    /// Initialize the subscriber globally, warning on stderr if it could
    /// not be installed
    pub fn init(self) {
        if let Err(e) = self.try_init() {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }
    }
}

impl Default for ParleySubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize logging with default settings (JSON lines to console)
pub fn init_default() {
    ParleySubscriberBuilder::new().init();
}

/// Initialize logging for development (verbose, pretty console output)
pub fn init_development() {
    ParleySubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init();
}

/// Initialize logging for testing (minimal output, safe to call repeatedly)
pub fn init_testing() {
    let _ = ParleySubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}
