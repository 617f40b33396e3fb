//! `tracing` subscriber setup
//!
//! `RUST_LOG` always wins; otherwise the filter comes from the deployment
//! environment. Production logs are JSON lines.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::Registry,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::Environment;

/// Filter used in development when `RUST_LOG` is unset
const DEVELOPMENT_FILTER: &str = "debug,sqlx=info,hyper=info,h2=info";
/// Filter used in staging and production when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info,sqlx=warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directives applied without `RUST_LOG`
    pub filter: String,
    pub json: bool,
    /// Log span open/close, which times every instrumented repository call
    pub span_events: bool,
    pub file_line: bool,
}

impl TracingConfig {
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                filter: DEVELOPMENT_FILTER.to_string(),
                json: false,
                span_events: true,
                file_line: true,
            },
            Environment::Staging => Self {
                filter: DEFAULT_FILTER.to_string(),
                json: false,
                span_events: false,
                file_line: true,
            },
            Environment::Production => Self {
                filter: DEFAULT_FILTER.to_string(),
                json: true,
                span_events: false,
                file_line: false,
            },
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.file_line)
            .with_line_number(self.file_line)
            .with_span_events(span_events);

        if self.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }
}

/// Install the global subscriber
///
/// Fails instead of panicking when one is already installed.
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
