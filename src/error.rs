//! Top-level error type for the `code-health` binary.
//!
//! Wraps each crate-local `thiserror` hierarchy the way `GitContextEngineError`
//! wraps its provider/cache sub-errors; maps the five error kinds from the
//! error-handling design onto fatal vs. non-fatal outcomes at the CLI
//! boundary. Only this binary uses `anyhow` at its outermost `main` — every
//! library crate keeps its own `Result<T>` alias.

use thiserror::Error;

pub type CliResult<T> = Result<T, CodeHealthError>;

#[derive(Debug, Error)]
pub enum CodeHealthError {
    #[error("configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error(transparent)]
    Provider(#[from] providers::ProviderError),

    #[error(transparent)]
    Reporter(#[from] reporters::ReporterError),

    #[error(transparent)]
    Render(#[from] rendering::RenderError),

    #[error(transparent)]
    Notifier(#[from] notifier::NotifierError),

    #[error("filesystem error: {path}: {source}")]
    Filesystem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no report file found for {period} on disk; pass --report-file explicitly")]
    ReportFileNotFound { period: String },
}
