//! Crate-wide error hierarchy for `reporters`.

use thiserror::Error;

pub type ReporterResult<T> = Result<T, ReporterError>;

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error(transparent)]
    Provider(#[from] providers::ProviderError),

    #[error("invalid date/week/month argument: {0}")]
    InvalidPeriod(String),

    #[error("no repositories configured or reachable")]
    NoRepositories,
}
