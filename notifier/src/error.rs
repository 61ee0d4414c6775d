//! Crate-wide error hierarchy for `notifier`.

use thiserror::Error;

pub type NotifierResult<T> = Result<T, NotifierError>;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("notifier transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notifier rejected the payload: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("notifier is not configured")]
    NotConfigured,
}
