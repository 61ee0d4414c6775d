//! Crate-wide error hierarchy for `config`.

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors are always fatal and must be reported before any
/// network activity starts, per the Configuration error kind in the
/// error-handling design.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown provider variant: {0}")]
    UnknownProvider(String),

    #[error("missing credential {key}: {reason}")]
    MissingCredential { key: String, reason: String },

    #[error("malformed threshold {key}: {reason}")]
    MalformedThreshold { key: String, reason: String },

    #[error("unterminated ${{VAR}} substitution in value: {0}")]
    UnterminatedSubstitution(String),
}
