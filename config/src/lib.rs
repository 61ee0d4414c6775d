//! Layered TOML configuration for code-health: file + `${VAR}` substitution
//! + environment-variable overrides.

mod error;
mod loader;
mod schema;
mod substitution;

pub use error::{ConfigError, ConfigResult};
pub use loader::{default_path, load, load_with_env};
pub use schema::{
    AnalysisConfig, Config, GitConfig, GitPlatform, ProjectConfig, RepositoryConfig, Thresholds,
    WebConfig, WorkingHours,
};
