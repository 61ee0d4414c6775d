//! Loads `code-health.toml` (or `CODE_HEALTH_CONFIG`), applies `${VAR}`
//! substitution, then layers environment-variable overrides on top.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use crate::substitution;

/// Every config leaf path the environment is allowed to override, as dotted
/// TOML paths. Env var names are the upper-snake-case of the dotted path,
/// e.g. `thresholds.large_commit` -> `THRESHOLDS_LARGE_COMMIT`.
const OVERRIDABLE_PATHS: &[&str] = &[
    "project.name",
    "git.platform",
    "git.token",
    "git.org",
    "git.base_url",
    "git.enterprise_org_id",
    "git.enterprise_project",
    "thresholds.large_commit",
    "thresholds.tiny_commit",
    "thresholds.churn_days",
    "thresholds.churn_count",
    "thresholds.churn_rate_warning",
    "thresholds.churn_rate_danger",
    "thresholds.rework_add_days",
    "thresholds.rework_delete_days",
    "thresholds.rework_rate_warning",
    "thresholds.rework_rate_danger",
    "thresholds.hotspot_days",
    "thresholds.hotspot_count",
    "thresholds.large_file",
    "thresholds.multi_author_count",
    "thresholds.health_score_excellent",
    "thresholds.health_score_good",
    "thresholds.health_score_warning",
    "working_hours.normal_start",
    "working_hours.normal_end",
    "working_hours.overtime_start",
    "working_hours.overtime_end",
    "working_hours.late_night_start",
    "working_hours.late_night_end",
    "web.base_url",
];

/// Loads configuration from `path`, substituting `${VAR}`/`${VAR:-default}`
/// in the raw TOML text, then overlaying any environment variable aliases
/// from `OVERRIDABLE_PATHS`.
pub fn load(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    load_with_env(path, |name| std::env::var(name).ok())
}

/// Resolves the config path from `CODE_HEALTH_CONFIG`, falling back to
/// `code-health.toml` in the current directory.
pub fn default_path() -> std::path::PathBuf {
    std::env::var("CODE_HEALTH_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("code-health.toml"))
}

/// Testable core: takes an explicit environment lookup function instead of
/// reading `std::env` directly.
pub fn load_with_env(
    path: &Path,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<Config> {
    let path_str = path.display().to_string();
    info!(path = %path_str, "loading configuration");

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path_str.clone(),
        source,
    })?;

    let expanded = substitution::expand(&raw, |name| env_lookup(name))?;

    let mut value: toml::Value =
        expanded.parse().map_err(|source| ConfigError::Parse {
            path: path_str.clone(),
            source,
        })?;

    apply_env_overrides(&mut value, &env_lookup);

    let config: Config = value.try_into().map_err(|source| ConfigError::Parse {
        path: path_str.clone(),
        source,
    })?;

    validate(&config)?;

    Ok(config)
}

fn apply_env_overrides(root: &mut toml::Value, env_lookup: &impl Fn(&str) -> Option<String>) {
    for dotted in OVERRIDABLE_PATHS {
        let env_key = dotted.to_uppercase().replace('.', "_");
        let Some(raw) = env_lookup(&env_key) else {
            continue;
        };
        debug!(key = dotted, "applying environment override");
        set_dotted(root, dotted, parse_scalar(&raw));
    }
}

/// Parses a raw env var string into the most specific TOML scalar it looks
/// like: integer, float, bool, else a plain string.
fn parse_scalar(raw: &str) -> toml::Value {
    if let Ok(i) = raw.parse::<i64>() {
        toml::Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        toml::Value::Float(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        toml::Value::Boolean(b)
    } else {
        toml::Value::String(raw.to_string())
    }
}

fn set_dotted(root: &mut toml::Value, dotted: &str, leaf: toml::Value) {
    let mut cursor = root;
    let segments: Vec<&str> = dotted.split('.').collect();
    for segment in &segments[..segments.len() - 1] {
        if !cursor.is_table() {
            *cursor = toml::Value::Table(Default::default());
        }
        let table = cursor.as_table_mut().unwrap();
        cursor = table
            .entry(segment.to_string())
            .or_insert_with(|| toml::Value::Table(Default::default()));
    }
    if !cursor.is_table() {
        *cursor = toml::Value::Table(Default::default());
    }
    cursor
        .as_table_mut()
        .unwrap()
        .insert(segments[segments.len() - 1].to_string(), leaf);
}

/// Cross-field sanity checks the schema alone can't express.
fn validate(config: &Config) -> ConfigResult<()> {
    use crate::schema::GitPlatform;

    match config.git.platform {
        GitPlatform::HostedA | GitPlatform::HostedB | GitPlatform::Enterprise => {
            if config.git.token.as_deref().unwrap_or("").is_empty() {
                return Err(ConfigError::MissingCredential {
                    key: "git.token".to_string(),
                    reason: "required for hosted/enterprise providers".to_string(),
                });
            }
        }
        GitPlatform::LocalClone => {}
    }

    if config.thresholds.churn_rate_warning > config.thresholds.churn_rate_danger {
        return Err(ConfigError::MalformedThreshold {
            key: "thresholds.churn_rate_warning".to_string(),
            reason: "must not exceed churn_rate_danger".to_string(),
        });
    }
    if config.thresholds.rework_rate_warning > config.thresholds.rework_rate_danger {
        return Err(ConfigError::MalformedThreshold {
            key: "thresholds.rework_rate_warning".to_string(),
            reason: "must not exceed rework_rate_danger".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_minimal_config_with_defaults() {
        let f = write_toml(
            r#"
            [git]
            platform = "localClone"
            "#,
        );
        let cfg = load_with_env(f.path(), |_| None).unwrap();
        assert_eq!(cfg.project.name, "project");
        assert_eq!(cfg.thresholds.large_commit, 500);
    }

    #[test]
    fn env_substitution_fills_token() {
        let f = write_toml(
            r#"
            [git]
            platform = "hostedA"
            token = "${GIT_TOKEN}"
            "#,
        );
        let mut env = HashMap::new();
        env.insert("GIT_TOKEN".to_string(), "secret123".to_string());
        let cfg = load_with_env(f.path(), |k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.git.token.as_deref(), Some("secret123"));
    }

    #[test]
    fn env_override_beats_file_value() {
        let f = write_toml(
            r#"
            [git]
            platform = "localClone"

            [thresholds]
            large_commit = 100
            "#,
        );
        let mut env = HashMap::new();
        env.insert("THRESHOLDS_LARGE_COMMIT".to_string(), "777".to_string());
        let cfg = load_with_env(f.path(), |k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.thresholds.large_commit, 777);
    }

    #[test]
    fn missing_token_for_hosted_platform_is_fatal() {
        let f = write_toml(
            r#"
            [git]
            platform = "hostedA"
            "#,
        );
        assert!(load_with_env(f.path(), |_| None).is_err());
    }
}
