//! Deserialized shape of `code-health.toml`, matching spec §6 exactly.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    pub git: GitConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub working_hours: WorkingHours,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
        }
    }
}

fn default_project_name() -> String {
    "project".to_string()
}

/// Provider variant selector; `git.platform` in spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GitPlatform {
    HostedA,
    HostedB,
    Enterprise,
    LocalClone,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitConfig {
    pub platform: GitPlatform,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub enterprise_org_id: Option<String>,
    #[serde(default)]
    pub enterprise_project: Option<String>,
}

/// All numeric constants used by the analyzers. Defaults are conservative
/// values observed in the original implementation's own defaults module.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub large_commit: u32,
    pub tiny_commit: u32,
    pub churn_days: u32,
    pub churn_count: u32,
    pub churn_rate_warning: f64,
    pub churn_rate_danger: f64,
    pub rework_add_days: u32,
    pub rework_delete_days: u32,
    pub rework_rate_warning: f64,
    pub rework_rate_danger: f64,
    pub hotspot_days: u32,
    pub hotspot_count: u32,
    pub large_file: u32,
    pub multi_author_count: u32,
    pub health_score_excellent: u8,
    pub health_score_good: u8,
    pub health_score_warning: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            large_commit: 500,
            tiny_commit: 10,
            churn_days: 14,
            churn_count: 5,
            churn_rate_warning: 10.0,
            churn_rate_danger: 30.0,
            rework_add_days: 7,
            rework_delete_days: 3,
            rework_rate_warning: 15.0,
            rework_rate_danger: 30.0,
            hotspot_days: 7,
            hotspot_count: 10,
            large_file: 1000,
            multi_author_count: 3,
            health_score_excellent: 80,
            health_score_good: 60,
            health_score_warning: 40,
        }
    }
}

/// `HH:MM` wall-clock boundaries; `late_night` may cross midnight and must
/// be tested with modular-arithmetic membership, never a half-open range.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkingHours {
    pub normal_start: String,
    pub normal_end: String,
    pub overtime_start: String,
    pub overtime_end: String,
    pub late_night_start: String,
    pub late_night_end: String,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            normal_start: "09:00".to_string(),
            normal_end: "18:00".to_string(),
            overtime_start: "18:00".to_string(),
            overtime_end: "21:00".to_string(),
            late_night_start: "22:00".to_string(),
            late_night_end: "06:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub repo_type: Option<String>,
    #[serde(default)]
    pub main_branch: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}
