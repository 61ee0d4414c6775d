//! Shared report context and repository resolution.

use std::collections::HashSet;
use std::time::Duration;

use commit_model::{RepoType, Repository};
use config::{AnalysisConfig, RepositoryConfig, Thresholds, WorkingHours};
use providers::{GitProvider, ProviderResult};

use crate::fetch::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};

/// Everything a reporter needs besides the provider itself: thresholds,
/// working-hours boundaries, exclusion rules, and the concurrency/timeout
/// knobs for the fetch stage (spec §5).
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub project_name: String,
    pub thresholds: Thresholds,
    pub working_hours: WorkingHours,
    pub analysis: AnalysisConfig,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl ReportContext {
    pub fn new(
        project_name: impl Into<String>,
        thresholds: Thresholds,
        working_hours: WorkingHours,
        analysis: AnalysisConfig,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            thresholds,
            working_hours,
            analysis,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Resolves the set of repositories a reporter should fetch: calls
/// `provider.list_repositories()`, falls back to constructing repositories
/// directly from `repo_configs` when the provider has no enumeration API of
/// its own (`LocalClone`), and applies the configured allow-list of names,
/// URLs, or ids when one is present.
pub async fn resolve_repositories(
    provider: &GitProvider,
    repo_configs: &[RepositoryConfig],
) -> ProviderResult<Vec<Repository>> {
    let mut repos = provider.list_repositories().await?;

    if repos.is_empty() && !repo_configs.is_empty() {
        repos = repo_configs.iter().map(repo_from_config).collect();
    }

    if !repo_configs.is_empty() {
        let allow: HashSet<String> = repo_configs
            .iter()
            .flat_map(|r| {
                let mut keys = vec![r.name.clone(), r.url.clone()];
                if let Some(id) = &r.id {
                    keys.push(id.clone());
                }
                keys
            })
            .collect();
        repos.retain(|r| allow.contains(&r.id) || allow.contains(&r.display_name) || allow.contains(&r.clone_url));
    }

    Ok(repos)
}

fn repo_from_config(cfg: &RepositoryConfig) -> Repository {
    let repo_type = cfg
        .repo_type
        .as_deref()
        .map(|t| RepoType::from_name(t))
        .unwrap_or_else(|| RepoType::from_name(&cfg.name));

    Repository::new(
        cfg.id.clone().unwrap_or_else(|| cfg.name.clone()),
        cfg.name.clone(),
        cfg.url.clone(),
        cfg.main_branch.clone().unwrap_or_else(|| "main".to_string()),
        repo_type,
        false,
    )
}
