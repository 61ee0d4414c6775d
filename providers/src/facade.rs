//! `GitProvider`: the single enum-dispatch facade over all four transports.
//!
//! Modeled directly on `git-context-engine::git_providers::ProviderClient`,
//! which wraps GitLab/GitHub/Bitbucket behind one enum rather than a trait
//! object.

use chrono::{DateTime, FixedOffset};
use commit_model::{Commit, Repository};
use config::{GitConfig, GitPlatform};
use tracing::{debug, instrument};

use crate::enterprise::EnterpriseApiClient;
use crate::errors::{ProviderError, ProviderResult};
use crate::hosted_a::HostedApiAClient;
use crate::hosted_b::HostedApiBClient;
use crate::local_clone::LocalCloneClient;

/// Default shallow-clone depth for `LocalClone`, per spec §4.1.d.
pub const DEFAULT_SHALLOW_DEPTH: u32 = 1000;

#[derive(Debug)]
pub enum GitProvider {
    HostedA(HostedApiAClient),
    HostedB(HostedApiBClient),
    Enterprise(EnterpriseApiClient),
    LocalClone(LocalCloneClient),
}

impl GitProvider {
    /// Constructs a concrete provider from configuration. Authentication
    /// misconfiguration is fatal here, not per-call, per the error-handling
    /// design: a missing token for a hosted/enterprise provider fails the
    /// whole run before any network activity.
    #[instrument(skip(cfg))]
    pub fn from_config(cfg: &GitConfig) -> ProviderResult<Self> {
        debug!(platform = ?cfg.platform, "constructing provider client");

        match cfg.platform {
            GitPlatform::HostedA | GitPlatform::HostedB | GitPlatform::Enterprise => {
                if cfg.token.as_deref().unwrap_or("").is_empty() {
                    return Err(ProviderError::MissingToken);
                }
            }
            GitPlatform::LocalClone => {}
        }

        let http = reqwest::Client::builder()
            .user_agent("code-health/0.1")
            .build()?;

        let provider = match cfg.platform {
            GitPlatform::HostedA => GitProvider::HostedA(HostedApiAClient::new(
                http,
                cfg.base_url.clone().unwrap_or_else(|| "https://api.github.com".to_string()),
                cfg.token.clone().unwrap_or_default(),
                cfg.org.clone(),
            )),
            GitPlatform::HostedB => GitProvider::HostedB(HostedApiBClient::new(
                http,
                cfg.base_url.clone().unwrap_or_else(|| "https://gitlab.com/api/v4".to_string()),
                cfg.token.clone().unwrap_or_default(),
                cfg.org.clone(),
            )),
            GitPlatform::Enterprise => GitProvider::Enterprise(EnterpriseApiClient::new(
                http,
                cfg.base_url
                    .clone()
                    .ok_or_else(|| ProviderError::InvalidBaseUrl("git.base_url is required for enterprise".into()))?,
                cfg.token.clone().unwrap_or_default(),
                cfg.enterprise_org_id.clone(),
                cfg.enterprise_project.clone(),
            )),
            GitPlatform::LocalClone => {
                GitProvider::LocalClone(LocalCloneClient::new(DEFAULT_SHALLOW_DEPTH, cfg.token.clone())?)
            }
        };

        Ok(provider)
    }

    pub async fn list_repositories(&self) -> ProviderResult<Vec<Repository>> {
        match self {
            GitProvider::HostedA(c) => c.list_repositories().await,
            GitProvider::HostedB(c) => c.list_repositories().await,
            GitProvider::Enterprise(c) => c.list_repositories().await,
            // LocalClone has no enumeration API of its own; repositories are
            // supplied directly by `config.repositories` instead.
            GitProvider::LocalClone(_) => Ok(Vec::new()),
        }
    }

    pub async fn get_commits(
        &self,
        repo: &Repository,
        since: DateTime<FixedOffset>,
        until: Option<DateTime<FixedOffset>>,
        branch: &str,
    ) -> ProviderResult<Vec<Commit>> {
        match self {
            GitProvider::HostedA(c) => c.get_commits(&repo.id, since, until, branch).await,
            GitProvider::HostedB(c) => c.get_commits(&repo.id, since, until, branch).await,
            GitProvider::Enterprise(c) => c.get_commits(&repo.id, since, until, branch).await,
            GitProvider::LocalClone(c) => c.get_commits(&repo.id, &repo.clone_url, since, until, branch).await,
        }
    }

    pub async fn get_file_content(
        &self,
        repo: &Repository,
        path: &str,
        git_ref: &str,
    ) -> ProviderResult<Option<String>> {
        match self {
            GitProvider::HostedA(c) => c.get_file_content(&repo.id, path, git_ref).await,
            GitProvider::HostedB(c) => c.get_file_content(&repo.id, path, git_ref).await,
            GitProvider::Enterprise(_) => Err(ProviderError::Unsupported),
            GitProvider::LocalClone(c) => c.get_file_content(&repo.id, &repo.clone_url, path, git_ref).await,
        }
    }

    /// Default is splitlines of content; no variant currently has a
    /// cheaper native line-count endpoint to override this with.
    pub fn get_file_line_count(&self, content: &str) -> u32 {
        content.lines().count() as u32
    }

    /// Default implementation: filter `get_commits` results by path. No
    /// provider variant currently exposes a cheaper native per-file history
    /// endpoint, so this is always the path taken.
    pub async fn get_file_history(
        &self,
        repo: &Repository,
        path: &str,
        since: DateTime<FixedOffset>,
        until: Option<DateTime<FixedOffset>>,
    ) -> ProviderResult<Vec<Commit>> {
        let commits = self.get_commits(repo, since, until, "all").await?;
        Ok(commits
            .into_iter()
            .filter(|c| c.files.iter().any(|f| f.path == path))
            .collect())
    }

    /// Releases any scoped resources. Must be called exactly once per run;
    /// guaranteed to run on both success and failure paths by the caller
    /// (typically inside a `Drop`-adjacent guard in the CLI binary).
    pub fn cleanup(self) -> ProviderResult<()> {
        match self {
            GitProvider::LocalClone(c) => c.cleanup(),
            _ => Ok(()),
        }
    }
}
