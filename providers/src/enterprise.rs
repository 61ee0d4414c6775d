//! EnterpriseApi: custom token-header dialect with per-branch pagination
//! and a four-fallback per-commit diff strategy.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use commit_model::{sort_commits_desc, Commit, FileChange, RepoType, Repository};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::errors::ProviderResult;

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct EnterpriseApiClient {
    http: Client,
    base_api: String,
    token: String,
    org_id: Option<String>,
    /// Only repositories whose path contains this fragment (case-insensitive)
    /// are listed.
    namespace_filter: Option<String>,
}

impl EnterpriseApiClient {
    pub fn new(
        http: Client,
        base_api: String,
        token: String,
        org_id: Option<String>,
        namespace_filter: Option<String>,
    ) -> Self {
        Self {
            http,
            base_api,
            token,
            org_id,
            namespace_filter,
        }
    }

    fn header_name() -> &'static str {
        "X-Enterprise-Token"
    }

    #[instrument(skip(self))]
    pub async fn list_repositories(&self) -> ProviderResult<Vec<Repository>> {
        let url = match &self.org_id {
            Some(org_id) => format!("{}/orgs/{}/repositories", self.base_api, org_id),
            None => format!("{}/repositories", self.base_api),
        };

        let raw: Vec<RawRepo> = self
            .http
            .get(&url)
            .header(Self::header_name(), &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let filtered = raw.into_iter().filter(|r| match &self.namespace_filter {
            Some(fragment) => r.path.to_ascii_lowercase().contains(&fragment.to_ascii_lowercase()),
            None => true,
        });

        Ok(filtered
            .map(|r| Repository {
                repo_type: RepoType::from_name(&r.path),
                id: r.id,
                display_name: r.path,
                clone_url: r.clone_url,
                default_branch: r.default_branch,
                archived: r.archived,
            })
            .collect())
    }

    async fn list_branches(&self, repo_id: &str) -> ProviderResult<Vec<String>> {
        let url = format!("{}/repositories/{}/branches", self.base_api, repo_id);
        let raw: Vec<RawBranch> = self
            .http
            .get(&url)
            .header(Self::header_name(), &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(raw.into_iter().map(|b| b.name).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_commits(
        &self,
        repo_id: &str,
        since: DateTime<FixedOffset>,
        until: Option<DateTime<FixedOffset>>,
        branch: &str,
    ) -> ProviderResult<Vec<Commit>> {
        let branches = if branch == "all" {
            self.list_branches(repo_id).await?
        } else {
            vec![branch.to_string()]
        };

        let mut seen = HashSet::new();
        let mut commits = Vec::new();

        for branch in branches {
            let mut raw_commits = self.list_commits_on_branch(repo_id, &branch, since, until).await?;
            raw_commits.retain(|c| seen.insert(c.sha.clone()));

            for raw in raw_commits {
                match self.fetch_commit_files(repo_id, &raw.sha).await {
                    Ok((files, fallback)) => {
                        debug!(sha = %raw.sha, fallback, "resolved commit files");
                        commits.push(raw.into_commit(files));
                    }
                    Err(err) => warn!(repo_id, sha = %raw.sha, %err, "skipping commit after all fallbacks failed"),
                }
            }
        }

        sort_commits_desc(&mut commits);
        Ok(commits)
    }

    /// Stops pagination early once the oldest commit in a page falls below
    /// `since`, rather than always walking to the API's own end-of-history.
    async fn list_commits_on_branch(
        &self,
        repo_id: &str,
        branch: &str,
        since: DateTime<FixedOffset>,
        until: Option<DateTime<FixedOffset>>,
    ) -> ProviderResult<Vec<RawCommitSummary>> {
        let url = format!("{}/repositories/{}/commits", self.base_api, repo_id);
        let mut page = 1u32;
        let mut out = Vec::new();

        loop {
            let mut query = vec![
                ("branch".to_string(), branch.to_string()),
                ("per_page".to_string(), PAGE_SIZE.to_string()),
                ("page".to_string(), page.to_string()),
            ];
            if let Some(until) = until {
                query.push(("until".to_string(), until.with_timezone(&Utc).to_rfc3339()));
            }

            debug!(page, branch, "fetching enterprise commit page");
            let resp: Vec<RawCommitSummary> = self
                .http
                .get(&url)
                .header(Self::header_name(), &self.token)
                .query(&query)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if resp.is_empty() {
                break;
            }

            let oldest_below_since = resp.last().map(|c| c.authored_at < since).unwrap_or(false);
            out.extend(resp.into_iter().filter(|c| c.authored_at >= since));

            if oldest_below_since {
                break;
            }
            page += 1;
        }

        Ok(out)
    }

    /// Four fallbacks, tried in order until one yields a nonempty result.
    /// The chosen fallback is returned alongside the files so callers can
    /// log which one produced the numbers, since different fallbacks can
    /// disagree on per-file counts for the same commit.
    async fn fetch_commit_files(
        &self,
        repo_id: &str,
        sha: &str,
    ) -> ProviderResult<(Vec<FileChange>, &'static str)> {
        if let Some(files) = self.fallback_embedded_diffs(repo_id, sha).await? {
            if !files.is_empty() {
                return Ok((files, "embedded_diffs"));
            }
        }
        if let Some(files) = self.fallback_diff_endpoint(repo_id, sha).await? {
            if !files.is_empty() {
                return Ok((files, "diff_endpoint"));
            }
        }
        if let Some(files) = self.fallback_compare_endpoint(repo_id, sha).await? {
            if !files.is_empty() {
                return Ok((files, "compare_endpoint"));
            }
        }
        let stats = self.fallback_stats_only(repo_id, sha).await?;
        Ok((vec![FileChange::unknown(stats.0, stats.1)], "stats_only"))
    }

    async fn fallback_embedded_diffs(
        &self,
        repo_id: &str,
        sha: &str,
    ) -> ProviderResult<Option<Vec<FileChange>>> {
        let url = format!("{}/repositories/{}/commits/{}", self.base_api, repo_id, sha);
        let resp: RawCommitDetail = self
            .http
            .get(&url)
            .header(Self::header_name(), &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.diffs.map(|diffs| {
            diffs
                .into_iter()
                .map(|d| FileChange::new(d.path, d.additions, d.deletions))
                .collect()
        }))
    }

    async fn fallback_diff_endpoint(
        &self,
        repo_id: &str,
        sha: &str,
    ) -> ProviderResult<Option<Vec<FileChange>>> {
        let url = format!("{}/repositories/{}/commits/{}/diff", self.base_api, repo_id, sha);
        let resp = self
            .http
            .get(&url)
            .header(Self::header_name(), &self.token)
            .send()
            .await?;
        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        let raw: Vec<RawDiffEntry> = resp.error_for_status()?.json().await?;
        Ok(Some(
            raw.into_iter()
                .map(|d| FileChange::new(d.path, d.additions, d.deletions))
                .collect(),
        ))
    }

    async fn fallback_compare_endpoint(
        &self,
        repo_id: &str,
        sha: &str,
    ) -> ProviderResult<Option<Vec<FileChange>>> {
        let url = format!(
            "{}/repositories/{}/compare/{}...{}",
            self.base_api, repo_id, "first-parent", sha
        );
        let resp = self
            .http
            .get(&url)
            .header(Self::header_name(), &self.token)
            .send()
            .await?;
        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        let raw: RawCompare = resp.error_for_status()?.json().await?;
        Ok(Some(
            raw.files
                .into_iter()
                .map(|d| FileChange::new(d.path, d.additions, d.deletions))
                .collect(),
        ))
    }

    async fn fallback_stats_only(&self, repo_id: &str, sha: &str) -> ProviderResult<(u32, u32)> {
        let url = format!("{}/repositories/{}/commits/{}/stats", self.base_api, repo_id, sha);
        let raw: RawStatsOnly = self
            .http
            .get(&url)
            .header(Self::header_name(), &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok((raw.additions, raw.deletions))
    }
}

#[derive(Debug, Deserialize)]
struct RawRepo {
    id: String,
    path: String,
    clone_url: String,
    default_branch: String,
    #[serde(default)]
    archived: bool,
}

#[derive(Debug, Deserialize)]
struct RawBranch {
    name: String,
}

#[derive(Debug, Deserialize, Clone)]
struct RawCommitSummary {
    sha: String,
    author_name: String,
    #[serde(default)]
    author_email: String,
    authored_at: DateTime<FixedOffset>,
    message: String,
}

impl RawCommitSummary {
    fn into_commit(self, files: Vec<FileChange>) -> Commit {
        Commit {
            hash: self.sha,
            author_name: self.author_name,
            author_email: self.author_email,
            timestamp: self.authored_at,
            message: self.message.lines().next().unwrap_or_default().to_string(),
            files,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCommitDetail {
    #[serde(default)]
    diffs: Option<Vec<RawDiffEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawDiffEntry {
    path: String,
    #[serde(default)]
    additions: u32,
    #[serde(default)]
    deletions: u32,
}

#[derive(Debug, Deserialize)]
struct RawCompare {
    files: Vec<RawDiffEntry>,
}

#[derive(Debug, Deserialize)]
struct RawStatsOnly {
    additions: u32,
    deletions: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: String) -> EnterpriseApiClient {
        EnterpriseApiClient::new(Client::new(), base, "tok".to_string(), None, None)
    }

    #[tokio::test]
    async fn list_repositories_applies_namespace_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repositories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "1", "path": "core/widgets", "clone_url": "https://example.com/core/widgets.git", "default_branch": "main", "archived": false},
                {"id": "2", "path": "sandbox/scratch", "clone_url": "https://example.com/sandbox/scratch.git", "default_branch": "main", "archived": false},
            ])))
            .mount(&server)
            .await;

        let c = EnterpriseApiClient::new(Client::new(), server.uri(), "tok".to_string(), None, Some("core".to_string()));
        let repos = c.list_repositories().await.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].display_name, "core/widgets");
    }

    #[tokio::test]
    async fn get_commits_falls_back_through_to_stats_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repositories/7/branches"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"name": "main"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repositories/7/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "sha": "deadbeef",
                "author_name": "Ada",
                "author_email": "ada@example.com",
                "authored_at": "2024-01-02T03:04:05Z",
                "message": "fix: tighten bounds",
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repositories/7/commits/deadbeef"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"diffs": null})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repositories/7/commits/deadbeef/diff"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repositories/7/compare/first-parent...deadbeef"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repositories/7/commits/deadbeef/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"additions": 3, "deletions": 1})))
            .mount(&server)
            .await;

        let since = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let commits = client(server.uri()).get_commits("7", since, None, "all").await.unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].files.len(), 1);
        assert_eq!(commits[0].files[0].path, "(unknown)");
        assert_eq!(commits[0].files[0].added, 3);
    }
}
