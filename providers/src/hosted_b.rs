//! HostedApiB: GitLab-like REST API.
//!
//! * Authentication: `PRIVATE-TOKEN` header.
//! * Commit listing: `all=true` fuses branches, `with_stats=true` yields
//!   totals only (no per-file split).
//! * A second request (`commits/{id}/diff`) returns the file list without
//!   counts; totals are distributed evenly across files, or a synthetic
//!   `(unknown)` file is emitted when there are none.
//! * Repository type is inferred from the project path (no language field).

use chrono::{DateTime, FixedOffset, Utc};
use commit_model::{dedup_by_hash, sort_commits_desc, Commit, FileChange, RepoType, Repository};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::errors::ProviderResult;

const PAGE_SIZE: u32 = 100;
const MAX_PAGES: u32 = 10;

#[derive(Debug, Clone)]
pub struct HostedApiBClient {
    http: Client,
    base_api: String,
    token: String,
    org: Option<String>,
}

impl HostedApiBClient {
    pub fn new(http: Client, base_api: String, token: String, org: Option<String>) -> Self {
        Self {
            http,
            base_api,
            token,
            org,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_repositories(&self) -> ProviderResult<Vec<Repository>> {
        let url = match &self.org {
            Some(group) => format!("{}/groups/{}/projects", self.base_api, urlencoding::encode(group)),
            None => format!("{}/projects", self.base_api),
        };

        let mut repos = Vec::new();
        for page in 1..=MAX_PAGES {
            debug!(page, "fetching project page");
            let resp: Vec<RawProject> = self
                .http
                .get(&url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(&[
                    ("per_page", PAGE_SIZE.to_string()),
                    ("page", page.to_string()),
                    ("membership", "true".to_string()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if resp.is_empty() {
                break;
            }

            repos.extend(resp.into_iter().map(|p| Repository {
                repo_type: RepoType::from_name(&p.path_with_namespace),
                id: p.id.to_string(),
                display_name: p.path_with_namespace,
                clone_url: p.http_url_to_repo,
                default_branch: p.default_branch.unwrap_or_else(|| "main".to_string()),
                archived: p.archived,
            }));
        }

        Ok(repos)
    }

    #[instrument(skip(self))]
    pub async fn get_commits(
        &self,
        repo_id: &str,
        since: DateTime<FixedOffset>,
        until: Option<DateTime<FixedOffset>>,
        branch: &str,
    ) -> ProviderResult<Vec<Commit>> {
        let base_url = format!(
            "{}/projects/{}/repository/commits",
            self.base_api,
            urlencoding::encode(repo_id)
        );
        let since_iso = since.with_timezone(&Utc).to_rfc3339();
        let until_iso = until.map(|u| u.with_timezone(&Utc).to_rfc3339());

        let mut summaries = Vec::new();
        for page in 1..=MAX_PAGES {
            let mut query = vec![
                ("per_page".to_string(), PAGE_SIZE.to_string()),
                ("page".to_string(), page.to_string()),
                ("since".to_string(), since_iso.clone()),
                ("with_stats".to_string(), "true".to_string()),
            ];
            if branch == "all" {
                query.push(("all".to_string(), "true".to_string()));
            } else {
                query.push(("ref_name".to_string(), branch.to_string()));
            }
            if let Some(until_iso) = &until_iso {
                query.push(("until".to_string(), until_iso.clone()));
            }

            debug!(page, repo_id, "fetching commit list page");
            let resp: Vec<RawCommit> = self
                .http
                .get(&base_url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(&query)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if resp.is_empty() {
                break;
            }
            summaries.extend(resp);
        }

        let mut commits = Vec::with_capacity(summaries.len());
        for raw in summaries {
            match self.resolve_files(repo_id, &raw).await {
                Ok(files) => commits.push(raw.into_commit(files)),
                Err(err) => warn!(repo_id, sha = %raw.id, %err, "falling back to synthetic file after diff fetch failure"),
            }
        }

        let mut commits = dedup_by_hash(commits);
        sort_commits_desc(&mut commits);
        Ok(commits)
    }

    /// `with_stats=true` only yields commit totals, never a per-file split.
    /// This fetches the file list (no counts) from the diff endpoint and
    /// distributes the totals evenly; if the diff is empty the totals are
    /// collapsed into a single synthetic `(unknown)` file.
    async fn resolve_files(&self, repo_id: &str, raw: &RawCommit) -> ProviderResult<Vec<FileChange>> {
        let url = format!(
            "{}/projects/{}/repository/commits/{}/diff",
            self.base_api,
            urlencoding::encode(repo_id),
            raw.id
        );
        let files: Vec<RawDiffFile> = self
            .http
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let total_added = raw.stats.as_ref().map(|s| s.additions).unwrap_or(0);
        let total_deleted = raw.stats.as_ref().map(|s| s.deletions).unwrap_or(0);

        if files.is_empty() {
            return Ok(vec![FileChange::unknown(total_added, total_deleted)]);
        }

        let count = files.len() as u32;
        let added_share = total_added / count;
        let added_remainder = total_added % count;
        let deleted_share = total_deleted / count;
        let deleted_remainder = total_deleted % count;

        Ok(files
            .into_iter()
            .enumerate()
            .map(|(i, f)| {
                let path = f.new_path.unwrap_or(f.old_path.unwrap_or_default());
                let extra_added = if (i as u32) < added_remainder { 1 } else { 0 };
                let extra_deleted = if (i as u32) < deleted_remainder { 1 } else { 0 };
                FileChange::new(path, added_share + extra_added, deleted_share + extra_deleted)
            })
            .collect())
    }

    pub async fn get_file_content(
        &self,
        repo_id: &str,
        path: &str,
        git_ref: &str,
    ) -> ProviderResult<Option<String>> {
        let url = format!(
            "{}/projects/{}/repository/files/{}/raw",
            self.base_api,
            urlencoding::encode(repo_id),
            urlencoding::encode(path)
        );
        let resp = self
            .http
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("ref", git_ref)])
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        let text = resp.error_for_status()?.text().await?;
        Ok(Some(text))
    }
}

#[derive(Debug, Deserialize)]
struct RawProject {
    id: u64,
    path_with_namespace: String,
    http_url_to_repo: String,
    default_branch: Option<String>,
    archived: bool,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    id: String,
    author_name: String,
    #[serde(default)]
    author_email: String,
    created_at: DateTime<FixedOffset>,
    title: String,
    #[serde(default)]
    stats: Option<RawStats>,
}

impl RawCommit {
    fn into_commit(self, files: Vec<FileChange>) -> Commit {
        Commit {
            hash: self.id,
            author_name: self.author_name,
            author_email: self.author_email,
            timestamp: self.created_at,
            message: self.title,
            files,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStats {
    additions: u32,
    deletions: u32,
}

#[derive(Debug, Deserialize)]
struct RawDiffFile {
    #[serde(default)]
    old_path: Option<String>,
    #[serde(default)]
    new_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: String) -> HostedApiBClient {
        HostedApiBClient::new(Client::new(), base, "tok".to_string(), None)
    }

    #[tokio::test]
    async fn list_repositories_infers_type_from_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 42,
                "path_with_namespace": "acme/widgets",
                "http_url_to_repo": "https://example.com/acme/widgets.git",
                "default_branch": "main",
                "archived": false,
            }])))
            .mount(&server)
            .await;

        let repos = client(server.uri()).list_repositories().await.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].id, "42");
    }

    #[tokio::test]
    async fn get_commits_distributes_stats_evenly_across_diff_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/42/repository/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": "abc123",
                "author_name": "Ada",
                "author_email": "ada@example.com",
                "created_at": "2024-01-02T03:04:05Z",
                "title": "fix: tighten bounds",
                "stats": {"additions": 10, "deletions": 2},
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects/42/repository/commits/abc123/diff"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"old_path": "src/a.rs", "new_path": "src/a.rs"},
                {"old_path": "src/b.rs", "new_path": "src/b.rs"},
            ])))
            .mount(&server)
            .await;

        let since = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let commits = client(server.uri()).get_commits("42", since, None, "all").await.unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].files.len(), 2);
        let total_added: u32 = commits[0].files.iter().map(|f| f.added).sum();
        assert_eq!(total_added, 10);
    }

    #[tokio::test]
    async fn get_commits_falls_back_to_synthetic_file_when_diff_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/42/repository/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": "abc123",
                "author_name": "Ada",
                "author_email": "ada@example.com",
                "created_at": "2024-01-02T03:04:05Z",
                "title": "chore: bump",
                "stats": {"additions": 1, "deletions": 0},
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects/42/repository/commits/abc123/diff"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let since = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let commits = client(server.uri()).get_commits("42", since, None, "all").await.unwrap();
        assert_eq!(commits[0].files.len(), 1);
        assert_eq!(commits[0].files[0].added, 1);
    }
}
