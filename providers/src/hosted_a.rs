//! HostedApiA: GitHub-like REST API.
//!
//! * Authentication: bearer token header.
//! * Commit listing paginates 100/page, capped at 10 pages per repo.
//! * Per-commit detail is a second request that yields per-file stats.
//! * Repository type is inferred from the upstream `language` field.

use chrono::{DateTime, FixedOffset, Utc};
use commit_model::{dedup_by_hash, sort_commits_desc, Commit, FileChange, RepoType, Repository};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::errors::ProviderResult;

const PAGE_SIZE: u32 = 100;
const MAX_PAGES: u32 = 10;

#[derive(Debug, Clone)]
pub struct HostedApiAClient {
    http: Client,
    base_api: String,
    token: String,
    org: Option<String>,
}

impl HostedApiAClient {
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
            Some(org) => format!("{}/orgs/{}/repos", self.base_api, urlencoding::encode(org)),
            None => format!("{}/user/repos", self.base_api),
        };

        let mut repos = Vec::new();
        for page in 1..=MAX_PAGES {
            debug!(page, "fetching repository page");
            let resp: Vec<RawRepo> = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if resp.is_empty() {
                break;
            }

            repos.extend(resp.into_iter().map(|r| Repository {
                repo_type: r
                    .language
                    .as_deref()
                    .map(RepoType::from_language)
                    .unwrap_or(RepoType::Unknown),
                id: r.id.to_string(),
                display_name: r.full_name,
                clone_url: r.clone_url,
                default_branch: r.default_branch,
                archived: r.archived,
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
        let base_url = format!("{}/repos/{}/commits", self.base_api, repo_id);
        let since_iso = since.with_timezone(&Utc).to_rfc3339();
        let until_iso = until.map(|u| u.with_timezone(&Utc).to_rfc3339());

        let mut shas = Vec::new();
        for page in 1..=MAX_PAGES {
            let mut query = vec![
                ("per_page".to_string(), PAGE_SIZE.to_string()),
                ("page".to_string(), page.to_string()),
                ("since".to_string(), since_iso.clone()),
            ];
            if let Some(until_iso) = &until_iso {
                query.push(("until".to_string(), until_iso.clone()));
            }
            if branch != "all" {
                query.push(("sha".to_string(), branch.to_string()));
            }

            debug!(page, repo_id, "fetching commit list page");
            let resp: Vec<RawCommitSummary> = self
                .http
                .get(&base_url)
                .bearer_auth(&self.token)
                .query(&query)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if resp.is_empty() {
                break;
            }
            shas.extend(resp.into_iter().map(|c| c.sha));
        }

        let mut commits = Vec::with_capacity(shas.len());
        for sha in shas {
            match self.get_commit_detail(repo_id, &sha).await {
                Ok(commit) => commits.push(commit),
                Err(err) => warn!(repo_id, sha, %err, "skipping commit detail after fetch failure"),
            }
        }

        let mut commits = dedup_by_hash(commits);
        sort_commits_desc(&mut commits);
        Ok(commits)
    }

    async fn get_commit_detail(&self, repo_id: &str, sha: &str) -> ProviderResult<Commit> {
        let url = format!("{}/repos/{}/commits/{}", self.base_api, repo_id, sha);
        let raw: RawCommitDetail = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let timestamp = raw.commit.author.date.with_timezone(&chrono::FixedOffset::east_opt(0).unwrap());
        let message = raw.commit.message.lines().next().unwrap_or_default().to_string();

        let files = if raw.files.is_empty() {
            vec![FileChange::unknown(raw.stats.additions, raw.stats.deletions)]
        } else {
            raw.files
                .into_iter()
                .map(|f| FileChange::new(f.filename, f.additions, f.deletions))
                .collect()
        };

        Ok(Commit {
            hash: raw.sha,
            author_name: raw.commit.author.name,
            author_email: raw.commit.author.email,
            timestamp,
            message,
            files,
        })
    }

    pub async fn get_file_content(
        &self,
        repo_id: &str,
        path: &str,
        git_ref: &str,
    ) -> ProviderResult<Option<String>> {
        let url = format!(
            "{}/repos/{}/contents/{}",
            self.base_api,
            repo_id,
            urlencoding::encode(path)
        );
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("ref", git_ref)])
            .header("Accept", "application/vnd.github.raw")
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
struct RawRepo {
    id: u64,
    full_name: String,
    clone_url: String,
    default_branch: String,
    archived: bool,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCommitSummary {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RawCommitDetail {
    sha: String,
    commit: RawCommitInner,
    #[serde(default)]
    files: Vec<RawCommitFile>,
    stats: RawCommitStats,
}

#[derive(Debug, Deserialize)]
struct RawCommitInner {
    author: RawCommitAuthor,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawCommitAuthor {
    name: String,
    email: String,
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawCommitFile {
    filename: String,
    #[serde(default)]
    additions: u32,
    #[serde(default)]
    deletions: u32,
}

#[derive(Debug, Deserialize, Default)]
struct RawCommitStats {
    #[serde(default)]
    additions: u32,
    #[serde(default)]
    deletions: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: String) -> HostedApiAClient {
        HostedApiAClient::new(Client::new(), base, "tok".to_string(), None)
    }

    #[tokio::test]
    async fn list_repositories_stops_at_first_short_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 1,
                "full_name": "acme/widgets",
                "clone_url": "https://example.com/acme/widgets.git",
                "default_branch": "main",
                "archived": false,
                "language": "Rust",
            }])))
            .mount(&server)
            .await;

        let repos = client(server.uri()).list_repositories().await.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].display_name, "acme/widgets");
        assert_eq!(repos[0].repo_type, RepoType::from_language("Rust"));
    }

    #[tokio::test]
    async fn get_commits_fetches_detail_per_sha() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"sha": "abc123"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/commits/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "abc123",
                "commit": {
                    "author": {"name": "Ada", "email": "ada@example.com", "date": "2024-01-02T03:04:05Z"},
                    "message": "fix: tighten bounds\n\nmore detail",
                },
                "files": [{"filename": "src/lib.rs", "additions": 5, "deletions": 1}],
                "stats": {"additions": 5, "deletions": 1},
            })))
            .mount(&server)
            .await;

        let since = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let commits = client(server.uri())
            .get_commits("acme/widgets", since, None, "all")
            .await
            .unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash, "abc123");
        assert_eq!(commits[0].message, "fix: tighten bounds");
    }

    #[tokio::test]
    async fn get_file_content_returns_none_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contents/missing.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let content = client(server.uri())
            .get_file_content("acme/widgets", "missing.txt", "main")
            .await
            .unwrap();
        assert!(content.is_none());
    }
}
