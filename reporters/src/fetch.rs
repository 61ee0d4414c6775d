//! Bounded concurrent per-repository commit fetch.
//!
//! Grounded on `project_code_store::clone_list`'s `Semaphore`-gated fan-out:
//! generalized from "clone N repos" to "fetch commits for N repos", with a
//! `tokio::time::timeout` per request in place of a blocking clone.

use std::sync::Arc;
use std::time::Duration;

use commit_model::{sort_commits_desc, Commit, Repository, TimeWindow};
use providers::GitProvider;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{instrument, warn};

/// Default ceiling on concurrent outbound requests, per spec §5.
pub const DEFAULT_CONCURRENCY: usize = 4;
/// Default per-request timeout, per spec §5.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of fetching commits for a set of repositories: per-repository
/// failures never abort the run, they are isolated and surfaced as
/// warnings (spec §4.1 failure semantics).
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub per_repo: Vec<(Repository, Vec<Commit>)>,
    pub warnings: Vec<String>,
}

/// Fetches commits in `window` for every repository in `repos`, bounded to
/// `concurrency` in-flight requests and `timeout` per request. Output is
/// sorted by repository id for deterministic downstream processing.
#[instrument(skip(provider, repos), fields(repos = repos.len(), concurrency))]
pub async fn fetch_all(
    provider: Arc<GitProvider>,
    repos: Vec<Repository>,
    window: TimeWindow,
    concurrency: usize,
    timeout: Duration,
) -> FetchOutcome {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for repo in repos {
        let provider = Arc::clone(&provider);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed during a run");
            let result = tokio::time::timeout(
                timeout,
                provider.get_commits(&repo, window.start, Some(window.end), "all"),
            )
            .await;
            (repo, result)
        });
    }

    let mut outcome = FetchOutcome::default();
    while let Some(joined) = tasks.join_next().await {
        let (repo, result) = match joined {
            Ok(pair) => pair,
            Err(join_err) => {
                warn!(error = %join_err, "repository fetch task panicked");
                outcome
                    .warnings
                    .push(format!("internal error fetching commits: {join_err}"));
                continue;
            }
        };

        match result {
            Ok(Ok(mut commits)) => {
                sort_commits_desc(&mut commits);
                outcome.per_repo.push((repo, commits));
            }
            Ok(Err(err)) => {
                warn!(repo = %repo.id, error = %err, "provider call failed, skipping repository");
                outcome.warnings.push(format!("{}: {err}", repo.display_name));
                outcome.per_repo.push((repo, Vec::new()));
            }
            Err(_elapsed) => {
                warn!(repo = %repo.id, timeout_secs = timeout.as_secs(), "provider call timed out");
                outcome.warnings.push(format!("{}: timed out", repo.display_name));
                outcome.per_repo.push((repo, Vec::new()));
            }
        }
    }

    outcome.per_repo.sort_by(|a, b| a.0.id.cmp(&b.0.id));
    outcome
}
