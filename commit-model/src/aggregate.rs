//! Per-author and per-repository aggregates built by reporters for a window.

use std::collections::{BTreeMap, BTreeSet};

use crate::commit::Commit;
use crate::repository::RepoType;

/// Totals for a single author within a report window.
///
/// An aggregate built from an empty commit set has every numeric field at
/// zero and every collection empty, per the commit-model invariants.
#[derive(Debug, Clone, Default)]
pub struct AuthorAggregate {
    pub name: String,
    pub commit_count: u32,
    pub added: u64,
    pub deleted: u64,
    pub net: i64,
    pub file_count: u32,
    pub repos: BTreeSet<String>,
    pub languages: BTreeMap<RepoType, u32>,
}

impl AuthorAggregate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn record(&mut self, commit: &Commit, repo_id: &str, repo_type: RepoType) {
        self.commit_count += 1;
        self.added += u64::from(commit.lines_added());
        self.deleted += u64::from(commit.lines_deleted());
        self.net += commit.net_lines();
        self.file_count += commit.files.len() as u32;
        self.repos.insert(repo_id.to_string());
        *self.languages.entry(repo_type).or_insert(0) += 1;
    }
}

/// Totals for a single repository within a report window.
#[derive(Debug, Clone, Default)]
pub struct RepoAggregate {
    pub repo_id: String,
    pub commit_count: u32,
    pub added: u64,
    pub deleted: u64,
    pub authors: BTreeSet<String>,
}

impl RepoAggregate {
    pub fn new(repo_id: impl Into<String>) -> Self {
        Self {
            repo_id: repo_id.into(),
            ..Default::default()
        }
    }

    fn record(&mut self, commit: &Commit) {
        self.commit_count += 1;
        self.added += u64::from(commit.lines_added());
        self.deleted += u64::from(commit.lines_deleted());
        self.authors.insert(commit.author_name.clone());
    }
}

/// Builds per-author and per-repository aggregates from commits grouped by
/// the repository they were fetched from.
pub fn build_aggregates<'a>(
    per_repo: impl IntoIterator<Item = (&'a str, RepoType, &'a [Commit])>,
) -> (BTreeMap<String, AuthorAggregate>, BTreeMap<String, RepoAggregate>) {
    let mut by_author: BTreeMap<String, AuthorAggregate> = BTreeMap::new();
    let mut by_repo: BTreeMap<String, RepoAggregate> = BTreeMap::new();

    for (repo_id, repo_type, commits) in per_repo {
        for commit in commits {
            by_author
                .entry(commit.author_name.clone())
                .or_insert_with(|| AuthorAggregate::new(commit.author_name.clone()))
                .record(commit, repo_id, repo_type);

            by_repo
                .entry(repo_id.to_string())
                .or_insert_with(|| RepoAggregate::new(repo_id))
                .record(commit);
        }
    }

    (by_author, by_repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_commit_set_yields_zeroed_aggregate() {
        let agg = AuthorAggregate::new("nobody");
        assert_eq!(agg.commit_count, 0);
        assert_eq!(agg.added, 0);
        assert!(agg.repos.is_empty());
    }
}
