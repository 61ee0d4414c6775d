//! Commit and per-file change value types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single file touched by a commit, with line-level stats.
///
/// `added` and `deleted` are always nonnegative; an upstream diff that
/// cannot be measured (binary file, API without per-file granularity) is
/// represented as the synthetic path `(unknown)` carrying the commit's
/// total instead of a real path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub added: u32,
    pub deleted: u32,
}

impl FileChange {
    pub fn new(path: impl Into<String>, added: u32, deleted: u32) -> Self {
        Self {
            path: path.into(),
            added,
            deleted,
        }
    }

    /// Synthetic placeholder used when a provider cannot attribute stats to
    /// individual files (binary diffs, stats-only API responses).
    pub fn unknown(added: u32, deleted: u32) -> Self {
        Self::new("(unknown)", added, deleted)
    }

    /// `added - deleted`, may be negative.
    pub fn net(&self) -> i64 {
        i64::from(self.added) - i64::from(self.deleted)
    }
}

/// A single commit, uniform across all provider transports.
///
/// Equality and hashing are by `hash` alone: two `Commit` values with the
/// same hash are considered the same commit regardless of which branch or
/// provider call produced them, which is what the dedup invariant in the
/// commit model relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<FixedOffset>,
    /// First line of the commit message only.
    pub message: String,
    pub files: Vec<FileChange>,
}

impl Commit {
    pub fn lines_added(&self) -> u32 {
        self.files.iter().map(|f| f.added).sum()
    }

    pub fn lines_deleted(&self) -> u32 {
        self.files.iter().map(|f| f.deleted).sum()
    }

    pub fn net_lines(&self) -> i64 {
        self.files.iter().map(FileChange::net).sum()
    }

    pub fn total_lines_changed(&self) -> u32 {
        self.lines_added() + self.lines_deleted()
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Commit {}

impl std::hash::Hash for Commit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

/// Commit ordering used whenever a provider or reporter presents a
/// sequence: descending by timestamp, ties broken by hash ascending for
/// stability.
pub fn sort_commits_desc(commits: &mut [Commit]) {
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.hash.cmp(&b.hash)));
}

/// Removes duplicate commits (by hash) keeping the first occurrence,
/// matching the "union of all branches, dedup by hash" invariant.
pub fn dedup_by_hash(commits: Vec<Commit>) -> Vec<Commit> {
    let mut seen = std::collections::HashSet::with_capacity(commits.len());
    commits
        .into_iter()
        .filter(|c| seen.insert(c.hash.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn commit(hash: &str, ts: i64) -> Commit {
        Commit {
            hash: hash.to_string(),
            author_name: "a".into(),
            author_email: "a@example.com".into(),
            timestamp: FixedOffset::east_opt(0)
                .unwrap()
                .timestamp_opt(ts, 0)
                .unwrap(),
            message: "msg".into(),
            files: vec![FileChange::new("f.rs", 3, 1)],
        }
    }

    #[test]
    fn net_lines_sums_file_changes() {
        let c = commit("abc", 0);
        assert_eq!(c.net_lines(), 2);
        assert_eq!(c.lines_added(), 3);
        assert_eq!(c.lines_deleted(), 1);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let commits = vec![commit("abc", 10), commit("abc", 20), commit("def", 5)];
        let deduped = dedup_by_hash(commits);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].timestamp.timestamp(), 10);
    }

    #[test]
    fn sort_desc_breaks_ties_by_hash() {
        let mut commits = vec![commit("zzz", 10), commit("aaa", 10)];
        sort_commits_desc(&mut commits);
        assert_eq!(commits[0].hash, "aaa");
        assert_eq!(commits[1].hash, "zzz");
    }

    #[test]
    fn unknown_file_carries_totals() {
        let f = FileChange::unknown(12, 4);
        assert_eq!(f.path, "(unknown)");
        assert_eq!(f.net(), 8);
    }
}
