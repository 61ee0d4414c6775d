//! ReworkAnalyzer: added lines that are deleted again within a short
//! follow-on window measure throwaway work.

use std::collections::HashMap;

use chrono::Duration;
use commit_model::Commit;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReworkResult {
    pub total_rework_lines: u64,
    pub total_added_lines: u64,
    /// Clamped to [0, 100] for display; `total_rework_lines` preserves the
    /// raw (possibly rate-exceeding-100%) count.
    pub rate: f64,
}

struct Change<'a> {
    timestamp: chrono::DateTime<chrono::FixedOffset>,
    added: u32,
    deleted: u32,
    #[allow(dead_code)]
    commit_hash: &'a str,
}

/// `commits` should already be restricted to the analysis period; this
/// function does not itself bound by `add_window_days` beyond filtering
/// candidate pairs; callers typically pre-filter to `add_window_days` plus
/// slack for the trailing `delete_window_days`.
pub fn analyze(commits: &[Commit], add_window_days: i64, delete_window_days: i64) -> ReworkResult {
    let mut by_file: HashMap<&str, Vec<Change<'_>>> = HashMap::new();
    for commit in commits {
        for file in &commit.files {
            by_file.entry(file.path.as_str()).or_default().push(Change {
                timestamp: commit.timestamp,
                added: file.added,
                deleted: file.deleted,
                commit_hash: &commit.hash,
            });
        }
    }

    let add_window = Duration::days(add_window_days);
    let delete_window = Duration::days(delete_window_days);

    let mut total_rework: u64 = 0;
    let mut total_added: u64 = 0;

    for changes in by_file.values_mut() {
        changes.sort_by_key(|c| c.timestamp);
        let earliest = changes.first().map(|c| c.timestamp);

        for (i, change_i) in changes.iter().enumerate() {
            if let Some(earliest) = earliest {
                if change_i.timestamp - earliest > add_window {
                    continue;
                }
            }
            total_added += u64::from(change_i.added);

            for change_j in changes.iter().skip(i + 1) {
                if change_j.timestamp - change_i.timestamp > delete_window {
                    continue;
                }
                total_rework += u64::from(change_i.added.min(change_j.deleted));
            }
        }
    }

    let rate = if total_added == 0 {
        0.0
    } else {
        ((total_rework as f64 / total_added as f64) * 100.0).min(100.0)
    };

    ReworkResult {
        total_rework_lines: total_rework,
        total_added_lines: total_added,
        rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use commit_model::FileChange;

    fn commit(hash: &str, day: u32, path: &str, added: u32, deleted: u32) -> Commit {
        Commit {
            hash: hash.to_string(),
            author_name: "A".into(),
            author_email: "a@example.com".into(),
            timestamp: FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap(),
            message: "m".into(),
            files: vec![FileChange::new(path, added, deleted)],
        }
    }

    #[test]
    fn empty_added_yields_zero_rate() {
        let result = analyze(&[], 7, 3);
        assert_eq!(result.total_added_lines, 0);
        assert_eq!(result.rate, 0.0);
    }

    #[test]
    fn e3_add_then_delete_within_window_counts_as_rework() {
        // Author A adds 100 lines to x.py on day 13, deletes 80 on day 14.
        let commits = vec![
            commit("h1", 13, "x.py", 100, 0),
            commit("h2", 14, "x.py", 0, 80),
        ];
        let result = analyze(&commits, 7, 3);
        assert_eq!(result.total_added_lines, 100);
        assert_eq!(result.total_rework_lines, 80);
        assert_eq!(result.rate, 80.0);
    }

    #[test]
    fn delete_outside_window_is_not_counted() {
        let commits = vec![
            commit("h1", 1, "x.py", 100, 0),
            commit("h2", 10, "x.py", 0, 80),
        ];
        let result = analyze(&commits, 7, 3);
        assert_eq!(result.total_rework_lines, 0);
    }

    #[test]
    fn rate_is_clamped_at_100_but_raw_lines_preserved() {
        let commits = vec![
            commit("h1", 1, "x.py", 10, 0),
            commit("h2", 2, "x.py", 0, 10),
            commit("h3", 2, "x.py", 0, 10),
            commit("h4", 2, "x.py", 0, 10),
        ];
        let result = analyze(&commits, 7, 3);
        assert_eq!(result.total_added_lines, 10);
        assert_eq!(result.total_rework_lines, 30);
        assert_eq!(result.rate, 100.0);
    }
}
