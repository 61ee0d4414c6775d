//! ChurnAnalyzer: files modified many times in a short window are a leading
//! indicator of design instability.

use std::collections::HashMap;

use commit_model::Commit;

#[derive(Debug, Clone, PartialEq)]
pub struct ChurnFile {
    pub path: String,
    pub modify_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChurnResult {
    /// Files with modification count >= threshold, sorted desc by count.
    pub files: Vec<ChurnFile>,
    /// `count(churn files) / count(modified files) * 100`.
    pub churn_rate: f64,
}

/// Counts modifications per file across `commits` (already filtered to the
/// last `window_days`) and reports those at or above `threshold`.
pub fn analyze(commits: &[Commit], threshold: u32) -> ChurnResult {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for commit in commits {
        for file in &commit.files {
            *counts.entry(file.path.as_str()).or_insert(0) += 1;
        }
    }

    if counts.is_empty() {
        return ChurnResult::default();
    }

    let total_modified = counts.len();
    let mut files: Vec<ChurnFile> = counts
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(path, modify_count)| ChurnFile {
            path: path.to_string(),
            modify_count,
        })
        .collect();

    files.sort_by(|a, b| b.modify_count.cmp(&a.modify_count).then_with(|| a.path.cmp(&b.path)));

    let churn_rate = (files.len() as f64 / total_modified as f64) * 100.0;

    ChurnResult { files, churn_rate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use commit_model::FileChange;

    fn commit(hash: &str, files: &[&str]) -> Commit {
        Commit {
            hash: hash.to_string(),
            author_name: "a".into(),
            author_email: "a@example.com".into(),
            timestamp: FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            message: "m".into(),
            files: files.iter().map(|f| FileChange::new(*f, 1, 0)).collect(),
        }
    }

    #[test]
    fn empty_input_yields_zero_rate_and_empty_list() {
        let result = analyze(&[], 3);
        assert_eq!(result.churn_rate, 0.0);
        assert!(result.files.is_empty());
    }

    #[test]
    fn e2_file_touched_five_times_by_three_authors_is_high_churn() {
        let commits: Vec<Commit> = (0..5).map(|i| commit(&format!("h{i}"), &["hot.rs"])).collect();
        let result = analyze(&commits, 5);
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].modify_count, 5);
        assert_eq!(result.churn_rate, 100.0);
    }

    #[test]
    fn rate_counts_only_files_above_threshold() {
        let commits = vec![
            commit("h1", &["a.rs", "b.rs"]),
            commit("h2", &["a.rs"]),
            commit("h3", &["a.rs"]),
        ];
        let result = analyze(&commits, 3);
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].path, "a.rs");
        // 1 churn file out of 2 total modified files.
        assert_eq!(result.churn_rate, 50.0);
    }
}
