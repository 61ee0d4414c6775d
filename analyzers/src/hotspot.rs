//! HotspotAnalyzer: composite risk scoring per file, with tags and a
//! suggestion string derived from the tag set.

use std::collections::{HashMap, HashSet};

use commit_model::{Commit, RepoType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HotspotTag {
    HighChurn,
    LargeFile,
    MultiAuthor,
    ComplexFile,
}

impl HotspotTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotspotTag::HighChurn => "high-churn",
            HotspotTag::LargeFile => "large-file",
            HotspotTag::MultiAuthor => "multi-author",
            HotspotTag::ComplexFile => "complex-file",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotspotFile {
    pub path: String,
    pub modify_count: u32,
    pub line_count: u32,
    pub author_count: u32,
    pub risk_score: f64,
    pub tags: Vec<HotspotTag>,
    pub suggestion: &'static str,
}

pub struct HotspotThresholds {
    pub high_churn: u32,
    pub large_file: u32,
    pub multi_author: u32,
    pub display_floor: f64,
}

impl Default for HotspotThresholds {
    fn default() -> Self {
        Self {
            high_churn: 5,
            large_file: 1000,
            multi_author: 3,
            display_floor: 40.0,
        }
    }
}

/// Per-language line-count ceiling past which a file is tagged
/// "complex-file" regardless of the generic `large_file` threshold.
fn complexity_ceiling(repo_type: RepoType) -> u32 {
    match repo_type {
        RepoType::Java => 800,
        RepoType::Python => 600,
        RepoType::WebFrontend => 500,
        RepoType::Mobile => 700,
        RepoType::Infra => 400,
        RepoType::Unknown => 1000,
    }
}

/// Excludes paths matching a glob-like pattern (`*` wildcard only, applied
/// to the whole path) or under one of `exclude_dirs`.
pub fn is_excluded(path: &str, exclude_patterns: &[String], exclude_dirs: &[String]) -> bool {
    for dir in exclude_dirs {
        if path.starts_with(dir.trim_end_matches('/')) {
            return true;
        }
    }
    for pattern in exclude_patterns {
        if glob_match(pattern, path) {
            return true;
        }
    }
    false
}

fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == text;
    }

    let mut cursor = 0usize;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        match text[cursor..].find(part) {
            Some(pos) => {
                if i == 0 && pos != 0 {
                    return false;
                }
                cursor += pos + part.len();
            }
            None => return false,
        }
    }
    if let Some(last) = parts.last() {
        if !last.is_empty() && !text.ends_with(last) {
            return false;
        }
    }
    true
}

fn suggestion_for(tags: &[HotspotTag]) -> &'static str {
    let set: HashSet<HotspotTag> = tags.iter().copied().collect();
    match (
        set.contains(&HotspotTag::HighChurn),
        set.contains(&HotspotTag::MultiAuthor),
        set.contains(&HotspotTag::LargeFile) || set.contains(&HotspotTag::ComplexFile),
    ) {
        (true, true, _) => "frequent multi-author changes suggest unclear ownership; consider a single owner or stronger module boundaries",
        (true, false, true) => "high churn in a large file suggests splitting it into smaller, independently-changeable units",
        (true, false, false) => "high modification frequency; add tests around this file before the next change",
        (false, true, _) => "many authors touch this file; document its contract or narrow its responsibilities",
        (false, false, true) => "large/complex file; consider decomposing before it accumulates more churn",
        (false, false, false) => "monitor for emerging risk",
    }
}

/// Computes hotspot metrics for every file touched in `commits`, dropping
/// files whose risk score does not exceed `thresholds.display_floor`.
pub fn analyze(
    commits: &[Commit],
    repo_type: RepoType,
    thresholds: &HotspotThresholds,
    exclude_patterns: &[String],
    exclude_dirs: &[String],
) -> Vec<HotspotFile> {
    struct Acc {
        modify_count: u32,
        line_count: u32,
        authors: HashSet<String>,
    }

    let mut acc: HashMap<String, Acc> = HashMap::new();

    for commit in commits {
        for file in &commit.files {
            if is_excluded(&file.path, exclude_patterns, exclude_dirs) {
                continue;
            }
            let entry = acc.entry(file.path.clone()).or_insert(Acc {
                modify_count: 0,
                line_count: 0,
                authors: HashSet::new(),
            });
            entry.modify_count += 1;
            entry.line_count += file.added;
            entry.authors.insert(commit.author_name.clone());
        }
    }

    let ceiling = complexity_ceiling(repo_type);

    let mut files: Vec<HotspotFile> = acc
        .into_iter()
        .filter_map(|(path, a)| {
            let modifies = a.modify_count;
            let lines = a.line_count;
            let authors = a.authors.len() as u32;

            let score = 0.30 * (modifies as f64 / 10.0 * 100.0).min(100.0)
                + 0.25 * (lines as f64 / 1000.0 * 100.0).min(100.0)
                + 0.20 * (authors as f64 / 5.0 * 100.0).min(100.0);
            let score = (score * 100.0).round() / 100.0;

            if score <= thresholds.display_floor {
                return None;
            }

            let mut tags = Vec::new();
            if modifies >= thresholds.high_churn {
                tags.push(HotspotTag::HighChurn);
            }
            if lines >= thresholds.large_file {
                tags.push(HotspotTag::LargeFile);
            }
            if authors >= thresholds.multi_author {
                tags.push(HotspotTag::MultiAuthor);
            }
            if lines > ceiling {
                tags.push(HotspotTag::ComplexFile);
            }

            Some(HotspotFile {
                path,
                modify_count: modifies,
                line_count: lines,
                author_count: authors,
                risk_score: score,
                suggestion: suggestion_for(&tags),
                tags,
            })
        })
        .collect();

    files.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap()
            .then_with(|| a.path.cmp(&b.path))
    });

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use commit_model::FileChange;

    fn commit(hash: &str, author: &str, path: &str, added: u32) -> Commit {
        Commit {
            hash: hash.to_string(),
            author_name: author.to_string(),
            author_email: format!("{author}@example.com"),
            timestamp: FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            message: "m".into(),
            files: vec![FileChange::new(path, added, 0)],
        }
    }

    #[test]
    fn p7_no_file_below_display_floor_survives() {
        let commits = vec![commit("h1", "a", "quiet.rs", 1)];
        let result = analyze(&commits, RepoType::Unknown, &HotspotThresholds::default(), &[], &[]);
        assert!(result.is_empty());
    }

    #[test]
    fn e2_high_churn_multi_author_file_is_tagged() {
        // Same file touched 5 times in 3 days across 3 different developers.
        let commits = vec![
            commit("h1", "a", "hot.rs", 50),
            commit("h2", "b", "hot.rs", 50),
            commit("h3", "c", "hot.rs", 50),
            commit("h4", "a", "hot.rs", 50),
            commit("h5", "b", "hot.rs", 50),
        ];
        let result = analyze(&commits, RepoType::Unknown, &HotspotThresholds::default(), &[], &[]);
        assert_eq!(result.len(), 1);
        assert!(result[0].tags.contains(&HotspotTag::HighChurn));
        assert!(result[0].tags.contains(&HotspotTag::MultiAuthor));
    }

    #[test]
    fn exclude_dirs_drop_matching_paths() {
        let commits = vec![
            commit("h1", "a", "vendor/lib.rs", 2000),
            commit("h2", "b", "vendor/lib.rs", 2000),
            commit("h3", "c", "vendor/lib.rs", 2000),
            commit("h4", "d", "vendor/lib.rs", 2000),
            commit("h5", "e", "vendor/lib.rs", 2000),
        ];
        let result = analyze(
            &commits,
            RepoType::Unknown,
            &HotspotThresholds::default(),
            &[],
            &["vendor".to_string()],
        );
        assert!(result.is_empty());
    }

    #[test]
    fn glob_pattern_excludes_matching_files() {
        assert!(is_excluded("gen/schema.rs", &["gen/*".to_string()], &[]));
        assert!(!is_excluded("src/schema.rs", &["gen/*".to_string()], &[]));
    }
}
