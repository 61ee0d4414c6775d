//! Commit message quality scoring.

const CONVENTIONAL_PREFIXES: &[&str] = &[
    "feat", "fix", "refactor", "docs", "test", "chore", "style", "perf",
];

/// A message is "good" if it starts with a conventional-commit prefix
/// (optionally scoped, e.g. `fix(parser):`) or is at least 10 characters.
pub fn is_good_message(message: &str) -> bool {
    if has_conventional_prefix(message) {
        return true;
    }
    message.trim().chars().count() >= 10
}

fn has_conventional_prefix(message: &str) -> bool {
    for prefix in CONVENTIONAL_PREFIXES {
        if let Some(rest) = message.strip_prefix(prefix) {
            let rest = rest.strip_prefix(|c: char| c == '(').map_or(rest, |after_paren| {
                match after_paren.find(')') {
                    Some(close) => &after_paren[close + 1..],
                    None => rest,
                }
            });
            if rest.starts_with(':') {
                return true;
            }
        }
    }
    false
}

/// Percentage of good messages; an empty set scores 100 (`P6`).
pub fn message_quality(messages: &[&str]) -> f64 {
    if messages.is_empty() {
        return 100.0;
    }
    let good = messages.iter().filter(|m| is_good_message(m)).count();
    (good as f64 / messages.len() as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_prefix_without_scope_is_good() {
        assert!(is_good_message("fix: handle empty input"));
    }

    #[test]
    fn conventional_prefix_with_scope_is_good() {
        assert!(is_good_message("feat(parser): support fenced code"));
    }

    #[test]
    fn long_message_without_prefix_is_good() {
        assert!(is_good_message("updated the dependency versions"));
    }

    #[test]
    fn short_unprefixed_message_is_bad() {
        assert!(!is_good_message("wip"));
    }

    #[test]
    fn prefix_lookalike_without_colon_is_bad() {
        assert!(!is_good_message("fixbug"));
    }

    #[test]
    fn empty_set_scores_100() {
        assert_eq!(message_quality(&[]), 100.0);
    }

    #[test]
    fn quality_is_percentage_of_good_messages() {
        let messages = ["fix: a", "wip", "feat: b", "x"];
        assert_eq!(message_quality(&messages), 50.0);
    }
}
