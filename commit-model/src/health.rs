//! Health metrics and the composite health score derived from them.

use std::fmt;

/// Inputs to `HealthScoreCalculator`, built per window by a reporter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthMetrics {
    pub large_commit_count: u32,
    pub churn_rate: f64,
    pub rework_rate: f64,
    pub message_quality: f64,
    pub late_night_count: u32,
    pub weekend_count: u32,
    pub high_risk_file_count: u32,
}

/// Severity band derived from a `HealthScore.score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Danger,
    Warning,
    Good,
    Excellent,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Excellent => "excellent",
            Severity::Good => "good",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        };
        f.write_str(s)
    }
}

/// The 0-100 composite produced by `HealthScoreCalculator`, plus the ordered
/// list of deductions that produced it (kept for reporting).
#[derive(Debug, Clone, PartialEq)]
pub struct HealthScore {
    pub score: u8,
    pub severity: Severity,
    pub reasons: Vec<(String, i32)>,
}
