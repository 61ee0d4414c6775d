//! HealthScoreCalculator: 0-100 composite with ordered deduction reasons.

use commit_model::{HealthMetrics, HealthScore, Severity};
use config::Thresholds;

/// Computes a `HealthScore` from `metrics`, applying the deduction table in
/// spec.md §4.2.d. Deductions are additive starting from 100, clamped to
/// `[0, 100]` at the end (`P4`).
pub fn calculate(metrics: &HealthMetrics, thresholds: &Thresholds) -> HealthScore {
    let mut reasons: Vec<(String, i32)> = Vec::new();
    let mut score: i32 = 100;

    if metrics.large_commit_count > 0 {
        let deduction = 5 * metrics.large_commit_count as i32;
        score -= deduction;
        reasons.push((
            format!("{} large commit(s) exceeding the size threshold", metrics.large_commit_count),
            deduction,
        ));
    }

    if metrics.churn_rate > thresholds.churn_rate_danger {
        score -= 20;
        reasons.push((format!("churn rate {:.1}% exceeds danger threshold", metrics.churn_rate), 20));
    } else if metrics.churn_rate > thresholds.churn_rate_warning {
        score -= 10;
        reasons.push((format!("churn rate {:.1}% exceeds warning threshold", metrics.churn_rate), 10));
    }

    if metrics.rework_rate > thresholds.rework_rate_danger {
        score -= 15;
        reasons.push((format!("rework rate {:.1}% exceeds danger threshold", metrics.rework_rate), 15));
    } else if metrics.rework_rate > thresholds.rework_rate_warning {
        score -= 8;
        reasons.push((format!("rework rate {:.1}% exceeds warning threshold", metrics.rework_rate), 8));
    }

    if metrics.message_quality < 60.0 {
        score -= 10;
        reasons.push((format!("message quality {:.0}% below 60%", metrics.message_quality), 10));
    }

    let abnormal_count = metrics.late_night_count + metrics.weekend_count;
    if abnormal_count > 0 {
        let deduction = (2 * abnormal_count as i32).min(20);
        score -= deduction;
        reasons.push((
            format!("{abnormal_count} commit(s) outside normal working hours"),
            deduction,
        ));
    }

    if metrics.high_risk_file_count > 0 {
        let deduction = (3 * metrics.high_risk_file_count as i32).min(15);
        score -= deduction;
        reasons.push((
            format!("{} high-risk file(s) touched", metrics.high_risk_file_count),
            deduction,
        ));
    }

    let clamped = score.clamp(0, 100) as u8;
    let severity = severity_for(clamped, thresholds);

    HealthScore {
        score: clamped,
        severity,
        reasons,
    }
}

fn severity_for(score: u8, thresholds: &Thresholds) -> Severity {
    if score >= thresholds.health_score_excellent {
        Severity::Excellent
    } else if score >= thresholds.health_score_good {
        Severity::Good
    } else if score >= thresholds.health_score_warning {
        Severity::Warning
    } else {
        Severity::Danger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn e1_single_large_commit_deducts_five() {
        let metrics = HealthMetrics {
            large_commit_count: 1,
            message_quality: 100.0,
            ..Default::default()
        };
        let score = calculate(&metrics, &thresholds());
        assert_eq!(score.score, 95);
        assert_eq!(score.severity, Severity::Excellent);
    }

    #[test]
    fn p4_score_never_goes_below_zero() {
        let metrics = HealthMetrics {
            large_commit_count: 100,
            churn_rate: 90.0,
            rework_rate: 90.0,
            message_quality: 0.0,
            late_night_count: 50,
            weekend_count: 50,
            high_risk_file_count: 50,
        };
        let score = calculate(&metrics, &thresholds());
        assert_eq!(score.score, 0);
        assert_eq!(score.severity, Severity::Danger);
    }

    #[test]
    fn p5_worsening_churn_rate_never_increases_score() {
        let thresholds = thresholds();
        let low = calculate(
            &HealthMetrics { churn_rate: 5.0, message_quality: 100.0, ..Default::default() },
            &thresholds,
        );
        let mid = calculate(
            &HealthMetrics { churn_rate: 20.0, message_quality: 100.0, ..Default::default() },
            &thresholds,
        );
        let high = calculate(
            &HealthMetrics { churn_rate: 50.0, message_quality: 100.0, ..Default::default() },
            &thresholds,
        );
        assert!(low.score >= mid.score);
        assert!(mid.score >= high.score);
    }

    #[test]
    fn abnormal_time_deduction_is_capped_at_20() {
        let metrics = HealthMetrics {
            late_night_count: 100,
            message_quality: 100.0,
            ..Default::default()
        };
        let score = calculate(&metrics, &thresholds());
        assert_eq!(score.score, 80);
    }

    #[test]
    fn high_risk_file_deduction_is_capped_at_15() {
        let metrics = HealthMetrics {
            high_risk_file_count: 100,
            message_quality: 100.0,
            ..Default::default()
        };
        let score = calculate(&metrics, &thresholds());
        assert_eq!(score.score, 85);
    }
}
