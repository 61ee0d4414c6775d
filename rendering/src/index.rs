//! Report-center index page.
//!
//! Grounded on `original_source/src/utils/index_generator.py`: scans the
//! `daily`/`weekly`/`monthly` output directories and lists, for the
//! current calendar month, all dailies; for the current ISO year, all
//! weeklies; and the previous month's monthly report if present. Per spec
//! §9's redesign note, "current" is always the caller-supplied date, never
//! a fixed year.

use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::error::{RenderError, RenderResult};
use crate::markdown::html_escape;

fn list_html_stems(dir: &Path) -> RenderResult<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut stems = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|source| RenderError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| RenderError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    stems.reverse();
    Ok(stems)
}

/// Generates the `index.html` report-center page for `today`.
pub fn generate_index(reports_dir: &Path, project_name: &str, today: NaiveDate) -> RenderResult<String> {
    let current_year_month = format!("{:04}-{:02}", today.year(), today.month());
    let (prev_year, prev_month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    let prev_year_month = format!("{:04}-{:02}", prev_year, prev_month);
    let current_iso_year = today.iso_week().year();

    let dailies: Vec<String> = list_html_stems(&reports_dir.join("daily"))?
        .into_iter()
        .filter(|d| d.starts_with(&current_year_month))
        .collect();

    let weeklies: Vec<String> = list_html_stems(&reports_dir.join("weekly"))?
        .into_iter()
        .filter(|w| w.starts_with(&format!("{current_iso_year}-W")))
        .collect();

    let monthly_path = reports_dir.join("monthly").join(format!("{prev_year_month}.html"));
    let last_month_report = monthly_path.is_file().then_some(prev_year_month.clone());

    Ok(render_index_html(project_name, &current_year_month, &dailies, &weeklies, last_month_report.as_deref()))
}

fn render_index_html(
    project_name: &str,
    current_year_month: &str,
    dailies: &[String],
    weeklies: &[String],
    last_month_report: Option<&str>,
) -> String {
    let daily_links: String = dailies
        .iter()
        .map(|d| format!(r#"<a class="report-link" href="daily/{d}.html">{}</a>"#, html_escape(d)))
        .collect::<Vec<_>>()
        .join("\n");

    let weekly_links: String = weeklies
        .iter()
        .map(|w| format!(r#"<a class="report-link" href="weekly/{w}.html">{}</a>"#, html_escape(w)))
        .collect::<Vec<_>>()
        .join("\n");

    let monthly_section = match last_month_report {
        Some(m) => format!(
            r#"<div class="section">
<h2>Monthly Report</h2>
<a class="report-link" href="monthly/{m}.html">{}</a>
</div>"#,
            html_escape(m)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{project} - Report Center</title>
<style>
* {{ box-sizing: border-box; }}
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif; background: #f6f8fa; margin: 0; padding: 2rem; }}
.container {{ max-width: 1000px; margin: 0 auto; }}
.header {{ background: white; border-radius: 12px; padding: 2rem; margin-bottom: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.12); }}
.section {{ background: white; border-radius: 12px; padding: 2rem; margin-bottom: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.12); }}
.report-grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(120px, 1fr)); gap: 0.6rem; }}
.report-link {{ display: block; padding: 0.7rem; background: #f6f8fa; border-radius: 8px; text-decoration: none; color: #1f2328; text-align: center; }}
.report-link:hover {{ background: #0969da; color: white; }}
</style>
</head>
<body>
<div class="container">
<div class="header">
<h1>{project} - Report Center</h1>
<p>Current period: {current_year_month}</p>
<a href="../dashboard/index.html">Open dashboard</a>
</div>
{monthly_section}
<div class="section">
<h2>Weekly Reports ({weekly_count})</h2>
<div class="report-grid">
{weekly_links}
</div>
</div>
<div class="section">
<h2>Daily Reports ({daily_count})</h2>
<div class="report-grid">
{daily_links}
</div>
</div>
</div>
</body>
</html>
"#,
        project = html_escape(project_name),
        weekly_count = weeklies.len(),
        daily_count = dailies.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), "x").unwrap();
    }

    #[test]
    fn lists_current_month_dailies_and_current_year_weeklies() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("daily"), "2025-01-10.html");
        touch(&tmp.path().join("daily"), "2024-12-31.html");
        touch(&tmp.path().join("weekly"), "2025-W02.html");
        touch(&tmp.path().join("weekly"), "2024-W52.html");

        let html = generate_index(tmp.path(), "proj", NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()).unwrap();
        assert!(html.contains("daily/2025-01-10.html"));
        assert!(!html.contains("daily/2024-12-31.html"));
        assert!(html.contains("weekly/2025-W02.html"));
        assert!(!html.contains("weekly/2024-W52.html"));
    }

    #[test]
    fn includes_previous_month_report_when_present() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("monthly"), "2024-12.html");

        let html = generate_index(tmp.path(), "proj", NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()).unwrap();
        assert!(html.contains("monthly/2024-12.html"));
    }

    #[test]
    fn b2_empty_reports_dir_renders_without_error() {
        let tmp = tempfile::tempdir().unwrap();
        let html = generate_index(tmp.path(), "proj", NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()).unwrap();
        assert!(html.contains("Daily Reports (0)"));
    }

    #[test]
    fn r2_index_regeneration_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("daily"), "2025-01-10.html");
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let first = generate_index(tmp.path(), "proj", today).unwrap();
        let second = generate_index(tmp.path(), "proj", today).unwrap();
        assert_eq!(first, second);
    }
}
