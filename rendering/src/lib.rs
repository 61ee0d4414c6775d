//! Markdown→HTML rendering, the report-center index page, and dashboard
//! generation. The only I/O this crate performs is reading a directory
//! listing to build the index (spec §4.4.b); writing files is the
//! binary's responsibility.

mod dashboard;
mod error;
mod index;
mod markdown;

pub use dashboard::{DashboardInputs, DashboardPreset, GeneratedFile};
pub use error::{RenderError, RenderResult};
pub use index::generate_index;
pub use markdown::{html_escape, markdown_to_html_fragment, render_report, wrap_report_html};

pub use dashboard::generate_all as generate_dashboard_all;
pub use dashboard::generate_one as generate_dashboard_one;
