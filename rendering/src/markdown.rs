//! Markdown to HTML conversion.
//!
//! Uses `pulldown-cmark` for the CommonMark conversion itself (spec §4.4.a:
//! "Implementers MAY use a standard Markdown library") and wraps the
//! resulting fragment in a fixed HTML template with an embedded
//! stylesheet, in the same unadorned `format!`-based templating style the
//! original `html_generator.py`/`index_generator.py` use rather than
//! pulling in a templating engine.

use pulldown_cmark::{html, Options, Parser};

const STYLESHEET: &str = r#"
* { box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
    background: #f6f8fa;
    color: #24292f;
    margin: 0;
    padding: 2rem;
    line-height: 1.6;
}
.report {
    max-width: 900px;
    margin: 0 auto;
    background: white;
    border-radius: 12px;
    padding: 2.5rem;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.12);
}
h1, h2, h3, h4 { color: #1f2328; }
h1 { border-bottom: 2px solid #eaecef; padding-bottom: 0.4rem; }
h2 { border-bottom: 1px solid #eaecef; padding-bottom: 0.3rem; margin-top: 2rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #d0d7de; padding: 0.5rem 0.8rem; text-align: left; }
th { background: #f6f8fa; }
code { background: #f6f8fa; padding: 0.15rem 0.35rem; border-radius: 4px; font-size: 0.9em; }
pre { background: #f6f8fa; padding: 1rem; border-radius: 8px; overflow-x: auto; }
pre code { background: none; padding: 0; }
blockquote { border-left: 4px solid #d0d7de; margin: 1rem 0; padding: 0 1rem; color: #57606a; }
hr { border: none; border-top: 1px solid #eaecef; margin: 1.5rem 0; }
a { color: #0969da; text-decoration: none; }
a:hover { text-decoration: underline; }
"#;

/// Converts `markdown` into a CommonMark-compliant HTML fragment.
///
/// Headings, emphasis, inline/fenced code, tables, lists, rules, and links
/// are all handled by `pulldown-cmark`'s standard CommonMark pass, which
/// escapes HTML-special characters in text content while leaving code-span
/// and fenced-code text untouched by Markdown's own inline syntax rules
/// (spec §4.4.a).
pub fn markdown_to_html_fragment(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut html_out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut html_out, parser);
    html_out
}

/// Wraps an HTML fragment in the fixed report template with the embedded
/// stylesheet.
pub fn wrap_report_html(title: &str, body_fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{STYLESHEET}</style>
</head>
<body>
<div class="report">
{body_fragment}
</div>
</body>
</html>
"#,
        title = html_escape(title),
    )
}

/// Converts a full Markdown report into a standalone HTML document.
pub fn render_report(title: &str, markdown: &str) -> String {
    let fragment = markdown_to_html_fragment(markdown);
    wrap_report_html(title, &fragment)
}

/// Minimal HTML-entity escaping for text interpolated outside of the
/// Markdown conversion path (template titles, generated labels).
pub fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_emphasis_and_inline_code_render() {
        let html = markdown_to_html_fragment("# Title\n\n**bold** and `code`\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn r1_table_cell_text_survives_conversion() {
        let md = "| Author | Commits |\n| --- | --- |\n| Alice & Bob | 3 |\n";
        let html = markdown_to_html_fragment(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("Alice &amp; Bob"));
    }

    #[test]
    fn fenced_code_preserves_whitespace() {
        let md = "```\n  indented\nline\n```\n";
        let html = markdown_to_html_fragment(md);
        assert!(html.contains("  indented\nline"));
    }

    #[test]
    fn links_are_not_escaped_in_target() {
        let md = "[text](https://example.com/a?b=1&c=2)";
        let html = markdown_to_html_fragment(md);
        assert!(html.contains(r#"href="https://example.com/a?b=1&amp;c=2""#));
    }

    #[test]
    fn html_escape_covers_the_five_special_characters() {
        assert_eq!(html_escape("<a> & \"b\" 'c'"), "&lt;a&gt; &amp; &quot;b&quot; &#39;c&#39;");
    }

    #[test]
    fn wrap_report_html_embeds_title_and_stylesheet() {
        let html = wrap_report_html("Daily <Report>", "<h1>x</h1>");
        assert!(html.contains("<title>Daily &lt;Report&gt;</title>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("<h1>x</h1>"));
    }
}
