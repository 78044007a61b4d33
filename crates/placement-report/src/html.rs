//! HTML readiness dashboard.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use placement_core::model::Category;
use placement_core::report::{BankReadiness, ReadinessReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn percent_color(percent: u8) -> &'static str {
    if percent >= 100 {
        "#22c55e"
    } else if percent >= 50 {
        "#eab308"
    } else {
        "#ef4444"
    }
}

/// Generate the dashboard page for a readiness report.
pub fn generate_html(report: &ReadinessReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Question bank readiness: {}</title>\n",
        html_escape(&report.source)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Question bank readiness</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Source: <strong>{}</strong> | {} banks | {}</p>\n",
        html_escape(&report.source),
        report.entries.len(),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    let stats = &report.stats;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Banks</th><th>Ready</th><th>Avg progress</th><th>Main bottleneck</th><th>Failed fetches</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{} ({:.0}%)</td><td>{:.1}%</td><td>{}</td><td>{}</td></tr></tbody>\n",
        stats.bank_count,
        stats.ready_count,
        stats.ready_ratio() * 100.0,
        stats.avg_overall_percent,
        stats
            .main_bottleneck()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into()),
        report.failed.len(),
    ));
    html.push_str("</table>\n");

    if !report.entries.is_empty() {
        html.push_str(&generate_bar_chart(&report.entries));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Banks</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n<thead><tr>");
    html.push_str("<th onclick=\"sortTable(0)\">Bank</th>");
    for (i, category) in Category::ALL.iter().enumerate() {
        html.push_str(&format!(
            "<th onclick=\"sortTable({})\">{}</th>",
            i + 1,
            html_escape(category.as_str())
        ));
    }
    html.push_str("<th onclick=\"sortTable(7)\">Overall</th><th onclick=\"sortTable(8)\">Status</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for entry in &report.entries {
        html.push_str(&bank_row(entry));
    }

    html.push_str("</tbody></table>\n");

    if !report.failed.is_empty() {
        html.push_str("<h3>Could not be fetched</h3>\n<ul class=\"failed\">\n");
        for owner in &report.failed {
            html.push_str(&format!("<li>{}</li>\n", html_escape(&owner.to_string())));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

fn bank_row(entry: &BankReadiness) -> String {
    let evaluation = &entry.evaluation;
    let ready = evaluation.is_ready_for_exam();
    let mut row = format!(
        "<tr class=\"{}\"><td>{}</td>",
        if ready { "ready" } else { "not-ready" },
        html_escape(&entry.label)
    );

    for category in Category::ALL {
        match evaluation.category(category) {
            Some(progress) => row.push_str(&format!(
                "<td class=\"{}\" title=\"{}%\">{}/{}{}</td>",
                if progress.ready { "pass" } else { "fail" },
                progress.percent,
                progress.current,
                progress.required,
                mini_bar(progress.percent)
            )),
            None => row.push_str("<td>-</td>"),
        }
    }

    row.push_str(&format!(
        "<td>{}%</td><td><span class=\"badge {}\">{}</span></td></tr>\n",
        evaluation.overall_percent,
        if ready { "badge-ready" } else { "badge-not-ready" },
        if ready { "Ready" } else { "Not ready" }
    ));
    row
}

/// Inline progress bar for a table cell.
fn mini_bar(percent: u8) -> String {
    let width = usize::from(percent.min(100)) * 60 / 100;
    format!(
        "<svg class=\"mini\" width=\"60\" height=\"6\" xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"60\" height=\"6\" fill=\"var(--border)\" rx=\"3\"/><rect width=\"{width}\" height=\"6\" fill=\"{}\" rx=\"3\"/></svg>",
        percent_color(percent)
    )
}

/// Write the dashboard to a file.
pub fn write_html_report(report: &ReadinessReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(entries: &[BankReadiness]) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 240;

    let total_height = entries.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, entry) in entries.iter().enumerate() {
        let percent = entry.evaluation.overall_percent;
        let y = i * (bar_height + padding) + padding;
        let width = usize::from(percent) * max_width / 100;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&entry.label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"var(--border)\" rx=\"4\"/>\n",
            label_width, y, max_width, bar_height
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width,
            y,
            width,
            bar_height,
            percent_color(percent)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + max_width + 8,
            y + bar_height / 2,
            percent
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.badge { padding: 0.1rem 0.5rem; border-radius: 999px; font-size: 0.8rem; font-weight: bold; }
.badge-ready { background: #22c55e; color: #fff; }
.badge-not-ready { background: #ef4444; color: #fff; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
svg.mini { display: block; margin: 0.25rem 0 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::bank::BankOwner;
    use placement_core::model::{CategoryCounts, RequiredThresholds};
    use placement_core::readiness::ReadinessEvaluation;

    fn make_report() -> ReadinessReport {
        let required = RequiredThresholds::uniform(4);
        let full: CategoryCounts = Category::ALL.iter().map(|&c| (c, 4)).collect();
        let entries = vec![
            BankReadiness {
                owner: BankOwner::Level(1),
                label: "A1 Beginner".into(),
                level_code: Some("A1".into()),
                evaluation: ReadinessEvaluation::new(full, required),
            },
            BankReadiness {
                owner: BankOwner::Unit(3),
                label: "A1 / <Travel>".into(),
                level_code: Some("A1".into()),
                evaluation: ReadinessEvaluation::new(
                    CategoryCounts::zero().with(Category::Grammar, 2),
                    required,
                ),
            },
        ];
        let mut report =
            ReadinessReport::new("http://api.test", entries, vec![BankOwner::Unit(9)], 42);
        report.id = uuid::Uuid::nil();
        report
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("A1 Beginner"));
        assert!(html.contains("http://api.test"));
        assert!(html.contains("badge-ready"));
        assert!(html.contains("badge-not-ready"));
        assert!(html.contains("2/4<svg class=\"mini\""));
        assert!(html.contains("unit 9"));
    }

    #[test]
    fn labels_are_escaped() {
        let html = generate_html(&make_report());
        assert!(html.contains("A1 / &lt;Travel&gt;"));
        assert!(!html.contains("<Travel>"));
    }

    #[test]
    fn chart_bars_scale_with_progress() {
        let report = make_report();
        let svg = generate_bar_chart(&report.entries);
        assert!(svg.contains("width=\"400\" height=\"24\" fill=\"#22c55e\""));
        assert!(svg.contains(">100%<"));
    }

    #[test]
    fn mini_bar_width() {
        assert!(mini_bar(50).contains("<rect width=\"30\" height=\"6\" fill=\"#eab308\""));
        assert!(mini_bar(0).contains("<rect width=\"0\""));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/report.html");

        write_html_report(&make_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
