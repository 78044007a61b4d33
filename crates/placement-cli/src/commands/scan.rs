//! The `placement scan` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use placement_core::engine::{ProgressReporter, ReadinessScanner, ScanConfig, ScanTarget};
use placement_core::model::Id;
use placement_core::report::{BankReadiness, ReadinessReport};
use placement_core::ApiError;
use placement_report::html::write_html_report;

use super::{connect, explain, load_profile};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_bank_start(&self, target: &ScanTarget) {
        eprintln!("  Fetching: {} ({})", target.label, target.owner);
    }

    fn on_bank_complete(&self, entry: &BankReadiness) {
        let status = if entry.evaluation.is_ready_for_exam() {
            "READY"
        } else {
            "not ready"
        };
        eprintln!(
            "  Done: {} [{}] {}%",
            entry.label, status, entry.evaluation.overall_percent
        );
    }

    fn on_bank_error(&self, target: &ScanTarget, error: &ApiError) {
        eprintln!("  ERROR: {}: {error}", target.label);
    }

    fn on_scan_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} banks evaluated, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    levels: Vec<Id>,
    include_units: bool,
    parallelism: Option<usize>,
    thresholds_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, client) = connect(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let profile = load_profile(thresholds_path, &config)?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    if let Some(unknown) = formats.iter().find(|f| !matches!(**f, "json" | "html")) {
        anyhow::bail!("unknown format: {unknown} (expected json, html or all)");
    }

    let scanner = ReadinessScanner::new(
        Arc::new(client),
        ScanConfig {
            parallelism,
            profile,
        },
    );

    let targets = scanner
        .targets_for_levels(&levels, include_units)
        .await
        .map_err(explain)?;
    if targets.is_empty() {
        println!("No question banks to scan.");
        return Ok(());
    }

    eprintln!(
        "placement v{} scanning {} question banks",
        env!("CARGO_PKG_VERSION"),
        targets.len()
    );
    eprintln!();

    let report = scanner.scan(&targets, &ConsoleReporter).await;

    print_summary(&report);

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("readiness-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("readiness-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML dashboard: {}", path.display());
            }
            _ => {}
        }
    }

    Ok(())
}

fn print_summary(report: &ReadinessReport) {
    use comfy_table::{Cell, Color, Table};

    let mut table = Table::new();
    let mut header = vec!["Bank".to_string()];
    header.extend(
        placement_core::Category::ALL
            .iter()
            .map(|c| c.as_str().to_string()),
    );
    header.push("Overall".into());
    header.push("Status".into());
    table.set_header(header);

    for entry in &report.entries {
        let mut row = vec![Cell::new(&entry.label)];
        for progress in &entry.evaluation.categories {
            let cell = Cell::new(format!("{}/{}", progress.current, progress.required));
            row.push(if progress.ready {
                cell
            } else {
                cell.fg(Color::Red)
            });
        }
        row.push(Cell::new(format!("{}%", entry.evaluation.overall_percent)));
        row.push(if entry.evaluation.is_ready_for_exam() {
            Cell::new("READY").fg(Color::Green)
        } else {
            Cell::new("not ready").fg(Color::Red)
        });
        table.add_row(row);
    }

    eprintln!("\n{table}");

    let stats = &report.stats;
    eprintln!(
        "{}/{} banks ready, average progress {:.1}%",
        stats.ready_count, stats.bank_count, stats.avg_overall_percent
    );
    if let Some(bottleneck) = stats.main_bottleneck() {
        eprintln!(
            "Main bottleneck: {bottleneck} ({} questions short across banks)",
            stats.shortfall.get(&bottleneck).copied().unwrap_or(0)
        );
    }
}
