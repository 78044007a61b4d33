//! The `placement compare` command.

use std::path::PathBuf;

use anyhow::Result;

use placement_core::report::ReadinessReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = ReadinessReport::load_json(&baseline_path)?;
    let current = ReadinessReport::load_json(&current_path)?;

    let diff = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", diff.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&diff)?);
        }
        _ => {
            println!(
                "Comparison: {} lost readiness, {} became ready, {} unchanged",
                diff.lost_readiness.len(),
                diff.became_ready.len(),
                diff.unchanged
            );

            if !diff.lost_readiness.is_empty() {
                println!("\nLost readiness:");
                for c in &diff.lost_readiness {
                    println!(
                        "  {} ({}) {}% -> {}%",
                        c.label, c.owner, c.baseline_percent, c.current_percent
                    );
                }
            }

            if !diff.became_ready.is_empty() {
                println!("\nBecame ready:");
                for c in &diff.became_ready {
                    println!(
                        "  {} ({}) {}% -> {}%",
                        c.label, c.owner, c.baseline_percent, c.current_percent
                    );
                }
            }

            for (title, banks) in [
                ("New banks", &diff.new_banks),
                ("Removed banks", &diff.removed_banks),
            ] {
                if banks.is_empty() {
                    continue;
                }
                println!("\n{title}:");
                for b in banks {
                    let status = if b.ready { "ready" } else { "not ready" };
                    println!("  {} ({}) {}%, {status}", b.label, b.owner, b.percent);
                }
            }
        }
    }

    if fail_on_regression && diff.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
