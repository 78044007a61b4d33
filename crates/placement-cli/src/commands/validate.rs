//! The `placement validate` command.

use std::path::PathBuf;

use anyhow::Result;

use placement_core::thresholds::{parse_profile, validate_profile};

pub fn execute(thresholds_path: PathBuf) -> Result<()> {
    let profile = parse_profile(&thresholds_path)?;

    println!(
        "Thresholds: {} ({} level tables, default total {})",
        thresholds_path.display(),
        profile.levels.len(),
        profile.default.total()
    );
    for (code, thresholds) in &profile.levels {
        println!("  {code}: {} questions required", thresholds.total());
    }

    let warnings = validate_profile(&profile);
    for w in &warnings {
        let prefix = w
            .level
            .as_ref()
            .map(|code| format!("  [{code}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Thresholds valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
