//! The `placement init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_starter("placement.toml", SAMPLE_CONFIG)?;
    write_starter("thresholds.toml", SAMPLE_THRESHOLDS)?;

    println!("\nNext steps:");
    println!("  1. Point [api] base_url in placement.toml at your content API");
    println!("  2. Run: placement validate --thresholds thresholds.toml");
    println!("  3. Run: placement login --username <admin>");
    println!("  4. Run: placement scan --include-units --format all");

    Ok(())
}

fn write_starter(name: &str, content: &str) -> Result<()> {
    if Path::new(name).exists() {
        println!("{name} already exists, skipping.");
    } else {
        std::fs::write(name, content)?;
        println!("Created {name}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# placement configuration

parallelism = 4
thresholds_path = "thresholds.toml"
output_dir = "./placement-reports"

[api]
base_url = "http://localhost:8000"
timeout_secs = 30

[media]
cloud_name = "${PLACEMENT_CLOUD_NAME}"
upload_preset = "${PLACEMENT_UPLOAD_PRESET}"
"#;

const SAMPLE_THRESHOLDS: &str = r#"# Minimum questions per category before a bank is ready for an exam.
# Levels without a table use [default]; missing keys count as zero.

[default]
vocabulary = 10
grammar = 10
reading = 5
listening = 5
speaking = 3
writing = 3

[levels.A1]
vocabulary = 15
grammar = 15
reading = 5
listening = 5
speaking = 2
writing = 2

[levels.B1]
vocabulary = 20
grammar = 20
reading = 10
listening = 10
speaking = 5
writing = 5

[levels.C1]
vocabulary = 25
grammar = 25
reading = 15
listening = 15
speaking = 8
writing = 8
"#;
