//! The `placement readiness` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use serde::Serialize;

use placement_client::config::load_config_from;
use placement_client::ApiClient;
use placement_core::bank::{BankOwner, BankSummary};
use placement_core::curriculum::{Level, Unit};
use placement_core::model::Id;
use placement_core::thresholds::ThresholdProfile;
use placement_core::traits::ContentApi;
use placement_core::ReadinessEvaluation;

use super::{connect, explain, load_profile};

/// Where the bank summary comes from.
pub enum SummarySource {
    File(PathBuf),
    Unit(Id),
    Level(Id),
}

impl SummarySource {
    pub fn from_args(file: Option<PathBuf>, unit: Option<Id>, level: Option<Id>) -> Result<Self> {
        match (file, unit, level) {
            (Some(path), None, None) => Ok(SummarySource::File(path)),
            (None, Some(id), None) => Ok(SummarySource::Unit(id)),
            (None, None, Some(id)) => Ok(SummarySource::Level(id)),
            (None, None, None) => anyhow::bail!("one of --file, --unit or --level is required"),
            _ => anyhow::bail!("--file, --unit and --level are mutually exclusive"),
        }
    }
}

#[derive(Serialize)]
struct ReadinessOutput<'a> {
    bank: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    level_code: Option<&'a str>,
    #[serde(flatten)]
    evaluation: &'a ReadinessEvaluation,
}

pub async fn execute(
    source: SummarySource,
    level_code: Option<String>,
    thresholds_path: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (summary, label, level_code, profile) = match source {
        SummarySource::File(path) => {
            let config = load_config_from(config_path.as_deref())?;
            let profile = load_profile(thresholds_path, &config)?;
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let summary: BankSummary = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse bank summary: {}", path.display()))?;
            (summary, path.display().to_string(), level_code, profile)
        }
        SummarySource::Unit(id) => {
            fetch(BankOwner::Unit(id), level_code, thresholds_path, config_path).await?
        }
        SummarySource::Level(id) => {
            fetch(BankOwner::Level(id), level_code, thresholds_path, config_path).await?
        }
    };

    let evaluation = match &profile {
        Some(profile) => {
            summary.evaluate_against(profile.for_optional_level(level_code.as_deref()))
        }
        None => summary.evaluate(),
    };

    match format.as_str() {
        "json" => {
            let output = ReadinessOutput {
                bank: label,
                level_code: level_code.as_deref(),
                evaluation: &evaluation,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => print_text(&label, level_code.as_deref(), &evaluation),
    }

    Ok(())
}

async fn fetch(
    owner: BankOwner,
    level_code: Option<String>,
    thresholds_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(BankSummary, String, Option<String>, Option<ThresholdProfile>)> {
    let (config, client) = connect(config_path.as_deref())?;
    let profile = load_profile(thresholds_path, &config)?;
    let summary = client.bank_summary(owner).await.map_err(explain)?;
    let level_code = match (level_code, &profile) {
        (Some(code), _) => Some(code),
        (None, Some(_)) => Some(owner_level_code(&client, owner).await?),
        (None, None) => None,
    };
    Ok((summary, owner.to_string(), level_code, profile))
}

/// Level code of the bank owner, for picking thresholds.
async fn owner_level_code(client: &ApiClient, owner: BankOwner) -> Result<String> {
    let level_id = match owner {
        BankOwner::Level(id) => id,
        BankOwner::Unit(id) => client.get::<Unit>(id).await.map_err(explain)?.level,
    };
    let level: Level = client.get(level_id).await.map_err(explain)?;
    Ok(level.code)
}

fn print_text(label: &str, level_code: Option<&str>, evaluation: &ReadinessEvaluation) {
    match level_code {
        Some(code) => println!("Question bank: {label} (level {code})"),
        None => println!("Question bank: {label}"),
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Current", "Required", "Progress", "Status"]);
    for progress in &evaluation.categories {
        let status = if progress.ready {
            Cell::new("ready").fg(Color::Green)
        } else {
            Cell::new(format!("needs {}", progress.shortfall())).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(progress.category),
            Cell::new(progress.current),
            Cell::new(progress.required),
            Cell::new(format!("{}%", progress.percent)),
            status,
        ]);
    }
    println!("{table}");

    println!(
        "Total: {} questions, overall progress {}%",
        evaluation.questions.total(),
        evaluation.overall_percent
    );
    if evaluation.is_ready_for_exam() {
        println!("READY for exam");
    } else {
        let missing: Vec<String> = evaluation
            .status
            .missing()
            .iter()
            .map(|c| c.to_string())
            .collect();
        println!("NOT READY for exam (missing: {})", missing.join(", "));
    }
}
