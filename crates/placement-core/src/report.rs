//! Readiness report types with JSON persistence and change detection.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::BankOwner;
use crate::readiness::ReadinessEvaluation;
use crate::statistics::{compute_bank_stats, BankStats};

/// One bank's evaluated readiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankReadiness {
    pub owner: BankOwner,
    /// Display label (e.g. "B1 / Unit 3: Travel").
    pub label: String,
    /// Level code used to choose the thresholds.
    #[serde(default)]
    pub level_code: Option<String>,
    pub evaluation: ReadinessEvaluation,
}

/// A complete readiness scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Backend the counts were fetched from.
    pub source: String,
    /// Evaluated banks.
    pub entries: Vec<BankReadiness>,
    /// Owners whose bank could not be fetched.
    #[serde(default)]
    pub failed: Vec<BankOwner>,
    /// Aggregate statistics.
    pub stats: BankStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ReadinessReport {
    /// Build a report from evaluated entries.
    pub fn new(
        source: &str,
        entries: Vec<BankReadiness>,
        failed: Vec<BankOwner>,
        duration_ms: u64,
    ) -> Self {
        let stats = compute_bank_stats(&entries);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source: source.to_string(),
            entries,
            failed,
            stats,
            duration_ms,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ReadinessReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline.
    pub fn compare(&self, baseline: &ReadinessReport) -> ReadinessDiff {
        let index = |report: &ReadinessReport| -> HashMap<BankOwner, (String, bool, u8)> {
            report
                .entries
                .iter()
                .map(|e| {
                    (
                        e.owner,
                        (
                            e.label.clone(),
                            e.evaluation.is_ready_for_exam(),
                            e.evaluation.overall_percent,
                        ),
                    )
                })
                .collect()
        };

        let baseline_map = index(baseline);
        let current_map = index(self);

        let mut became_ready = Vec::new();
        let mut lost_readiness = Vec::new();
        let mut unchanged = 0usize;
        let mut new_banks = Vec::new();

        for (owner, (label, ready, percent)) in &current_map {
            let Some((_, was_ready, was_percent)) = baseline_map.get(owner) else {
                new_banks.push(BankRef {
                    owner: *owner,
                    label: label.clone(),
                    percent: *percent,
                    ready: *ready,
                });
                continue;
            };
            let change = BankChange {
                owner: *owner,
                label: label.clone(),
                baseline_percent: *was_percent,
                current_percent: *percent,
            };
            match (was_ready, ready) {
                (false, true) => became_ready.push(change),
                (true, false) => lost_readiness.push(change),
                _ => unchanged += 1,
            }
        }

        let mut removed_banks: Vec<BankRef> = baseline_map
            .iter()
            .filter(|(owner, _)| !current_map.contains_key(owner))
            .map(|(owner, (label, ready, percent))| BankRef {
                owner: *owner,
                label: label.clone(),
                percent: *percent,
                ready: *ready,
            })
            .collect();

        became_ready.sort_by_key(|c| c.owner);
        lost_readiness.sort_by_key(|c| c.owner);
        new_banks.sort_by_key(|b| b.owner);
        removed_banks.sort_by_key(|b| b.owner);

        ReadinessDiff {
            became_ready,
            lost_readiness,
            unchanged,
            new_banks,
            removed_banks,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessDiff {
    /// Banks that are ready now but were not.
    pub became_ready: Vec<BankChange>,
    /// Banks that were ready but are not any more.
    pub lost_readiness: Vec<BankChange>,
    /// Banks whose readiness did not flip.
    pub unchanged: usize,
    /// Banks in current but not baseline.
    pub new_banks: Vec<BankRef>,
    /// Banks in baseline but not current.
    pub removed_banks: Vec<BankRef>,
}

/// A bank that appears in only one of the compared reports, as it was there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRef {
    pub owner: BankOwner,
    pub label: String,
    pub percent: u8,
    pub ready: bool,
}

/// A bank whose readiness flipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankChange {
    pub owner: BankOwner,
    pub label: String,
    pub baseline_percent: u8,
    pub current_percent: u8,
}

impl ReadinessDiff {
    /// Format the diff as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} lost readiness, {} became ready, {} unchanged\n\n",
            self.lost_readiness.len(),
            self.became_ready.len(),
            self.unchanged
        ));

        let mut table = |title: &str, changes: &[BankChange]| {
            if changes.is_empty() {
                return;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Bank | Owner | Baseline | Current |\n");
            md.push_str("|------|-------|----------|---------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {} | {}% | {}% |\n",
                    c.label, c.owner, c.baseline_percent, c.current_percent
                ));
            }
            md.push('\n');
        };

        table("Lost readiness", &self.lost_readiness);
        table("Became ready", &self.became_ready);

        let mut list = |title: &str, banks: &[BankRef]| {
            if banks.is_empty() {
                return;
            }
            md.push_str(&format!("### {title}\n\n"));
            for b in banks {
                let status = if b.ready { "ready" } else { "not ready" };
                md.push_str(&format!(
                    "- {} ({}): {}%, {status}\n",
                    b.label, b.owner, b.percent
                ));
            }
            md.push('\n');
        };

        list("New banks", &self.new_banks);
        list("Removed banks", &self.removed_banks);

        md
    }

    /// Returns true if any bank lost readiness.
    pub fn has_regressions(&self) -> bool {
        !self.lost_readiness.is_empty()
    }
}
