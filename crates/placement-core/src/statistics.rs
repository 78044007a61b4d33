//! Aggregate statistics over a set of evaluated banks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Category;
use crate::report::BankReadiness;

/// Roll-up of a readiness scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankStats {
    /// Banks evaluated.
    pub bank_count: usize,
    /// Banks ready for an exam.
    pub ready_count: usize,
    /// Mean of the banks' overall progress, in percent.
    pub avg_overall_percent: f64,
    /// Questions still needed, summed over banks, per category.
    pub shortfall: BTreeMap<Category, u64>,
    /// Number of banks blocked by each category.
    pub blocked_by: BTreeMap<Category, usize>,
}

impl BankStats {
    /// Share of banks that are ready, in [0, 1]. Zero when there are no banks.
    pub fn ready_ratio(&self) -> f64 {
        if self.bank_count == 0 {
            0.0
        } else {
            self.ready_count as f64 / self.bank_count as f64
        }
    }

    /// The category blocking the most banks, if any bank is blocked.
    pub fn main_bottleneck(&self) -> Option<Category> {
        self.blocked_by
            .iter()
            .filter(|(_, &n)| n > 0)
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(c, _)| *c)
    }
}

/// Compute aggregate statistics from evaluated banks.
pub fn compute_bank_stats(entries: &[BankReadiness]) -> BankStats {
    let mut shortfall: BTreeMap<Category, u64> = Category::ALL.iter().map(|&c| (c, 0)).collect();
    let mut blocked_by: BTreeMap<Category, usize> =
        Category::ALL.iter().map(|&c| (c, 0)).collect();

    for entry in entries {
        for progress in &entry.evaluation.categories {
            *shortfall.entry(progress.category).or_default() += progress.shortfall() as u64;
            if !progress.ready {
                *blocked_by.entry(progress.category).or_default() += 1;
            }
        }
    }

    let ready_count = entries
        .iter()
        .filter(|e| e.evaluation.is_ready_for_exam())
        .count();

    let avg_overall_percent = if entries.is_empty() {
        0.0
    } else {
        entries
            .iter()
            .map(|e| e.evaluation.overall_percent as f64)
            .sum::<f64>()
            / entries.len() as f64
    };

    BankStats {
        bank_count: entries.len(),
        ready_count,
        avg_overall_percent,
        shortfall,
        blocked_by,
    }
}
