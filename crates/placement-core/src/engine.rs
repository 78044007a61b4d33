//! Readiness scan engine.
//!
//! Fetches bank summaries for many curriculum owners concurrently, re-evaluates
//! each one against the configured thresholds, and assembles a report.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::bank::BankOwner;
use crate::curriculum::{self, Level};
use crate::error::ApiError;
use crate::model::Id;
use crate::report::{BankReadiness, ReadinessReport};
use crate::thresholds::ThresholdProfile;
use crate::traits::ContentApi;

/// Configuration for the scan engine.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum concurrent bank requests.
    pub parallelism: usize,
    /// Thresholds to evaluate against. When absent, the thresholds served
    /// with each bank are used.
    pub profile: Option<ThresholdProfile>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            profile: None,
        }
    }
}

/// A bank to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub owner: BankOwner,
    pub label: String,
    /// Level code used to choose thresholds from the profile.
    pub level_code: Option<String>,
}

impl ScanTarget {
    pub fn level(level: &Level, id: Id) -> Self {
        Self {
            owner: BankOwner::Level(id),
            label: format!("{} {}", level.code, level.name),
            level_code: Some(level.code.clone()),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_bank_start(&self, target: &ScanTarget);
    fn on_bank_complete(&self, entry: &BankReadiness);
    fn on_bank_error(&self, target: &ScanTarget, error: &ApiError);
    fn on_scan_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_bank_start(&self, _: &ScanTarget) {}
    fn on_bank_complete(&self, _: &BankReadiness) {}
    fn on_bank_error(&self, _: &ScanTarget, _: &ApiError) {}
    fn on_scan_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// The scan engine.
pub struct ReadinessScanner {
    api: Arc<dyn ContentApi>,
    config: ScanConfig,
}

impl ReadinessScanner {
    pub fn new(api: Arc<dyn ContentApi>, config: ScanConfig) -> Self {
        Self { api, config }
    }

    /// Build scan targets for the given levels (all levels when empty),
    /// optionally including each level's units.
    pub async fn targets_for_levels(
        &self,
        level_ids: &[Id],
        include_units: bool,
    ) -> Result<Vec<ScanTarget>, ApiError> {
        let levels = self.api.list_levels().await?;
        let mut targets = Vec::new();

        for level in &levels {
            let Some(id) = level.id else {
                tracing::warn!("level '{}' has no id, skipping", level.code);
                continue;
            };
            if !level_ids.is_empty() && !level_ids.contains(&id) {
                continue;
            }
            targets.push(ScanTarget::level(level, id));

            if include_units {
                let mut units = self.api.list_units(id).await?;
                curriculum::sort_units(&mut units);
                for unit in units {
                    let Some(unit_id) = unit.id else { continue };
                    targets.push(ScanTarget {
                        owner: BankOwner::Unit(unit_id),
                        label: format!("{} / {}", level.code, unit.title),
                        level_code: Some(level.code.clone()),
                    });
                }
            }
        }

        for wanted in level_ids {
            if !levels.iter().any(|l| l.id == Some(*wanted)) {
                return Err(ApiError::NotFound(format!("level {wanted}")));
            }
        }

        Ok(targets)
    }

    /// Fetch and evaluate every target.
    ///
    /// A target whose fetch fails is reported and listed in
    /// [`ReadinessReport::failed`]; it does not abort the scan.
    pub async fn scan(
        &self,
        targets: &[ScanTarget],
        progress: &dyn ProgressReporter,
    ) -> ReadinessReport {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let mut futures = FuturesUnordered::new();

        for target in targets {
            let api = Arc::clone(&self.api);
            let semaphore = Arc::clone(&semaphore);
            let target = target.clone();

            futures.push(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        progress.on_bank_start(&target);
                        api.bank_summary(target.owner).await
                    }
                    Err(_) => Err(ApiError::Network("scan cancelled".into())),
                };
                (target, result)
            });
        }

        let mut entries = Vec::new();
        let mut failed = Vec::new();
        let total = futures.len();

        while let Some((target, result)) = futures.next().await {
            match result {
                Ok(summary) => {
                    let evaluation = match &self.config.profile {
                        Some(profile) => summary.evaluate_against(
                            profile.for_optional_level(target.level_code.as_deref()),
                        ),
                        None => summary.evaluate(),
                    };
                    let entry = BankReadiness {
                        owner: target.owner,
                        label: target.label,
                        level_code: target.level_code,
                        evaluation,
                    };
                    progress.on_bank_complete(&entry);
                    entries.push(entry);
                }
                Err(e) => {
                    tracing::error!("readiness fetch failed for {}: {e}", target.owner);
                    progress.on_bank_error(&target, &e);
                    failed.push(target.owner);
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_scan_complete(total, entries.len(), failed.len(), elapsed);

        // Completion order is nondeterministic; keep reports stable.
        entries.sort_by_key(|e| e.owner);
        failed.sort();

        ReadinessReport::new(
            self.api.name(),
            entries,
            failed,
            elapsed.as_millis() as u64,
        )
    }
}
