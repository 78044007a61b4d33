//! Exam readiness policy.
//!
//! Compares a bank's current question counts with the minimums its level
//! requires. Everything here is pure and infallible: malformed counts have
//! already been clamped to zero when the tables were decoded.

use serde::{Deserialize, Serialize};

use crate::model::{Category, CategoryCounts, CategoryFlags, RequiredThresholds};

/// Which categories meet their minimum, and whether all of them do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessStatus {
    pub ready_status: CategoryFlags,
    pub is_ready_for_exam: bool,
}

impl ReadinessStatus {
    /// Readiness of a single category.
    pub fn is_ready(&self, category: Category) -> bool {
        self.ready_status.get(category)
    }

    /// Categories that are still short of their minimum.
    pub fn missing(&self) -> Vec<Category> {
        self.ready_status
            .iter()
            .filter(|(_, ready)| !ready)
            .map(|(c, _)| c)
            .collect()
    }
}

/// Evaluate readiness of `current` against `required`.
///
/// A category is ready when `current >= required`; a zero requirement is
/// therefore always met. The bank is ready for an exam when all six are.
pub fn evaluate_readiness(
    current: &CategoryCounts,
    required: &RequiredThresholds,
) -> ReadinessStatus {
    let ready_status: CategoryFlags = Category::ALL
        .iter()
        .map(|&c| (c, current.get(c) >= required.get(c)))
        .collect();

    ReadinessStatus {
        ready_status,
        is_ready_for_exam: ready_status.all(),
    }
}

/// `round(100 * numerator / denominator)`, capped at 100; 100 when the
/// denominator is zero.
fn rounded_percent(numerator: u64, denominator: u64) -> u8 {
    if denominator == 0 {
        return 100;
    }
    // Integer round-half-up: (200n + d) / 2d == round(100n / d).
    let percent = (200 * numerator + denominator) / (2 * denominator);
    percent.min(100) as u8
}

/// Progress of one category towards its minimum, in percent.
pub fn category_progress(current: u32, required: u32) -> u8 {
    rounded_percent(current as u64, required as u64)
}

/// Progress of the whole bank, `round(100 * sum(current) / sum(required))`.
pub fn overall_progress(current: &CategoryCounts, required: &RequiredThresholds) -> u8 {
    rounded_percent(current.total(), required.total())
}

/// Per-category progress percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub category: Category,
    pub current: u32,
    pub required: u32,
    pub percent: u8,
    pub ready: bool,
}

impl CategoryProgress {
    /// Questions still needed to reach the minimum.
    pub fn shortfall(&self) -> u32 {
        self.required.saturating_sub(self.current)
    }
}

/// Everything the presentation layer needs for one bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessEvaluation {
    pub questions: CategoryCounts,
    pub required_for_exam: RequiredThresholds,
    pub status: ReadinessStatus,
    pub categories: Vec<CategoryProgress>,
    pub overall_percent: u8,
}

impl ReadinessEvaluation {
    pub fn new(current: CategoryCounts, required: RequiredThresholds) -> Self {
        let status = evaluate_readiness(&current, &required);
        let categories = Category::ALL
            .iter()
            .map(|&c| CategoryProgress {
                category: c,
                current: current.get(c),
                required: required.get(c),
                percent: category_progress(current.get(c), required.get(c)),
                ready: status.is_ready(c),
            })
            .collect();

        Self {
            questions: current,
            required_for_exam: required,
            status,
            categories,
            overall_percent: overall_progress(&current, &required),
        }
    }

    pub fn is_ready_for_exam(&self) -> bool {
        self.status.is_ready_for_exam
    }

    /// Progress entry for one category.
    pub fn category(&self, category: Category) -> Option<&CategoryProgress> {
        self.categories.iter().find(|p| p.category == category)
    }

    /// Total questions still needed across all categories.
    pub fn total_shortfall(&self) -> u64 {
        self.categories.iter().map(|p| p.shortfall() as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: [u32; 6]) -> CategoryCounts {
        Category::ALL.iter().copied().zip(values).collect()
    }

    fn thresholds(values: [u32; 6]) -> RequiredThresholds {
        Category::ALL.iter().copied().zip(values).collect()
    }

    #[test]
    fn zero_requirement_is_always_ready() {
        let status = evaluate_readiness(&counts([0; 6]), &thresholds([0, 3, 0, 0, 0, 0]));
        assert!(status.is_ready(Category::Vocabulary));
        assert!(!status.is_ready(Category::Grammar));
        assert!(status.is_ready(Category::Writing));
    }

    #[test]
    fn meeting_or_exceeding_is_ready() {
        let status = evaluate_readiness(
            &counts([5, 9, 0, 0, 0, 0]),
            &thresholds([5, 4, 1, 0, 0, 0]),
        );
        assert!(status.is_ready(Category::Vocabulary));
        assert!(status.is_ready(Category::Grammar));
        assert!(!status.is_ready(Category::Reading));
        assert!(!status.is_ready_for_exam);
        assert_eq!(status.missing(), vec![Category::Reading]);
    }

    #[test]
    fn ready_for_exam_iff_all_ready() {
        let status = evaluate_readiness(&counts([3; 6]), &thresholds([3; 6]));
        assert!(status.is_ready_for_exam);
        assert!(status.missing().is_empty());

        let status = evaluate_readiness(&counts([3, 3, 3, 3, 3, 2]), &thresholds([3; 6]));
        assert!(!status.is_ready_for_exam);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let current = counts([1, 2, 3, 4, 5, 6]);
        let required = thresholds([6, 5, 4, 3, 2, 1]);
        assert_eq!(
            ReadinessEvaluation::new(current, required),
            ReadinessEvaluation::new(current, required)
        );
    }

    #[test]
    fn worked_example_partial_bank() {
        let current = counts([10, 5, 0, 0, 0, 0]);
        let required = thresholds([10, 10, 5, 5, 5, 5]);
        let eval = ReadinessEvaluation::new(current, required);

        assert!(eval.status.is_ready(Category::Vocabulary));
        for c in &Category::ALL[1..] {
            assert!(!eval.status.is_ready(*c), "{c} should not be ready");
        }
        assert!(!eval.is_ready_for_exam());
        assert_eq!(eval.overall_percent, 38);
        assert_eq!(eval.category(Category::Grammar).unwrap().percent, 50);
        assert_eq!(eval.total_shortfall(), 25);
    }

    #[test]
    fn worked_example_all_zero() {
        let eval = ReadinessEvaluation::new(counts([0; 6]), thresholds([0; 6]));
        assert!(eval.is_ready_for_exam());
        assert_eq!(eval.overall_percent, 100);
        assert!(eval.categories.iter().all(|p| p.percent == 100));
    }

    #[test]
    fn percentages_cap_and_guard_zero() {
        assert_eq!(category_progress(25, 10), 100);
        assert_eq!(category_progress(7, 0), 100);
        assert_eq!(category_progress(0, 0), 100);
        assert_eq!(category_progress(0, 3), 0);
        assert_eq!(category_progress(1, 3), 33);
        assert_eq!(category_progress(2, 3), 67);
        assert_eq!(category_progress(1, 8), 13);
        assert_eq!(overall_progress(&counts([50; 6]), &thresholds([1; 6])), 100);
    }
}
