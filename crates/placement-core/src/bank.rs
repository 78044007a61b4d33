//! Question banks and the summary payload the API returns for them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{CategoryCounts, CategoryFlags, Id, RequiredThresholds};
use crate::readiness::ReadinessEvaluation;

/// The curriculum node that owns a bank. A bank has exactly one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum BankOwner {
    Level(Id),
    Unit(Id),
}

impl BankOwner {
    pub fn id(&self) -> Id {
        match self {
            BankOwner::Level(id) | BankOwner::Unit(id) => *id,
        }
    }

    /// Collection path segment of the owner (`levels` or `units`).
    pub fn collection(&self) -> &'static str {
        match self {
            BankOwner::Level(_) => "levels",
            BankOwner::Unit(_) => "units",
        }
    }
}

impl fmt::Display for BankOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankOwner::Level(id) => write!(f, "level {id}"),
            BankOwner::Unit(id) => write!(f, "unit {id}"),
        }
    }
}

/// Owner as the API encodes it: two nullable foreign keys.
#[derive(Debug)]
struct RawOwner {
    unit: Option<Id>,
    level: Option<Id>,
}

impl RawOwner {
    fn resolve(self) -> Result<BankOwner, String> {
        match (self.unit, self.level) {
            (Some(unit), None) => Ok(BankOwner::Unit(unit)),
            (None, Some(level)) => Ok(BankOwner::Level(level)),
            (Some(unit), Some(level)) => Err(format!(
                "bank is owned by both unit {unit} and level {level}"
            )),
            (None, None) => Err("bank has no owning unit or level".to_string()),
        }
    }
}

/// A question bank with a snapshot of its counts.
///
/// Reads and writes the API shape, with the owner as `unit` / `level` keys.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    pub id: Id,
    pub owner: BankOwner,
    pub questions: CategoryCounts,
}

#[derive(Serialize, Deserialize)]
struct RawBank {
    id: Id,
    #[serde(default)]
    unit: Option<Id>,
    #[serde(default)]
    level: Option<Id>,
    #[serde(default)]
    questions: CategoryCounts,
}

impl Serialize for QuestionBank {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (unit, level) = match self.owner {
            BankOwner::Unit(id) => (Some(id), None),
            BankOwner::Level(id) => (None, Some(id)),
        };
        RawBank {
            id: self.id,
            unit,
            level,
            questions: self.questions,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QuestionBank {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBank::deserialize(deserializer)?;
        let owner = RawOwner {
            unit: raw.unit,
            level: raw.level,
        }
        .resolve()
        .map_err(serde::de::Error::custom)?;
        Ok(QuestionBank {
            id: raw.id,
            owner,
            questions: raw.questions,
        })
    }
}

/// The readiness payload served for a bank.
///
/// `ready_status` and `is_ready_for_exam` are kept only to detect
/// disagreement; [`BankSummary::evaluate`] always recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSummary {
    #[serde(default)]
    pub questions: CategoryCounts,
    #[serde(default)]
    pub required_for_exam: RequiredThresholds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_status: Option<CategoryFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ready_for_exam: Option<bool>,
}

impl BankSummary {
    pub fn new(questions: CategoryCounts, required_for_exam: RequiredThresholds) -> Self {
        Self {
            questions,
            required_for_exam,
            ready_status: None,
            is_ready_for_exam: None,
        }
    }

    /// Recompute readiness from the raw counts.
    pub fn evaluate(&self) -> ReadinessEvaluation {
        self.evaluate_against(self.required_for_exam)
    }

    /// Recompute readiness against thresholds other than the served ones.
    pub fn evaluate_against(&self, required: RequiredThresholds) -> ReadinessEvaluation {
        let evaluation = ReadinessEvaluation::new(self.questions, required);
        if required == self.required_for_exam {
            self.report_disagreement(&evaluation);
        }
        evaluation
    }

    /// True when the server's own flags disagree with the recomputed ones.
    pub fn disagrees_with(&self, evaluation: &ReadinessEvaluation) -> bool {
        let flags_differ = self
            .ready_status
            .is_some_and(|flags| flags != evaluation.status.ready_status);
        let overall_differs = self
            .is_ready_for_exam
            .is_some_and(|ready| ready != evaluation.status.is_ready_for_exam);
        flags_differ || overall_differs
    }

    fn report_disagreement(&self, evaluation: &ReadinessEvaluation) {
        if self.disagrees_with(evaluation) {
            tracing::warn!(
                served = ?self.is_ready_for_exam,
                recomputed = evaluation.status.is_ready_for_exam,
                "server readiness flags disagree with counts; using recomputed values"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    #[test]
    fn bank_owned_by_unit() {
        let bank: QuestionBank = serde_json::from_str(
            r#"{"id": 9, "unit": 3, "level": null, "questions": {"grammar": 4}}"#,
        )
        .unwrap();
        assert_eq!(bank.owner, BankOwner::Unit(3));
        assert_eq!(bank.questions.get(Category::Grammar), 4);
    }

    #[test]
    fn bank_owned_by_level() {
        let bank: QuestionBank = serde_json::from_str(r#"{"id": 2, "level": 1}"#).unwrap();
        assert_eq!(bank.owner, BankOwner::Level(1));
        assert_eq!(bank.questions.total(), 0);
    }

    #[test]
    fn bank_with_two_owners_is_rejected() {
        let err = serde_json::from_str::<QuestionBank>(r#"{"id": 2, "level": 1, "unit": 5}"#)
            .unwrap_err();
        assert!(err.to_string().contains("both unit 5 and level 1"));
    }

    #[test]
    fn bank_without_owner_is_rejected() {
        let err = serde_json::from_str::<QuestionBank>(r#"{"id": 2}"#).unwrap_err();
        assert!(err.to_string().contains("no owning unit or level"));
    }

    #[test]
    fn bank_serializes_in_api_shape() {
        let bank = QuestionBank {
            id: 3,
            owner: BankOwner::Unit(7),
            questions: CategoryCounts::zero().with(Category::Reading, 2),
        };
        let json = serde_json::to_value(&bank).unwrap();
        assert_eq!(json["unit"], 7);
        assert!(json["level"].is_null());
        assert!(json.get("owner").is_none());

        let back: QuestionBank = serde_json::from_value(json).unwrap();
        assert_eq!(back, bank);
    }

    #[test]
    fn owner_serializes_tagged() {
        let json = serde_json::to_value(BankOwner::Unit(7)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "unit", "id": 7}));
        assert_eq!(BankOwner::Level(2).to_string(), "level 2");
        assert_eq!(BankOwner::Unit(7).collection(), "units");
    }

    #[test]
    fn summary_recomputes_untrusted_flags() {
        let summary: BankSummary = serde_json::from_str(
            r#"{
                "questions": {"vocabulary": 10, "grammar": 5, "reading": 0, "listening": 0,
                              "speaking": 0, "writing": 0, "total": 15},
                "required_for_exam": {"vocabulary": 10, "grammar": 10, "reading": 5,
                                      "listening": 5, "speaking": 5, "writing": 5},
                "ready_status": {"vocabulary": true, "grammar": true, "reading": true,
                                 "listening": true, "speaking": true, "writing": true},
                "is_ready_for_exam": true
            }"#,
        )
        .unwrap();

        let eval = summary.evaluate();
        assert!(!eval.is_ready_for_exam());
        assert_eq!(eval.overall_percent, 38);
        assert!(summary.disagrees_with(&eval));
    }

    #[test]
    fn summary_without_served_flags_agrees() {
        let summary = BankSummary::new(CategoryCounts::zero(), RequiredThresholds::none());
        let eval = summary.evaluate();
        assert!(eval.is_ready_for_exam());
        assert!(!summary.disagrees_with(&eval));
    }

    #[test]
    fn summary_tolerates_null_tables() {
        let summary: BankSummary =
            serde_json::from_str(r#"{"questions": null, "required_for_exam": null}"#).unwrap();
        assert!(summary.evaluate().is_ready_for_exam());
    }
}
