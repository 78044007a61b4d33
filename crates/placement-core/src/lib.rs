//! placement-core — Data model, readiness policy, and scan engine.
//!
//! This crate defines the question-bank data model, the exam readiness
//! policy, and the traits that the API client crate implements.

pub mod bank;
pub mod content;
pub mod curriculum;
pub mod engine;
pub mod error;
pub mod model;
pub mod readiness;
pub mod report;
pub mod statistics;
pub mod thresholds;
pub mod traits;
pub mod validation;

pub use bank::{BankOwner, BankSummary, QuestionBank};
pub use error::ApiError;
pub use model::{Category, CategoryCounts, Id, RequiredThresholds};
pub use readiness::{evaluate_readiness, ReadinessEvaluation, ReadinessStatus};
