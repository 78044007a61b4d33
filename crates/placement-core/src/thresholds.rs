//! TOML threshold profiles.
//!
//! Loads the per-level minimum question counts from TOML files, and
//! validates them.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::RequiredThresholds;

/// Level codes the dashboard knows about.
pub const KNOWN_LEVEL_CODES: [&str; 6] = ["A1", "A2", "B1", "B2", "C1", "C2"];

/// Minimum question counts, per level, with a fallback for unlisted levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    /// Thresholds for levels without their own table.
    #[serde(default)]
    pub default: RequiredThresholds,
    /// Thresholds keyed by level code (e.g. "B1").
    #[serde(default)]
    pub levels: BTreeMap<String, RequiredThresholds>,
}

impl ThresholdProfile {
    /// Thresholds for a level code, falling back to the default table.
    ///
    /// Codes are matched case-insensitively.
    pub fn for_level(&self, code: &str) -> RequiredThresholds {
        let wanted = code.trim();
        self.levels
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(wanted))
            .map(|(_, t)| *t)
            .unwrap_or(self.default)
    }

    /// Thresholds for an optional level code.
    pub fn for_optional_level(&self, code: Option<&str>) -> RequiredThresholds {
        code.map(|c| self.for_level(c)).unwrap_or(self.default)
    }
}

/// Parse a single TOML file into a `ThresholdProfile`.
pub fn parse_profile(path: &Path) -> Result<ThresholdProfile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read thresholds file: {}", path.display()))?;

    parse_profile_str(&content, path)
}

/// Parse a TOML string into a `ThresholdProfile` (useful for testing).
pub fn parse_profile_str(content: &str, source_path: &Path) -> Result<ThresholdProfile> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
}

/// A warning from threshold validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The level code (if applicable).
    pub level: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a profile for common mistakes.
pub fn validate_profile(profile: &ThresholdProfile) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if profile.default.is_empty() {
        warnings.push(ValidationWarning {
            level: None,
            message: "default thresholds are all zero; unlisted levels are always ready".into(),
        });
    }

    for (code, thresholds) in &profile.levels {
        if !KNOWN_LEVEL_CODES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(code))
        {
            warnings.push(ValidationWarning {
                level: Some(code.clone()),
                message: format!("unknown level code: {code}"),
            });
        }
        if thresholds.is_empty() {
            warnings.push(ValidationWarning {
                level: Some(code.clone()),
                message: "all thresholds are zero; every bank is trivially ready".into(),
            });
        }
    }

    // Case-insensitive duplicates make for_level ambiguous.
    let mut seen = std::collections::HashSet::new();
    for code in profile.levels.keys() {
        if !seen.insert(code.to_uppercase()) {
            warnings.push(ValidationWarning {
                level: Some(code.clone()),
                message: format!("duplicate level code (case-insensitive): {code}"),
            });
        }
    }

    warnings
}
