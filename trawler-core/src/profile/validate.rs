//! Structural validation for quality profiles.
//!
//! Validation never throws on the happy path: every violation is collected
//! into one list so a profile editor can surface all of them at once.
//! Warnings do not block saving; errors should.

use serde::{Deserialize, Serialize};

use super::types::QualityProfile;

/// Scores beyond this magnitude are rejected; far beyond any realistic
/// per-format total while keeping i64 sums overflow-proof.
pub const SCORE_LIMIT: i64 = 1_000_000;

/// Name substituted when a profile is saved with a blank name.
pub const UNNAMED: &str = "Unnamed";

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The profile can still be saved; behavior may surprise
    Warning,
    /// The profile structure is broken
    Error,
}

/// One validation finding, tied to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Whether this blocks a save
    pub severity: Severity,
    /// Profile field the finding is about
    pub field: &'static str,
    /// Human-readable description
    pub message: String,
}

impl ValidationIssue {
    fn error(field: &'static str, message: String) -> Self {
        Self {
            severity: Severity::Error,
            field,
            message,
        }
    }

    fn warning(field: &'static str, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            field,
            message,
        }
    }
}

/// Trims a profile name, substituting "Unnamed" for blank input.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Checks a profile against its structural invariants.
///
/// Reports every violation together rather than failing fast. An empty
/// result means the profile is sound.
pub fn validate(profile: &QualityProfile) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if profile.name.trim().is_empty() {
        issues.push(ValidationIssue::warning(
            "name",
            format!("name is blank and will be saved as '{UNNAMED}'"),
        ));
    }

    for (field, value) in [
        ("min_format_score", profile.min_format_score),
        (
            "upgrade_until_format_score",
            profile.upgrade_until_format_score,
        ),
    ] {
        if value.abs() > SCORE_LIMIT {
            issues.push(ValidationIssue::error(
                field,
                format!("{value} is outside the representable range ±{SCORE_LIMIT}"),
            ));
        }
    }

    if profile.upgrade_score_increment < 0 {
        issues.push(ValidationIssue::warning(
            "upgrade_score_increment",
            "a negative increment allows replacing a release with a worse-scoring one"
                .to_string(),
        ));
    }

    if let Some(ceiling) = profile.upgrade_until_quality.as_deref() {
        if profile.rank(ceiling).is_none() {
            issues.push(ValidationIssue::error(
                "upgrade_until_quality",
                format!("'{ceiling}' is not an enabled quality tier of this profile"),
            ));
        }
    }

    if profile.enabled_tiers().next().is_none() {
        issues.push(ValidationIssue::warning(
            "tiers",
            "no quality tier is enabled; this profile can never accept a release".to_string(),
        ));
    }

    let mut expected_order = 0u32;
    for tier in &profile.tiers {
        if tier.order != expected_order {
            issues.push(ValidationIssue::error(
                "tiers",
                format!(
                    "tier '{}' has order {} where {} was expected; ranking is not contiguous",
                    tier.id, tier.order, expected_order
                ),
            ));
            break;
        }
        expected_order += 1;
    }

    let mut seen_formats: Vec<&str> = Vec::new();
    for entry in &profile.format_scores {
        if seen_formats.contains(&entry.format_id.as_str()) {
            issues.push(ValidationIssue::warning(
                "format_scores",
                format!(
                    "format '{}' is scored more than once; the first entry wins",
                    entry.format_id
                ),
            ));
        } else {
            seen_formats.push(&entry.format_id);
        }
    }

    issues
}
