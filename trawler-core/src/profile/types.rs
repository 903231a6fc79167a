//! Data types for quality profiles and release evaluation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One named quality level inside a profile's ranked list.
///
/// Lower `order` means more preferred. Disabled tiers keep their slot in
/// the list so re-enabling restores a stable position, but they are never
/// selectable for a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityTier {
    /// Stable identifier, e.g. "web-1080p"
    pub id: String,
    /// Display name, e.g. "WEB 1080p"
    pub name: String,
    /// Whether this tier participates in ranking
    pub enabled: bool,
    /// Rank within the profile, lower = more preferred
    pub order: u32,
}

impl QualityTier {
    /// Creates an enabled tier. Order is assigned by the owning profile.
    pub fn new(id: &str, name: &str, order: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            enabled: true,
            order,
        }
    }

    /// Creates a disabled tier that keeps its slot without being rankable.
    pub fn disabled(id: &str, name: &str, order: u32) -> Self {
        Self {
            enabled: false,
            ..Self::new(id, name, order)
        }
    }
}

/// Score attached to one custom format within a profile.
///
/// Missing entries imply score 0. `recommended` is advisory only and never
/// enforced by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatScore {
    /// Custom format identifier this score applies to
    pub format_id: String,
    /// Signed score contributed when the format matches
    pub score: i64,
    /// Advisory score suggested by the format author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<i64>,
}

impl FormatScore {
    /// Creates a score entry with no recommendation attached.
    pub fn new(format_id: &str, score: i64) -> Self {
        Self {
            format_id: format_id.to_string(),
            score,
            recommended: None,
        }
    }
}

/// A quality profile: ranked tiers, format scores, and upgrade thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Unique identifier
    pub id: String,
    /// User-facing name
    pub name: String,
    /// Whether this is the store's default profile
    pub is_default: bool,
    /// Whether upgrade-seeking is enabled at all
    pub upgrades_allowed: bool,
    /// Tier id past which tier-driven upgrades stop; unset means no ceiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_until_quality: Option<String>,
    /// Candidates scoring below this are rejected outright
    pub min_format_score: i64,
    /// Held score at which score-driven upgrades stop
    pub upgrade_until_format_score: i64,
    /// Minimum score delta required to replace a held release
    pub upgrade_score_increment: i64,
    /// Language preference
    pub language: String,
    /// Ranked tier list, most preferred first
    pub tiers: Vec<QualityTier>,
    /// Per-format scores; at most one entry per format id
    pub format_scores: Vec<FormatScore>,
}

impl QualityProfile {
    /// Looks up a tier by identifier, enabled or not.
    pub fn tier(&self, quality_id: &str) -> Option<&QualityTier> {
        self.tiers.iter().find(|t| t.id == quality_id)
    }

    /// Rank of an enabled tier; `None` for disabled or unknown tiers.
    ///
    /// `None` is the "not selectable" sentinel: callers must treat it as
    /// candidate-unusable, never as an error to propagate.
    pub fn rank(&self, quality_id: &str) -> Option<u32> {
        self.tier(quality_id)
            .filter(|t| t.enabled)
            .map(|t| t.order)
    }

    /// Score configured for one format id; 0 when absent.
    ///
    /// When duplicates slipped into `format_scores` the first entry wins,
    /// keeping lookups deterministic.
    pub fn score_for(&self, format_id: &str) -> i64 {
        self.format_scores
            .iter()
            .find(|f| f.format_id == format_id)
            .map(|f| f.score)
            .unwrap_or(0)
    }

    /// Tiers that currently participate in ranking, most preferred first.
    pub fn enabled_tiers(&self) -> impl Iterator<Item = &QualityTier> {
        self.tiers.iter().filter(|t| t.enabled)
    }
}

/// A release observed by the acquisition pipeline, reduced to what the
/// evaluator needs: its quality tier and the custom formats it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseCandidate {
    /// Observed quality tier identifier
    pub quality_id: String,
    /// Matched custom format identifiers; a set, so duplicates never
    /// double-count
    pub matched_formats: BTreeSet<String>,
}

impl ReleaseCandidate {
    /// Creates a candidate from a tier id and any iterable of format ids.
    pub fn new<I, S>(quality_id: &str, matched_formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            quality_id: quality_id.to_string(),
            matched_formats: matched_formats.into_iter().map(Into::into).collect(),
        }
    }
}

/// The release currently retained for a piece of media, against which new
/// candidates are compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldItem {
    /// Quality tier of the held release
    pub quality_id: String,
    /// Format score the held release earned when it was grabbed
    pub format_score: i64,
}

impl HeldItem {
    /// Creates a held item from its tier and stored score.
    pub fn new(quality_id: &str, format_score: i64) -> Self {
        Self {
            quality_id: quality_id.to_string(),
            format_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tiers::default_tier_ladder;

    fn profile_with_ladder() -> QualityProfile {
        QualityProfile {
            id: "test".to_string(),
            name: "Test".to_string(),
            is_default: false,
            upgrades_allowed: true,
            upgrade_until_quality: None,
            min_format_score: 0,
            upgrade_until_format_score: 10000,
            upgrade_score_increment: 1,
            language: "english".to_string(),
            tiers: default_tier_ladder(),
            format_scores: vec![
                FormatScore::new("x265", 100),
                FormatScore::new("upscaled", -500),
            ],
        }
    }

    #[test]
    fn test_rank_ignores_disabled_tiers() {
        let mut profile = profile_with_ladder();
        assert!(profile.rank("web-1080p").is_some());

        let slot = profile
            .tiers
            .iter_mut()
            .find(|t| t.id == "web-1080p")
            .unwrap();
        slot.enabled = false;
        assert_eq!(profile.rank("web-1080p"), None);
        // The tier itself is retained
        assert!(profile.tier("web-1080p").is_some());
    }

    #[test]
    fn test_rank_unknown_tier_is_none() {
        let profile = profile_with_ladder();
        assert_eq!(profile.rank("betamax"), None);
    }

    #[test]
    fn test_score_for_missing_format_is_zero() {
        let profile = profile_with_ladder();
        assert_eq!(profile.score_for("x265"), 100);
        assert_eq!(profile.score_for("nonexistent"), 0);
    }

    #[test]
    fn test_score_for_duplicate_entries_first_wins() {
        let mut profile = profile_with_ladder();
        profile.format_scores.push(FormatScore::new("x265", 999));
        assert_eq!(profile.score_for("x265"), 100);
    }

    #[test]
    fn test_candidate_formats_deduplicate() {
        let candidate = ReleaseCandidate::new("web-1080p", ["x265", "x265", "hdr10"]);
        assert_eq!(candidate.matched_formats.len(), 2);
    }
}
