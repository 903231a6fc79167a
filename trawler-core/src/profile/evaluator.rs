//! Release acceptability and upgrade decisions.
//!
//! Pure functions over a profile and a candidate: no I/O, no shared state,
//! safe to call concurrently. Repeated calls with the same inputs always
//! produce the same result.

use serde::{Deserialize, Serialize};

use super::types::{HeldItem, QualityProfile, ReleaseCandidate};

/// Sums the profile's scores for every format the candidate matched.
///
/// Formats the profile does not score contribute 0. The result may be
/// negative.
pub fn format_score(profile: &QualityProfile, candidate: &ReleaseCandidate) -> i64 {
    candidate
        .matched_formats
        .iter()
        .map(|id| profile.score_for(id))
        .sum()
}

/// Whether the candidate can be grabbed at all under this profile.
///
/// Rejected when its quality tier is disabled or unknown, or when its
/// format score falls below the profile's floor.
pub fn is_acceptable(profile: &QualityProfile, candidate: &ReleaseCandidate) -> bool {
    if profile.rank(&candidate.quality_id).is_none() {
        return false;
    }
    format_score(profile, candidate) >= profile.min_format_score
}

/// Whether the candidate should replace the currently held release.
///
/// Always false for unacceptable candidates and for profiles with upgrades
/// disabled. Otherwise the first matching rule wins:
///
/// 1. A strictly more preferred tier upgrades regardless of score, unless
///    the held tier has already reached the `upgrade_until_quality`
///    ceiling.
/// 2. At equal tier, the score delta must meet `upgrade_score_increment`
///    and the held score must still sit below
///    `upgrade_until_format_score`.
/// 3. A less preferred tier never upgrades.
///
/// A held release whose tier is unknown to the profile ranks below every
/// enabled tier, so any acceptable candidate counts as a tier upgrade.
pub fn is_upgrade(
    profile: &QualityProfile,
    held: &HeldItem,
    candidate: &ReleaseCandidate,
) -> bool {
    if !profile.upgrades_allowed || !is_acceptable(profile, candidate) {
        return false;
    }

    // is_acceptable guarantees the candidate tier ranks
    let Some(candidate_rank) = profile.rank(&candidate.quality_id) else {
        return false;
    };
    let held_rank = profile.rank(&held.quality_id);
    let ceiling_rank = profile
        .upgrade_until_quality
        .as_deref()
        .and_then(|id| profile.rank(id));

    match held_rank {
        // Unranked held release: strictly worse than any enabled tier.
        None => true,
        Some(held_rank) if candidate_rank < held_rank => {
            // Rule 1, gated by the tier ceiling: once the held release has
            // reached it, tier-chasing stops and only rule 2 applies.
            match ceiling_rank {
                Some(ceiling) if held_rank <= ceiling => false,
                _ => true,
            }
        }
        Some(held_rank) if candidate_rank == held_rank => {
            // Rule 2: same tier, score-driven.
            let delta = format_score(profile, candidate) - held.format_score;
            delta >= profile.upgrade_score_increment
                && held.format_score < profile.upgrade_until_format_score
        }
        // Rule 3: candidate tier is less preferred.
        Some(_) => false,
    }
}

/// One-shot evaluation report for the API and CLI surfaces.
///
/// Combines the individual decisions with human-readable rejection
/// reasons so callers never re-derive them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether the candidate clears the profile's floor checks
    pub acceptable: bool,
    /// Whether the candidate should replace the held release
    pub upgrade: bool,
    /// The candidate's summed format score
    pub format_score: i64,
    /// The candidate's tier rank, if its tier is enabled
    pub quality_rank: Option<u32>,
    /// Why the candidate was rejected or passed over, empty when upgrading
    pub reasons: Vec<String>,
}

/// Evaluates a candidate against a profile and an optionally held release.
///
/// With nothing held, any acceptable candidate is wanted and reported as
/// an upgrade over nothing.
pub fn evaluate(
    profile: &QualityProfile,
    held: Option<&HeldItem>,
    candidate: &ReleaseCandidate,
) -> Evaluation {
    let score = format_score(profile, candidate);
    let rank = profile.rank(&candidate.quality_id);
    let mut reasons = Vec::new();

    if rank.is_none() {
        reasons.push(format!(
            "quality tier '{}' is not enabled in profile '{}'",
            candidate.quality_id, profile.name
        ));
    }
    if score < profile.min_format_score {
        reasons.push(format!(
            "format score {score} is below the profile floor {}",
            profile.min_format_score
        ));
    }
    let acceptable = reasons.is_empty();

    let upgrade = match held {
        Some(held) => {
            let upgrade = is_upgrade(profile, held, candidate);
            if acceptable && !upgrade {
                reasons.push(upgrade_refusal_reason(profile, held, candidate, score));
            }
            upgrade
        }
        None => acceptable,
    };

    Evaluation {
        acceptable,
        upgrade,
        format_score: score,
        quality_rank: rank,
        reasons,
    }
}

/// Explains why an acceptable candidate still does not upgrade the held
/// release.
fn upgrade_refusal_reason(
    profile: &QualityProfile,
    held: &HeldItem,
    candidate: &ReleaseCandidate,
    score: i64,
) -> String {
    if !profile.upgrades_allowed {
        return "profile does not allow upgrades".to_string();
    }

    let candidate_rank = profile.rank(&candidate.quality_id);
    let held_rank = profile.rank(&held.quality_id);
    let ceiling_rank = profile
        .upgrade_until_quality
        .as_deref()
        .and_then(|id| profile.rank(id));

    match (candidate_rank, held_rank) {
        (Some(c), Some(h)) if c < h => {
            if let (Some(ceiling), Some(id)) = (ceiling_rank, profile.upgrade_until_quality.as_deref())
            {
                if h <= ceiling {
                    return format!("held release already meets the '{id}' quality ceiling");
                }
            }
            "tier upgrade refused".to_string()
        }
        (Some(c), Some(h)) if c == h => {
            if held.format_score >= profile.upgrade_until_format_score {
                format!(
                    "held score {} already meets the score ceiling {}",
                    held.format_score, profile.upgrade_until_format_score
                )
            } else {
                format!(
                    "score delta {} is below the upgrade increment {}",
                    score - held.format_score,
                    profile.upgrade_score_increment
                )
            }
        }
        _ => "candidate quality is not an improvement".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tiers::default_tier_ladder;
    use crate::profile::types::{FormatScore, QualityTier};

    /// Three-tier profile from the worked scenarios: WEB 2160p > WEB 1080p
    /// > WEB 720p, floor low enough to accept negative scores.
    fn scenario_profile() -> QualityProfile {
        QualityProfile {
            id: "scenario".to_string(),
            name: "Scenario".to_string(),
            is_default: false,
            upgrades_allowed: true,
            upgrade_until_quality: Some("web-2160p".to_string()),
            min_format_score: -10000,
            upgrade_until_format_score: 5500,
            upgrade_score_increment: 100,
            language: "english".to_string(),
            tiers: vec![
                QualityTier::new("web-2160p", "WEB 2160p", 0),
                QualityTier::new("web-1080p", "WEB 1080p", 1),
                QualityTier::new("web-720p", "WEB 720p", 2),
            ],
            format_scores: vec![
                FormatScore::new("hdr10", 500),
                FormatScore::new("x265", 100),
                FormatScore::new("upscaled", -500),
            ],
        }
    }

    fn candidate_scoring(quality_id: &str, score: i64) -> (QualityProfile, ReleaseCandidate) {
        // A candidate whose single matched format carries exactly `score`
        let mut profile = scenario_profile();
        profile.format_scores.push(FormatScore::new("pin", score));
        (profile, ReleaseCandidate::new(quality_id, ["pin"]))
    }

    #[test]
    fn test_score_sums_matched_formats_only() {
        let profile = scenario_profile();
        let candidate = ReleaseCandidate::new("web-1080p", ["hdr10", "x265", "unscored"]);
        assert_eq!(format_score(&profile, &candidate), 600);
    }

    #[test]
    fn test_score_may_be_negative() {
        let profile = scenario_profile();
        let candidate = ReleaseCandidate::new("web-1080p", ["upscaled"]);
        assert_eq!(format_score(&profile, &candidate), -500);
    }

    #[test]
    fn test_better_tier_upgrades_despite_negative_score() {
        // Scenario 1: held WEB 1080p score 0, candidate WEB 2160p at -500
        let (profile, candidate) = candidate_scoring("web-2160p", -500);
        let held = HeldItem::new("web-1080p", 0);

        assert!(is_acceptable(&profile, &candidate));
        assert!(is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_score_upgrade_at_quality_ceiling() {
        // Scenario 2: held at the ceiling tier, big score jump still wanted
        let (profile, candidate) = candidate_scoring("web-2160p", 5000);
        let held = HeldItem::new("web-2160p", 0);

        assert!(is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_score_ceiling_stops_score_chasing() {
        // Scenario 3: held score 5600 >= ceiling 5500, nothing same-tier upgrades
        let (profile, candidate) = candidate_scoring("web-2160p", 9000);
        let held = HeldItem::new("web-2160p", 5600);

        assert!(!is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_unknown_tier_never_acceptable() {
        // Scenario 4
        let profile = scenario_profile();
        let candidate = ReleaseCandidate::new("betamax", ["hdr10"]);
        let held = HeldItem::new("web-720p", 0);

        assert!(!is_acceptable(&profile, &candidate));
        assert!(!is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_upgrades_disallowed_blocks_everything() {
        // Scenario 6: better tier and better score, upgrades off
        let (mut profile, candidate) = candidate_scoring("web-2160p", 5000);
        profile.upgrades_allowed = false;
        let held = HeldItem::new("web-720p", 0);

        assert!(is_acceptable(&profile, &candidate));
        assert!(!is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_floor_rejects_low_scores() {
        let (mut profile, candidate) = candidate_scoring("web-1080p", -200);
        profile.min_format_score = 0;
        let held = HeldItem::new("web-720p", 0);

        assert!(!is_acceptable(&profile, &candidate));
        assert!(!is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_tier_ceiling_stops_tier_chasing() {
        // Held already at the ceiling: a strictly better tier is passed over
        let mut profile = scenario_profile();
        profile.upgrade_until_quality = Some("web-1080p".to_string());
        let held = HeldItem::new("web-1080p", 0);
        let candidate = ReleaseCandidate::new("web-2160p", ["hdr10"]);

        assert!(!is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_no_tier_ceiling_means_unbounded_tier_chasing() {
        let mut profile = scenario_profile();
        profile.upgrade_until_quality = None;
        let held = HeldItem::new("web-1080p", 0);
        let candidate = ReleaseCandidate::new("web-2160p", [] as [&str; 0]);

        assert!(is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_increment_prevents_churn() {
        // Delta 99 under increment 100 is not worth a replacement
        let (profile, candidate) = candidate_scoring("web-1080p", 99);
        let held = HeldItem::new("web-1080p", 0);

        assert!(!is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_worse_tier_never_upgrades() {
        let (profile, candidate) = candidate_scoring("web-720p", 9000);
        let held = HeldItem::new("web-1080p", 0);

        assert!(!is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_unranked_held_release_always_loses() {
        let profile = scenario_profile();
        let held = HeldItem::new("betamax", 9000);
        let candidate = ReleaseCandidate::new("web-720p", [] as [&str; 0]);

        assert!(is_upgrade(&profile, &held, &candidate));
    }

    #[test]
    fn test_evaluation_reports_rejection_reasons() {
        let mut profile = scenario_profile();
        profile.min_format_score = 0;
        let candidate = ReleaseCandidate::new("betamax", ["upscaled"]);

        let report = evaluate(&profile, None, &candidate);
        assert!(!report.acceptable);
        assert!(!report.upgrade);
        assert_eq!(report.reasons.len(), 2);
        assert_eq!(report.format_score, -500);
        assert_eq!(report.quality_rank, None);
    }

    #[test]
    fn test_evaluation_with_nothing_held_wants_any_acceptable() {
        let profile = scenario_profile();
        let candidate = ReleaseCandidate::new("web-720p", [] as [&str; 0]);

        let report = evaluate(&profile, None, &candidate);
        assert!(report.acceptable);
        assert!(report.upgrade);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn test_evaluation_explains_ceiling_refusal() {
        let (profile, candidate) = candidate_scoring("web-2160p", 9000);
        let held = HeldItem::new("web-2160p", 5600);

        let report = evaluate(&profile, Some(&held), &candidate);
        assert!(report.acceptable);
        assert!(!report.upgrade);
        assert!(report.reasons[0].contains("score ceiling"));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let profile = scenario_profile();
        let held = HeldItem::new("web-1080p", 250);
        let candidate = ReleaseCandidate::new("web-2160p", ["hdr10", "x265"]);

        let first = evaluate(&profile, Some(&held), &candidate);
        for _ in 0..10 {
            let again = evaluate(&profile, Some(&held), &candidate);
            assert_eq!(first.acceptable, again.acceptable);
            assert_eq!(first.upgrade, again.upgrade);
            assert_eq!(first.format_score, again.format_score);
        }
    }

    #[test]
    fn test_full_ladder_rank_comparison() {
        let mut profile = scenario_profile();
        profile.tiers = default_tier_ladder();
        let held = HeldItem::new("hdtv-720p", 0);
        let candidate = ReleaseCandidate::new("bluray-1080p", [] as [&str; 0]);

        // No ceiling set on the default ladder path here
        profile.upgrade_until_quality = None;
        assert!(is_upgrade(&profile, &held, &candidate));
    }
}
