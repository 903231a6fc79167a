//! Tier ladder seeding and user-controlled reordering.
//!
//! Order is an explicit integer per tier, mutated only through the
//! functions here, never inferred from display position.

use tracing::debug;

use super::types::{QualityProfile, QualityTier};
use crate::profile::ProfileError;

/// The tier ladder seeded into every new profile, most preferred first.
///
/// The junk tail (telesync, cam) ships disabled; enabling it is an explicit
/// per-profile decision.
pub fn default_tier_ladder() -> Vec<QualityTier> {
    vec![
        QualityTier::new("remux-2160p", "Remux 2160p", 0),
        QualityTier::new("bluray-2160p", "Bluray 2160p", 1),
        QualityTier::new("web-2160p", "WEB 2160p", 2),
        QualityTier::new("bluray-1080p", "Bluray 1080p", 3),
        QualityTier::new("web-1080p", "WEB 1080p", 4),
        QualityTier::new("hdtv-1080p", "HDTV 1080p", 5),
        QualityTier::new("bluray-720p", "Bluray 720p", 6),
        QualityTier::new("web-720p", "WEB 720p", 7),
        QualityTier::new("hdtv-720p", "HDTV 720p", 8),
        QualityTier::new("dvd", "DVD", 9),
        QualityTier::new("sdtv", "SDTV", 10),
        QualityTier::disabled("telesync", "Telesync", 11),
        QualityTier::disabled("cam", "Cam", 12),
    ]
}

/// Rewrites `order` as 0..n-1 by current list position.
///
/// The list must already hold enabled tiers ahead of disabled ones; both
/// `reorder_tiers` and tier toggling call this after restoring that
/// partition.
pub(crate) fn resequence(tiers: &mut [QualityTier]) {
    for (position, tier) in tiers.iter_mut().enumerate() {
        tier.order = position as u32;
    }
}

/// Stable-partitions tiers enabled-first and resequences their order.
///
/// Used after an enable/disable toggle so the ranking invariant (enabled
/// tiers occupy the contiguous prefix of order values) holds again.
pub fn restore_rank_invariant(profile: &mut QualityProfile) {
    profile.tiers.sort_by_key(|t| !t.enabled);
    resequence(&mut profile.tiers);
}

/// Applies a user-chosen ordering of the enabled tiers.
///
/// `ordered_ids` must be a permutation of the profile's enabled tier
/// identifiers. Disabled tiers keep their relative order and are appended
/// after the enabled ones, so re-enabling stays stable. If the profile's
/// `upgrade_until_quality` no longer names an enabled tier afterwards it is
/// reset to the most preferred enabled tier rather than left dangling.
///
/// Returns a new profile; the input is never mutated.
///
/// # Errors
/// - `ProfileError::UnknownTier` - an id is not present in the profile
/// - `ProfileError::DuplicateTier` - an id appears more than once
/// - `ProfileError::MissingEnabledTier` - an enabled tier was omitted
pub fn reorder_tiers(
    profile: &QualityProfile,
    ordered_ids: &[String],
) -> Result<QualityProfile, ProfileError> {
    let mut seen: Vec<&str> = Vec::with_capacity(ordered_ids.len());
    for id in ordered_ids {
        if profile.tier(id).is_none() {
            return Err(ProfileError::UnknownTier { id: id.clone() });
        }
        if seen.contains(&id.as_str()) {
            return Err(ProfileError::DuplicateTier { id: id.clone() });
        }
        seen.push(id);
    }
    for tier in profile.enabled_tiers() {
        if !seen.contains(&tier.id.as_str()) {
            return Err(ProfileError::MissingEnabledTier {
                id: tier.id.clone(),
            });
        }
    }

    let mut reordered = profile.clone();
    let mut tiers: Vec<QualityTier> = ordered_ids
        .iter()
        .filter_map(|id| profile.tier(id).cloned())
        .collect();
    // Disabled tiers trail the enabled ones in their existing relative order.
    // A disabled tier listed in ordered_ids is treated as enabled again.
    for tier in &mut tiers {
        tier.enabled = true;
    }
    tiers.extend(
        profile
            .tiers
            .iter()
            .filter(|t| !seen.contains(&t.id.as_str()))
            .map(|t| {
                let mut kept = t.clone();
                kept.enabled = false;
                kept
            }),
    );
    resequence(&mut tiers);
    reordered.tiers = tiers;

    let ceiling_ok = reordered
        .upgrade_until_quality
        .as_deref()
        .is_some_and(|id| reordered.rank(id).is_some());
    if reordered.upgrade_until_quality.is_some() && !ceiling_ok {
        let fallback = reordered.enabled_tiers().next().map(|t| t.id.clone());
        debug!(
            profile = %reordered.name,
            ?fallback,
            "upgrade_until_quality no longer enabled, resetting to top tier"
        );
        reordered.upgrade_until_quality = fallback;
    }

    Ok(reordered)
}
