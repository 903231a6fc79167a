//! Property tests for the evaluator's guaranteed behaviors.

use proptest::prelude::*;
use trawler_core::profile::evaluator::{evaluate, format_score, is_acceptable, is_upgrade};
use trawler_core::profile::tiers::{reorder_tiers, restore_rank_invariant};
use trawler_core::profile::types::{FormatScore, HeldItem, QualityProfile, ReleaseCandidate};
use trawler_core::profile::ProfileStore;

const FORMAT_IDS: &[&str] = &["x265", "hdr10", "dolby-vision", "atmos", "repack", "upscaled"];

fn base_profile() -> QualityProfile {
    ProfileStore::with_defaults().create("Properties").clone()
}

fn enabled_ids(profile: &QualityProfile) -> Vec<String> {
    profile.enabled_tiers().map(|t| t.id.clone()).collect()
}

prop_compose! {
    /// Every known format gets a score in a plausible editor range.
    fn arb_scores()(values in prop::collection::vec(-2000i64..2000, FORMAT_IDS.len()))
        -> Vec<FormatScore>
    {
        FORMAT_IDS
            .iter()
            .zip(values)
            .map(|(id, score)| FormatScore::new(id, score))
            .collect()
    }
}

fn arb_matched() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(FORMAT_IDS.to_vec(), 0..=FORMAT_IDS.len())
        .prop_map(|ids| ids.into_iter().map(String::from).collect())
}

proptest! {
    #[test]
    fn prop_score_is_additive_over_matched_formats(
        scores in arb_scores(),
        matched in arb_matched(),
    ) {
        let mut profile = base_profile();
        profile.format_scores = scores.clone();

        // Formats unknown to the profile must contribute exactly 0
        let mut matched_plus_unknown = matched.clone();
        matched_plus_unknown.push("never-scored".to_string());
        let candidate = ReleaseCandidate::new("web-1080p", matched_plus_unknown);

        let expected: i64 = scores
            .iter()
            .filter(|f| matched.contains(&f.format_id))
            .map(|f| f.score)
            .sum();
        prop_assert_eq!(format_score(&profile, &candidate), expected);
    }

    #[test]
    fn prop_evaluation_is_deterministic(
        scores in arb_scores(),
        matched in arb_matched(),
        quality in prop::sample::select(vec!["web-2160p", "web-1080p", "cam", "betamax"]),
        held_score in -3000i64..3000,
    ) {
        let mut profile = base_profile();
        profile.format_scores = scores;
        let candidate = ReleaseCandidate::new(quality, matched);
        let held = HeldItem::new("web-1080p", held_score);

        let first = evaluate(&profile, Some(&held), &candidate);
        let second = evaluate(&profile, Some(&held), &candidate);
        prop_assert_eq!(first.acceptable, second.acceptable);
        prop_assert_eq!(first.upgrade, second.upgrade);
        prop_assert_eq!(first.format_score, second.format_score);
        prop_assert_eq!(first.quality_rank, second.quality_rank);
    }

    #[test]
    fn prop_rank_is_monotonic_after_reorder(
        ordering in Just(enabled_ids(&base_profile())).prop_shuffle(),
    ) {
        let profile = base_profile();
        let reordered = reorder_tiers(&profile, &ordering).unwrap();

        for window in ordering.windows(2) {
            let earlier = reordered.rank(&window[0]).unwrap();
            let later = reordered.rank(&window[1]).unwrap();
            prop_assert!(earlier < later);
        }
    }

    #[test]
    fn prop_floor_rejection_implies_no_upgrade(
        scores in arb_scores(),
        matched in arb_matched(),
        floor in -3000i64..3000,
    ) {
        let mut profile = base_profile();
        profile.format_scores = scores;
        profile.min_format_score = floor;
        let candidate = ReleaseCandidate::new("web-1080p", matched);
        let held = HeldItem::new("sdtv", 0);

        if format_score(&profile, &candidate) < floor {
            prop_assert!(!is_acceptable(&profile, &candidate));
            prop_assert!(!is_upgrade(&profile, &held, &candidate));
        } else {
            prop_assert!(is_acceptable(&profile, &candidate));
        }
    }

    #[test]
    fn prop_tier_ceiling_stops_tier_chasing(
        held_index in 0usize..11,
        candidate_index in 0usize..11,
    ) {
        let mut profile = base_profile();
        let ids = enabled_ids(&profile);
        // The held tier itself is the ceiling: rule 1 can never fire
        profile.upgrade_until_quality = Some(ids[held_index].clone());
        let held = HeldItem::new(&ids[held_index], 0);
        let candidate = ReleaseCandidate::new(&ids[candidate_index], Vec::<String>::new());

        if candidate_index < held_index {
            prop_assert!(!is_upgrade(&profile, &held, &candidate));
        }
    }

    #[test]
    fn prop_score_ceiling_stops_score_chasing(
        ceiling in -500i64..500,
        held_score in -500i64..500,
        candidate_score in -2000i64..2000,
    ) {
        let mut profile = base_profile();
        profile.min_format_score = -10000;
        profile.upgrade_until_format_score = ceiling;
        profile.format_scores = vec![FormatScore::new("pin", candidate_score)];
        let held = HeldItem::new("web-1080p", held_score);
        let candidate = ReleaseCandidate::new("web-1080p", ["pin"]);

        if held_score >= ceiling {
            prop_assert!(!is_upgrade(&profile, &held, &candidate));
        }
    }

    #[test]
    fn prop_disabled_tier_is_never_acceptable(
        tier_index in 0usize..13,
        matched in arb_matched(),
    ) {
        let mut profile = base_profile();
        profile.min_format_score = i64::MIN / 2;
        let tier_id = profile.tiers[tier_index].id.clone();
        profile
            .tiers
            .iter_mut()
            .find(|t| t.id == tier_id)
            .unwrap()
            .enabled = false;
        restore_rank_invariant(&mut profile);

        let candidate = ReleaseCandidate::new(&tier_id, matched);
        prop_assert!(!is_acceptable(&profile, &candidate));
        let held = HeldItem::new("web-1080p", 0);
        prop_assert!(!is_upgrade(&profile, &held, &candidate));
    }
}
