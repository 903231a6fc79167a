//! End-to-end pipeline: store a profile, parse releases, walk the upgrade
//! path until both ceilings are reached.

use trawler_core::formats::{candidate_from_release, default_format_set};
use trawler_core::profile::draft::ProfileDraft;
use trawler_core::profile::evaluator::{evaluate, format_score, is_upgrade};
use trawler_core::profile::{HeldItem, ProfileStore, QualityProfile};

/// An upgrade-chasing profile built the way an editor session would:
/// through a draft over a stored profile.
fn upgrade_profile(store: &mut ProfileStore) -> QualityProfile {
    let created = store.create("Pipeline").clone();

    let mut draft = ProfileDraft::new(created);
    draft.set_upgrade_until_quality(Some("web-2160p"));
    draft.set_score_thresholds(-1000, 600, 100);
    draft.set_format_score("x265", 100);
    draft.set_format_score("hdr10", 500);
    draft.set_format_score("upscaled", -2000);
    assert!(draft.is_dirty());

    let edited = draft.into_edited();
    store.update(edited.clone()).expect("profile saves cleanly");
    store.get(&edited.id).expect("profile stored").clone()
}

#[test]
fn test_acquisition_walk_until_both_ceilings() {
    let mut store = ProfileStore::with_defaults();
    let profile = upgrade_profile(&mut store);
    let formats = default_format_set();

    // Nothing held yet: the first acceptable release is wanted
    let first = candidate_from_release("Show.S01E01.1080p.WEB-DL.x264-GRP", &formats);
    let report = evaluate(&profile, None, &first);
    assert!(report.acceptable);
    assert!(report.upgrade);
    let mut held = HeldItem::new(&first.quality_id, report.format_score);

    // A 2160p release is a tier upgrade even without format points
    let better_tier = candidate_from_release("Show.S01E01.2160p.WEB-DL.x264-GRP", &formats);
    assert!(is_upgrade(&profile, &held, &better_tier));
    held = HeldItem::new(
        &better_tier.quality_id,
        format_score(&profile, &better_tier),
    );

    // Held at the quality ceiling now: a same-tier x265+HDR release is a
    // score upgrade (0 -> 600 clears the 100 increment)
    let better_score =
        candidate_from_release("Show.S01E01.2160p.WEB-DL.HDR10.x265-GRP", &formats);
    assert!(is_upgrade(&profile, &held, &better_score));
    held = HeldItem::new(
        &better_score.quality_id,
        format_score(&profile, &better_score),
    );
    assert_eq!(held.format_score, 600);

    // Both ceilings reached: nothing same-tier upgrades any more
    let yet_another =
        candidate_from_release("Show.S01E01.2160p.WEB-DL.DV.HDR10.x265-REPACK", &formats);
    let final_report = evaluate(&profile, Some(&held), &yet_another);
    assert!(final_report.acceptable);
    assert!(!final_report.upgrade);
}

#[test]
fn test_junk_releases_never_enter_the_pipeline() {
    let mut store = ProfileStore::with_defaults();
    let profile = upgrade_profile(&mut store);
    let formats = default_format_set();

    // Cam rips parse to a tier the profile keeps disabled
    let cam = candidate_from_release("Show.S01E01.HDCAM.x264", &formats);
    assert!(!evaluate(&profile, None, &cam).acceptable);

    // An upscale's negative score drags it under the floor
    let upscale = candidate_from_release("Show.S01E01.2160p.WEB-DL.Upscaled.x264", &formats);
    assert_eq!(format_score(&profile, &upscale), -2000);
    assert!(!evaluate(&profile, None, &upscale).acceptable);
}

#[test]
fn test_unparseable_release_is_rejected_not_crashed() {
    let mut store = ProfileStore::with_defaults();
    let profile = upgrade_profile(&mut store);

    let mystery = candidate_from_release("totally mysterious file", &default_format_set());
    assert_eq!(mystery.quality_id, "unknown");

    let report = evaluate(&profile, None, &mystery);
    assert!(!report.acceptable);
    assert!(report.reasons[0].contains("not enabled"));
}
