//! Unsaved-edit tracking for profile editors.
//!
//! A draft is an explicit value: the pristine original, the edited copy,
//! and a dirty flag. Callers own it and pass it around; there is no
//! ambient editor state anywhere in the crate.

use super::ProfileError;
use super::tiers::{reorder_tiers, restore_rank_invariant};
use super::types::{FormatScore, QualityProfile};

/// An in-progress edit of one quality profile.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    original: QualityProfile,
    edited: QualityProfile,
    dirty: bool,
}

impl ProfileDraft {
    /// Opens a draft over a profile.
    pub fn new(profile: QualityProfile) -> Self {
        Self {
            original: profile.clone(),
            edited: profile,
            dirty: false,
        }
    }

    /// The profile as currently edited.
    pub fn edited(&self) -> &QualityProfile {
        &self.edited
    }

    /// The profile as it was when the draft was opened.
    pub fn original(&self) -> &QualityProfile {
        &self.original
    }

    /// Whether any edit has been made since opening or reverting.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Renames the profile.
    pub fn set_name(&mut self, name: &str) {
        self.edited.name = name.to_string();
        self.dirty = true;
    }

    /// Toggles upgrade-seeking.
    pub fn set_upgrades_allowed(&mut self, allowed: bool) {
        self.edited.upgrades_allowed = allowed;
        self.dirty = true;
    }

    /// Sets or clears the quality ceiling.
    pub fn set_upgrade_until_quality(&mut self, quality_id: Option<&str>) {
        self.edited.upgrade_until_quality = quality_id.map(str::to_string);
        self.dirty = true;
    }

    /// Sets the score floor, score ceiling and upgrade increment.
    pub fn set_score_thresholds(&mut self, floor: i64, ceiling: i64, increment: i64) {
        self.edited.min_format_score = floor;
        self.edited.upgrade_until_format_score = ceiling;
        self.edited.upgrade_score_increment = increment;
        self.dirty = true;
    }

    /// Sets the score for one format, replacing any existing entry.
    pub fn set_format_score(&mut self, format_id: &str, score: i64) {
        self.edited.format_scores.retain(|f| f.format_id != format_id);
        self.edited
            .format_scores
            .push(FormatScore::new(format_id, score));
        self.dirty = true;
    }

    /// Enables or disables a tier, restoring the ranking invariant.
    ///
    /// Unknown tier ids are ignored; the editor only offers tiers the
    /// profile already holds.
    pub fn set_tier_enabled(&mut self, quality_id: &str, enabled: bool) {
        let Some(tier) = self
            .edited
            .tiers
            .iter_mut()
            .find(|t| t.id == quality_id)
        else {
            return;
        };
        if tier.enabled == enabled {
            return;
        }
        tier.enabled = enabled;
        restore_rank_invariant(&mut self.edited);
        self.dirty = true;
    }

    /// Applies a user-chosen ordering of the enabled tiers.
    ///
    /// # Errors
    /// Propagates `ProfileError` from [`reorder_tiers`]; the draft is left
    /// untouched on failure.
    pub fn reorder(&mut self, ordered_ids: &[String]) -> Result<(), ProfileError> {
        self.edited = reorder_tiers(&self.edited, ordered_ids)?;
        self.dirty = true;
        Ok(())
    }

    /// Throws away every edit, returning to the original.
    pub fn revert(&mut self) {
        self.edited = self.original.clone();
        self.dirty = false;
    }

    /// Consumes the draft, yielding the edited profile for saving.
    pub fn into_edited(self) -> QualityProfile {
        self.edited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::store::ProfileStore;

    fn draft() -> ProfileDraft {
        ProfileDraft::new(ProfileStore::with_defaults().create("Draft").clone())
    }

    #[test]
    fn test_fresh_draft_is_clean() {
        let draft = draft();
        assert!(!draft.is_dirty());
        assert_eq!(draft.edited(), draft.original());
    }

    #[test]
    fn test_edits_mark_dirty() {
        let mut draft = draft();
        draft.set_name("Renamed");
        assert!(draft.is_dirty());
        assert_eq!(draft.edited().name, "Renamed");
        assert_ne!(draft.original().name, "Renamed");
    }

    #[test]
    fn test_revert_restores_original_and_clears_dirty() {
        let mut draft = draft();
        draft.set_score_thresholds(-100, 5000, 50);
        draft.set_format_score("x265", 120);
        draft.revert();

        assert!(!draft.is_dirty());
        assert_eq!(draft.edited(), draft.original());
    }

    #[test]
    fn test_set_format_score_replaces_existing_entry() {
        let mut draft = draft();
        draft.set_format_score("x265", 120);
        draft.set_format_score("x265", 300);

        let scores = &draft.edited().format_scores;
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 300);
    }

    #[test]
    fn test_disable_tier_keeps_ranking_contiguous() {
        let mut draft = draft();
        draft.set_tier_enabled("remux-2160p", false);

        let edited = draft.edited();
        assert_eq!(edited.rank("remux-2160p"), None);
        for (i, tier) in edited.tiers.iter().enumerate() {
            assert_eq!(tier.order, i as u32);
        }
    }

    #[test]
    fn test_noop_toggle_stays_clean() {
        let mut draft = draft();
        draft.set_tier_enabled("web-1080p", true); // already enabled
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_failed_reorder_leaves_draft_untouched() {
        let mut draft = draft();
        let before = draft.edited().clone();
        let result = draft.reorder(&["betamax".to_string()]);

        assert!(result.is_err());
        assert!(!draft.is_dirty());
        assert_eq!(draft.edited(), &before);
    }

    #[test]
    fn test_into_edited_round_trips_to_store() {
        let mut store = ProfileStore::with_defaults();
        let profile = store.create("Round Trip").clone();

        let mut draft = ProfileDraft::new(profile);
        draft.set_name("Round Trip v2");
        store.update(draft.into_edited()).unwrap();

        assert_eq!(store.list()[0].name, "Round Trip v2");
    }
}
