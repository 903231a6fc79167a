//! In-memory quality profile collection.
//!
//! Owns the profile set and the invariants that live above a single
//! profile: at most one default, never zero profiles once one exists, and
//! normalization/validation on every save. Callers wrap the store in
//! whatever locking their runtime needs; the store itself is synchronous.

use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use super::tiers::default_tier_ladder;
use super::types::QualityProfile;
use super::validate::{Severity, ValidationIssue, normalize_name, validate};
use crate::config::ProfileDefaultsConfig;

/// Profile lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No profile with this identifier exists.
    #[error("Profile not found: {id}")]
    NotFound {
        /// The identifier that failed to resolve
        id: String,
    },

    /// The last remaining profile cannot be deleted.
    #[error("Cannot delete the last remaining profile '{name}'")]
    LastProfile {
        /// Name of the surviving profile
        name: String,
    },

    /// The default profile cannot be deleted until another is promoted.
    #[error("Cannot delete the default profile '{name}'")]
    DefaultInUse {
        /// Name of the default profile
        name: String,
    },

    /// The profile failed validation with error-severity findings.
    #[error("Profile rejected with {} validation error(s)", issues.len())]
    Invalid {
        /// The error-severity findings that blocked the save
        issues: Vec<ValidationIssue>,
    },
}

/// The profile collection.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    defaults: ProfileDefaultsConfig,
    profiles: HashMap<String, QualityProfile>,
}

impl ProfileStore {
    /// Creates an empty store with the given new-profile defaults.
    pub fn new(defaults: ProfileDefaultsConfig) -> Self {
        Self {
            defaults,
            profiles: HashMap::new(),
        }
    }

    /// Creates an empty store with stock new-profile defaults.
    pub fn with_defaults() -> Self {
        Self::new(ProfileDefaultsConfig::default())
    }

    /// Creates a profile from a name, seeding the default tier ladder and
    /// store defaults. The first profile ever created becomes the default.
    pub fn create(&mut self, name: &str) -> &QualityProfile {
        let id = Uuid::new_v4().to_string();
        let profile = QualityProfile {
            id: id.clone(),
            name: normalize_name(name),
            is_default: self.profiles.is_empty(),
            upgrades_allowed: self.defaults.upgrades_allowed,
            upgrade_until_quality: None,
            min_format_score: self.defaults.min_format_score,
            upgrade_until_format_score: self.defaults.upgrade_until_format_score,
            upgrade_score_increment: self.defaults.upgrade_score_increment,
            language: self.defaults.language.to_string(),
            tiers: default_tier_ladder(),
            format_scores: Vec::new(),
        };
        info!(profile = %profile.name, %id, "created quality profile");
        self.profiles.entry(id).or_insert(profile)
    }

    /// Looks up a profile by identifier.
    pub fn get(&self, id: &str) -> Option<&QualityProfile> {
        self.profiles.get(id)
    }

    /// All profiles, default first, then alphabetical.
    pub fn list(&self) -> Vec<&QualityProfile> {
        let mut profiles: Vec<&QualityProfile> = self.profiles.values().collect();
        profiles.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        profiles
    }

    /// Number of profiles held.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store holds no profiles yet.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// The current default profile, if any.
    pub fn default_profile(&self) -> Option<&QualityProfile> {
        self.profiles.values().find(|p| p.is_default)
    }

    /// Saves an edited profile.
    ///
    /// Normalizes the name, then validates: error-severity findings reject
    /// the save, warnings ride along with success so the caller can surface
    /// them. Marking the profile default clears the flag everywhere else.
    ///
    /// # Errors
    /// - `StoreError::NotFound` - the profile id does not exist
    /// - `StoreError::Invalid` - validation produced error-severity findings
    pub fn update(&mut self, mut profile: QualityProfile) -> Result<Vec<ValidationIssue>, StoreError> {
        if !self.profiles.contains_key(&profile.id) {
            return Err(StoreError::NotFound {
                id: profile.id.clone(),
            });
        }

        profile.name = normalize_name(&profile.name);
        let (errors, warnings): (Vec<_>, Vec<_>) = validate(&profile)
            .into_iter()
            .partition(|i| i.severity == Severity::Error);
        if !errors.is_empty() {
            return Err(StoreError::Invalid { issues: errors });
        }

        if profile.is_default {
            for other in self.profiles.values_mut() {
                other.is_default = false;
            }
        }
        debug!(profile = %profile.name, warnings = warnings.len(), "saved quality profile");
        self.profiles.insert(profile.id.clone(), profile);
        Ok(warnings)
    }

    /// Deep-copies a profile under a fresh identifier.
    ///
    /// The copy is never the default and gets a " (Copy)" name suffix.
    ///
    /// # Errors
    /// - `StoreError::NotFound` - the source id does not exist
    pub fn clone_profile(&mut self, id: &str) -> Result<&QualityProfile, StoreError> {
        let source = self
            .profiles
            .get(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let mut copy = source.clone();
        copy.id = Uuid::new_v4().to_string();
        copy.name = format!("{} (Copy)", copy.name);
        copy.is_default = false;
        info!(source = id, copy = %copy.id, "cloned quality profile");
        Ok(self.profiles.entry(copy.id.clone()).or_insert(copy))
    }

    /// Deletes a profile.
    ///
    /// # Errors
    /// - `StoreError::NotFound` - the id does not exist
    /// - `StoreError::LastProfile` - it is the only profile left
    /// - `StoreError::DefaultInUse` - it is the default; promote another first
    pub fn delete(&mut self, id: &str) -> Result<QualityProfile, StoreError> {
        let profile = self
            .profiles
            .get(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        if self.profiles.len() == 1 {
            return Err(StoreError::LastProfile {
                name: profile.name.clone(),
            });
        }
        if profile.is_default {
            return Err(StoreError::DefaultInUse {
                name: profile.name.clone(),
            });
        }

        let removed = self.profiles.remove(id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;
        info!(profile = %removed.name, "deleted quality profile");
        Ok(removed)
    }

    /// Promotes a profile to default, demoting the previous one.
    ///
    /// # Errors
    /// - `StoreError::NotFound` - the id does not exist
    pub fn set_default(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.profiles.contains_key(id) {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        for (profile_id, profile) in self.profiles.iter_mut() {
            profile.is_default = profile_id == id;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::FormatScore;
    use crate::profile::validate::SCORE_LIMIT;

    #[test]
    fn test_first_profile_becomes_default() {
        let mut store = ProfileStore::with_defaults();
        let first_id = store.create("Any").id.clone();
        let second_id = store.create("HD").id.clone();

        assert!(store.get(&first_id).unwrap().is_default);
        assert!(!store.get(&second_id).unwrap().is_default);
    }

    #[test]
    fn test_create_seeds_ladder_and_defaults() {
        let mut store = ProfileStore::with_defaults();
        let profile = store.create("Fresh");

        assert_eq!(profile.tiers.len(), 13);
        assert!(profile.upgrades_allowed);
        assert!(profile.format_scores.is_empty());
        assert_eq!(profile.language, "english");
    }

    #[test]
    fn test_create_normalizes_blank_name() {
        let mut store = ProfileStore::with_defaults();
        assert_eq!(store.create("  ").name, "Unnamed");
    }

    #[test]
    fn test_update_returns_warnings_without_blocking() {
        let mut store = ProfileStore::with_defaults();
        let mut profile = store.create("Edited").clone();
        profile.format_scores = vec![
            FormatScore::new("x265", 100),
            FormatScore::new("x265", 250),
        ];

        let warnings = store.update(profile.clone()).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(store.get(&profile.id).unwrap().format_scores.len(), 2);
    }

    #[test]
    fn test_update_rejects_error_findings() {
        let mut store = ProfileStore::with_defaults();
        let mut profile = store.create("Broken").clone();
        profile.min_format_score = SCORE_LIMIT + 1;

        let result = store.update(profile);
        assert!(matches!(result, Err(StoreError::Invalid { .. })));
    }

    #[test]
    fn test_update_unknown_profile_is_not_found() {
        let mut store = ProfileStore::with_defaults();
        let mut profile = store.create("Known").clone();
        profile.id = "gone".to_string();

        assert_eq!(
            store.update(profile).unwrap_err(),
            StoreError::NotFound {
                id: "gone".to_string()
            }
        );
    }

    #[test]
    fn test_setting_default_clears_previous() {
        let mut store = ProfileStore::with_defaults();
        let first_id = store.create("First").id.clone();
        let mut second = store.create("Second").clone();

        second.is_default = true;
        store.update(second.clone()).unwrap();

        assert!(!store.get(&first_id).unwrap().is_default);
        assert!(store.get(&second.id).unwrap().is_default);
        assert_eq!(
            store.list().iter().filter(|p| p.is_default).count(),
            1
        );
    }

    #[test]
    fn test_clone_clears_default_and_renames() {
        let mut store = ProfileStore::with_defaults();
        let source_id = store.create("Original").id.clone();

        let copy = store.clone_profile(&source_id).unwrap();
        assert_eq!(copy.name, "Original (Copy)");
        assert!(!copy.is_default);
        let copy_id = copy.id.clone();
        assert_ne!(copy_id, source_id);

        // Deep copy: editing the clone leaves the source alone
        let mut edited = store.get(&copy_id).unwrap().clone();
        edited.tiers[0].enabled = false;
        crate::profile::tiers::restore_rank_invariant(&mut edited);
        store.update(edited).unwrap();
        assert!(store.get(&source_id).unwrap().tiers[0].enabled);
    }

    #[test]
    fn test_delete_last_profile_is_rejected() {
        let mut store = ProfileStore::with_defaults();
        let id = store.create("Only").id.clone();

        assert!(matches!(
            store.delete(&id),
            Err(StoreError::LastProfile { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_default_profile_is_rejected() {
        let mut store = ProfileStore::with_defaults();
        let default_id = store.create("Default").id.clone();
        let other_id = store.create("Other").id.clone();

        assert!(matches!(
            store.delete(&default_id),
            Err(StoreError::DefaultInUse { .. })
        ));

        // Promote, then the old default deletes fine
        store.set_default(&other_id).unwrap();
        assert!(store.delete(&default_id).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_orders_default_first_then_name() {
        let mut store = ProfileStore::with_defaults();
        store.create("zebra");
        let middle_id = store.create("middle").id.clone();
        store.create("alpha");
        store.set_default(&middle_id).unwrap();

        let names: Vec<&str> = store.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["middle", "alpha", "zebra"]);
    }
}
