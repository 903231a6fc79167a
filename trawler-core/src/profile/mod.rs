//! Quality profiles and the upgrade decision layer.
//!
//! A profile ranks quality tiers, attaches scores to custom formats, and
//! carries the thresholds that decide when a release is acceptable and when
//! a held release should be replaced. Everything in this module is pure and
//! synchronous; persistence and transport live in the crates above.

pub mod draft;
pub mod evaluator;
pub mod store;
pub mod tiers;
pub mod types;
pub mod validate;

pub use draft::ProfileDraft;
pub use evaluator::Evaluation;
pub use store::{ProfileStore, StoreError};
pub use tiers::default_tier_ladder;
pub use types::{FormatScore, HeldItem, QualityProfile, QualityTier, ReleaseCandidate};
pub use validate::{Severity, ValidationIssue, validate};

/// Errors for profile structure and tier ordering operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// Reorder referenced a tier the profile does not contain.
    #[error("Unknown quality tier: {id}")]
    UnknownTier {
        /// The identifier that failed to resolve
        id: String,
    },

    /// Reorder omitted a tier that is currently enabled.
    #[error("Reorder omits enabled quality tier: {id}")]
    MissingEnabledTier {
        /// The enabled identifier that was left out
        id: String,
    },

    /// Reorder listed the same tier twice.
    #[error("Duplicate quality tier in reorder: {id}")]
    DuplicateTier {
        /// The identifier that appeared more than once
        id: String,
    },
}
