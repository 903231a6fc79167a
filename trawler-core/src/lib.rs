//! Trawler Core - Quality profile engine
//!
//! This crate provides the decision layer for media acquisition: quality
//! profiles with ranked tier lists, custom format scoring, upgrade
//! decisions, and the profile collection store.

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]

pub mod config;
pub mod formats;
pub mod mode;
pub mod profile;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::TrawlerConfig;
pub use formats::CustomFormat;
pub use mode::RuntimeMode;
pub use profile::{
    Evaluation, HeldItem, ProfileError, ProfileStore, QualityProfile, QualityTier,
    ReleaseCandidate, StoreError,
};

/// Core errors that can bubble up from any Trawler subsystem.
#[derive(Debug, thiserror::Error)]
pub enum TrawlerError {
    /// Profile structure or tier ordering failure.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Profile store lifecycle failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration failure.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Why the configuration was rejected
        reason: String,
    },

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server failure.
    #[error("Server error: {reason}")]
    Server {
        /// What the server layer reported
        reason: String,
    },
}

impl TrawlerError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            TrawlerError::Profile(e) => match e {
                ProfileError::UnknownTier { id } => {
                    format!("Quality tier '{id}' does not exist in this profile")
                }
                ProfileError::MissingEnabledTier { id } => {
                    format!("Reorder must include every enabled tier (missing '{id}')")
                }
                ProfileError::DuplicateTier { id } => {
                    format!("Quality tier '{id}' appears more than once")
                }
            },
            TrawlerError::Store(e) => match e {
                StoreError::NotFound { id } => format!("Profile {id} not found"),
                StoreError::LastProfile { name } => {
                    format!("'{name}' is the last remaining profile and cannot be deleted")
                }
                StoreError::DefaultInUse { name } => {
                    format!("'{name}' is the default profile; choose another default first")
                }
                StoreError::Invalid { issues } => {
                    format!("Profile failed validation ({} problem(s))", issues.len())
                }
            },
            TrawlerError::Configuration { .. } => "Configuration error occurred".to_string(),
            TrawlerError::Io(_) => "File system error occurred".to_string(),
            TrawlerError::Server { reason } => format!("API server error: {reason}"),
        }
    }

    /// Wraps an error from the server layer.
    pub fn from_server_error(error: impl std::fmt::Display) -> Self {
        TrawlerError::Server {
            reason: error.to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TrawlerError::Profile(_) | TrawlerError::Configuration { .. }
        )
    }
}

/// Convenience alias for Results with TrawlerError.
pub type Result<T> = std::result::Result<T, TrawlerError>;
