//! Centralized configuration for Trawler.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use crate::mode::RuntimeMode;

/// Central configuration for all Trawler components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct TrawlerConfig {
    /// Defaults applied to newly created profiles
    pub profiles: ProfileDefaultsConfig,
    /// API server settings
    pub server: ServerConfig,
    /// Runtime mode the services were started in
    pub runtime_mode: RuntimeMode,
}

/// Defaults applied when a profile is created with only a name.
///
/// The profile editor can change every one of these afterwards; they only
/// decide what a fresh profile looks like.
#[derive(Debug, Clone)]
pub struct ProfileDefaultsConfig {
    /// Whether new profiles seek upgrades at all
    pub upgrades_allowed: bool,
    /// Minimum format score a candidate must reach to be acceptable
    pub min_format_score: i64,
    /// Format score at which score-driven upgrades stop
    pub upgrade_until_format_score: i64,
    /// Minimum score delta required to replace a held release
    pub upgrade_score_increment: i64,
    /// Language preference for new profiles
    pub language: &'static str,
}

impl Default for ProfileDefaultsConfig {
    fn default() -> Self {
        Self {
            upgrades_allowed: true,
            min_format_score: 0,
            upgrade_until_format_score: 10000,
            upgrade_score_increment: 1,
            language: "english",
        }
    }
}

/// API server binding configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind the API server to
    pub host: String,
    /// Port to bind the API server to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl TrawlerConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("TRAWLER_PORT") {
            if let Ok(value) = port.parse::<u16>() {
                config.server.port = value;
            }
        }

        if let Ok(increment) = std::env::var("TRAWLER_UPGRADE_INCREMENT") {
            if let Ok(value) = increment.parse::<i64>() {
                config.profiles.upgrade_score_increment = value;
            }
        }

        if let Ok(floor) = std::env::var("TRAWLER_MIN_FORMAT_SCORE") {
            if let Ok(value) = floor.parse::<i64>() {
                config.profiles.min_format_score = value;
            }
        }

        if let Ok(mode) = std::env::var("TRAWLER_RUNTIME_MODE") {
            if let Ok(value) = mode.parse::<RuntimeMode>() {
                config.runtime_mode = value;
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    pub fn for_testing() -> Self {
        Self {
            runtime_mode: RuntimeMode::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Ephemeral port so tests never collide
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = TrawlerConfig::default();

        assert!(config.profiles.upgrades_allowed);
        assert_eq!(config.profiles.min_format_score, 0);
        assert_eq!(config.profiles.upgrade_until_format_score, 10000);
        assert_eq!(config.profiles.upgrade_score_increment, 1);
        assert_eq!(config.profiles.language, "english");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_testing_preset_uses_ephemeral_port() {
        let config = TrawlerConfig::for_testing();
        assert_eq!(config.server.port, 0);
        assert!(config.runtime_mode.is_development());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("TRAWLER_PORT", "8989");
            std::env::set_var("TRAWLER_UPGRADE_INCREMENT", "25");
            std::env::set_var("TRAWLER_MIN_FORMAT_SCORE", "-100");
            std::env::set_var("TRAWLER_RUNTIME_MODE", "production");
        }

        let config = TrawlerConfig::from_env();

        assert_eq!(config.server.port, 8989);
        assert_eq!(config.profiles.upgrade_score_increment, 25);
        assert_eq!(config.profiles.min_format_score, -100);
        assert!(config.runtime_mode.is_production());

        // Cleanup
        unsafe {
            std::env::remove_var("TRAWLER_PORT");
            std::env::remove_var("TRAWLER_UPGRADE_INCREMENT");
            std::env::remove_var("TRAWLER_MIN_FORMAT_SCORE");
            std::env::remove_var("TRAWLER_RUNTIME_MODE");
        }
    }
}
