//! CLI command implementations

use std::path::{Path, PathBuf};

use clap::Subcommand;
use tokio::fs;
use trawler_core::config::TrawlerConfig;
use trawler_core::formats::{candidate_from_release, default_format_set};
use trawler_core::mode::RuntimeMode;
use trawler_core::profile::evaluator::evaluate;
use trawler_core::profile::tiers::default_tier_ladder;
use trawler_core::profile::validate::{Severity, validate};
use trawler_core::profile::{HeldItem, QualityProfile};
use trawler_core::{Result, TrawlerError};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Server {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Seed demo profiles for development
        #[arg(long)]
        demo: bool,
    },
    /// Print the default quality tier ladder
    Tiers,
    /// Check a profile file for structural problems
    Validate {
        /// Path to a profile JSON file
        profile: PathBuf,
    },
    /// Evaluate a release name against a profile file
    Evaluate {
        /// Path to a profile JSON file
        profile: PathBuf,
        /// Release name to parse and score
        release: String,
        /// Quality tier id of the currently held release
        #[arg(long)]
        held_quality: Option<String>,
        /// Format score of the currently held release
        #[arg(long, default_value_t = 0)]
        held_score: i64,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Server { host, port, demo } => start_server(host, port, demo).await,
        Commands::Tiers => print_tiers(),
        Commands::Validate { profile } => validate_profile(&profile).await,
        Commands::Evaluate {
            profile,
            release,
            held_quality,
            held_score,
        } => evaluate_release(&profile, &release, held_quality, held_score).await,
    }
}

/// Print the default quality tier ladder
fn print_tiers() -> Result<()> {
    println!("Default quality ladder (most preferred first)");
    println!("{:-<50}", "");
    for tier in default_tier_ladder() {
        let state = if tier.enabled { "" } else { "  (disabled)" };
        println!("{:>3}  {:<14} {}{state}", tier.order, tier.id, tier.name);
    }
    Ok(())
}

/// Load and validate a profile file
///
/// # Errors
/// - `TrawlerError::Io` - profile file could not be read
/// - `TrawlerError::Configuration` - profile file is not valid JSON
async fn validate_profile(path: &Path) -> Result<()> {
    let profile = load_profile(path).await?;

    println!("Validating profile '{}'", profile.name);
    println!("{:-<50}", "");

    let issues = validate(&profile);
    if issues.is_empty() {
        println!("No problems found.");
        return Ok(());
    }

    for issue in &issues {
        let tag = match issue.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "warn ",
        };
        println!("{tag}  {:<28} {}", issue.field, issue.message);
    }
    println!();
    println!("{} problem(s) found.", issues.len());
    Ok(())
}

/// Evaluate a release name against a profile file
///
/// # Errors
/// - `TrawlerError::Io` - profile file could not be read
/// - `TrawlerError::Configuration` - profile file is not valid JSON
async fn evaluate_release(
    path: &Path,
    release: &str,
    held_quality: Option<String>,
    held_score: i64,
) -> Result<()> {
    let profile = load_profile(path).await?;
    let formats = default_format_set();
    let candidate = candidate_from_release(release, &formats);
    let held = held_quality.map(|quality_id| HeldItem::new(&quality_id, held_score));

    println!("Release:  {release}");
    println!("Quality:  {}", candidate.quality_id);
    if candidate.matched_formats.is_empty() {
        println!("Formats:  (none matched)");
    } else {
        let matched: Vec<&str> = candidate
            .matched_formats
            .iter()
            .map(String::as_str)
            .collect();
        println!("Formats:  {}", matched.join(", "));
    }
    println!("{:-<50}", "");

    let report = evaluate(&profile, held.as_ref(), &candidate);
    println!("Profile:      {}", profile.name);
    println!("Format score: {}", report.format_score);
    match report.quality_rank {
        Some(rank) => println!("Tier rank:    {rank}"),
        None => println!("Tier rank:    not ranked"),
    }
    println!("Acceptable:   {}", if report.acceptable { "yes" } else { "no" });
    println!("Upgrade:      {}", if report.upgrade { "yes" } else { "no" });
    for reason in &report.reasons {
        println!("  - {reason}");
    }

    Ok(())
}

/// Read a profile from a JSON file
///
/// # Errors
/// - `TrawlerError::Io` - file could not be read
/// - `TrawlerError::Configuration` - contents are not a valid profile
async fn load_profile(path: &Path) -> Result<QualityProfile> {
    let contents = fs::read_to_string(path).await?;
    serde_json::from_str(&contents).map_err(|e| TrawlerError::Configuration {
        reason: format!("invalid profile file {}: {e}", path.display()),
    })
}

/// Start the API server
///
/// # Errors
/// - `TrawlerError::Server` - failed to bind or serve
pub async fn start_server(host: String, port: u16, demo: bool) -> Result<()> {
    let mode = if demo {
        RuntimeMode::Development
    } else {
        RuntimeMode::Production
    };

    println!("Starting Trawler API server...");
    println!("URL: http://{host}:{port}");
    println!("Mode: {mode}");
    println!("{:-<50}", "");
    println!("Profiles: http://{host}:{port}/api/profiles");
    println!("Stats: http://{host}:{port}/api/stats");
    println!();
    println!("Press Ctrl+C to stop the server");

    let mut config = TrawlerConfig::from_env();
    config.server.host = host;
    config.server.port = port;

    trawler_web::run_server(config, mode)
        .await
        .map_err(TrawlerError::from_server_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_profile_file(profile: &QualityProfile) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(profile).unwrap().as_bytes())
            .unwrap();
        file
    }

    fn sample_profile() -> QualityProfile {
        let mut store = trawler_core::profile::ProfileStore::with_defaults();
        store.create("Sample").clone()
    }

    #[test]
    fn test_print_tiers_runs() {
        assert!(print_tiers().is_ok());
    }

    #[tokio::test]
    async fn test_validate_profile_file() {
        let file = write_profile_file(&sample_profile());
        let result = validate_profile(file.path()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_validate_missing_file_is_io_error() {
        let result = validate_profile(Path::new("/no/such/profile.json")).await;
        assert!(matches!(result, Err(TrawlerError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let result = load_profile(file.path()).await;
        assert!(matches!(
            result,
            Err(TrawlerError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_evaluate_release_against_sample_profile() {
        let file = write_profile_file(&sample_profile());
        let result = evaluate_release(
            file.path(),
            "Movie.2023.1080p.WEB-DL.x265-GRP",
            Some("web-720p".to_string()),
            0,
        )
        .await;
        assert!(result.is_ok());
    }
}
