//! Custom format rules and release-name parsing.
//!
//! A custom format is a named pattern that contributes a configurable score
//! when it matches a release name. This module also detects the quality
//! tier of a scene-style release name so the acquisition pipeline can build
//! a [`ReleaseCandidate`] without hand-assembled sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::profile::ReleaseCandidate;

/// A named pattern rule matched against release names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFormat {
    /// Stable identifier, referenced by profile score entries
    pub id: String,
    /// Display name
    pub name: String,
    /// Case-insensitive regular expression applied to the release name
    pub pattern: String,
}

impl CustomFormat {
    /// Creates a format rule.
    pub fn new(id: &str, name: &str, pattern: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            pattern: pattern.to_string(),
        }
    }

    /// Whether this format matches the release name.
    ///
    /// An invalid pattern simply never matches; format authors see the
    /// problem through profile validation, not through a crashed scan.
    pub fn matches(&self, release_name: &str) -> bool {
        match regex::Regex::new(&format!("(?i){}", self.pattern)) {
            Ok(re) => re.is_match(release_name),
            Err(_) => false,
        }
    }
}

/// The stock format set seeded for demo profiles and the CLI.
pub fn default_format_set() -> Vec<CustomFormat> {
    vec![
        CustomFormat::new("x265", "x265 / HEVC", r"\b(x265|hevc|h\.?265)\b"),
        CustomFormat::new("hdr10", "HDR10", r"\bhdr(10(\+|plus)?)?\b"),
        CustomFormat::new("dolby-vision", "Dolby Vision", r"\b(dv|dovi|dolby[ .]?vision)\b"),
        CustomFormat::new("atmos", "Dolby Atmos", r"\batmos\b"),
        CustomFormat::new("repack", "Repack / Proper", r"\b(repack|proper)\b"),
        CustomFormat::new("upscaled", "Upscaled", r"\b(upscaled?|ai[ .]?upscale)\b"),
    ]
}

/// Collects the identifiers of every format matching the release name.
pub fn match_formats(release_name: &str, formats: &[CustomFormat]) -> BTreeSet<String> {
    formats
        .iter()
        .filter(|f| f.matches(release_name))
        .map(|f| f.id.clone())
        .collect()
}

/// Detects the quality tier of a scene-style release name.
///
/// Returns a tier id from the default ladder, or `None` when the name
/// carries no recognizable quality tokens.
pub fn detect_quality(release_name: &str) -> Option<&'static str> {
    let name = release_name.to_lowercase();
    let has = |tokens: &[&str]| tokens.iter().any(|t| name.contains(t));

    let is_2160 = has(&["2160p", "4k", "uhd"]);
    let is_1080 = has(&["1080p", "1080i"]);
    let is_720 = has(&["720p"]);

    if has(&["cam", "hdcam"]) && !has(&["camera"]) {
        return Some("cam");
    }
    if has(&["telesync", "hdts"]) {
        return Some("telesync");
    }
    if has(&["remux"]) {
        // 1080p remuxes fold into the bluray tier; the ladder only ranks
        // remuxes separately at 2160p
        return if is_2160 {
            Some("remux-2160p")
        } else {
            Some("bluray-1080p")
        };
    }
    if has(&["bluray", "blu-ray", "brrip", "bdrip"]) {
        return match (is_2160, is_1080, is_720) {
            (true, _, _) => Some("bluray-2160p"),
            (_, true, _) => Some("bluray-1080p"),
            (_, _, true) => Some("bluray-720p"),
            _ => Some("dvd"),
        };
    }
    if has(&["web-dl", "webdl", "webrip", "web "]) || name.contains(".web.") {
        return match (is_2160, is_1080, is_720) {
            (true, _, _) => Some("web-2160p"),
            (_, true, _) => Some("web-1080p"),
            (_, _, true) => Some("web-720p"),
            _ => Some("sdtv"),
        };
    }
    if has(&["hdtv"]) {
        return match (is_1080, is_720) {
            (true, _) => Some("hdtv-1080p"),
            (_, true) => Some("hdtv-720p"),
            _ => Some("sdtv"),
        };
    }
    if has(&["dvdrip", "dvd"]) {
        return Some("dvd");
    }
    if has(&["sdtv"]) {
        return Some("sdtv");
    }
    None
}

/// Builds a release candidate from a raw release name.
///
/// Unrecognizable quality tokens yield the "unknown" tier id, which no
/// profile ranks, so such candidates are rejected downstream rather than
/// crashing the scan.
pub fn candidate_from_release(release_name: &str, formats: &[CustomFormat]) -> ReleaseCandidate {
    let quality_id = detect_quality(release_name).unwrap_or("unknown");
    ReleaseCandidate {
        quality_id: quality_id.to_string(),
        matched_formats: match_formats(release_name, formats),
    }
}
