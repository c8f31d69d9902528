mod facebook;
pub mod fields;
mod instagram;
mod tiktok;
mod youtube;

use super::quality::quality_from_type;
use super::types::{DownloadAsset, MediaKind, MediaResult, Platform};
use fields::{first_str, item_url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("{platform} payload is not a recognizable object (got {found})")]
    Unrecognized {
        platform: Platform,
        found: &'static str,
    },
}

type Normalizer = fn(&Value) -> Result<MediaResult, NormalizationError>;

/// One entry per supported platform.
const NORMALIZERS: [(Platform, Normalizer); 4] = [
    (Platform::Tiktok, tiktok::normalize),
    (Platform::Instagram, instagram::normalize),
    (Platform::Youtube, youtube::normalize),
    (Platform::Facebook, facebook::normalize),
];

/// Maps a raw per-platform payload onto the uniform [`MediaResult`].
///
/// Missing or malformed fields fall back to defaults; only a payload that is
/// not an object (or, where the platform allows it, an array) is an error.
pub fn normalize(platform: Platform, raw: &Value) -> Result<MediaResult, NormalizationError> {
    let normalizer = NORMALIZERS
        .iter()
        .find(|(p, _)| *p == platform)
        .map(|(_, f)| *f)
        .unwrap_or(tiktok::normalize);

    let result = normalizer(raw)?;

    if result.is_soft_failure() {
        warn!("{} payload contained no downloadable media", platform);
    } else {
        debug!(
            "Normalized {} payload into {} assets",
            platform,
            result.assets.len()
        );
    }

    Ok(result)
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn unrecognized(platform: Platform, raw: &Value) -> NormalizationError {
    NormalizationError::Unrecognized {
        platform,
        found: json_type(raw),
    }
}

/// Generic `{url, type|extension, quality?, size?}` entry shared by the
/// platforms without a bespoke layout.
pub(crate) fn generic_asset(item: &Value) -> Option<DownloadAsset> {
    let url = item_url(item)?;
    let format = first_str(item, &["/type", "/extension", "/ext"]).unwrap_or_else(|| "mp4".into());
    let quality =
        first_str(item, &["/quality"]).unwrap_or_else(|| quality_from_type(&format).to_string());

    let kind = if quality == "Audio MP3" || format.contains("mp3") || format.contains("audio") {
        MediaKind::Audio
    } else if ["jpg", "jpeg", "png", "webp"].iter().any(|ext| format.contains(ext)) {
        MediaKind::Image
    } else {
        MediaKind::Video
    };

    let description = match first_str(item, &["/size"]) {
        Some(size) => format!("{} • {}", format.to_uppercase(), size),
        None => format.to_uppercase(),
    };

    Some(DownloadAsset::new(url, kind, quality, description))
}
