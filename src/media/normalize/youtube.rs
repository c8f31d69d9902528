use super::fields::{first_count, first_str, item_url};
use super::{generic_asset, unrecognized, NormalizationError};
use crate::media::quality::quality_from_type;
use crate::media::types::{DownloadAsset, MediaKind, MediaResult, Platform, Preview};
use crate::utils::{format_clock, format_views};
use serde_json::Value;

const RESOLUTIONS: [&str; 4] = ["1080p", "720p", "480p", "360p"];

fn preview(data: &Value) -> Preview {
    let mut preview = Preview::new(
        first_str(data, &["/title"]).unwrap_or_else(|| "Video".to_string()),
        first_str(data, &["/channel", "/author"]).unwrap_or_else(|| "Unknown".to_string()),
    );

    preview.thumbnail_url = first_str(data, &["/thumbnail"]);
    preview.duration_label = match data.get("duration") {
        Some(Value::Number(n)) => n.as_u64().map(format_clock),
        _ => first_str(data, &["/duration"]),
    };
    preview.views_label = first_count(data, &["/views"])
        .map(format_views)
        .or_else(|| first_str(data, &["/views"]));

    preview
}

fn size_or(entry: &Value, fallback: &str) -> String {
    first_str(entry, &["/size"]).unwrap_or_else(|| fallback.to_string())
}

fn assets(data: &Value) -> Vec<DownloadAsset> {
    let mut assets = Vec::new();

    if let Some(video) = data.get("video").filter(|v| v.is_object()) {
        for key in RESOLUTIONS {
            let Some(entry) = video.get(key) else {
                continue;
            };
            if let Some(url) = item_url(entry) {
                assets.push(DownloadAsset::new(
                    url,
                    MediaKind::Video,
                    quality_from_type(key),
                    size_or(entry, "MP4"),
                ));
            }
        }
    }

    // Single-format responses nest the download under `data.data`.
    if let Some(asset) = data.get("data").and_then(generic_asset) {
        assets.push(asset);
    }

    if assets.is_empty() {
        if let Some(asset) = generic_asset(data) {
            assets.push(asset);
        }
    }

    if let Some(entry) = data.get("audio") {
        if let Some(url) = item_url(entry) {
            assets.push(DownloadAsset::new(
                url,
                MediaKind::Audio,
                "Audio MP3",
                size_or(entry, "MP3"),
            ));
        }
    }

    assets
}

pub fn normalize(raw: &Value) -> Result<MediaResult, NormalizationError> {
    if !raw.is_object() {
        return Err(unrecognized(Platform::Youtube, raw));
    }

    Ok(MediaResult {
        platform: Platform::Youtube,
        preview: preview(raw),
        assets: assets(raw),
    })
}
