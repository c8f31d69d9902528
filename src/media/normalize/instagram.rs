use super::fields::{first_array, first_str, item_url};
use super::{unrecognized, NormalizationError};
use crate::media::types::{DownloadAsset, MediaKind, MediaResult, Platform, Preview};
use serde_json::Value;

const PLATFORM_LABEL: &str = "Instagram";
const NESTED_ITEMS: &[&str] = &["/data", "/medias", "/items"];

struct Item<'a> {
    url: String,
    kind: MediaKind,
    raw: &'a Value,
}

/// Posts arrive either as a bare array, an object wrapping an array, or a
/// single media object.
fn items(raw: &Value) -> Option<Vec<&Value>> {
    match raw {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(_) => Some(match first_array(raw, NESTED_ITEMS) {
            Some(items) => items.iter().collect(),
            None => vec![raw],
        }),
        _ => None,
    }
}

fn kind_of(item: &Value) -> MediaKind {
    match item.get("type").and_then(Value::as_str) {
        Some("mp4") => MediaKind::Video,
        _ => MediaKind::Image,
    }
}

fn asset_for(item: &Item<'_>, position: usize, total: usize) -> DownloadAsset {
    let noun = match item.kind {
        MediaKind::Video => "Video",
        _ => "Foto",
    };
    let label = if total > 1 {
        format!("{} {}", noun, position)
    } else {
        noun.to_string()
    };
    let description = item
        .raw
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_uppercase)
        .unwrap_or_else(|| "Image".to_string());

    DownloadAsset::new(item.url.clone(), item.kind, label, description)
}

fn download_all(items: &[Item<'_>]) -> DownloadAsset {
    let kind = if items.iter().any(|i| i.kind == MediaKind::Video) {
        MediaKind::Video
    } else {
        MediaKind::Image
    };
    let mut asset = DownloadAsset::new(
        items[0].url.clone(),
        kind,
        "Download All",
        format!("{} items", items.len()),
    );
    asset.bundle = items.iter().map(|i| i.url.clone()).collect();
    asset
}

pub fn normalize(raw: &Value) -> Result<MediaResult, NormalizationError> {
    let entries = items(raw).ok_or_else(|| unrecognized(Platform::Instagram, raw))?;

    let items: Vec<Item<'_>> = entries
        .into_iter()
        .filter_map(|raw| {
            item_url(raw).map(|url| Item {
                url,
                kind: kind_of(raw),
                raw,
            })
        })
        .collect();

    let title = if items.len() > 1 {
        format!("Instagram Post ({} items)", items.len())
    } else {
        first_str(raw, &["/caption", "/title"]).unwrap_or_else(|| "Instagram Post".to_string())
    };
    let mut preview = Preview::new(title, PLATFORM_LABEL);
    preview.thumbnail_url = items.first().and_then(|first| {
        first_str(first.raw, &["/thumbnail", "/thumb"])
            .or_else(|| (first.kind == MediaKind::Image).then(|| first.url.clone()))
    });

    let mut assets: Vec<DownloadAsset> = items
        .iter()
        .enumerate()
        .map(|(i, item)| asset_for(item, i + 1, items.len()))
        .collect();
    if items.len() > 1 {
        assets.push(download_all(&items));
    }

    Ok(MediaResult {
        platform: Platform::Instagram,
        preview,
        assets,
    })
}
