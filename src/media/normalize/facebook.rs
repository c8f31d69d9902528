use super::fields::{first_array, first_str, item_url};
use super::{generic_asset, unrecognized, NormalizationError};
use crate::media::types::{DownloadAsset, MediaKind, MediaResult, Platform, Preview};
use serde_json::Value;

const PLATFORM_LABEL: &str = "Facebook";
const NESTED_ITEMS: &[&str] = &["/data", "/medias", "/urls"];
const QUALITIES: [(&str, &str); 2] = [("HD", "High Definition"), ("SD", "Standard Definition")];

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

fn quality_of(item: &Value) -> Option<String> {
    first_str(item, &["/quality", "/resolution"]).map(|q| q.to_uppercase())
}

fn assets(items: &[&Value]) -> Vec<DownloadAsset> {
    let mut assets: Vec<DownloadAsset> = Vec::new();

    // First item per quality tag, in payload order.
    for item in items {
        let Some(quality) = quality_of(item) else {
            continue;
        };
        let Some((tag, description)) = QUALITIES.into_iter().find(|(tag, _)| *tag == quality) else {
            continue;
        };
        let label = format!("Video {}", tag);
        if assets.iter().any(|a| a.label == label) {
            continue;
        }
        if let Some(url) = item_url(item) {
            assets.push(DownloadAsset::new(url, MediaKind::Video, label, description));
        }
    }

    if assets.is_empty() {
        assets.extend(items.iter().find_map(|item| generic_asset(item)));
    }

    assets
}

pub fn normalize(raw: &Value) -> Result<MediaResult, NormalizationError> {
    let items = items(raw).ok_or_else(|| unrecognized(Platform::Facebook, raw))?;

    let mut preview = Preview::new(
        first_str(raw, &["/title"]).unwrap_or_else(|| "Facebook Video".to_string()),
        PLATFORM_LABEL,
    );
    preview.thumbnail_url = first_str(raw, &["/thumbnail"])
        .or_else(|| items.iter().find_map(|item| first_str(item, &["/thumbnail"])));
    preview.duration_label = first_str(raw, &["/duration"]);

    Ok(MediaResult {
        platform: Platform::Facebook,
        preview,
        assets: assets(&items),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quality_tagged_items() {
        let raw = json!([
            {"quality": "sd", "url": "https://cdn/sd.mp4"},
            {"quality": "HD", "url": "https://cdn/hd.mp4", "thumbnail": "https://cdn/t.jpg"}
        ]);
        let result = normalize(&raw).unwrap();

        assert_eq!(result.preview.title, "Facebook Video");
        assert_eq!(result.preview.author_name, "Facebook");
        assert_eq!(result.preview.thumbnail_url.as_deref(), Some("https://cdn/t.jpg"));

        let summary: Vec<_> = result
            .assets
            .iter()
            .map(|a| (a.label.as_str(), a.url.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Video SD", "https://cdn/sd.mp4"),
                ("Video HD", "https://cdn/hd.mp4")
            ]
        );
    }

    #[test]
    fn test_first_item_per_quality_in_payload_order() {
        let raw = json!({"data": [
            {"quality": "hd", "url": "https://cdn/hd.mp4"},
            {"quality": "sd"},
            {"quality": "HD", "url": "https://cdn/hd-2.mp4"},
            {"quality": "4K", "url": "https://cdn/4k.mp4"},
            {"quality": "SD", "url": "https://cdn/sd.mp4"}
        ]});
        let result = normalize(&raw).unwrap();

        let summary: Vec<_> = result
            .assets
            .iter()
            .map(|a| (a.label.as_str(), a.description.as_str(), a.url.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Video HD", "High Definition", "https://cdn/hd.mp4"),
                ("Video SD", "Standard Definition", "https://cdn/sd.mp4")
            ]
        );
    }

    #[test]
    fn test_untagged_falls_back_to_first_item() {
        let raw = json!({"title": "Reel", "data": [{"nope": 1}, {"url": "https://cdn/a.mp4"}, {"url": "https://cdn/b.mp4"}]});
        let result = normalize(&raw).unwrap();

        assert_eq!(result.preview.title, "Reel");
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].url, "https://cdn/a.mp4");
        assert_eq!(result.assets[0].label, "Video");
    }

    #[test]
    fn test_number_payload_is_rejected() {
        assert!(normalize(&json!(42)).is_err());
    }
}
