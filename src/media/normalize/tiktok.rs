use super::fields::{first_array, first_count, first_str, first_text, item_url};
use super::{unrecognized, NormalizationError};
use crate::media::types::{DownloadAsset, MediaKind, MediaResult, Platform, Preview, Stats};
use crate::utils::{format_number, format_views};
use chrono::DateTime;
use serde_json::Value;

/// Placeholder links some extractor versions return instead of omitting a field.
const SENTINEL_URLS: [&str; 2] = ["https://snaptikpro.net/", "#"];

const THUMBNAIL: &[&str] = &[
    "/author/avatarThumb",
    "/author/avatar_thumb/url_list/0",
    "/author/avatarMedium",
    "/author/avatar_medium/url_list/0",
];
const TITLE: &[&str] = &["/caption", "/description", "/desc", "/title"];
const AUTHOR: &[&str] = &["/author/nickname", "/author/unique_id", "/author/uniqueId"];
const DURATION: &[&str] = &["/music/duration"];
const VIEWS: &[&str] = &["/statistic/views", "/stats/playCount", "/statistic/play_count"];
const LIKES: &[&str] = &["/statistic/likes", "/stats/diggCount", "/statistic/digg_count"];
const COMMENTS: &[&str] = &[
    "/statistic/comments",
    "/stats/commentCount",
    "/statistic/comment_count",
];
const SHARES: &[&str] = &["/statistic/shares", "/stats/shareCount", "/statistic/share_count"];
const SAVES: &[&str] = &["/statistic/saves", "/stats/collectCount", "/statistic/collect_count"];
const CREATED: &[&str] = &["/create_time", "/createTime"];

const VIDEO: &[&str] = &["/video", "/video/noWatermark", "/video/no_watermark", "/play"];
const VIDEO_WM: &[&str] = &["/videoWM", "/video/watermark", "/wmplay"];
const AUDIO: &[&str] = &[
    "/audio",
    "/music/play_url",
    "/music/playUrl",
    "/music/play_url/url_list/0",
];
const MUSIC_TITLE: &[&str] = &["/music/title"];
const IMAGES: &[&str] = &["/photo", "/images"];

fn media_url(data: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|ptr| {
        first_str(data, &[*ptr]).filter(|url| !SENTINEL_URLS.contains(&url.as_str()))
    })
}

fn preview(data: &Value) -> Preview {
    let mut preview = Preview::new(
        first_str(data, TITLE).unwrap_or_else(|| "TikTok Video".to_string()),
        first_str(data, AUTHOR).unwrap_or_else(|| "Unknown".to_string()),
    );

    preview.thumbnail_url = first_str(data, THUMBNAIL);
    preview.duration_label = first_text(data, DURATION).map(|d| format!("{}s", d));
    preview.views_label = first_count(data, VIEWS).map(format_views);
    preview.uploaded_at = first_count(data, CREATED)
        .and_then(|ts| i64::try_from(ts).ok())
        .and_then(|ts| DateTime::from_timestamp(ts, 0));

    let stats = Stats {
        likes: first_count(data, LIKES).map(format_number),
        comments: first_count(data, COMMENTS).map(format_number),
        shares: first_count(data, SHARES).map(format_number),
        saves: first_count(data, SAVES).map(format_number),
    };
    if !stats.is_empty() {
        preview.stats_label = Some(stats);
    }

    preview
}

/// Video takes precedence over a photo carousel: when either video variant is
/// present the image list is not offered.
fn assets(data: &Value) -> Vec<DownloadAsset> {
    let mut assets = Vec::new();

    if let Some(url) = media_url(data, VIDEO) {
        assets.push(DownloadAsset::new(url, MediaKind::Video, "Video HD", "No Watermark"));
    }
    if let Some(url) = media_url(data, VIDEO_WM) {
        assets.push(DownloadAsset::new(url, MediaKind::Video, "Video HD", "With Watermark"));
    }

    if assets.is_empty() {
        if let Some(images) = first_array(data, IMAGES) {
            let urls: Vec<String> = images.iter().filter_map(item_url).collect();
            let total = urls.len();
            for (i, url) in urls.into_iter().enumerate() {
                assets.push(DownloadAsset::new(
                    url,
                    MediaKind::Image,
                    format!("Foto {}", i + 1),
                    format!("Slide {} of {}", i + 1, total),
                ));
            }
        }
    }

    if let Some(url) = media_url(data, AUDIO) {
        let title = first_str(data, MUSIC_TITLE).unwrap_or_else(|| "Audio".to_string());
        assets.push(DownloadAsset::new(url, MediaKind::Audio, "Audio MP3", title));
    }

    assets
}

pub fn normalize(raw: &Value) -> Result<MediaResult, NormalizationError> {
    if !raw.is_object() {
        return Err(unrecognized(Platform::Tiktok, raw));
    }

    Ok(MediaResult {
        platform: Platform::Tiktok,
        preview: preview(raw),
        assets: assets(raw),
    })
}
