use super::state::{Notice, UiState};
use crate::media::{MediaKind, MediaResult};
use crate::utils::relative_date;
use chrono::{DateTime, Utc};
use std::fmt::Write;

fn kind_tag(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Video => "video",
        MediaKind::Audio => "audio",
        MediaKind::Image => "image",
    }
}

pub fn render_result(result: &MediaResult, now: DateTime<Utc>) -> String {
    let preview = &result.preview;
    let mut out = String::new();

    let _ = writeln!(out, "[{}] {}", result.platform, preview.title);

    let mut byline = vec![format!("by {}", preview.author_name)];
    byline.extend(preview.duration_label.clone());
    byline.extend(preview.views_label.clone());
    byline.extend(
        preview
            .uploaded_at
            .map(|at| relative_date(at.timestamp(), now).to_string()),
    );
    let _ = writeln!(out, "{}", byline.join(" · "));

    if let Some(stats) = &preview.stats_label {
        let parts: Vec<String> = [
            ("likes", &stats.likes),
            ("comments", &stats.comments),
            ("shares", &stats.shares),
            ("saves", &stats.saves),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| format!("{} {}", v, name)))
        .collect();
        let _ = writeln!(out, "{}", parts.join(" · "));
    }

    if let Some(thumbnail) = &preview.thumbnail_url {
        let _ = writeln!(out, "thumbnail: {}", thumbnail);
    }

    if result.assets.is_empty() {
        let _ = writeln!(out, "No downloadable media found.");
        return out;
    }

    let _ = writeln!(out, "Downloads:");
    for (i, asset) in result.assets.iter().enumerate() {
        if asset.description.is_empty() {
            let _ = writeln!(out, "  {}. {} [{}]", i + 1, asset.label, kind_tag(asset.kind));
        } else {
            let _ = writeln!(
                out,
                "  {}. {} - {} [{}]",
                i + 1,
                asset.label,
                asset.description,
                kind_tag(asset.kind)
            );
        }
    }

    out
}

pub fn render_slide(state: &UiState) -> Option<String> {
    state
        .current_slide()
        .map(|(position, total, asset)| format!("Slide {}/{}: {} {}", position, total, asset.label, asset.url))
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Info(message) => message.clone(),
        Notice::Error(message) => format!("error: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::types::Preview;
    use crate::media::{DownloadAsset, Platform};
    use crate::media::normalize::normalize;
    use crate::ui::state::Action;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_render_tiktok_result() {
        let raw = json!({
            "caption": "cat video",
            "create_time": now().timestamp() - 3 * 86_400,
            "author": {"nickname": "kitty", "avatarThumb": "https://cdn/a.jpg"},
            "music": {"duration": 9},
            "statistic": {"views": 1500, "likes": 20},
            "video": "https://cdn/v.mp4"
        });
        let result = normalize(Platform::Tiktok, &raw).unwrap();
        let text = render_result(&result, now());

        assert!(text.starts_with("[tiktok] cat video\n"));
        assert!(text.contains("by kitty · 9s · 1.5K views · 3 days ago"));
        assert!(text.contains("20 likes"));
        assert!(text.contains("thumbnail: https://cdn/a.jpg"));
        assert!(text.contains("  1. Video HD - No Watermark [video]"));
    }

    #[test]
    fn test_render_empty_result() {
        let result = MediaResult {
            platform: Platform::Facebook,
            preview: Preview::new("Facebook Video", "Facebook"),
            assets: Vec::new(),
        };
        let text = render_result(&result, now());
        assert!(text.contains("by Facebook\n"));
        assert!(text.contains("No downloadable media found."));
        assert!(!text.contains("Downloads:"));
    }

    #[test]
    fn test_render_slide() {
        let mut state = UiState::new(Platform::Tiktok);
        assert_eq!(render_slide(&state), None);

        state.update(Action::RequestStarted(1));
        state.update(Action::SetResult {
            request: 1,
            result: MediaResult {
                platform: Platform::Tiktok,
                preview: Preview::new("t", "a"),
                assets: vec![
                    DownloadAsset::new("https://cdn/1.jpg", MediaKind::Image, "Foto 1", ""),
                    DownloadAsset::new("https://cdn/2.jpg", MediaKind::Image, "Foto 2", ""),
                ],
            },
        });
        state.update(Action::AdvanceSlide);

        assert_eq!(
            render_slide(&state).as_deref(),
            Some("Slide 2/2: Foto 2 https://cdn/2.jpg")
        );
    }

    #[test]
    fn test_render_notice() {
        assert_eq!(render_notice(&Notice::Info("Saved".into())), "Saved");
        assert_eq!(render_notice(&Notice::Error("bad".into())), "error: bad");
    }
}
