use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Tiktok,
    Instagram,
    Youtube,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Tiktok,
        Platform::Instagram,
        Platform::Youtube,
        Platform::Facebook,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Facebook => "facebook",
        }
    }

    /// Path segment selecting the backend extractor for this platform.
    pub fn api_segment(self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "ig",
            Platform::Youtube => "yt",
            Platform::Facebook => "fb",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.name() == wanted || p.api_segment() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown platform '{}', expected one of: tiktok, instagram, youtube, facebook",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub likes: Option<String>,
    pub comments: Option<String>,
    pub shares: Option<String>,
    pub saves: Option<String>,
}

impl Stats {
    pub fn is_empty(&self) -> bool {
        self.likes.is_none() && self.comments.is_none() && self.shares.is_none() && self.saves.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub thumbnail_url: Option<String>,
    pub title: String,
    pub author_name: String,
    pub duration_label: Option<String>,
    pub views_label: Option<String>,
    pub stats_label: Option<Stats>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Preview {
    pub fn new(title: impl Into<String>, author_name: impl Into<String>) -> Self {
        Self {
            thumbnail_url: None,
            title: title.into(),
            author_name: author_name.into(),
            duration_label: None,
            views_label: None,
            stats_label: None,
            uploaded_at: None,
        }
    }
}

/// A single downloadable item. `bundle` is only populated for aggregate
/// entries, in which case `url` is the first member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadAsset {
    pub url: String,
    pub kind: MediaKind,
    pub label: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bundle: Vec<String>,
}

impl DownloadAsset {
    pub fn new(
        url: impl Into<String>,
        kind: MediaKind,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            kind,
            label: label.into(),
            description: description.into(),
            bundle: Vec::new(),
        }
    }

    pub fn is_bundle(&self) -> bool {
        !self.bundle.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaResult {
    pub platform: Platform,
    pub preview: Preview,
    pub assets: Vec<DownloadAsset>,
}

impl MediaResult {
    /// True when the payload was understood but held nothing to download.
    pub fn is_soft_failure(&self) -> bool {
        self.assets.is_empty()
    }

    /// Image assets, in display order, that make up the slide carousel.
    pub fn slides(&self) -> Vec<&DownloadAsset> {
        self.assets
            .iter()
            .filter(|a| a.kind == MediaKind::Image && !a.is_bundle())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_segments() {
        assert_eq!(Platform::Tiktok.api_segment(), "tiktok");
        assert_eq!(Platform::Instagram.api_segment(), "ig");
        assert_eq!(Platform::Youtube.api_segment(), "yt");
        assert_eq!(Platform::Facebook.api_segment(), "fb");
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("Instagram".parse::<Platform>(), Ok(Platform::Instagram));
        assert_eq!("yt".parse::<Platform>(), Ok(Platform::Youtube));
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_slides_skip_bundles_and_video() {
        let mut bundle = DownloadAsset::new("a", MediaKind::Image, "Download All", "2 items");
        bundle.bundle = vec!["a".into(), "b".into()];
        let result = MediaResult {
            platform: Platform::Instagram,
            preview: Preview::new("t", "a"),
            assets: vec![
                DownloadAsset::new("a", MediaKind::Image, "Foto 1", "JPG"),
                DownloadAsset::new("b", MediaKind::Video, "Video 2", "MP4"),
                bundle,
            ],
        };

        let slides = result.slides();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].url, "a");
    }
}
