/// Substring table, checked top to bottom. Order matters: `1080` must be
/// tested before `720` etc., and the audio markers only after the resolutions.
const QUALITY_TABLE: [(&[&str], &str); 5] = [
    (&["1080"], "Full HD 1080p"),
    (&["720"], "HD 720p"),
    (&["480"], "SD 480p"),
    (&["360"], "SD 360p"),
    (&["mp3", "audio"], "Audio MP3"),
];

/// Human-readable quality label inferred from a format/type tag.
pub fn quality_from_type(kind: &str) -> &'static str {
    QUALITY_TABLE
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| kind.contains(n)))
        .map(|(_, label)| *label)
        .unwrap_or("Video")
}
