mod downloader;
pub mod normalize;
mod quality;
pub(crate) mod types;

pub use downloader::AssetDownloader;
pub use normalize::{normalize, NormalizationError};
pub use types::{DownloadAsset, MediaKind, MediaResult, Platform};
