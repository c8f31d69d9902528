use super::types::DownloadAsset;
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// `<brand>_<label>_<millis>.<ext>`, with spaces in the label turned into
/// underscores. Labels mentioning audio save as `.mp3`, everything else `.mp4`.
pub fn file_name_for(brand: &str, label: &str, millis: i64) -> String {
    let ext = if label.contains("Audio") || label.contains("MP3") {
        "mp3"
    } else {
        "mp4"
    };
    let label: String = label
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();

    format!("{}_{}_{}.{}", brand, label, millis, ext)
}

/// `name` with `_<copy>` inserted before the extension.
fn numbered(name: &str, copy: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{}.{}", stem, copy, ext),
        None => format!("{}_{}", name, copy),
    }
}

/// Moves `file` to `dir/name`, or to the first free `_2`, `_3`, ... variant
/// when a file of that name already exists.
fn persist_unique(mut file: NamedTempFile, dir: &Path, name: &str) -> Result<PathBuf> {
    let mut copy = 1;
    loop {
        let path = if copy == 1 {
            dir.join(name)
        } else {
            dir.join(numbered(name, copy))
        };
        match file.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                debug!("{} already exists, trying the next name", path.display());
                file = e.file;
                copy += 1;
            }
            Err(e) => {
                return Err(e.error).with_context(|| format!("Failed to save {}", path.display()))
            }
        }
    }
}

pub struct AssetDownloader {
    client: reqwest::Client,
    brand: String,
}

impl AssetDownloader {
    pub fn new(client: reqwest::Client, brand: impl Into<String>) -> Self {
        Self {
            client,
            brand: brand.into(),
        }
    }

    /// Saves an asset into `dir`. Bundles save every member, skipping members
    /// that fail as long as at least one succeeds.
    pub async fn save(&self, asset: &DownloadAsset, dir: &Path) -> Result<Vec<PathBuf>> {
        if !asset.is_bundle() {
            return Ok(vec![self.save_url(&asset.url, &asset.label, dir).await?]);
        }

        info!("Saving {} bundled files", asset.bundle.len());
        let mut saved = Vec::new();
        for (index, url) in asset.bundle.iter().enumerate() {
            let label = format!("{} {}", asset.label, index + 1);
            match self.save_url(url, &label, dir).await {
                Ok(path) => saved.push(path),
                Err(e) => warn!("Failed to save {}: {:#}", url, e),
            }
        }

        if saved.is_empty() {
            return Err(anyhow::anyhow!("Failed to save any bundled files"));
        }
        Ok(saved)
    }

    async fn save_url(&self, url: &str, label: &str, dir: &Path) -> Result<PathBuf> {
        debug!("Fetching {} for '{}'", url, label);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch media URL")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to download media: HTTP {}",
                response.status()
            ));
        }

        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read media data")?
        {
            file.write_all(&chunk).context("Failed to write media data")?;
            written += chunk.len() as u64;
        }

        let name = file_name_for(&self.brand, label, Utc::now().timestamp_millis());
        let path = persist_unique(file, dir, &name)?;

        info!("Saved {} ({} bytes)", path.display(), written);
        Ok(path)
    }
}
