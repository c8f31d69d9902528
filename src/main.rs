use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod api;
mod config;
mod error;
mod media;
#[cfg(test)]
mod testing;
mod ui;
mod utils;

use api::{ApiClient, HttpTransport};
use config::{Config, LogFormat, API_KEY_ENV};
use media::{AssetDownloader, DownloadAsset, Platform};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Platform the URL belongs to (tiktok, instagram, youtube, facebook)
    #[arg(short, long, default_value = "tiktok")]
    platform: Platform,

    /// Video URL to look up. Starts an interactive session when omitted
    url: Option<String>,

    /// Save download option N (1-based, repeatable)
    #[arg(short, long, value_name = "N")]
    get: Vec<usize>,

    /// Save every download option
    #[arg(long)]
    all: bool,

    /// Directory to save into, overriding the config file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the normalized result as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("NULLHUB_CONFIG") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/nullhub/config.toml", xdg_config_home);
        if Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/nullhub/config.toml", home.display());
        if Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Picks the 1-based `--get` indices, or every plain asset with `--all`.
fn selected_assets(assets: &[DownloadAsset], get: &[usize], all: bool) -> Result<Vec<DownloadAsset>> {
    if all {
        return Ok(assets.iter().filter(|a| !a.is_bundle()).cloned().collect());
    }

    get.iter()
        .map(|&n| {
            n.checked_sub(1)
                .and_then(|i| assets.get(i))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No download option {} (have {})", n, assets.len()))
        })
        .collect()
}

async fn run_once(
    args: &Args,
    url: &str,
    client: &ApiClient,
    downloader: &AssetDownloader,
    output_dir: &Path,
) -> Result<()> {
    let result = match client
        .fetch(args.platform, url, &CancellationToken::new())
        .await
    {
        Ok(result) => result,
        Err(e) => {
            warn!("Lookup failed: {}", e);
            return Err(anyhow::anyhow!(
                "{}",
                e.user_message().unwrap_or("Request cancelled")
            ));
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        print!("{}", ui::render_result(&result, chrono::Utc::now()));
    }

    for asset in selected_assets(&result.assets, &args.get, args.all)? {
        eprintln!("Download started: {}", asset.label);
        for path in downloader.save(&asset, output_dir).await? {
            eprintln!("Saved {} to {}", asset.label, path.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match get_config_path(&args) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default(),
    };

    init_logging(config.get_logging_format());

    info!("Starting NullHub...");

    let api_key = config.api_key(std::env::var(API_KEY_ENV).ok())?;
    let transport = HttpTransport::new(Duration::from_secs(config.api.timeout_secs))?;
    let client = ApiClient::new(Box::new(transport), &config.api.base_url, api_key)?;

    let download_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.api.timeout_secs))
        .build()
        .context("Failed to create download client")?;
    let downloader = AssetDownloader::new(download_client, config.download.brand.clone());

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.download.output_dir.clone());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    match args.url.as_deref() {
        Some(url) => run_once(&args, url, &client, &downloader, &output_dir).await,
        None => {
            ui::Session::new(
                Arc::new(client),
                Arc::new(downloader),
                output_dir,
                args.platform,
                std::io::stdout(),
            )
            .run(tokio::io::BufReader::new(tokio::io::stdin()))
            .await
        }
    }
}
