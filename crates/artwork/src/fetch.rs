//! Per-role artwork download into a grid directory.

use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use splitdeck_steam::ArtworkRole;
use splitdeck_steam::paths::artwork_filename;

use crate::client::{self, Client};

/// Where to fetch one artwork role from and which extension to save it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkSource {
    pub role: ArtworkRole,
    pub url: String,
    /// Saved file extension. Explicit because Steam only looks up the
    /// names it expects, whatever format the CDN serves.
    pub extension: String,
}

impl ArtworkSource {
    fn new(role: ArtworkRole, url: &str, extension: &str) -> Self {
        Self {
            role,
            url: url.to_string(),
            extension: extension.to_string(),
        }
    }
}

/// SteamGridDB images for Minecraft Splitscreen.
pub fn default_sources() -> Vec<ArtworkSource> {
    vec![
        ArtworkSource::new(
            ArtworkRole::Portrait,
            "https://cdn2.steamgriddb.com/grid/a73027901f88055aaa0fd1a9e25d36c7.png",
            "png",
        ),
        ArtworkSource::new(
            ArtworkRole::Grid,
            "https://cdn2.steamgriddb.com/grid/e353b610e9ce20f963b4cca5da565605.jpg",
            "png",
        ),
        ArtworkSource::new(
            ArtworkRole::Hero,
            "https://cdn2.steamgriddb.com/hero/ecd812da02543c0269cfc2c56ab3c3c0.png",
            "png",
        ),
        ArtworkSource::new(
            ArtworkRole::Logo,
            "https://cdn2.steamgriddb.com/logo/90915208c601cc8c86ad01250ee90c12.png",
            "png",
        ),
        ArtworkSource::new(
            ArtworkRole::Icon,
            "https://cdn2.steamgriddb.com/icon/add7a048049671970976f3e18f21ade3.ico",
            "ico",
        ),
    ]
}

/// Errors from a single role's download.
#[derive(Debug, thiserror::Error)]
pub enum ArtworkError {
    #[error("download failed: {0}")]
    Download(#[from] client::Error),

    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Result of one role's fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FetchOutcome {
    Saved { bytes: usize },
    Skipped,
    Failed { error: String },
}

/// Outcome of one artwork role, with the file it targets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleReport {
    pub role: ArtworkRole,
    pub path: PathBuf,
    pub outcome: FetchOutcome,
}

/// Fetches every source into `grid_dir`, named after `app_id`.
///
/// Roles whose target file already exists are skipped without a request.
/// Downloads run concurrently; a failure in one role never cancels another.
/// Reports come back in the order of `sources`.
pub async fn fetch_all(
    client: &Client,
    sources: &[ArtworkSource],
    grid_dir: &Path,
    app_id: u32,
) -> Vec<RoleReport> {
    join_all(
        sources
            .iter()
            .map(|src| fetch_one(client, src, grid_dir, app_id)),
    )
    .await
}

async fn fetch_one(
    client: &Client,
    src: &ArtworkSource,
    grid_dir: &Path,
    app_id: u32,
) -> RoleReport {
    let path = grid_dir.join(artwork_filename(app_id, src.role, &src.extension));

    let outcome = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        tracing::info!(role = %src.role, path = %path.display(), "artwork already exists, skipping");
        FetchOutcome::Skipped
    } else {
        tracing::info!(role = %src.role, url = %src.url, "downloading artwork");
        match download_to(client, &src.url, &path).await {
            Ok(bytes) => {
                tracing::info!(role = %src.role, bytes, "artwork saved");
                FetchOutcome::Saved { bytes }
            }
            Err(e) => {
                tracing::warn!(role = %src.role, error = %e, "failed to download artwork");
                FetchOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    };

    RoleReport {
        role: src.role,
        path,
        outcome,
    }
}

/// Downloads `url` and stores it at `path` through a `.part` file, so a
/// failed run never leaves a truncated image that a later run would skip.
async fn download_to(client: &Client, url: &str, path: &Path) -> Result<usize, ArtworkError> {
    let data = client.download(url).await?;

    let mut part = path.as_os_str().to_os_string();
    part.push(".part");
    let part = PathBuf::from(part);

    if let Err(e) = write_then_rename(&part, path, &data).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(e.into());
    }
    Ok(data.len())
}

async fn write_then_rename(part: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(part, data).await?;
    tokio::fs::rename(part, path).await
}
