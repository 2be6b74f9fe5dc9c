//! Configuration for the shortcut installer.
//!
//! Stored as TOML at `~/.config/splitdeck/add-to-steam.toml`. The file is
//! optional; every field has a default that reproduces the stock install.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use splitdeck_artwork::{ArtworkSource, default_sources};
use splitdeck_steam::ArtworkRole;

/// Installer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name shown in the Steam library. Also feeds the app id.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Steam installation directory (auto-detected if unset).
    #[serde(default)]
    pub steam_dir: Option<PathBuf>,

    /// Steam account id under `userdata/` (auto-selected if unset).
    #[serde(default)]
    pub user_id: Option<String>,

    /// Directory holding the PollyMC / PrismLauncher installs
    /// (`~/.local/share` if unset).
    #[serde(default)]
    pub launcher_data_dir: Option<PathBuf>,

    /// Skip the artwork download entirely.
    #[serde(default)]
    pub skip_artwork: bool,

    /// Per-request artwork download timeout in seconds.
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// User-Agent sent to the image CDN.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Artwork to download, one entry per role.
    #[serde(default = "default_sources")]
    pub artwork: Vec<ArtworkSource>,
}

fn default_app_name() -> String {
    "Minecraft Splitscreen".into()
}

fn default_download_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    splitdeck_artwork::client::DEFAULT_USER_AGENT.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            steam_dir: None,
            user_id: None,
            launcher_data_dir: None,
            skip_artwork: false,
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
            artwork: default_sources(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Config::default()),
            },
        };

        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Rejects settings the run cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.app_name.is_empty(), "app_name must not be empty");
        anyhow::ensure!(
            self.download_timeout_secs > 0,
            "download_timeout_secs must be greater than zero"
        );

        let mut seen = HashSet::new();
        for src in &self.artwork {
            anyhow::ensure!(
                seen.insert(src.role),
                "artwork role '{}' is listed more than once",
                src.role
            );
            anyhow::ensure!(
                !src.extension.trim_start_matches('.').is_empty(),
                "artwork role '{}' has an empty extension",
                src.role
            );
            // The shortcut's icon field always names `<appId>_icon.ico`.
            anyhow::ensure!(
                src.role != ArtworkRole::Icon || src.extension.trim_start_matches('.') == "ico",
                "artwork role 'icon' must use the 'ico' extension, got '{}'",
                src.extension
            );
        }
        Ok(())
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Directory containing the launcher installs.
    pub fn launcher_data_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.launcher_data_dir {
            return Ok(dir.clone());
        }
        let home = std::env::var_os("HOME").context("HOME is not set")?;
        Ok(PathBuf::from(home).join(".local").join("share"))
    }
}

/// Returns the default configuration file path.
fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("splitdeck").join("add-to-steam.toml"))
}
