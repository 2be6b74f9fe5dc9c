use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::SteamError;

/// Artwork roles Steam looks up in `config/grid/` for a non-Steam shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkRole {
    /// 460x215 horizontal banner.
    Grid,
    /// 600x900 vertical grid.
    Portrait,
    /// 1920x620 header.
    Hero,
    /// Transparent logo.
    Logo,
    /// Square icon.
    Icon,
}

impl ArtworkRole {
    /// Returns all artwork roles.
    pub fn all() -> &'static [ArtworkRole] {
        &[
            ArtworkRole::Grid,
            ArtworkRole::Portrait,
            ArtworkRole::Hero,
            ArtworkRole::Logo,
            ArtworkRole::Icon,
        ]
    }

    /// Returns the filename suffix Steam expects after the app id.
    pub fn suffix(&self) -> &'static str {
        match self {
            ArtworkRole::Grid => "",
            ArtworkRole::Portrait => "p",
            ArtworkRole::Hero => "_hero",
            ArtworkRole::Logo => "_logo",
            ArtworkRole::Icon => "_icon",
        }
    }
}

impl fmt::Display for ArtworkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtworkRole::Grid => write!(f, "grid"),
            ArtworkRole::Portrait => write!(f, "portrait"),
            ArtworkRole::Hero => write!(f, "hero"),
            ArtworkRole::Logo => write!(f, "logo"),
            ArtworkRole::Icon => write!(f, "icon"),
        }
    }
}

/// Provides access to Steam directory paths.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a new `Paths` instance with auto-detected Steam directory.
    pub fn new() -> Result<Self, SteamError> {
        let base_dir = get_base_dir()?;
        Ok(Self { base_dir })
    }

    /// Creates a new `Paths` instance with a custom base directory.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// Returns the directory for a specific user.
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.user_data_dir().join(user_id)
    }

    /// Returns the config directory for a user.
    pub fn config_dir(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("config")
    }

    /// Returns the path to shortcuts.vdf for a user.
    pub fn shortcuts_path(&self, user_id: &str) -> PathBuf {
        self.config_dir(user_id).join("shortcuts.vdf")
    }

    /// Returns the grid artwork directory for a user.
    pub fn grid_dir(&self, user_id: &str) -> PathBuf {
        self.config_dir(user_id).join("grid")
    }

    /// Returns true if the user has a shortcuts.vdf file.
    pub fn has_shortcuts(&self, user_id: &str) -> bool {
        self.shortcuts_path(user_id).exists()
    }

    /// Creates the config directory if it doesn't exist.
    pub fn ensure_config_dir(&self, user_id: &str) -> Result<(), SteamError> {
        fs::create_dir_all(self.config_dir(user_id))
            .map_err(|e| SteamError::Io(format!("failed to create config dir: {e}")))
    }

    /// Creates the grid directory if it doesn't exist.
    pub fn ensure_grid_dir(&self, user_id: &str) -> Result<(), SteamError> {
        fs::create_dir_all(self.grid_dir(user_id))
            .map_err(|e| SteamError::Io(format!("failed to create grid dir: {e}")))
    }

    /// Returns the path for a specific artwork role.
    pub fn artwork_path(
        &self,
        user_id: &str,
        app_id: u32,
        role: ArtworkRole,
        ext: &str,
    ) -> PathBuf {
        self.grid_dir(user_id)
            .join(artwork_filename(app_id, role, ext))
    }

    /// Returns the icon path written into the shortcut's `icon` field.
    pub fn icon_path(&self, user_id: &str, app_id: u32) -> PathBuf {
        self.artwork_path(user_id, app_id, ArtworkRole::Icon, "ico")
    }
}

/// Generates the filename for artwork based on role.
pub fn artwork_filename(app_id: u32, role: ArtworkRole, ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    let ext = if ext.is_empty() { "png" } else { ext };
    format!("{}{}.{}", app_id, role.suffix(), ext)
}

#[cfg(target_os = "linux")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_linux::get_base_dir()
}

#[cfg(not(target_os = "linux"))]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    Err(SteamError::NotFound)
}
