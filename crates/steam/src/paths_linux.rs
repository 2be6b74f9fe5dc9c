use std::path::{Path, PathBuf};

use crate::SteamError;

/// Returns the Steam base directory on Linux.
pub(crate) fn get_base_dir() -> Result<PathBuf, SteamError> {
    let home = home_dir()?;
    find_base_dir_in(&home).ok_or(SteamError::NotFound)
}

/// Probes the known Steam locations under `home`, first existing wins.
fn find_base_dir_in(home: &Path) -> Option<PathBuf> {
    let candidates = [
        // Primary location: ~/.steam/steam
        home.join(".steam").join("steam"),
        // Fallback: ~/.local/share/Steam
        home.join(".local").join("share").join("Steam"),
        // Flatpak location
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
    ];

    let found = candidates.into_iter().find(|dir| dir.exists());
    if let Some(dir) = &found {
        tracing::debug!(path = %dir.display(), "steam base directory detected");
    }
    found
}

fn home_dir() -> Result<PathBuf, SteamError> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(SteamError::NotFound)
}
