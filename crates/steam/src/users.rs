use std::fs;

use crate::SteamError;
use crate::paths::Paths;

/// A Steam user with shortcut information.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub has_shortcuts: bool,
}

/// Returns users found in the userdata directory, sorted by id.
pub fn get_users_with_paths(paths: &Paths) -> Result<Vec<User>, SteamError> {
    let user_data_dir = paths.user_data_dir();

    let entries = fs::read_dir(&user_data_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteamError::NotFound
        } else {
            SteamError::Io(e.to_string())
        }
    })?;

    let mut users = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;

        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();

        // Verify it's a numeric user ID
        if name.parse::<u64>().is_err() {
            continue;
        }

        // "0" is a temporary Steam directory, not a real user
        if name == "0" {
            continue;
        }

        let has_shortcuts = paths.has_shortcuts(&name);
        users.push(User {
            id: name.into_owned(),
            has_shortcuts,
        });
    }

    // read_dir order is unspecified; keep selection stable across runs.
    users.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(users)
}

/// Returns the first user that has shortcuts, or the first user if none do.
pub fn select_user(paths: &Paths) -> Result<User, SteamError> {
    let users = get_users_with_paths(paths)?;
    tracing::debug!(count = users.len(), "steam users discovered");

    if let Some(u) = users.iter().find(|u| u.has_shortcuts) {
        return Ok(u.clone());
    }

    users
        .into_iter()
        .next()
        .ok_or_else(|| SteamError::UserNotFound(paths.user_data_dir().display().to_string()))
}

/// Returns the user with the given id, if its directory exists.
pub fn find_user(paths: &Paths, user_id: &str) -> Result<User, SteamError> {
    if user_id.parse::<u64>().is_err() || !paths.user_dir(user_id).is_dir() {
        return Err(SteamError::UserNotFound(
            paths.user_dir(user_id).display().to_string(),
        ));
    }
    Ok(User {
        id: user_id.to_string(),
        has_shortcuts: paths.has_shortcuts(user_id),
    })
}
