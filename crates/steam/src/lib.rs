pub mod paths;
#[cfg(target_os = "linux")]
pub mod paths_linux;
pub mod shortcuts;
pub mod users;
pub mod vdf;

// Re-export primary types.
pub use paths::{ArtworkRole, Paths};
pub use shortcuts::{Shortcut, build_record, compute_app_id};
pub use users::{User, find_user, get_users_with_paths, select_user};
pub use vdf::{
    EMPTY_SHORTCUTS, append_shortcut, insert_entry, next_index, read_or_init, write_atomic,
};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam installation not found")]
    NotFound,

    #[error("no steam user account found under {0}")]
    UserNotFound(String),

    #[error("shortcuts file structure not recognized (missing trailing 0x08 0x08 terminator)")]
    MalformedContainer,

    #[error("shortcuts file already uses the highest possible index key")]
    IndexExhausted,

    #[error("I/O error: {0}")]
    Io(String),
}
