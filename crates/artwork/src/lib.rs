//! SteamGridDB artwork download for non-Steam shortcuts.
//!
//! Images are fetched from fixed CDN URLs and stored in the user's
//! `config/grid/` directory under the names Steam derives from the
//! shortcut's app id. Failures are reported per role and never abort
//! the other downloads.

pub mod client;
pub mod fetch;

pub use client::Client;
pub use fetch::{ArtworkSource, FetchOutcome, RoleReport, default_sources, fetch_all};
