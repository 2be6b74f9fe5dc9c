//! Command-line flags. Each one overrides the matching config field.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Add the Minecraft Splitscreen launcher to Steam as a non-Steam shortcut.
///
/// Edits the account's shortcuts.vdf in place; close Steam first and do not
/// run two copies at once.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Steam installation directory.
    #[arg(long)]
    pub steam_dir: Option<PathBuf>,

    /// Steam account id (numeric directory under userdata/).
    #[arg(long)]
    pub user: Option<String>,

    /// Name shown in the Steam library.
    #[arg(long)]
    pub app_name: Option<String>,

    /// Don't download artwork.
    #[arg(long)]
    pub no_artwork: bool,

    /// Print a JSON summary to stdout.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Applies the flags on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.steam_dir {
            config.steam_dir = Some(dir.clone());
        }
        if let Some(user) = &self.user {
            config.user_id = Some(user.clone());
        }
        if let Some(name) = &self.app_name {
            config.app_name = name.clone();
        }
        if self.no_artwork {
            config.skip_artwork = true;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "splitdeck-add-to-steam",
            "--steam-dir",
            "/srv/steam",
            "--user",
            "1234",
            "--app-name",
            "MC",
            "--no-artwork",
        ]);
        let config = cli.apply(Config::default());
        assert_eq!(config.steam_dir, Some(PathBuf::from("/srv/steam")));
        assert_eq!(config.user_id.as_deref(), Some("1234"));
        assert_eq!(config.app_name, "MC");
        assert!(config.skip_artwork);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::parse_from(["splitdeck-add-to-steam"]);
        let base = Config {
            user_id: Some("9".into()),
            ..Config::default()
        };
        let config = cli.apply(base);
        assert_eq!(config.user_id.as_deref(), Some("9"));
        assert!(!config.skip_artwork);
        assert!(!cli.json);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
