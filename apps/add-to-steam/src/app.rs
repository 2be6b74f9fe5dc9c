//! One installer run: resolve, append the shortcut, fetch artwork.

use std::path::PathBuf;

use serde::Serialize;
use splitdeck_artwork::{Client, FetchOutcome, RoleReport, fetch_all};
use splitdeck_steam::{Paths, Shortcut, SteamError, vdf};

use crate::config::Config;
use crate::launcher::{LauncherNotFound, LauncherResolver};

/// Errors that abort a run. Nothing has been written when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    LauncherNotFound(#[from] LauncherNotFound),

    #[error("no Steam account found: {0}")]
    NoAccountFound(SteamError),

    #[error("{} has an unrecognized structure; no changes made", .0.display())]
    MalformedContainer(PathBuf),

    #[error(transparent)]
    Steam(SteamError),

    #[error("artwork client: {0}")]
    ArtworkClient(#[from] splitdeck_artwork::client::Error),
}

/// What a successful run did.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub launcher: String,
    pub user_id: String,
    pub shortcuts_path: PathBuf,
    pub index: u32,
    pub app_id: u32,
    pub artwork: Vec<RoleReport>,
}

impl RunSummary {
    pub fn artwork_failures(&self) -> usize {
        self.artwork
            .iter()
            .filter(|r| matches!(r.outcome, FetchOutcome::Failed { .. }))
            .count()
    }
}

/// Runs the installer against `config`.
///
/// Launcher, account and container problems fail before anything is
/// written. Artwork failures are only reported in the summary.
pub async fn run(config: &Config, resolver: &dyn LauncherResolver) -> Result<RunSummary, RunError> {
    let launcher = resolver.resolve()?;
    tracing::info!(
        launcher = %launcher.label,
        exe = %launcher.exe.display(),
        start_dir = %launcher.start_dir.display(),
        "launcher detected"
    );

    let client = if config.skip_artwork {
        None
    } else {
        Some(Client::new(&config.user_agent, config.download_timeout())?)
    };

    let paths = match &config.steam_dir {
        Some(dir) => Paths::with_base(dir),
        None => Paths::new().map_err(RunError::NoAccountFound)?,
    };
    let user = match &config.user_id {
        Some(id) => splitdeck_steam::find_user(&paths, id),
        None => splitdeck_steam::select_user(&paths),
    }
    .map_err(RunError::NoAccountFound)?;
    tracing::info!(user = %user.id, "steam account selected");

    let shortcut = Shortcut::for_user(
        &paths,
        &user.id,
        &config.app_name,
        &launcher.exe.to_string_lossy(),
        &launcher.start_dir.to_string_lossy(),
    );

    let shortcuts_path = paths.shortcuts_path(&user.id);
    let data = vdf::read_or_init(&shortcuts_path).map_err(RunError::Steam)?;
    let (index, updated) = vdf::append_shortcut(&data, &shortcut).map_err(|e| match e {
        SteamError::MalformedContainer => RunError::MalformedContainer(shortcuts_path.clone()),
        other => RunError::Steam(other),
    })?;

    paths.ensure_config_dir(&user.id).map_err(RunError::Steam)?;
    vdf::write_atomic(&shortcuts_path, &updated).map_err(RunError::Steam)?;
    tracing::info!(
        index,
        app_id = shortcut.app_id,
        name = %shortcut.name,
        "shortcut added"
    );

    let artwork = match client {
        Some(client) => {
            if let Err(e) = paths.ensure_grid_dir(&user.id) {
                // Every role will report the write failure on its own.
                tracing::warn!(error = %e, "could not create grid directory");
            }
            fetch_all(
                &client,
                &config.artwork,
                &paths.grid_dir(&user.id),
                shortcut.app_id,
            )
            .await
        }
        None => {
            tracing::info!("artwork download skipped");
            Vec::new()
        }
    };

    Ok(RunSummary {
        launcher: launcher.label,
        user_id: user.id,
        shortcuts_path,
        index,
        app_id: shortcut.app_id,
        artwork,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::LauncherDescriptor;
    use crate::launcher::tests::FakeResolver;
    use splitdeck_artwork::ArtworkSource;
    use splitdeck_steam::{ArtworkRole, compute_app_id};
    use std::fs;

    fn launcher() -> FakeResolver {
        FakeResolver(Some(LauncherDescriptor {
            exe: "/x/run.sh".into(),
            start_dir: "/x".into(),
            label: "PrismLauncher".into(),
        }))
    }

    /// Steam tree with a single account `1000`, artwork disabled.
    fn setup() -> (tempfile::TempDir, Config, Paths) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_base(tmp.path());
        fs::create_dir_all(paths.user_dir("1000")).unwrap();
        let config = Config {
            steam_dir: Some(tmp.path().to_path_buf()),
            skip_artwork: true,
            ..Config::default()
        };
        (tmp, config, paths)
    }

    #[tokio::test]
    async fn creates_shortcuts_file_for_new_user() {
        let (_tmp, config, paths) = setup();

        let summary = run(&config, &launcher()).await.unwrap();

        let app_id = compute_app_id("Minecraft Splitscreen", "/x/run.sh");
        assert_eq!(summary.index, 0);
        assert_eq!(summary.app_id, app_id);
        assert_eq!(summary.user_id, "1000");
        assert_eq!(summary.launcher, "PrismLauncher");
        assert!(summary.artwork.is_empty());

        let data = fs::read(paths.shortcuts_path("1000")).unwrap();
        assert!(data.starts_with(b"\x00shortcuts\x00\x000\x00\x02appid\x00"));
        assert!(data.ends_with(b"\x08\x08\x08"));

        let icon = paths.icon_path("1000", app_id);
        let mut icon_field = b"\x01icon\x00".to_vec();
        icon_field.extend_from_slice(icon.to_string_lossy().as_bytes());
        icon_field.push(0);
        assert!(data.windows(icon_field.len()).any(|w| w == &icon_field[..]));
    }

    #[tokio::test]
    async fn second_run_appends_after_existing_entry() {
        let (_tmp, config, paths) = setup();

        run(&config, &launcher()).await.unwrap();
        let first = fs::read(paths.shortcuts_path("1000")).unwrap();

        let summary = run(&config, &launcher()).await.unwrap();
        let second = fs::read(paths.shortcuts_path("1000")).unwrap();

        assert_eq!(summary.index, 1);
        assert_eq!(&second[..first.len() - 2], &first[..first.len() - 2]);
        assert!(second.ends_with(b"\x08\x08"));
    }

    #[tokio::test]
    async fn malformed_container_is_left_untouched() {
        let (_tmp, config, paths) = setup();
        fs::create_dir_all(paths.config_dir("1000")).unwrap();
        let garbage = b"\x00shortcuts\x00\x08".to_vec();
        fs::write(paths.shortcuts_path("1000"), &garbage).unwrap();

        let err = run(&config, &launcher()).await.unwrap_err();

        assert!(matches!(err, RunError::MalformedContainer(_)));
        assert!(err.to_string().contains("no changes made"));
        assert_eq!(fs::read(paths.shortcuts_path("1000")).unwrap(), garbage);
    }

    #[tokio::test]
    async fn exhausted_index_is_left_untouched() {
        let (_tmp, config, paths) = setup();
        fs::create_dir_all(paths.config_dir("1000")).unwrap();
        let full = b"\x00shortcuts\x00\x004294967295\x00\x08\x08\x08".to_vec();
        fs::write(paths.shortcuts_path("1000"), &full).unwrap();

        let err = run(&config, &launcher()).await.unwrap_err();

        assert!(matches!(err, RunError::Steam(SteamError::IndexExhausted)));
        assert_eq!(fs::read(paths.shortcuts_path("1000")).unwrap(), full);
    }

    #[tokio::test]
    async fn missing_launcher_aborts_before_writing() {
        let (_tmp, config, paths) = setup();

        let err = run(&config, &FakeResolver(None)).await.unwrap_err();

        assert!(matches!(err, RunError::LauncherNotFound(_)));
        assert!(!paths.shortcuts_path("1000").exists());
    }

    #[tokio::test]
    async fn missing_account_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("userdata").join("0")).unwrap();
        let config = Config {
            steam_dir: Some(tmp.path().to_path_buf()),
            skip_artwork: true,
            ..Config::default()
        };

        let err = run(&config, &launcher()).await.unwrap_err();
        assert!(matches!(err, RunError::NoAccountFound(_)));
    }

    #[tokio::test]
    async fn explicit_unknown_user_aborts() {
        let (_tmp, mut config, _paths) = setup();
        config.user_id = Some("2000".into());

        let err = run(&config, &launcher()).await.unwrap_err();
        assert!(matches!(err, RunError::NoAccountFound(_)));
    }

    #[tokio::test]
    async fn artwork_failures_do_not_fail_the_run() {
        let (_tmp, mut config, paths) = setup();

        // Nothing listens on a port that was just released.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        config.skip_artwork = false;
        config.download_timeout_secs = 2;
        config.artwork = vec![
            ArtworkSource {
                role: ArtworkRole::Hero,
                url: format!("http://127.0.0.1:{port}/hero.png"),
                extension: "png".into(),
            },
            ArtworkSource {
                role: ArtworkRole::Logo,
                url: format!("http://127.0.0.1:{port}/logo.png"),
                extension: "png".into(),
            },
        ];

        // A logo from an earlier run is kept as is.
        let app_id = compute_app_id("Minecraft Splitscreen", "/x/run.sh");
        fs::create_dir_all(paths.grid_dir("1000")).unwrap();
        fs::write(
            paths.artwork_path("1000", app_id, ArtworkRole::Logo, "png"),
            b"logo",
        )
        .unwrap();

        let summary = run(&config, &launcher()).await.unwrap();

        assert_eq!(summary.artwork.len(), 2);
        assert!(matches!(
            summary.artwork[0].outcome,
            FetchOutcome::Failed { .. }
        ));
        assert_eq!(summary.artwork[1].outcome, FetchOutcome::Skipped);
        assert_eq!(summary.artwork_failures(), 1);
        assert!(paths.shortcuts_path("1000").exists());
    }
}
