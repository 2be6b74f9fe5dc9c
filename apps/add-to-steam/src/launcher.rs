//! Minecraft launcher discovery.
//!
//! PollyMC is checked first for existing installs, then PrismLauncher.
//! Each is identified by its AppImage; the Steam shortcut points at the
//! `minecraftSplitscreen.sh` wrapper script, not at the AppImage itself.

use std::path::{Path, PathBuf};

/// Wrapper script the installer drops next to the launcher.
const SPLITSCREEN_SCRIPT: &str = "minecraftSplitscreen.sh";

/// A launcher resolved to something Steam can start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherDescriptor {
    pub exe: PathBuf,
    pub start_dir: PathBuf,
    pub label: String,
}

/// No usable launcher was found.
#[derive(Debug, thiserror::Error)]
#[error(
    "no compatible Minecraft launcher found (expected PollyMC at {} or PrismLauncher at {}); run the Minecraft Splitscreen installer first",
    .pollymc.display(),
    .prism.display()
)]
pub struct LauncherNotFound {
    pub pollymc: PathBuf,
    pub prism: PathBuf,
}

/// Resolves the launcher the shortcut should start.
pub trait LauncherResolver {
    fn resolve(&self) -> Result<LauncherDescriptor, LauncherNotFound>;
}

/// Finds a launcher by probing the install locations under a data directory
/// (normally `~/.local/share`).
pub struct ProbingResolver {
    data_dir: PathBuf,
    /// Directory checked for a stray wrapper script when PrismLauncher's
    /// own copy is missing (the directory of the running binary).
    fallback_script_dir: Option<PathBuf>,
}

impl ProbingResolver {
    pub fn new(data_dir: impl Into<PathBuf>, fallback_script_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            fallback_script_dir,
        }
    }

    fn pollymc_dir(&self) -> PathBuf {
        self.data_dir.join("PollyMC")
    }

    fn prism_dir(&self) -> PathBuf {
        self.data_dir.join("PrismLauncher")
    }

    fn pollymc_appimage(&self) -> PathBuf {
        self.pollymc_dir().join("PollyMC-Linux-x86_64.AppImage")
    }

    fn prism_appimage(&self) -> PathBuf {
        self.prism_dir().join("PrismLauncher.AppImage")
    }
}

impl LauncherResolver for ProbingResolver {
    fn resolve(&self) -> Result<LauncherDescriptor, LauncherNotFound> {
        let pollymc = self.pollymc_appimage();
        let prism = self.prism_appimage();
        tracing::debug!(
            pollymc = %pollymc.display(),
            prism = %prism.display(),
            "probing launchers"
        );

        if is_executable(&pollymc) {
            let own_script = self.pollymc_dir().join(SPLITSCREEN_SCRIPT);
            let exe = if own_script.exists() {
                own_script
            } else {
                // Older installs kept the script under PrismLauncher only.
                tracing::debug!("PollyMC script missing, using PrismLauncher's");
                self.prism_dir().join(SPLITSCREEN_SCRIPT)
            };
            return Ok(LauncherDescriptor {
                exe,
                start_dir: self.pollymc_dir(),
                label: "PollyMC".into(),
            });
        }

        if is_executable(&prism) {
            let own_script = self.prism_dir().join(SPLITSCREEN_SCRIPT);
            let fallback = self
                .fallback_script_dir
                .as_ref()
                .map(|d| d.join(SPLITSCREEN_SCRIPT));

            let exe = if own_script.exists() {
                Some(own_script)
            } else {
                fallback.filter(|p| p.exists())
            };

            if let Some(exe) = exe {
                return Ok(LauncherDescriptor {
                    exe,
                    start_dir: self.prism_dir(),
                    label: "PrismLauncher".into(),
                });
            }
            tracing::debug!("PrismLauncher found but no splitscreen script");
        }

        Err(LauncherNotFound { pollymc, prism })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
