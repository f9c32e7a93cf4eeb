//! Settings resolution for the CLI.
//!
//! Precedence: command-line flags, then `--config`, then the user settings
//! file, then the environment.

use std::path::{Path, PathBuf};

use udfpack_core::UdfSettings;

/// Location of the per-user settings file.
pub fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("udfpack").join("settings.json"))
}

/// Build the settings for this invocation.
pub fn resolve(
    config: Option<&Path>,
    work_dir: Option<PathBuf>,
    python_home: Option<PathBuf>,
) -> anyhow::Result<UdfSettings> {
    let mut settings = match config {
        Some(path) => UdfSettings::load(path)?,
        None => match user_settings_path().filter(|path| path.is_file()) {
            Some(path) => {
                tracing::debug!("Using settings from {}", path.display());
                UdfSettings::load(&path)?
            }
            None => UdfSettings::from_env(),
        },
    };

    if let Some(work_dir) = work_dir {
        settings = settings.with_work_dir(work_dir);
    }
    if let Some(python_home) = python_home {
        settings = settings.with_python_home(python_home);
    }

    Ok(settings)
}
