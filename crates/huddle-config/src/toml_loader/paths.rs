//! Where huddle keeps its config, and seeding it on first run.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use huddle_common::ConfigError;
use tracing::{debug, info};

use super::template::default_config_toml;

const APP_DIR: &str = "huddle";
const FILE_NAME: &str = "config.toml";

/// `<user config dir>/huddle/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| config_path_in(&dir))
        .ok_or(ConfigError::NoConfigDir)
}

pub(super) fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(APP_DIR).join(FILE_NAME)
}

/// Seed `path` with the commented default config.
///
/// Returns `false` and leaves the file alone if something is already there,
/// including a file written by another process since the caller looked.
pub fn create_default_config(path: &Path) -> Result<bool, ConfigError> {
    let write_failed = |e: std::io::Error| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "Config already present, not seeding");
            return Ok(false);
        }
        Err(e) => return Err(write_failed(e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(write_failed)?;

    info!(path = %path.display(), "Wrote default config");
    Ok(true)
}
