use std::{
    path::{Path, PathBuf},
    sync::RwLock,
};

use tracing::{debug, warn};

use crate::schema::SkillForgeConfig;

/// Config file name, checked in `./` then the user config directory.
const CONFIG_FILENAME: &str = "skillforge.toml";

static CONFIG_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);
static DATA_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Override the config directory (CLI `--config-dir`).
pub fn set_config_dir(dir: PathBuf) {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.write() {
        *guard = Some(dir);
    }
}

pub fn clear_config_dir() {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.write() {
        *guard = None;
    }
}

/// Override the data directory (CLI `--data-dir`).
pub fn set_data_dir(dir: PathBuf) {
    if let Ok(mut guard) = DATA_DIR_OVERRIDE.write() {
        *guard = Some(dir);
    }
}

pub fn clear_data_dir() {
    if let Ok(mut guard) = DATA_DIR_OVERRIDE.write() {
        *guard = None;
    }
}

/// The user config directory (`~/.config/skillforge/` on Linux), honoring
/// any override.
pub fn config_dir() -> PathBuf {
    if let Ok(guard) = CONFIG_DIR_OVERRIDE.read()
        && let Some(ref dir) = *guard
    {
        return dir.clone();
    }
    directories::ProjectDirs::from("", "", "skillforge")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// The user data directory holding `skillforge.db`, honoring any override.
pub fn data_dir() -> PathBuf {
    if let Ok(guard) = DATA_DIR_OVERRIDE.read()
        && let Some(ref dir) = *guard
    {
        return dir.clone();
    }
    directories::ProjectDirs::from("", "", "skillforge")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load config from an explicit path.
pub fn load_config(path: &Path) -> anyhow::Result<SkillForgeConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    Ok(toml::from_str(&raw)?)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./skillforge.toml` (project-local)
/// 2. `<config dir>/skillforge.toml` (user-global)
///
/// Returns defaults if no config file is found or the found file fails to
/// parse (parse failures are logged, not fatal).
pub fn discover_and_load() -> SkillForgeConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(config) => return config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    SkillForgeConfig::default()
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }
    let global = config_dir().join(CONFIG_FILENAME);
    if global.exists() {
        return Some(global);
    }
    None
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nbind = \"0.0.0.0\"\nport = 8080\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn load_config_missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/skillforge.toml")).is_err());
    }

    #[test]
    fn data_dir_override_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        set_data_dir(dir.path().to_path_buf());
        assert_eq!(data_dir(), dir.path());
        clear_data_dir();
        assert_ne!(data_dir(), dir.path());
    }
}
