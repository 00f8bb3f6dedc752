//! Path resolution for orgadmin
//!
//! # Environment Variables
//!
//! - `ORGADMIN_CONFIG_DIR` - Override config directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `ORGADMIN_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/orgadmin` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\orgadmin`
//!    - macOS/Linux: `~/.config/orgadmin`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "ORGADMIN_CONFIG_DIR";

/// File name of the default manifest inside the config directory
pub const MANIFEST_FILE: &str = "registrations.toml";

/// Get the orgadmin config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("orgadmin");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("orgadmin");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("orgadmin");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Resolve the manifest path: explicit path if given, else the default
pub fn manifest_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(&path.to_string_lossy())),
        None => Ok(config_dir()?.join(MANIFEST_FILE)),
    }
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Helper to run a test with temporary env var
    ///
    /// # Safety
    /// Uses unsafe env::set_var/remove_var; only use in single-threaded test contexts.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/orgadmin", || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/orgadmin"));
            assert_eq!(
                manifest_path(None).unwrap(),
                PathBuf::from("/custom/orgadmin/registrations.toml")
            );
        });
    }

    #[test]
    fn test_manifest_path_explicit_wins() {
        let path = manifest_path(Some(Path::new("/tmp/org.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/org.toml"));
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand("~/org.toml"), home.join("org.toml"));
        assert_eq!(expand("/abs/path"), PathBuf::from("/abs/path"));
    }
}
