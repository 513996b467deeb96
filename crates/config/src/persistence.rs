//! Config file discovery, reading and writing.
//!
//! Files may be JSON5 (comments, trailing commas, unquoted keys) or plain
//! JSON; both are read with the JSON5 parser. Files are always written as
//! pretty-printed JSON, which JSON5 readers accept.
//!
//! # File Locations
//!
//! 1. Working directory: `./wawidget.json5`, then `./wawidget.json`
//! 2. User config directory: `~/.config/wawidget/config.json5`, then
//!    `~/.config/wawidget/config.json`

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Project-local file names, in priority order.
const LOCAL_FILE_NAMES: &[&str] = &["wawidget.json5", "wawidget.json"];

/// Directory name under the platform config directory.
const USER_CONFIG_DIR: &str = "wawidget";

/// File names inside [`USER_CONFIG_DIR`], in priority order.
const USER_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Finds the first existing config file in the standard locations.
///
/// # Examples
///
/// ```no_run
/// use wawidget_config::persistence::find_config_file;
///
/// match find_config_file() {
///     Some(path) => println!("using {}", path.display()),
///     None => println!("using defaults"),
/// }
/// ```
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let local = std::env::current_dir().ok();
    let user = dirs::config_dir().map(|d| d.join(USER_CONFIG_DIR));
    find_config_file_in(local.as_deref(), user.as_deref())
}

/// Searches `local_dir` for a project file, then `user_dir` for a user file.
#[must_use]
pub fn find_config_file_in(local_dir: Option<&Path>, user_dir: Option<&Path>) -> Option<PathBuf> {
    let local = local_dir
        .into_iter()
        .flat_map(|dir| LOCAL_FILE_NAMES.iter().map(move |name| dir.join(name)));
    let user = user_dir
        .into_iter()
        .flat_map(|dir| USER_FILE_NAMES.iter().map(move |name| dir.join(name)));

    local.chain(user).find(|path| path.is_file())
}

/// Returns the user configuration directory, typically `~/.config/wawidget/`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the platform config
/// directory cannot be determined.
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(USER_CONFIG_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Returns the default location of the session token cache, inside the
/// platform cache directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the platform cache
/// directory cannot be determined.
pub fn default_session_cache_path() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|d| d.join(USER_CONFIG_DIR).join("session.json"))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Reads and parses a JSON5 or JSON file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadFile`] if the file cannot be read and
/// [`ConfigError::ParseJson5`] if its content does not parse.
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json5::from_str(&content).map_err(ConfigError::from)
}

/// Writes `value` as pretty JSON, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::WriteFile`] on I/O failure and
/// [`ConfigError::SerializeJson`] if `value` cannot be serialized.
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let write_err = |source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        account: String,
        timeout: u64,
    }

    #[test]
    fn reads_json5_with_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.json5");
        std::fs::write(
            &path,
            r#"
            {
                // merchant account
                account: "tienda",
                timeout: 30,
            }
            "#,
        )
        .unwrap();

        let sample: Sample = read_config_file(&path).unwrap();
        assert_eq!(sample.account, "tienda");
        assert_eq!(sample.timeout, 30);
    }

    #[test]
    fn read_missing_file_is_read_error() {
        let result: Result<Sample> = read_config_file("/nonexistent/wawidget.json");
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn read_garbage_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ account: ").unwrap();

        let result: Result<Sample> = read_config_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseJson5(_))));
    }

    #[test]
    fn write_creates_parents_and_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("config.json");
        let sample = Sample {
            account: "tienda".into(),
            timeout: 60,
        };

        write_config_file(&path, &sample).unwrap();
        let loaded: Sample = read_config_file(&path).unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn find_prefers_local_json5_over_json() {
        let local = TempDir::new().unwrap();
        std::fs::write(local.path().join("wawidget.json"), "{}").unwrap();
        std::fs::write(local.path().join("wawidget.json5"), "{}").unwrap();

        let found = find_config_file_in(Some(local.path()), None).unwrap();
        assert!(found.ends_with("wawidget.json5"));
    }

    #[test]
    fn find_falls_back_to_user_dir() {
        let local = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        std::fs::write(user.path().join("config.json"), "{}").unwrap();

        let found = find_config_file_in(Some(local.path()), Some(user.path())).unwrap();
        assert!(found.ends_with("config.json"));
    }

    #[test]
    fn find_returns_none_when_nothing_exists() {
        let local = TempDir::new().unwrap();
        assert!(find_config_file_in(Some(local.path()), None).is_none());
    }
}
