//! Runtime settings, loaded from an optional JSON file and overridden by environment variables
use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::nitter_object::FetchMode;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Nitter instance to scrape
    pub instance: String,
    /// Prefix put in front of the post path in the printed link
    pub viewer_origin: String,
    /// How many recent posts are examined
    pub batch_size: usize,
    pub mode: FetchMode,
    pub timeout_secs: u64,
    /// Report failures through the exit status instead of staying silent
    pub strict: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            instance: "https://nitter.net".to_string(),
            viewer_origin: "https://vxtwitter.com".to_string(),
            batch_size: 10,
            mode: FetchMode::User,
            timeout_secs: 10,
            strict: false,
        }
    }
}

impl FetchConfig {
    /// Build the effective config
    ///
    /// * config_file: explicit path given on the command line, it must be readable
    ///
    /// Without an explicit path, `~/.nitfetch.json` is used when it exists, otherwise the defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<FetchConfig> {
        let mut config = load_file_or_default(config_file, find_default_config_file())?;
        config.apply_env();
        debug!("Effective config: {:?}", &config);
        Ok(config)
    }

    /// Override fields with `NITFETCH_*` environment variables
    /// Values which can't be parsed are skipped
    pub fn apply_env(&mut self) {
        if let Ok(instance) = env::var("NITFETCH_INSTANCE") {
            self.instance = instance;
        }
        if let Ok(viewer_origin) = env::var("NITFETCH_VIEWER") {
            self.viewer_origin = viewer_origin;
        }
        if let Some(batch_size) = parse_env("NITFETCH_BATCH_SIZE") {
            self.batch_size = batch_size;
        }
        if let Some(mode) = parse_env("NITFETCH_MODE") {
            self.mode = mode;
        }
        if let Some(timeout_secs) = parse_env("NITFETCH_TIMEOUT") {
            self.timeout_secs = timeout_secs;
        }
        if let Some(strict) = parse_env("NITFETCH_STRICT") {
            self.strict = strict;
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring {}={:?}, it is not a valid value", key, value);
            None
        }
    }
}

/// Pick the config file to read
/// A broken default file only falls back to the defaults, the user never asked for it
fn load_file_or_default(
    config_file: Option<PathBuf>,
    default_file: Option<PathBuf>,
) -> Result<FetchConfig> {
    if let Some(path) = config_file {
        return load_config_file(&path);
    }
    match default_file.filter(|path| path.exists()) {
        Some(path) => match load_config_file(&path) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Ok(FetchConfig::default())
            }
        },
        None => Ok(FetchConfig::default()),
    }
}

/// Load the config from the file
/// * config_path: path of the JSON config file
fn load_config_file(config_path: &Path) -> Result<FetchConfig> {
    let file = OpenOptions::new().read(true).open(config_path)?;
    let loaded_config = serde_json::from_reader(file)?;
    Ok(loaded_config)
}

/// Get the default path of the config file in the home dir
fn find_default_config_file() -> Option<PathBuf> {
    let default_path = ".nitfetch.json";
    home::home_dir().map(|mut path| {
        path.push(default_path);
        path
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"instance": "https://nitter.example", "batch_size": 20}}"#).unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.instance, "https://nitter.example");
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.viewer_origin, "https://vxtwitter.com");
        assert_eq!(config.mode, FetchMode::User);
        assert_eq!(config.strict, false);
    }

    #[test]
    fn mode_is_read_in_lowercase() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mode": "hashtag", "strict": true}}"#).unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.mode, FetchMode::Hashtag);
        assert_eq!(config.strict, true);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FetchConfig::load(Some(dir.path().join("missing.json")));
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn broken_default_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let config = load_file_or_default(None, Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config, FetchConfig::default());
    }

    #[test]
    fn default_file_is_read_when_present() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"batch_size": 5}}"#).unwrap();

        let config = load_file_or_default(None, Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.batch_size, 5);

        let dir = tempfile::tempdir().unwrap();
        let config = load_file_or_default(None, Some(dir.path().join(".nitfetch.json"))).unwrap();
        assert_eq!(config, FetchConfig::default());
    }

    #[test]
    fn broken_explicit_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = load_file_or_default(
            Some(file.path().to_path_buf()),
            Some(file.path().to_path_buf()),
        );
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn broken_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "batch_size = 3").unwrap();
        assert_eq!(load_config_file(file.path()).is_err(), true);
    }

    #[test]
    fn invalid_env_value_is_skipped() {
        env::set_var("NITFETCH_TEST_BATCH", "ten");
        assert_eq!(parse_env::<usize>("NITFETCH_TEST_BATCH"), None);
        env::set_var("NITFETCH_TEST_BATCH", "7");
        assert_eq!(parse_env::<usize>("NITFETCH_TEST_BATCH"), Some(7));
        env::remove_var("NITFETCH_TEST_BATCH");
        assert_eq!(parse_env::<usize>("NITFETCH_TEST_BATCH"), None);
    }
}
