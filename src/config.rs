//! Configuration management for codeatlas
//!
//! Stores settings in ~/.config/codeatlas/config.json. Environment variables
//! override the file and command-line flags override both.

use crate::analysis::client::DEFAULT_API_URL;
use crate::layout::LayoutParams;
use crate::tree::Palette;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "codeatlas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis backend base URL
    pub api_url: String,
    /// Login session cookie for the backend (`name=value` or bare value)
    pub session_cookie: Option<String>,
    pub request_timeout_secs: u64,
    /// Fetch the file list straight from the GitHub API instead of the backend
    pub use_github: bool,
    /// Replacement for the built-in color/icon table (TOML)
    pub palette_file: Option<PathBuf>,
    pub layout: LayoutParams,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `CODEATLAS_LOG` is unset
    pub level: String,
    /// Log file; defaults to the platform data directory
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_cookie: None,
            request_timeout_secs: 120,
            use_github: false,
            palette_file: None,
            layout: LayoutParams::default(),
            log: LogSettings::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk with environment overrides applied, or defaults.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load one file. Missing files give defaults; corrupt files are set
    /// aside as `config.json.corrupt` and defaults are returned.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                preserve_corrupt_config(path, &content);
                eprintln!(
                    "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                    err
                );
                Self::default()
            }
        }
    }

    /// `CODEATLAS_API_URL` and `CODEATLAS_SESSION` win over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty("CODEATLAS_API_URL") {
            self.api_url = url;
        }
        if let Some(session) = non_empty("CODEATLAS_SESSION") {
            self.session_cookie = Some(session);
        }
    }

    /// Save config to the default location. Returns the path written.
    pub fn save(&self) -> Result<PathBuf> {
        let dir = Self::config_dir().context("Could not determine config directory")?;
        let path = dir.join("config.json");
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(dir, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!(error = %e, "failed to set config directory permissions");
                }
            }
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        #[cfg(unix)]
        {
            write_config_atomic(path, &content).context("Failed to write config")?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, content).context("Failed to write config")?;
        }

        Ok(())
    }

    /// Palette from `palette_file`, or the built-in one.
    pub fn palette(&self) -> Result<Palette> {
        match &self.palette_file {
            Some(path) => Palette::load_from(path),
            None => Ok(Palette::builtin().clone()),
        }
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Default log file: `<data dir>/codeatlas/codeatlas.log`
    pub fn default_log_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join(APP_DIR).join("codeatlas.log"))
    }
}

fn preserve_corrupt_config(path: &Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}

#[cfg(unix)]
fn write_config_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::PermissionsExt;

    let tmp_path = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)?;

    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        tracing::warn!(error = %e, "failed to set temp config file permissions");
    }

    file.write_all(content.as_bytes())?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://codeatlas1.onrender.com");
        assert!(config.session_cookie.is_none());
        assert_eq!(config.log.level, "info");
        assert_eq!(config.layout.link_distance, 100.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"api_url": "http://localhost:5000", "layout": {"charge_strength": -120.0}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.layout.charge_strength, -120.0);
        assert_eq!(config.layout.link_distance, 100.0);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_corrupt_file_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config, Config::default());
        assert!(!path.exists());
        let backup = dir.path().join("config.json.corrupt");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("nope.json")), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/config.json");
        let config = Config {
            session_cookie: Some("abc".to_string()),
            use_github: true,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
        assert!(!dir.path().join("sub/config.tmp").exists());
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CODEATLAS_API_URL", "http://localhost:5000"),
            ("CODEATLAS_SESSION", ""),
        ]);
        let mut config = Config {
            session_cookie: Some("from-file".to_string()),
            ..Config::default()
        };
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api_url, "http://localhost:5000");
        // Empty values don't clobber the file
        assert_eq!(config.session_cookie.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_palette_file_override() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            palette_file: Some(dir.path().join("missing.toml")),
            ..Config::default()
        };
        assert!(config.palette().is_err());
        assert_eq!(Config::default().palette().unwrap(), *Palette::builtin());
    }
}
