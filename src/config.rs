use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub vim_mode: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Override for the session database location
    #[serde(default)]
    pub session_db: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            vim_mode: false,
            request_timeout_secs: default_request_timeout_secs(),
            session_db: None,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty file is a valid config with every default
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid config file")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_yaml(&text)
    }

    /// Load the config file found by [`get_config_path`], or defaults when none exists
    pub fn load(cli_path: Option<&str>) -> Result<(Self, Option<PathBuf>)> {
        match get_config_path(cli_path)? {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }
}

/// Locate the config file.
///
/// `--config` must point at an existing file. Otherwise
/// `<config_dir>/noticetui/config.yaml` is preferred over `./config.yaml`;
/// `None` means neither exists.
pub fn get_config_path(cli_path: Option<&str>) -> Result<Option<PathBuf>> {
    if let Some(path) = cli_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(Some(p));
        }
        anyhow::bail!("Config file not found at specified path: {}", path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("noticetui").join("config.yaml");
        if config_path.exists() {
            return Ok(Some(config_path));
        }
    }

    let local_config = PathBuf::from("config.yaml");
    if local_config.exists() {
        return Ok(Some(local_config));
    }

    Ok(None)
}

/// Debug log destination (only written with --debug)
pub fn get_debug_log_path() -> PathBuf {
    std::env::temp_dir().join("noticetui-debug.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:5001");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.vim_mode);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "base_url: https://notices.example.edu\nvim_mode: true\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "https://notices.example.edu");
        assert!(config.vim_mode);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.session_db, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(Config::from_yaml("request_timeout_secs: [not a number]").is_err());
    }

    #[test]
    fn test_missing_cli_path_is_error() {
        assert!(get_config_path(Some("/definitely/not/here/config.yaml")).is_err());
    }

    #[test]
    fn test_cli_path_is_used() {
        let path = std::env::temp_dir()
            .join(format!("noticetui-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "request_timeout_secs: 5\n").unwrap();

        let (config, found) = Config::load(path.to_str()).unwrap();
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(found.as_deref(), Some(path.as_path()));

        std::fs::remove_file(&path).unwrap();
    }
}
