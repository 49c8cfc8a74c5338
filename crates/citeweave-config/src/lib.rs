use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variables that override the corresponding config keys.
pub const SEARCH_KEY_ENV: &str = "CITEWEAVE_SEARCH_API_KEY";
pub const COMPLETION_KEY_ENV: &str = "CITEWEAVE_COMPLETION_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key for the neural search collaborator.
    pub search_api_key: Option<String>,
    /// API key for the completion collaborator.
    pub completion_api_key: Option<String>,
    /// Default in-line citation style: "apa", "mla" or "chicago".
    pub citation_style: Option<String>,
    /// Draft file opened when the CLI gets no path argument.
    pub draft_path: Option<PathBuf>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the configured draft path
        config.draft_path = config
            .draft_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/citeweave");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Search API key, with the environment variable taking precedence over
    /// the config file.
    pub fn search_key(&self) -> Option<String> {
        std::env::var(SEARCH_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.search_api_key.clone())
    }

    /// Completion API key, with the environment variable taking precedence.
    pub fn completion_key(&self) -> Option<String> {
        std::env::var(COMPLETION_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.completion_api_key.clone())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/citeweave/config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let test_config = Config {
            search_api_key: Some("sk-test".to_string()),
            completion_api_key: None,
            citation_style: Some("mla".to_string()),
            draft_path: Some(PathBuf::from("/tmp/draft.txt")),
        };

        test_config.save_to_path(&config_file).unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded.search_api_key.as_deref(), Some("sk-test"));
        assert_eq!(loaded.citation_style.as_deref(), Some("mla"));
        assert_eq!(loaded.draft_path, test_config.draft_path);
    }

    #[test]
    fn test_missing_keys_default_to_none() {
        let config: Config = toml::from_str("citation_style = \"apa\"").unwrap();
        assert!(config.search_api_key.is_none());
        assert!(config.completion_api_key.is_none());
        assert!(config.draft_path.is_none());
    }

    #[test]
    fn test_draft_path_tilde_expansion() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "draft_path = \"~/drafts/essay.txt\"").unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        let expanded = loaded.draft_path.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("drafts/essay.txt"));
    }

    #[test]
    fn test_env_var_overrides_search_key() {
        unsafe {
            env::set_var(SEARCH_KEY_ENV, "env-key");
        }

        let config = Config {
            search_api_key: Some("file-key".to_string()),
            ..Config::default()
        };
        assert_eq!(config.search_key().as_deref(), Some("env-key"));

        unsafe {
            env::remove_var(SEARCH_KEY_ENV);
        }

        assert_eq!(config.search_key().as_deref(), Some("file-key"));
    }
}
