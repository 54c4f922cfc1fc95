//! Configuration management for SmartMed
//!
//! TOML file with defaults for everything.
//! Location: ~/.smartmed/config.toml, created on first run.

use crate::chat::{DEFAULT_API_KEY_ENV, DEFAULT_CHAT_MODEL, DEFAULT_GEMINI_URL};
use crate::models::Disease;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub chat: ChatSettings,
}

/// Where classifier artifacts live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory holding `<disease>_model.json`
    pub dir: String,
    #[serde(default)]
    pub diabetes: Option<String>,
    #[serde(default)]
    pub heart_disease: Option<String>,
    #[serde(default)]
    pub parkinsons: Option<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: "saved_models".to_string(),
            diabetes: None,
            heart_disease: None,
            parkinsons: None,
        }
    }
}

/// Hosted chat model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    pub model: String,
    pub api_base: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load from an explicit path, or the default location (created if missing)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let config_path = Self::config_path()?;
                if !config_path.exists() {
                    let config = Config::default();
                    config.save(&config_path)?;
                    return Ok(config);
                }
                Self::load_from_file(&config_path)
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".smartmed").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chat.timeout_secs == 0 {
            bail!("chat.timeout_secs must be greater than 0");
        }
        if self.chat.model.trim().is_empty() {
            bail!("chat.model must not be empty");
        }
        if !self.chat.api_base.starts_with("http://") && !self.chat.api_base.starts_with("https://")
        {
            bail!("chat.api_base must be an http(s) URL: {}", self.chat.api_base);
        }
        if self.chat.api_key_env.trim().is_empty() {
            bail!("chat.api_key_env must name an environment variable");
        }
        Ok(())
    }

    /// Artifact path per disease.
    ///
    /// Explicit per-disease paths win; otherwise `<dir>/<disease>_model.json`,
    /// with `models_dir` replacing the configured directory when given.
    pub fn artifact_paths(&self, models_dir: Option<&Path>) -> HashMap<Disease, PathBuf> {
        let dir = models_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::expand_path(&self.models.dir));

        Disease::ALL
            .iter()
            .map(|disease| {
                let explicit = match disease {
                    Disease::Diabetes => self.models.diabetes.as_deref(),
                    Disease::HeartDisease => self.models.heart_disease.as_deref(),
                    Disease::Parkinsons => self.models.parkinsons.as_deref(),
                };
                let path = match explicit {
                    Some(p) if models_dir.is_none() => Self::expand_path(p),
                    _ => dir.join(disease.artifact_file_name()),
                };
                (*disease, path)
            })
            .collect()
    }

    /// Load variables from a `.env` file. Variables already set are kept.
    ///
    /// Without a path, the working directory and its parents are searched.
    /// Returns the file that was loaded, if any.
    pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
            None => dotenvy::dotenv().ok(),
        }
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.models.dir, "saved_models");
        assert_eq!(config.chat.model, "gemini-2.0-flash-exp");
        assert_eq!(config.chat.api_key_env, "GOOGLE_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.chat.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chat.api_base = "ftp://nope".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_artifact_paths_default_dir() {
        let config = Config::default();
        let paths = config.artifact_paths(None);
        assert_eq!(paths.len(), 3);
        assert_eq!(
            paths[&Disease::Diabetes],
            PathBuf::from("saved_models/diabetes_model.json")
        );
    }

    #[test]
    fn test_artifact_paths_explicit_and_override() {
        let mut config = Config::default();
        config.models.parkinsons = Some("/opt/pd.json".to_string());

        let paths = config.artifact_paths(None);
        assert_eq!(paths[&Disease::Parkinsons], PathBuf::from("/opt/pd.json"));

        let paths = config.artifact_paths(Some(Path::new("/models")));
        assert_eq!(
            paths[&Disease::Parkinsons],
            PathBuf::from("/models/parkinsons_model.json")
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.chat.model = "gemini-1.5-flash".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.chat.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[chat]\nmodel = \"m\"\napi_base = \"https://x\"\napi_key_env = \"K\"\ntimeout_secs = 5\n").unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.models.dir, "saved_models");
        assert_eq!(loaded.chat.timeout_secs, 5);
    }

    #[test]
    fn test_expand_path_without_tilde() {
        assert_eq!(Config::expand_path("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_env_file_supplies_missing_variables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "SMARTMED_ENV_FILE_TEST_KEY=from-file\nSMARTMED_ENV_FILE_TEST_SET=from-file\n",
        )
        .unwrap();
        std::env::set_var("SMARTMED_ENV_FILE_TEST_SET", "from-shell");

        assert_eq!(Config::load_env_file(Some(&path)), Some(path.clone()));
        assert_eq!(
            std::env::var("SMARTMED_ENV_FILE_TEST_KEY").unwrap(),
            "from-file"
        );
        assert_eq!(
            std::env::var("SMARTMED_ENV_FILE_TEST_SET").unwrap(),
            "from-shell"
        );

        assert_eq!(Config::load_env_file(Some(&dir.path().join("missing.env"))), None);
    }
}
