//! planmap configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main planmap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation provider configuration
    pub llm: LlmConfig,

    /// Diagram layout tuning
    pub layout: LayoutConfig,
}

impl Config {
    /// Load configuration with fallback chain:
    /// explicit path, then `.planmap.yml`, then the user config dir, then
    /// defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(".planmap.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("planmap").join("planmap.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log-level field before logging is initialized.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        #[derive(Deserialize)]
        struct LogLevelOnly {
            #[serde(rename = "log-level")]
            log_level: Option<String>,
        }

        let path = config_path.cloned().or_else(|| {
            let local = PathBuf::from(".planmap.yml");
            local.exists().then_some(local)
        })?;
        let content = fs::read_to_string(path).ok()?;
        serde_yaml::from_str::<LogLevelOnly>(&content).ok()?.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable.
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).map_err(|_| {
            eyre::eyre!(
                "Generation API key not found. Set the {} environment variable.",
                self.api_key_env
            )
        })
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash-exp".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Diagram layout tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance from the center to each branch node
    #[serde(rename = "branch-radius")]
    pub branch_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            branch_radius: crate::layout::BRANCH_RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.layout.branch_radius, 280.0);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config: Config = serde_yaml::from_str(
            "llm:\n  model: gemini-pro\n  timeout-ms: 5000\nlayout:\n  branch-radius: 200\n",
        )
        .unwrap();
        assert_eq!(config.llm.model, "gemini-pro");
        assert_eq!(config.llm.timeout_ms, 5000);
        // Unset fields keep their defaults
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.layout.branch_radius, 200.0);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planmap.yml");
        fs::write(&path, "llm:\n  api-key-env: MY_KEY\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.api_key_env, "MY_KEY");
        assert_eq!(config.llm.provider, "gemini");

        assert!(Config::load(Some(&dir.path().join("missing.yml"))).is_err());
    }

    #[test]
    fn test_load_log_level_reads_single_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planmap.yml");
        fs::write(&path, "log-level: DEBUG\nllm:\n  model: x\n").unwrap();

        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("DEBUG"));
    }
}
