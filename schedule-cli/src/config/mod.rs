//! Configuration: TOML file in the user config directory, overridden by
//! environment variables and then by command-line flags

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "schedule-cli";
const CONFIG_FILE: &str = "config.toml";

pub const ENV_API_BASE: &str = "SCHEDULE_API_BASE";
pub const ENV_TOKEN: &str = "SCHEDULE_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the scheduling service, without trailing slash
    pub api_base: Option<String>,
    /// HTTP timeout for service calls
    pub timeout_secs: u64,
    /// Where exported workbooks are written
    pub export_dir: Option<PathBuf>,
    /// Open the workbook with the system viewer after export
    pub open_after_export: bool,
    pub rules: RulesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: None,
            timeout_secs: 60,
            export_dir: None,
            open_after_export: false,
            rules: RulesConfig::default(),
        }
    }
}

/// Default scheduling rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub start_day: u32,
    pub local_off_days: u32,
    pub overseas_off_days: u32,
    pub driver_percentage_cap: f64,
    pub excluded_weekdays: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            start_day: 1,
            local_off_days: 2,
            overseas_off_days: 2,
            driver_percentage_cap: 0.5,
            excluded_weekdays: vec!["friday".to_string()],
        }
    }
}

impl Config {
    /// Default config file location (~/.config/schedule-cli/config.toml)
    pub fn default_path() -> PathBuf {
        config_dir().join(CONFIG_FILE)
    }

    /// Load from `path` (or the default location). A missing file yields
    /// defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = Self::from_toml(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            log::debug!("Loaded config from {}", path.display());
            config
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        if let Ok(api_base) = std::env::var(ENV_API_BASE) {
            config.api_base = Some(api_base);
        }
        config.api_base = config.api_base.as_deref().and_then(clean_api_base);

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.api_base = config.api_base.as_deref().and_then(clean_api_base);
        Ok(config)
    }

    /// Override the service base URL; blank clears it
    pub fn set_api_base(&mut self, api_base: &str) {
        self.api_base = clean_api_base(api_base);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Export directory, created on demand
    pub fn export_dir(&self) -> Result<PathBuf> {
        let dir = self
            .export_dir
            .clone()
            .unwrap_or_else(|| config_dir().join("exports"));

        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
        }

        Ok(dir)
    }
}

/// Bearer token from the environment, if any
pub fn token_from_env() -> Option<String> {
    std::env::var(ENV_TOKEN)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Trim whitespace and trailing slashes; blank means unset
fn clean_api_base(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_end_matches('/');
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base, None);
        assert_eq!(config.timeout_secs, 60);
        assert!(!config.open_after_export);
        assert_eq!(config.rules.local_off_days, 2);
        assert_eq!(config.rules.excluded_weekdays, vec!["friday"]);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            api_base = "https://sched.example.com///"
            open_after_export = true

            [rules]
            driver_percentage_cap = 0.4
            excluded_weekdays = ["friday", "saturday"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base.as_deref(), Some("https://sched.example.com"));
        assert!(config.open_after_export);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.rules.driver_percentage_cap, 0.4);
        assert_eq!(config.rules.local_off_days, 2);
        assert_eq!(config.rules.excluded_weekdays, vec!["friday", "saturday"]);
    }

    #[test]
    fn test_blank_api_base_is_unset() {
        let config = Config::from_toml("api_base = \"  / \"").unwrap();
        assert_eq!(config.api_base, None);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(Config::from_toml("timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_export_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("exports");
        let config = Config {
            export_dir: Some(target.clone()),
            ..Default::default()
        };
        assert_eq!(config.export_dir().unwrap(), target);
        assert!(target.is_dir());
    }
}
