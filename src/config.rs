use crate::error::{CropwiseError, Result};
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_BASE_ENV: &str = "CROPWISE_API_BASE_URL";
pub const DATA_DIR_ENV: &str = "CROPWISE_DATA_DIR";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default = "default_language")]
    pub preferred_language: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Prefix for both services. Empty means relative requests.
    #[serde(default)]
    pub base_url: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            preferred_language: default_language(),
        }
    }
}

impl Config {
    /// Loads the YAML file (if any) and applies the environment override.
    /// A missing file is fine unless it was named explicitly.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let explicit = config_override.is_some();
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        let mut config = if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .map_err(|e| CropwiseError::Config(format!("Failed to read config: {}", e)))?;
            Self::parse(&config_str)?
        } else if explicit {
            return Err(CropwiseError::Config(format!(
                "Config file not found at {:?}",
                config_path
            )));
        } else {
            tracing::debug!("no config file found, using defaults");
            Config::default()
        };

        config.api.base_url = resolve_base_url(
            &config.api.base_url,
            std::env::var(API_BASE_ENV).ok(),
            None,
        );
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;
        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| CropwiseError::Config(format!("Failed to parse config: {}", e)))?;
        config.api.base_url = normalize_base_url(&config.api.base_url);
        Ok(config)
    }

    /// CLI flag beats everything else.
    pub fn with_api_base(mut self, cli_value: Option<String>) -> Self {
        self.api.base_url = resolve_base_url(&self.api.base_url, None, cli_value);
        self
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::default_config_path()
    }

    /// Default path for writing new config files (~/.config/cropwise/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CropwiseError::Config("Cannot determine config directory".into()))?
            .join("cropwise");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up cropwise.");
        println!();

        let base_url: String = Input::new()
            .with_prompt("  API base URL (blank for relative requests)")
            .default("http://localhost:8000".into())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

        let preferred_language: String = Input::new()
            .with_prompt("  Preferred language for recommendation notes")
            .default(default_language())
            .interact_text()
            .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

        let config = Config {
            api: ApiConfig {
                base_url: normalize_base_url(&base_url),
            },
            preferred_language,
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| CropwiseError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# cropwise configuration\n# Generated by `cropwise init`\n# ${{VAR}} is replaced from the environment; {} overrides api.base_url.\n\n{}",
            API_BASE_ENV, yaml
        );
        std::fs::write(&config_path, content)?;

        println!();
        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    /// Replaces `${VAR}` with its environment value; unset variables become empty.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| CropwiseError::Config(format!("Bad substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex_lite::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });
        Ok(result.into_owned())
    }

    pub fn data_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| CropwiseError::Config("Cannot determine data directory".into()))?
            .join("cropwise");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("cropwise.log"))
    }
}

/// Precedence: CLI flag, then environment, then the file value.
pub fn resolve_base_url(
    file_value: &str,
    env_value: Option<String>,
    cli_value: Option<String>,
) -> String {
    let chosen = cli_value
        .or(env_value)
        .unwrap_or_else(|| file_value.to_string());
    normalize_base_url(&chosen)
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let config = Config::parse(
            "api:\n  base_url: \"http://agro.local:8000/\"\npreferred_language: bn\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://agro.local:8000");
        assert_eq!(config.preferred_language, "bn");
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.api.base_url, "");
        assert_eq!(config.preferred_language, "en");
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("CROPWISE_TEST_SUBST_HOST", "http://10.0.0.7:9000");
        let config =
            Config::parse("api:\n  base_url: \"${CROPWISE_TEST_SUBST_HOST}/\"\n").unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.7:9000");
    }

    #[test]
    fn unset_variable_becomes_empty() {
        let config =
            Config::parse("api:\n  base_url: \"${CROPWISE_TEST_SURELY_UNSET_VAR}\"\n").unwrap();
        assert_eq!(config.api.base_url, "");
    }

    #[test]
    fn invalid_yaml_is_a_config_error() {
        let result = Config::parse("api: [unclosed");
        assert!(matches!(result, Err(CropwiseError::Config(_))));
    }

    #[test]
    fn base_url_precedence() {
        assert_eq!(resolve_base_url("http://file", None, None), "http://file");
        assert_eq!(
            resolve_base_url("http://file", Some("http://env/".into()), None),
            "http://env"
        );
        assert_eq!(
            resolve_base_url(
                "http://file",
                Some("http://env".into()),
                Some("http://cli".into())
            ),
            "http://cli"
        );
        assert_eq!(resolve_base_url("", None, None), "");
    }

    #[test]
    fn cli_override_applies_last() {
        let config = Config::parse("api:\n  base_url: http://file\n")
            .unwrap()
            .with_api_base(Some("http://cli:1/".into()));
        assert_eq!(config.api.base_url, "http://cli:1");

        let config = Config::parse("api:\n  base_url: http://file\n")
            .unwrap()
            .with_api_base(None);
        assert_eq!(config.api.base_url, "http://file");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = Config::load(Some(PathBuf::from("/nonexistent/cropwise.yaml")));
        assert!(matches!(result, Err(CropwiseError::Config(_))));
    }
}
