use crate::error::{ParaweroError, Result};
use crate::models::TimeWindow;
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub openweathermap: Option<OpenWeatherMapConfig>,
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// One Call sections to leave out of the response
    #[serde(default = "default_exclude")]
    pub exclude: String,
}

fn default_enabled() -> bool {
    true
}

fn default_exclude() -> String {
    "minutely,alerts".into()
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("enabled", &self.enabled)
            .field("exclude", &self.exclude)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub default_window: TimeWindow,
    /// Label shown instead of a reverse-geocoded place name
    #[serde(default)]
    pub location_name: Option<String>,
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(ParaweroError::Config(format!(
                "Config file not found at {:?}. Run `parawero init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| ParaweroError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Config for commands that can run without one. Nothing found by the
    /// standard search is `None`; an explicit path must exist, and any file
    /// that is found must parse.
    pub fn load_optional(config_override: Option<PathBuf>) -> Result<Option<Self>> {
        if config_override.is_none() && !Self::exists(None) {
            tracing::debug!("No config file found, using defaults");
            return Ok(None);
        }
        Self::load(config_override).map(Some)
    }

    /// Parse YAML after `${VAR}` environment substitution
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ParaweroError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Forecast provider settings, when configured and enabled
    pub fn provider(&self) -> Option<&OpenWeatherMapConfig> {
        self.openweathermap
            .as_ref()
            .filter(|c| c.enabled && !c.api_key.is_empty())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("parawero").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/parawero/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ParaweroError::Config("Cannot determine config directory".into()))?
            .join("parawero");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up Parawero!");
        println!();

        println!("OpenWeatherMap (leave API key blank to skip)");
        let api_key: String = Input::new()
            .with_prompt("  API key")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ParaweroError::Config(format!("Input error: {}", e)))?;

        let openweathermap = if api_key.is_empty() {
            None
        } else {
            let latitude: f64 = Input::new()
                .with_prompt("  Home latitude")
                .default(40.42)
                .interact_text()
                .map_err(|e| ParaweroError::Config(format!("Input error: {}", e)))?;

            let longitude: f64 = Input::new()
                .with_prompt("  Home longitude")
                .default(-3.70)
                .interact_text()
                .map_err(|e| ParaweroError::Config(format!("Input error: {}", e)))?;

            Some(OpenWeatherMapConfig {
                api_key,
                latitude,
                longitude,
                enabled: true,
                exclude: default_exclude(),
            })
        };

        println!();

        println!("Advisor");
        let window_names: Vec<&str> = TimeWindow::ALL.iter().map(|w| w.display_range()).collect();
        let default_index = TimeWindow::ALL
            .iter()
            .position(|w| *w == TimeWindow::default())
            .unwrap_or(0);
        let selected = Select::new()
            .with_prompt("  Default time window")
            .items(&window_names)
            .default(default_index)
            .interact()
            .map_err(|e| ParaweroError::Config(format!("Input error: {}", e)))?;

        let location_name: String = Input::new()
            .with_prompt("  Location label (blank to look it up)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ParaweroError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            openweathermap,
            advisor: AdvisorConfig {
                default_window: TimeWindow::ALL[selected],
                location_name: Some(location_name).filter(|n| !n.is_empty()),
            },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| ParaweroError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# Parawero Configuration\n# Generated by `parawero init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ParaweroError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = Config::from_yaml(
            r#"
openweathermap:
  api_key: abc123
  latitude: 43.26
  longitude: -2.93
advisor:
  default_window: evening
  location_name: Bilbao
"#,
        )
        .unwrap();

        let owm = config.provider().unwrap();
        assert_eq!(owm.api_key, "abc123");
        assert!(owm.enabled);
        assert_eq!(owm.exclude, "minutely,alerts");
        assert_eq!(config.advisor.default_window, TimeWindow::Evening);
        assert_eq!(config.advisor.location_name.as_deref(), Some("Bilbao"));
    }

    #[test]
    fn advisor_section_is_optional() {
        let config = Config::from_yaml("openweathermap: null\n").unwrap();
        assert!(config.provider().is_none());
        assert_eq!(config.advisor.default_window, TimeWindow::Today);
    }

    #[test]
    fn disabled_provider_is_ignored() {
        let config = Config::from_yaml(
            "openweathermap:\n  api_key: abc\n  latitude: 1.0\n  longitude: 2.0\n  enabled: false\n",
        )
        .unwrap();
        assert!(config.provider().is_none());
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("PARAWERO_TEST_OWM_KEY", "from-env");
        let config = Config::from_yaml(
            "openweathermap:\n  api_key: ${PARAWERO_TEST_OWM_KEY}\n  latitude: 1.0\n  longitude: 2.0\n",
        )
        .unwrap();
        assert_eq!(config.provider().unwrap().api_key, "from-env");
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let config = OpenWeatherMapConfig {
            api_key: "secret".into(),
            latitude: 0.0,
            longitude: 0.0,
            enabled: true,
            exclude: default_exclude(),
        };
        assert!(!format!("{:?}", config).contains("secret"));
    }

    fn write_temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("parawero-{}-{}.yaml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn optional_load_reports_broken_explicit_config() {
        let broken = write_temp_config("broken", "advisor: [unclosed\n");
        let err = Config::load_optional(Some(broken.clone())).unwrap_err();
        assert!(matches!(err, ParaweroError::Config(_)));
        std::fs::remove_file(broken).unwrap();

        let missing = std::env::temp_dir().join("parawero-does-not-exist.yaml");
        assert!(Config::load_optional(Some(missing)).is_err());
    }

    #[test]
    fn optional_load_reads_explicit_config() {
        let path = write_temp_config("valid", "advisor:\n  default_window: morning\n");
        let config = Config::load_optional(Some(path.clone())).unwrap().unwrap();
        assert_eq!(config.advisor.default_window, TimeWindow::Morning);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_unknown_window() {
        let err = Config::from_yaml("advisor:\n  default_window: midnight\n").unwrap_err();
        assert!(matches!(err, ParaweroError::Config(_)));
    }
}
