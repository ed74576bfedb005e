use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::{
    map::{DEFAULT_ZOOM, MAX_ZOOM},
    model::Coordinates,
};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// OpenWeather credentials and request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Request timeout; the provider default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u8>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [openweather]
    /// api_key = "..."
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather: Option<ProviderConfig>,

    /// Location used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<Coordinates>,

    #[serde(default)]
    pub map: MapConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;

        if let Some(home) = cfg.home {
            Coordinates::new(home.latitude, home.longitude).context("Invalid [home] location")?;
        }

        if let Some(zoom) = cfg.map.zoom.filter(|z| *z > MAX_ZOOM) {
            return Err(anyhow!("Invalid [map] zoom {zoom}: expected 0..={MAX_ZOOM}"));
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-advisory", "weather-advisory")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace the OpenWeather API key, keeping any other provider settings.
    pub fn set_api_key(&mut self, api_key: String) {
        match &mut self.openweather {
            Some(provider) => provider.api_key = api_key,
            None => self.openweather = Some(ProviderConfig { api_key, timeout_secs: None }),
        }
    }

    /// API key from `env` if set and non-empty, otherwise from the file.
    ///
    /// `env` is the value of [`API_KEY_ENV`], passed in so callers decide
    /// where it comes from.
    pub fn api_key(&self, env: Option<String>) -> Result<String> {
        if let Some(key) = env.filter(|k| !k.trim().is_empty()) {
            return Ok(key);
        }

        self.openweather
            .as_ref()
            .map(|p| p.api_key.clone())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather-advisory configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.openweather.as_ref().and_then(|p| p.timeout_secs)
    }

    pub fn map_zoom(&self) -> u8 {
        self.map.zoom.unwrap_or(DEFAULT_ZOOM)
    }

    /// Pick the location to report on: explicit coordinates first, then `[home]`.
    pub fn resolve_location(&self, explicit: Option<Coordinates>) -> Result<Coordinates> {
        explicit.or(self.home).ok_or_else(|| {
            anyhow!(
                "Location unavailable.\n\
                 Hint: pass --lat and --lon, or set a home location with \
                 `weather-advisory configure`."
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key(None).unwrap_err();

        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("Hint: run `weather-advisory configure`"));
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.api_key(None).unwrap(), "FILE_KEY");
        assert_eq!(cfg.api_key(Some("ENV_KEY".into())).unwrap(), "ENV_KEY");
        assert_eq!(cfg.api_key(Some("  ".into())).unwrap(), "FILE_KEY");
    }

    #[test]
    fn set_api_key_keeps_timeout() {
        let mut cfg = Config::from_toml(
            r#"
            [openweather]
            api_key = "OLD"
            timeout_secs = 5
            "#,
        )
        .expect("config must parse");

        cfg.set_api_key("NEW".into());

        assert_eq!(cfg.api_key(None).unwrap(), "NEW");
        assert_eq!(cfg.timeout_secs(), Some(5));
    }

    #[test]
    fn parses_full_config() {
        let cfg = Config::from_toml(
            r#"
            [openweather]
            api_key = "KEY"

            [home]
            latitude = 52.52
            longitude = 13.405

            [map]
            zoom = 12
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.map_zoom(), 12);
        let home = cfg.home.expect("home must be set");
        assert_eq!(home.latitude, 52.52);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = Config::from_toml("").expect("empty config must parse");
        assert_eq!(cfg.map_zoom(), DEFAULT_ZOOM);
        assert!(cfg.home.is_none());
        assert!(cfg.timeout_secs().is_none());
    }

    #[test]
    fn rejects_invalid_home() {
        let err = Config::from_toml(
            r#"
            [home]
            latitude = 123.0
            longitude = 0.0
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Invalid [home] location"));
    }

    #[test]
    fn rejects_zoom_beyond_max() {
        let err = Config::from_toml("[map]\nzoom = 40\n").unwrap_err();
        assert!(err.to_string().contains("Invalid [map] zoom 40"));

        let cfg = Config::from_toml("[map]\nzoom = 19\n").expect("max zoom is allowed");
        assert_eq!(cfg.map_zoom(), MAX_ZOOM);
    }

    #[test]
    fn resolve_location_prefers_explicit() {
        let mut cfg = Config::default();
        let explicit = Coordinates::new(1.0, 2.0).unwrap();

        assert!(cfg.resolve_location(None).is_err());

        cfg.home = Some(Coordinates::new(3.0, 4.0).unwrap());
        assert_eq!(cfg.resolve_location(None).unwrap(), cfg.home.unwrap());
        assert_eq!(cfg.resolve_location(Some(explicit)).unwrap(), explicit);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.home = Some(Coordinates::new(-33.87, 151.21).unwrap());

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.api_key(None).unwrap(), "KEY");
        assert_eq!(back.home, cfg.home);
    }
}
