use crate::{Config, Coordinates, WeatherObservation, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current weather observations.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions at `at`, normalized to metric units.
    async fn current_observation(&self, at: Coordinates) -> anyhow::Result<WeatherObservation>;
}

/// Construct the provider from config.
///
/// `env_api_key` is the value of [`crate::config::API_KEY_ENV`], if set.
pub fn provider_from_config(
    config: &Config,
    env_api_key: Option<String>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key(env_api_key)?;

    let mut provider = OpenWeatherProvider::new(api_key);
    if let Some(secs) = config.timeout_secs() {
        provider = provider.with_timeout(std::time::Duration::from_secs(secs))?;
    }

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg, None).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn provider_from_config_works_with_env_key() {
        let cfg = Config::default();
        assert!(provider_from_config(&cfg, Some("KEY".to_string())).is_ok());
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg, None);
        assert!(provider.is_ok());
    }
}
