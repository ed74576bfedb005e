use advisory_core::{
    Config, Coordinates, MapView, WeatherObservation, classify,
    config::API_KEY_ENV,
    map::{DEFAULT_ZOOM, MAX_ZOOM},
    provider::provider_from_config,
};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode};
use tracing::info;

use crate::report::{JsonReport, Report};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-advisory",
    version,
    about = "Weather advisories: what to wear, what to do"
)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key, home location and map zoom.
    Configure,

    /// Fetch current weather and show the advisory.
    Show {
        /// Latitude in decimal degrees; defaults to the configured home.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees; defaults to the configured home.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Classify an observation given on the command line, without fetching.
    Advise {
        /// Temperature in °C.
        #[arg(long, allow_negative_numbers = true)]
        temp: f64,

        /// Condition text, e.g. "light rain".
        #[arg(long, default_value = "")]
        condition: String,

        #[arg(long, allow_negative_numbers = true)]
        feels_like: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        min: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,

        /// Relative humidity, 0-100.
        #[arg(long)]
        humidity: Option<f64>,

        /// Wind speed in m/s.
        #[arg(long)]
        wind: Option<f64>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { lat, lon, json } => show(lat, lon, json).await?,
            Command::Advise { temp, condition, feels_like, min, max, humidity, wind, json } => {
                let observation = WeatherObservation {
                    feels_like_c: feels_like,
                    temperature_min_c: min,
                    temperature_max_c: max,
                    humidity_pct: humidity,
                    wind_speed_mps: wind,
                    ..WeatherObservation::new(temp, condition)
                };
                let advisory = classify(&observation)?;

                if json {
                    let report = JsonReport::new(&observation, &advisory, None);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    let report =
                        Report { observation: &observation, advisory: &advisory, map: None };
                    println!("{report}");
                }
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    if Confirm::new("Set a home location?").with_default(config.home.is_none()).prompt()? {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number, e.g. 52.52")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number, e.g. 13.405")
            .prompt()?;
        config.home = Some(Coordinates::new(latitude, longitude)?);
    }

    let zoom = CustomType::<u8>::new("Map zoom level:")
        .with_default(config.map.zoom.unwrap_or(DEFAULT_ZOOM))
        .with_help_message("0 shows the whole world, 19 a single street")
        .prompt()?;
    config.map.zoom = Some(zoom.min(MAX_ZOOM));

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

async fn show(lat: Option<f64>, lon: Option<f64>, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;

    let explicit = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)?),
        _ => None,
    };
    let at = config.resolve_location(explicit)?;

    let provider = provider_from_config(&config, std::env::var(API_KEY_ENV).ok())?;

    info!(latitude = at.latitude, longitude = at.longitude, "fetching current weather");
    let observation = provider.current_observation(at).await?;
    let advisory = classify(&observation)
        .context("Weather provider returned an observation that cannot be classified")?;

    let map = MapView::new(at, config.map_zoom());

    if json {
        let report = JsonReport::new(&observation, &advisory, Some(map));
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let report = Report { observation: &observation, advisory: &advisory, map: Some(map) };
        println!("{report}");
    }

    Ok(())
}
