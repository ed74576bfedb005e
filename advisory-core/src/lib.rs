//! Core library for the `weather-advisory` CLI.
//!
//! This crate defines:
//! - The advisory classifier (clothing suggestion, do/don't tips)
//! - Shared domain models (observations, advisories, coordinates)
//! - The weather provider abstraction and its OpenWeather implementation
//! - Configuration & credentials handling
//! - Map view helpers for the observation location
//!
//! The classifier is pure and synchronous; only the provider does I/O.

pub mod classify;
pub mod config;
pub mod error;
pub mod map;
pub mod model;
pub mod provider;

pub use classify::classify;
pub use config::Config;
pub use error::{ClassifyError, LocationError};
pub use map::MapView;
pub use model::{
    AdvisoryResult, ClothingCategory, ClothingSuggestion, Coordinates, LocationLabel,
    WeatherObservation,
};
pub use provider::WeatherProvider;
