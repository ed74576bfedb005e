use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LocationError;

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(LocationError::InvalidCoordinates { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }
}

/// Human-readable place name. Display only, never read by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationLabel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// One normalized snapshot of the weather for a single place and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature_c: f64,
    #[serde(default)]
    pub feels_like_c: Option<f64>,
    #[serde(default)]
    pub temperature_min_c: Option<f64>,
    #[serde(default)]
    pub temperature_max_c: Option<f64>,
    /// Relative humidity, 0-100.
    #[serde(default)]
    pub humidity_pct: Option<f64>,
    /// Metres per second. Providers must convert before filling this in.
    #[serde(default)]
    pub wind_speed_mps: Option<f64>,
    /// Free-form description such as "light rain". Matched case-insensitively.
    #[serde(default)]
    pub condition: String,
    /// Longer provider wording for display, e.g. "overcast clouds".
    #[serde(default)]
    pub description: Option<String>,
    /// Provider icon code, passed through to presentation untouched.
    #[serde(default)]
    pub icon_code: Option<String>,
    #[serde(default)]
    pub location: Option<LocationLabel>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherObservation {
    /// Observation carrying only the fields the classifier requires.
    pub fn new(temperature_c: f64, condition: impl Into<String>) -> Self {
        Self {
            temperature_c,
            feels_like_c: None,
            temperature_min_c: None,
            temperature_max_c: None,
            humidity_pct: None,
            wind_speed_mps: None,
            condition: condition.into(),
            description: None,
            icon_code: None,
            location: None,
            observed_at: None,
        }
    }
}

/// Closed set of clothing suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClothingCategory {
    Snow,
    Rain,
    Cloudy,
    HotSun,
    MildSun,
    Freezing,
    Cold,
    Cool,
    Mild,
    Hot,
}

impl ClothingCategory {
    pub const fn all() -> &'static [ClothingCategory] {
        &[
            ClothingCategory::Snow,
            ClothingCategory::Rain,
            ClothingCategory::Cloudy,
            ClothingCategory::HotSun,
            ClothingCategory::MildSun,
            ClothingCategory::Freezing,
            ClothingCategory::Cold,
            ClothingCategory::Cool,
            ClothingCategory::Mild,
            ClothingCategory::Hot,
        ]
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Snow => "☃️ It's snowy — wear a heavy coat, gloves, boots, and a beanie.",
            Self::Rain => "🌧️ It's rainy — take an umbrella or a waterproof jacket.",
            Self::Cloudy => "☁️ Cloudy — a light jacket or hoodie is perfect.",
            Self::HotSun => "😎 Sunny & hot — wear light cotton clothes and stay hydrated.",
            Self::MildSun => "☀️ Pleasant — T-shirt, jeans, or casual wear are great.",
            Self::Freezing => "❄️ Freezing cold — wear a thick winter jacket, scarf, and gloves.",
            Self::Cold => "🧣 Cold — wear a jacket or sweater and stay warm.",
            Self::Cool => "🧥 Cool — a light jacket or hoodie will do.",
            Self::Mild => "👕 Mild — T-shirt and jeans are comfortable.",
            Self::Hot => "🔥 Hot — wear breathable clothes and drink water often.",
        }
    }

    /// Icon name for presentation layers.
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Snow => "snowflake",
            Self::Rain => "cloud_rain",
            Self::Cloudy => "cloud",
            Self::HotSun | Self::MildSun => "sun",
            Self::Freezing | Self::Cold | Self::Cool | Self::Mild | Self::Hot => "thermometer",
        }
    }
}

impl std::fmt::Display for ClothingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Snow => "snow",
            Self::Rain => "rain",
            Self::Cloudy => "cloudy",
            Self::HotSun => "hot sun",
            Self::MildSun => "mild sun",
            Self::Freezing => "freezing",
            Self::Cold => "cold",
            Self::Cool => "cool",
            Self::Mild => "mild",
            Self::Hot => "hot",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingSuggestion {
    pub category: ClothingCategory,
    pub message: String,
}

impl From<ClothingCategory> for ClothingSuggestion {
    fn from(category: ClothingCategory) -> Self {
        Self { category, message: category.message().to_string() }
    }
}

/// Clothing suggestion plus do/don't tips derived from one observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub clothing: ClothingSuggestion,
    pub do_tips: Vec<String>,
    pub dont_tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_accept_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn coordinates_reject_out_of_range_and_nan() {
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        let err = Coordinates::new(f64::NAN, 0.0).unwrap_err();
        assert!(err.to_string().contains("Invalid coordinates"));
    }

    #[test]
    fn every_category_has_message_and_icon() {
        for category in ClothingCategory::all() {
            assert!(!category.message().is_empty());
            assert!(!category.icon_name().is_empty());
        }
    }

    #[test]
    fn observation_deserializes_with_missing_condition() {
        let obs: WeatherObservation =
            serde_json::from_str(r#"{"temperature_c": 12.5}"#).expect("minimal json must parse");

        assert_eq!(obs.condition, "");
        assert_eq!(obs.temperature_c, 12.5);
        assert!(obs.wind_speed_mps.is_none());
    }

    #[test]
    fn observation_requires_temperature() {
        let err = serde_json::from_str::<WeatherObservation>(r#"{"condition": "clear"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("temperature_c"));
    }

    #[test]
    fn new_sets_only_required_fields() {
        let obs = WeatherObservation::new(-3.5, "Snow");

        assert_eq!(obs.temperature_c, -3.5);
        assert_eq!(obs.condition, "Snow");
        assert!(obs.feels_like_c.is_none());
        assert!(obs.humidity_pct.is_none());
        assert!(obs.location.is_none());
        assert!(obs.observed_at.is_none());
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&ClothingCategory::HotSun).unwrap();
        assert_eq!(json, "\"hot_sun\"");
    }
}
