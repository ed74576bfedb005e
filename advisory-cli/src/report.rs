use std::fmt;

use advisory_core::{
    AdvisoryResult, MapView, WeatherObservation,
    map::{ATTRIBUTION, TileCoord},
    provider::openweather::icon_url,
};
use chrono::Local;
use serde::Serialize;

/// Rounds half up, so -2.5 shows as -2°.
fn format_temp(celsius: f64) -> String {
    format!("{}°", (celsius + 0.5).floor() as i64)
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text report for the terminal.
pub struct Report<'a> {
    pub observation: &'a WeatherObservation,
    pub advisory: &'a AdvisoryResult,
    pub map: Option<MapView>,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obs = self.observation;

        if let Some(location) = &obs.location {
            match &location.region {
                Some(region) => writeln!(f, "{}, {}", location.name, region)?,
                None => writeln!(f, "{}", location.name)?,
            }
            if let Some(country) = &location.country {
                writeln!(f, "{country}")?;
            }
        }
        if let Some(observed_at) = obs.observed_at {
            let local = observed_at.with_timezone(&Local);
            writeln!(f, "Observed {}", local.format("%Y-%m-%d %H:%M (UTC%:z)"))?;
        }

        write!(f, "{}", format_temp(obs.temperature_c))?;
        if let Some(feels_like) = obs.feels_like_c {
            write!(f, "  feels like {}", format_temp(feels_like))?;
        }
        if let (Some(min), Some(max)) = (obs.temperature_min_c, obs.temperature_max_c) {
            write!(f, "  ↓{} ↑{}", format_temp(min), format_temp(max))?;
        }
        writeln!(f)?;

        let condition = obs.description.as_deref().unwrap_or(&obs.condition);
        if !condition.is_empty() {
            writeln!(f, "{}", capitalize_words(condition))?;
        }
        if let Some(humidity) = obs.humidity_pct {
            writeln!(f, "Humidity:   {humidity}%")?;
        }
        if let Some(wind) = obs.wind_speed_mps {
            writeln!(f, "Wind speed: {wind} m/s")?;
        }

        writeln!(f)?;
        writeln!(f, "Clothing suggestion")?;
        writeln!(f, "  {}", self.advisory.clothing.message)?;

        writeln!(f)?;
        writeln!(f, "Do’s")?;
        for tip in &self.advisory.do_tips {
            writeln!(f, "  ✅ {tip}")?;
        }
        writeln!(f, "Don’ts")?;
        for tip in &self.advisory.dont_tips {
            writeln!(f, "  ❌ {tip}")?;
        }

        if obs.icon_code.is_some() || self.map.is_some() {
            writeln!(f)?;
        }
        if let Some(code) = &obs.icon_code {
            writeln!(f, "Icon: {}", icon_url(code))?;
        }
        if let Some(map) = &self.map {
            writeln!(f, "Map:  {}", map.browse_url())?;
            write!(f, "      {} ({ATTRIBUTION})", map.tile_url())?;
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct JsonMap {
    pub view: MapView,
    pub tile: TileCoord,
    pub tile_url: String,
    pub browse_url: String,
    pub attribution: &'static str,
}

/// `--json` output.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub observation: &'a WeatherObservation,
    pub advisory: &'a AdvisoryResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<JsonMap>,
}

impl<'a> JsonReport<'a> {
    pub fn new(
        observation: &'a WeatherObservation,
        advisory: &'a AdvisoryResult,
        map: Option<MapView>,
    ) -> Self {
        Self {
            observation,
            advisory,
            icon_url: observation.icon_code.as_deref().map(icon_url),
            map: map.map(|view| JsonMap {
                view,
                tile: view.tile(),
                tile_url: view.tile_url(),
                browse_url: view.browse_url(),
                attribution: ATTRIBUTION,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisory_core::{Coordinates, LocationLabel, classify};

    #[test]
    fn temperatures_round_half_up() {
        assert_eq!(format_temp(21.4), "21°");
        assert_eq!(format_temp(21.5), "22°");
        assert_eq!(format_temp(-2.5), "-2°");
        assert_eq!(format_temp(-2.6), "-3°");
        assert_eq!(format_temp(-0.2), "0°");
    }

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize_words("light rain"), "Light Rain");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn renders_full_report() {
        let observation = WeatherObservation {
            feels_like_c: Some(30.2),
            temperature_min_c: Some(28.0),
            temperature_max_c: Some(34.6),
            humidity_pct: Some(40.0),
            wind_speed_mps: Some(2.5),
            description: Some("clear sky".into()),
            icon_code: Some("01d".into()),
            location: Some(LocationLabel {
                name: "Seville".into(),
                region: Some("Andalusia".into()),
                country: Some("ES".into()),
            }),
            ..WeatherObservation::new(32.0, "Clear")
        };
        let advisory = classify(&observation).unwrap();
        let map = MapView::new(Coordinates::new(37.39, -5.98).unwrap(), 10);

        let text =
            Report { observation: &observation, advisory: &advisory, map: Some(map) }.to_string();

        assert!(text.starts_with("Seville, Andalusia\nES\n"));
        assert!(text.contains("32°  feels like 30°  ↓28° ↑35°"));
        assert!(text.contains("Clear Sky"));
        assert!(text.contains("Humidity:   40%"));
        assert!(text.contains("Wind speed: 2.5 m/s"));
        assert!(text.contains("😎 Sunny & hot"));
        assert!(text.contains("✅ Drink plenty of water and stay in shade."));
        assert!(text.contains("❌ Avoid heavy outdoor activity in midday heat."));
        assert!(text.contains("https://openweathermap.org/img/wn/01d@4x.png"));
        assert!(text.contains("https://www.openstreetmap.org/?mlat=37.3900"));
        assert!(text.ends_with("(© OpenStreetMap contributors)"));
    }

    #[test]
    fn renders_minimal_report() {
        let observation = WeatherObservation::new(5.0, "");
        let advisory = classify(&observation).unwrap();

        let text = Report { observation: &observation, advisory: &advisory, map: None }.to_string();

        assert!(text.starts_with("5°\n\nClothing suggestion\n"));
        assert!(!text.contains("Map:"));
        assert!(!text.contains("Icon:"));
    }

    #[test]
    fn json_report_includes_map_and_icon() {
        let observation = WeatherObservation {
            icon_code: Some("10n".into()),
            ..WeatherObservation::new(12.0, "light rain")
        };
        let advisory = classify(&observation).unwrap();
        let map = MapView::new(Coordinates::new(52.52, 13.405).unwrap(), 10);

        let value = serde_json::to_value(JsonReport::new(&observation, &advisory, Some(map)))
            .unwrap();

        assert_eq!(value["advisory"]["clothing"]["category"], "rain");
        assert_eq!(value["icon_url"], "https://openweathermap.org/img/wn/10n@4x.png");
        assert_eq!(value["map"]["tile"]["x"], 550);
        assert_eq!(value["map"]["tile_url"], "https://tile.openstreetmap.org/10/550/335.png");
    }

    #[test]
    fn json_report_omits_absent_map() {
        let observation = WeatherObservation::new(12.0, "");
        let advisory = classify(&observation).unwrap();

        let value = serde_json::to_value(JsonReport::new(&observation, &advisory, None)).unwrap();

        assert!(value.get("map").is_none());
        assert!(value.get("icon_url").is_none());
    }
}
