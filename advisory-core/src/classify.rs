//! Advisory classification.
//!
//! Maps a [`WeatherObservation`] to a clothing suggestion and do/don't tips.
//! Everything here is table driven: each table is evaluated top to bottom and
//! the first matching entry wins.
//!
//! The clothing fallback bands (0/10/20/28) and the tip bands (0/10/20/30)
//! have different break points. Both are observable and kept as they are.

use tracing::debug;

use crate::{
    error::ClassifyError,
    model::{AdvisoryResult, ClothingCategory, ClothingSuggestion, WeatherObservation},
};

/// Predicate over the lowercased condition text and the temperature in °C.
pub type Predicate = fn(&str, f64) -> bool;

#[derive(Debug, Clone, Copy)]
pub struct ClothingRule {
    pub applies: Predicate,
    pub category: ClothingCategory,
}

/// Clothing rules in priority order. Condition keywords come first, then the
/// temperature bands; the final entry always matches.
pub const CLOTHING_RULES: &[ClothingRule] = &[
    ClothingRule { applies: |c, _| c.contains("snow"), category: ClothingCategory::Snow },
    ClothingRule { applies: |c, _| c.contains("rain"), category: ClothingCategory::Rain },
    ClothingRule { applies: |c, _| c.contains("cloud"), category: ClothingCategory::Cloudy },
    ClothingRule { applies: |c, t| is_sunny(c) && t > 30.0, category: ClothingCategory::HotSun },
    ClothingRule { applies: |c, t| is_sunny(c) && t > 20.0, category: ClothingCategory::MildSun },
    // clear/sunny at 20 °C or below carries no information, fall back to temperature
    ClothingRule { applies: |_, t| t < 0.0, category: ClothingCategory::Freezing },
    ClothingRule { applies: |_, t| t < 10.0, category: ClothingCategory::Cold },
    ClothingRule { applies: |_, t| t < 20.0, category: ClothingCategory::Cool },
    ClothingRule { applies: |_, t| t < 28.0, category: ClothingCategory::Mild },
    ClothingRule { applies: |_, _| true, category: ClothingCategory::Hot },
];

fn is_sunny(condition: &str) -> bool {
    condition.contains("clear") || condition.contains("sun")
}

/// Tips for temperatures below `below` (exclusive upper bound).
#[derive(Debug, Clone, Copy)]
pub struct TipBand {
    pub below: f64,
    pub dos: &'static [&'static str],
    pub donts: &'static [&'static str],
}

pub const TIP_BANDS: &[TipBand] = &[
    TipBand {
        below: 0.0,
        dos: &["Wear a heavy coat, gloves, and a scarf.", "Stay indoors if possible."],
        donts: &["Avoid staying outside for long periods."],
    },
    TipBand {
        below: 10.0,
        dos: &["Dress warmly with layers."],
        donts: &["Don’t forget to cover your ears and hands."],
    },
    TipBand {
        below: 20.0,
        dos: &["Carry a light jacket or sweater."],
        donts: &["Avoid going out without a jacket in the evening."],
    },
    TipBand {
        below: 30.0,
        dos: &["Perfect for outdoor walks — enjoy the weather!"],
        donts: &["Don’t forget to stay hydrated."],
    },
    TipBand {
        below: f64::INFINITY,
        dos: &["Drink plenty of water and stay in shade."],
        donts: &["Avoid heavy outdoor activity in midday heat."],
    },
];

/// Extra tips appended when the condition text mentions `keyword`.
#[derive(Debug, Clone, Copy)]
pub struct ConditionTips {
    pub keyword: &'static str,
    pub dos: &'static [&'static str],
    pub donts: &'static [&'static str],
}

pub const CONDITION_TIPS: &[ConditionTips] = &[
    ConditionTips {
        keyword: "rain",
        dos: &["Carry an umbrella or wear a raincoat."],
        donts: &["Avoid leaving electronics uncovered."],
    },
    ConditionTips {
        keyword: "snow",
        dos: &["Wear boots with good grip."],
        donts: &["Avoid driving if roads are icy."],
    },
];

/// Derive the advisory for one observation.
///
/// Fails only when a numeric field is unusable (see [`validate`]). Any finite
/// temperature, however extreme, produces a result.
pub fn classify(observation: &WeatherObservation) -> Result<AdvisoryResult, ClassifyError> {
    validate(observation)?;

    let condition = observation.condition.to_lowercase();
    let temperature = observation.temperature_c;

    let category = clothing_category(&condition, temperature);
    let band = tip_band(temperature);

    let mut do_tips: Vec<String> = band.dos.iter().map(|s| s.to_string()).collect();
    let mut dont_tips: Vec<String> = band.donts.iter().map(|s| s.to_string()).collect();

    for extra in CONDITION_TIPS.iter().filter(|t| condition.contains(t.keyword)) {
        do_tips.extend(extra.dos.iter().map(|s| s.to_string()));
        dont_tips.extend(extra.donts.iter().map(|s| s.to_string()));
    }

    debug!(
        temperature,
        condition = %condition,
        %category,
        do_tips = do_tips.len(),
        dont_tips = dont_tips.len(),
        "classified observation"
    );

    Ok(AdvisoryResult { clothing: ClothingSuggestion::from(category), do_tips, dont_tips })
}

/// `condition` must already be lowercased.
pub fn clothing_category(condition: &str, temperature_c: f64) -> ClothingCategory {
    CLOTHING_RULES
        .iter()
        .find(|rule| (rule.applies)(condition, temperature_c))
        .map(|rule| rule.category)
        .unwrap_or(ClothingCategory::Hot)
}

pub fn tip_band(temperature_c: f64) -> &'static TipBand {
    let last = &TIP_BANDS[TIP_BANDS.len() - 1];
    TIP_BANDS.iter().find(|band| temperature_c < band.below).unwrap_or(last)
}

/// Check the numeric fields of an observation.
///
/// The temperature must be finite. Optional fields are checked only when
/// present: wind speed is metres per second and cannot be negative, humidity
/// is a percentage.
pub fn validate(observation: &WeatherObservation) -> Result<(), ClassifyError> {
    finite("temperature_c", observation.temperature_c)?;

    let optional = [
        ("feels_like_c", observation.feels_like_c),
        ("temperature_min_c", observation.temperature_min_c),
        ("temperature_max_c", observation.temperature_max_c),
        ("humidity_pct", observation.humidity_pct),
        ("wind_speed_mps", observation.wind_speed_mps),
    ];
    for (field, value) in optional.into_iter().filter_map(|(f, v)| v.map(|v| (f, v))) {
        finite(field, value)?;
    }

    if let Some(speed) = observation.wind_speed_mps.filter(|s| *s < 0.0) {
        return Err(ClassifyError::invalid(
            "wind_speed_mps",
            format!("is {speed}, expected a non-negative speed in m/s"),
        ));
    }

    if let Some(humidity) = observation.humidity_pct.filter(|h| !(0.0..=100.0).contains(h)) {
        return Err(ClassifyError::invalid(
            "humidity_pct",
            format!("is {humidity}, expected a percentage between 0 and 100"),
        ));
    }

    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), ClassifyError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ClassifyError::invalid(field, format!("is {value}, expected a finite number")))
    }
}
