use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// A place name as it appears in the search history.
pub type HistoryEntry = String;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// What a lookup is asked to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationKey {
    Name(String),
    Coords(Coordinates),
}

impl LocationKey {
    /// Build a name key from raw user input, trimming surrounding whitespace.
    pub fn name(raw: &str) -> Result<Self, ErrorKind> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ErrorKind::ValidationError);
        }
        Ok(LocationKey::Name(trimmed.to_string()))
    }

    pub fn coords(latitude: f64, longitude: f64) -> Self {
        LocationKey::Coords(Coordinates {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationKey::Name(name) => f.write_str(name),
            LocationKey::Coords(c) => write!(f, "{:.4},{:.4}", c.latitude, c.longitude),
        }
    }
}

/// Coarse weather category used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    #[default]
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
}

/// Keywords in evaluation order; the first one contained in the text wins.
///
/// "thunder" sits ahead of "rain" so that "thunderstorm with heavy rain" is a
/// thunderstorm.
const CATEGORY_KEYWORDS: &[(&str, ConditionCategory)] = &[
    ("clear", ConditionCategory::Clear),
    ("cloud", ConditionCategory::Clouds),
    ("thunder", ConditionCategory::Thunderstorm),
    ("rain", ConditionCategory::Rain),
    ("snow", ConditionCategory::Snow),
    ("mist", ConditionCategory::Fog),
    ("fog", ConditionCategory::Fog),
];

impl ConditionCategory {
    /// Case-insensitive keyword classification. Unknown text is `Clear`.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
        }
    }
}

/// Current conditions at a resolved place. Replaced wholesale on each lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Place name as normalized by the provider.
    pub name: String,
    pub category: ConditionCategory,
    pub description: String,
    /// Provider icon id, e.g. "10d".
    pub icon: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

/// One representative (noon) sample per forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub timestamp: NaiveDateTime,
    pub icon: String,
    pub temperature_c: f64,
}

/// The snapshot the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Loading,
    Ready {
        current: CurrentConditions,
        forecast: Vec<ForecastDay>,
    },
    Failed(ErrorKind),
}

impl LookupState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading)
    }
}
