//! Mapping of raw OpenWeather payloads into [`CurrentConditions`] and
//! [`ForecastDay`] records. Pure functions, no I/O.

use chrono::{NaiveDateTime, Timelike};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::ErrorKind,
    model::{ConditionCategory, CurrentConditions, ForecastDay},
};

/// Format of the provider's `dt_txt` field.
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    weather: Vec<OwWeather>,
    main: OwForecastMain,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn parse<T: serde::de::DeserializeOwned>(raw: Value, what: &str) -> Result<T, ErrorKind> {
    serde_json::from_value(raw).map_err(|err| {
        tracing::debug!("Malformed {what} payload: {err}");
        ErrorKind::MalformedResponse
    })
}

/// Shape a current-conditions payload.
pub fn normalize_current(raw: Value) -> Result<CurrentConditions, ErrorKind> {
    let parsed: OwCurrentResponse = parse(raw, "current conditions")?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or(ErrorKind::MalformedResponse)?;

    let humidity_pct = u8::try_from(parsed.main.humidity)
        .ok()
        .filter(|h| *h <= 100)
        .ok_or(ErrorKind::MalformedResponse)?;

    if parsed.name.trim().is_empty() {
        return Err(ErrorKind::MalformedResponse);
    }

    if !parsed.wind.speed.is_finite() || parsed.wind.speed < 0.0 {
        return Err(ErrorKind::MalformedResponse);
    }

    Ok(CurrentConditions {
        name: parsed.name,
        category: ConditionCategory::classify(&weather.main),
        description: weather.description,
        icon: weather.icon,
        temperature_c: parsed.main.temp,
        humidity_pct,
        wind_speed_mps: parsed.wind.speed,
    })
}

/// Keep exactly the 12:00:00 samples of a 3-hourly forecast list.
///
/// A list without noon samples yields an empty forecast, not an error.
pub fn normalize_forecast(raw: Value) -> Result<Vec<ForecastDay>, ErrorKind> {
    let parsed: OwForecastResponse = parse(raw, "forecast")?;

    let mut days = Vec::new();
    for entry in parsed.list {
        let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIME_FORMAT)
            .map_err(|err| {
                tracing::debug!("Bad forecast timestamp {:?}: {err}", entry.dt_txt);
                ErrorKind::MalformedResponse
            })?;

        if !is_noon(&timestamp) {
            continue;
        }

        let icon = entry
            .weather
            .into_iter()
            .next()
            .map(|w| w.icon)
            .unwrap_or_default();

        days.push(ForecastDay {
            timestamp,
            icon,
            temperature_c: entry.main.temp,
        });
    }

    Ok(days)
}

fn is_noon(ts: &NaiveDateTime) -> bool {
    ts.hour() == 12 && ts.minute() == 0 && ts.second() == 0
}
