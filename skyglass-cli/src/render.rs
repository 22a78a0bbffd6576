use skyglass_core::{CurrentConditions, ForecastDay, HistoryEntry, LookupState};
use std::fmt::Write;

/// Render the published state as terminal text.
pub fn state(state: &LookupState) -> String {
    match state {
        LookupState::Idle => "No location yet. Search for a city to get started.".to_string(),
        LookupState::Loading => "Loading...".to_string(),
        LookupState::Failed(kind) => format!("{kind}"),
        LookupState::Ready { current, forecast } => {
            let mut out = conditions(current);
            if !forecast.is_empty() {
                out.push('\n');
                out.push_str(&forecast_days(forecast));
            }
            out
        }
    }
}

fn conditions(current: &CurrentConditions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", current.name);
    let _ = writeln!(
        out,
        "  {} ({})",
        current.category.label(),
        current.description
    );
    let _ = writeln!(out, "  {:.1}°C", current.temperature_c);
    let _ = writeln!(
        out,
        "  humidity {}%   wind {:.1} m/s",
        current.humidity_pct, current.wind_speed_mps
    );
    out
}

fn forecast_days(days: &[ForecastDay]) -> String {
    let mut out = String::new();
    for day in days {
        let _ = writeln!(
            out,
            "  {}  {:>6.1}°C  [{}]",
            day.timestamp.format("%a"),
            day.temperature_c,
            day.icon
        );
    }
    out
}

pub fn history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No recent searches.".to_string();
    }

    let mut out = String::from("Recent searches:\n");
    for (idx, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "  {}. {entry}", idx + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use skyglass_core::{ConditionCategory, ErrorKind};

    fn paris() -> CurrentConditions {
        CurrentConditions {
            name: "Paris".into(),
            category: ConditionCategory::Rain,
            description: "light rain".into(),
            icon: "10d".into(),
            temperature_c: 12.34,
            humidity_pct: 80,
            wind_speed_mps: 3.0,
        }
    }

    #[test]
    fn renders_ready_state_with_weekday() {
        // 2024-05-01 was a Wednesday.
        let day = ForecastDay {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
            icon: "10d".into(),
            temperature_c: 14.0,
        };

        let text = state(&LookupState::Ready {
            current: paris(),
            forecast: vec![day],
        });

        assert!(text.starts_with("Paris\n"));
        assert!(text.contains("Rain (light rain)"));
        assert!(text.contains("12.3°C"));
        assert!(text.contains("humidity 80%"));
        assert!(text.contains("Wed"));
    }

    #[test]
    fn ready_without_forecast_omits_section() {
        let text = state(&LookupState::Ready {
            current: paris(),
            forecast: Vec::new(),
        });
        assert!(!text.contains('['));
    }

    #[test]
    fn renders_failure_message() {
        let text = state(&LookupState::Failed(ErrorKind::LocationNotFound));
        assert_eq!(text, "City not found");
    }

    #[test]
    fn renders_history_list() {
        assert_eq!(history(&[]), "No recent searches.");
        let text = history(&["Paris".to_string(), "Tokyo".to_string()]);
        assert!(text.contains("1. Paris"));
        assert!(text.contains("2. Tokyo"));
    }
}
