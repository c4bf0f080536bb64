use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair identifying a location. Immutable once produced
/// by the location resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// What the user gave us: a free-text city name, or a trusted coordinate pair
/// (the stand-in for the browser geolocation path).
#[derive(Debug, Clone)]
pub enum Location {
    City(String),
    Point(Coordinate),
}

/// Current, instantaneous weather for a location.
///
/// Temperatures are stored in Kelvin regardless of provider; display
/// conversion happens at the presentation edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionsSnapshot {
    pub temperature_k: f64,
    pub feels_like_k: f64,
    /// Provider icon code (OpenWeatherMap) or full icon URL (NWS).
    pub icon: String,
    pub summary: String,
    pub place_name: String,
    pub country_code: String,
}

impl ConditionsSnapshot {
    pub fn temperature_f(&self) -> i64 {
        kelvin_to_fahrenheit_rounded(self.temperature_k)
    }

    pub fn feels_like_f(&self) -> i64 {
        kelvin_to_fahrenheit_rounded(self.feels_like_k)
    }
}

/// One day of projected weather. Sequences are ordered oldest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPeriod {
    /// "Today", "Tomorrow", "Overnight", or a weekday name.
    pub label: String,
    pub icon: String,
    pub summary: String,
    /// Long-form forecast text. Empty for providers that only supply a short
    /// description; the renderer falls back to `summary` plus temperatures.
    pub detailed_summary: String,
    pub high_k: f64,
    pub low_k: f64,
}

impl ForecastPeriod {
    pub fn high_f(&self) -> i64 {
        kelvin_to_fahrenheit_rounded(self.high_k)
    }

    pub fn low_f(&self) -> i64 {
        kelvin_to_fahrenheit_rounded(self.low_k)
    }
}

/// A weather warning reduced to a headline plus bulleted details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub headline: String,
    pub details: Vec<String>,
}

/// What one forecast fetch yields: the period sequence and whatever alerts
/// the provider returned along the way.
#[derive(Debug, Clone, Default)]
pub struct ForecastBundle {
    pub periods: Vec<ForecastPeriod>,
    pub alerts: Vec<AlertRecord>,
}

/// The immutable view model one render cycle consumes. Nothing here outlives
/// the cycle and nothing is persisted.
#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub conditions: ConditionsSnapshot,
    pub periods: Vec<ForecastPeriod>,
    pub alerts: Vec<AlertRecord>,
}

impl WeatherReport {
    /// Drives the hide-warnings signal: when false, the warning surface must
    /// not be rendered at all.
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}

/// Kelvin to rounded Fahrenheit, the only display conversion the dashboard
/// performs.
pub fn kelvin_to_fahrenheit_rounded(kelvin: f64) -> i64 {
    ((kelvin - 273.15) * 1.8 + 32.0).round() as i64
}

/// Inverse conversion for providers that report Fahrenheit natively.
pub fn fahrenheit_to_kelvin(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) / 1.8 + 273.15
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

/// Label for a forecast period.
///
/// Index 0 depends on the local clock: late evening or very early morning
/// means the first period covers the coming night, so it reads "Overnight"
/// instead of "Today". Index 1 is always "Tomorrow"; anything later is the
/// weekday name of the period's timestamp.
///
/// `local_hour` is passed in (0-23) so callers and tests control the clock.
pub fn day_label(index: usize, epoch_secs: i64, local_hour: u32) -> String {
    match index {
        0 => {
            if local_hour > 18 || local_hour < 4 {
                "Overnight".to_string()
            } else {
                "Today".to_string()
            }
        }
        1 => "Tomorrow".to_string(),
        _ => weekday_name(epoch_secs),
    }
}

fn weekday_name(epoch_secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.format("%A").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_freezing_point_is_32_f() {
        assert_eq!(kelvin_to_fahrenheit_rounded(273.15), 32);
    }

    #[test]
    fn kelvin_boiling_point_is_212_f() {
        assert_eq!(kelvin_to_fahrenheit_rounded(373.15), 212);
    }

    #[test]
    fn kelvin_conversion_rounds_to_nearest_integer() {
        // 300 K is 80.33 F
        assert_eq!(kelvin_to_fahrenheit_rounded(300.0), 80);
        // 300.5 K is 81.23 F
        assert_eq!(kelvin_to_fahrenheit_rounded(300.5), 81);
    }

    #[test]
    fn fahrenheit_to_kelvin_inverts_the_conversion() {
        let k = fahrenheit_to_kelvin(80.0);
        assert_eq!(kelvin_to_fahrenheit_rounded(k), 80);
    }

    #[test]
    fn celsius_to_kelvin_offsets_by_273_15() {
        assert_eq!(kelvin_to_fahrenheit_rounded(celsius_to_kelvin(0.0)), 32);
        assert_eq!(kelvin_to_fahrenheit_rounded(celsius_to_kelvin(100.0)), 212);
    }

    #[test]
    fn first_period_is_overnight_late_in_the_evening() {
        assert_eq!(day_label(0, 0, 20), "Overnight");
        assert_eq!(day_label(0, 0, 23), "Overnight");
        assert_eq!(day_label(0, 0, 3), "Overnight");
    }

    #[test]
    fn first_period_is_today_during_the_day() {
        assert_eq!(day_label(0, 0, 10), "Today");
        assert_eq!(day_label(0, 0, 4), "Today");
        assert_eq!(day_label(0, 0, 18), "Today");
    }

    #[test]
    fn second_period_is_tomorrow_regardless_of_clock() {
        assert_eq!(day_label(1, 0, 20), "Tomorrow");
        assert_eq!(day_label(1, 0, 10), "Tomorrow");
    }

    #[test]
    fn later_periods_use_the_weekday_of_the_timestamp() {
        // 2021-06-07 12:00:00 UTC was a Monday.
        assert_eq!(day_label(2, 1623067200, 10), "Monday");
        // One day later, a Tuesday.
        assert_eq!(day_label(3, 1623067200 + 86_400, 10), "Tuesday");
    }

    #[test]
    fn report_without_alerts_signals_hidden_warnings() {
        let report = WeatherReport {
            conditions: ConditionsSnapshot {
                temperature_k: 300.0,
                feels_like_k: 300.0,
                icon: "01d".to_string(),
                summary: "Clear".to_string(),
                place_name: "New York".to_string(),
                country_code: "US".to_string(),
            },
            periods: Vec::new(),
            alerts: Vec::new(),
        };
        assert!(!report.has_alerts());
    }
}
