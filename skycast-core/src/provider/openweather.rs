//! OpenWeatherMap client.
//!
//! Doubles as the location resolver: the current-weather endpoint accepts a
//! free-text city and echoes the coordinate back, so the city path gets
//! resolution and conditions out of a single call. The one-call endpoint
//! supplies the daily forecast and carries alerts in the same payload.

use async_trait::async_trait;
use chrono::{Local, Timelike};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    alert::parse_alert_description,
    error::WeatherError,
    model::{ConditionsSnapshot, Coordinate, ForecastBundle, ForecastPeriod, day_label},
    provider::http_client,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const ONECALL_PATH: &str = "/data/2.5/onecall";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different host. Used by tests to hit a mock
    /// server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: http_client(),
        }
    }

    /// Resolve a free-text city name to a coordinate, returning the current
    /// conditions from the same response. A non-success status means the city
    /// is unknown; the pipeline aborts without retrying.
    pub async fn resolve_city(
        &self,
        city: &str,
    ) -> Result<(Coordinate, ConditionsSnapshot), WeatherError> {
        let result: Result<OwCurrentResponse, WeatherError> = self
            .get_json(
                CURRENT_PATH,
                &[("q", city.to_string()), ("appid", self.api_key.clone())],
                "OpenWeather current",
            )
            .await;

        let parsed = match result {
            Ok(parsed) => parsed,
            Err(WeatherError::UnexpectedStatus { status, .. }) => {
                tracing::warn!(%status, city, "city lookup failed");
                return Err(WeatherError::LocationNotFound {
                    query: city.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        let coord = Coordinate {
            latitude: parsed.coord.lat,
            longitude: parsed.coord.lon,
        };

        Ok((coord, snapshot_from_current(parsed)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        endpoint: &'static str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, endpoint, "issuing request");

        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, endpoint, "non-success status");
            return Err(WeatherError::unexpected_status(endpoint, status, &body));
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Parse { endpoint, source })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(
        &self,
        coord: Coordinate,
    ) -> Result<ConditionsSnapshot, WeatherError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                CURRENT_PATH,
                &[
                    ("lat", coord.latitude.to_string()),
                    ("lon", coord.longitude.to_string()),
                    ("appid", self.api_key.clone()),
                ],
                "OpenWeather current",
            )
            .await?;

        Ok(snapshot_from_current(parsed))
    }

    async fn forecast(&self, coord: Coordinate) -> Result<ForecastBundle, WeatherError> {
        let parsed: OwOneCallResponse = self
            .get_json(
                ONECALL_PATH,
                &[
                    ("lat", coord.latitude.to_string()),
                    ("lon", coord.longitude.to_string()),
                    ("exclude", "minutely,hourly".to_string()),
                    ("appid", self.api_key.clone()),
                ],
                "OpenWeather onecall",
            )
            .await?;

        let periods = periods_from_daily(&parsed.daily, Local::now().hour());
        let alerts = parsed
            .alerts
            .iter()
            .map(|alert| parse_alert_description(&alert.description))
            .collect();

        Ok(ForecastBundle { periods, alerts })
    }
}

/// Shape the one-call `daily[]` array into labeled forecast periods.
/// `local_hour` feeds the index-0 Overnight/Today decision.
fn periods_from_daily(daily: &[OwDailyEntry], local_hour: u32) -> Vec<ForecastPeriod> {
    daily
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let (icon, summary) = entry
                .weather
                .first()
                .map(|w| (w.icon.clone(), w.description.clone()))
                .unwrap_or_default();

            ForecastPeriod {
                label: day_label(index, entry.dt, local_hour),
                icon,
                summary,
                detailed_summary: String::new(),
                high_k: entry.temp.max,
                low_k: entry.temp.min,
            }
        })
        .collect()
}

fn snapshot_from_current(parsed: OwCurrentResponse) -> ConditionsSnapshot {
    let (icon, summary) = parsed
        .weather
        .first()
        .map(|w| (w.icon.clone(), w.main.clone()))
        .unwrap_or_default();

    ConditionsSnapshot {
        temperature_k: parsed.main.temp,
        feels_like_k: parsed.main.feels_like,
        icon,
        summary,
        place_name: parsed.name,
        country_code: parsed.sys.country,
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    max: f64,
    min: f64,
}

#[derive(Debug, Deserialize)]
struct OwDailyEntry {
    dt: i64,
    temp: OwDailyTemp,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwAlert {
    description: String,
}

/// A missing `alerts` key deserializes to an empty list: no active warnings.
#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    #[serde(default)]
    daily: Vec<OwDailyEntry>,
    #[serde(default)]
    alerts: Vec<OwAlert>,
}
