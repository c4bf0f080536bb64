//! National Weather Service client.
//!
//! The NWS API is URL-driven: `/points/{lat},{lon}` hands back the forecast
//! and hourly-forecast URLs to follow. Unlike OpenWeatherMap, alerts live on
//! a separate endpoint and need their own call. Coordinates are limited to
//! four decimal places, which the API would otherwise redirect to.

use async_trait::async_trait;
use chrono::{DateTime, Local, Timelike};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    alert::parse_alert_description,
    error::WeatherError,
    model::{
        AlertRecord, ConditionsSnapshot, Coordinate, ForecastBundle, ForecastPeriod,
        celsius_to_kelvin, day_label, fahrenheit_to_kelvin,
    },
    provider::http_client_with_user_agent,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

/// api.weather.gov rejects requests without an identifying User-Agent.
const DEFAULT_USER_AGENT: &str = "skycast/0.1 (weather dashboard)";

#[derive(Debug, Clone)]
pub struct NwsProvider {
    base_url: String,
    http: Client,
}

impl NwsProvider {
    pub fn new(user_agent: Option<String>) -> Self {
        Self::with_base_url(user_agent, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different host. Used by tests to hit a mock
    /// server.
    pub fn with_base_url(user_agent: Option<String>, base_url: String) -> Self {
        let user_agent = user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        Self {
            base_url,
            http: http_client_with_user_agent(&user_agent),
        }
    }

    /// One lookup per invocation; the point metadata is never cached.
    async fn lookup_point(&self, coord: Coordinate) -> Result<NwsPointProperties, WeatherError> {
        let url = format!(
            "{}/points/{:.4},{:.4}",
            self.base_url, coord.latitude, coord.longitude
        );
        let parsed: NwsPointsResponse = self.get_json(&url, "NWS points").await?;
        Ok(parsed.properties)
    }

    async fn fetch_periods(
        &self,
        url: &str,
        endpoint: &'static str,
    ) -> Result<Vec<NwsPeriod>, WeatherError> {
        let parsed: NwsForecastResponse = self.get_json(url, endpoint).await?;
        Ok(parsed.properties.periods)
    }

    async fn fetch_alerts(&self, coord: Coordinate) -> Result<Vec<AlertRecord>, WeatherError> {
        let url = format!(
            "{}/alerts/active?point={:.4},{:.4}",
            self.base_url, coord.latitude, coord.longitude
        );
        let parsed: NwsAlertsResponse = self.get_json(&url, "NWS alerts").await?;

        Ok(parsed
            .features
            .into_iter()
            .map(|feature| alert_from_properties(feature.properties))
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        endpoint: &'static str,
    ) -> Result<T, WeatherError> {
        tracing::debug!(%url, endpoint, "issuing request");

        let res = self.http.get(url).send().await?;

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
impl WeatherProvider for NwsProvider {
    /// "Right now" comes from the first hourly forecast period; NWS has no
    /// dedicated current-conditions call for a bare coordinate.
    async fn current_conditions(
        &self,
        coord: Coordinate,
    ) -> Result<ConditionsSnapshot, WeatherError> {
        let point = self.lookup_point(coord).await?;
        let periods = self
            .fetch_periods(&point.forecast_hourly, "NWS hourly forecast")
            .await?;

        let now = periods.first().ok_or(WeatherError::MissingData {
            endpoint: "NWS hourly forecast",
            what: "periods",
        })?;

        let temperature_k = to_kelvin(now.temperature, &now.temperature_unit);
        let (place_name, country_code) = point
            .relative_location
            .map(|loc| {
                (
                    format!("{}, {}", loc.properties.city, loc.properties.state),
                    "US".to_string(),
                )
            })
            .unwrap_or_default();

        Ok(ConditionsSnapshot {
            temperature_k,
            // The hourly feed carries no apparent-temperature field.
            feels_like_k: temperature_k,
            icon: now.icon.clone(),
            summary: now.short_forecast.clone(),
            place_name,
            country_code,
        })
    }

    async fn forecast(&self, coord: Coordinate) -> Result<ForecastBundle, WeatherError> {
        let point = self.lookup_point(coord).await?;

        let (periods, alerts) = tokio::try_join!(
            self.fetch_periods(&point.forecast, "NWS forecast"),
            self.fetch_alerts(coord),
        )?;

        Ok(ForecastBundle {
            periods: fold_daily(&periods, Local::now().hour()),
            alerts,
        })
    }
}

/// Fold NWS day/night half-periods into one entry per day so both providers
/// emit the same daily shape: the daytime period supplies the high, summary
/// and icon; the following night supplies the low. A leading night-only
/// period (forecast requested in the evening) stands on its own.
fn fold_daily(periods: &[NwsPeriod], local_hour: u32) -> Vec<ForecastPeriod> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < periods.len() {
        let period = &periods[i];
        let epoch = parse_start_time(&period.start_time);
        let high_k = to_kelvin(period.temperature, &period.temperature_unit);

        let night = if period.is_daytime {
            periods.get(i + 1).filter(|next| !next.is_daytime)
        } else {
            None
        };
        let low_k = night
            .map(|n| to_kelvin(n.temperature, &n.temperature_unit))
            .unwrap_or(high_k);

        out.push(ForecastPeriod {
            label: day_label(out.len(), epoch, local_hour),
            icon: period.icon.clone(),
            summary: period.short_forecast.clone(),
            detailed_summary: period.detailed_forecast.clone(),
            high_k,
            low_k,
        });

        i += if night.is_some() { 2 } else { 1 };
    }

    out
}

fn alert_from_properties(props: NwsAlertProperties) -> AlertRecord {
    let mut record = parse_alert_description(&props.description);
    // Descriptions often open straight into the `* WHAT...` sections; fall
    // back to the structured headline field.
    if record.headline.is_empty() {
        if let Some(headline) = props.headline {
            record.headline = headline;
        }
    }
    record
}

fn to_kelvin(temperature: f64, unit: &str) -> f64 {
    if unit.eq_ignore_ascii_case("c") {
        celsius_to_kelvin(temperature)
    } else {
        fahrenheit_to_kelvin(temperature)
    }
}

fn parse_start_time(start_time: &str) -> i64 {
    DateTime::parse_from_rfc3339(start_time)
        .map(|dt| dt.timestamp())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct NwsPointsResponse {
    properties: NwsPointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsPointProperties {
    forecast: String,
    forecast_hourly: String,
    relative_location: Option<NwsRelativeLocation>,
}

#[derive(Debug, Deserialize)]
struct NwsRelativeLocation {
    properties: NwsRelativeLocationProperties,
}

#[derive(Debug, Deserialize)]
struct NwsRelativeLocationProperties {
    city: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct NwsForecastResponse {
    properties: NwsForecastProperties,
}

#[derive(Debug, Deserialize)]
struct NwsForecastProperties {
    periods: Vec<NwsPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsPeriod {
    start_time: String,
    is_daytime: bool,
    temperature: f64,
    temperature_unit: String,
    icon: String,
    short_forecast: String,
    detailed_forecast: String,
}

#[derive(Debug, Deserialize)]
struct NwsAlertsResponse {
    #[serde(default)]
    features: Vec<NwsAlertFeature>,
}

#[derive(Debug, Deserialize)]
struct NwsAlertFeature {
    properties: NwsAlertProperties,
}

#[derive(Debug, Deserialize)]
struct NwsAlertProperties {
    #[serde(default)]
    headline: Option<String>,
    description: String,
}
