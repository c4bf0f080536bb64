//! The fetch pipeline: location resolution, then conditions and forecast,
//! then alert shaping, producing one immutable [`WeatherReport`].
//!
//! All data is local to a single invocation. Failures abort the cycle and
//! surface to the caller; nothing is retried and nothing is cached.

use crate::{
    error::WeatherError,
    model::{Location, WeatherReport},
    provider::{WeatherProvider, openweather::OpenWeatherProvider},
};

/// Run one render cycle's worth of fetching.
///
/// The city path resolves through OpenWeatherMap, whose lookup response
/// already carries current conditions, so resolution costs no extra call;
/// the forecast then goes to `provider` (which may be a different service).
/// The coordinate path trusts its input and fetches conditions and forecast
/// from `provider` concurrently.
pub async fn fetch_report(
    resolver: &OpenWeatherProvider,
    provider: &dyn WeatherProvider,
    location: &Location,
) -> Result<WeatherReport, WeatherError> {
    match location {
        Location::City(city) => {
            let (coord, conditions) = resolver.resolve_city(city).await?;
            let bundle = provider.forecast(coord).await?;

            Ok(WeatherReport {
                conditions,
                periods: bundle.periods,
                alerts: bundle.alerts,
            })
        }
        Location::Point(coord) => {
            let (conditions, bundle) = tokio::try_join!(
                provider.current_conditions(*coord),
                provider.forecast(*coord),
            )?;

            Ok(WeatherReport {
                conditions,
                periods: bundle.periods,
                alerts: bundle.alerts,
            })
        }
    }
}
