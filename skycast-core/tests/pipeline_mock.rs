//! End-to-end pipeline tests against a mock HTTP server.

use serde_json::json;
use skycast_core::{
    Coordinate, Location, WeatherError, fetch_report,
    provider::{nws::NwsProvider, openweather::OpenWeatherProvider},
    render,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "TESTKEY";

fn owm_current_body() -> serde_json::Value {
    json!({
        "coord": { "lat": 40.71, "lon": -74.01 },
        "name": "New York",
        "sys": { "country": "US" },
        "main": { "temp": 300.0, "feels_like": 299.0 },
        "weather": [
            { "main": "Clear", "description": "clear sky", "icon": "01d" }
        ]
    })
}

fn owm_onecall_body(with_alert: bool) -> serde_json::Value {
    let mut body = json!({
        "daily": [
            {
                "dt": 1623067200i64,
                "temp": { "max": 301.0, "min": 290.0 },
                "weather": [
                    { "main": "Rain", "description": "light rain", "icon": "10d" }
                ]
            },
            {
                "dt": 1623153600i64,
                "temp": { "max": 299.0, "min": 289.0 },
                "weather": [
                    { "main": "Clear", "description": "clear sky", "icon": "01d" }
                ]
            }
        ]
    });

    if with_alert {
        body["alerts"] = json!([
            { "description": "Flood Watch in effect*WHAT...Flooding possible.*WHERE...Low areas." }
        ]);
    }

    body
}

async fn mount_owm(server: &MockServer, with_alert: bool) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "New York"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(owm_current_body()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/onecall"))
        .and(query_param("lat", "40.71"))
        .and(query_param("lon", "-74.01"))
        .and(query_param("exclude", "minutely,hourly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(owm_onecall_body(with_alert)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn city_search_resolves_and_renders_fahrenheit() {
    let server = MockServer::start().await;
    mount_owm(&server, false).await;

    let owm = OpenWeatherProvider::with_base_url(API_KEY.to_string(), server.uri());
    let location = Location::City("New York".to_string());

    let report = fetch_report(&owm, &owm, &location)
        .await
        .expect("pipeline should succeed");

    // 300 K displays as 80 F.
    assert_eq!(report.conditions.temperature_f(), 80);
    assert_eq!(report.conditions.place_name, "New York");
    assert_eq!(report.periods.len(), 2);
    assert!(!report.has_alerts());

    let html = render::render_dashboard(&report);
    assert!(html.contains("80&deg;F"));
    assert!(html.contains("No active weather alerts"));
    assert!(!html.contains("Weather Warnings"));
}

#[tokio::test]
async fn alerts_in_the_forecast_payload_reach_the_report() {
    let server = MockServer::start().await;
    mount_owm(&server, true).await;

    let owm = OpenWeatherProvider::with_base_url(API_KEY.to_string(), server.uri());
    let location = Location::City("New York".to_string());

    let report = fetch_report(&owm, &owm, &location)
        .await
        .expect("pipeline should succeed");

    assert!(report.has_alerts());
    assert_eq!(report.alerts[0].headline, "Flood Watch in effect");
    assert_eq!(report.alerts[0].details.len(), 2);

    let html = render::render_dashboard(&report);
    assert!(html.contains("Weather Warnings"));
    assert!(html.contains("<strong>Flood Watch in effect</strong>"));
}

#[tokio::test]
async fn unknown_city_aborts_with_location_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({
                "cod": "404", "message": "city not found"
            })),
        )
        .mount(&server)
        .await;

    let owm = OpenWeatherProvider::with_base_url(API_KEY.to_string(), server.uri());
    let location = Location::City("Atlantis".to_string());

    let err = fetch_report(&owm, &owm, &location)
        .await
        .expect_err("pipeline must abort");

    assert!(matches!(
        err,
        WeatherError::LocationNotFound { ref query } if query == "Atlantis"
    ));
}

#[tokio::test]
async fn coordinate_path_fetches_nws_forecast_and_alerts() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/points/40.7100,-74.0100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {
                "forecast": format!("{base}/forecast"),
                "forecastHourly": format!("{base}/hourly"),
                "relativeLocation": {
                    "properties": { "city": "New York", "state": "NY" }
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {
                "periods": [
                    {
                        "name": "This Afternoon",
                        "startTime": "2021-06-07T12:00:00-04:00",
                        "isDaytime": true,
                        "temperature": 80,
                        "temperatureUnit": "F",
                        "icon": format!("{base}/icons/land/day/few"),
                        "shortForecast": "Sunny",
                        "detailedForecast": "Sunny, with a high near 80."
                    },
                    {
                        "name": "Tonight",
                        "startTime": "2021-06-07T18:00:00-04:00",
                        "isDaytime": false,
                        "temperature": 62,
                        "temperatureUnit": "F",
                        "icon": format!("{base}/icons/land/night/few"),
                        "shortForecast": "Mostly Clear",
                        "detailedForecast": "Mostly clear, with a low around 62."
                    }
                ]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hourly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {
                "periods": [
                    {
                        "name": "",
                        "startTime": "2021-06-07T12:00:00-04:00",
                        "isDaytime": true,
                        "temperature": 78,
                        "temperatureUnit": "F",
                        "icon": format!("{base}/icons/land/day/few"),
                        "shortForecast": "Sunny",
                        "detailedForecast": ""
                    }
                ]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/alerts/active"))
        .and(query_param("point", "40.7100,-74.0100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
        .mount(&server)
        .await;

    let resolver = OpenWeatherProvider::with_base_url(API_KEY.to_string(), base.clone());
    let nws = NwsProvider::with_base_url(None, base.clone());
    let location = Location::Point(Coordinate {
        latitude: 40.71,
        longitude: -74.01,
    });

    let report = fetch_report(&resolver, &nws, &location)
        .await
        .expect("pipeline should succeed");

    assert_eq!(report.conditions.temperature_f(), 78);
    assert_eq!(report.conditions.place_name, "New York, NY");
    assert_eq!(report.periods.len(), 1);
    assert_eq!(report.periods[0].high_f(), 80);
    assert_eq!(report.periods[0].low_f(), 62);
    assert!(!report.has_alerts());

    let html = render::render_dashboard(&report);
    assert!(html.contains("Sunny, with a high near 80."));
    assert!(html.contains("No active weather alerts"));
}
