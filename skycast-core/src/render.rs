//! Presentation layer: pure view-model to HTML-string functions.
//!
//! Nothing in this module performs I/O or mutates shared state; callers hand
//! in an immutable [`WeatherReport`] and receive markup. All user- and
//! provider-supplied text passes through [`escape_html`].

use crate::model::{AlertRecord, ConditionsSnapshot, ForecastPeriod, WeatherReport};

const ICON_URL_PREFIX: &str = "https://openweathermap.org/img/wn/";
const ICON_URL_SUFFIX: &str = "@4x.png";

/// Replaces dangerous characters with equivalent HTML entities for safe
/// display. `&` must be replaced first so it does not re-escape the others.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Uppercase the first letter of a string.
pub fn capitalize_first_letter(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Uppercase the first letter of every word, for displaying place names.
pub fn capitalize_words(input: &str) -> String {
    input
        .split_whitespace()
        .map(capitalize_first_letter)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a condition icon to a full image URL. OpenWeatherMap supplies bare
/// codes like `"10d"`; NWS supplies complete URLs which pass through as-is.
pub fn icon_url(icon: &str) -> String {
    if icon.starts_with("http://") || icon.starts_with("https://") {
        icon.to_string()
    } else {
        format!("{ICON_URL_PREFIX}{icon}{ICON_URL_SUFFIX}")
    }
}

fn weather_image(icon: &str, description: &str) -> String {
    format!(
        r#"<img class="current-weather-image" src="{}" alt="{}"/>"#,
        escape_html(&icon_url(icon)),
        escape_html(description),
    )
}

/// The "right now" fragment: condition image plus a one-line summary.
pub fn render_current_conditions(conditions: &ConditionsSnapshot) -> String {
    let image = weather_image(&conditions.icon, &conditions.summary);
    format!(
        "{image}\n<p>Right now in {}, {} it's {}&deg;F and feels like {}&deg;F</p>",
        escape_html(&capitalize_words(&conditions.place_name)),
        escape_html(&conditions.country_code),
        conditions.temperature_f(),
        conditions.feels_like_f(),
    )
}

/// One card per forecast period.
pub fn render_forecast(periods: &[ForecastPeriod]) -> String {
    let cards: Vec<String> = periods.iter().map(render_forecast_card).collect();
    format!(
        "<div class=\"forecast-container\">\n{}\n</div>",
        cards.join("\n")
    )
}

fn render_forecast_card(period: &ForecastPeriod) -> String {
    let body = if period.detailed_summary.is_empty() {
        format!(
            "{}, with a high of {}&deg;F and a low of {}&deg;F",
            escape_html(&capitalize_first_letter(&period.summary)),
            period.high_f(),
            period.low_f(),
        )
    } else {
        escape_html(&period.detailed_summary)
    };

    format!(
        "<div class=\"card\">\n{}\n<h5 class=\"card-title\">{}</h5>\n<p class=\"card-text\">{body}</p>\n</div>",
        weather_image(&period.icon, &period.summary),
        escape_html(&period.label),
    )
}

/// The warning surface. An empty alert sequence renders the "no active
/// alerts" state instead of an empty container.
pub fn render_alerts(alerts: &[AlertRecord]) -> String {
    if alerts.is_empty() {
        return "<p class=\"no-alerts\">No active weather alerts</p>".to_string();
    }

    let rendered: Vec<String> = alerts.iter().map(render_alert).collect();
    format!(
        "<div class=\"weather-warnings\">\n<h2>Weather Warnings</h2>\n{}\n</div>",
        rendered.join("\n")
    )
}

fn render_alert(alert: &AlertRecord) -> String {
    let mut fragment = format!(
        "<div class=\"alert alert-warning\" role=\"alert\">\n<p><strong>{}</strong></p>",
        escape_html(&alert.headline)
    );

    if !alert.details.is_empty() {
        let items: Vec<String> = alert
            .details
            .iter()
            .map(|detail| format!("<li>{}</li>", escape_html(detail)))
            .collect();
        fragment.push_str(&format!("\n<ul>{}</ul>", items.join("")));
    }

    fragment.push_str("\n</div>");
    fragment
}

/// The whole dashboard: current conditions, multi-day forecast, warnings.
pub fn render_dashboard(report: &WeatherReport) -> String {
    format!(
        "<section id=\"current-weather\">\n{}\n</section>\n<section id=\"multi-day-forecast\">\n{}\n</section>\n<section id=\"weather-warnings\">\n{}\n</section>",
        render_current_conditions(&report.conditions),
        render_forecast(&report.periods),
        render_alerts(&report.alerts),
    )
}
