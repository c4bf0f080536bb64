use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use skycast_core::{
    Config, Coordinate, Location, ProviderId, WeatherReport, fetch_report,
    provider::{
        default_provider_from_config, openweather::OpenWeatherProvider, provider_from_config,
    },
    render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "nws".
        provider: String,
    },

    /// Show current conditions, forecast, and active weather alerts.
    Show {
        /// City name to look up. Omit when passing --lat/--lon.
        city: Option<String>,

        /// Latitude, for the coordinate path (requires --lon).
        #[arg(long, requires = "lon")]
        lat: Option<f64>,

        /// Longitude, for the coordinate path (requires --lat).
        #[arg(long, requires = "lat")]
        lon: Option<f64>,

        /// Forecast provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        /// Write the dashboard as HTML to this file instead of printing text.
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show {
                city,
                lat,
                lon,
                provider,
                html,
            } => show(city, lat, lon, provider, html).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut cfg = Config::load()?;

    if cfg.has_provider(id) {
        let stored = match cfg.provider_config(id) {
            Some(entry) if entry.api_key.is_some() => "an API key",
            Some(entry) if entry.user_agent.is_some() => "a User-Agent",
            _ => "settings",
        };
        println!("Provider '{id}' already has {stored} configured; new values replace the old ones.");
    }

    if id.requires_api_key() {
        let api_key = inquire::Password::new("API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        cfg.upsert_provider_api_key(id, api_key);
    } else {
        let user_agent = inquire::Text::new("User-Agent (leave blank for the default):")
            .prompt()
            .context("Failed to read User-Agent")?;
        let user_agent = (!user_agent.trim().is_empty()).then(|| user_agent.trim().to_string());
        cfg.upsert_provider_user_agent(id, user_agent);
    }

    cfg.save()?;
    println!("Saved configuration for provider '{id}'.");
    Ok(())
}

async fn show(
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    provider: Option<String>,
    html: Option<PathBuf>,
) -> anyhow::Result<()> {
    let cfg = Config::load()?;

    let location = match (city, lat, lon) {
        (Some(city), None, None) => Location::City(city),
        (None, Some(latitude), Some(longitude)) => Location::Point(Coordinate {
            latitude,
            longitude,
        }),
        _ => bail!("Provide either a CITY argument or both --lat and --lon."),
    };

    let provider = match provider {
        Some(name) => provider_from_config(ProviderId::try_from(name.as_str())?, &cfg)?,
        None => default_provider_from_config(&cfg)?,
    };

    // City lookups always go through OpenWeatherMap, even when the forecast
    // comes from NWS. The coordinate path never touches the resolver, so a
    // missing key only matters for city searches.
    let resolver_key = cfg.provider_api_key(ProviderId::OpenWeather);
    if resolver_key.is_none() && matches!(location, Location::City(_)) {
        bail!(
            "No OpenWeatherMap API key configured (needed for city lookups).\n\
             Hint: run `skycast configure openweather` first, or pass --lat/--lon."
        );
    }
    let resolver = OpenWeatherProvider::new(resolver_key.unwrap_or_default().to_owned());

    let report = fetch_report(&resolver, provider.as_ref(), &location).await?;

    match html {
        Some(path) => {
            fs::write(&path, render::render_dashboard(&report))
                .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
            println!("Wrote dashboard to {}", path.display());
        }
        None => print!("{}", format_report(&report, Local::now())),
    }

    Ok(())
}

/// Text rendition of one report, stamped with the generation time.
fn format_report(report: &WeatherReport, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();

    let conditions = &report.conditions;
    out.push_str(&format!(
        "Report generated {}\n",
        generated_at.format("%Y-%m-%d %H:%M")
    ));
    out.push_str(&format!(
        "Right now in {}, {} it's {}°F and feels like {}°F ({})\n",
        render::capitalize_words(&conditions.place_name),
        conditions.country_code,
        conditions.temperature_f(),
        conditions.feels_like_f(),
        conditions.summary,
    ));

    if !report.periods.is_empty() {
        out.push_str("\nForecast:\n");
        for period in &report.periods {
            out.push_str(&format!(
                "  {}: {} (high {}°F / low {}°F)\n",
                period.label,
                render::capitalize_first_letter(&period.summary),
                period.high_f(),
                period.low_f(),
            ));
        }
    }

    out.push('\n');
    if report.has_alerts() {
        out.push_str("Weather warnings:\n");
        for alert in &report.alerts {
            out.push_str(&format!("  ! {}\n", alert.headline));
            for detail in &alert.details {
                out.push_str(&format!("      * {detail}\n"));
            }
        }
    } else {
        out.push_str("No active weather alerts.\n");
    }

    out
}
