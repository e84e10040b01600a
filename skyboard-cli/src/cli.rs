use std::fmt;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use skyboard_core::{
    Config, Coordinates, Dashboard, DashboardView, ErrorKind, FallbackReason, Geolocator,
    IpGeolocator, Location, OpenWeatherClient, Origin, Snapshot, UnitSystem, WeatherError,
    locate::Disabled, provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyboard", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Unit system for this run; overrides the configured one.
    #[arg(long, global = true, value_enum)]
    pub units: Option<UnitsArg>,

    /// Print the dashboard as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city and units.
    Configure,

    /// Show weather for a city, coordinates, or (with neither) the detected location.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: Option<String>,

        #[arg(long, requires = "lon", conflicts_with = "city", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", conflicts_with = "city", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Show weather for the detected location, without falling back.
    Here,

    /// Search for a place by name and show the chosen candidate.
    Search {
        query: String,

        /// Take the best match instead of prompting.
        #[arg(long)]
        first: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for UnitSystem {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Metric => UnitSystem::Metric,
            UnitsArg::Imperial => UnitSystem::Imperial,
        }
    }
}

/// Search candidate as shown in the selection prompt.
struct Candidate(Location);

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.label())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        tracing::debug!(
            units = %config.units,
            default_city = %config.default_city,
            detect_location = config.detect_location,
            "loaded configuration"
        );
        let dashboard = self.dashboard(&config);

        let snapshot = match &self.command {
            Command::Configure => return configure(&mut config),
            Command::Show { city: Some(city), .. } => {
                dashboard?.load_city(city).await.map_err(|e| user_error(e, Some(city.as_str())))?
            }
            Command::Show { lat: Some(lat), lon: Some(lon), .. } => dashboard?
                .load_coordinates(Coordinates { lat: *lat, lon: *lon })
                .await
                .map_err(|e| user_error(e, None))?,
            Command::Show { .. } => startup(&dashboard?, &config).await?,
            Command::Here => dashboard?
                .my_location(geolocator(&config).as_ref())
                .await
                .map_err(|e| user_error(e, None))?,
            Command::Search { query, first } => {
                let dashboard = dashboard?;
                let location = pick_location(&dashboard, query, *first).await?;
                dashboard
                    .load_location(&location)
                    .await
                    .map_err(|e| user_error(e, Some(location.name.as_str())))?
            }
        };

        self.print(&snapshot)
    }

    fn dashboard(&self, config: &Config) -> anyhow::Result<Dashboard<OpenWeatherClient>> {
        let provider = provider_from_config(config)?;
        let dashboard = Dashboard::from_config(provider, config);

        Ok(match self.units {
            Some(units) => dashboard.with_units(units.into()),
            None => dashboard,
        })
    }

    fn print(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let view = DashboardView::build(snapshot, Utc::now());
        if self.json {
            let json = serde_json::to_string_pretty(&view).context("Failed to serialize view")?;
            println!("{json}");
        } else {
            print!("{}", render::dashboard(&view).context("Failed to render dashboard")?);
        }
        Ok(())
    }
}

fn geolocator(config: &Config) -> Box<dyn Geolocator> {
    if config.detect_location { Box::new(IpGeolocator::default()) } else { Box::new(Disabled) }
}

async fn startup(
    dashboard: &Dashboard<OpenWeatherClient>,
    config: &Config,
) -> anyhow::Result<Snapshot> {
    let loaded = dashboard
        .startup(geolocator(config).as_ref())
        .await
        .map_err(|e| user_error(e, Some(dashboard.fallback_city())))?;

    if let Origin::Fallback(reason) = &loaded.origin {
        let why = match reason {
            FallbackReason::Geolocation(outcome) => outcome.to_string(),
            FallbackReason::LoadFailed(err) => user_message(err, None),
        };
        eprintln!("Could not use your location ({why}); showing {}.", dashboard.fallback_city());
    }

    Ok(loaded.snapshot)
}

async fn pick_location(
    dashboard: &Dashboard<OpenWeatherClient>,
    query: &str,
    first: bool,
) -> anyhow::Result<Location> {
    let mut candidates = dashboard.search(query).await.map_err(|e| user_error(e, Some(query)))?;

    if first || candidates.len() == 1 {
        return Ok(candidates.remove(0));
    }

    tracing::debug!(query, candidates = candidates.len(), "prompting for a location");
    let options = candidates.into_iter().map(Candidate).collect();
    let chosen = Select::new("Select a location:", options)
        .prompt()
        .context("Location selection was cancelled")?;

    Ok(chosen.0)
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let mut key_prompt = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation();
    if config.is_configured() {
        key_prompt = key_prompt.with_help_message("Leave blank to keep the current key");
    }
    let api_key = key_prompt.prompt().context("Failed to read API key")?;

    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;

    let current = match config.units {
        UnitSystem::Metric => 0,
        UnitSystem::Imperial => 1,
    };
    let units = Select::new("Units:", vec![UnitSystem::Metric, UnitSystem::Imperial])
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read units")?;

    apply_answers(config, &api_key, &default_city, units);
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Blank answers keep what is already configured.
fn apply_answers(config: &mut Config, api_key: &str, default_city: &str, units: UnitSystem) {
    let api_key = api_key.trim();
    if !api_key.is_empty() {
        config.set_api_key(api_key.to_string());
    }

    let default_city = default_city.trim();
    if !default_city.is_empty() {
        config.default_city = default_city.to_string();
    }

    config.units = units;
}

/// Message shown for a failed action, by error kind.
fn user_message(err: &WeatherError, subject: Option<&str>) -> String {
    match (err.kind(), subject) {
        (ErrorKind::NotFound, Some(subject)) => format!("Location not found: {subject}"),
        (ErrorKind::NotFound, None) => "Location not found".to_string(),
        (ErrorKind::EmptyResult, _) => {
            "Location not found. Please try a different city name.".to_string()
        }
        (ErrorKind::NetworkOrParseFailure, Some(subject)) => {
            format!("Failed to fetch weather data for {subject}")
        }
        (ErrorKind::NetworkOrParseFailure, None) => "Failed to fetch weather data".to_string(),
    }
}

fn user_error(err: WeatherError, subject: Option<&str>) -> anyhow::Error {
    let message = user_message(&err, subject);
    anyhow::Error::new(err).context(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use skyboard_core::GeolocationOutcome;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_coordinates_parse() {
        let cli = Cli::try_parse_from(["skyboard", "show", "--lat", "-33.86", "--lon", "151.2"])
            .expect("parse");
        match cli.command {
            Command::Show { city: None, lat: Some(lat), lon: Some(lon) } => {
                assert_eq!(lat, -33.86);
                assert_eq!(lon, 151.2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["skyboard", "show", "--lat", "1.0"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["skyboard", "search", "Paris", "--units", "imperial", "--json"])
            .expect("parse");
        assert_eq!(cli.units, Some(UnitsArg::Imperial));
        assert!(cli.json);
    }

    #[test]
    fn blank_key_keeps_the_saved_one() {
        let mut config = Config::default();
        config.set_api_key("SAVED_KEY".into());

        apply_answers(&mut config, "   ", "Oslo", UnitSystem::Imperial);
        assert_eq!(config.api_key(), Some("SAVED_KEY"));
        assert_eq!(config.default_city, "Oslo");
        assert_eq!(config.units, UnitSystem::Imperial);

        apply_answers(&mut config, " NEW_KEY ", "", UnitSystem::Metric);
        assert_eq!(config.api_key(), Some("NEW_KEY"));
        assert_eq!(config.default_city, "Oslo");
    }

    #[test]
    fn messages_by_kind() {
        let empty = WeatherError::EmptyResult { query: "zz".into() };
        assert_eq!(
            user_message(&empty, Some("zz")),
            "Location not found. Please try a different city name."
        );

        let geo = WeatherError::Geolocation(GeolocationOutcome::Denied);
        assert_eq!(user_message(&geo, None), "Failed to fetch weather data");

        let none = WeatherError::NoPlace { query: "coordinates: 0, 0".into() };
        assert_eq!(user_message(&none, None), "Location not found");
    }

    #[test]
    fn user_error_keeps_cause_chain() {
        let err = user_error(WeatherError::EmptyResult { query: "zz".into() }, None);
        assert_eq!(err.to_string(), "Location not found. Please try a different city name.");
        assert_eq!(err.root_cause().to_string(), "no locations match 'zz'");
    }
}
