use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, CurrentWeather, Forecast, Location, UnitSystem},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::{self, Debug};

pub mod openweather;

/// What to ask the upstream API about.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Query parameters identifying the place (`q=` or `lat=&lon=`).
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(city) => vec![("q", city.clone())],
            LocationQuery::Coordinates(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(city) => f.write_str(city),
            LocationQuery::Coordinates(c) => write!(f, "coordinates: {}, {}", c.lat, c.lon),
        }
    }
}

/// Upstream weather and geocoding API.
///
/// Every call is a single round trip: no retries, no caching.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentWeather, WeatherError>;

    async fn forecast(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<Forecast, WeatherError>;

    /// Candidates for a free-text place name, best match first.
    async fn geocode(&self, query: &str) -> Result<Vec<Location>, WeatherError>;

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<Location>, WeatherError>;
}

/// Construct the OpenWeather client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skyboard configure` and enter your API key."
        )
    })?;

    let mut client = OpenWeatherClient::new(api_key.to_owned());
    if let Some(url) = &config.openweather.base_url {
        client = client.with_base_url(url.clone());
    }
    if let Some(url) = &config.openweather.geo_url {
        client = client.with_geo_url(url.clone());
    }

    Ok(client)
}
