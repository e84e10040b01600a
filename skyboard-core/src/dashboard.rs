//! Fetch orchestration behind every user action: search, select, unit toggle,
//! "my location" and the initial load.

use std::collections::BTreeMap;

use crate::{
    config::{Config, DEFAULT_CITY, resolve_alias},
    error::WeatherError,
    locate::{GeolocationOutcome, Geolocator},
    model::{Coordinates, CurrentWeather, Forecast, Location, UnitSystem},
    provider::{LocationQuery, WeatherProvider},
};

/// Current conditions and forecast fetched together for one place.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub current: CurrentWeather,
    pub forecast: Forecast,
    pub units: UnitSystem,
}

#[derive(Debug)]
pub enum FallbackReason {
    /// Geolocation did not produce a position.
    Geolocation(GeolocationOutcome),
    /// A position was found but loading its weather failed.
    LoadFailed(WeatherError),
}

#[derive(Debug)]
pub enum Origin {
    Geolocated,
    Fallback(FallbackReason),
}

/// Outcome of the initial load.
#[derive(Debug)]
pub struct Loaded {
    pub snapshot: Snapshot,
    pub origin: Origin,
}

#[derive(Debug, Clone)]
pub struct Dashboard<P> {
    provider: P,
    units: UnitSystem,
    fallback_city: String,
    aliases: BTreeMap<String, String>,
}

impl<P: WeatherProvider> Dashboard<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            units: UnitSystem::default(),
            fallback_city: DEFAULT_CITY.to_string(),
            aliases: BTreeMap::new(),
        }
    }

    pub fn from_config(provider: P, config: &Config) -> Self {
        Self {
            provider,
            units: config.units,
            fallback_city: config.default_city.clone(),
            aliases: config.aliases.clone(),
        }
    }

    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    pub fn with_fallback_city(mut self, city: impl Into<String>) -> Self {
        self.fallback_city = city.into();
        self
    }

    pub fn fallback_city(&self) -> &str {
        &self.fallback_city
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current weather and forecast, issued together; both must succeed.
    async fn fetch(&self, query: &LocationQuery) -> Result<Snapshot, WeatherError> {
        let (current, forecast) = tokio::try_join!(
            self.provider.current(query, self.units),
            self.provider.forecast(query, self.units),
        )?;

        Ok(Snapshot { current, forecast, units: self.units })
    }

    pub async fn load_city(&self, city: &str) -> Result<Snapshot, WeatherError> {
        tracing::debug!(city, units = %self.units, "loading weather by city");
        self.fetch(&LocationQuery::City(city.to_string())).await
    }

    /// Reverse-geocodes first; the place name shown comes from that lookup.
    pub async fn load_coordinates(&self, at: Coordinates) -> Result<Snapshot, WeatherError> {
        tracing::debug!(lat = at.lat, lon = at.lon, units = %self.units, "loading weather by coordinates");
        let query = LocationQuery::Coordinates(at);

        let place = self
            .provider
            .reverse_geocode(at)
            .await?
            .ok_or_else(|| WeatherError::NoPlace { query: query.to_string() })?;

        let mut snapshot = self.fetch(&query).await?;
        snapshot.current.name = resolve_alias(&self.aliases, &place.name).to_string();

        tracing::info!(name = %snapshot.current.name, "loaded weather");
        Ok(snapshot)
    }

    /// A search candidate was picked.
    pub async fn load_location(&self, location: &Location) -> Result<Snapshot, WeatherError> {
        self.load_coordinates(location.coordinates()).await
    }

    /// Geocoding candidates in upstream order.
    pub async fn search(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::EmptyResult { query: String::new() });
        }

        let candidates = self.provider.geocode(query).await?;
        if candidates.is_empty() {
            return Err(WeatherError::EmptyResult { query: query.to_string() });
        }

        Ok(candidates)
    }

    /// Re-fetch the place of `snapshot` in this dashboard's unit system.
    pub async fn reload(&self, snapshot: &Snapshot) -> Result<Snapshot, WeatherError> {
        self.load_coordinates(snapshot.current.coordinates).await
    }

    /// Initial load: the detected position if possible, else the fallback city.
    pub async fn startup(&self, geolocator: &dyn Geolocator) -> Result<Loaded, WeatherError> {
        let reason = match geolocator.locate().await {
            GeolocationOutcome::Located(at) => match self.load_coordinates(at).await {
                Ok(snapshot) => {
                    return Ok(Loaded { snapshot, origin: Origin::Geolocated });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to load detected location");
                    FallbackReason::LoadFailed(err)
                }
            },
            outcome => {
                tracing::warn!(%outcome, "location unavailable");
                FallbackReason::Geolocation(outcome)
            }
        };

        tracing::warn!(city = %self.fallback_city, "falling back to default city");
        let snapshot = self.load_city(&self.fallback_city).await?;

        Ok(Loaded { snapshot, origin: Origin::Fallback(reason) })
    }

    /// "My location": no fallback, every failed lookup is an error.
    pub async fn my_location(&self, geolocator: &dyn Geolocator) -> Result<Snapshot, WeatherError> {
        match geolocator.locate().await {
            GeolocationOutcome::Located(at) => self.load_coordinates(at).await,
            outcome => Err(WeatherError::Geolocation(outcome)),
        }
    }
}
