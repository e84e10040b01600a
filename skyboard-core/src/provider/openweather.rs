use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::WeatherError,
    model::{
        Condition, Coordinates, CurrentWeather, Forecast, ForecastCity, Location, PartOfDay,
        UnitSystem, WeatherSample,
    },
};

use super::{LocationQuery, WeatherProvider};

pub const DATA_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

const GEOCODE_LIMIT: &str = "5";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
    base_url: String,
    geo_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: DATA_URL.to_string(),
            geo_url: GEO_URL.to_string(),
        }
    }

    /// Override the `/data/2.5` root, e.g. for a mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the `/geo/1.0` root.
    pub fn with_geo_url(mut self, url: impl Into<String>) -> Self {
        self.geo_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<(StatusCode, Result<T, String>), WeatherError> {
        tracing::debug!(endpoint, url = %url, "sending OpenWeather request");
        params.push(("appid", self.api_key.clone()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| WeatherError::Network { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Network { endpoint, source })?;

        if !status.is_success() {
            tracing::debug!(endpoint, %status, "OpenWeather request failed");
            return Ok((status, Err(truncate_body(&body))));
        }

        let parsed = serde_json::from_str(&body)
            .map_err(|source| WeatherError::Parse { endpoint, source })?;

        Ok((status, Ok(parsed)))
    }

    /// Weather endpoints: any non-2xx means the place was not found.
    async fn get_weather<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<T, WeatherError> {
        let mut params = query.params();
        params.push(("units", units.as_param().to_string()));

        let url = format!("{}/{}", self.base_url, endpoint);
        match self.get(endpoint, url, params).await? {
            (_, Ok(parsed)) => Ok(parsed),
            (status, Err(_)) => Err(WeatherError::NotFound {
                endpoint,
                query: query.to_string(),
                status,
            }),
        }
    }

    async fn get_geo(
        &self,
        endpoint: &'static str,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<Vec<Location>, WeatherError> {
        let url = format!("{}/{}", self.geo_url, path);
        match self.get::<Vec<OwGeocode>>(endpoint, url, params).await? {
            (_, Ok(parsed)) => Ok(parsed.into_iter().map(Location::from).collect()),
            (status, Err(body)) => Err(WeatherError::Status { endpoint, status, body }),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentWeather, WeatherError> {
        let parsed: OwCurrentResponse = self.get_weather("weather", query, units).await?;
        parsed.into_domain()
    }

    async fn forecast(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<Forecast, WeatherError> {
        let parsed: OwForecastResponse = self.get_weather("forecast", query, units).await?;
        parsed.into_domain()
    }

    async fn geocode(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let params = vec![("q", query.to_string()), ("limit", GEOCODE_LIMIT.to_string())];
        let locations = self.get_geo("geocoding", "direct", params).await?;
        tracing::debug!(query, candidates = locations.len(), "geocoded");
        Ok(locations)
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<Location>, WeatherError> {
        let params = vec![
            ("lat", at.lat.to_string()),
            ("lon", at.lon.to_string()),
            ("limit", "1".to_string()),
        ];
        let locations = self.get_geo("reverse geocoding", "reverse", params).await?;
        Ok(locations.into_iter().next())
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

impl From<OwCoord> for Coordinates {
    fn from(c: OwCoord) -> Self {
        Coordinates { lat: c.lat, lon: c.lon }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u16,
    main: String,
    description: String,
    icon: String,
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Condition { code: w.id, main: w.main, description: w.description, icon: w.icon }
    }
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
    gust: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    weather: Vec<OwWeather>,
    main: OwMain,
    visibility: Option<u32>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    dt: i64,
    sys: OwSys,
    timezone: i64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwPod {
    pod: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    #[serde(default)]
    clouds: OwClouds,
    wind: OwWind,
    visibility: Option<u32>,
    pop: Option<f64>,
    sys: Option<OwPod>,
    dt_txt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    coord: OwCoord,
    #[serde(default)]
    country: String,
    timezone: i64,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeocode {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: String,
    state: Option<String>,
}

impl From<OwGeocode> for Location {
    fn from(g: OwGeocode) -> Self {
        Location {
            name: g.name,
            country: g.country,
            state: g.state,
            latitude: g.lat,
            longitude: g.lon,
        }
    }
}

/// Upstream fields shared by current and forecast samples.
struct SampleParts {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
    visibility: Option<u32>,
}

impl SampleParts {
    fn into_sample(self, endpoint: &'static str) -> Result<WeatherSample, WeatherError> {
        let mut conditions = self.weather.into_iter().map(Condition::from);
        let condition = conditions
            .next()
            .ok_or(WeatherError::MissingCondition { endpoint })?;

        Ok(WeatherSample {
            timestamp: self.dt,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_direction: self.wind.deg,
            wind_gust: self.wind.gust,
            cloud_cover: self.clouds.all,
            visibility: self.visibility,
            condition,
            extra_conditions: conditions.collect(),
            text_timestamp: None,
            precipitation_probability: None,
            part_of_day: None,
        })
    }
}

impl OwCurrentResponse {
    fn into_domain(self) -> Result<CurrentWeather, WeatherError> {
        let sample = SampleParts {
            dt: self.dt,
            main: self.main,
            weather: self.weather,
            wind: self.wind,
            clouds: self.clouds,
            visibility: self.visibility,
        }
        .into_sample("weather")?;

        Ok(CurrentWeather {
            name: self.name,
            country: self.sys.country,
            coordinates: self.coord.into(),
            sample,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            utc_offset: self.timezone,
        })
    }
}

impl OwForecastResponse {
    fn into_domain(self) -> Result<Forecast, WeatherError> {
        let samples = self
            .list
            .into_iter()
            .map(|entry| -> Result<WeatherSample, WeatherError> {
                let part_of_day = entry.sys.and_then(|sys| match sys.pod.as_str() {
                    "d" => Some(PartOfDay::Day),
                    "n" => Some(PartOfDay::Night),
                    _ => None,
                });
                let mut sample = SampleParts {
                    dt: entry.dt,
                    main: entry.main,
                    weather: entry.weather,
                    wind: entry.wind,
                    clouds: entry.clouds,
                    visibility: entry.visibility,
                }
                .into_sample("forecast")?;

                sample.text_timestamp = entry.dt_txt;
                sample.precipitation_probability = entry.pop;
                sample.part_of_day = part_of_day;
                Ok(sample)
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        let city = ForecastCity {
            name: self.city.name,
            country: self.city.country,
            coordinates: self.city.coord.into(),
            utc_offset: self.city.timezone,
            sunrise: self.city.sunrise,
            sunset: self.city.sunset,
        };

        Ok(Forecast { city, samples })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
