use serde::{Deserialize, Serialize};

use crate::daylight;

/// Unit system requested from the upstream API.
///
/// Temperatures and wind speeds arrive already expressed in this system;
/// nothing in this crate converts between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Literal value of the `units` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// Anything that is not exactly `"metric"` is treated as imperial.
    pub fn from_param(value: &str) -> Self {
        if value == "metric" { UnitSystem::Metric } else { UnitSystem::Imperial }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn wind_speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of the upstream `weather` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub code: u16,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// `sys.pod` of a forecast sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfDay {
    Day,
    Night,
}

/// A single observation or forecast step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSample {
    /// Seconds since the UNIX epoch, UTC.
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_direction: u16,
    pub wind_gust: Option<f64>,
    pub cloud_cover: u8,
    pub visibility: Option<u32>,
    /// First entry of the upstream condition list.
    pub condition: Condition,
    pub extra_conditions: Vec<Condition>,
    /// `dt_txt`, forecast samples only, e.g. `2023-04-08 12:00:00`.
    pub text_timestamp: Option<String>,
    pub precipitation_probability: Option<f64>,
    pub part_of_day: Option<PartOfDay>,
}

impl WeatherSample {
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        std::iter::once(&self.condition).chain(self.extra_conditions.iter())
    }
}

/// A geocoding candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// `"Name, State, CC"`, or `"Name, CC"` without an admin region.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.latitude, lon: self.longitude }
    }
}

/// Current conditions for one place.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub name: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub sample: WeatherSample,
    pub sunrise: i64,
    pub sunset: i64,
    /// Seconds east of UTC.
    pub utc_offset: i64,
}

impl CurrentWeather {
    pub fn is_daytime(&self) -> bool {
        daylight::is_daytime(self.sample.timestamp, self.sunrise, self.sunset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCity {
    pub name: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub utc_offset: i64,
    pub sunrise: i64,
    pub sunset: i64,
}

/// 5-day / 3-hour forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub city: ForecastCity,
    pub samples: Vec<WeatherSample>,
}
