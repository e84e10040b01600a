//! Core library for the `skyboard` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `WeatherProvider` abstraction
//! - Forecast aggregation, condition classification and unit/time formatting
//! - Dashboard orchestration (joined fetches, location fallback) and view building
//!
//! It is used by `skyboard-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod condition;
pub mod config;
pub mod daylight;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod locate;
pub mod model;
pub mod provider;
pub mod view;

pub use aggregate::{DailySummary, Representative, group_by_day, group_by_day_with};
pub use condition::{Classification, ConditionCategory, Gradient, Icon, classify};
pub use config::Config;
pub use dashboard::{Dashboard, FallbackReason, Loaded, Origin, Snapshot};
pub use error::{ErrorKind, WeatherError};
pub use format::{TimeFormat, format_date_time, format_temperature};
pub use locate::{GeolocationOutcome, Geolocator, IpGeolocator};
pub use model::{
    Condition, Coordinates, CurrentWeather, Forecast, ForecastCity, Location, UnitSystem,
    WeatherSample,
};
pub use provider::{LocationQuery, WeatherProvider, openweather::OpenWeatherClient};
pub use view::DashboardView;
