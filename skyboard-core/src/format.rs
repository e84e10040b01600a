use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::UnitSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// `09:05 AM`
    Time,
    /// `Apr 8`
    Date,
    /// `Sat`
    Day,
    /// `Sat, Apr 8, 09:05 AM`
    #[default]
    Full,
}

impl TimeFormat {
    fn pattern(&self) -> &'static str {
        match self {
            TimeFormat::Time => "%I:%M %p",
            TimeFormat::Date => "%b %-d",
            TimeFormat::Day => "%a",
            TimeFormat::Full => "%a, %b %-d, %I:%M %p",
        }
    }
}

/// Rounds half-way values up (towards positive infinity).
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

pub fn format_temperature(value: f64, units: UnitSystem) -> String {
    format!("{}{}", round_half_up(value), units.temperature_suffix())
}

pub fn format_wind_speed(value: f64, units: UnitSystem) -> String {
    format!("{} {}", value, units.wind_speed_suffix())
}

/// Wall-clock time at a place `utc_offset` seconds east of UTC.
///
/// The offset is applied to the instant and the result read as UTC, so the
/// host timezone never enters the computation.
pub fn local_datetime(timestamp: i64, utc_offset: i64) -> Option<NaiveDateTime> {
    let shifted = timestamp.checked_add(utc_offset)?;
    DateTime::from_timestamp(shifted, 0).map(|dt| dt.naive_utc())
}

/// en-US rendering of a timestamp at the given UTC offset.
///
/// `None` only when the shifted instant is outside the representable range.
pub fn format_date_time(timestamp: i64, utc_offset: i64, format: TimeFormat) -> Option<String> {
    local_datetime(timestamp, utc_offset).map(|dt| dt.format(format.pattern()).to_string())
}

/// `Saturday, April 8, 2023`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
