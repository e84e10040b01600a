use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    aggregate::group_by_day,
    condition::{self, Gradient, Icon, IconSize, icon_url},
    dashboard::Snapshot,
    format::{
        TimeFormat, format_date_time, format_long_date, format_temperature, format_wind_speed,
        local_datetime,
    },
    model::PartOfDay,
};

/// Number of 3-hour steps in the hourly strip (24 hours).
pub const HOURLY_STEPS: usize = 8;
pub const DAILY_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentCard {
    pub name: String,
    pub country: String,
    /// Today's date at the location, e.g. `Saturday, April 8, 2023`.
    pub local_date: String,
    pub local_time: String,
    pub temperature: String,
    pub feels_like: String,
    pub high: String,
    pub low: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub description: &'static str,
    /// Upstream descriptions, primary condition first.
    pub conditions: Vec<String>,
    pub icon: Icon,
    pub icon_url: String,
    pub is_daytime: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyCell {
    pub time: String,
    pub icon: Icon,
    pub icon_url: String,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub label: String,
    pub icon: Icon,
    pub low: String,
    pub high: String,
    pub is_today: bool,
}

/// Everything the dashboard shows for one place, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub current: CurrentCard,
    pub hourly: Vec<HourlyCell>,
    pub daily: Vec<DailyRow>,
    pub background: Gradient,
    pub background_class: &'static str,
}

impl DashboardView {
    /// `now` decides which daily row is labelled "Today".
    pub fn build(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        let units = snapshot.units;
        let current = &snapshot.current;
        let sample = &current.sample;
        let is_daytime = current.is_daytime();
        let classification = condition::classify(sample.condition.code, is_daytime);

        let today = local_datetime(now.timestamp(), current.utc_offset).map(|dt| dt.date());

        let card = CurrentCard {
            name: current.name.clone(),
            country: current.country.clone(),
            local_date: today.map(format_long_date).unwrap_or_default(),
            local_time: format_date_time(sample.timestamp, current.utc_offset, TimeFormat::Full)
                .unwrap_or_default(),
            temperature: format_temperature(sample.temperature, units),
            feels_like: format_temperature(sample.feels_like, units),
            high: format_temperature(sample.temp_max, units),
            low: format_temperature(sample.temp_min, units),
            humidity: format!("{}%", sample.humidity),
            wind: format_wind_speed(sample.wind_speed, units),
            pressure: format!("{} hPa", sample.pressure),
            description: classification.description,
            conditions: sample.conditions().map(|c| c.description.clone()).collect(),
            icon: classification.icon,
            icon_url: icon_url(&sample.condition.icon, IconSize::Quadruple),
            is_daytime,
        };

        let offset = snapshot.forecast.city.utc_offset;

        let hourly = snapshot
            .forecast
            .samples
            .iter()
            .take(HOURLY_STEPS)
            .map(|s| HourlyCell {
                time: format_date_time(s.timestamp, offset, TimeFormat::Time).unwrap_or_default(),
                icon: condition::icon(s.condition.code, s.part_of_day == Some(PartOfDay::Day)),
                icon_url: icon_url(&s.condition.icon, IconSize::Double),
                temperature: format_temperature(s.temperature, units),
            })
            .collect();

        let daily = group_by_day(&snapshot.forecast.samples)
            .into_iter()
            .take(DAILY_ROWS)
            .map(|day| {
                let is_today = today == Some(day.date);
                let label = if is_today {
                    "Today".to_string()
                } else {
                    format_date_time(day.timestamp, offset, TimeFormat::Day).unwrap_or_default()
                };
                DailyRow {
                    date: day.date,
                    label,
                    icon: condition::icon(day.condition.code, true),
                    low: format_temperature(day.temp_min, units),
                    high: format_temperature(day.temp_max, units),
                    is_today,
                }
            })
            .collect();

        Self {
            current: card,
            hourly,
            daily,
            background: classification.gradient,
            background_class: classification.gradient.css_class(),
        }
    }
}
