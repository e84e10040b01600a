//! Grouping of 3-hourly forecast samples into one summary per calendar day.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Timelike};
use serde::Serialize;

use crate::format::local_datetime;
use crate::model::{Condition, WeatherSample};

const NOON_LABEL: &str = "12:00:00";
const NOON_SECONDS: i64 = 12 * 3600;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// UTC calendar date of the samples.
    pub date: NaiveDate,
    /// UTC midnight of `date`, UNIX seconds.
    pub timestamp: i64,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Primary condition of the representative sample.
    pub condition: Condition,
    pub samples: Vec<WeatherSample>,
}

/// How the sample that characterises a day is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representative {
    /// First sample whose `dt_txt` contains `12:00:00`, else the first sample.
    #[default]
    NoonLabel,
    /// Sample whose local time of day is closest to 12:00; earliest wins ties.
    NearestLocalNoon { utc_offset: i64 },
}

impl Representative {
    fn pick<'a>(&self, samples: &'a [WeatherSample]) -> Option<&'a WeatherSample> {
        match *self {
            Representative::NoonLabel => samples
                .iter()
                .find(|s| {
                    s.text_timestamp
                        .as_deref()
                        .is_some_and(|text| text.contains(NOON_LABEL))
                })
                .or_else(|| samples.first()),
            Representative::NearestLocalNoon { utc_offset } => {
                let mut best: Option<(&WeatherSample, i64)> = None;
                for sample in samples {
                    let Some(local) = local_datetime(sample.timestamp, utc_offset) else {
                        continue;
                    };
                    let distance = (i64::from(local.num_seconds_from_midnight()) - NOON_SECONDS).abs();
                    if best.is_none_or(|(_, d)| distance < d) {
                        best = Some((sample, distance));
                    }
                }
                best.map(|(s, _)| s).or_else(|| samples.first())
            }
        }
    }
}

/// UTC calendar date of a UNIX timestamp.
fn utc_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// One summary per distinct UTC date, in first-seen order.
///
/// Samples whose timestamp cannot be represented as a date are skipped.
pub fn group_by_day(samples: &[WeatherSample]) -> Vec<DailySummary> {
    group_by_day_with(samples, Representative::NoonLabel)
}

pub fn group_by_day_with(
    samples: &[WeatherSample],
    representative: Representative,
) -> Vec<DailySummary> {
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut days: Vec<(NaiveDate, Vec<WeatherSample>)> = Vec::new();

    for sample in samples {
        let Some(date) = utc_date(sample.timestamp) else {
            continue;
        };
        let slot = *index.entry(date).or_insert_with(|| {
            days.push((date, Vec::new()));
            days.len() - 1
        });
        days[slot].1.push(sample.clone());
    }

    days.into_iter()
        .filter_map(|(date, items)| summarize(date, items, representative))
        .collect()
}

fn summarize(
    date: NaiveDate,
    items: Vec<WeatherSample>,
    representative: Representative,
) -> Option<DailySummary> {
    let first = items.first()?;

    // Strict comparisons keep the first occurrence on ties.
    let mut temp_max = first.temperature;
    let mut temp_min = first.temperature;
    for item in &items[1..] {
        if item.temperature > temp_max {
            temp_max = item.temperature;
        }
        if item.temperature < temp_min {
            temp_min = item.temperature;
        }
    }

    let condition = representative.pick(&items)?.condition.clone();
    let timestamp = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp();

    Some(DailySummary { date, timestamp, temp_max, temp_min, condition, samples: items })
}
