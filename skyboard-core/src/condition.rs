//! Mapping of upstream condition codes to display categories.
//!
//! Codes follow the OpenWeather condition table (2xx thunderstorm .. 8xx clouds).
//! Description, icon and background each come from their own ordered table,
//! so a code can e.g. carry a thunderstorm icon while falling back to the
//! default background.

use std::ops::RangeInclusive;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionCategory {
    Clear,
    PartlyCloudy,
    Cloudy,
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Haze,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Sun,
    Moon,
    CloudSun,
    CloudMoon,
    Cloud,
    CloudLightning,
    CloudDrizzle,
    CloudRain,
    CloudSnow,
    CloudFog,
}

impl Icon {
    pub fn name(&self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::Moon => "moon",
            Icon::CloudSun => "cloud-sun",
            Icon::CloudMoon => "cloud-moon",
            Icon::Cloud => "cloud",
            Icon::CloudLightning => "cloud-lightning",
            Icon::CloudDrizzle => "cloud-drizzle",
            Icon::CloudRain => "cloud-rain",
            Icon::CloudSnow => "cloud-snow",
            Icon::CloudFog => "cloud-fog",
        }
    }

    /// Single-cell glyph for terminal output.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Sun => "☀",
            Icon::Moon => "☾",
            Icon::CloudSun => "⛅",
            Icon::CloudMoon => "☁",
            Icon::Cloud => "☁",
            Icon::CloudLightning => "⚡",
            Icon::CloudDrizzle => "☂",
            Icon::CloudRain => "☔",
            Icon::CloudSnow => "❄",
            Icon::CloudFog => "≋",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gradient {
    ClearDay,
    ClearNight,
    Cloudy,
    Rainy,
    Thunderstorm,
    Snowy,
    Misty,
}

impl Gradient {
    pub fn css_class(&self) -> &'static str {
        match self {
            Gradient::ClearDay => "bg-gradient-clear-day",
            Gradient::ClearNight => "bg-gradient-clear-night",
            Gradient::Cloudy => "bg-gradient-cloudy",
            Gradient::Rainy => "bg-gradient-rainy",
            Gradient::Thunderstorm => "bg-gradient-thunderstorm",
            Gradient::Snowy => "bg-gradient-snowy",
            Gradient::Misty => "bg-gradient-misty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: ConditionCategory,
    pub icon: Icon,
    pub description: &'static str,
    pub gradient: Gradient,
}

// First matching entry wins.
const DESCRIPTIONS: &[(RangeInclusive<u16>, &str)] = &[
    (800..=800, "Clear sky"),
    (801..=801, "Few clouds"),
    (802..=802, "Scattered clouds"),
    (803..=803, "Broken clouds"),
    (804..=804, "Overcast clouds"),
    (200..=299, "Thunderstorm"),
    (300..=399, "Drizzle"),
    (511..=511, "Freezing rain"),
    (500..=599, "Rain"),
    (600..=699, "Snow"),
    (701..=701, "Mist"),
    (711..=711, "Smoke"),
    (721..=721, "Haze"),
    (731..=731, "Dust"),
    (741..=741, "Fog"),
    (751..=751, "Sand"),
    (761..=761, "Dust"),
    (762..=762, "Volcanic ash"),
    (771..=771, "Squalls"),
    (781..=781, "Tornado"),
];

const CATEGORIES: &[(RangeInclusive<u16>, ConditionCategory)] = &[
    (800..=800, ConditionCategory::Clear),
    (801..=801, ConditionCategory::PartlyCloudy),
    (802..=804, ConditionCategory::Cloudy),
    (200..=299, ConditionCategory::Thunderstorm),
    (300..=399, ConditionCategory::Drizzle),
    (500..=599, ConditionCategory::Rain),
    (600..=699, ConditionCategory::Snow),
    (700..=799, ConditionCategory::Haze),
];

// 800 is resolved separately since it depends on day/night.
const GRADIENTS: &[(RangeInclusive<u16>, Gradient)] = &[
    (801..=804, Gradient::Cloudy),
    (300..=321, Gradient::Rainy),
    (500..=531, Gradient::Rainy),
    (200..=232, Gradient::Thunderstorm),
    (600..=622, Gradient::Snowy),
    (701..=781, Gradient::Misty),
];

fn lookup<T: Copy>(table: &[(RangeInclusive<u16>, T)], code: u16) -> Option<T> {
    table
        .iter()
        .find_map(|(range, value)| range.contains(&code).then_some(*value))
}

/// Human-readable description; `"Unknown"` for unmapped codes.
pub fn description(code: u16) -> &'static str {
    lookup(DESCRIPTIONS, code).unwrap_or("Unknown")
}

pub fn category(code: u16) -> ConditionCategory {
    lookup(CATEGORIES, code).unwrap_or(ConditionCategory::Unknown)
}

pub fn icon(code: u16, is_daytime: bool) -> Icon {
    match category(code) {
        ConditionCategory::Clear if is_daytime => Icon::Sun,
        ConditionCategory::Clear => Icon::Moon,
        ConditionCategory::PartlyCloudy if is_daytime => Icon::CloudSun,
        ConditionCategory::PartlyCloudy => Icon::CloudMoon,
        ConditionCategory::Cloudy => Icon::Cloud,
        ConditionCategory::Thunderstorm => Icon::CloudLightning,
        ConditionCategory::Drizzle => Icon::CloudDrizzle,
        ConditionCategory::Rain => Icon::CloudRain,
        ConditionCategory::Snow => Icon::CloudSnow,
        ConditionCategory::Haze => Icon::CloudFog,
        // Unmapped codes get the daytime clear icon, even at night.
        ConditionCategory::Unknown => Icon::Sun,
    }
}

pub fn gradient(code: u16, is_daytime: bool) -> Gradient {
    let clear = if is_daytime { Gradient::ClearDay } else { Gradient::ClearNight };
    if code == 800 {
        return clear;
    }
    lookup(GRADIENTS, code).unwrap_or(clear)
}

pub fn classify(code: u16, is_daytime: bool) -> Classification {
    Classification {
        category: category(code),
        icon: icon(code, is_daytime),
        description: description(code),
        gradient: gradient(code, is_daytime),
    }
}

/// URL of the upstream PNG for an icon token such as `10d`.
pub fn icon_url(token: &str, size: IconSize) -> String {
    let size = match size {
        IconSize::Double => "2x",
        IconSize::Quadruple => "4x",
    };
    format!("https://openweathermap.org/img/wn/{token}@{size}.png")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSize {
    Double,
    #[default]
    Quadruple,
}
