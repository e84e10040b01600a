//! "Where am I" lookup used by the startup and my-location flows.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::model::Coordinates;

pub const IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

/// Result of one geolocation attempt. Every variant maps to exactly one
/// follow-up action in [`crate::dashboard`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationOutcome {
    Located(Coordinates),
    /// The lookup service refused to answer.
    Denied,
    /// Location detection is turned off or not available here.
    Unsupported,
    TimedOut,
    /// The service answered but had no usable position.
    Unavailable,
}

impl fmt::Display for GeolocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeolocationOutcome::Located(c) => write!(f, "located at {:.4}, {:.4}", c.lat, c.lon),
            GeolocationOutcome::Denied => f.write_str("location lookup was denied"),
            GeolocationOutcome::Unsupported => f.write_str("location detection is not supported"),
            GeolocationOutcome::TimedOut => f.write_str("location lookup timed out"),
            GeolocationOutcome::Unavailable => f.write_str("position unavailable"),
        }
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync + fmt::Debug {
    async fn locate(&self) -> GeolocationOutcome;
}

/// Always reports [`GeolocationOutcome::Unsupported`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait]
impl Geolocator for Disabled {
    async fn locate(&self) -> GeolocationOutcome {
        GeolocationOutcome::Unsupported
    }
}

/// Approximate position from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    http: Client,
    url: String,
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(IP_LOOKUP_URL)
    }
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, Duration::from_secs(5))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url: url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> GeolocationOutcome {
        let res = match self.http.get(&self.url).send().await {
            Ok(res) => res,
            Err(err) if err.is_timeout() => return GeolocationOutcome::TimedOut,
            Err(err) => {
                tracing::debug!(error = %err, "IP location lookup failed");
                return GeolocationOutcome::Unavailable;
            }
        };

        let status = res.status();
        if matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
        ) {
            return GeolocationOutcome::Denied;
        }
        if !status.is_success() {
            tracing::debug!(%status, "IP location lookup returned non-success status");
            return GeolocationOutcome::Unavailable;
        }

        let parsed: IpLookupResponse = match res.json().await {
            Ok(parsed) => parsed,
            Err(err) if err.is_timeout() => return GeolocationOutcome::TimedOut,
            Err(err) => {
                tracing::debug!(error = %err, "IP location response could not be decoded");
                return GeolocationOutcome::Unavailable;
            }
        };

        match (parsed.latitude, parsed.longitude) {
            (Some(lat), Some(lon)) => {
                tracing::info!(lat, lon, "located via IP lookup");
                GeolocationOutcome::Located(Coordinates { lat, lon })
            }
            _ => GeolocationOutcome::Unavailable,
        }
    }
}
