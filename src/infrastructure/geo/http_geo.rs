//! Geolocation through an external HTTP API.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::geo::{GeoLocation, GeoLocator};

/// Placeholder replaced with the visitor IP in the endpoint URL.
pub const IP_PLACEHOLDER: &str = "{ip}";

/// Response body of ipapi-style endpoints.
///
/// Providers differ in whether they call the field `country_name` or
/// `country`; the former wins when both are present.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    error: bool,
}

impl GeoResponse {
    fn into_location(self) -> Option<GeoLocation> {
        if self.error {
            return None;
        }

        let location = GeoLocation {
            city: non_blank(self.city),
            country: non_blank(self.country_name).or_else(|| non_blank(self.country)),
        };

        (location.city.is_some() || location.country.is_some()).then_some(location)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Geolocator backed by a JSON HTTP endpoint such as `https://ipapi.co/{ip}/json/`.
///
/// Any transport, status or decoding failure yields `None`; the caller
/// records the visit with unknown location.
pub struct HttpGeoLocator {
    client: reqwest::Client,
    url_template: String,
}

impl HttpGeoLocator {
    /// Builds a locator for `url_template`.
    ///
    /// `timeout` bounds each request at the transport level, in addition to
    /// the deadline the visit worker applies.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("linkhub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    fn url_for(&self, ip: &str) -> String {
        self.url_template.replace(IP_PLACEHOLDER, ip)
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn locate(&self, ip: &str) -> Option<GeoLocation> {
        let url = self.url_for(ip);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Geolocation request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Geolocation endpoint returned an error");
            return None;
        }

        match response.json::<GeoResponse>().await {
            Ok(body) => body.into_location(),
            Err(e) => {
                tracing::debug!(error = %e, "Geolocation response could not be decoded");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
