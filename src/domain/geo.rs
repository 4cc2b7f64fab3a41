//! IP geolocation contract used when recording visits.

use async_trait::async_trait;

use crate::domain::entities::UNKNOWN;

/// City and country of a visitor, as far as the provider could tell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLocation {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl GeoLocation {
    pub fn city_or_unknown(&self) -> String {
        non_empty_or_unknown(self.city.as_deref())
    }

    pub fn country_or_unknown(&self) -> String {
        non_empty_or_unknown(self.country.as_deref())
    }
}

fn non_empty_or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Looks up where an IP address is.
///
/// Implementations never fail: any provider error yields `None` and the
/// visit is stored with "Unknown" city and country.
///
/// # Implementations
///
/// - [`crate::infrastructure::geo::HttpGeoLocator`] - JSON lookup over HTTP
/// - [`crate::infrastructure::geo::NullGeoLocator`] - always `None`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, ip: &str) -> Option<GeoLocation>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}
