use async_trait::async_trait;

use crate::domain::geo::{GeoLocation, GeoLocator};

/// Geolocator that never resolves an address.
///
/// Every visit is then recorded with an unknown city and country.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeoLocator;

#[async_trait]
impl GeoLocator for NullGeoLocator {
    async fn locate(&self, _ip: &str) -> Option<GeoLocation> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
