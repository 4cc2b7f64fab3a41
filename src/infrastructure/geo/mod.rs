//! IP geolocation backends.
//!
//! - [`HttpGeoLocator`] - Queries an external JSON geolocation endpoint
//! - [`NullGeoLocator`] - Locates nothing; used when lookups are disabled

pub mod http_geo;
pub mod null_geo;

pub use http_geo::HttpGeoLocator;
pub use null_geo::NullGeoLocator;
