//! Visitor IP extraction from HTTP request metadata.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Determines the visitor's IP address.
///
/// When `behind_proxy` is set, the left-most `X-Forwarded-For` entry wins,
/// then `X-Real-IP`. Otherwise forwarded headers are ignored, since any
/// client could set them. The socket peer address is the fallback in both
/// cases.
///
/// Header values that do not parse as an IP address are skipped.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<String> {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return Some(ip.to_string());
    }

    peer.map(|addr| addr.ip().to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());

    from_forwarded_for.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.7:51234".parse().unwrap())
    }

    #[test]
    fn test_peer_address_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.9"));

        assert_eq!(
            client_ip(&headers, peer(), false).as_deref(),
            Some("10.0.0.7")
        );
    }

    #[test]
    fn test_forwarded_for_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        assert_eq!(
            client_ip(&headers, peer(), true).as_deref(),
            Some("203.0.113.9")
        );
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("garbage"));
        headers.insert(X_REAL_IP, HeaderValue::from_static("2001:db8::1"));

        assert_eq!(
            client_ip(&headers, peer(), true).as_deref(),
            Some("2001:db8::1")
        );
    }

    #[test]
    fn test_peer_fallback_behind_proxy() {
        assert_eq!(
            client_ip(&HeaderMap::new(), peer(), true).as_deref(),
            Some("10.0.0.7")
        );
    }

    #[test]
    fn test_nothing_known() {
        assert!(client_ip(&HeaderMap::new(), None, false).is_none());
    }
}
