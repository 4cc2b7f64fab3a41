//! URL normalization for link destinations and linktree items.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

impl From<UrlNormalizationError> for AppError {
    fn from(err: UrlNormalizationError) -> Self {
        AppError::bad_request(err.to_string(), json!({ "field": "url" }))
    }
}

/// Normalizes a redirect destination to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: only HTTP and HTTPS are allowed
/// 2. **Hostname**: lowercased
/// 3. **Default ports**: removed (80 for HTTP, 443 for HTTPS)
/// 4. **Fragments**: removed
/// 5. **Query and path**: preserved as-is
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs and
/// [`UrlNormalizationError::UnsupportedProtocol`] for `javascript:`, `data:`,
/// `file:` and any other non-HTTP scheme.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if let Some(host) = url.host_str() {
        let host_lowercase = host.to_ascii_lowercase();
        url.set_host(Some(&host_lowercase)).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
        })?;
    }

    url.set_fragment(None);

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url.to_string())
}

/// Normalizes the target of a linktree item.
///
/// Items may also be `mailto:` or `tel:` links, which are kept verbatim after
/// a syntax check. Web URLs go through [`normalize_url`].
pub fn normalize_item_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    let url =
        Url::parse(trimmed).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "mailto" | "tel" => Ok(url.to_string()),
        _ => normalize_url(trimmed),
    }
}
