//! URL handling: root-address validation, host extraction, and the
//! crawl allow-list.

mod allowlist;

pub use allowlist::Allowlist;

use crate::UrlError;
use url::Url;

/// Validates and parses the root address of a crawl
///
/// The address must be an absolute URL with an `http` or `https` scheme and
/// a host. Anything else is a fatal input error, raised before any fetch is
/// dispatched.
///
/// # Examples
///
/// ```
/// use carta::url::validate_root;
///
/// assert!(validate_root("https://example.com/").is_ok());
/// assert!(validate_root("example.com").is_err());
/// assert!(validate_root("ftp://bad").is_err());
/// ```
pub fn validate_root(input: &str) -> Result<Url, UrlError> {
    let parsed = Url::parse(input).map_err(|e| UrlError::Parse(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if parsed.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(parsed)
}

/// Extracts the lowercase host from a URL
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
