//! Original URL validation and short URL composition.

use url::Url;

/// Reasons an original URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is a well-formed absolute HTTP(S) URL.
///
/// Narrower than a generic absolute-URL check: `ftp:` and other schemes a
/// URL parser accepts are refused here.
///
/// The input is not rewritten: links are deduplicated on the exact string the
/// caller sent, so `https://EXAMPLE.com` and `https://example.com` are two
/// distinct original URLs. Surrounding whitespace is trimmed.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and any other non-HTTP scheme,
/// since the value ends up in a `Location` header.
///
/// # Errors
///
/// See [`UrlValidationError`].
pub fn validate_original_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    // The URL parser silently strips tabs and newlines; the stored value must not carry them.
    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "control characters are not allowed".to_string(),
        ));
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}

/// Percent-encoded form of a stored URL, suitable for a `Location` header.
///
/// Stored values keep the caller's exact spelling; spaces and non-ASCII
/// characters are encoded only on the way out. A value that no longer parses
/// is returned unchanged.
pub fn location_header_value(stored: &str) -> String {
    Url::parse(stored)
        .map(String::from)
        .unwrap_or_else(|_| stored.to_string())
}

/// Joins the public base URL and an identifier: `base + "/" + id`.
///
/// Trailing slashes on the base are dropped so the result never contains `//`
/// before the identifier.
pub fn compose_short_url(base_url: &str, id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(
            validate_original_url("https://example.com").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            validate_original_url("http://example.com/path?q=1#frag").unwrap(),
            "http://example.com/path?q=1#frag"
        );
    }

    #[test]
    fn test_input_is_not_rewritten() {
        assert_eq!(
            validate_original_url("HTTPS://EXAMPLE.COM:443/Path").unwrap(),
            "HTTPS://EXAMPLE.COM:443/Path"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_original_url("  https://example.com \n").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_original_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(matches!(
            validate_original_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_original_url("/just/a/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_control_characters() {
        assert!(matches!(
            validate_original_url("https://exa\nmple.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        for input in [
            "javascript:alert(1)",
            "data:text/html,hi",
            "file:///etc/passwd",
            "ftp://example.com",
        ] {
            assert_eq!(
                validate_original_url(input),
                Err(UrlValidationError::UnsupportedProtocol),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_location_header_value_encodes() {
        assert_eq!(
            location_header_value("https://example.com/a b"),
            "https://example.com/a%20b"
        );
        assert_eq!(
            location_header_value("https://example.com/café?q=é"),
            "https://example.com/caf%C3%A9?q=%C3%A9"
        );
        assert_eq!(
            location_header_value("https://example.com/path?q=1"),
            "https://example.com/path?q=1"
        );
    }

    #[test]
    fn test_compose_short_url() {
        assert_eq!(
            compose_short_url("https://s.example.com", "abc1234"),
            "https://s.example.com/abc1234"
        );
        assert_eq!(
            compose_short_url("https://s.example.com/", "abc1234"),
            "https://s.example.com/abc1234"
        );
        assert_eq!(
            compose_short_url("http://localhost:5000//", "x"),
            "http://localhost:5000/x"
        );
    }
}
