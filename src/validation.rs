//! Validation of the user-supplied reflected origin

use url::Url;

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "file", "chrome-extension", "moz-extension"];

/// Checks that `origin` is usable as an `Origin` header value.
///
/// Accepts `null` and scheme + host (+ port) values such as
/// `https://example.com` or `http://localhost:3000`. Rejects anything with a
/// path, query or fragment, and incomplete values like `http:/example`.
pub fn is_valid_origin(origin: &str) -> bool {
    if origin.eq_ignore_ascii_case("null") {
        return true;
    }

    let Some((scheme, rest)) = origin.split_once("://") else {
        return false;
    };
    if !ALLOWED_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
        return false;
    }
    if rest.contains(['/', '?', '#']) {
        return false;
    }

    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    if scheme.eq_ignore_ascii_case("file") {
        return true;
    }
    url.host_str().is_some_and(|h| !h.is_empty())
}
