//! Detail-link normalisation for link-keyed deduplication.
//!
//! Providers hand back the same detail page in slightly different shapes:
//! `http` vs `https`, mixed-case hosts, trailing slashes, or a `#review`
//! fragment. Query parameters are kept because some map sites identify the
//! place through them.

use url::Url;

/// Normalise a detail link for comparison.
///
/// 1. Fold `http` to `https`.
/// 2. Lowercase the host (done by the URL parser).
/// 3. Drop default ports.
/// 4. Drop the fragment.
/// 5. Drop a trailing slash from the path, unless the path is exactly `/`.
///
/// Input that does not parse as a URL is returned trimmed but otherwise
/// unchanged.
pub fn normalize_link(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut parsed) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    if parsed.scheme() == "http" {
        // Only fails for cannot-be-a-base URLs, which http never is.
        let _ = parsed.set_scheme("https");
    }
    if parsed.port() == Some(443) || parsed.port() == Some(80) {
        let _ = parsed.set_port(None);
    }
    parsed.set_fragment(None);

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    parsed.to_string()
}
