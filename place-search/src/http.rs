//! Shared HTTP client construction and response checking for backends.
//!
//! Each backend builds one [`reqwest::Client`] at construction time and
//! reuses it for every page. The client carries the configured timeout and
//! either a custom User-Agent or one picked from a rotation list.

use crate::config::SearchConfig;
use crate::error::SearchError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, one picked per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] for backend requests.
///
/// The client has:
/// - Cookie store enabled (map pages set session cookies on first load)
/// - Timeout from config
/// - Random User-Agent from built-in rotation list (or custom if configured)
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // SAFETY: USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// Read the body of a response, turning a non-success status into
/// [`SearchError::BackendRejected`] with the raw body attached.
///
/// `backend` only labels transport errors; it never carries credentials.
pub async fn read_body(response: reqwest::Response, backend: &str) -> Result<String, SearchError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SearchError::Http(format!("{backend} response read failed: {e}")))?;

    if !status.is_success() {
        tracing::debug!(backend, status = status.as_u16(), "backend rejected request");
        return Err(SearchError::BackendRejected {
            status: status.as_u16(),
            body,
        });
    }

    tracing::trace!(backend, bytes = body.len(), "response received");
    Ok(body)
}
