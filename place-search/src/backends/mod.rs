//! Backend implementations.
//!
//! Each module provides a struct implementing [`crate::backend::PlaceBackend`]
//! for one provider. [`AnyBackend`] picks one at runtime from a [`Backend`]
//! value and caller-supplied credentials.

pub mod kakao;
pub mod map_page;
pub mod naver;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use kakao::KakaoBackend;
pub use map_page::{CardSelectors, MapPageBackend};
pub use naver::NaverBackend;

use crate::backend::PlaceBackend;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{Backend, Page, QuerySpec};

/// Caller-supplied provider credentials. Passed through, never interpreted
/// or logged.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Kakao REST API key.
    pub kakao_rest_api_key: Option<String>,
    /// Naver application client id.
    pub naver_client_id: Option<String>,
    /// Naver application client secret.
    pub naver_client_secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("Credentials")
            .field("kakao_rest_api_key", &mask(&self.kakao_rest_api_key))
            .field("naver_client_id", &mask(&self.naver_client_id))
            .field("naver_client_secret", &mask(&self.naver_client_secret))
            .finish()
    }
}

/// Settings for the scraped map page backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPageConfig {
    /// Search page URL; `query` and `page` are appended as parameters.
    pub search_url: Option<String>,
    /// Card selectors for the page markup.
    pub selectors: CardSelectors,
}

/// Runtime-selected backend.
#[derive(Debug)]
pub enum AnyBackend {
    Kakao(KakaoBackend),
    Naver(NaverBackend),
    MapPage(MapPageBackend),
}

impl AnyBackend {
    /// Build the backend for `kind` from credentials and settings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ConfigurationMissing`] when the credential or
    /// URL the chosen backend needs is absent. Nothing is sent over the
    /// network here.
    pub fn build(
        kind: Backend,
        credentials: &Credentials,
        map_page: &MapPageConfig,
        config: &SearchConfig,
    ) -> Result<Self, SearchError> {
        let backend = match kind {
            Backend::Kakao => {
                let key = credentials.kakao_rest_api_key.as_deref().unwrap_or_default();
                Self::Kakao(KakaoBackend::new(key, config)?)
            }
            Backend::Naver => {
                let id = credentials.naver_client_id.as_deref().unwrap_or_default();
                let secret = credentials.naver_client_secret.as_deref().unwrap_or_default();
                Self::Naver(NaverBackend::new(id, secret, config)?)
            }
            Backend::MapPage => {
                let url = map_page.search_url.as_deref().unwrap_or_default();
                Self::MapPage(MapPageBackend::new(url, &map_page.selectors, config)?)
            }
        };
        tracing::debug!(backend = %kind, "backend ready");
        Ok(backend)
    }

    /// Send API requests to `base_url` instead of the production host.
    ///
    /// Applies to the API backends; the map page backend already takes its
    /// full search URL from [`MapPageConfig`].
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        match self {
            Self::Kakao(backend) => Self::Kakao(backend.with_base_url(base_url)),
            Self::Naver(backend) => Self::Naver(backend.with_base_url(base_url)),
            Self::MapPage(backend) => Self::MapPage(backend),
        }
    }
}

impl PlaceBackend for AnyBackend {
    async fn fetch_page(&self, query: &QuerySpec, page: u32) -> Result<Page, SearchError> {
        match self {
            Self::Kakao(backend) => backend.fetch_page(query, page).await,
            Self::Naver(backend) => backend.fetch_page(query, page).await,
            Self::MapPage(backend) => backend.fetch_page(query, page).await,
        }
    }

    fn backend_type(&self) -> Backend {
        match self {
            Self::Kakao(_) => Backend::Kakao,
            Self::Naver(_) => Backend::Naver,
            Self::MapPage(_) => Backend::MapPage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials {
            kakao_rest_api_key: Some("kakao-key".into()),
            naver_client_id: Some("naver-id".into()),
            naver_client_secret: Some("naver-secret".into()),
        }
    }

    #[test]
    fn builds_each_backend_with_credentials() {
        let config = SearchConfig::default();
        let map_page = MapPageConfig {
            search_url: Some("https://map.example.com/search".into()),
            ..Default::default()
        };
        for kind in Backend::all() {
            let backend = AnyBackend::build(*kind, &creds(), &map_page, &config).expect("build");
            assert_eq!(backend.backend_type(), *kind);
        }
    }

    #[test]
    fn missing_kakao_key_fails_fast() {
        let err = AnyBackend::build(
            Backend::Kakao,
            &Credentials::default(),
            &MapPageConfig::default(),
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::ConfigurationMissing(_)));
    }

    #[test]
    fn missing_naver_secret_fails_fast() {
        let credentials = Credentials {
            naver_client_secret: None,
            ..creds()
        };
        let err = AnyBackend::build(
            Backend::Naver,
            &credentials,
            &MapPageConfig::default(),
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("secret"));
    }

    #[test]
    fn missing_map_page_url_fails_fast() {
        let err = AnyBackend::build(
            Backend::MapPage,
            &creds(),
            &MapPageConfig::default(),
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::ConfigurationMissing(_)));
    }

    #[test]
    fn base_url_override_keeps_backend_kind() {
        let backend = AnyBackend::build(
            Backend::Naver,
            &creds(),
            &MapPageConfig::default(),
            &SearchConfig::default(),
        )
        .expect("build")
        .with_base_url("http://127.0.0.1:8080/");
        assert_eq!(backend.backend_type(), Backend::Naver);
        assert!(format!("{backend:?}").contains("http://127.0.0.1:8080"));
    }

    #[test]
    fn credentials_debug_never_shows_values() {
        let rendered = format!("{:?}", creds());
        assert!(!rendered.contains("kakao-key"));
        assert!(!rendered.contains("naver-secret"));
        assert!(rendered.contains("<redacted>"));

        let rendered = format!("{:?}", Credentials::default());
        assert!(rendered.contains("<unset>"));
    }
}
