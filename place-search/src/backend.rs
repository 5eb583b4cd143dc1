//! Trait definition for pluggable place-search backends.
//!
//! Each backend (Kakao Local, Naver Local, the scraped map page) implements
//! [`PlaceBackend`] to provide a uniform "fetch one page" interface. The
//! pagination loop, aggregation and filtering never see provider details.

use crate::error::SearchError;
use crate::types::{Backend, Page, QuerySpec};

/// A pluggable place-search backend.
///
/// Implementors issue exactly one request per call and map the provider
/// payload into [`crate::types::PlaceRecord`] values. Each backend handles
/// its own:
///
/// - URL and parameter construction, including page cursor translation
/// - Authentication headers from caller-supplied credentials
/// - Clamping the requested page size to the provider maximum
/// - Detecting the provider's "last page" signal
///
/// All implementations must be `Send + Sync`.
pub trait PlaceBackend: Send + Sync {
    /// Fetch page `page` (1-based) of results for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::BackendRejected`] on a non-success status,
    /// [`SearchError::Http`] on transport failure, or
    /// [`SearchError::Parse`] when the body cannot be decoded. Individual
    /// malformed items are skipped and counted in [`Page::skipped`] rather
    /// than failing the page.
    fn fetch_page(
        &self,
        query: &QuerySpec,
        page: u32,
    ) -> impl std::future::Future<Output = Result<Page, SearchError>> + Send;

    /// Returns which [`Backend`] variant this implementation represents.
    fn backend_type(&self) -> Backend;

    /// Page size actually sent for a requested size.
    fn effective_page_size(&self, requested: u32) -> u32 {
        requested.clamp(1, self.backend_type().max_page_size())
    }
}
