//! Map search page scraper.
//!
//! Fetches a server-rendered map search page and parses venue cards with
//! CSS selectors. This is the only backend that reports ratings and review
//! counts. Selectors are configuration so that markup changes on the site
//! do not need a code change. Pages that only render through JavaScript
//! are not supported; the page must come back as HTML from a plain GET.

use std::fmt;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::PlaceBackend;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::response::{MapPageCards, RawCard, RawSearchResponse};
use crate::types::{Backend, Page, QuerySpec, SortMode};

/// CSS selectors for one venue card. All but `card` are relative to a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSelectors {
    /// One element per venue.
    pub card: String,
    pub name: String,
    pub category: String,
    pub address: String,
    /// Anchor whose `href` is the detail page.
    pub link: String,
    pub rating: String,
    pub review_count: String,
    /// Document-level selector for an enabled "next page" control.
    pub next_page: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            card: "li.place-card".into(),
            name: ".place-name".into(),
            category: ".place-category".into(),
            address: ".place-address".into(),
            link: "a.place-link".into(),
            rating: ".place-rating".into(),
            review_count: ".place-reviews".into(),
            next_page: ".pagination a.next:not(.disabled)".into(),
        }
    }
}

/// [`CardSelectors`] parsed once at backend construction.
struct CompiledSelectors {
    card: Selector,
    name: Selector,
    category: Selector,
    address: Selector,
    link: Selector,
    rating: Selector,
    review_count: Selector,
    next_page: Selector,
}

impl CompiledSelectors {
    fn compile(raw: &CardSelectors) -> Result<Self, SearchError> {
        Ok(Self {
            card: parse_selector("card", &raw.card)?,
            name: parse_selector("name", &raw.name)?,
            category: parse_selector("category", &raw.category)?,
            address: parse_selector("address", &raw.address)?,
            link: parse_selector("link", &raw.link)?,
            rating: parse_selector("rating", &raw.rating)?,
            review_count: parse_selector("review_count", &raw.review_count)?,
            next_page: parse_selector("next_page", &raw.next_page)?,
        })
    }
}

fn parse_selector(field: &str, css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css)
        .map_err(|e| SearchError::Config(format!("invalid {field} selector {css:?}: {e:?}")))
}

/// Map search page scraper.
pub struct MapPageBackend {
    client: reqwest::Client,
    search_url: Url,
    selectors: CompiledSelectors,
}

impl MapPageBackend {
    /// Create a scraper for the search page at `search_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ConfigurationMissing`] if `search_url` is
    /// blank, [`SearchError::Config`] if it is not a URL or a selector does
    /// not parse, or [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(
        search_url: &str,
        selectors: &CardSelectors,
        config: &SearchConfig,
    ) -> Result<Self, SearchError> {
        if search_url.trim().is_empty() {
            return Err(SearchError::ConfigurationMissing("map page search URL".into()));
        }
        let search_url = Url::parse(search_url.trim())
            .map_err(|e| SearchError::Config(format!("invalid map page search URL: {e}")))?;
        Ok(Self {
            client: http::build_client(config)?,
            search_url,
            selectors: CompiledSelectors::compile(selectors)?,
        })
    }
}

impl fmt::Debug for MapPageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapPageBackend")
            .field("search_url", &self.search_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PlaceBackend for MapPageBackend {
    async fn fetch_page(&self, query: &QuerySpec, page: u32) -> Result<Page, SearchError> {
        tracing::trace!(query = %query.text, page, "map page search");

        let order = match query.sort {
            SortMode::Relevance => "relevance",
            SortMode::MostReviewed => "reviews",
        };

        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[
                ("query", query.text.clone()),
                ("page", page.to_string()),
                ("size", self.effective_page_size(query.page_size).to_string()),
                ("order", order.to_string()),
            ])
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "ko-KR,ko;q=0.9,en;q=0.8")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("map page request failed: {e}")))?;

        let html = http::read_body(response, "MapPage").await?;
        let cards = parse_map_page_html(&html, &self.selectors, &self.search_url);
        let parsed = RawSearchResponse::MapPage(cards).into_page(&query.keyword);

        tracing::debug!(
            page,
            count = parsed.records.len(),
            skipped = parsed.skipped,
            is_last = parsed.is_last,
            "map page parsed"
        );
        Ok(parsed)
    }

    fn backend_type(&self) -> Backend {
        Backend::MapPage
    }
}

/// Parse venue cards out of a rendered search page.
///
/// Relative detail links are resolved against `base`. Extracted as a
/// separate function for testability with fixture HTML.
fn parse_map_page_html(html: &str, selectors: &CompiledSelectors, base: &Url) -> MapPageCards {
    let document = Html::parse_document(html);

    let cards = document
        .select(&selectors.card)
        .map(|card| RawCard {
            name: text_of(card, &selectors.name),
            category: text_of(card, &selectors.category),
            address: text_of(card, &selectors.address),
            link: card
                .select(&selectors.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| base.join(href).ok())
                .map(String::from),
            rating: text_of(card, &selectors.rating),
            review_count: text_of(card, &selectors.review_count),
        })
        .collect();

    MapPageCards {
        cards,
        has_next: document.select(&selectors.next_page).next().is_some(),
    }
}

/// Whitespace-collapsed text of the first match, if non-empty.
fn text_of(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let el = card.select(selector).next()?;
    let text = el.text().collect::<Vec<_>>().join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_HTML: &str = include_str!("../../test-data/map_page.html");

    fn compiled() -> CompiledSelectors {
        CompiledSelectors::compile(&CardSelectors::default()).expect("default selectors compile")
    }

    fn base() -> Url {
        Url::parse("https://map.example.com/search").expect("url")
    }

    #[test]
    fn fixture_extracts_every_card() {
        let cards = parse_map_page_html(FIXTURE_HTML, &compiled(), &base());
        assert_eq!(cards.cards.len(), 4);
        assert!(cards.has_next);
    }

    #[test]
    fn fixture_fields_are_collapsed_and_resolved() {
        let cards = parse_map_page_html(FIXTURE_HTML, &compiled(), &base());
        let first = &cards.cards[0];
        assert_eq!(first.name.as_deref(), Some("태평소국밥 본점"));
        assert_eq!(first.category.as_deref(), Some("국밥"));
        assert_eq!(
            first.link.as_deref(),
            Some("https://map.example.com/place/1001")
        );
        assert_eq!(first.rating.as_deref(), Some("4.6"));
        assert_eq!(first.review_count.as_deref(), Some("리뷰 2,318"));
    }

    #[test]
    fn fixture_maps_into_page_with_skips() {
        let cards = parse_map_page_html(FIXTURE_HTML, &compiled(), &base());
        let page = RawSearchResponse::MapPage(cards).into_page("맛집");
        // The fourth card has no link.
        assert_eq!(page.records.len(), 3);
        assert_eq!(page.skipped, 1);
        assert!(!page.is_last);
        assert_eq!(page.records[1].review_count, 87);
        assert_eq!(page.records[2].rating, 0.0);
    }

    #[test]
    fn disabled_next_control_means_last_page() {
        let html = r##"<ul><li class="place-card"><a class="place-link" href="/p/1"><span class="place-name">a</span></a></li></ul>
            <div class="pagination"><a class="next disabled" href="#">다음</a></div>"##;
        let cards = parse_map_page_html(html, &compiled(), &base());
        assert!(!cards.has_next);
        assert_eq!(cards.cards.len(), 1);
    }

    #[test]
    fn empty_page_has_no_cards() {
        let cards = parse_map_page_html("<html><body></body></html>", &compiled(), &base());
        assert!(cards.cards.is_empty());
        assert!(!cards.has_next);
    }

    #[test]
    fn invalid_selector_is_config_error() {
        let selectors = CardSelectors {
            card: "li[".into(),
            ..Default::default()
        };
        let err = MapPageBackend::new("https://map.example.com/search", &selectors, &SearchConfig::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
        assert!(err.to_string().contains("card"));
    }

    #[test]
    fn blank_url_is_configuration_missing() {
        let err = MapPageBackend::new("", &CardSelectors::default(), &SearchConfig::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::ConfigurationMissing(_)));
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MapPageBackend>();
    }
}
