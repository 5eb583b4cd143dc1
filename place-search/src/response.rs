//! Provider payloads and their mapping into [`PlaceRecord`].
//!
//! Each backend decodes its wire format into one variant of
//! [`RawSearchResponse`]. [`RawSearchResponse::into_page`] is the single
//! place where provider quirks (markup in titles, fallback addresses,
//! scaled coordinates, end-of-results signals) become the common shape.

use serde::Deserialize;
use url::Url;

use crate::error::SearchError;
use crate::text::{clean_markup, parse_count, parse_decimal};
use crate::types::{Page, PlaceRecord};

/// Naver reports coordinates as WGS84 degrees scaled by 10^7.
const NAVER_COORD_SCALE: f64 = 10_000_000.0;

/// Naver map search page used when an item has no homepage link.
const NAVER_MAP_SEARCH_URL: &str = "https://map.naver.com/p/search/";

/// A decoded backend response, before mapping to records.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSearchResponse {
    /// Kakao Local keyword search payload.
    Kakao(KakaoResponse),
    /// Naver Local search payload.
    Naver(NaverResponse),
    /// Venue cards scraped from a map search page.
    MapPage(MapPageCards),
}

/// `GET /v2/local/search/keyword.json` response body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KakaoResponse {
    /// Places on this page.
    pub documents: Vec<KakaoDocument>,
    /// Paging metadata.
    pub meta: KakaoMeta,
}

/// One Kakao place document. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KakaoDocument {
    pub place_name: Option<String>,
    pub category_name: Option<String>,
    pub road_address_name: Option<String>,
    pub address_name: Option<String>,
    pub place_url: Option<String>,
    pub phone: Option<String>,
    /// Longitude as a decimal string.
    pub x: Option<String>,
    /// Latitude as a decimal string.
    pub y: Option<String>,
}

/// Kakao paging metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KakaoMeta {
    /// True on the last page of results.
    pub is_end: bool,
    pub pageable_count: u32,
    pub total_count: u32,
}

/// `GET /v1/search/local.json` response body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NaverResponse {
    /// Total hits reported by the provider.
    pub total: u32,
    /// 1-based offset of the first item.
    pub start: u32,
    /// Requested page size echoed back.
    pub display: u32,
    pub items: Vec<NaverItem>,
}

/// One Naver local item. `title` carries `<b>` highlight markup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NaverItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub telephone: Option<String>,
    pub address: Option<String>,
    pub road_address: Option<String>,
    /// Longitude scaled by 10^7, as an integer string.
    pub mapx: Option<String>,
    /// Latitude scaled by 10^7, as an integer string.
    pub mapy: Option<String>,
}

/// Cards scraped from one map search page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapPageCards {
    pub cards: Vec<RawCard>,
    /// An enabled "next page" control was present.
    pub has_next: bool,
}

/// Raw text pulled out of one venue card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCard {
    pub name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub link: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
}

impl RawSearchResponse {
    /// Decode a Kakao JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if the body is not valid JSON.
    pub fn parse_kakao(body: &str) -> Result<Self, SearchError> {
        serde_json::from_str(body)
            .map(Self::Kakao)
            .map_err(|e| SearchError::Parse(format!("Kakao response: {e}")))
    }

    /// Decode a Naver JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if the body is not valid JSON.
    pub fn parse_naver(body: &str) -> Result<Self, SearchError> {
        serde_json::from_str(body)
            .map(Self::Naver)
            .map_err(|e| SearchError::Parse(format!("Naver response: {e}")))
    }

    /// Map this response into a [`Page`], tagging every record with `keyword`.
    ///
    /// Items missing a name or link are skipped and counted.
    pub fn into_page(self, keyword: &str) -> Page {
        match self {
            Self::Kakao(response) => kakao_page(response, keyword),
            Self::Naver(response) => naver_page(response, keyword),
            Self::MapPage(cards) => map_page(cards, keyword),
        }
    }
}

fn kakao_page(response: KakaoResponse, keyword: &str) -> Page {
    let is_end = response.meta.is_end;
    let document_count = response.documents.len();
    let mut page = collect(response.documents, keyword, |doc| {
        let mut record = require(
            doc.place_name.as_deref(),
            doc.place_url.as_deref(),
            doc.category_name.as_deref(),
            first_present(&[doc.road_address_name.as_deref(), doc.address_name.as_deref()]),
        )?;
        record.phone = non_empty(doc.phone.as_deref());
        record.longitude = doc.x.as_deref().and_then(|x| x.trim().parse().ok());
        record.latitude = doc.y.as_deref().and_then(|y| y.trim().parse().ok());
        Ok(record)
    });
    page.is_last = is_end || document_count == 0;
    page
}

fn naver_page(response: NaverResponse, keyword: &str) -> Page {
    let item_count = response.items.len() as u32;
    let last_index = response.start.max(1).saturating_add(item_count).saturating_sub(1);
    let mut page = collect(response.items, keyword, |item| {
        let fallback_name = item.title.as_deref().map(clean_markup).unwrap_or_default();
        let link = non_empty(item.link.as_deref()).or_else(|| naver_map_link(&fallback_name));
        let mut record = require(
            item.title.as_deref(),
            link.as_deref(),
            item.category.as_deref(),
            first_present(&[item.road_address.as_deref(), item.address.as_deref()]),
        )?;
        record.phone = non_empty(item.telephone.as_deref());
        record.longitude = scaled_coordinate(item.mapx.as_deref());
        record.latitude = scaled_coordinate(item.mapy.as_deref());
        Ok(record)
    });
    page.is_last = item_count == 0 || last_index >= response.total;
    page
}

fn map_page(cards: MapPageCards, keyword: &str) -> Page {
    let has_next = cards.has_next;
    let card_count = cards.cards.len();
    let mut page = collect(cards.cards, keyword, |card| {
        let mut record = require(
            card.name.as_deref(),
            card.link.as_deref(),
            card.category.as_deref(),
            card.address.as_deref(),
        )?;
        let rating = card.rating.as_deref().and_then(parse_decimal).unwrap_or(0.0);
        let reviews = card.review_count.as_deref().and_then(parse_count).unwrap_or(0);
        record = record.with_rating(rating).with_review_count(reviews);
        Ok(record)
    });
    page.is_last = !has_next || card_count == 0;
    page
}

/// Map raw items through `to_record`, counting the ones that fail.
fn collect<T>(
    items: Vec<T>,
    keyword: &str,
    to_record: impl Fn(T) -> Result<PlaceRecord, SearchError>,
) -> Page {
    let mut page = Page::default();
    for item in items {
        match to_record(item) {
            Ok(record) => page.records.push(record.with_source_query(keyword)),
            Err(err) => {
                tracing::trace!(error = %err, "skipping item");
                page.skipped += 1;
            }
        }
    }
    page
}

/// Build a record from cleaned text fields, requiring a name and a link.
fn require(
    name: Option<&str>,
    link: Option<&str>,
    category: Option<&str>,
    address: Option<&str>,
) -> Result<PlaceRecord, SearchError> {
    let name = name.map(clean_markup).unwrap_or_default();
    if name.is_empty() {
        return Err(SearchError::MalformedRecord("missing name".into()));
    }
    let link = link.map(str::trim).unwrap_or_default();
    if link.is_empty() {
        return Err(SearchError::MalformedRecord(format!("{name}: missing link")));
    }
    Ok(PlaceRecord::new(
        name,
        category.map(clean_markup).unwrap_or_default(),
        address.map(clean_markup).unwrap_or_default(),
        link,
    ))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|v| !v.trim().is_empty())
}

fn scaled_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .map(|v| v as f64 / NAVER_COORD_SCALE)
}

fn naver_map_link(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    let mut url = Url::parse(NAVER_MAP_SEARCH_URL).ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(name);
    Some(url.into())
}
