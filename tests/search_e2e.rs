//! End-to-end tests: configuration through search to CSV on disk.
//!
//! The Kakao backend is pointed at a local mock server through
//! `api_base_url`; no real provider is contacted.

use findfood::config::AppConfig;
use findfood::export::{self, UTF8_BOM};
use place_search::{Backend, QueryCache};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig {
        backend: Backend::Kakao,
        api_base_url: Some(server.uri()),
        deep_search: true,
        ..AppConfig::default()
    };
    config.credentials.kakao_rest_api_key = Some("test-key".into());
    config.search.request_delay_ms = (0, 0);
    config.search.expansion_keywords = vec!["노포".into()];
    config
}

fn doc(name: &str, category: &str, id: u32) -> serde_json::Value {
    json!({
        "place_name": name,
        "category_name": category,
        "road_address_name": "대전 유성구 대학로 1",
        "place_url": format!("http://place.map.kakao.com/{id}"),
    })
}

#[tokio::test]
async fn search_then_export_writes_filtered_csv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .and(header("Authorization", "KakaoAK test-key"))
        .and(query_param("query", "유성구 맛집"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                doc("태평소국밥 본점", "음식점 > 한식 > 국밥", 1),
                doc("스타벅스 유성온천점", "음식점 > 카페", 2),
            ],
            "meta": {"is_end": true}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("query", "유성구 노포"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                doc("태평소국밥 본점", "음식점 > 한식 > 국밥", 1),
                doc("오씨칼국수", "음식점 > 한식 > 국수", 3),
            ],
            "meta": {"is_end": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let outcome = findfood::run_search(&config, "유성구", None, &CancellationToken::new())
        .await
        .expect("search");

    let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["태평소국밥 본점", "오씨칼국수"]);
    assert_eq!(outcome.stats.pooled, 4);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = export::default_export_path(Some(dir.path()), "유성구");
    export::export_csv(&path, &outcome.records, true).expect("export");

    let bytes = std::fs::read(&path).expect("read");
    assert!(bytes.starts_with(UTF8_BOM));
    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).expect("utf8");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("태평소국밥 본점,"));
    assert!(lines[1].ends_with(",맛집"));
    assert!(lines[2].ends_with(",노포"));
}

#[tokio::test]
async fn rejected_provider_yields_no_results_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let outcome = findfood::run_search(&config, "유성구", None, &CancellationToken::new())
        .await
        .expect("per-query failures are not errors");
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.stats.failures.len(), 2);
}

#[tokio::test]
async fn missing_key_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.credentials.kakao_rest_api_key = None;
    let result = findfood::run_search(&config, "유성구", None, &CancellationToken::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn shared_cache_avoids_repeat_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [doc("오씨칼국수", "음식점 > 한식 > 국수", 3)],
            "meta": {"is_end": true}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let cache = QueryCache::from_ttl_seconds(60);
    let cancel = CancellationToken::new();
    for _ in 0..3 {
        let outcome = findfood::run_search(&config, "유성구", cache.as_ref(), &cancel)
            .await
            .expect("search");
        assert_eq!(outcome.records.len(), 1);
    }
}
