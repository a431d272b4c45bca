//! Integration tests for the full lookup pipeline.
//!
//! Both catalogs are replaced by local mock servers, so these exercise the
//! real fetcher, schedulers, adapters, scoring and selection without touching
//! the network. Live catalog tests are marked `#[ignore]`.

use musicdb_lookup::{LookupConfig, LookupOrchestrator, Query, RateLimitPolicy, SourceId};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JWID_HIT: &str = r#"<html><body>
<table class="search-results">
  <tr class="result">
    <td class="title">Sample Song</td>
    <td class="artist">Artist X</td>
    <td class="workcode">1234-5678</td>
    <td class="bpm">128</td>
    <td class="key">F#m</td>
    <td><a class="detail" href="/eJwid/work/12345678">詳細</a></td>
  </tr>
</table>
</body></html>"#;

const NEXTONE_HIT: &str = r#"<html><body>
<div class="result-item">
  <a href="/detail/N99"><span class="title">Sample Song</span></a>
  <span class="artist">Artist X</span>
  <span class="bpm">127</span>
</div>
</body></html>"#;

const EMPTY_PAGE: &str = "<html><body><p>該当する作品はありません</p></body></html>";

fn fast_policy() -> RateLimitPolicy {
    RateLimitPolicy {
        min_time_ms: 0,
        reservoir: 100,
        refresh_interval_ms: 60_000,
    }
}

fn config_for(jwid: &MockServer, nextone: &MockServer) -> LookupConfig {
    let mut config = LookupConfig {
        timeout_seconds: 2,
        ..Default::default()
    };
    config.jwid.base_url = Some(format!("{}/eJwid/main", jwid.uri()));
    config.jwid.rate_limit = fast_policy();
    config.nextone.base_url = Some(format!("{}/search", nextone.uri()));
    config.nextone.rate_limit = fast_policy();
    config
}

async fn serve(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn authoritative_hit_with_code_end_to_end() {
    let jwid = MockServer::start().await;
    let nextone = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eJwid/main"))
        .and(query_param("title", "Sample Song"))
        .and(query_param("artist", "Artist X"))
        .respond_with(ResponseTemplate::new(200).set_body_string(JWID_HIT))
        .expect(1)
        .mount(&jwid)
        .await;
    serve(&nextone, "/search", 200, EMPTY_PAGE).await;

    let orchestrator =
        LookupOrchestrator::from_config(&config_for(&jwid, &nextone)).expect("valid config");
    let result = orchestrator
        .lookup(&Query::new("Sample Song", Some("Artist X")))
        .await
        .expect("J-WID hit should be selected");

    assert_eq!(result.work_code.as_ref().map(|c| c.as_str()), Some("123-4567-8"));
    assert_eq!(result.confidence, 100);
    assert_eq!(result.provenance.source, SourceId::Jwid);
    assert_eq!(
        result.provenance.url,
        format!("{}/eJwid/work/12345678", jwid.uri())
    );
    assert_eq!(result.bpm.as_deref(), Some("128"));
    assert_eq!(result.key.as_deref(), Some("F#m"));
}

#[tokio::test]
async fn code_bearing_hit_outranks_codeless_tie_on_text() {
    let jwid = MockServer::start().await;
    let nextone = MockServer::start().await;
    serve(&jwid, "/eJwid/main", 200, JWID_HIT).await;
    serve(&nextone, "/search", 200, NEXTONE_HIT).await;

    let orchestrator =
        LookupOrchestrator::from_config(&config_for(&jwid, &nextone)).expect("valid config");
    let result = orchestrator
        .lookup(&Query::new("sample song", Some("artist x")))
        .await
        .expect("should match");

    assert_eq!(result.provenance.source, SourceId::Jwid);
    assert_eq!(result.bpm.as_deref(), Some("128"));
}

#[tokio::test]
async fn failing_catalog_is_absorbed() {
    let jwid = MockServer::start().await;
    let nextone = MockServer::start().await;
    serve(&jwid, "/eJwid/main", 503, "maintenance").await;
    serve(&nextone, "/search", 200, NEXTONE_HIT).await;

    let orchestrator =
        LookupOrchestrator::from_config(&config_for(&jwid, &nextone)).expect("valid config");
    let result = orchestrator
        .lookup(&Query::new("Sample Song", Some("Artist X")))
        .await
        .expect("NexTone should still answer");

    assert_eq!(result.provenance.source, SourceId::NexTone);
    assert_eq!(result.provenance.url, format!("{}/detail/N99", nextone.uri()));
    assert!(result.work_code.is_none());
    // Non-authoritative, score 85 > 70.
    assert_eq!(result.confidence, 85);
}

#[tokio::test]
async fn both_catalogs_down_is_no_match() {
    let jwid = MockServer::start().await;
    let nextone = MockServer::start().await;
    serve(&jwid, "/eJwid/main", 500, "").await;
    serve(&nextone, "/search", 404, "").await;

    let orchestrator =
        LookupOrchestrator::from_config(&config_for(&jwid, &nextone)).expect("valid config");
    let result = orchestrator.lookup(&Query::new("Sample Song", None)).await;
    assert!(result.is_none());
}

#[tokio::test]
async fn empty_pages_are_no_match() {
    let jwid = MockServer::start().await;
    let nextone = MockServer::start().await;
    serve(&jwid, "/eJwid/main", 200, EMPTY_PAGE).await;
    serve(&nextone, "/search", 200, EMPTY_PAGE).await;

    let orchestrator =
        LookupOrchestrator::from_config(&config_for(&jwid, &nextone)).expect("valid config");
    assert!(orchestrator.lookup(&Query::new("Sample Song", None)).await.is_none());
}

#[tokio::test]
async fn orchestrator_is_reusable_across_lookups() {
    let jwid = MockServer::start().await;
    let nextone = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eJwid/main"))
        .respond_with(ResponseTemplate::new(200).set_body_string(JWID_HIT))
        .expect(3)
        .mount(&jwid)
        .await;
    serve(&nextone, "/search", 200, EMPTY_PAGE).await;

    let orchestrator =
        LookupOrchestrator::from_config(&config_for(&jwid, &nextone)).expect("valid config");
    for _ in 0..3 {
        let result = orchestrator.lookup(&Query::new("Sample Song", None)).await;
        assert!(result.is_some());
    }
}

#[tokio::test]
async fn result_serializes_for_persistence() {
    let jwid = MockServer::start().await;
    let nextone = MockServer::start().await;
    serve(&jwid, "/eJwid/main", 200, JWID_HIT).await;
    serve(&nextone, "/search", 200, EMPTY_PAGE).await;

    let orchestrator =
        LookupOrchestrator::from_config(&config_for(&jwid, &nextone)).expect("valid config");
    let result = orchestrator
        .lookup(&Query::new("Sample Song", Some("Artist X")))
        .await
        .expect("should match");

    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["work_code"], "123-4567-8");
    assert_eq!(value["provenance"]["source"], "J-WID");
    let fetched_at = value["provenance"]["fetched_at"].as_str().expect("timestamp string");
    assert_eq!(fetched_at.len(), "2026-01-02T03:04:05.000Z".len(), "{fetched_at}");
    let parsed = chrono::DateTime::parse_from_rfc3339(fetched_at).expect("RFC 3339 timestamp");
    assert_eq!(parsed.with_timezone(&chrono::Utc), result.provenance.fetched_at);
}

#[tokio::test]
#[ignore] // Live test: run with `cargo test -- --ignored`
async fn live_lookup_completes() {
    let orchestrator =
        LookupOrchestrator::from_config(&LookupConfig::default()).expect("default config");
    // Selectors may not match the live markup; only completion is asserted.
    let _ = orchestrator.lookup(&Query::new("夜に駆ける", Some("YOASOBI"))).await;
}
