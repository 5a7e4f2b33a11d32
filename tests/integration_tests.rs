//! Integration tests for the content service
//!
//! These drive the full axum router (source, ordering, resolution, cache)
//! against the bundled seed document.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use portfolio_content::cache::{CachePolicy, ResponseCache};
use portfolio_content::config::{Config, Environment};
use portfolio_content::delivery::ContentDelivery;
use portfolio_content::server::{router, AppState};
use portfolio_content::source::InMemorySource;

const SEED: &str = include_str!("../data/content.json");

// ==================== Test Helpers ====================

fn create_test_config(environment: &str) -> Config {
    let environment = environment.to_string();
    Config::from_lookup(move |key| match key {
        "ENVIRONMENT" => Some(environment.clone()),
        _ => None,
    })
    .expect("Default configuration should be valid")
}

fn create_app(environment: &str) -> Router {
    let config = create_test_config(environment);
    let registry = Arc::new(config.language_registry().unwrap());
    let source = InMemorySource::from_json_str(SEED, &registry).expect("Seed should load");
    let cache = Arc::new(ResponseCache::new(CachePolicy::from(&config)));

    router(AppState {
        delivery: Arc::new(ContentDelivery::new(Arc::new(source), registry, cache)),
        environment: config.environment,
    })
}

struct TestResponse {
    status: StatusCode,
    x_cache: Option<String>,
    content_language: Option<String>,
    cache_control: Option<String>,
    body: Value,
}

async fn send(app: &Router, uri: &str) -> TestResponse {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    };
    let x_cache = header("x-cache");
    let content_language = header("content-language");
    let cache_control = header("cache-control");
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        x_cache,
        content_language,
        cache_control,
        body: serde_json::from_slice(&bytes).unwrap(),
    }
}

// ==================== Caching Tests ====================

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let app = create_app("production");

    let first = send(&app, "/api/v1/projects?lang=es").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.x_cache.as_deref(), Some("MISS"));

    let second = send(&app, "/api/v1/projects?lang=es").await;
    assert_eq!(second.x_cache.as_deref(), Some("HIT"));
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_languages_do_not_share_entries() {
    let app = create_app("production");

    let en = send(&app, "/api/v1/about?lang=en").await;
    let es = send(&app, "/api/v1/about?lang=es").await;

    assert_eq!(es.x_cache.as_deref(), Some("MISS"));
    assert_eq!(en.body["title"], "About me");
    assert_eq!(es.body["title"], "Sobre mí");
    assert_eq!(es.content_language.as_deref(), Some("es"));
}

#[tokio::test]
async fn test_unsupported_language_uses_default_entry() {
    let app = create_app("production");

    send(&app, "/api/v1/contact?lang=en").await;
    let fr = send(&app, "/api/v1/contact?lang=fr").await;

    assert_eq!(fr.x_cache.as_deref(), Some("HIT"));
    assert_eq!(fr.body["language"], "en");
    assert_eq!(fr.content_language.as_deref(), Some("en"));
}

#[tokio::test]
async fn test_language_code_is_case_insensitive() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/about?lang=ES").await;
    assert_eq!(response.body["language"], "es");
}

#[tokio::test]
async fn test_missing_lang_uses_default() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/about").await;
    assert_eq!(response.body["language"], "en");
}

#[tokio::test]
async fn test_cache_control_reflects_ttl_class() {
    let app = create_app("production");

    let content = send(&app, "/api/v1/skills").await;
    assert_eq!(content.cache_control.as_deref(), Some("public, max-age=300"));

    let site = send(&app, "/api/v1/site-config").await;
    assert_eq!(site.cache_control.as_deref(), Some("public, max-age=3600"));
}

#[tokio::test]
async fn test_cache_hit_never_advertises_more_than_ttl() {
    let app = create_app("production");

    send(&app, "/api/v1/projects").await;
    let hit = send(&app, "/api/v1/projects").await;
    assert_eq!(hit.x_cache.as_deref(), Some("HIT"));

    let max_age: u64 = hit
        .cache_control
        .as_deref()
        .and_then(|v| v.strip_prefix("public, max-age="))
        .and_then(|v| v.parse().ok())
        .expect("cache-control should carry max-age");
    assert!(max_age <= 300);
    assert!(max_age >= 290);
}

#[tokio::test]
async fn test_development_bypasses_cache() {
    let app = create_app("development");

    for _ in 0..2 {
        let response = send(&app, "/api/v1/skills?lang=es").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.x_cache.as_deref(), Some("BYPASS"));
        assert!(response.cache_control.is_none());
    }
}

// ==================== Resolution Tests ====================

#[tokio::test]
async fn test_missing_translation_falls_back_to_default() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/skills?lang=es").await;
    let writing = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .find(|skill| skill["id"] == 3)
        .unwrap();

    assert_eq!(writing["name"], "Technical writing");
    assert_eq!(writing["available_languages"], serde_json::json!(["en"]));
}

#[tokio::test]
async fn test_available_languages_requires_every_field() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/projects/2?lang=es").await;
    assert_eq!(response.body["title"], "Resumen de noticias");
    assert_eq!(response.body["description"], "Scheduled digest of followed feeds.");
    assert_eq!(response.body["available_languages"], serde_json::json!(["en"]));
}

#[tokio::test]
async fn test_suffixed_variants_are_not_exposed() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/projects/1?lang=es").await;
    assert!(response.body.get("title_en").is_none());
    assert!(response.body.get("title_es").is_none());
    assert_eq!(response.body["technologies"], serde_json::json!(["rust", "axum", "tokio"]));
}

// ==================== Ordering Tests ====================

#[tokio::test]
async fn test_experience_is_in_timeline_order() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/experience?lang=en").await;
    let items = response.body.as_array().unwrap();
    let ids: Vec<i64> = items.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![3, 1, 2]);

    assert_eq!(items[0]["start_date"], "2023/01/01");
    assert!(items[0]["end_date"].is_null());
    assert_eq!(items[2]["end_date"], "2021/06/30");
}

#[tokio::test]
async fn test_undated_resources_have_no_date_keys() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/projects/1").await;
    assert!(response.body.get("start_date").is_none());
    assert!(response.body.get("end_date").is_none());
}

#[tokio::test]
async fn test_undated_collections_follow_display_order() {
    let app = create_app("production");

    let ids = |body: &Value| -> Vec<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap())
            .collect()
    };

    let projects = send(&app, "/api/v1/projects").await;
    assert_eq!(ids(&projects.body), vec![2, 1]);

    // The unnumbered skill goes last
    let skills = send(&app, "/api/v1/skills").await;
    assert_eq!(ids(&skills.body), vec![2, 1, 3]);
}

// ==================== Error Tests ====================

#[tokio::test]
async fn test_unknown_resource_is_not_found() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/blog").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body["detail"].as_str().unwrap().contains("blog"));
}

#[tokio::test]
async fn test_unknown_record_is_not_found() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/experience/99").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_integer_id_is_bad_request() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/projects/abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_id_on_single_record_resource_is_bad_request() {
    let app = create_app("production");

    let response = send(&app, "/api/v1/about/1").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ==================== Health Tests ====================

#[tokio::test]
async fn test_health_reports_cache_stats() {
    let app = create_app("production");

    send(&app, "/api/v1/education").await;
    send(&app, "/api/v1/education").await;

    let health = send(&app, "/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
    assert_eq!(health.body["environment"], "production");
    assert_eq!(health.body["cache"]["hits"], 1);
    assert_eq!(health.body["cache"]["misses"], 1);
    assert_eq!(health.body["cache"]["entries"], 1);
}

// ==================== Config Tests ====================

#[test]
fn test_default_ttls() {
    let config = create_test_config("production");
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.cache_ttl_content, Duration::from_secs(300));
    assert_eq!(config.cache_ttl_static, Duration::from_secs(3600));
}
