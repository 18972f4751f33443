//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the talk site and exercise the
//! HTTP renderer and SQLite store end-to-end.

use talk_harvest::config::{
    default_talk_link_selector, Config, CrawlerConfig, OutputConfig, UserAgentConfig,
};
use talk_harvest::crawler::{run_crawl, CrawlDriver, CrawlPlan};
use talk_harvest::renderer::HttpRenderer;
use talk_harvest::storage::{RecordStore, RunStatus, SqliteStorage};
use talk_harvest::HarvestError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            listing_url: format!("{}/talks", base_url),
            page_param: "page".to_string(),
            talk_link_selector: default_talk_link_selector(),
            max_pages: None,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn listing_body(slugs: &[&str]) -> String {
    let cards: String = slugs
        .iter()
        .map(|s| format!(r#"<div class="talk-link"><a href="/talks/{}">{}</a></div>"#, s, s))
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

fn detail_body(title: &str, author: Option<&str>, keywords: &str, media: &str) -> String {
    let author = author
        .map(|a| format!(r#"<meta name="author" content="{}">"#, a))
        .unwrap_or_default();
    format!(
        r#"<html><head>
            <meta property="og:title" content="{}">
            {}
            <meta name="keywords" content="{}">
        </head><body>
            <button>Share</button>
            <a href="{}">Download audio</a>
        </body></html>"#,
        title, author, keywords, media
    )
}

async fn mount_listing(server: &MockServer, page: &str, slugs: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/talks"))
        .and(query_param("page", page))
        .respond_with(html(listing_body(slugs)))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, slug: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/talks/{}", slug)))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_stops_at_empty_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_listing(&server, "1", &["alpha", "beta"]).await;
    mount_listing(&server, "2", &["gamma"]).await;
    mount_listing(&server, "3", &[]).await;

    // Page 4 must never be requested
    Mock::given(method("GET"))
        .and(path("/talks"))
        .and(query_param("page", "4"))
        .respond_with(html(listing_body(&["never"])))
        .expect(0)
        .mount(&server)
        .await;

    for slug in ["alpha", "beta", "gamma"] {
        mount_detail(
            &server,
            slug,
            detail_body(
                slug,
                Some("Speaker"),
                "design, technology, innovation",
                &format!("{}/media/{}.mp3?token=abc&ts=456", base, slug),
            ),
        )
        .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("talks.db");
    let config = create_test_config(&base, db_path.to_str().unwrap());

    let stats = run_crawl(&config, "test-hash").await.expect("Crawl failed");
    assert_eq!(stats.pages_visited, 3);
    assert_eq!(stats.items_found, 3);
    assert_eq!(stats.items_stored, 3);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_talks().unwrap(), 3);

    let alpha = storage
        .get_talk(&format!("{}/media/alpha.mp3", base))
        .unwrap()
        .expect("alpha stored under its canonical url");
    assert_eq!(alpha.title.as_deref(), Some("alpha"));
    assert_eq!(alpha.author.as_deref(), Some("Speaker"));
    assert_eq!(alpha.keywords, vec!["design", "technology", "innovation"]);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");
    assert_eq!(run.items_stored, 3);
}

#[tokio::test]
async fn test_item_isolation() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_listing(&server, "1", &["one", "two", "three"]).await;
    mount_listing(&server, "2", &[]).await;

    mount_detail(
        &server,
        "one",
        detail_body("One", Some("A"), "x", &format!("{}/media/one.mp3", base)),
    )
    .await;
    // No share control on item two
    mount_detail(
        &server,
        "two",
        format!(
            r#"<html><body><a href="{}/media/two.mp3">Download audio</a></body></html>"#,
            base
        ),
    )
    .await;
    mount_detail(
        &server,
        "three",
        detail_body("Three", Some("C"), "z", &format!("{}/media/three.mp3", base)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("talks.db");
    let config = create_test_config(&base, db_path.to_str().unwrap());

    let stats = run_crawl(&config, "hash").await.unwrap();
    assert_eq!(stats.items_stored, 2);
    assert_eq!(stats.items_failed, 1);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert!(storage
        .get_talk(&format!("{}/media/one.mp3", base))
        .unwrap()
        .is_some());
    assert!(storage
        .get_talk(&format!("{}/media/two.mp3", base))
        .unwrap()
        .is_none());
    assert!(storage
        .get_talk(&format!("{}/media/three.mp3", base))
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_missing_detail_page_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_listing(&server, "1", &["missing", "present"]).await;
    mount_listing(&server, "2", &[]).await;
    Mock::given(method("GET"))
        .and(path("/talks/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_detail(
        &server,
        "present",
        detail_body("Present", None, "a", &format!("{}/media/present.mp4", base)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("talks.db");
    let config = create_test_config(&base, db_path.to_str().unwrap());

    let stats = run_crawl(&config, "hash").await.unwrap();
    assert_eq!(stats.items_failed, 1);
    assert_eq!(stats.items_stored, 1);

    let storage = SqliteStorage::new(&db_path).unwrap();
    let present = storage
        .get_talk(&format!("{}/media/present.mp4", base))
        .unwrap()
        .unwrap();
    assert_eq!(present.author, None);
    assert_eq!(present.title.as_deref(), Some("Present"));
}

#[tokio::test]
async fn test_listing_failure_aborts_and_records_failed_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_listing(&server, "1", &["one"]).await;
    mount_detail(
        &server,
        "one",
        detail_body("One", None, "", &format!("{}/media/one.mp3", base)),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/talks"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("talks.db");
    let config = create_test_config(&base, db_path.to_str().unwrap());

    let result = run_crawl(&config, "hash").await;
    assert!(matches!(result, Err(HarvestError::Navigation { .. })));

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_talks().unwrap(), 1);
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(run.pages_visited, 1);
}

#[tokio::test]
async fn test_rerun_does_not_duplicate() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_listing(&server, "1", &["one"]).await;
    mount_listing(&server, "2", &[]).await;
    mount_detail(
        &server,
        "one",
        detail_body(
            "One",
            Some("A"),
            "k1, k2",
            &format!("{}/media/one.mp3?token=first", base),
        ),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("talks.db");
    let config = create_test_config(&base, db_path.to_str().unwrap());

    run_crawl(&config, "hash").await.unwrap();
    run_crawl(&config, "hash").await.unwrap();

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_talks().unwrap(), 1);
}

#[tokio::test]
async fn test_query_variants_collapse_to_one_record() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_listing(&server, "1", &["first", "second"]).await;
    mount_listing(&server, "2", &[]).await;
    // Two listing entries serving the same media file with different tokens
    mount_detail(
        &server,
        "first",
        detail_body("Old title", Some("A"), "a", &format!("{}/media/same.mp3?token=1", base)),
    )
    .await;
    mount_detail(
        &server,
        "second",
        detail_body("New title", Some("B"), "b", &format!("{}/media/same.mp3?token=2", base)),
    )
    .await;

    let plan = CrawlPlan::from_config(&create_test_config(&base, ":memory:").crawler).unwrap();
    let user_agent = create_test_config(&base, ":memory:").user_agent;
    let renderer = HttpRenderer::new(&user_agent, 5).unwrap();
    let store = SqliteStorage::new_in_memory().unwrap();

    let mut driver = CrawlDriver::new(renderer, store, plan);
    let stats = driver.run().await.unwrap();
    assert_eq!(stats.items_stored, 2);

    let store = driver.store();
    assert_eq!(store.count_talks().unwrap(), 1);
    let stored = store
        .get_talk(&format!("{}/media/same.mp3", base))
        .unwrap()
        .unwrap();
    assert_eq!(stored.title.as_deref(), Some("New title"));
    assert_eq!(stored.author.as_deref(), Some("B"));
    assert_eq!(stored.keywords, vec!["b"]);
}

#[tokio::test]
async fn test_max_pages_ceiling() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_listing(&server, "1", &["one"]).await;
    Mock::given(method("GET"))
        .and(path("/talks"))
        .and(query_param("page", "2"))
        .respond_with(html(listing_body(&["two"])))
        .expect(0)
        .mount(&server)
        .await;
    mount_detail(
        &server,
        "one",
        detail_body("One", None, "", &format!("{}/media/one.mp3", base)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("talks.db");
    let mut config = create_test_config(&base, db_path.to_str().unwrap());
    config.crawler.max_pages = Some(1);

    let stats = run_crawl(&config, "hash").await.unwrap();
    assert_eq!(stats.pages_visited, 1);
    assert_eq!(stats.items_stored, 1);
}
