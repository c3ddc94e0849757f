//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the search and item APIs and
//! run full crawls against an on-disk database.

use hn_crawl::config::{ApiConfig, Config, OutputConfig};
use hn_crawl::crawler::{Coordinator, CrawlRequest};
use hn_crawl::output::CrawlSummary;
use hn_crawl::state::{ItemKind, LedgerStatus};
use hn_crawl::storage::{ContentStore, CrawlLedger, RunLog, RunStatus};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        api: ApiConfig {
            search_endpoint: format!("{}/api/v1/search", server.uri()),
            item_endpoint: format!("{}/v0/item", server.uri()),
        },
        output: OutputConfig {
            database_path: dir.path().join("hn_data.db").to_string_lossy().into_owned(),
            artifact_dir: dir.path().to_string_lossy().into_owned(),
        },
        ..Config::default()
    }
}

fn request(page_count: u32) -> CrawlRequest {
    CrawlRequest {
        query: "rust".to_string(),
        days_ago: 30,
        page_count,
    }
}

async fn mount_search_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("query", "rust"))
        .and(query_param("tags", "story"))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_item(server: &MockServer, id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v0/item/{}.json", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts the single-story thread S1 -> {C1 -> C3, C2}
async fn mount_basic_thread(server: &MockServer) {
    mount_search_page(
        server,
        0,
        ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{"objectID": "S1", "title": "Rust", "children": ["C1", "C2"]}]
        })),
    )
    .await;
    mount_item(server, "C1", json!({"kids": ["C3"]})).await;
    mount_item(server, "C2", json!({})).await;
    mount_item(server, "C3", json!({})).await;
}

#[tokio::test]
async fn test_full_crawl_single_story() {
    let server = MockServer::start().await;
    mount_basic_thread(&server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&server, &dir);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run(&request(1)).await.expect("Crawl failed");

    assert_eq!(
        report.summary,
        CrawlSummary {
            stories: 1,
            comments: 3,
            scheduled: 0,
            completed: 4,
        }
    );

    let storage = coordinator.storage();
    for id in ["S1", "C1", "C2", "C3"] {
        assert!(storage.exists(id).unwrap(), "{} should be stored", id);
        assert_eq!(
            storage.get_entry(id).unwrap().unwrap().status,
            LedgerStatus::Successful,
            "{} should be successful",
            id
        );
    }
    assert_eq!(
        storage.get_item("S1").unwrap().unwrap().kind,
        ItemKind::Story
    );

    // Courtesy exports, one file per stored item
    assert!(dir.path().join("stories/S1.json").exists());
    for id in ["C1", "C2", "C3"] {
        assert!(dir.path().join(format!("comments/{}.json", id)).exists());
    }

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.counters.stories_stored, 1);
    assert_eq!(run.counters.comments_stored, 3);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let server = MockServer::start().await;
    mount_basic_thread(&server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");

    let first = {
        let mut coordinator =
            Coordinator::new(create_test_config(&server, &dir)).expect("Failed to create coordinator");
        let report = coordinator.run(&request(1)).await.expect("First crawl failed");
        let completed_at = coordinator
            .storage()
            .get_entry("C1")
            .unwrap()
            .unwrap()
            .completed_at;
        (report, completed_at)
    };
    let requests_after_first = server.received_requests().await.unwrap().len();

    let mut coordinator =
        Coordinator::new(create_test_config(&server, &dir)).expect("Failed to reopen coordinator");
    let second = coordinator.run(&request(1)).await.expect("Second crawl failed");

    assert_eq!(second.ingest.stories_stored, 0);
    assert_eq!(second.ingest.stories_skipped, 1);
    assert_eq!(second.drain.comments_stored, 0);
    assert_eq!(second.summary, first.0.summary);

    // Only the search page is requested again; no comment is re-fetched
    let requests_after_second = server.received_requests().await.unwrap().len();
    assert_eq!(requests_after_second, requests_after_first + 1);

    let entry = coordinator.storage().get_entry("C1").unwrap().unwrap();
    assert_eq!(entry.status, LedgerStatus::Successful);
    assert_eq!(entry.completed_at, first.1);
}

#[tokio::test]
async fn test_comment_cycle_terminates() {
    let server = MockServer::start().await;
    mount_search_page(
        &server,
        0,
        ResponseTemplate::new(200)
            .set_body_json(json!({"hits": [{"objectID": "S1", "children": ["A"]}]})),
    )
    .await;
    mount_item(&server, "A", json!({"kids": ["B"]})).await;
    mount_item(&server, "B", json!({"kids": ["A"]})).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut coordinator =
        Coordinator::new(create_test_config(&server, &dir)).expect("Failed to create coordinator");

    let report = coordinator.run(&request(1)).await.expect("Crawl failed");

    assert_eq!(report.drain.comments_stored, 2);
    assert_eq!(report.summary.comments, 2);
    assert_eq!(report.summary.scheduled, 0);
}

#[tokio::test]
async fn test_failed_page_does_not_block_later_pages() {
    let server = MockServer::start().await;
    mount_search_page(&server, 0, ResponseTemplate::new(503)).await;
    mount_search_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{"objectID": 101}, {"objectID": 102}]
        })),
    )
    .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut coordinator =
        Coordinator::new(create_test_config(&server, &dir)).expect("Failed to create coordinator");

    let report = coordinator.run(&request(2)).await.expect("Crawl failed");

    assert_eq!(report.ingest.pages_failed, 1);
    assert_eq!(report.ingest.stories_stored, 2);
    assert_eq!(report.summary.stories, 2);
    assert!(coordinator.storage().exists("101").unwrap());
}

#[tokio::test]
async fn test_failed_comment_is_retried_by_next_run() {
    let server = MockServer::start().await;
    mount_search_page(
        &server,
        0,
        ResponseTemplate::new(200)
            .set_body_json(json!({"hits": [{"objectID": "S1", "children": [1, 2]}]})),
    )
    .await;
    mount_item(&server, "1", json!({"id": 1})).await;
    Mock::given(method("GET"))
        .and(path("/v0/item/2.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");

    {
        let mut coordinator =
            Coordinator::new(create_test_config(&server, &dir)).expect("Failed to create coordinator");
        let report = coordinator.run(&request(1)).await.expect("First crawl failed");

        assert_eq!(report.drain.fetch_failures, 1);
        assert_eq!(report.summary.scheduled, 1);
        assert_eq!(
            coordinator.storage().list_scheduled(ItemKind::Comment).unwrap(),
            vec!["2"]
        );
    }

    // Upstream recovers, and comment 2 turns out to have a reply
    server.reset().await;
    mount_search_page(
        &server,
        0,
        ResponseTemplate::new(200)
            .set_body_json(json!({"hits": [{"objectID": "S1", "children": [1, 2]}]})),
    )
    .await;
    mount_item(&server, "2", json!({"id": 2, "kids": [3]})).await;
    mount_item(&server, "3", json!({"id": 3})).await;

    let mut coordinator =
        Coordinator::new(create_test_config(&server, &dir)).expect("Failed to reopen coordinator");
    let report = coordinator.run(&request(1)).await.expect("Second crawl failed");

    assert_eq!(report.drain.fetch_failures, 0);
    assert_eq!(report.drain.comments_stored, 2);
    assert_eq!(
        report.summary,
        CrawlSummary {
            stories: 1,
            comments: 3,
            scheduled: 0,
            completed: 4,
        }
    );
}
