//! Integration tests for `PaginationDriver`.
//!
//! Each test stands up a `wiremock` server playing the display API, so no
//! real network traffic is made. Pacing is disabled except in the pacing
//! section, which uses a fixed window and measures wall-clock time.

use std::time::{Duration, Instant};

use adscout_core::HeaderProfile;
use adscout_scraper::{AdsClient, Pacer, PaginationDriver, StopReason};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/api/v1/laptop";

fn test_client(server: &MockServer) -> AdsClient {
    AdsClient::new(&format!("{}/api/v1", server.uri()), 5).expect("failed to build test AdsClient")
}

/// Payload with `count` products whose ids are `p<page>-<n>`.
fn page_json(page: u32, count: usize) -> serde_json::Value {
    let products: Vec<serde_json::Value> = (1..=count)
        .map(|n| {
            json!({
                "productId": format!("p{page}-{n}"),
                "name": format!("Laptop {page}-{n}"),
                "price": { "value": 1000.0 * f64::from(page) },
                "originalPrice": { "value": 1200.0 * f64::from(page) }
            })
        })
        .collect();
    json!({ "ads": [{ "products": products }] })
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", page.to_string()))
        .and(query_param("platform", "desktop"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collects_every_page_in_order() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(
            &server,
            page,
            ResponseTemplate::new(200).set_body_json(page_json(page, 2)),
            1,
        )
        .await;
    }

    let client = test_client(&server);
    let driver = PaginationDriver::new(&client, Pacer::disabled(), 3);
    let report = driver.run(&HeaderProfile::simple(), "laptop", 3).await;

    assert_eq!(report.stop, StopReason::PageBudgetExhausted);
    assert_eq!(report.pages_requested, 3);
    assert_eq!(report.failed_pages, 0);
    let ids: Vec<&str> = report.records.iter().map(|r| r.product_id()).collect();
    assert_eq!(ids, ["p1-1", "p1-2", "p2-1", "p2-2", "p3-1", "p3-2"]);
    let pages: Vec<u32> = report.records.iter().map(|r| r.scraped_page()).collect();
    assert_eq!(pages, [1, 1, 2, 2, 3, 3]);
}

#[tokio::test]
async fn sends_profile_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(wiremock::matchers::header("x-probe", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(1, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let profile = HeaderProfile::simple().with_header("x-probe", "yes");
    let report = PaginationDriver::new(&client, Pacer::disabled(), 3)
        .run(&profile, "laptop", 1)
        .await;

    assert_eq!(report.records.len(), 1);
}

// ---------------------------------------------------------------------------
// Termination rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_page_four_of_ten_stops_pagination() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(
            &server,
            page,
            ResponseTemplate::new(200).set_body_json(page_json(page, 1)),
            1,
        )
        .await;
    }
    mount_page(
        &server,
        4,
        ResponseTemplate::new(200).set_body_json(json!({ "ads": [] })),
        1,
    )
    .await;
    for page in 5..=10 {
        mount_page(
            &server,
            page,
            ResponseTemplate::new(200).set_body_json(page_json(page, 1)),
            0,
        )
        .await;
    }

    let client = test_client(&server);
    let report = PaginationDriver::new(&client, Pacer::disabled(), 3)
        .run(&HeaderProfile::simple(), "laptop", 10)
        .await;

    assert_eq!(report.stop, StopReason::EndOfListing { page: 4 });
    assert_eq!(report.pages_requested, 4);
    assert_eq!(report.failed_pages, 0);
    let pages: Vec<u32> = report.records.iter().map(|r| r.scraped_page()).collect();
    assert_eq!(pages, [1, 2, 3]);
}

#[tokio::test]
async fn forbidden_aborts_and_keeps_earlier_records() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(page_json(1, 2)),
        1,
    )
    .await;
    mount_page(&server, 2, ResponseTemplate::new(403), 1).await;
    mount_page(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(page_json(3, 2)),
        0,
    )
    .await;

    let client = test_client(&server);
    let report = PaginationDriver::new(&client, Pacer::disabled(), 3)
        .run(&HeaderProfile::simple(), "laptop", 3)
        .await;

    assert_eq!(report.stop, StopReason::Blocked { page: 2 });
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.pages_requested, 2);
}

#[tokio::test]
async fn three_consecutive_failures_abort_after_the_third() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(page_json(1, 1)),
        1,
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200).set_body_json(page_json(2, 1)),
        1,
    )
    .await;
    mount_page(&server, 3, ResponseTemplate::new(500), 1).await;
    mount_page(&server, 4, ResponseTemplate::new(502), 1).await;
    mount_page(&server, 5, ResponseTemplate::new(429), 1).await;
    mount_page(
        &server,
        6,
        ResponseTemplate::new(200).set_body_json(page_json(6, 1)),
        0,
    )
    .await;

    let client = test_client(&server);
    let report = PaginationDriver::new(&client, Pacer::disabled(), 3)
        .run(&HeaderProfile::simple(), "laptop", 8)
        .await;

    assert_eq!(report.stop, StopReason::TooManyFailures { page: 5 });
    assert_eq!(report.pages_requested, 5);
    assert_eq!(report.failed_pages, 3);
    let pages: Vec<u32> = report.records.iter().map(|r| r.scraped_page()).collect();
    assert_eq!(pages, [1, 2]);
}

#[tokio::test]
async fn success_resets_the_failure_counter() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(500), 1).await;
    mount_page(&server, 2, ResponseTemplate::new(500), 1).await;
    mount_page(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(page_json(3, 1)),
        1,
    )
    .await;
    mount_page(&server, 4, ResponseTemplate::new(500), 1).await;
    mount_page(&server, 5, ResponseTemplate::new(500), 1).await;

    let client = test_client(&server);
    let report = PaginationDriver::new(&client, Pacer::disabled(), 3)
        .run(&HeaderProfile::simple(), "laptop", 5)
        .await;

    assert_eq!(report.stop, StopReason::PageBudgetExhausted);
    assert_eq!(report.failed_pages, 4);
    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn malformed_body_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let report = PaginationDriver::new(&client, Pacer::disabled(), 2)
        .run(&HeaderProfile::simple(), "laptop", 10)
        .await;

    assert_eq!(report.stop, StopReason::TooManyFailures { page: 2 });
    assert!(report.records.is_empty());
}

#[tokio::test]
async fn transport_errors_count_as_failures() {
    // Nothing listens on the address once the server is dropped.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let client = AdsClient::new(&format!("{uri}/api/v1"), 2).unwrap();
    let report = PaginationDriver::new(&client, Pacer::disabled(), 3)
        .run(&HeaderProfile::simple(), "laptop", 10)
        .await;

    assert_eq!(report.stop, StopReason::TooManyFailures { page: 3 });
    assert_eq!(report.pages_requested, 3);
    assert!(report.records.is_empty());
}

#[tokio::test]
async fn zero_pages_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let report = PaginationDriver::new(&client, Pacer::disabled(), 3)
        .run(&HeaderProfile::simple(), "laptop", 0)
        .await;

    assert_eq!(report.stop, StopReason::PageBudgetExhausted);
    assert_eq!(report.pages_requested, 0);
}

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

const PAUSE_MS: u64 = 300;

fn paced_driver(client: &AdsClient) -> PaginationDriver<'_> {
    PaginationDriver::new(client, Pacer::new(PAUSE_MS, PAUSE_MS), 3)
}

/// Elapsed time must cover exactly `pauses` fixed pauses and no more.
fn assert_paused(elapsed: Duration, pauses: u64) {
    let floor = Duration::from_millis(PAUSE_MS * pauses);
    let ceiling = Duration::from_millis(PAUSE_MS * (pauses + 1));
    assert!(elapsed >= floor, "{elapsed:?} shorter than {pauses} pauses");
    assert!(elapsed < ceiling, "{elapsed:?} suggests more than {pauses} pauses");
}

#[tokio::test]
async fn pauses_only_between_requests() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(
            &server,
            page,
            ResponseTemplate::new(200).set_body_json(page_json(page, 1)),
            1,
        )
        .await;
    }

    let client = test_client(&server);
    let started = Instant::now();
    let report = paced_driver(&client)
        .run(&HeaderProfile::simple(), "laptop", 3)
        .await;

    assert_eq!(report.pages_requested, 3);
    assert_paused(started.elapsed(), 2);
}

#[tokio::test]
async fn forbidden_first_page_never_pauses() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(403), 1).await;

    let client = test_client(&server);
    let started = Instant::now();
    let report = paced_driver(&client)
        .run(&HeaderProfile::simple(), "laptop", 5)
        .await;

    assert_eq!(report.stop, StopReason::Blocked { page: 1 });
    assert_eq!(report.pages_requested, 1);
    assert_paused(started.elapsed(), 0);
}

#[tokio::test]
async fn end_of_listing_stops_without_trailing_pause() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(page_json(1, 1)),
        1,
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200).set_body_json(page_json(2, 0)),
        1,
    )
    .await;

    let client = test_client(&server);
    let started = Instant::now();
    let report = paced_driver(&client)
        .run(&HeaderProfile::simple(), "laptop", 5)
        .await;

    assert_eq!(report.stop, StopReason::EndOfListing { page: 2 });
    assert_paused(started.elapsed(), 1);
}

#[tokio::test]
async fn rotating_run_pauses_between_requests_only() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(&server, page, ResponseTemplate::new(500), 1).await;
    }

    let client = test_client(&server);
    let base = HeaderProfile::new("rotating", vec![("user-agent".into(), "rotating".into())]);
    let sessions = client.open_sessions(&base, 2).unwrap();
    let started = Instant::now();
    let report = paced_driver(&client)
        .run_rotating(&sessions, "laptop", 3)
        .await;

    assert_eq!(report.pages_requested, 3);
    assert_paused(started.elapsed(), 2);
}

// ---------------------------------------------------------------------------
// Rotating sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rotating_run_ignores_failures_and_rotates_sessions() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(page_json(1, 1)),
        1,
    )
    .await;
    mount_page(&server, 2, ResponseTemplate::new(403), 1).await;
    mount_page(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(json!({ "ads": [] })),
        1,
    )
    .await;
    mount_page(&server, 4, ResponseTemplate::new(500), 1).await;
    mount_page(
        &server,
        5,
        ResponseTemplate::new(200).set_body_json(page_json(5, 2)),
        1,
    )
    .await;

    let client = test_client(&server);
    let base = HeaderProfile::new("probe", vec![("user-agent".into(), "probe".into())]);
    let sessions = client.open_sessions(&base, 2).unwrap();
    let report = PaginationDriver::new(&client, Pacer::disabled(), 1)
        .run_rotating(&sessions, "laptop", 5)
        .await;

    assert_eq!(report.stop, StopReason::PageBudgetExhausted);
    assert_eq!(report.pages_requested, 5);
    assert_eq!(report.failed_pages, 2);
    let pages: Vec<u32> = report.records.iter().map(|r| r.scraped_page()).collect();
    assert_eq!(pages, [1, 5, 5]);

    let agents: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|req| {
            req.headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned()
        })
        .collect();
    assert_eq!(
        agents,
        [
            "probe Session-1",
            "probe Session-2",
            "probe Session-1",
            "probe Session-2",
            "probe Session-1",
        ]
    );
}

#[tokio::test]
async fn rotating_run_without_sessions_is_empty() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    let report = PaginationDriver::new(&client, Pacer::disabled(), 3)
        .run_rotating(&[], "laptop", 4)
        .await;
    assert_eq!(report.pages_requested, 0);
    assert!(report.records.is_empty());
}
