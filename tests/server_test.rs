//! HTTP server endpoint tests

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use brother_exporter::{
    client::{PrinterClient, STATUS_DOCUMENT_PATH},
    server::{create_router, AppState},
    target::{Target, TargetSource},
};
use mockito::Server;
use tower::ServiceExt;

/// Helper to create a router over the given target source
fn create_test_router(targets: TargetSource) -> axum::Router {
    let client = PrinterClient::new(5).unwrap();
    create_router(AppState::new(client, targets))
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = create_test_router(TargetSource::Query);

    let (status, _, body) = get(router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_root_endpoint_lists_metrics() {
    let router = create_test_router(TargetSource::Query);

    let (status, _, body) = get(router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/metrics?host="));
}

#[tokio::test]
async fn test_metrics_endpoint_static_mode() {
    let mut printer1 = Server::new_async().await;
    let mut printer2 = Server::new_async().await;

    let _mock1 = printer1
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Page Counter,Toner (%)\n12345,80\n")
        .create_async()
        .await;

    let _mock2 = printer2
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Page Counter,Toner (%)\n42,10.5\n")
        .create_async()
        .await;

    let host1 = printer1.host_with_port();
    let host2 = printer2.host_with_port();
    let router = create_test_router(TargetSource::fixed(vec![
        Target::parse(&host1).unwrap(),
        Target::parse(&host2).unwrap(),
    ]));

    let (status, content_type, metrics) = get(router, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(prometheus::TEXT_FORMAT));

    // Verify Prometheus format
    assert!(metrics.contains("# HELP brother_success"));
    assert!(metrics.contains("# TYPE brother_page_counter gauge"));

    assert!(metrics.contains(&format!(r#"brother_success{{host="{}"}} 1"#, host1)));
    assert!(metrics.contains(&format!(r#"brother_success{{host="{}"}} 1"#, host2)));
    assert!(metrics.contains(&format!(r#"brother_page_counter{{host="{}"}} 12345"#, host1)));
    assert!(metrics.contains(&format!(r#"brother_toner_percent{{host="{}"}} 10.5"#, host2)));
}

#[tokio::test]
async fn test_partial_failure_still_returns_ok() {
    let mut printer = Server::new_async().await;

    let _mock = printer
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Page Counter\n7\n")
        .create_async()
        .await;

    let host = printer.host_with_port();
    let router = create_test_router(TargetSource::fixed(vec![
        Target::parse("127.0.0.1:1").unwrap(),
        Target::parse(&host).unwrap(),
    ]));

    let (status, _, metrics) = get(router, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(metrics.contains(r#"brother_success{host="127.0.0.1:1"} 0"#));
    assert!(metrics.contains(&format!(r#"brother_success{{host="{}"}} 1"#, host)));
    assert!(metrics.contains(&format!(r#"brother_page_counter{{host="{}"}} 7"#, host)));
    assert!(!metrics.contains(r#"brother_page_counter{host="127.0.0.1:1"}"#));
}

#[tokio::test]
async fn test_all_printers_failing_still_returns_ok() {
    let mut printer = Server::new_async().await;

    let _mock = printer
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(500)
        .create_async()
        .await;

    let host = printer.host_with_port();
    let router = create_test_router(TargetSource::fixed(vec![Target::parse(&host).unwrap()]));

    let (status, _, metrics) = get(router, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(metrics.contains(&format!(r#"brother_success{{host="{}"}} 0"#, host)));
}

#[tokio::test]
async fn test_metrics_endpoint_query_mode() {
    let mut printer = Server::new_async().await;

    let mock = printer
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Total,Level%\n120,45.5\n")
        .create_async()
        .await;

    let host = printer.host_with_port();
    let router = create_test_router(TargetSource::Query);

    let (status, _, metrics) = get(router, &format!("/metrics?host={}", host)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(metrics.contains(&format!(r#"brother_success{{host="{}"}} 1"#, host)));
    assert!(metrics.contains(&format!(r#"brother_total{{host="{}"}} 120"#, host)));
    assert!(metrics.contains(&format!(r#"brother_level_percent{{host="{}"}} 45.5"#, host)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_host_returns_bad_request_without_fetching() {
    let mut printer = Server::new_async().await;

    let mock = printer
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Total\n1\n")
        .expect(0)
        .create_async()
        .await;

    let router = create_test_router(TargetSource::Query);
    let (status, _, body) = get(router.clone(), "/metrics").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Query parameter 'host' is required");

    let (status, _, _) = get(router, "/metrics?host=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_scrapes_are_isolated() {
    let mut printer = Server::new_async().await;

    let _mock = printer
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Page Counter\n500\n")
        .expect(2)
        .create_async()
        .await;

    let host = printer.host_with_port();
    let router = create_test_router(TargetSource::fixed(vec![Target::parse(&host).unwrap()]));

    let (first, second) = tokio::join!(
        get(router.clone(), "/metrics"),
        get(router, "/metrics")
    );

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);
    assert_eq!(first.2, second.2);

    let expected = format!(r#"brother_page_counter{{host="{}"}} 500"#, host);
    assert_eq!(first.2.matches(&expected).count(), 1);
}

#[tokio::test]
async fn test_success_column_does_not_fail_scrape() {
    let mut printer1 = Server::new_async().await;
    let mut printer2 = Server::new_async().await;

    let _mock1 = printer1
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Success,Total\n1,5\n")
        .create_async()
        .await;

    let _mock2 = printer2
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Total\n7\n")
        .create_async()
        .await;

    let host1 = printer1.host_with_port();
    let host2 = printer2.host_with_port();
    let router = create_test_router(TargetSource::fixed(vec![
        Target::parse(&host1).unwrap(),
        Target::parse(&host2).unwrap(),
    ]));

    let (status, _, metrics) = get(router, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(metrics.contains(&format!(r#"brother_success{{host="{}"}} 1"#, host1)));
    assert!(metrics.contains(&format!(r#"brother_total{{host="{}"}} 5"#, host1)));
    assert!(metrics.contains(&format!(r#"brother_success{{host="{}"}} 1"#, host2)));
    assert!(metrics.contains(&format!(r#"brother_total{{host="{}"}} 7"#, host2)));
}

#[tokio::test]
async fn test_static_mode_ignores_query_string() {
    let mut printer = Server::new_async().await;

    let _mock = printer
        .mock("GET", STATUS_DOCUMENT_PATH)
        .with_status(200)
        .with_body("Total\n3\n")
        .create_async()
        .await;

    let host = printer.host_with_port();
    let router = create_test_router(TargetSource::fixed(vec![Target::parse(&host).unwrap()]));

    let (status, _, metrics) = get(router, "/metrics?host=a&host=b").await;

    assert_eq!(status, StatusCode::OK);
    assert!(metrics.contains(&format!(r#"brother_total{{host="{}"}} 3"#, host)));
}
