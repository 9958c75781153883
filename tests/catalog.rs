//! Integration tests for the catalog over a fake HTTP server

use std::time::Duration;

use hospdash::config::ApiConfig;
use hospdash::data::{Catalog, DataError, DatasetKind, OrdsClient, PageRequest};
use hospdash::report::SummaryReport;
use hospdash::stats::TieBreak;
use mockito::{Matcher, Server, ServerGuard};
use secrecy::SecretString;
use serde_json::json;

fn catalog_for(server: &ServerGuard) -> Catalog {
    let config = ApiConfig {
        base_url: server.url(),
        username: "user".to_string(),
        password: SecretString::new("pass".to_string()),
        page_size: 100,
        max_records: None,
        request_timeout: Duration::from_secs(5),
    };
    let client = OrdsClient::new(&config).unwrap();
    Catalog::new(client, config.page_request(), Duration::from_secs(60))
}

#[tokio::test]
async fn test_fetch_all_isolates_endpoint_failures() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/vista_muy_interesante/")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    server
        .mock("GET", "/peso_vs_estancia/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "items": [
                    {"peso_espanol_apr": 0.5, "estancia_dias": 4},
                    {"peso_espanol_apr": "1.5", "estancia_dias": "8"},
                    {"peso_espanol_apr": null, "estancia_dias": 2}
                ],
                "hasMore": false
            })
            .to_string(),
        )
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    let bundle = catalog.fetch_all().await;

    assert_eq!(bundle.get(DatasetKind::WeightStay).len(), 2);
    assert!(matches!(
        bundle.error(DatasetKind::Diagnoses),
        Some(DataError::Status { status: 500, .. })
    ));
    // Unmocked endpoints answer 501
    assert!(bundle.error(DatasetKind::DiagnosisSex).is_some());
    assert!(bundle.error(DatasetKind::SeverityMortality).is_some());
    assert!(bundle.get(DatasetKind::Diagnoses).is_empty());
    assert!(!bundle.all_failed());
    assert_eq!(bundle.failures().len(), 3);

    let report = SummaryReport::new(&bundle, TieBreak::FirstSeen, chrono::Local::now()).to_string();
    assert!(report.contains("Diagnoses & demographics unavailable"));
}

#[tokio::test]
async fn test_second_fetch_is_served_from_cache() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/peso_vs_estancia/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"items": [{"peso_espanol_apr": 1.0, "estancia_dias": 3}], "hasMore": false}).to_string())
        .expect(1)
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    let first = catalog.fetch_weight_stay().await.unwrap();
    let second = catalog.fetch_weight_stay().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/peso_vs_estancia/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"items": [], "hasMore": false}).to_string())
        .expect(2)
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    catalog.fetch_weight_stay().await.unwrap();
    catalog.invalidate(Some(DatasetKind::WeightStay)).await;
    catalog.fetch_weight_stay().await.unwrap();

    mock.assert_async().await;
}

#[test]
fn test_page_request_follows_config() {
    let config = ApiConfig {
        base_url: "http://localhost".to_string(),
        username: "u".to_string(),
        password: SecretString::new("p".to_string()),
        page_size: 500,
        max_records: Some(1_000),
        request_timeout: Duration::from_secs(1),
    };
    assert_eq!(
        config.page_request(),
        PageRequest {
            limit: 500,
            max_records: Some(1_000)
        }
    );
}
