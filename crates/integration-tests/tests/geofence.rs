//! Integration tests for the geofencing gate.
//!
//! These tests require a running site (cargo run -p fotoceramica-site).
//! The gate reads the same proxy header on every route, so /health is a
//! convenient probe.

use reqwest::{Client, StatusCode};

use fotoceramica_integration_tests::site_base_url;

const COUNTRY_HEADER: &str = "cf-ipcountry";

#[tokio::test]
#[ignore = "Requires a running site"]
async fn denylisted_country_is_rejected_on_every_route() {
    let client = Client::new();
    let base_url = site_base_url();

    for path in ["/health", "/api/blog", "/api/checkout"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .header(COUNTRY_HEADER, "NG")
            .send()
            .await
            .expect("Failed to reach site");

        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "path {path}");
        let body = resp.text().await.expect("Failed to read body");
        assert_eq!(body, "Access denied");
    }
}

#[tokio::test]
#[ignore = "Requires a running site"]
async fn allowed_country_reaches_the_handler() {
    let client = Client::new();
    let base_url = site_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .header(COUNTRY_HEADER, "IT")
        .send()
        .await
        .expect("Failed to reach site");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires a running site"]
async fn missing_country_header_is_allowed() {
    let client = Client::new();
    let base_url = site_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach site");

    assert_eq!(resp.status(), StatusCode::OK);
}
