mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{test_config, TestApp};
use jobdesk::config::DuplicatePolicy;

fn health_from(origin: &str) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, origin)
        .body(Body::empty())?)
}

fn allowed_origin(response: &hyper::Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[tokio::test]
async fn wildcard_origin_setting_allows_any_origin() -> Result<()> {
    let mut config = test_config(DuplicatePolicy::Either);
    config.cors_allowed_origin = Some("*".to_string());
    let app = TestApp::with_config(config);

    let response = app.oneshot(health_from("https://jobs.example.com")?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(allowed_origin(&response).as_deref(), Some("*"));
    Ok(())
}

#[tokio::test]
async fn listed_origins_are_echoed_and_others_are_not() -> Result<()> {
    let mut config = test_config(DuplicatePolicy::Either);
    config.cors_allowed_origin =
        Some("https://jobs.example.com, https://admin.example.com".to_string());
    let app = TestApp::with_config(config);

    let listed = app.oneshot(health_from("https://admin.example.com")?).await?;
    assert_eq!(
        allowed_origin(&listed).as_deref(),
        Some("https://admin.example.com")
    );

    let foreign = app.oneshot(health_from("https://evil.example.com")?).await?;
    assert_eq!(allowed_origin(&foreign), None);
    Ok(())
}
