mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{body_json, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn client_request_is_reviewed_by_admin() -> Result<()> {
    let app = TestApp::new();
    let admin_token = app.admin_token().await?;
    let client = app
        .signup_client("ada@example.com", "5550100", "hunter22")
        .await?;

    let sent = app
        .post_json(
            "/admin/sendRequest",
            &json!({ "subject": "Access", "message": "Please review my profile" }),
            Some(&client.token),
        )
        .await?;
    assert_eq!(sent.status(), StatusCode::CREATED);
    let sent = body_json(sent).await?;
    let request = &sent["request"];
    assert_eq!(request["status"], "pending");
    assert_eq!(request["client_email"], "ada@example.com");
    assert_eq!(request["client_id"], client.id.to_string());
    assert!(request["sent_at"].is_string());
    assert!(request["reviewed_by"].is_null());
    let request_id = request["id"].as_str().unwrap_or_default().to_string();

    let all = body_json(app.get("/admin/all-requests", Some(&admin_token)).await?).await?;
    assert_eq!(all["requests"].as_array().map(Vec::len), Some(1));

    let approved = app
        .put_json(
            &format!("/admin/modify-request/{request_id}"),
            &json!({ "status": "approved" }),
            Some(&admin_token),
        )
        .await?;
    assert_eq!(approved.status(), StatusCode::OK);
    let approved = body_json(approved).await?;
    assert_eq!(approved["request"]["status"], "approved");
    assert!(approved["request"]["reviewed_by"].is_string());
    assert!(approved["request"]["reviewed_at"].is_string());

    // Any status may overwrite any other.
    let reverted = app
        .put_json(
            &format!("/admin/modify-request/{request_id}"),
            &json!({ "status": "pending" }),
            Some(&admin_token),
        )
        .await?;
    assert_eq!(reverted.status(), StatusCode::OK);
    assert_eq!(body_json(reverted).await?["request"]["status"], "pending");
    Ok(())
}

#[tokio::test]
async fn request_validation_and_missing_targets() -> Result<()> {
    let app = TestApp::new();
    let admin_token = app.admin_token().await?;
    let client = app
        .signup_client("ada@example.com", "5550100", "hunter22")
        .await?;

    let no_message = app
        .post_json(
            "/admin/sendRequest",
            &json!({ "subject": "Empty" }),
            Some(&client.token),
        )
        .await?;
    assert_eq!(no_message.status(), StatusCode::BAD_REQUEST);

    let missing = app
        .put_json(
            &format!("/admin/modify-request/{}", Uuid::new_v4()),
            &json!({ "status": "rejected" }),
            Some(&admin_token),
        )
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let bogus_status = app
        .put_json(
            &format!("/admin/modify-request/{}", Uuid::new_v4()),
            &json!({ "status": "archived" }),
            Some(&admin_token),
        )
        .await?;
    assert_eq!(bogus_status.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
