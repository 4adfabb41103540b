mod common;

use chrono::Duration;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert_eq!(body["data"]["display_name"], "nicola");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::spawn().await;

    // Create first account
    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Try to sign up with a different display name but the same email
    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola2",
            "password": "An0ther!pw"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Email already registered");
}

#[tokio::test]
async fn test_signup_duplicate_display_name() {
    let app = TestApp::spawn().await;

    // Create first account
    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Try to sign up with a different email but the same display name
    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "email": "nicola2@example.com",
            "display_name": "nicola",
            "password": "An0ther!pw"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Display name already taken");
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "email": "not-an-email",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_signup_weak_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("at least 8 characters"));
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["access_token"].is_string());
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_eq!(body["data"]["account"]["email"], "nicola@example.com");
    assert_eq!(body["data"]["account"]["display_name"], "nicola");
}

#[tokio::test]
async fn test_login_with_display_name() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["account"]["email"], "nicola@example.com");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Wr0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_identifier_matches_wrong_password() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let wrong_password = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Wr0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let unknown_identifier = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nobody@example.com",
            "password": "Wr0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // A missing account must be indistinguishable from a bad password
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_identifier.status(), StatusCode::UNAUTHORIZED);

    let wrong_body: serde_json::Value = wrong_password
        .json()
        .await
        .expect("Failed to parse response");
    let unknown_body: serde_json::Value = unknown_identifier
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_send_email_requires_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/email/send")
        .json(&json!({
            "to": "alice@example.com",
            "subject": "Hello",
            "body": "No token attached."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Missing Authorization header");
}

#[tokio::test]
async fn test_reset_token_rejected_on_protected_routes() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let forgot: serde_json::Value = app
        .post("/api/auth/forgot-password")
        .json(&json!({ "identifier": "nicola@example.com" }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let reset_token = forgot["data"]["reset_token"].as_str().unwrap();

    // A freshly issued reset token must not open the email endpoints
    let response = app
        .get_authenticated("/api/email/history", reset_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_send_email_success_and_history() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let login: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let token = login["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .post_authenticated("/api/email/send", &token)
        .json(&json!({
            "to": "alice@example.com, bob@example.com",
            "subject": "Team update",
            "body": "Quarterly numbers attached."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["id"].is_string());
    assert_eq!(body["data"]["sender"], "no-reply@service.test");
    assert_eq!(
        body["data"]["to_recipients"],
        "alice@example.com, bob@example.com"
    );
    assert!(body["data"]["cc_recipients"].is_null());
    assert!(body["data"]["bcc_recipients"].is_null());

    let history: serde_json::Value = app
        .get_authenticated("/api/email/history", &token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    let records = history["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["subject"], "Team update");
    assert_eq!(records[0]["body"], "Quarterly numbers attached.");
}

#[tokio::test]
async fn test_send_email_empty_recipients() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let login: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let token = login["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .post_authenticated("/api/email/send", &token)
        .json(&json!({
            "to": "",
            "subject": "Hello",
            "body": "Nobody will read this."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["data"]["message"],
        "At least one recipient email address is required"
    );
}

#[tokio::test]
async fn test_send_email_invalid_recipient() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let login: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let token = login["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .post_authenticated("/api/email/send", &token)
        .json(&json!({
            "to": "not-an-address",
            "subject": "Hello",
            "body": "This should never leave."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_email_history_days_filter() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let login: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let token = login["data"]["access_token"].as_str().unwrap().to_string();

    app.post_authenticated("/api/email/send", &token)
        .json(&json!({
            "to": "alice@example.com",
            "subject": "Old news",
            "body": "Sent ten days ago."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    app.clock.advance(Duration::days(10));

    app.post_authenticated("/api/email/send", &token)
        .json(&json!({
            "to": "alice@example.com",
            "subject": "Fresh news",
            "body": "Sent just now."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let filtered: serde_json::Value = app
        .get_authenticated("/api/email/history?days=7", &token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    let records = filtered["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["subject"], "Fresh news");

    let unfiltered: serde_json::Value = app
        .get_authenticated("/api/email/history", &token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    // Newest first
    let records = unfiltered["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["subject"], "Fresh news");
    assert_eq!(records[1]["subject"], "Old news");
}

#[tokio::test]
async fn test_send_email_relay_failure() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let login: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let token = login["data"]["access_token"].as_str().unwrap().to_string();

    app.outbox.fail_with("connection refused");

    let response = app
        .post_authenticated("/api/email/send", &token)
        .json(&json!({
            "to": "alice@example.com",
            "subject": "Doomed",
            "body": "The relay is down."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The transport detail must not leak into the response body
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Internal server error");

    let history: serde_json::Value = app
        .get_authenticated("/api/email/history", &token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    // Failed deliveries never reach the history
    assert_eq!(history["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_session_expires_after_ttl() {
    let app = TestApp::spawn().await;

    app.post("/api/auth/signup")
        .json(&json!({
            "email": "nicola@example.com",
            "display_name": "nicola",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let login: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "Str0ng!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let token = login["data"]["access_token"].as_str().unwrap().to_string();

    let before = app
        .get_authenticated("/api/email/history", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(before.status(), StatusCode::OK);

    app.clock.advance(Duration::minutes(31));

    let after = app
        .get_authenticated("/api/email/history", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = after.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid or expired token");
}
