mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use sat_api::auth::AUTH_HEADER;

#[tokio::test]
async fn registration_is_public_and_hides_password() -> Result<()> {
    let server = common::ensure_server().await?;
    let name = common::unique_name("gina");

    let body = common::register(server, &name, "secret123").await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], name.as_str());
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_reports_numbered_errors() -> Result<()> {
    let server = common::ensure_server().await?;
    let name = common::unique_name("hank");
    common::register(server, &name, "secret123").await?;
    let client = reqwest::Client::new();

    let same_name = client
        .post(server.url("/api/users"))
        .json(&json!({
            "name": name,
            "email": format!("other{}@example.com", name),
            "password": "secret123",
        }))
        .send()
        .await?;
    assert_eq!(same_name.status(), StatusCode::CONFLICT);
    let body = same_name.json::<Value>().await?;
    assert_eq!(body["errCode"], 4002);

    let other = common::unique_name("ivan");
    let same_email = client
        .post(server.url("/api/users"))
        .json(&json!({
            "name": other,
            "email": format!("{}@example.com", name),
            "password": "secret123",
        }))
        .send()
        .await?;
    assert_eq!(same_email.status(), StatusCode::CONFLICT);
    let body = same_email.json::<Value>().await?;
    assert_eq!(body["errCode"], 4000);
    Ok(())
}

#[tokio::test]
async fn invalid_registration_is_400() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let bad_email = client
        .post(server.url("/api/users"))
        .json(&json!({
            "name": common::unique_name("jill"),
            "email": "not-an-email",
            "password": "secret123",
        }))
        .send()
        .await?;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.json::<Value>().await?["errCode"], 4001);

    let short_password = client
        .post(server.url("/api/users"))
        .json(&json!({
            "name": common::unique_name("kate"),
            "email": "kate@example.com",
            "password": "abc",
        }))
        .send()
        .await?;
    assert_eq!(short_password.status(), StatusCode::BAD_REQUEST);
    let body = short_password.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["password"].is_string());

    let missing_field = client
        .post(server.url("/api/users"))
        .json(&json!({ "name": common::unique_name("lars") }))
        .send()
        .await?;
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);
    let body = missing_field.json::<Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn user_lookup_by_name_and_id() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::signed_in_user(server, "leo").await?;
    let other = common::unique_name("mia");
    let created = common::register(server, &other, "secret123").await?;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let client = reqwest::Client::new();

    for key in [other.as_str(), id.as_str()] {
        let res = client
            .get(server.url(&format!("/api/users/{}", key)))
            .header(AUTH_HEADER, &token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.json::<Value>().await?["data"]["name"], other.as_str());
    }

    let missing = client
        .get(server.url("/api/users/nobodyhere"))
        .header(AUTH_HEADER, &token)
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<Value>().await?["errCode"], 4003);
    Ok(())
}

#[tokio::test]
async fn update_changes_own_password_only() -> Result<()> {
    let server = common::ensure_server().await?;
    let (name, token) = common::signed_in_user(server, "nora").await?;
    let victim = common::unique_name("otto");
    common::register(server, &victim, "secret123").await?;
    let client = reqwest::Client::new();

    let anonymous = client
        .put(server.url("/api/users"))
        .json(&json!({ "name": name, "password": "changed99" }))
        .send()
        .await?;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let foreign = client
        .put(server.url("/api/users"))
        .header(AUTH_HEADER, &token)
        .json(&json!({ "name": victim, "password": "hijacked1" }))
        .send()
        .await?;
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);

    let own = client
        .put(server.url("/api/users"))
        .header(AUTH_HEADER, &token)
        .json(&json!({ "name": name, "password": "changed99" }))
        .send()
        .await?;
    assert_eq!(own.status(), StatusCode::OK);

    common::login(server, &name, "changed99").await?;
    common::login(server, &victim, "secret123").await?;
    Ok(())
}
