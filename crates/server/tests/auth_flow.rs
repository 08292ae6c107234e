mod support;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use support::{body_json, spawn_app, PASSWORD};

#[tokio::test]
async fn register_then_login_issues_token_with_default_role() -> anyhow::Result<()> {
    let app = spawn_app().await?;

    let (status, body) = app
        .call_json(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"userName": "jdoe", "fullName": "Jane Doe", "email": "jane@example.com", "password": PASSWORD})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User registered successfully.");
    assert_eq!(body["user"]["userName"], "jdoe");

    let resp = app
        .call(Method::POST, "/auth/login", None, Some(json!({"email": "jane@example.com", "password": PASSWORD})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("auth_token="), "cookie was {cookie}");
    let session = body_json(resp).await?;
    assert_eq!(session["roles"], json!(["User"]));
    let token = session["token"].as_str().unwrap();

    let (status, me) = app.call_json(Method::GET, "/auth/me", Some(token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "jane@example.com");
    assert_eq!(me["sub"], session["user"]["id"]);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_conflict() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.register("first", "dup@example.com").await?;
    let (status, body) = app
        .call_json(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"userName": "second", "email": "dup@example.com", "password": PASSWORD})),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn weak_password_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, _) = app
        .call_json(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"userName": "weak", "email": "weak@example.com", "password": "password"})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.register("jdoe", "jane@example.com").await?;
    let (status, body) = app.login("jane@example.com", "Wr0ng!password").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password.");

    let (status, _) = app.login("nobody@example.com", PASSWORD).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn three_failures_lock_the_account() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.register("jdoe", "jane@example.com").await?;

    for _ in 0..2 {
        let (status, _) = app.login("jane@example.com", "Wr0ng!password").await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, body) = app.login("jane@example.com", "Wr0ng!password").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().starts_with("Account is locked until"));

    // correct password is refused while locked
    let (status, body) = app.login("jane@example.com", PASSWORD).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().starts_with("Account is locked until"));
    Ok(())
}

#[tokio::test]
async fn protected_routes_need_a_token() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, body) = app.call_json(Method::GET, "/bids", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required.");

    let (status, _) = app.call_json(Method::GET, "/bids", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn cookie_is_accepted_when_header_is_absent() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let token = app.user_token().await?;
    let req = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/auth/me")
        .header(header::COOKIE, format!("auth_token={token}"))
        .body(axum::body::Body::empty())?;
    let resp = tower::ServiceExt::oneshot(app.router.clone(), req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let token = app.user_token().await?;
    let resp = app.call(Method::POST, "/auth/logout", Some(&token), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get(header::SET_COOKIE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_public() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, body) = app.call_json(Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = app.call_json(Method::GET, "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/trades/{id}"]["put"].is_object());
    assert!(doc["paths"]["/auth/register"]["post"].is_object());
    Ok(())
}
