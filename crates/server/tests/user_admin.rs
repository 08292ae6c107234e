mod support;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use support::{body_json, spawn_app};

#[tokio::test]
async fn user_routes_are_admin_only() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = app.user_token().await?;
    let (status, _) = app.call_json(Method::GET, "/users", Some(&user), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.call_json(Method::GET, "/roles", Some(&user), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_manages_users() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;

    let resp = app
        .call(
            Method::POST,
            "/users",
            Some(&admin),
            Some(json!({"userName": "trader1", "email": "trader1@example.com", "password": "Tr4der!pass", "roles": ["User"]})),
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    let created = body_json(resp).await?;
    assert!(created.get("password").is_none());
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(location, format!("/users/{id}"));

    // new account can sign in
    let (status, _) = app.login("trader1@example.com", "Tr4der!pass").await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call_json(
            Method::POST,
            "/users",
            Some(&admin),
            Some(json!({"userName": "other", "email": "trader1@example.com", "password": "Tr4der!pass"})),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = app
        .call_json(
            Method::PUT,
            &format!("/users/{id}"),
            Some(&admin),
            Some(json!({"id": id, "userName": "trader1", "fullName": "Trader One", "email": "trader1@example.com", "roles": ["User"]})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fullName"], "Trader One");

    let (status, body) = app.call_json(Method::DELETE, &format!("/users/{id}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully.");
    let (status, _) = app.login("trader1@example.com", "Tr4der!pass").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_role_on_create_is_bad_request() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let (status, _) = app
        .call_json(
            Method::POST,
            "/users",
            Some(&admin),
            Some(json!({"userName": "x1", "email": "x1@example.com", "password": "Tr4der!pass", "roles": ["Ghost"]})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn role_catalogue_and_membership() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let member = app.register("member", "member@example.com").await?;

    let (status, _) = app.call_json(Method::POST, "/roles", Some(&admin), Some(json!("Trader"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.call_json(Method::POST, "/roles", Some(&admin), Some(json!(["Trader"]))).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, roles) = app.call_json(Method::GET, "/roles", Some(&admin), None).await?;
    let names: Vec<&str> = roles.as_array().unwrap().iter().filter_map(|r| r["name"].as_str()).collect();
    assert!(names.contains(&"Trader") && names.contains(&"Admin"));

    let uri = format!("/users/{member}/roles");
    let (status, body) = app.call_json(Method::POST, &uri, Some(&admin), Some(json!(["User", "Trader"]))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alreadyHeld"], json!(["User"]));

    let (_, held) = app.call_json(Method::GET, &uri, Some(&admin), None).await?;
    assert_eq!(held, json!(["Trader", "User"]));

    let (status, _) = app.call_json(Method::PUT, &uri, Some(&admin), Some(json!("Trader"))).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, held) = app.call_json(Method::GET, &uri, Some(&admin), None).await?;
    assert_eq!(held, json!(["Trader"]));

    let (status, _) = app.call_json(Method::DELETE, &uri, Some(&admin), Some(json!("Trader"))).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call_json(Method::DELETE, &uri, Some(&admin), Some(json!("Trader"))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call_json(Method::DELETE, "/roles/Trader", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call_json(Method::DELETE, "/roles/Trader", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call_json(Method::GET, "/users/missing/roles", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn empty_role_lists_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let member = app.register("member", "member@example.com").await?;

    let (status, body) = app.call_json(Method::POST, "/roles", Some(&admin), Some(json!([]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "At least one role is required.");

    let uri = format!("/users/{member}/roles");
    let (status, _) = app.call_json(Method::DELETE, &uri, Some(&admin), Some(json!([]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, held) = app.call_json(Method::GET, &uri, Some(&admin), None).await?;
    assert_eq!(held, json!(["User"]));
    Ok(())
}

#[tokio::test]
async fn user_email_follows_the_registration_rule() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;

    let (status, body) = app
        .call_json(
            Method::POST,
            "/users",
            Some(&admin),
            Some(json!({"userName": "local", "email": "local@localhost", "password": "Tr4der!pass"})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email must be a valid email address.");

    let (status, body) = app
        .call_json(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"userName": "local", "email": "local@localhost", "password": "Tr4der!pass"})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email must be a valid email address.");
    Ok(())
}
