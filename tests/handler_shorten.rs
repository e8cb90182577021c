mod common;

use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;

fn make_server(pool: PgPool) -> TestServer {
    TestServer::new(common::make_app(common::create_test_state(pool))).unwrap()
}

#[sqlx::test]
async fn test_shorten_adds_https_scheme(pool: PgPool) {
    let server = make_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com/a" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    let code = json["shortCode"].as_str().unwrap();
    assert_eq!(json["originalUrl"], "https://example.com/a");
    assert_eq!(json["shortUrl"], format!("https://s8l.xyz/{code}"));
    assert_eq!(json["title"], common::STUB_TITLE);
    assert_eq!(code.len(), 6);
}

#[sqlx::test]
async fn test_shorten_same_url_twice_reuses_code(pool: PgPool) {
    let server = make_server(pool.clone());

    let first = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/same" }))
        .await;
    first.assert_status(axum::http::StatusCode::CREATED);

    let second = server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com/same" }))
        .await;
    second.assert_status_ok();

    assert_eq!(
        first.json::<serde_json::Value>()["shortCode"],
        second.json::<serde_json::Value>()["shortCode"]
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test]
async fn test_shorten_distinct_urls_get_distinct_codes(pool: PgPool) {
    let server = make_server(pool);

    let a = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a" }))
        .await
        .json::<serde_json::Value>();
    let b = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/b" }))
        .await
        .json::<serde_json::Value>();

    assert_ne!(a["shortCode"], b["shortCode"]);
}

#[sqlx::test]
async fn test_shorten_self_referential_rejected(pool: PgPool) {
    let server = make_server(pool);

    for url in ["https://s8l.xyz/foo", "www.s8l.xyz/bar", "HTTPS://S8L.XYZ"] {
        let response = server.post("/api/shorten").json(&json!({ "url": url })).await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "self_referential");
    }
}

#[sqlx::test]
async fn test_shorten_invalid_url(pool: PgPool) {
    let server = make_server(pool);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_url"
    );
}

#[sqlx::test]
async fn test_shorten_empty_url_is_validation_error(pool: PgPool) {
    let server = make_server(pool);

    let response = server.post("/api/shorten").json(&json!({ "url": "" })).await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "validation_error"
    );
}

#[sqlx::test]
async fn test_shorten_with_token_adds_link_once(pool: PgPool) {
    let (user_id, token) = common::create_user_with_token(&pool, "alice").await;
    let server = make_server(pool.clone());

    for _ in 0..2 {
        server
            .post("/api/shorten")
            .authorization_bearer(&token)
            .json(&json!({ "url": "https://example.com/mine" }))
            .await;
    }

    let aliases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_urls WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(aliases, 1);
}

#[sqlx::test]
async fn test_shorten_anonymous_creates_no_alias(pool: PgPool) {
    let server = make_server(pool.clone());

    server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/anon" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let aliases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_urls")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(aliases, 0);
}

#[sqlx::test]
async fn test_shorten_with_invalid_token_is_unauthorized(pool: PgPool) {
    let server = make_server(pool);

    let response = server
        .post("/api/shorten")
        .authorization_bearer("not-a-token")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[sqlx::test]
async fn test_shorten_then_resolve_round_trip(pool: PgPool) {
    let server = make_server(pool);

    let code = server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com/path?q=1#frag" }))
        .await
        .json::<serde_json::Value>()["shortCode"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/{code}")).await;

    response.assert_status(axum::http::StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://example.com/path?q=1#frag"
    );
}
