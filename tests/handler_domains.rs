mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;

fn make_server(pool: PgPool) -> TestServer {
    TestServer::new(common::make_app(common::create_test_state(pool))).unwrap()
}

async fn create(server: &TestServer, token: &str, prefix: &str) -> axum_test::TestResponse {
    server
        .post("/api/domains")
        .authorization_bearer(token)
        .json(&json!({ "prefix": prefix }))
        .await
}

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_domain_success(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "alice").await;
    let server = make_server(pool);

    let response = create(&server, &token, "MyBrand").await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["prefix"], "mybrand");
    assert_eq!(json["domain"], "mybrand.s8l.xyz");
    assert!(json["id"].is_i64());
    assert!(json["createdAt"].is_string());
}

#[sqlx::test]
async fn test_create_third_domain_exceeds_limit(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "alice").await;
    let server = make_server(pool);

    create(&server, &token, "one").await.assert_status(StatusCode::CREATED);
    create(&server, &token, "two").await.assert_status(StatusCode::CREATED);

    let response = create(&server, &token, "three").await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "domain_limit_exceeded"
    );
}

#[sqlx::test]
async fn test_create_domain_reserved(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "alice").await;
    let server = make_server(pool);

    let response = create(&server, &token, "WWW").await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "prefix_reserved"
    );
}

#[sqlx::test]
async fn test_create_domain_taken_by_other_user(pool: PgPool) {
    let owner = common::create_test_user(&pool, "owner").await;
    common::create_test_domain(&pool, "brand", owner).await;
    let (_, token) = common::create_user_with_token(&pool, "alice").await;
    let server = make_server(pool);

    let response = create(&server, &token, "Brand").await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "prefix_taken"
    );
}

#[sqlx::test]
async fn test_create_domain_invalid_prefix(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "alice").await;
    let server = make_server(pool);

    for prefix in ["ab", "waytoolongprefix", "bad.dot"] {
        let response = create(&server, &token, prefix).await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>()["error"]["code"],
            "prefix_invalid"
        );
    }
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_list_domains_only_own(pool: PgPool) {
    let (alice, token) = common::create_user_with_token(&pool, "alice").await;
    let bob = common::create_test_user(&pool, "bob").await;
    common::create_test_domain(&pool, "alice1", alice).await;
    common::create_test_domain(&pool, "bob1", bob).await;
    let server = make_server(pool);

    let response = server.get("/api/domains").authorization_bearer(&token).await;

    response.assert_status_ok();
    let items = response.json::<serde_json::Value>()["items"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["prefix"], "alice1");
}

#[sqlx::test]
async fn test_list_domains_requires_auth(pool: PgPool) {
    let server = make_server(pool);

    server.get("/api/domains").await.assert_status_unauthorized();
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_delete_domain_cascades_links(pool: PgPool) {
    let (alice, token) = common::create_user_with_token(&pool, "alice").await;
    let domain = common::create_test_domain(&pool, "abc", alice).await;
    let solo = common::create_test_url(&pool, "aaa111", "https://example.com/solo").await;
    let shared = common::create_test_url(&pool, "bbb222", "https://example.com/shared").await;
    common::create_custom_alias(&pool, alice, solo, domain, "solo").await;
    common::create_custom_alias(&pool, alice, shared, domain, "shared").await;
    common::create_basic_alias(&pool, alice, shared).await;
    let server = make_server(pool.clone());

    server
        .delete(&format!("/api/domains/{domain}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_urls WHERE custom_domain_id IS NOT NULL")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
    assert!(!common::url_exists(&pool, solo).await);
    assert!(common::url_exists(&pool, shared).await);

    server
        .get("/abc.s8l.xyz/shared")
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_delete_foreign_domain_forbidden(pool: PgPool) {
    let owner = common::create_test_user(&pool, "owner").await;
    let domain = common::create_test_domain(&pool, "mine", owner).await;
    let (_, token) = common::create_user_with_token(&pool, "mallory").await;
    let server = make_server(pool);

    server
        .delete(&format!("/api/domains/{domain}"))
        .authorization_bearer(&token)
        .await
        .assert_status_forbidden();
}

#[sqlx::test]
async fn test_delete_missing_domain(pool: PgPool) {
    let (_, token) = common::create_user_with_token(&pool, "alice").await;
    let server = make_server(pool);

    server
        .delete("/api/domains/99999")
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}
