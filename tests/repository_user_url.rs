mod common;

use s8l::domain::entities::NewCustomAlias;
use s8l::domain::repositories::user_url_repository::{ALIAS_DOMAIN_FKEY, CUSTOM_PATH_CONSTRAINT};
use s8l::domain::repositories::{AliasQuery, AliasSort, UserUrlRepository};
use s8l::infrastructure::persistence::PgUserUrlRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn query() -> AliasQuery {
    AliasQuery {
        search: None,
        sort: AliasSort::Newest,
        created_from: None,
        created_to: None,
        offset: 0,
        limit: 20,
    }
}

fn custom(user_id: i64, url_id: i64, domain_id: i64, path: &str) -> NewCustomAlias {
    NewCustomAlias {
        user_id,
        url_id,
        custom_domain_id: domain_id,
        custom_path: path.to_string(),
        custom_title: None,
    }
}

#[sqlx::test]
async fn test_create_basic_is_idempotent(pool: PgPool) {
    let user = common::create_test_user(&pool, "alice").await;
    let url = common::create_test_url(&pool, "aaa111", "https://example.com/a").await;
    let repo = PgUserUrlRepository::new(Arc::new(pool));

    let first = repo.create_basic(user, url).await.unwrap();
    let second = repo.create_basic(user, url).await.unwrap();

    assert_eq!(first.id, second.id);
    assert!(!first.is_custom());
}

#[sqlx::test]
async fn test_create_custom_and_find_by_path(pool: PgPool) {
    let user = common::create_test_user(&pool, "alice").await;
    let url = common::create_test_url(&pool, "aaa111", "https://example.com/a").await;
    let domain = common::create_test_domain(&pool, "abc", user).await;
    let repo = PgUserUrlRepository::new(Arc::new(pool));

    let alias = repo.create_custom(custom(user, url, domain, "x")).await.unwrap();
    assert!(alias.is_custom());

    let found = repo.find_by_custom_path(domain, "x").await.unwrap().unwrap();
    assert_eq!(found.id, alias.id);

    let (views, _) = repo.list_for_user(user, query()).await.unwrap();
    let view = &views[0];
    assert_eq!(view.id, alias.id);
    assert_eq!(view.custom_prefix.as_deref(), Some("abc"));
    assert_eq!(view.short_code, "aaa111");
    assert_eq!(view.original_url, "https://example.com/a");
}

#[sqlx::test]
async fn test_duplicate_custom_path_is_conflict(pool: PgPool) {
    let user = common::create_test_user(&pool, "alice").await;
    let a = common::create_test_url(&pool, "aaa111", "https://example.com/a").await;
    let b = common::create_test_url(&pool, "bbb222", "https://example.com/b").await;
    let domain = common::create_test_domain(&pool, "abc", user).await;
    let repo = PgUserUrlRepository::new(Arc::new(pool));

    repo.create_custom(custom(user, a, domain, "x")).await.unwrap();
    let err = repo
        .create_custom(custom(user, b, domain, "x"))
        .await
        .unwrap_err();

    assert!(err.is_conflict_on(CUSTOM_PATH_CONSTRAINT));
}

#[sqlx::test]
async fn test_create_custom_on_deleted_domain_is_stale(pool: PgPool) {
    let user = common::create_test_user(&pool, "alice").await;
    let url = common::create_test_url(&pool, "aaa111", "https://example.com/a").await;
    let domain = common::create_test_domain(&pool, "abc", user).await;
    sqlx::query("DELETE FROM custom_domains WHERE id = $1")
        .bind(domain)
        .execute(&pool)
        .await
        .unwrap();
    let repo = PgUserUrlRepository::new(Arc::new(pool));

    let err = repo
        .create_custom(custom(user, url, domain, "x"))
        .await
        .unwrap_err();

    assert!(err.is_stale_reference_on(ALIAS_DOMAIN_FKEY));
}

#[sqlx::test]
async fn test_create_basic_survives_concurrent_delete(pool: PgPool) {
    let user = common::create_test_user(&pool, "alice").await;
    let url = common::create_test_url(&pool, "aaa111", "https://example.com/a").await;
    let repo = PgUserUrlRepository::new(Arc::new(pool.clone()));

    for _ in 0..30 {
        let unlink = sqlx::query("DELETE FROM user_urls WHERE user_id = $1 AND custom_domain_id IS NULL")
            .bind(user)
            .execute(&pool);

        let (linked, unlinked) = tokio::join!(repo.create_basic(user, url), unlink);

        let alias = linked.unwrap();
        unlinked.unwrap();
        assert_eq!(alias.url_id, url);
        assert!(!alias.is_custom());
    }
}

#[sqlx::test]
async fn test_list_filters_and_counts(pool: PgPool) {
    let user = common::create_test_user(&pool, "alice").await;
    let repo = PgUserUrlRepository::new(Arc::new(pool.clone()));

    for (code, url) in [
        ("aaa111", "https://rust-lang.org/"),
        ("bbb222", "https://example.com/rusty"),
        ("ccc333", "https://example.com/other"),
    ] {
        let id = common::create_test_url(&pool, code, url).await;
        repo.create_basic(user, id).await.unwrap();
    }

    let (items, total) = repo
        .list_for_user(
            user,
            AliasQuery {
                search: Some("RUST".to_string()),
                ..query()
            },
        )
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);

    let (page, total) = repo
        .list_for_user(
            user,
            AliasQuery {
                offset: 2,
                limit: 2,
                sort: AliasSort::Oldest,
                ..query()
            },
        )
        .await
        .unwrap();

    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].short_code, "ccc333");
}

#[sqlx::test]
async fn test_list_search_matches_custom_title(pool: PgPool) {
    let user = common::create_test_user(&pool, "alice").await;
    let url = common::create_test_url(&pool, "aaa111", "https://example.com/a").await;
    let domain = common::create_test_domain(&pool, "abc", user).await;
    let repo = PgUserUrlRepository::new(Arc::new(pool));

    repo.create_custom(NewCustomAlias {
        custom_title: Some("Quarterly Report".to_string()),
        ..custom(user, url, domain, "q1")
    })
    .await
    .unwrap();

    let (items, total) = repo
        .list_for_user(
            user,
            AliasQuery {
                search: Some("quarterly".to_string()),
                ..query()
            },
        )
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(items[0].display_title(), "Quarterly Report");
}

#[sqlx::test]
async fn test_delete_cleans_up_orphaned_url(pool: PgPool) {
    let user = common::create_test_user(&pool, "alice").await;
    let only = common::create_test_url(&pool, "aaa111", "https://example.com/a").await;
    let unrelated = common::create_test_url(&pool, "bbb222", "https://example.com/b").await;
    let repo = PgUserUrlRepository::new(Arc::new(pool.clone()));

    let alias = repo.create_basic(user, only).await.unwrap();
    repo.create_basic(user, unrelated).await.unwrap();

    assert!(repo.delete(alias.id).await.unwrap());

    assert!(!common::url_exists(&pool, only).await);
    assert!(common::url_exists(&pool, unrelated).await);
    assert!(!repo.delete(alias.id).await.unwrap());
}
