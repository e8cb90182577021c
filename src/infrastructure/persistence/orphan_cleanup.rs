//! Removal of canonical URLs left without any alias.

use sqlx::{Postgres, Transaction};

/// Deletes those of `url_ids` that no alias references any more.
///
/// Must run in the transaction that removed the aliases. The candidate rows are
/// locked first, so an alias insert racing this cleanup either commits before
/// the check (and the URL survives) or fails its foreign key check afterwards.
pub(crate) async fn delete_orphaned_urls(
    tx: &mut Transaction<'_, Postgres>,
    url_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    if url_ids.is_empty() {
        return Ok(0);
    }

    sqlx::query!(
        "SELECT id FROM urls WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        url_ids
    )
    .fetch_all(&mut **tx)
    .await?;

    let result = sqlx::query!(
        r#"
        DELETE FROM urls u
        WHERE u.id = ANY($1)
          AND NOT EXISTS (SELECT 1 FROM user_urls uu WHERE uu.url_id = u.id)
        "#,
        url_ids
    )
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() > 0 {
        tracing::debug!(removed = result.rows_affected(), "Removed orphaned URLs");
    }

    Ok(result.rows_affected())
}
