//! Listing and deletion of a user's aliases.

use crate::domain::entities::AliasView;
use crate::domain::repositories::{AliasQuery, UserUrlRepository};
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Service for the ownership layer's read and delete paths.
///
/// Creation lives in [`super::ShortenService`], which also owns URL allocation.
pub struct AliasService<R: UserUrlRepository> {
    repository: Arc<R>,
}

impl<R: UserUrlRepository> AliasService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns one page of aliases and the total count matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_for_user(
        &self,
        user_id: i64,
        query: AliasQuery,
    ) -> Result<(Vec<AliasView>, i64), AppError> {
        self.repository.list_for_user(user_id, query).await
    }

    /// Deletes an alias owned by `user_id`.
    ///
    /// The URL it points at is removed in the same transaction if no other
    /// alias references it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias does not exist.
    /// Returns [`AppError::Forbidden`] if another user owns it.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), AppError> {
        let alias = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if alias.user_id != user_id {
            return Err(AppError::forbidden(
                "You do not own this link",
                json!({ "id": id }),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }

        tracing::info!(user_id, alias_id = id, url_id = alias.url_id, "Alias deleted");
        Ok(())
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Link not found", json!({ "id": id }))
}
