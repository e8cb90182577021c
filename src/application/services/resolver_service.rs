//! Redirect resolution for inbound short links.

use std::sync::Arc;

use metrics::counter;

use crate::domain::repositories::{CustomDomainRepository, UrlRepository, UserUrlRepository};
use crate::domain::route::{RouteCodec, RouteKey};
use crate::error::AppError;

/// Terminal state of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect { target: String, url_id: i64 },
    NotFound,
}

/// Resolves request paths to redirect targets and counts clicks.
///
/// # Resolution Order
///
/// 1. Paths containing the custom-domain marker are split into `(prefix, path)`;
///    a path that does not split cleanly is not found.
/// 2. Anything else is looked up as a plain short code.
///
/// Each successful resolution adds exactly one click. Counter failures are
/// logged and never block the redirect.
pub struct ResolverService<U, A, D>
where
    U: UrlRepository,
    A: UserUrlRepository,
    D: CustomDomainRepository,
{
    urls: Arc<U>,
    aliases: Arc<A>,
    domains: Arc<D>,
    codec: RouteCodec,
}

impl<U, A, D> ResolverService<U, A, D>
where
    U: UrlRepository,
    A: UserUrlRepository,
    D: CustomDomainRepository,
{
    pub fn new(urls: Arc<U>, aliases: Arc<A>, domains: Arc<D>, codec: RouteCodec) -> Self {
        Self {
            urls,
            aliases,
            domains,
            codec,
        }
    }

    /// Resolves a request path (without the leading `/`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors during lookup.
    pub async fn resolve(&self, path: &str) -> Result<Resolution, AppError> {
        let (kind, resolution) = match self.codec.parse(path) {
            RouteKey::CustomPath { prefix, path } => {
                ("custom", self.resolve_custom(prefix, path).await?)
            }
            RouteKey::ShortCode(code) => ("code", self.resolve_code(code).await?),
            RouteKey::Malformed => ("malformed", Resolution::NotFound),
        };

        let outcome = match resolution {
            Resolution::Redirect { .. } => "redirect",
            Resolution::NotFound => "not_found",
        };
        counter!("redirects_total", "kind" => kind, "outcome" => outcome).increment(1);

        Ok(resolution)
    }

    async fn resolve_custom(&self, prefix: &str, path: &str) -> Result<Resolution, AppError> {
        let Some(domain) = self
            .domains
            .find_by_prefix(&prefix.to_ascii_lowercase())
            .await?
        else {
            return Ok(Resolution::NotFound);
        };

        let Some(alias) = self
            .aliases
            .find_by_custom_path(domain.id, &path.to_ascii_lowercase())
            .await?
        else {
            return Ok(Resolution::NotFound);
        };

        let Some(url) = self.urls.find_by_id(alias.url_id).await? else {
            return Ok(Resolution::NotFound);
        };

        self.record_click(url.id).await;

        Ok(Resolution::Redirect {
            target: url.original_url,
            url_id: url.id,
        })
    }

    async fn resolve_code(&self, code: &str) -> Result<Resolution, AppError> {
        let Some(url) = self.urls.find_by_short_code(code).await? else {
            return Ok(Resolution::NotFound);
        };

        self.record_click(url.id).await;

        Ok(Resolution::Redirect {
            target: url.original_url,
            url_id: url.id,
        })
    }

    async fn record_click(&self, url_id: i64) {
        match self.urls.increment_click(url_id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(url_id, "Click not counted, URL row vanished");
                counter!("click_increment_failures_total").increment(1);
            }
            Err(e) => {
                tracing::warn!(url_id, error = %e, "Failed to increment click count");
                counter!("click_increment_failures_total").increment(1);
            }
        }
    }
}
