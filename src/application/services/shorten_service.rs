//! Shortening orchestration: URL allocation and alias creation.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;

use crate::domain::entities::{AliasView, CustomDomain, NewCustomAlias, NewUrl, Url};
use crate::domain::repositories::url_repository::{ORIGINAL_URL_CONSTRAINT, SHORT_CODE_CONSTRAINT};
use crate::domain::repositories::user_url_repository::{
    ALIAS_DOMAIN_FKEY, ALIAS_URL_FKEY, CUSTOM_PATH_CONSTRAINT,
};
use crate::domain::repositories::{CustomDomainRepository, UrlRepository, UserUrlRepository};
use crate::error::{AppError, ErrorCode};
use crate::infrastructure::title::PageTitleFetcher;
use crate::utils::code_generator::{CodeGenerator, validate_custom_path};
use crate::utils::url_normalizer::{host_of, normalize_url};

/// Lookups performed before giving up on finding a free short code.
const MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// Result of a basic shorten request.
#[derive(Debug, Clone)]
pub struct ShortenOutcome {
    pub url: Url,
    /// False when an existing record for the same URL was reused.
    pub created: bool,
}

/// Service that turns long URLs into short codes and custom aliases.
///
/// # Deduplication
///
/// One [`Url`] exists per normalized original URL. Concurrent requests for the
/// same URL race on the `urls_original_url_key` constraint; the loser reuses
/// the winner's row.
///
/// # Code Generation
///
/// Codes are drawn from [`CodeGenerator`] and checked for collisions up to 10
/// times. A collision detected only at insert time (unique constraint) is
/// retried once with a fresh code before reporting `allocation_exhausted`.
pub struct ShortenService<U, A, D>
where
    U: UrlRepository,
    A: UserUrlRepository,
    D: CustomDomainRepository,
{
    urls: Arc<U>,
    aliases: Arc<A>,
    domains: Arc<D>,
    title_fetcher: Arc<dyn PageTitleFetcher>,
    generator: CodeGenerator,
    self_hosts: Vec<String>,
}

impl<U, A, D> ShortenService<U, A, D>
where
    U: UrlRepository,
    A: UserUrlRepository,
    D: CustomDomainRepository,
{
    /// Creates a new shortening service.
    ///
    /// `self_hosts` are the service's own hostnames; URLs pointing at them are
    /// rejected as self-referential.
    pub fn new(
        urls: Arc<U>,
        aliases: Arc<A>,
        domains: Arc<D>,
        title_fetcher: Arc<dyn PageTitleFetcher>,
        generator: CodeGenerator,
        self_hosts: Vec<String>,
    ) -> Self {
        Self {
            urls,
            aliases,
            domains,
            title_fetcher,
            generator,
            self_hosts: self_hosts
                .iter()
                .map(|h| bare_host(h).to_ascii_lowercase())
                .collect(),
        }
    }

    /// Normalizes user input and rejects links back to this service.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with `invalid_url` or `self_referential`.
    pub fn prepare_url(&self, input: &str) -> Result<String, AppError> {
        let normalized = normalize_url(input).map_err(|e| {
            AppError::validation(
                ErrorCode::InvalidUrl,
                "Invalid URL format",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let host = host_of(&normalized).unwrap_or_default();
        if self.self_hosts.iter().any(|h| h == bare_host(&host)) {
            return Err(AppError::validation(
                ErrorCode::SelfReferential,
                "Links to this service cannot be shortened",
                json!({ "host": host }),
            ));
        }

        Ok(normalized)
    }

    /// Shortens a URL, reusing the existing record when there is one.
    ///
    /// When `user_id` is given, a plain alias is ensured for that user (idempotent).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid or self-referential URLs.
    /// Returns [`AppError::Internal`] with `allocation_exhausted` if no free code was found.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn shorten_basic(
        &self,
        input: &str,
        user_id: Option<i64>,
    ) -> Result<ShortenOutcome, AppError> {
        let original_url = self.prepare_url(input)?;

        RetryIf::start(
            FixedInterval::from_millis(0).take(1),
            || self.link_basic(&original_url, user_id),
            is_stale_url_reference,
        )
        .await
    }

    /// Shortens a URL under one of the user's custom domains.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with `invalid_url`, `self_referential`,
    /// `path_invalid`, or `path_taken`.
    /// Returns [`AppError::NotFound`] if the custom domain does not exist.
    /// Returns [`AppError::Forbidden`] if the user does not own it.
    /// Returns [`AppError::Internal`] on allocation failure or database errors.
    pub async fn shorten_custom(
        &self,
        user_id: i64,
        input: &str,
        custom_domain_id: i64,
        custom_path: &str,
        custom_title: Option<&str>,
    ) -> Result<AliasView, AppError> {
        let original_url = self.prepare_url(input)?;
        let custom_path = validate_custom_path(custom_path)?;
        let custom_title = custom_title.map(str::trim).filter(|t| !t.is_empty());

        let domain = self
            .domains
            .find_by_id(custom_domain_id)
            .await?
            .ok_or_else(|| domain_not_found(custom_domain_id))?;

        if !domain.is_owned_by(user_id) {
            return Err(AppError::forbidden(
                "You do not own this custom domain",
                json!({ "custom_domain_id": custom_domain_id }),
            ));
        }

        if self
            .aliases
            .find_by_custom_path(domain.id, &custom_path)
            .await?
            .is_some()
        {
            return Err(path_taken(&domain, &custom_path));
        }

        let result = RetryIf::start(
            FixedInterval::from_millis(0).take(1),
            || self.link_custom(user_id, &original_url, &domain, &custom_path, custom_title),
            is_stale_url_reference,
        )
        .await;

        match result {
            Err(e) if e.is_conflict_on(CUSTOM_PATH_CONSTRAINT) => {
                Err(path_taken(&domain, &custom_path))
            }
            Err(e) if e.is_stale_reference_on(ALIAS_DOMAIN_FKEY) => {
                tracing::info!(custom_domain_id, "Custom domain deleted while linking");
                Err(domain_not_found(custom_domain_id))
            }
            other => other,
        }
    }

    async fn link_basic(
        &self,
        original_url: &str,
        user_id: Option<i64>,
    ) -> Result<ShortenOutcome, AppError> {
        let outcome = self.find_or_create_url(original_url, None).await?;

        if let Some(user_id) = user_id {
            self.aliases.create_basic(user_id, outcome.url.id).await?;
        }

        Ok(outcome)
    }

    async fn link_custom(
        &self,
        user_id: i64,
        original_url: &str,
        domain: &CustomDomain,
        custom_path: &str,
        custom_title: Option<&str>,
    ) -> Result<AliasView, AppError> {
        let ShortenOutcome { url, created } =
            self.find_or_create_url(original_url, custom_title).await?;

        let linked = self
            .aliases
            .create_custom(NewCustomAlias {
                user_id,
                url_id: url.id,
                custom_domain_id: domain.id,
                custom_path: custom_path.to_string(),
                custom_title: custom_title.map(str::to_string),
            })
            .await;

        let alias = match linked {
            Ok(alias) => alias,
            Err(e) => {
                if created {
                    self.discard_unlinked_url(url.id).await;
                }
                return Err(e);
            }
        };

        tracing::info!(
            user_id,
            prefix = %domain.prefix,
            path = %custom_path,
            url_id = url.id,
            "Custom alias created"
        );

        Ok(AliasView {
            id: alias.id,
            user_id: alias.user_id,
            url_id: url.id,
            original_url: url.original_url,
            short_code: url.short_code,
            url_title: url.title,
            click_count: url.click_count,
            custom_domain_id: Some(domain.id),
            custom_prefix: Some(domain.prefix.clone()),
            custom_path: alias.custom_path,
            custom_title: alias.custom_title,
            created_at: alias.created_at,
        })
    }

    /// Removes a URL created for an alias that could not be inserted.
    ///
    /// Best-effort: if another request linked the URL in the meantime the
    /// delete is refused by the foreign key and the row stays.
    async fn discard_unlinked_url(&self, url_id: i64) {
        match self.urls.delete(url_id).await {
            Ok(removed) => tracing::debug!(url_id, removed, "Discarded unlinked URL"),
            Err(e) => tracing::debug!(url_id, error = %e, "Unlinked URL kept"),
        }
    }

    /// Returns the record for `original_url`, creating it if needed.
    ///
    /// `title_hint` replaces the fetched page title for new records.
    async fn find_or_create_url(
        &self,
        original_url: &str,
        title_hint: Option<&str>,
    ) -> Result<ShortenOutcome, AppError> {
        if let Some(url) = self.urls.find_by_original_url(original_url).await? {
            return Ok(ShortenOutcome {
                url,
                created: false,
            });
        }

        let title = match title_hint {
            Some(title) => title.to_string(),
            None => self.title_fetcher.fetch_title(original_url).await,
        };

        let result = RetryIf::start(
            FixedInterval::from_millis(0).take(1),
            || self.insert_url(original_url, &title),
            |e: &AppError| {
                let collided = e.is_conflict_on(SHORT_CODE_CONSTRAINT);
                if collided {
                    counter!("short_code_collisions_total").increment(1);
                    tracing::warn!("Short code collided on insert");
                }
                collided
            },
        )
        .await;

        match result {
            Ok(url) => {
                counter!("urls_created_total").increment(1);
                tracing::info!(url_id = url.id, short_code = %url.short_code, "Short URL created");
                Ok(ShortenOutcome { url, created: true })
            }
            Err(e) if e.is_conflict_on(ORIGINAL_URL_CONSTRAINT) => {
                let url = self
                    .urls
                    .find_by_original_url(original_url)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal("Server error, please retry later", json!({}))
                    })?;
                Ok(ShortenOutcome {
                    url,
                    created: false,
                })
            }
            Err(e) if e.is_conflict_on(SHORT_CODE_CONSTRAINT) => {
                Err(AppError::allocation_exhausted())
            }
            Err(e) => Err(e),
        }
    }

    async fn insert_url(&self, original_url: &str, title: &str) -> Result<Url, AppError> {
        let short_code = self.allocate_code().await?;

        self.urls
            .create(NewUrl {
                original_url: original_url.to_string(),
                short_code,
                title: title.to_string(),
            })
            .await
    }

    /// Draws codes until one is not in use.
    ///
    /// The lookup only narrows the race; the unique constraint decides.
    async fn allocate_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = self.generator.generate();

            if self.urls.find_by_short_code(&code).await?.is_none() {
                return Ok(code);
            }

            counter!("short_code_collisions_total").increment(1);
            tracing::debug!(attempt, "Generated short code already in use");
        }

        tracing::error!(
            attempts = MAX_ALLOCATION_ATTEMPTS,
            "Short code allocation exhausted"
        );
        Err(AppError::allocation_exhausted())
    }
}

fn is_stale_url_reference(e: &AppError) -> bool {
    let stale = e.is_stale_reference_on(ALIAS_URL_FKEY);
    if stale {
        tracing::warn!("URL removed while linking an alias, recreating");
    }
    stale
}

/// Host without the trailing root dot of a fully qualified name.
fn bare_host(host: &str) -> &str {
    host.strip_suffix('.').unwrap_or(host)
}

fn domain_not_found(custom_domain_id: i64) -> AppError {
    AppError::not_found(
        "Custom domain not found",
        json!({ "custom_domain_id": custom_domain_id }),
    )
}

fn path_taken(domain: &CustomDomain, custom_path: &str) -> AppError {
    AppError::validation(
        ErrorCode::PathTaken,
        "This path is already in use for this domain",
        json!({ "prefix": domain.prefix, "path": custom_path }),
    )
}
