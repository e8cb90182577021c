//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AliasService, AuthService, CustomDomainService, ResolverService, ShortenService,
};
use crate::config::Config;
use crate::domain::route::RouteCodec;
use crate::infrastructure::persistence::{
    PgCustomDomainRepository, PgTokenRepository, PgUrlRepository, PgUserUrlRepository,
};
use crate::infrastructure::recent_log::RecentLog;
use crate::infrastructure::title::PageTitleFetcher;
use crate::utils::code_generator::CodeGenerator;

pub type PgShortenService =
    ShortenService<PgUrlRepository, PgUserUrlRepository, PgCustomDomainRepository>;
pub type PgResolverService =
    ResolverService<PgUrlRepository, PgUserUrlRepository, PgCustomDomainRepository>;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub shorten_service: Arc<PgShortenService>,
    pub resolver_service: Arc<PgResolverService>,
    pub alias_service: Arc<AliasService<PgUserUrlRepository>>,
    pub domain_service: Arc<CustomDomainService<PgCustomDomainRepository>>,
    pub auth_service: Arc<AuthService<PgTokenRepository>>,
    pub title_fetcher: Arc<dyn PageTitleFetcher>,
    pub codec: RouteCodec,
    pub recent_log: RecentLog,
}

impl AppState {
    /// Wires repositories and services for the given pool.
    pub fn new(
        pool: Arc<PgPool>,
        config: &Config,
        title_fetcher: Arc<dyn PageTitleFetcher>,
        recent_log: RecentLog,
    ) -> Self {
        let codec = RouteCodec::new(&config.base_url, &config.service_domain);

        let url_repo = Arc::new(PgUrlRepository::new(pool.clone()));
        let alias_repo = Arc::new(PgUserUrlRepository::new(pool.clone()));
        let domain_repo = Arc::new(PgCustomDomainRepository::new(pool.clone()));
        let token_repo = Arc::new(PgTokenRepository::new(pool.clone()));

        let shorten_service = Arc::new(ShortenService::new(
            url_repo.clone(),
            alias_repo.clone(),
            domain_repo.clone(),
            title_fetcher.clone(),
            CodeGenerator::new(codec.marker()),
            config.self_hosts(),
        ));
        let resolver_service = Arc::new(ResolverService::new(
            url_repo,
            alias_repo.clone(),
            domain_repo.clone(),
            codec.clone(),
        ));

        Self {
            db: pool,
            shorten_service,
            resolver_service,
            alias_service: Arc::new(AliasService::new(alias_repo)),
            domain_service: Arc::new(CustomDomainService::new(
                domain_repo,
                config.extra_reserved_prefixes.clone(),
            )),
            auth_service: Arc::new(AuthService::new(
                token_repo,
                config.token_signing_secret.clone(),
            )),
            title_fetcher,
            codec,
            recent_log,
        }
    }
}
