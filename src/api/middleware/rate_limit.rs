//! Per-client rate limiting using the token bucket algorithm.
//!
//! Two limiters exist: a relaxed one for public API routes and a strict one
//! for authenticated routes. Both live in [`RateLimiters`], which the server
//! builds once and prunes periodically so idle client keys do not accumulate.

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Keys requests by client IP.
///
/// With `behind_proxy` set, the address is read from `X-Forwarded-For`,
/// `X-Real-IP`, or `Forwarded` before falling back to the peer socket.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    behind_proxy: bool,
}

impl ClientIpKeyExtractor {
    pub fn new(behind_proxy: bool) -> Self {
        Self { behind_proxy }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.behind_proxy {
            SmartIpKeyExtractor.extract(req)
        } else {
            PeerIpKeyExtractor.extract(req)
        }
    }
}

type Config = GovernorConfig<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;
pub type ClientIpLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build(behind_proxy: bool, per_second: u64, burst_size: u32) -> Arc<Config> {
    Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor::new(behind_proxy))
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("rate limit quota is non-zero"),
    )
}

/// Shared limiter state for the whole router.
#[derive(Clone)]
pub struct RateLimiters {
    relaxed: Arc<Config>,
    strict: Arc<Config>,
}

impl RateLimiters {
    /// # Limits
    ///
    /// - **Relaxed**: 2 requests per second, burst 100 (public routes)
    /// - **Strict**: 1 request per second, burst 10 (authenticated routes)
    ///
    /// Requests exceeding the limit receive `429 Too Many Requests`.
    pub fn new(behind_proxy: bool) -> Self {
        Self {
            relaxed: build(behind_proxy, 2, 100),
            strict: build(behind_proxy, 1, 10),
        }
    }

    pub fn relaxed_layer(&self) -> ClientIpLayer {
        GovernorLayer::new(self.relaxed.clone())
    }

    pub fn strict_layer(&self) -> ClientIpLayer {
        GovernorLayer::new(self.strict.clone())
    }

    /// Drops buckets that have fully refilled.
    pub fn prune(&self) {
        self.relaxed.limiter().retain_recent();
        self.strict.limiter().retain_recent();
    }

    /// Number of client keys currently tracked across both limiters.
    pub fn tracked_keys(&self) -> usize {
        self.relaxed.limiter().len() + self.strict.limiter().len()
    }

    /// Spawns a task that calls [`RateLimiters::prune`] every `interval`.
    pub fn spawn_pruner(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let limiters = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                limiters.prune();
                tracing::debug!(keys = limiters.tracked_keys(), "Pruned rate limiter state");
            }
        })
    }
}
