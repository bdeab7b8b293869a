//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::PeerIpKeyExtractor,
};

type PeerIpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

type PeerIpGovernorConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Token bucket parameters for one route group.
///
/// `period` is the time it takes to refill one token, not a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub period: Duration,
    pub burst_size: u32,
}

/// 10 requests per second, bursts of 100.
pub const PUBLIC: RateLimit = RateLimit {
    period: Duration::from_millis(100),
    burst_size: 100,
};

/// 1 request per second, bursts of 10.
pub const ADMIN: RateLimit = RateLimit {
    period: Duration::from_secs(1),
    burst_size: 10,
};

fn config(limit: RateLimit) -> PeerIpGovernorConfig {
    GovernorConfigBuilder::default()
        .period(limit.period)
        .burst_size(limit.burst_size)
        .finish()
        .expect("rate limit period and burst size are non-zero")
}

/// Rate limiter for public and API-key endpoints ([`PUBLIC`]).
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Limits are
/// applied per client IP taken from the socket peer address, so the server
/// must be served with connect info.
pub fn layer() -> PeerIpGovernorLayer {
    GovernorLayer::new(Arc::new(config(PUBLIC)))
}

/// Stricter rate limiter for the admin endpoints ([`ADMIN`]).
pub fn secure_layer() -> PeerIpGovernorLayer {
    GovernorLayer::new(Arc::new(config(ADMIN)))
}
