use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::rate_limit::RateLimiter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub limiter: Arc<RateLimiter>,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let limiter = RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window());

        Ok(Self {
            config,
            limiter: Arc::new(limiter),
            // Per-call timeouts come from LlmConfig; this only bounds connecting.
            http_client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()?,
        })
    }

    /// Periodically drop limiter buckets that have gone idle, so memory does
    /// not grow with every client ever seen.
    pub fn spawn_limiter_sweep(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.limiter.clone();
        let period = limiter.window().max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = limiter.purge_idle(Instant::now());
                if removed > 0 {
                    tracing::debug!(
                        removed,
                        remaining = limiter.tracked_keys(),
                        "Purged idle rate-limit buckets"
                    );
                }
            }
        })
    }
}
