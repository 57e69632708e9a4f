use std::time::Duration;

use crate::dataset::Dataset;
use crate::rate_limit::RateLimiter;

// app's shared state
pub struct AppState {
    pub dataset: Dataset,
    pub rate_limiter: RateLimiter,
    pub simulated_latency: Option<Duration>, // random delay upper bound, None = off
}

impl AppState {
    pub fn new(dataset: Dataset, rate_limiter: RateLimiter) -> Self {
        Self {
            dataset,
            rate_limiter,
            simulated_latency: None,
        }
    }

    pub fn with_simulated_latency(mut self, latency: Option<Duration>) -> Self {
        self.simulated_latency = latency;
        self
    }
}
