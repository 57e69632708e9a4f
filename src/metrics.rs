use lazy_static::lazy_static;
use prometheus::{
    Histogram, IntCounterVec, IntGauge, register_histogram, register_int_counter_vec,
    register_int_gauge,
};

lazy_static! {
    pub static ref SEARCH_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "search_requests_total",
        "Search requests by outcome",
        &["outcome"]
    )
    .unwrap();
    pub static ref SEARCH_LATENCY: Histogram = register_histogram!(
        "search_request_latency_seconds",
        "Search request latency in seconds"
    )
    .unwrap();
    pub static ref SEARCH_MATCHES: Histogram = register_histogram!(
        "search_matches",
        "Number of courses returned per search",
        vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0]
    )
    .unwrap();
    pub static ref RATE_LIMIT_KEYS: IntGauge = register_int_gauge!(
        "rate_limit_tracked_keys",
        "Distinct client keys in the rate limit table"
    )
    .unwrap();
}

// outcome label values
pub const OK: &str = "ok";
pub const EMPTY: &str = "empty";
pub const INVALID: &str = "invalid";
pub const RATE_LIMITED: &str = "rate_limited";
pub const ERROR: &str = "error";
