mod client_key;
mod health;
mod metrics;
mod search;

pub use client_key::ClientKey;
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use search::search_handler;
