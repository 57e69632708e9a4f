//! Course search: a rate-limited substring search endpoint over a fixed
//! course catalogue, plus a debounced client that drives it.
//!
//! # Request pipeline
//!
//! - Client: keystroke → state update → 300ms debounce → `GET /api/search?q=`
//! - Server: rate limit → validate → (optional simulated latency) → filter → JSON
//!
//! # Endpoints
//!
//! - `GET /api/search` search, `[{ id, name, desc, type }]` or `{ error }`
//! - `GET /health` liveness plus dataset size and fingerprint
//! - `GET /metrics` Prometheus text format

pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod server;
pub mod state;
pub mod telemetry;
pub mod validation;
