use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::SearchError;
use crate::handlers::ClientKey;
use crate::metrics::{self, RATE_LIMIT_KEYS, SEARCH_LATENCY, SEARCH_MATCHES, SEARCH_REQUESTS};
use crate::models::{SearchParams, SearchResultDto};
use crate::state::AppState;
use crate::validation::{ValidationError, validate};

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    client: ClientKey,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<SearchResultDto>>, SearchError> {
    let start_time = Instant::now();

    let result = search(&state, &client, params).await;

    SEARCH_LATENCY.observe(start_time.elapsed().as_secs_f64());
    RATE_LIMIT_KEYS.set(state.rate_limiter.tracked_keys() as i64);

    let outcome = match &result {
        Ok(results) if results.is_empty() => metrics::EMPTY,
        Ok(_) => metrics::OK,
        Err(SearchError::Validation(_)) => metrics::INVALID,
        Err(SearchError::RateLimited) => metrics::RATE_LIMITED,
        Err(SearchError::Internal(_)) => metrics::ERROR,
    };
    SEARCH_REQUESTS.with_label_values(&[outcome]).inc();

    result.map(Json)
}

async fn search(
    state: &AppState,
    client: &ClientKey,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Vec<SearchResultDto>, SearchError> {
    // rate limit comes first, even blank queries count
    if !state.rate_limiter.allow(client.as_str()) {
        tracing::warn!(client = %client.as_str(), "rate limit exceeded");
        return Err(SearchError::RateLimited);
    }

    let query = match params {
        Ok(Query(params)) => params.q,
        Err(rejection) => {
            tracing::debug!(client = %client.as_str(), %rejection, "unreadable query parameter");
            return Err(ValidationError::TypeMismatch.into());
        }
    };

    if let Err(e) = validate(&query) {
        tracing::debug!(client = %client.as_str(), query_len = query.len(), error = %e, "query rejected");
        return Err(e.into());
    }

    if let Some(max) = state.simulated_latency {
        simulate_latency(max).await;
    }

    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let results: Vec<SearchResultDto> = state
        .dataset
        .filter(&term)
        .map(SearchResultDto::from)
        .collect();

    SEARCH_MATCHES.observe(results.len() as f64);
    tracing::debug!(client = %client.as_str(), query_len = term.len(), matches = results.len(), "search served");

    Ok(results)
}

// Random delay in [0, max], demo affordance only
async fn simulate_latency(max: Duration) {
    let upper = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    let delay = rand::thread_rng().gen_range(0..=upper);
    tokio::time::sleep(Duration::from_millis(delay)).await;
}
