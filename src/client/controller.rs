use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::api::SearchApi;
use crate::client::state::{SEARCH_FAILED, SearchState};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

const DIAGNOSTIC_SAMPLES: usize = 100_000;

struct Inner<A> {
    api: A,
    state: watch::Sender<SearchState>,
    debounce: Duration,
    // bumped under the state lock every time debounced_query changes
    generation: AtomicU64,
}

/// Search controller with a trailing-edge debounce in front of the api.
pub struct DebouncedSearch<A> {
    inner: Arc<Inner<A>>,
    pending: Option<JoinHandle<()>>,
}

impl<A> DebouncedSearch<A>
where
    A: SearchApi + 'static,
{
    pub fn new(api: A, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());

        Self {
            inner: Arc::new(Inner {
                api,
                state,
                debounce,
                generation: AtomicU64::new(0),
            }),
            pending: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    // New full value of the input field
    pub fn input(&mut self, value: impl Into<String>) {
        let value = value.into();
        debug!(
            len = value.chars().count(),
            first = ?value.chars().next().map(|c| c.to_uppercase().to_string()),
            "input changed"
        );

        self.inner.state.send_modify(|s| s.query = value.clone());

        // one pending timer at a time
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let inner = Arc::clone(&self.inner);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            inner.commit(value);
        }));
    }

    /// Waits for the pending timer, if any, to fire.
    pub async fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            let _ = pending.await;
        }
    }

    /// Fires the pending timer and waits until the current query is answered.
    /// Responses to superseded queries may still be in flight afterwards.
    pub async fn settle(&mut self) -> SearchState {
        self.flush().await;

        let mut updates = self.subscribe();
        match updates.wait_for(|s| !s.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    // Must only be called once the first frame is on screen
    pub fn mark_rendered(&self) {
        if self.inner.state.borrow().diagnostic.is_some() {
            return;
        }

        let value = diagnostic_sum();
        self.inner.state.send_if_modified(|s| {
            if s.diagnostic.is_some() {
                return false;
            }
            s.diagnostic = Some(value);
            true
        });
    }
}

impl<A> Drop for DebouncedSearch<A> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<A> Inner<A>
where
    A: SearchApi + 'static,
{
    fn commit(self: &Arc<Self>, value: String) {
        let blank = value.trim().is_empty();
        let mut issued = None;

        self.state.send_if_modified(|s| {
            if s.debounced_query == value {
                return false;
            }

            s.debounced_query = value.clone();
            issued = Some(self.generation.fetch_add(1, Ordering::SeqCst) + 1);

            if blank {
                s.results.clear();
                s.loading = false;
            } else {
                s.loading = true;
                s.error = None;
            }
            true
        });

        let Some(generation) = issued else {
            return;
        };
        if blank {
            return;
        }

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            inner.fetch(generation, value).await;
        });
    }

    async fn fetch(&self, generation: u64, query: String) {
        let outcome = self.api.search(&query).await;

        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(%query, generation, "dropping stale response");
                return false;
            }

            match outcome {
                Ok(results) => {
                    s.results = results;
                    s.search_count += 1;
                    debug!(search_count = s.search_count, "search analytics");
                }
                Err(e) => {
                    // previous results stay on screen
                    warn!(error = %e, %query, "search failed");
                    s.error = Some(SEARCH_FAILED.to_string());
                }
            }
            s.loading = false;
            true
        });
    }
}

// Bounded pseudo-random accumulation shown as a diagnostic
fn diagnostic_sum() -> f64 {
    let mut rng = rand::thread_rng();
    (0..DIAGNOSTIC_SAMPLES).map(|_| rng.gen_range(0.0_f64..1.0)).sum()
}
