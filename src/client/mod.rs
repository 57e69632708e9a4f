//! Debounced search client.
//!
//! Keystrokes update [`SearchState::query`] immediately. A single pending
//! timer task per controller promotes the query to `debounced_query` once
//! input has been quiet for the debounce interval, and only then is the
//! server called. Every call carries a generation number so a slow response
//! for an old query can never overwrite results for a newer one.

mod api;
mod controller;
mod state;
mod terminal;

pub use api::{ClientError, HttpSearchApi, SearchApi};
pub use controller::{DEFAULT_DEBOUNCE, DebouncedSearch};
pub use state::{SEARCH_FAILED, SearchResult, SearchState, View, ViewBody};
pub use terminal::run;
