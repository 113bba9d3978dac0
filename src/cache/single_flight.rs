//! In-flight request coalescing.
//!
//! The first caller for a key runs the fetch; callers that arrive while it is
//! pending wait for the same result. If the running caller is dropped, one of
//! the waiters takes over the fetch.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Per-key single-flight group.
#[derive(Debug)]
pub struct SingleFlight<T> {
    in_flight: DashMap<String, Arc<OnceCell<T>>>,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            in_flight: DashMap::new(),
        }
    }

    /// Run `fetch` for `key`, or join a fetch that is already running.
    pub async fn run<F, Fut>(&self, key: &str, fetch: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let cell = self.in_flight.entry(key.to_string()).or_default().clone();

        let value = cell.get_or_init(fetch).await.clone();

        // Only the group that produced this value may clear the slot.
        self.in_flight
            .remove_if(key, |_, current| Arc::ptr_eq(current, &cell));
        value
    }

    /// Number of keys with a fetch in progress.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}
