//! Routing-id load balancing strategy.

use std::num::NonZeroUsize;

use crate::load_balancer::BackendSelector;

/// Sticky selector keyed by the client-supplied routing id.
///
/// A routing id pins the request to `id mod n`; requests without one are
/// spread uniformly at random.
#[derive(Debug, Default)]
pub struct RoutingIdSelector;

impl RoutingIdSelector {
    pub fn new() -> Self {
        Self
    }
}

impl BackendSelector for RoutingIdSelector {
    fn select_index(&self, len: NonZeroUsize, routing_id: Option<i64>) -> usize {
        let len = len.get();
        match routing_id {
            // rem_euclid keeps negative ids inside [0, len)
            Some(id) => id.rem_euclid(len as i64) as usize,
            None => fastrand::usize(..len),
        }
    }
}
