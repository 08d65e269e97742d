//! Request observation hooks.
//!
//! The REST layer never logs directly; it reports each outcome to a
//! [`QueryObserver`] handed to it at startup.

use crate::error::ApiError;
use std::time::Duration;
use wordvec_core::QueryKind;

/// A query that was answered successfully
#[derive(Debug, Clone)]
pub struct ServedQuery {
    pub kind: QueryKind,
    /// Number of similarity pairs or matches in the response
    pub items: usize,
    pub elapsed: Duration,
}

/// A query that was turned away
#[derive(Debug)]
pub struct RejectedQuery<'a> {
    pub kind: QueryKind,
    pub error: &'a ApiError,
    pub elapsed: Duration,
}

pub trait QueryObserver: Send + Sync {
    fn served(&self, event: &ServedQuery);
    fn rejected(&self, event: &RejectedQuery<'_>);
}

/// Emits `tracing` events for every query
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn served(&self, event: &ServedQuery) {
        tracing::info!(
            query = %event.kind,
            items = event.items,
            elapsed_us = event.elapsed.as_micros() as u64,
            "query served"
        );
    }

    fn rejected(&self, event: &RejectedQuery<'_>) {
        let status = event.error.status().as_u16();
        if status >= 500 {
            tracing::error!(query = %event.kind, status, error = %event.error, "query failed");
        } else {
            tracing::warn!(query = %event.kind, status, error = %event.error, "query rejected");
        }
    }
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl QueryObserver for NoopObserver {
    fn served(&self, _event: &ServedQuery) {}
    fn rejected(&self, _event: &RejectedQuery<'_>) {}
}
