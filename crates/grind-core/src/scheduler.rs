//! One-shot scheduling of continuations at cooldown expiry.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use tokio::runtime::Handle;

use crate::error::Result;

/// Schedules a single future to run at or after an instant.
///
/// A `None` or already-past expiration runs the task with no artificial
/// wait. Task errors are logged and dropped, so one character's failed
/// step never takes down another character's pending callbacks. There is
/// no cancellation of an already-scheduled task; routines stop themselves
/// at their next checkpoint instead.
#[derive(Clone)]
pub struct CooldownScheduler {
    handle: Handle,
}

impl CooldownScheduler {
    /// Capture the current tokio runtime handle. Call from within the
    /// runtime that should own the callbacks.
    pub fn new() -> Self {
        Self {
            handle: Handle::current(),
        }
    }

    pub fn schedule_after(
        &self,
        expiration: Option<DateTime<Utc>>,
        task: BoxFuture<'static, Result<()>>,
    ) {
        let delay = expiration
            .and_then(|at| (at - Utc::now()).to_std().ok())
            .unwrap_or_default();
        self.handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "scheduled step failed, not rescheduling");
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
