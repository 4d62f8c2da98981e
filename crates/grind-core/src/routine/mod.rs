//! Long-running, cooldown-gated character routines.
//!
//! A routine is a self-rescheduling sequence of elementary actions. No
//! thread waits out a cooldown: each step hands a boxed continuation to
//! the [`CooldownScheduler`](crate::scheduler::CooldownScheduler) and
//! returns. The persisted [`RoutineRecord`] is the only liveness marker;
//! replacing or deleting it stops the routine at its next checkpoint. An
//! in-flight step is never interrupted, so at most one extra action can
//! run after a cancellation.

pub mod fight;
pub mod gather;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::db::GrindDb;
use crate::error::{GrindError, Result};
use crate::scheduler::CooldownScheduler;

pub use fight::{FightRequest, FightRoutine, MonsterKind};
pub use gather::{GatherRequest, GatherRoutine, ResourceKind};

// ---------------------------------------------------------------------------
// RoutineRequest
// ---------------------------------------------------------------------------

/// A typed start-request, one variant per routine kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutineRequest {
    Gather(GatherRequest),
    Fight(FightRequest),
}

impl RoutineRequest {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Gather(_) => gather::KIND,
            Self::Fight(_) => fight::KIND,
        }
    }
}

// ---------------------------------------------------------------------------
// RoutineRecord
// ---------------------------------------------------------------------------

/// The durable "currently active routine" marker for one character.
///
/// Overwritten on every submission, deleted on cancel. A continuation that
/// finds the record gone, or tagged with another kind, stops without error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineRecord {
    pub character: String,
    pub routine: String,
    pub request: serde_json::Value,
    pub started_at: DateTime<Utc>,
}

impl RoutineRecord {
    pub fn new(character: &str, kind: &str, request: &RoutineRequest) -> Result<Self> {
        Ok(Self {
            character: character.to_string(),
            routine: kind.to_string(),
            request: serde_json::to_value(request)?,
            started_at: Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Routine
// ---------------------------------------------------------------------------

/// One routine kind: a state machine driving a single character through
/// cooldown-gated steps until a stop condition or cancellation.
#[async_trait]
pub trait Routine: Send + Sync {
    /// Tag stored in the [`RoutineRecord`].
    fn kind(&self) -> &'static str;

    /// Whether this routine handles the given request variant.
    fn accepts(&self, request: &RoutineRequest) -> bool;

    /// Run the first step inline; later steps self-schedule.
    async fn start(self: Arc<Self>, character: &str, request: &RoutineRequest) -> Result<()>;
}

/// Schedule `step` to run once `cooldown` elapses, but only if `kind` is
/// still the character's active routine and the deadline has not passed.
/// The record is read fresh at fire time, never cached across steps.
pub(crate) fn continue_when_active(
    scheduler: &CooldownScheduler,
    db: &Arc<GrindDb>,
    kind: &'static str,
    character: String,
    cooldown: Option<DateTime<Utc>>,
    deadline: Option<DateTime<Utc>>,
    step: BoxFuture<'static, Result<()>>,
) {
    let db = Arc::clone(db);
    scheduler.schedule_after(
        cooldown,
        Box::pin(async move {
            match db.get_routine(&character)? {
                Some(record) if record.routine == kind => {
                    if deadline.is_some_and(|at| Utc::now() >= at) {
                        tracing::info!(character, kind, "routine reached its deadline");
                        return Ok(());
                    }
                    step.await
                }
                _ => {
                    tracing::debug!(character, kind, "routine cancelled or replaced");
                    Ok(())
                }
            }
        }),
    );
}

/// Resolve an optional run duration into an absolute deadline.
pub(crate) fn deadline_from(duration: Option<Duration>) -> Option<DateTime<Utc>> {
    duration
        .and_then(|d| chrono::Duration::from_std(d).ok())
        .map(|d| Utc::now() + d)
}

// ---------------------------------------------------------------------------
// Serde helpers for Duration (serialized as whole seconds)
// ---------------------------------------------------------------------------

pub(crate) fn serialize_duration_opt<S>(d: &Option<Duration>, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match d {
        Some(dur) => s.serialize_some(&dur.as_secs()),
        None => s.serialize_none(),
    }
}

pub(crate) fn deserialize_duration_opt<'de, D>(d: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<u64> = Option::deserialize(d)?;
    Ok(opt.map(Duration::from_secs))
}

// ---------------------------------------------------------------------------
// RoutineRegistry
// ---------------------------------------------------------------------------

/// Maps incoming requests to the routine that handles them and owns the
/// per-character active-routine record.
pub struct RoutineRegistry {
    db: Arc<GrindDb>,
    routines: Vec<Arc<dyn Routine>>,
}

impl RoutineRegistry {
    pub fn new(db: Arc<GrindDb>) -> Self {
        Self {
            db,
            routines: Vec::new(),
        }
    }

    /// Handlers are resolved in registration order at submit time.
    pub fn register(&mut self, routine: Arc<dyn Routine>) {
        self.routines.push(routine);
    }

    /// Start a routine for `character`, replacing any active one.
    ///
    /// Overwriting the record is what cancels the previous routine: its
    /// next checkpoint observes the mismatch and stops.
    pub async fn submit(&self, character: &str, request: &RoutineRequest) -> Result<()> {
        let routine = self
            .routines
            .iter()
            .find(|r| r.accepts(request))
            .ok_or_else(|| GrindError::UnsupportedRoutine(request.kind_name().to_string()))?;
        let record = RoutineRecord::new(character, routine.kind(), request)?;
        self.db.put_routine(&record)?;
        tracing::info!(character, kind = routine.kind(), "routine submitted");
        Arc::clone(routine).start(character, request).await
    }

    /// The character's active-routine record, if any.
    pub fn current(&self, character: &str) -> Result<Option<RoutineRecord>> {
        self.db.get_routine(character)
    }

    /// Delete the active-routine record. The running routine stops at its
    /// next checkpoint.
    pub fn cancel(&self, character: &str) -> Result<bool> {
        self.db.delete_routine(character)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
