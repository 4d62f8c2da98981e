//! The gathering routine: travel to the nearest matching resource and
//! harvest it until the deadline passes or the routine is replaced.
//!
//! Travel and harvest are separate cooldown-gated steps rather than one
//! compound action, so the loop self-corrects if the nearest matching
//! tile changes between steps.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{continue_when_active, deadline_from, Routine, RoutineRequest};
use crate::character::CharacterService;
use crate::db::GrindDb;
use crate::error::{GrindError, Result};
use crate::map::LocationProvider;
use crate::scheduler::CooldownScheduler;

pub(super) const KIND: &str = "gather";

/// Resources the routine knows how to harvest, with their map content codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Copper,
    Gold,
    AshTree,
}

impl ResourceKind {
    pub fn content_code(self) -> &'static str {
        match self {
            Self::Copper => "copper_rocks",
            Self::Gold => "gold_rocks",
            Self::AshTree => "ash_tree",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatherRequest {
    pub resource: ResourceKind,
    /// Maximum run time in whole seconds on the wire; unbounded when absent.
    #[serde(
        serialize_with = "super::serialize_duration_opt",
        deserialize_with = "super::deserialize_duration_opt",
        default
    )]
    pub duration: Option<Duration>,
}

pub struct GatherRoutine {
    characters: Arc<CharacterService>,
    map: Arc<dyn LocationProvider>,
    db: Arc<GrindDb>,
    scheduler: CooldownScheduler,
}

impl GatherRoutine {
    pub fn new(
        characters: Arc<CharacterService>,
        map: Arc<dyn LocationProvider>,
        db: Arc<GrindDb>,
        scheduler: CooldownScheduler,
    ) -> Self {
        Self {
            characters,
            map,
            db,
            scheduler,
        }
    }

    fn step(
        self: Arc<Self>,
        character: String,
        request: GatherRequest,
        deadline: Option<DateTime<Utc>>,
    ) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
        let state = self.characters.get_or_refresh(&character).await?;
        let code = request.resource.content_code();
        let Some(target) = self.map.find_nearest(state.position(), code).await? else {
            tracing::warn!(character, resource = code, "no map location for resource");
            return Ok(());
        };
        if deadline.is_some_and(|at| Utc::now() >= at) {
            tracing::info!(character, resource = code, "gather deadline passed");
            return Ok(());
        }
        let state = if state.position() != target {
            tracing::info!(character, %target, "moving to resource");
            self.characters.move_to(&character, target).await?
        } else {
            tracing::info!(character, resource = code, "harvesting");
            self.characters.gather(&character).await?
        };
        let next = Arc::clone(&self).step(character.clone(), request, deadline);
        continue_when_active(
            &self.scheduler,
            &self.db,
            KIND,
            character,
            state.cooldown_expiration,
            deadline,
            next,
        );
        Ok(())
        })
    }
}

#[async_trait]
impl Routine for GatherRoutine {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn accepts(&self, request: &RoutineRequest) -> bool {
        matches!(request, RoutineRequest::Gather(_))
    }

    async fn start(self: Arc<Self>, character: &str, request: &RoutineRequest) -> Result<()> {
        let RoutineRequest::Gather(request) = request else {
            return Err(GrindError::UnsupportedRoutine(request.kind_name().to_string()));
        };
        let deadline = deadline_from(request.duration);
        self.step(character.to_string(), request.clone(), deadline)
            .await
    }
}
