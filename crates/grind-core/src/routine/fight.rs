//! The fighting routine: travel to the nearest spawn of a monster and
//! fight it repeatedly, resting back to full HP between fights.

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

pub(super) const KIND: &str = "fight";

/// Monsters the routine knows how to hunt, with their map content codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    Chicken,
    Cow,
    GreenSlime,
}

impl MonsterKind {
    pub fn content_code(self) -> &'static str {
        match self {
            Self::Chicken => "chicken",
            Self::Cow => "cow",
            Self::GreenSlime => "green_slime",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FightRequest {
    pub monster: MonsterKind,
    /// Maximum run time in whole seconds on the wire; unbounded when absent.
    #[serde(
        serialize_with = "super::serialize_duration_opt",
        deserialize_with = "super::deserialize_duration_opt",
        default
    )]
    pub duration: Option<Duration>,
}

pub struct FightRoutine {
    characters: Arc<CharacterService>,
    map: Arc<dyn LocationProvider>,
    db: Arc<GrindDb>,
    scheduler: CooldownScheduler,
}

impl FightRoutine {
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
        request: FightRequest,
        deadline: Option<DateTime<Utc>>,
    ) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
            let state = self.characters.get_or_refresh(&character).await?;
            let code = request.monster.content_code();
            let Some(target) = self.map.find_nearest(state.position(), code).await? else {
                tracing::warn!(character, monster = code, "no map location for monster");
                return Ok(());
            };
            if deadline.is_some_and(|at| Utc::now() >= at) {
                tracing::info!(character, monster = code, "fight deadline passed");
                return Ok(());
            }
            // Heal to full before the next fight; the routine owns its rests,
            // so the one-shot rest-after-fight path stays off here.
            let state = if state.hp < state.max_hp {
                tracing::info!(character, hp = state.hp, max_hp = state.max_hp, "resting");
                self.characters.rest(&character).await?
            } else if state.position() != target {
                tracing::info!(character, %target, "moving to monster");
                self.characters.move_to(&character, target).await?
            } else {
                tracing::info!(character, monster = code, "fighting");
                self.characters.fight(&character, false).await?
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
impl Routine for FightRoutine {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn accepts(&self, request: &RoutineRequest) -> bool {
        matches!(request, RoutineRequest::Fight(_))
    }

    async fn start(self: Arc<Self>, character: &str, request: &RoutineRequest) -> Result<()> {
        let RoutineRequest::Fight(request) = request else {
            return Err(GrindError::UnsupportedRoutine(request.kind_name().to_string()));
        };
        let deadline = deadline_from(request.duration);
        self.step(character.to_string(), request.clone(), deadline)
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
