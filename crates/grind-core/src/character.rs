//! Character actions and state persistence.
//!
//! Every remote action persists the returned state before anything else
//! reads it; the store is the only view of a character the routines use
//! between steps.

use std::sync::Arc;

use crate::actor::ActorState;
use crate::client::ActionClient;
use crate::db::GrindDb;
use crate::error::Result;
use crate::scheduler::CooldownScheduler;
use crate::types::Position;

pub struct CharacterService {
    client: Arc<dyn ActionClient>,
    db: Arc<GrindDb>,
    scheduler: CooldownScheduler,
}

impl CharacterService {
    pub fn new(client: Arc<dyn ActionClient>, db: Arc<GrindDb>, scheduler: CooldownScheduler) -> Self {
        Self {
            client,
            db,
            scheduler,
        }
    }

    /// Fetch the character from the game API and persist it.
    pub async fn refresh(&self, name: &str) -> Result<ActorState> {
        let state = self.client.fetch_character(name).await?;
        self.db.put_character(&state)?;
        Ok(state)
    }

    /// Stored state, falling back to a remote refresh when the store has
    /// never seen this character.
    pub async fn get_or_refresh(&self, name: &str) -> Result<ActorState> {
        match self.db.get_character(name)? {
            Some(state) => Ok(state),
            None => self.refresh(name).await,
        }
    }

    /// Fetch all account characters, persisting each.
    pub async fn list(&self) -> Result<Vec<ActorState>> {
        let all = self.client.fetch_all_characters().await?;
        for state in &all {
            self.db.put_character(state)?;
        }
        Ok(all)
    }

    /// Move the character, skipping the remote call when it is already at
    /// the destination (no cooldown is incurred in that case).
    pub async fn move_to(&self, name: &str, destination: Position) -> Result<ActorState> {
        if let Some(current) = self.db.get_character(name)? {
            if current.position() == destination {
                tracing::info!(name, %destination, "already at destination");
                return Ok(current);
            }
        }
        let state = self.client.move_to(name, destination).await?;
        self.db.put_character(&state)?;
        tracing::info!(name, %destination, "moved");
        Ok(state)
    }

    pub async fn gather(&self, name: &str) -> Result<ActorState> {
        let state = self.client.gather(name).await?;
        self.db.put_character(&state)?;
        tracing::info!(name, "gathered");
        Ok(state)
    }

    pub async fn rest(&self, name: &str) -> Result<ActorState> {
        let state = self.client.rest(name).await?;
        self.db.put_character(&state)?;
        tracing::info!(name, hp = state.hp, max_hp = state.max_hp, "rested");
        Ok(state)
    }

    /// Fight at the current tile. With `rest_after`, a character that ends
    /// the fight below max HP gets a one-shot rest scheduled for when the
    /// fight cooldown elapses. The rest runs outside any routine and is
    /// not serialized against routine steps.
    pub async fn fight(&self, name: &str, rest_after: bool) -> Result<ActorState> {
        let state = self.client.fight(name).await?;
        self.db.put_character(&state)?;
        tracing::info!(name, hp = state.hp, max_hp = state.max_hp, "fought");
        if rest_after && state.hp < state.max_hp {
            let client = Arc::clone(&self.client);
            let db = Arc::clone(&self.db);
            let name = name.to_string();
            self.scheduler.schedule_after(
                state.cooldown_expiration,
                Box::pin(async move {
                    let rested = client.rest(&name).await?;
                    db.put_character(&rested)?;
                    tracing::info!(name, hp = rested.hp, "rested after fight");
                    Ok(())
                }),
            );
        }
        Ok(state)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
