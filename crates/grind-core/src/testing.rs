//! Call-recording doubles for the remote-API seams.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::actor::ActorState;
use crate::client::ActionClient;
use crate::error::Result;
use crate::map::LocationProvider;
use crate::types::Position;

/// A character at the given position, healthy and off cooldown.
pub fn actor(name: &str, x: i32, y: i32) -> ActorState {
    ActorState {
        name: name.to_string(),
        level: 1,
        xp: 0,
        gold: 0,
        hp: 100,
        max_hp: 100,
        mining_level: 1,
        woodcutting_level: 1,
        fishing_level: 1,
        x,
        y,
        cooldown_expiration: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchCharacter,
    FetchAll,
    Move(Position),
    Gather,
    Fight,
    Rest,
}

/// In-memory [`ActionClient`] that records every call and mutates a single
/// character the way the game server would.
pub struct MockClient {
    state: Mutex<ActorState>,
    calls: Mutex<Vec<Call>>,
    cooldown: Option<Duration>,
}

impl MockClient {
    pub fn new(state: ActorState) -> Self {
        Self {
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
            cooldown: None,
        }
    }

    /// Every action response carries a cooldown expiring `millis` from now.
    pub fn with_cooldown(state: ActorState, millis: i64) -> Self {
        Self {
            cooldown: Some(Duration::milliseconds(millis)),
            ..Self::new(state)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: Call, mutate: impl FnOnce(&mut ActorState)) -> ActorState {
        let mut state = self.state.lock().unwrap();
        mutate(&mut state);
        state.cooldown_expiration = self.cooldown.map(|d| Utc::now() + d);
        self.calls.lock().unwrap().push(call);
        state.clone()
    }
}

#[async_trait]
impl ActionClient for MockClient {
    async fn fetch_character(&self, _name: &str) -> Result<ActorState> {
        self.calls.lock().unwrap().push(Call::FetchCharacter);
        Ok(self.state.lock().unwrap().clone())
    }

    async fn fetch_all_characters(&self) -> Result<Vec<ActorState>> {
        self.calls.lock().unwrap().push(Call::FetchAll);
        Ok(vec![self.state.lock().unwrap().clone()])
    }

    async fn move_to(&self, _name: &str, destination: Position) -> Result<ActorState> {
        Ok(self.respond(Call::Move(destination), |s| {
            s.x = destination.x;
            s.y = destination.y;
        }))
    }

    async fn gather(&self, _name: &str) -> Result<ActorState> {
        Ok(self.respond(Call::Gather, |_| {}))
    }

    async fn fight(&self, _name: &str) -> Result<ActorState> {
        Ok(self.respond(Call::Fight, |s| s.hp = (s.hp - 10).max(1)))
    }

    async fn rest(&self, _name: &str) -> Result<ActorState> {
        Ok(self.respond(Call::Rest, |s| s.hp = (s.hp + 20).min(s.max_hp)))
    }
}

/// [`LocationProvider`] with one fixed answer.
pub struct MockMap {
    target: Option<Position>,
}

impl MockMap {
    pub fn new(target: Option<Position>) -> Self {
        Self { target }
    }
}

#[async_trait]
impl LocationProvider for MockMap {
    async fn find_nearest(&self, _from: Position, _content_code: &str) -> Result<Option<Position>> {
        Ok(self.target)
    }
}
