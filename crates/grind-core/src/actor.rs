use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Position, Skill};

/// Last-known state of one game character.
///
/// Deserialized straight from the remote character schema; fields the
/// automation never reads (equipment slots, elemental stats, task progress)
/// are not mapped and unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorState {
    pub name: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub xp: i32,
    #[serde(default)]
    pub gold: i32,
    pub hp: i32,
    pub max_hp: i32,
    #[serde(default)]
    pub mining_level: i32,
    #[serde(default)]
    pub woodcutting_level: i32,
    #[serde(default)]
    pub fishing_level: i32,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub cooldown_expiration: Option<DateTime<Utc>>,
}

impl ActorState {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn skill_level(&self, skill: Skill) -> i32 {
        match skill {
            Skill::Mining => self.mining_level,
            Skill::Woodcutting => self.woodcutting_level,
            Skill::Fishing => self.fishing_level,
        }
    }

    /// Whether the character may not act yet at `now`.
    pub fn on_cooldown(&self, now: DateTime<Utc>) -> bool {
        self.cooldown_expiration.is_some_and(|at| now < at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn deserializes_remote_schema_subset() {
        // A trimmed remote payload with keys the struct does not map.
        let json = r#"{
            "name": "Hero1",
            "account": "tester",
            "level": 4,
            "xp": 120,
            "gold": 55,
            "hp": 90,
            "max_hp": 100,
            "mining_level": 3,
            "woodcutting_level": 1,
            "fishing_level": 2,
            "weapon_slot": "copper_dagger",
            "x": 3,
            "y": 4,
            "cooldown": 12,
            "cooldown_expiration": "2026-01-01T00:00:05Z"
        }"#;
        let state: ActorState = serde_json::from_str(json).unwrap();
        assert_eq!(state.name, "Hero1");
        assert_eq!(state.position(), Position::new(3, 4));
        assert_eq!(state.skill_level(Skill::Mining), 3);
        assert_eq!(state.skill_level(Skill::Fishing), 2);
        assert!(state.cooldown_expiration.is_some());
    }

    #[test]
    fn on_cooldown_compares_against_expiration() {
        let now = Utc::now();
        let mut state: ActorState = serde_json::from_str(
            r#"{"name": "A", "hp": 1, "max_hp": 1, "x": 0, "y": 0}"#,
        )
        .unwrap();
        assert!(!state.on_cooldown(now));

        state.cooldown_expiration = Some(now + Duration::seconds(5));
        assert!(state.on_cooldown(now));

        state.cooldown_expiration = Some(now - Duration::seconds(5));
        assert!(!state.on_cooldown(now));
    }
}
