//! Persistent store for character state and active-routine records.
//!
//! One redb database with two tables keyed by character name, values
//! JSON-encoded. The `routines` table holds at most one record per
//! character (upsert semantics); its presence is the cooperative
//! cancellation signal re-read at every routine checkpoint. It is not a
//! lock: there is no compare-and-set, and the check-then-act window
//! between a checkpoint and the next remote call is accepted.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::actor::ActorState;
use crate::error::{GrindError, Result};
use crate::routine::RoutineRecord;

const CHARACTERS: TableDefinition<&str, &[u8]> = TableDefinition::new("characters");
const ROUTINES: TableDefinition<&str, &[u8]> = TableDefinition::new("routines");

fn store_err(e: impl std::fmt::Display) -> GrindError {
    GrindError::Store(e.to_string())
}

pub struct GrindDb {
    db: Database,
}

impl GrindDb {
    /// Open or create the redb database at `path`, ensuring both tables
    /// exist before any reads.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        wt.open_table(CHARACTERS).map_err(store_err)?;
        wt.open_table(ROUTINES).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }

    pub fn get_character(&self, name: &str) -> Result<Option<ActorState>> {
        self.read(CHARACTERS, name)
    }

    pub fn put_character(&self, state: &ActorState) -> Result<()> {
        self.write(CHARACTERS, &state.name, state)
    }

    /// All stored characters, sorted by name.
    pub fn list_characters(&self) -> Result<Vec<ActorState>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(CHARACTERS).map_err(store_err)?;
        let mut result = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (_, v) = entry.map_err(store_err)?;
            result.push(serde_json::from_slice(v.value())?);
        }
        Ok(result)
    }

    pub fn get_routine(&self, character: &str) -> Result<Option<RoutineRecord>> {
        self.read(ROUTINES, character)
    }

    /// Overwrite the character's active-routine record.
    pub fn put_routine(&self, record: &RoutineRecord) -> Result<()> {
        self.write(ROUTINES, &record.character, record)
    }

    /// Delete the character's active-routine record. Returns whether a
    /// record existed.
    pub fn delete_routine(&self, character: &str) -> Result<bool> {
        let wt = self.db.begin_write().map_err(store_err)?;
        let existed = {
            let mut table = wt.open_table(ROUTINES).map_err(store_err)?;
            let removed = table.remove(character).map_err(store_err)?.is_some();
            removed
        };
        wt.commit().map_err(store_err)?;
        Ok(existed)
    }

    fn read<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> Result<Option<T>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(table).map_err(store_err)?;
        match table.get(key).map_err(store_err)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let encoded = serde_json::to_vec(value)?;
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(table).map_err(store_err)?;
            table.insert(key, encoded.as_slice()).map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
