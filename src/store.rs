use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use web_time::SystemTime;

use crate::error::StoreError;
use crate::game::GameState;

/// A game as persisted: identity, bookkeeping and the rules state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: String,
    /// Milliseconds since the Unix epoch.
    pub creation_time: u64,
    /// Bumped by every successful save; used for optimistic concurrency.
    pub revision: u64,
    #[serde(flatten)]
    pub state: GameState,
}

impl GameRecord {
    pub fn new(game_id: impl Into<String>, state: GameState) -> Self {
        Self {
            game_id: game_id.into(),
            creation_time: now_millis(),
            revision: 0,
            state,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Durable storage for game records.
///
/// `save` is a compare-and-swap on `revision`: it must fail with
/// `StoreError::Conflict` when the stored revision differs from the incoming
/// one, and on success store and return the record with `revision + 1`.
pub trait GameRepository: Send + Sync {
    fn load(&self, game_id: &str) -> Result<Option<GameRecord>, StoreError>;
    fn insert(&self, record: GameRecord) -> Result<GameRecord, StoreError>;
    fn save(&self, record: GameRecord) -> Result<GameRecord, StoreError>;
    fn list(&self) -> Result<Vec<GameRecord>, StoreError>;
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: Mutex<HashMap<String, GameRecord>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameRepository for InMemoryGameStore {
    fn load(&self, game_id: &str) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.games.lock().get(game_id).cloned())
    }

    fn insert(&self, record: GameRecord) -> Result<GameRecord, StoreError> {
        let mut games = self.games.lock();
        if games.contains_key(&record.game_id) {
            return Err(StoreError::Duplicate {
                game_id: record.game_id,
            });
        }
        games.insert(record.game_id.clone(), record.clone());
        Ok(record)
    }

    fn save(&self, mut record: GameRecord) -> Result<GameRecord, StoreError> {
        let mut games = self.games.lock();
        let stored = games
            .get_mut(&record.game_id)
            .ok_or_else(|| StoreError::Backend(format!("game {} is not stored", record.game_id)))?;
        if stored.revision != record.revision {
            return Err(StoreError::Conflict {
                game_id: record.game_id,
            });
        }

        record.revision += 1;
        *stored = record.clone();
        Ok(record)
    }

    fn list(&self) -> Result<Vec<GameRecord>, StoreError> {
        let mut records: Vec<GameRecord> = self.games.lock().values().cloned().collect();
        records.sort_by(|a, b| {
            a.creation_time
                .cmp(&b.creation_time)
                .then_with(|| a.game_id.cmp(&b.game_id))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicate_ids() {
        let store = InMemoryGameStore::new();
        store.insert(GameRecord::new("g1", GameState::new())).unwrap();

        let err = store.insert(GameRecord::new("g1", GameState::new())).unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[test]
    fn save_bumps_revision() {
        let store = InMemoryGameStore::new();
        let record = store.insert(GameRecord::new("g1", GameState::new())).unwrap();

        let saved = store.save(record).unwrap();

        assert_eq!(saved.revision, 1);
        assert_eq!(store.load("g1").unwrap().unwrap().revision, 1);
    }

    #[test]
    fn save_with_stale_revision_conflicts() {
        let store = InMemoryGameStore::new();
        let record = store.insert(GameRecord::new("g1", GameState::new())).unwrap();
        let stale = record.clone();
        store.save(record).unwrap();

        let err = store.save(stale).unwrap_err();

        assert_eq!(
            err,
            StoreError::Conflict {
                game_id: "g1".into()
            }
        );
    }

    #[test]
    fn save_of_unknown_game_is_a_backend_error() {
        let store = InMemoryGameStore::new();

        let err = store.save(GameRecord::new("nope", GameState::new())).unwrap_err();

        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn list_returns_all_records() {
        let store = InMemoryGameStore::new();
        store.insert(GameRecord::new("b", GameState::new())).unwrap();
        store.insert(GameRecord::new("a", GameState::new())).unwrap();

        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.game_id).collect();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"a".to_string()));
        assert!(ids.contains(&"b".to_string()));
        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn record_flattens_state_into_wire_object() {
        let record = GameRecord::new("g1", GameState::new());

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["gameId"], "g1");
        assert_eq!(json["status"], "ongoing");
        assert_eq!(json["blackRemaining"], 12);
        assert!(json["creationTime"].as_u64().unwrap() > 0);
    }
}
