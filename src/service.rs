use tracing::{debug, info, warn};

use crate::error::GameError;
use crate::game::GameState;
use crate::store::{GameRecord, GameRepository};
use crate::types::{MoveOption, MoveRequest, PlayerId};

/// Load, validate, apply and save, on top of an injected repository.
///
/// Each mutation is a single compare-and-swap save; a concurrent writer
/// surfaces as `GameError::Conflict` and the caller retries.
pub struct GameService {
    repository: Box<dyn GameRepository>,
}

impl GameService {
    pub fn new(repository: Box<dyn GameRepository>) -> Self {
        Self { repository }
    }

    pub fn create_game(&self, game_id: &str) -> Result<GameRecord, GameError> {
        let record = self
            .repository
            .insert(GameRecord::new(game_id, GameState::new()))?;
        info!(game_id, "game created");
        Ok(record)
    }

    pub fn get_game(&self, game_id: &str) -> Result<GameRecord, GameError> {
        self.repository.load(game_id)?.ok_or(GameError::NotFound)
    }

    pub fn list_games(&self) -> Result<Vec<GameRecord>, GameError> {
        Ok(self.repository.list()?)
    }

    pub fn join_game(&self, game_id: &str, user_id: &str) -> Result<GameRecord, GameError> {
        let mut record = self.get_game(game_id)?;
        let user = PlayerId::new(user_id);
        record.state = record.state.join(&user).inspect_err(|err| {
            debug!(game_id, user_id, %err, "join rejected");
        })?;

        let saved = self.persist(record)?;
        info!(game_id, user_id, "player joined");
        Ok(saved)
    }

    pub fn make_move(&self, game_id: &str, request: &MoveRequest) -> Result<GameRecord, GameError> {
        let mut record = self.get_game(game_id)?;
        let before = remaining_total(&record.state);
        record.state = record.state.apply_move(request).inspect_err(|err| {
            debug!(
                game_id,
                user_id = %request.user_id,
                from = %request.from,
                to = %request.to,
                %err,
                "move rejected"
            );
        })?;

        let captures = before.saturating_sub(remaining_total(&record.state));
        let saved = self.persist(record)?;
        info!(
            game_id,
            user_id = %request.user_id,
            from = %request.from,
            to = %request.to,
            captures,
            status = ?saved.state.status,
            "move applied"
        );
        Ok(saved)
    }

    pub fn possible_moves(&self, game_id: &str) -> Result<Vec<MoveOption>, GameError> {
        Ok(self.get_game(game_id)?.state.possible_moves())
    }

    fn persist(&self, record: GameRecord) -> Result<GameRecord, GameError> {
        let game_id = record.game_id.clone();
        self.repository.save(record).map_err(|err| {
            warn!(game_id = %game_id, %err, "failed to save game");
            GameError::from(err)
        })
    }
}

fn remaining_total(state: &GameState) -> u8 {
    state.black_remaining + state.red_remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorStatus, RuleError, StoreError};
    use crate::store::InMemoryGameStore;
    use crate::types::{GameStatus, Position};

    /// Repository whose writes always lose the race.
    struct RacingStore {
        inner: InMemoryGameStore,
    }

    impl GameRepository for RacingStore {
        fn load(&self, game_id: &str) -> Result<Option<GameRecord>, StoreError> {
            self.inner.load(game_id)
        }

        fn insert(&self, record: GameRecord) -> Result<GameRecord, StoreError> {
            self.inner.insert(record)
        }

        fn save(&self, record: GameRecord) -> Result<GameRecord, StoreError> {
            Err(StoreError::Conflict {
                game_id: record.game_id,
            })
        }

        fn list(&self) -> Result<Vec<GameRecord>, StoreError> {
            self.inner.list()
        }
    }

    fn service() -> GameService {
        GameService::new(Box::new(InMemoryGameStore::new()))
    }

    fn seated(service: &GameService, game_id: &str) {
        service.create_game(game_id).unwrap();
        service.join_game(game_id, "alice").unwrap();
        service.join_game(game_id, "bob").unwrap();
    }

    #[test]
    fn full_flow_create_join_move() {
        let service = service();
        seated(&service, "g1");

        let request = MoveRequest::new(Position::new(2, 1), Position::new(3, 2), "alice");
        let record = service.make_move("g1", &request).unwrap();

        assert_eq!(record.revision, 3);
        assert_eq!(record.state.current_turn, Some(PlayerId::new("bob")));
        assert_eq!(record.state.status, GameStatus::Ongoing);
        assert_eq!(service.get_game("g1").unwrap(), record);
        assert_eq!(service.possible_moves("g1").unwrap().len(), 7);
    }

    #[test]
    fn capture_through_the_service_lowers_the_stored_counter() {
        let service = service();
        seated(&service, "g1");
        let moves = [
            ((2, 1), (3, 2), "alice"),
            ((5, 0), (4, 1), "bob"),
            ((3, 2), (5, 0), "alice"),
        ];
        for ((fr, fc), (tr, tc), user) in moves {
            let request = MoveRequest::new(Position::new(fr, fc), Position::new(tr, tc), user);
            service.make_move("g1", &request).unwrap();
        }

        let stored = service.get_game("g1").unwrap();

        assert_eq!(stored.state.red_remaining, 11);
        assert_eq!(stored.state.black_remaining, 12);
        assert_eq!(stored.state.current_turn, Some(PlayerId::new("bob")));
    }

    #[test]
    fn unknown_game_is_not_found() {
        let service = service();
        let request = MoveRequest::new(Position::new(2, 1), Position::new(3, 2), "alice");

        let err = service.make_move("missing", &request).unwrap_err();

        assert_eq!(err, GameError::NotFound);
        assert_eq!(err.status(), ErrorStatus::NotFound);
        assert_eq!(service.join_game("missing", "alice").unwrap_err(), GameError::NotFound);
    }

    #[test]
    fn rejected_move_is_not_persisted() {
        let service = service();
        seated(&service, "g1");
        let before = service.get_game("g1").unwrap();

        let request = MoveRequest::new(Position::new(2, 1), Position::new(3, 2), "bob");
        let err = service.make_move("g1", &request).unwrap_err();

        assert_eq!(err, GameError::Rule(RuleError::NotYourTurn));
        assert_eq!(err.rejection().status.http_code(), 403);
        assert_eq!(service.get_game("g1").unwrap(), before);
    }

    #[test]
    fn duplicate_game_id_is_refused() {
        let service = service();
        service.create_game("g1").unwrap();

        assert_eq!(service.create_game("g1").unwrap_err(), GameError::AlreadyExists);
        assert_eq!(service.list_games().unwrap().len(), 1);
    }

    #[test]
    fn third_player_cannot_join() {
        let service = service();
        seated(&service, "g1");

        let err = service.join_game("g1", "carol").unwrap_err();

        assert_eq!(err.to_string(), "Game is already full");
        assert_eq!(err.status(), ErrorStatus::BadRequest);
    }

    #[test]
    fn lost_save_race_reports_conflict() {
        let service = GameService::new(Box::new(RacingStore {
            inner: InMemoryGameStore::new(),
        }));
        service.create_game("g1").unwrap();

        let err = service.join_game("g1", "alice").unwrap_err();

        assert_eq!(err, GameError::Conflict);
        assert_eq!(err.status(), ErrorStatus::Conflict);
        assert_eq!(service.get_game("g1").unwrap().state.black_player, None);
    }
}
