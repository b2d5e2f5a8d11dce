use wasm_bindgen::prelude::*;

pub mod board;
pub mod capture;
pub mod error;
pub mod game;
pub mod service;
pub mod store;
pub mod types;
pub mod wasm;

pub use board::{Board, Cell};
pub use error::{ErrorStatus, GameError, Rejection, RuleError, StoreError};
pub use game::GameState;
pub use service::GameService;
pub use store::{GameRecord, GameRepository, InMemoryGameStore};
pub use types::{Color, GameStatus, MoveRequest, Piece, PlayerId, Position};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
