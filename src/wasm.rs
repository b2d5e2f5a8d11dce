use once_cell::sync::Lazy;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{ErrorStatus, GameError, Rejection};
use crate::service::GameService;
use crate::store::InMemoryGameStore;
use crate::types::MoveRequest;

static SERVICE: Lazy<GameService> =
    Lazy::new(|| GameService::new(Box::new(InMemoryGameStore::new())));

#[wasm_bindgen]
pub fn create_game(game_id: &str) -> Result<JsValue, JsValue> {
    respond(SERVICE.create_game(game_id))
}

#[wasm_bindgen]
pub fn join_game(game_id: &str, user_id: &str) -> Result<JsValue, JsValue> {
    respond(SERVICE.join_game(game_id, user_id))
}

/// `request` is `{ from: {row, col}, to: {row, col}, userId }`.
#[wasm_bindgen]
pub fn make_move(game_id: &str, request: JsValue) -> Result<JsValue, JsValue> {
    let request: MoveRequest = serde_wasm_bindgen::from_value(request).map_err(|err| {
        let rejection = Rejection {
            message: err.to_string(),
            status: ErrorStatus::BadRequest,
        };
        to_js(&rejection).unwrap_or_else(|js_err| js_err)
    })?;
    respond(SERVICE.make_move(game_id, &request))
}

#[wasm_bindgen]
pub fn get_game(game_id: &str) -> Result<JsValue, JsValue> {
    respond(SERVICE.get_game(game_id))
}

#[wasm_bindgen]
pub fn list_games() -> Result<JsValue, JsValue> {
    respond(SERVICE.list_games())
}

#[wasm_bindgen]
pub fn possible_moves(game_id: &str) -> Result<JsValue, JsValue> {
    respond(SERVICE.possible_moves(game_id))
}

fn respond<T: Serialize>(result: Result<T, GameError>) -> Result<JsValue, JsValue> {
    match result {
        Ok(value) => to_js(&value),
        Err(err) => Err(to_js(&err.rejection())?),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}
