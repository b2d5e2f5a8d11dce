#![cfg(target_arch = "wasm32")]

use checkers::wasm::{create_game, get_game, join_game, make_move, possible_moves};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn field(value: &JsValue, key: &str) -> JsValue {
    js_sys::Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

fn move_request(from: (u8, u8), to: (u8, u8), user: &str) -> JsValue {
    let json = format!(
        r#"{{"from":{{"row":{},"col":{}}},"to":{{"row":{},"col":{}}},"userId":"{}"}}"#,
        from.0, from.1, to.0, to.1, user
    );
    js_sys::JSON::parse(&json).unwrap()
}

#[wasm_bindgen_test]
fn exported_flow_plays_an_opening_move() {
    assert!(checkers::wasm_ready());
    create_game("wasm-flow").unwrap();
    join_game("wasm-flow", "alice").unwrap();
    join_game("wasm-flow", "bob").unwrap();

    let record = make_move("wasm-flow", move_request((2, 1), (3, 2), "alice")).unwrap();

    assert_eq!(field(&record, "currentTurn").as_string().as_deref(), Some("bob"));
    assert_eq!(field(&record, "status").as_string().as_deref(), Some("ongoing"));
    let moves = js_sys::Array::from(&possible_moves("wasm-flow").unwrap());
    assert_eq!(moves.length(), 7);
}

#[wasm_bindgen_test]
fn rejection_is_returned_as_js_error() {
    create_game("wasm-reject").unwrap();

    let err = make_move("wasm-reject", move_request((2, 1), (3, 2), "alice")).unwrap_err();

    assert_eq!(field(&err, "message").as_string().as_deref(), Some("It is not your turn"));
    assert_eq!(field(&err, "status").as_string().as_deref(), Some("forbidden"));
    let err = get_game("wasm-missing").unwrap_err();
    assert_eq!(field(&err, "status").as_string().as_deref(), Some("not_found"));
}
