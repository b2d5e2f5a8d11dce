use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;

/// A board coordinate. Row 0 is black's back rank, row 7 is red's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Steps `(dr, dc)` away from this square; `None` when that leaves the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i32 + dr as i32;
        let col = self.col as i32 + dc as i32;
        if in_bounds(row, col) {
            Some(Position::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub(crate) fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::Red,
            Color::Red => Color::Black,
        }
    }

    /// Row delta of a forward step: black moves toward row 7, red toward row 0.
    pub fn forward(self) -> i8 {
        match self {
            Color::Black => 1,
            Color::Red => -1,
        }
    }

    pub fn promotion_row(self) -> u8 {
        match self {
            Color::Black => (BOARD_SIZE - 1) as u8,
            Color::Red => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub rank: Rank,
}

impl Piece {
    pub const fn man(color: Color) -> Self {
        Self {
            color,
            rank: Rank::Man,
        }
    }

    pub const fn king(color: Color) -> Self {
        Self {
            color,
            rank: Rank::King,
        }
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    pub fn crowned(self) -> Self {
        Self::king(self.color)
    }

    /// Diagonal directions this piece may step or jump in.
    pub fn directions(&self) -> &'static [(i8, i8)] {
        static ALL: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];
        match (self.rank, self.color) {
            (Rank::King, _) => &ALL,
            (Rank::Man, Color::Black) => &ALL[..2],
            (Rank::Man, Color::Red) => &ALL[2..],
        }
    }
}

/// One capturing hop over an adjacent opponent piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jump {
    pub from: Position,
    pub to: Position,
    pub captured: Position,
}

/// Consecutive jumps by the same piece; never empty once recorded.
pub type JumpSequence = Vec<Jump>;

/// Opaque caller identity handed over by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub from: Position,
    pub to: Position,
    pub player: PlayerId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    #[serde(rename = "ongoing")]
    Ongoing,
    /// Black wins.
    #[serde(rename = "player1_wins")]
    Player1Wins,
    /// Red wins.
    #[serde(rename = "player2_wins")]
    Player2Wins,
    #[serde(rename = "draw")]
    Draw,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Incoming move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: Position,
    pub to: Position,
    pub user_id: PlayerId,
}

impl MoveRequest {
    pub fn new(from: Position, to: Position, user_id: impl Into<String>) -> Self {
        Self {
            from,
            to,
            user_id: PlayerId::new(user_id),
        }
    }
}

/// One legal action for the side to move. `captures == 0` marks a simple step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOption {
    pub from: Position,
    pub to: Position,
    pub captures: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_returns_none_when_leaving_the_board() {
        let corner = Position::new(0, 0);

        assert_eq!(corner.offset(1, 1), Some(Position::new(1, 1)));
        assert_eq!(corner.offset(-1, 1), None);
        assert_eq!(Position::new(7, 7).offset(1, -1), None);
    }

    #[test]
    fn men_only_face_forward_and_kings_face_everywhere() {
        assert_eq!(Piece::man(Color::Black).directions(), &[(1i8, -1i8), (1, 1)]);
        assert_eq!(Piece::man(Color::Red).directions(), &[(-1i8, -1i8), (-1, 1)]);
        assert_eq!(Piece::king(Color::Red).directions().len(), 4);
    }

    #[test]
    fn status_uses_wire_names() {
        let json = serde_json::to_string(&GameStatus::Player2Wins).unwrap();
        assert_eq!(json, "\"player2_wins\"");

        let status: GameStatus = serde_json::from_str("\"ongoing\"").unwrap();
        assert!(!status.is_over());
    }

    #[test]
    fn move_request_reads_camel_case_user_id() {
        let req: MoveRequest = serde_json::from_str(
            r#"{"from":{"row":2,"col":1},"to":{"row":3,"col":2},"userId":"alice"}"#,
        )
        .unwrap();

        assert_eq!(req, MoveRequest::new(Position::new(2, 1), Position::new(3, 2), "alice"));
    }
}
