use serde::{Deserialize, Serialize};

use crate::error::BoardParseError;
use crate::types::{BOARD_SIZE, Color, Jump, Piece, Position, Rank, in_bounds};

/// Men per side in the starting layout.
pub const PIECES_PER_SIDE: u8 = 12;
const HOME_ROWS: usize = 3;

/// What a coordinate lookup finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Occupied(Piece),
    OffBoard,
}

impl Cell {
    pub fn piece(self) -> Option<Piece> {
        match self {
            Cell::Occupied(piece) => Some(piece),
            Cell::Empty | Cell::OffBoard => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Checkers board as an 8x8 grid of optional pieces.
///
/// The board is `Copy`, so every search branch works on its own value.
/// Only dark squares (`(row + col)` odd) are occupied in the standard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates the starting layout:
    /// 12 black men on rows 0-2, 12 red men on rows 5-7.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..BOARD_SIZE {
            let color = if row < HOME_ROWS {
                Color::Black
            } else if row >= BOARD_SIZE - HOME_ROWS {
                Color::Red
            } else {
                continue;
            };
            for col in 0..BOARD_SIZE {
                if is_dark(row, col) {
                    board.squares[row][col] = Some(Piece::man(color));
                }
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Builds a board holding exactly the given pieces. Off-board entries are ignored.
    pub fn with_pieces(pieces: &[(Position, Piece)]) -> Self {
        let mut board = Self::empty();
        for &(pos, piece) in pieces {
            board.set(pos, Some(piece));
        }
        board
    }

    /// Looks up a square. Coordinates outside the grid yield `Cell::OffBoard`
    /// rather than an error so searches can bounds-check by pattern matching.
    pub fn get(&self, row: i32, col: i32) -> Cell {
        if !in_bounds(row, col) {
            return Cell::OffBoard;
        }
        match self.squares[row as usize][col as usize] {
            Some(piece) => Cell::Occupied(piece),
            None => Cell::Empty,
        }
    }

    pub fn at(&self, pos: Position) -> Cell {
        self.get(pos.row as i32, pos.col as i32)
    }

    /// Relocates whatever stands on `from` to `to`. No legality checks.
    pub fn with_move(&self, from: Position, to: Position) -> Board {
        let mut next = *self;
        let piece = next.take(from);
        next.set(to, piece);
        next
    }

    /// Performs one hop: relocates the jumper and removes the captured piece.
    pub fn with_capture(&self, jump: &Jump) -> Board {
        let mut next = self.with_move(jump.from, jump.to);
        next.set(jump.captured, None);
        next
    }

    /// Crowns the man on `pos`. Returns `true` when a promotion happened.
    pub fn promote(&mut self, pos: Position) -> bool {
        match self.at(pos) {
            Cell::Occupied(piece) if !piece.is_king() => {
                self.set(pos, Some(piece.crowned()));
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, color: Color) -> u8 {
        self.pieces(color).count() as u8
    }

    /// Iterates occupied squares of one color in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(move |(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| match cell {
                Some(piece) if piece.color == color => {
                    Some((Position::new(row as u8, col as u8), *piece))
                }
                _ => None,
            })
        })
    }

    /// Converts the board to its wire form: rows of piece tokens, `""` for empty.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.squares
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| cell.map(piece_token).unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    }

    fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_on_board() {
            self.squares[pos.row as usize][pos.col as usize] = piece;
        }
    }

    fn take(&mut self, pos: Position) -> Option<Piece> {
        if pos.is_on_board() {
            self.squares[pos.row as usize][pos.col as usize].take()
        } else {
            None
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for Vec<Vec<String>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

impl TryFrom<Vec<Vec<String>>> for Board {
    type Error = BoardParseError;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        if rows.len() != BOARD_SIZE {
            return Err(BoardParseError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != BOARD_SIZE {
                return Err(BoardParseError::ColumnCount {
                    row,
                    len: cells.len(),
                });
            }
            for (col, token) in cells.iter().enumerate() {
                board.squares[row][col] = parse_token(token).ok_or_else(|| {
                    BoardParseError::UnknownToken {
                        row,
                        col,
                        token: token.clone(),
                    }
                })?;
            }
        }
        Ok(board)
    }
}

fn is_dark(row: usize, col: usize) -> bool {
    (row + col) % 2 == 1
}

fn piece_token(piece: Piece) -> &'static str {
    match (piece.color, piece.rank) {
        (Color::Black, Rank::Man) => "black_pawn",
        (Color::Black, Rank::King) => "black_king",
        (Color::Red, Rank::Man) => "red_pawn",
        (Color::Red, Rank::King) => "red_king",
    }
}

/// Accepts `""`, any token starting with a color name, and treats an `_king`
/// suffix as a king (`black_king`, `black_pawn_king` are both kings).
/// `None` means the token is not recognised; `Some(None)` is an empty square.
fn parse_token(token: &str) -> Option<Option<Piece>> {
    if token.is_empty() {
        return Some(None);
    }
    let color = if token.starts_with("black") {
        Color::Black
    } else if token.starts_with("red") {
        Color::Red
    } else {
        return None;
    };
    let rank = if token.ends_with("_king") {
        Rank::King
    } else {
        Rank::Man
    };
    Some(Some(Piece { color, rank }))
}
