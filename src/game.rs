use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, PIECES_PER_SIDE};
use crate::capture::{all_jump_sequences, find_jumps, landing, origin};
use crate::error::RuleError;
use crate::types::{
    Color, GameStatus, Jump, LastMove, MoveOption, MoveRequest, Piece, PlayerId, Position,
};

/// Persisted state of one checkers game.
///
/// Seats are explicit: black is player 1 and red is player 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub status: GameStatus,
    pub black_player: Option<PlayerId>,
    pub red_player: Option<PlayerId>,
    pub current_turn: Option<PlayerId>,
    pub black_remaining: u8,
    pub red_remaining: u8,
    pub last_move: Option<LastMove>,
}

/// Board after a move has been carried out, before turn bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Executed {
    board: Board,
    landing: Position,
    captures: u8,
}

impl GameState {
    /// Fresh game with the standard layout and no players seated.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            status: GameStatus::Ongoing,
            black_player: None,
            red_player: None,
            current_turn: None,
            black_remaining: PIECES_PER_SIDE,
            red_remaining: PIECES_PER_SIDE,
            last_move: None,
        }
    }

    /// Ongoing game with both seats filled and black to move.
    pub fn with_players(black: impl Into<String>, red: impl Into<String>) -> Self {
        let black = PlayerId::new(black);
        Self {
            current_turn: Some(black.clone()),
            black_player: Some(black),
            red_player: Some(PlayerId::new(red)),
            ..Self::new()
        }
    }

    /// Replaces the board and resyncs the remaining-piece counters from it.
    pub fn with_board(mut self, board: Board) -> Self {
        self.black_remaining = board.count(Color::Black);
        self.red_remaining = board.count(Color::Red);
        self.board = board;
        self
    }

    pub fn player_for(&self, color: Color) -> Option<&PlayerId> {
        match color {
            Color::Black => self.black_player.as_ref(),
            Color::Red => self.red_player.as_ref(),
        }
    }

    pub fn player_color(&self, player: &PlayerId) -> Option<Color> {
        [Color::Black, Color::Red]
            .into_iter()
            .find(|&color| self.player_for(color) == Some(player))
    }

    pub fn remaining(&self, color: Color) -> u8 {
        match color {
            Color::Black => self.black_remaining,
            Color::Red => self.red_remaining,
        }
    }

    /// Seats `user`. The first joiner plays black, the second red; black moves
    /// first once both seats are filled.
    pub fn join(&self, user: &PlayerId) -> Result<GameState, RuleError> {
        if self.black_player.is_some() && self.red_player.is_some() {
            return Err(RuleError::GameFull);
        }
        if user.is_empty() {
            return Err(RuleError::MissingUser);
        }
        if self.player_color(user).is_some() {
            return Err(RuleError::AlreadyJoined);
        }

        let mut next = self.clone();
        if next.black_player.is_none() {
            next.black_player = Some(user.clone());
        } else {
            next.red_player = Some(user.clone());
        }
        if next.red_player.is_some() && next.current_turn.is_none() {
            next.current_turn = next.black_player.clone();
        }
        Ok(next)
    }

    /// Validates `request` against this state and returns the state after it.
    ///
    /// Nothing is mutated on rejection. When any capture exists for the mover
    /// the request must name the start and final landing square of one
    /// maximal chain, and the whole chain is applied. When several chains
    /// share those two squares the first one found is taken.
    pub fn apply_move(&self, request: &MoveRequest) -> Result<GameState, RuleError> {
        if self.status.is_over() {
            return Err(RuleError::NotOngoing);
        }
        if self.current_turn.as_ref() != Some(&request.user_id) {
            return Err(RuleError::NotYourTurn);
        }

        let piece = match self.board.at(request.from) {
            Cell::Occupied(piece) => piece,
            Cell::Empty | Cell::OffBoard => return Err(RuleError::InvalidStart),
        };
        if self.player_for(piece.color) != Some(&request.user_id) {
            return Err(RuleError::InvalidStart);
        }

        let chains = all_jump_sequences(&self.board, piece.color);
        let executed = if chains.is_empty() {
            execute_step(&self.board, piece, request.from, request.to)?
        } else {
            let chain = chains
                .iter()
                .find(|chain| {
                    origin(chain) == Some(request.from) && landing(chain) == Some(request.to)
                })
                .ok_or(RuleError::MustJump)?;
            execute_chain(&self.board, piece, request.from, chain)
        };

        let mut next = self.clone();
        next.board = executed.board;
        next.last_move = Some(LastMove {
            from: request.from,
            to: request.to,
            player: request.user_id.clone(),
        });
        match piece.color {
            Color::Black => next.red_remaining = next.red_remaining.saturating_sub(executed.captures),
            Color::Red => {
                next.black_remaining = next.black_remaining.saturating_sub(executed.captures)
            }
        }

        // A capture that leaves a further jump for the same piece keeps the turn.
        let continues =
            executed.captures > 0 && !find_jumps(&next.board, executed.landing).is_empty();
        let next_color = if continues {
            piece.color
        } else {
            piece.color.opponent()
        };
        next.current_turn = next.player_for(next_color).cloned();
        next.status = next_status(
            &next.board,
            next_color,
            next.black_remaining,
            next.red_remaining,
        );

        Ok(next)
    }

    /// Legal actions for the player whose turn it is.
    pub fn possible_moves(&self) -> Vec<MoveOption> {
        if self.status.is_over() {
            return Vec::new();
        }
        match self.current_turn.as_ref().and_then(|p| self.player_color(p)) {
            Some(color) => legal_moves(&self.board, color),
            None => Vec::new(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Every legal action for `color`: one option per distinct start and landing
/// square of the maximal capture chains when any capture exists, otherwise
/// every single diagonal step.
pub fn legal_moves(board: &Board, color: Color) -> Vec<MoveOption> {
    let chains = all_jump_sequences(board, color);
    if !chains.is_empty() {
        let mut options: Vec<MoveOption> = Vec::with_capacity(chains.len());
        for chain in &chains {
            let (Some(from), Some(to)) = (origin(chain), landing(chain)) else {
                continue;
            };
            // Same endpoints are one request; keep the chain `apply_move` would pick.
            if options.iter().any(|o| o.from == from && o.to == to) {
                continue;
            }
            options.push(MoveOption {
                from,
                to,
                captures: chain.len() as u8,
            });
        }
        return options;
    }

    board
        .pieces(color)
        .flat_map(move |(from, piece)| {
            piece.directions().iter().filter_map(move |&(dr, dc)| {
                let to = from.offset(dr, dc)?;
                board.at(to).is_empty().then_some(MoveOption {
                    from,
                    to,
                    captures: 0,
                })
            })
        })
        .collect()
}

/// Status after a move, judged on the post-move board for the side about to play.
pub fn next_status(
    board: &Board,
    next_color: Color,
    black_remaining: u8,
    red_remaining: u8,
) -> GameStatus {
    if black_remaining == 0 {
        GameStatus::Player2Wins
    } else if red_remaining == 0 {
        GameStatus::Player1Wins
    } else if legal_moves(board, next_color).is_empty() {
        GameStatus::Draw
    } else {
        GameStatus::Ongoing
    }
}

fn execute_step(
    board: &Board,
    piece: Piece,
    from: Position,
    to: Position,
) -> Result<Executed, RuleError> {
    let row_delta = to.row as i32 - from.row as i32;
    let col_delta = to.col as i32 - from.col as i32;
    if row_delta.abs() != 1 || col_delta.abs() != 1 || !board.at(to).is_empty() {
        return Err(RuleError::InvalidMove);
    }
    if !piece.is_king() && row_delta != piece.color.forward() as i32 {
        return Err(RuleError::WrongDirection(piece.color));
    }

    let mut next = board.with_move(from, to);
    promote_on_last_row(&mut next, piece, to);
    Ok(Executed {
        board: next,
        landing: to,
        captures: 0,
    })
}

fn execute_chain(board: &Board, piece: Piece, from: Position, chain: &[Jump]) -> Executed {
    let mut next = *board;
    let mut landing = from;
    for jump in chain {
        next = next.with_capture(jump);
        landing = jump.to;
    }

    promote_on_last_row(&mut next, piece, landing);
    Executed {
        board: next,
        landing,
        captures: chain.len() as u8,
    }
}

fn promote_on_last_row(board: &mut Board, piece: Piece, pos: Position) {
    if pos.row == piece.color.promotion_row() {
        board.promote(pos);
    }
}
