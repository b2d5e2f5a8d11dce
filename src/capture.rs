use crate::board::{Board, Cell};
use crate::types::{Color, Jump, JumpSequence, Position};

/// Single-hop captures available to the piece standing on `pos`.
///
/// Men look along their two forward diagonals, kings along all four. A
/// direction yields a jump when the adjacent square holds an opponent piece
/// and the square beyond it is on the board and empty.
pub fn find_jumps(board: &Board, pos: Position) -> Vec<Jump> {
    let Cell::Occupied(piece) = board.at(pos) else {
        return Vec::new();
    };
    let opponent = piece.color.opponent();

    piece
        .directions()
        .iter()
        .filter_map(|&(dr, dc)| {
            let captured = pos.offset(dr, dc)?;
            let to = captured.offset(dr, dc)?;
            match (board.at(captured), board.at(to)) {
                (Cell::Occupied(victim), Cell::Empty) if victim.color == opponent => Some(Jump {
                    from: pos,
                    to,
                    captured,
                }),
                _ => None,
            }
        })
        .collect()
}

/// Every maximal capture chain starting at `pos`.
///
/// A chain ends when its landing square offers no further jump. A square with
/// no jumps at all yields no chains. Forks are all kept, whatever their length.
pub fn find_jump_sequences(board: &Board, pos: Position) -> Vec<JumpSequence> {
    let mut sequences = Vec::new();
    let mut current = Vec::new();
    collect_sequences(board, pos, &mut current, &mut sequences);
    sequences
}

/// Union of [`find_jump_sequences`] over every piece of `color`.
pub fn all_jump_sequences(board: &Board, color: Color) -> Vec<JumpSequence> {
    board
        .pieces(color)
        .flat_map(|(pos, _)| find_jump_sequences(board, pos))
        .collect()
}

fn collect_sequences(
    board: &Board,
    pos: Position,
    current: &mut JumpSequence,
    out: &mut Vec<JumpSequence>,
) {
    let jumps = find_jumps(board, pos);
    if jumps.is_empty() {
        if !current.is_empty() {
            out.push(current.clone());
        }
        return;
    }

    for jump in jumps {
        // Each branch continues on its own copy with the victim removed.
        let next = board.with_capture(&jump);
        current.push(jump);
        collect_sequences(&next, jump.to, current, out);
        current.pop();
    }
}

/// Square the chain starts from.
pub fn origin(sequence: &[Jump]) -> Option<Position> {
    sequence.first().map(|jump| jump.from)
}

/// Square the chain finally lands on.
pub fn landing(sequence: &[Jump]) -> Option<Position> {
    sequence.last().map(|jump| jump.to)
}
