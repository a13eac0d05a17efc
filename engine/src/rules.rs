//! Pure move rules. Nothing here mutates the board or knows whose turn it is.

use common::{Board, Coord, Move, Team, BOARD_SIZE};

use itertools::Itertools;

/// True if `neighbour` holds a piece not on `team` and `landing` is empty.
fn can_jump(board: &Board, team: Team, neighbour: Coord, landing: Coord) -> bool {
    match board.get(neighbour) {
        Some(piece) if piece.team != team => !board.is_occupied(landing),
        _ => false,
    }
}

/// Returns true if the piece on `at` has a capture available from where it
/// stands. An empty square has none.
pub fn is_forced_to_move(board: &Board, at: Coord) -> bool {
    let piece = match board.get(at) {
        Some(piece) => piece,
        None => return false,
    };
    let Coord { x, y } = at;

    if piece.moves_up() {
        // up left
        if x >= 2 && y <= 5 && can_jump(board, piece.team, at.offset(-1, 1), at.offset(-2, 2)) {
            return true;
        }
        // up right
        if x <= 5 && y <= 5 && can_jump(board, piece.team, at.offset(1, 1), at.offset(2, 2)) {
            return true;
        }
    }
    if piece.moves_down() {
        // down left
        if x >= 2 && y >= 2 && can_jump(board, piece.team, at.offset(-1, -1), at.offset(-2, -2)) {
            return true;
        }
        // down right
        if x <= 5 && y >= 2 && can_jump(board, piece.team, at.offset(1, -1), at.offset(2, -2)) {
            return true;
        }
    }

    false
}

/// Returns true if moving the piece on `from` to `to` has a legal shape:
/// a diagonal step onto an empty square, or a jump over an opposing piece
/// onto an empty square, in a direction the piece may travel.
///
/// Forced captures and capture chains are the caller's business.
pub fn is_valid_move(board: &Board, from: Coord, to: Coord) -> bool {
    let piece = match board.get(from) {
        Some(piece) => piece,
        None => {
            debug!("No piece at {}", from);
            return false;
        }
    };
    if !to.on_board() {
        debug!("{} is off the board", to);
        return false;
    }
    if board.is_occupied(to) {
        debug!("{} is already occupied", to);
        return false;
    }

    let mv = Move::new(from, to);
    let dy = mv.dy();
    let direction_allowed = (dy > 0 && piece.moves_up()) || (dy < 0 && piece.moves_down());
    if !direction_allowed {
        return false;
    }

    match (mv.dx(), dy.abs()) {
        (1, 1) => true,
        (2, 2) => match board.get(mv.midpoint()) {
            Some(jumped) => jumped.team != piece.team,
            None => false,
        },
        _ => false,
    }
}

/// Every piece of `team` that has a capture available, in row-major order.
pub fn forced_pieces(board: &Board, team: Team) -> Vec<Coord> {
    (0..BOARD_SIZE)
        .cartesian_product(0..BOARD_SIZE)
        .map(|(y, x)| Coord::new(x, y))
        .filter(|&at| board.get(at).map_or(false, |piece| piece.team == team))
        .filter(|&at| is_forced_to_move(board, at))
        .collect()
}
