use common::{Board, Coord, Piece, Team, BOARD_SIZE};
use engine::Presentation;

/// Prints what happens on the board to the terminal.
pub struct TerminalView;

impl Presentation for TerminalView {
    fn place(&mut self, piece: Piece, at: Coord) {
        debug!("{:?} {:?} placed on {}", piece.team, piece.rank, at);
    }

    fn destroy(&mut self, at: Coord) {
        println!("Piece on {} captured.", at);
    }

    fn promote(&mut self, at: Coord) {
        println!("The man on {} is crowned.", at);
    }

    fn victory(&mut self, winner: Team) {
        println!("{:?} team has won!", winner);
    }
}

/// The board with rank numbers down the left and file numbers underneath,
/// row 7 at the top.
pub fn render(board: &Board, turn: Team) -> String {
    let mut out = String::new();
    for (row, line) in board.to_string().lines().enumerate() {
        let y = BOARD_SIZE - 1 - row as i8;
        out.push_str(&format!("{} {}\n", y, line));
    }
    out.push_str("  ");
    for x in 0..BOARD_SIZE {
        out.push_str(&x.to_string());
    }
    out.push_str(&format!("\n{:?} to move\n", turn));
    out
}
