mod board;

pub use board::{Board, ParseBoardError};

use std::fmt;

/// Width and height of the board.
pub const BOARD_SIZE: i8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    White,
    Black,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// The far rank on which a man of this team is crowned.
    pub fn promotion_rank(self) -> i8 {
        match self {
            Team::White => BOARD_SIZE - 1,
            Team::Black => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub team: Team,
    pub rank: Rank,
}

impl Piece {
    pub fn man(team: Team) -> Piece {
        Piece {
            team,
            rank: Rank::Man,
        }
    }

    pub fn king(team: Team) -> Piece {
        Piece {
            team,
            rank: Rank::King,
        }
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    /// White men and every king may travel toward increasing y.
    pub fn moves_up(&self) -> bool {
        self.team == Team::White || self.is_king()
    }

    /// Black men and every king may travel toward decreasing y.
    pub fn moves_down(&self) -> bool {
        self.team == Team::Black || self.is_king()
    }

    pub fn symbol(&self) -> char {
        match (self.team, self.rank) {
            (Team::White, Rank::Man) => 'w',
            (Team::White, Rank::King) => 'W',
            (Team::Black, Rank::Man) => 'b',
            (Team::Black, Rank::King) => 'B',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Piece> {
        match symbol {
            'w' => Some(Piece::man(Team::White)),
            'W' => Some(Piece::king(Team::White)),
            'b' => Some(Piece::man(Team::Black)),
            'B' => Some(Piece::king(Team::Black)),
            _ => None,
        }
    }
}

/// A square on the board. Coordinates outside `0..8` are legal values and
/// mean "off the board", which callers use to signal a cancelled drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    pub const OFF_BOARD: Coord = Coord { x: -1, y: -1 };

    pub fn new(x: i8, y: i8) -> Coord {
        Coord { x, y }
    }

    pub fn on_board(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    pub fn offset(&self, dx: i8, dy: i8) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    pub fn new(from: Coord, to: Coord) -> Move {
        Move { from, to }
    }

    /// Horizontal distance travelled, always non-negative.
    pub fn dx(&self) -> i8 {
        (self.from.x - self.to.x).abs()
    }

    /// Signed vertical distance travelled.
    pub fn dy(&self) -> i8 {
        self.to.y - self.from.y
    }

    pub fn is_jump(&self) -> bool {
        self.dx() == 2
    }

    /// The square jumped over by a two-square move.
    pub fn midpoint(&self) -> Coord {
        Coord::new(
            (self.from.x + self.to.x) / 2,
            (self.from.y + self.to.y) / 2,
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
