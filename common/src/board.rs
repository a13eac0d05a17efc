use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{Coord, Piece, Team, BOARD_SIZE};

const SIZE: usize = BOARD_SIZE as usize;

/// The 8x8 grid, stored row-major so that `inner[y][x]` is square `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board([[Option<Piece>; SIZE]; SIZE]);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    #[error("row {row} has {found} squares, expected 8")]
    RowLength { row: usize, found: usize },
    #[error("unknown square symbol {0:?}")]
    Symbol(char),
}

impl Board {
    pub fn empty() -> Board {
        Board([[None; SIZE]; SIZE])
    }

    /// Twelve men per side on the dark squares, White on rows 0-2 and
    /// Black on rows 5-7.
    pub fn standard() -> Board {
        let mut board = Board::empty();
        for y in (0..3).chain(5..BOARD_SIZE) {
            let team = if y < 3 { Team::White } else { Team::Black };
            for x in (y % 2..BOARD_SIZE).step_by(2) {
                board.place(Coord::new(x, y), Piece::man(team));
            }
        }
        board
    }

    pub fn get(&self, at: Coord) -> Option<Piece> {
        if at.on_board() {
            self.0[at.y as usize][at.x as usize]
        } else {
            None
        }
    }

    pub fn is_occupied(&self, at: Coord) -> bool {
        self.get(at).is_some()
    }

    fn slot(&mut self, at: Coord) -> Option<&mut Option<Piece>> {
        if at.on_board() {
            Some(&mut self.0[at.y as usize][at.x as usize])
        } else {
            None
        }
    }

    /// Puts `piece` on `at`, replacing whatever was there. Off-board
    /// squares are ignored.
    pub fn place(&mut self, at: Coord, piece: Piece) {
        if let Some(slot) = self.slot(at) {
            *slot = Some(piece);
        }
    }

    pub fn remove(&mut self, at: Coord) -> Option<Piece> {
        self.slot(at).and_then(|slot| slot.take())
    }

    /// Moves the occupant of `from` onto `to`. Returns false, leaving the
    /// board untouched, if `from` is empty or either square is off-board.
    pub fn relocate(&mut self, from: Coord, to: Coord) -> bool {
        if !to.on_board() {
            return false;
        }
        match self.remove(from) {
            Some(piece) => {
                self.place(to, piece);
                true
            }
            None => false,
        }
    }

    /// Crowns the man on `at`. Returns true only if a man was crowned.
    pub fn crown(&mut self, at: Coord) -> bool {
        match self.slot(at) {
            Some(Some(piece)) if !piece.is_king() => {
                *piece = Piece::king(piece.team);
                true
            }
            _ => false,
        }
    }

    /// Every occupied square in row-major order.
    pub fn pieces<'a>(&'a self) -> impl Iterator<Item = (Coord, Piece)> + 'a {
        self.0.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().filter_map(move |(x, square)| {
                square.map(|piece| (Coord::new(x as i8, y as i8), piece))
            })
        })
    }

    pub fn count(&self, team: Team) -> usize {
        self.pieces().filter(|&(_, piece)| piece.team == team).count()
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.0.iter().rev() {
            let line: String = row
                .iter()
                .map(|square| square.map_or('.', |piece| piece.symbol()))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parses the layout written by `Display`: eight rows, top row is y = 7.
/// Whitespace inside a row is ignored so boards can be spaced out in tests.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Board, ParseBoardError> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != SIZE {
            return Err(ParseBoardError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, squares) in rows.iter().enumerate() {
            if squares.len() != SIZE {
                return Err(ParseBoardError::RowLength {
                    row,
                    found: squares.len(),
                });
            }
            let y = BOARD_SIZE - 1 - row as i8;
            for (x, &symbol) in squares.iter().enumerate() {
                if symbol == '.' {
                    continue;
                }
                let piece = Piece::from_symbol(symbol).ok_or(ParseBoardError::Symbol(symbol))?;
                board.place(Coord::new(x as i8, y), piece);
            }
        }
        Ok(board)
    }
}
