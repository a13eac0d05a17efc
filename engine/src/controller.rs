use common::{Board, Coord, Move, Rank, Team};

use thiserror::Error;

use crate::collab::{Presentation, Transport};
use crate::protocol;
use crate::rules::{forced_pieces, is_forced_to_move, is_valid_move};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    WhiteWins,
    BlackWins,
}

impl Outcome {
    pub fn winner(self) -> Option<Team> {
        match self {
            Outcome::Ongoing => None,
            Outcome::WhiteWins => Some(Team::White),
            Outcome::BlackWins => Some(Team::Black),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected(Coord),
    TurnResolved,
    GameOver(Team),
}

/// Where a move came from. Only local moves are sent to the other peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub turn: Team,
    /// Pieces of the side to move that have a capture available.
    pub forced: Vec<Coord>,
    /// The piece part way through a chain of captures, if any.
    pub in_multi_capture: Option<Coord>,
    pub result: Outcome,
}

impl GameState {
    fn new() -> GameState {
        GameState {
            turn: Team::White,
            forced: Vec::new(),
            in_multi_capture: None,
            result: Outcome::Ongoing,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("the game is over")]
    GameOver,
    #[error("there is no piece at {0}")]
    Vacant(Coord),
    #[error("it is {0:?}'s turn")]
    WrongTurn(Team),
    #[error("a capture is available and must be taken")]
    MustCapture,
    #[error("the piece at {0} must keep capturing")]
    MustContinueChain(Coord),
    #[error("{0} is not a legal move")]
    InvalidMove(Move),
}

/// What an accepted move did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub mv: Move,
    pub captured: Option<Coord>,
    pub promoted: bool,
    /// False while the same piece has to keep capturing.
    pub turn_passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece was dropped on its own square or off the board.
    Cancelled,
    Moved(Applied),
}

/// Owns the board and the state of play. Every move, whether dragged
/// locally or decoded from the other peer, goes through `attempt_move`.
pub struct TurnController<T, P> {
    board: Board,
    state: GameState,
    phase: Phase,
    local_team: Option<Team>,
    transport: T,
    presentation: P,
}

impl<T: Transport, P: Presentation> TurnController<T, P> {
    pub fn new(board: Board, transport: T, presentation: P) -> TurnController<T, P> {
        let mut controller = TurnController {
            board,
            state: GameState::new(),
            phase: Phase::AwaitingSelection,
            local_team: None,
            transport,
            presentation,
        };
        controller.state.forced = forced_pieces(&controller.board, controller.state.turn);
        controller
    }

    /// Restricts local input to the pieces of `team`. Without this both
    /// sides are played from this controller.
    pub fn with_local_team(mut self, team: Team) -> TurnController<T, P> {
        self.local_team = Some(team);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> Team {
        self.state.turn
    }

    pub fn result(&self) -> Outcome {
        self.state.result
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// True if the side to move is played from this controller.
    pub fn is_local_turn(&self) -> bool {
        self.local_team.map_or(true, |team| team == self.state.turn)
    }

    /// The forced set for the side to move. During a capture chain only the
    /// chaining piece may move.
    fn scan_forced(&self) -> Vec<Coord> {
        match self.state.in_multi_capture {
            Some(at) => vec![at],
            None => forced_pieces(&self.board, self.state.turn),
        }
    }

    /// Picks up the piece on `at` if it may be moved this turn.
    pub fn press(&mut self, at: Coord) -> bool {
        if self.state.result != Outcome::Ongoing || !self.is_local_turn() {
            return false;
        }
        let piece = match self.board.get(at) {
            Some(piece) if piece.team == self.state.turn => piece,
            _ => return false,
        };
        self.state.forced = self.scan_forced();
        if !self.state.forced.is_empty() && !self.state.forced.contains(&at) {
            info!("{:?} at {} cannot be selected while a capture is pending", piece, at);
            return false;
        }
        debug!("Selected {:?} at {}", piece, at);
        self.phase = Phase::PieceSelected(at);
        true
    }

    /// Drops the selected piece on `at`. Returns `None` if nothing was
    /// selected.
    pub fn release(&mut self, at: Coord) -> Option<Result<MoveOutcome, IllegalMove>> {
        let from = match self.phase {
            Phase::PieceSelected(from) => from,
            _ => return None,
        };
        self.phase = Phase::AwaitingSelection;
        Some(self.attempt_move(Move::new(from, at), Origin::Local))
    }

    /// Puts a dragged piece back where it came from.
    fn return_to_origin(&mut self, from: Coord) {
        if let Some(piece) = self.board.get(from) {
            self.presentation.place(piece, from);
        }
    }

    fn reject(&mut self, from: Coord, reason: IllegalMove) -> Result<MoveOutcome, IllegalMove> {
        info!("Move rejected: {}", reason);
        self.return_to_origin(from);
        Err(reason)
    }

    /// Validates and applies `mv` for the side to move.
    ///
    /// Rejections never touch the board. Accepted local moves are sent to
    /// the other peer; remote ones are not echoed back.
    pub fn attempt_move(&mut self, mv: Move, origin: Origin) -> Result<MoveOutcome, IllegalMove> {
        let Move { from, to } = mv;
        debug!("{:?} move attempt: {}", origin, mv);

        if self.state.result != Outcome::Ongoing {
            info!("Move rejected as the game is already over");
            return Err(IllegalMove::GameOver);
        }

        self.state.forced = self.scan_forced();

        if from == to || !to.on_board() {
            debug!("Move to {} cancelled", to);
            self.return_to_origin(from);
            return Ok(MoveOutcome::Cancelled);
        }

        let piece = match self.board.get(from) {
            Some(piece) => piece,
            None => return self.reject(from, IllegalMove::Vacant(from)),
        };
        if piece.team != self.state.turn {
            return self.reject(from, IllegalMove::WrongTurn(self.state.turn));
        }
        if !self.state.forced.is_empty() && !self.state.forced.contains(&from) {
            let reason = match self.state.in_multi_capture {
                Some(at) => IllegalMove::MustContinueChain(at),
                None => IllegalMove::MustCapture,
            };
            return self.reject(from, reason);
        }
        if !is_valid_move(&self.board, from, to) {
            return self.reject(from, IllegalMove::InvalidMove(mv));
        }
        if !self.state.forced.is_empty() && !mv.is_jump() {
            return self.reject(from, IllegalMove::MustCapture);
        }

        let captured = if mv.is_jump() {
            let midpoint = mv.midpoint();
            self.board.remove(midpoint);
            self.presentation.destroy(midpoint);
            Some(midpoint)
        } else {
            None
        };

        self.board.relocate(from, to);
        self.presentation.place(piece, to);

        let promoted = piece.rank == Rank::Man
            && to.y == piece.team.promotion_rank()
            && self.board.crown(to);
        if promoted {
            info!("{:?} man crowned at {}", piece.team, to);
            self.presentation.promote(to);
        }

        if origin == Origin::Local {
            self.transport.send_text(&protocol::encode(&mv));
        }

        if captured.is_some() && is_forced_to_move(&self.board, to) {
            debug!("{:?} continues capturing from {}", self.state.turn, to);
            self.state.in_multi_capture = Some(to);
            self.state.forced = vec![to];
            self.phase = Phase::AwaitingSelection;
            return Ok(MoveOutcome::Moved(Applied {
                mv,
                captured,
                promoted,
                turn_passed: false,
            }));
        }

        self.end_turn();
        Ok(MoveOutcome::Moved(Applied {
            mv,
            captured,
            promoted,
            turn_passed: true,
        }))
    }

    fn end_turn(&mut self) {
        self.state.turn = self.state.turn.opponent();
        self.state.in_multi_capture = None;
        self.state.forced = forced_pieces(&self.board, self.state.turn);
        self.phase = Phase::TurnResolved;
        self.check_victory();
    }

    fn check_victory(&mut self) {
        let result = if self.board.count(Team::White) == 0 {
            Outcome::BlackWins
        } else if self.board.count(Team::Black) == 0 {
            Outcome::WhiteWins
        } else {
            return;
        };

        self.state.result = result;
        if let Some(winner) = result.winner() {
            info!("{:?} team has won", winner);
            self.phase = Phase::GameOver(winner);
            self.presentation.victory(winner);
        }
    }
}
