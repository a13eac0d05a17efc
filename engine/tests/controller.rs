extern crate common;
extern crate engine;

use common::{Board, Coord, Move, Piece, Team};
use engine::{
    Applied, IllegalMove, MoveOutcome, Origin, Outcome, Phase, Presentation, TurnController,
};

fn c(x: i8, y: i8) -> Coord {
    Coord::new(x, y)
}

fn mv(x0: i8, y0: i8, x1: i8, y1: i8) -> Move {
    Move::new(c(x0, y0), c(x1, y1))
}

fn board(layout: &str) -> Board {
    layout.parse().unwrap()
}

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Place(Piece, Coord),
    Destroy(Coord),
    Promote(Coord),
    Victory(Team),
}

#[derive(Default)]
struct Recorder(Vec<Seen>);

impl Presentation for Recorder {
    fn place(&mut self, piece: Piece, at: Coord) {
        self.0.push(Seen::Place(piece, at));
    }

    fn destroy(&mut self, at: Coord) {
        self.0.push(Seen::Destroy(at));
    }

    fn promote(&mut self, at: Coord) {
        self.0.push(Seen::Promote(at));
    }

    fn victory(&mut self, winner: Team) {
        self.0.push(Seen::Victory(winner));
    }
}

type Game = TurnController<Vec<String>, Recorder>;

fn game(board: Board) -> Game {
    let _ = env_logger::builder().is_test(true).try_init();
    TurnController::new(board, Vec::new(), Recorder::default())
}

fn moved(outcome: Result<MoveOutcome, IllegalMove>) -> Applied {
    match outcome {
        Ok(MoveOutcome::Moved(applied)) => applied,
        other => panic!("expected an accepted move, got {:?}", other),
    }
}

#[test]
fn simple_opening_step() {
    let mut game = game(Board::standard());
    let applied = moved(game.attempt_move(mv(0, 2, 1, 3), Origin::Local));

    assert_eq!(None, applied.captured);
    assert!(applied.turn_passed);
    assert!(!applied.promoted);
    assert_eq!(None, game.board().get(c(0, 2)));
    assert_eq!(Some(Piece::man(Team::White)), game.board().get(c(1, 3)));
    assert_eq!(Team::Black, game.turn());
    assert_eq!(Phase::TurnResolved, game.phase());
    assert_eq!(vec!["MOVE|0|2|1|3".to_owned()], *game.transport_mut());
}

#[test]
fn cancelled_drags_change_nothing() {
    let mut game = game(Board::standard());
    let before = game.board().clone();

    assert_eq!(Ok(MoveOutcome::Cancelled), game.attempt_move(mv(0, 2, 0, 2), Origin::Local));
    assert_eq!(
        Ok(MoveOutcome::Cancelled),
        game.attempt_move(Move::new(c(0, 2), Coord::OFF_BOARD), Origin::Local)
    );
    assert_eq!(Ok(MoveOutcome::Cancelled), game.attempt_move(mv(0, 2, 0, 8), Origin::Local));

    assert_eq!(&before, game.board());
    assert_eq!(Team::White, game.turn());
    assert!(game.transport_mut().is_empty());
    assert_eq!(
        vec![Seen::Place(Piece::man(Team::White), c(0, 2)); 3],
        game.presentation_mut().0
    );
}

#[test]
fn rejected_moves_return_the_piece() {
    let mut game = game(Board::standard());
    let before = game.board().clone();

    assert_eq!(
        Err(IllegalMove::WrongTurn(Team::White)),
        game.attempt_move(mv(1, 5, 0, 4), Origin::Local)
    );
    assert_eq!(Err(IllegalMove::Vacant(c(1, 3))), game.attempt_move(mv(1, 3, 2, 4), Origin::Local));
    assert_eq!(
        Err(IllegalMove::InvalidMove(mv(0, 2, 0, 3))),
        game.attempt_move(mv(0, 2, 0, 3), Origin::Local)
    );

    assert_eq!(&before, game.board());
    assert_eq!(Team::White, game.turn());
    assert!(game.transport_mut().is_empty());
    assert_eq!(
        vec![
            Seen::Place(Piece::man(Team::Black), c(1, 5)),
            Seen::Place(Piece::man(Team::White), c(0, 2)),
        ],
        game.presentation_mut().0
    );
}

#[test]
fn capture_removes_the_jumped_piece() {
    let mut game = game(board(
        "........
         ......b.
         .....b..
         ........
         ...b....
         ..w.....
         ........
         ........",
    ));
    let applied = moved(game.attempt_move(mv(2, 2, 4, 4), Origin::Local));

    assert_eq!(Some(c(3, 3)), applied.captured);
    assert!(applied.turn_passed);
    assert_eq!(None, game.board().get(c(3, 3)));
    assert_eq!(Some(Piece::man(Team::White)), game.board().get(c(4, 4)));
    assert_eq!(2, game.board().count(Team::Black));
    assert_eq!(Team::Black, game.turn());
    // the remaining black man on (5, 5) can now jump back over (4, 4)
    assert_eq!(vec![c(5, 5)], game.state().forced);
    assert_eq!(
        vec![
            Seen::Destroy(c(3, 3)),
            Seen::Place(Piece::man(Team::White), c(4, 4)),
        ],
        game.presentation_mut().0
    );
}

#[test]
fn captures_are_mandatory() {
    let mut game = game(board(
        "........
         ......b.
         .....b..
         ........
         ...b....
         ..w.....
         ........
         w.......",
    ));
    assert_eq!(vec![c(2, 2)], game.state().forced);

    // another piece may not move while a capture is pending
    assert_eq!(Err(IllegalMove::MustCapture), game.attempt_move(mv(0, 0, 1, 1), Origin::Local));
    // nor may the forced piece make a plain step
    assert_eq!(Err(IllegalMove::MustCapture), game.attempt_move(mv(2, 2, 1, 3), Origin::Local));
    assert_eq!(Team::White, game.turn());
    assert!(game.transport_mut().is_empty());

    moved(game.attempt_move(mv(2, 2, 4, 4), Origin::Local));
    assert_eq!(Team::Black, game.turn());
}

#[test]
fn multi_jump_keeps_the_turn() {
    let mut game = game(board(
        "........
         b.......
         ........
         ....b...
         ........
         ..b.....
         .w......
         .......w",
    ));

    let first = moved(game.attempt_move(mv(1, 1, 3, 3), Origin::Local));
    assert_eq!(Some(c(2, 2)), first.captured);
    assert!(!first.turn_passed);
    assert_eq!(Team::White, game.turn());
    assert_eq!(Some(c(3, 3)), game.state().in_multi_capture);
    assert_eq!(vec![c(3, 3)], game.state().forced);
    assert_eq!(Phase::AwaitingSelection, game.phase());

    // only the chaining piece may move, and only by capturing
    assert_eq!(
        Err(IllegalMove::MustContinueChain(c(3, 3))),
        game.attempt_move(mv(7, 0, 6, 1), Origin::Local)
    );
    assert_eq!(Err(IllegalMove::MustCapture), game.attempt_move(mv(3, 3, 2, 4), Origin::Local));
    assert!(!game.press(c(7, 0)));
    assert!(game.press(c(3, 3)));

    let second = moved(game.release(c(5, 5)).unwrap());
    assert_eq!(Some(c(4, 4)), second.captured);
    assert!(second.turn_passed);
    assert_eq!(Team::Black, game.turn());
    assert_eq!(None, game.state().in_multi_capture);
    assert_eq!(Outcome::Ongoing, game.result());
    assert_eq!(
        vec!["MOVE|1|1|3|3".to_owned(), "MOVE|3|3|5|5".to_owned()],
        *game.transport_mut()
    );
}

#[test]
fn promotion_is_one_way() {
    let mut game = game(board(
        "........
         .w......
         ........
         ........
         ........
         ........
         .......b
         ........",
    ));

    let white = moved(game.attempt_move(mv(1, 6, 2, 7), Origin::Local));
    assert!(white.promoted);
    assert_eq!(Some(Piece::king(Team::White)), game.board().get(c(2, 7)));

    let black = moved(game.attempt_move(mv(7, 1, 6, 0), Origin::Local));
    assert!(black.promoted);
    assert_eq!(Some(Piece::king(Team::Black)), game.board().get(c(6, 0)));

    // the new king steps back down and stays a king
    let back = moved(game.attempt_move(mv(2, 7, 3, 6), Origin::Local));
    assert!(!back.promoted);
    assert_eq!(Some(Piece::king(Team::White)), game.board().get(c(3, 6)));

    let again = moved(game.attempt_move(mv(6, 0, 7, 1), Origin::Local));
    assert!(!again.promoted);
    let home = moved(game.attempt_move(mv(3, 6, 4, 7), Origin::Local));
    assert!(!home.promoted);
    assert_eq!(Some(Piece::king(Team::White)), game.board().get(c(4, 7)));

    let promotions: Vec<_> = game
        .presentation_mut()
        .0
        .iter()
        .filter(|seen| match seen {
            Seen::Promote(_) => true,
            _ => false,
        })
        .collect();
    assert_eq!(vec![&Seen::Promote(c(2, 7)), &Seen::Promote(c(6, 0))], promotions);
}

#[test]
fn last_capture_wins_the_game() {
    let mut game = game(board(
        "........
         ........
         ........
         ........
         ...b....
         ..w.....
         ........
         ........",
    ));

    moved(game.attempt_move(mv(2, 2, 4, 4), Origin::Local));
    assert_eq!(Outcome::WhiteWins, game.result());
    assert_eq!(Phase::GameOver(Team::White), game.phase());
    assert_eq!(Some(&Seen::Victory(Team::White)), game.presentation_mut().0.last());

    let after = game.board().clone();
    assert_eq!(Err(IllegalMove::GameOver), game.attempt_move(mv(4, 4, 5, 5), Origin::Local));
    assert_eq!(Err(IllegalMove::GameOver), game.attempt_move(mv(4, 4, 3, 5), Origin::Remote));
    assert!(!game.press(c(4, 4)));
    assert_eq!(&after, game.board());
    assert_eq!(Outcome::WhiteWins, game.result());
    assert_eq!(1, game.transport_mut().len());
}

#[test]
fn black_can_win_too() {
    let mut game = game(board(
        "........
         ........
         ........
         ....b...
         ........
         ..w.....
         ........
         ........",
    ));
    moved(game.attempt_move(mv(2, 2, 3, 3), Origin::Local));
    assert_eq!(vec![c(4, 4)], game.state().forced);

    let applied = moved(game.attempt_move(mv(4, 4, 2, 2), Origin::Remote));
    assert_eq!(Some(c(3, 3)), applied.captured);
    assert_eq!(0, game.board().count(Team::White));
    assert_eq!(Outcome::BlackWins, game.result());
    assert_eq!(Phase::GameOver(Team::Black), game.phase());
}

#[test]
fn remote_moves_are_not_echoed() {
    let mut game = game(Board::standard());
    moved(game.attempt_move(mv(2, 2, 3, 3), Origin::Remote));
    assert_eq!(Team::Black, game.turn());
    assert!(game.transport_mut().is_empty());
}

#[test]
fn press_and_release() {
    let mut game = game(Board::standard()).with_local_team(Team::White);

    // nothing selected yet
    assert_eq!(None, game.release(c(1, 3)));
    // empty squares and opposing pieces cannot be picked up
    assert!(!game.press(c(1, 3)));
    assert!(!game.press(c(1, 5)));
    assert_eq!(Phase::AwaitingSelection, game.phase());

    assert!(game.press(c(0, 2)));
    assert_eq!(Phase::PieceSelected(c(0, 2)), game.phase());
    assert_eq!(Some(Ok(MoveOutcome::Cancelled)), game.release(Coord::OFF_BOARD));
    assert_eq!(Phase::AwaitingSelection, game.phase());

    assert!(game.press(c(0, 2)));
    moved(game.release(c(1, 3)).unwrap());
    assert_eq!(vec!["MOVE|0|2|1|3".to_owned()], *game.transport_mut());

    // black is played by the other peer
    assert!(!game.is_local_turn());
    assert!(!game.press(c(1, 5)));
    moved(game.attempt_move(mv(1, 5, 0, 4), Origin::Remote));
    assert!(game.is_local_turn());
}
