//! The seams between the game core and whatever hosts it.

use common::{Coord, Piece, Team};

/// Outbound half of the connection to the other peer.
pub trait Transport {
    fn send_text(&mut self, text: &str);
}

/// Collects every message, in order.
impl Transport for Vec<String> {
    fn send_text(&mut self, text: &str) {
        self.push(text.to_owned());
    }
}

impl Transport for () {
    fn send_text(&mut self, _: &str) {}
}

/// Notifications about visible board changes. Nothing is ever read back.
pub trait Presentation {
    /// `piece` now sits on `at`. Also sent when a rejected move puts a
    /// dragged piece back where it started.
    fn place(&mut self, piece: Piece, at: Coord);

    /// The piece on `at` was captured.
    fn destroy(&mut self, at: Coord);

    fn promote(&mut self, _at: Coord) {}

    fn victory(&mut self, _winner: Team) {}
}

impl Presentation for () {
    fn place(&mut self, _: Piece, _: Coord) {}

    fn destroy(&mut self, _: Coord) {}
}
