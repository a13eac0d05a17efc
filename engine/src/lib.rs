//! Checkers rules, turn handling and the move synchronisation protocol
//! shared by both peers of a game.

#[macro_use]
extern crate log;

extern crate common;

pub mod collab;
pub mod controller;
pub mod protocol;
pub mod rules;

pub use collab::{Presentation, Transport};
pub use controller::{
    Applied, GameState, IllegalMove, MoveOutcome, Origin, Outcome, Phase, TurnController,
};
pub use protocol::{DecodeError, Message, Received, SyncError};
