//! The text messages exchanged between the two peers.
//!
//! A move travels as `MOVE|<from.x>|<from.y>|<to.x>|<to.y>`. After
//! connecting, each side announces itself once with `HELLO|<name>`.
//! Inbound moves are replayed through the same `attempt_move` path as
//! local ones, so both boards stay identical as long as both peers see the
//! same moves in the same order.

use std::fmt;

use common::{Coord, Move, BOARD_SIZE};

use thiserror::Error;

use crate::collab::{Presentation, Transport};
use crate::controller::{IllegalMove, MoveOutcome, Origin, TurnController};

pub const MOVE_TAG: &str = "MOVE";
pub const HELLO_TAG: &str = "HELLO";
pub const DELIMITER: char = '|';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty message")]
    Empty,
    #[error("unknown message tag {0:?}")]
    UnknownTag(String),
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("field {0:?} is not an integer")]
    NotAnInteger(String),
    #[error("coordinate {0} is off the board")]
    OffBoard(i64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("dropped malformed message: {0}")]
    Decode(#[from] DecodeError),
    #[error("remote move refused: {0}")]
    Illegal(#[from] IllegalMove),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Hello(String),
    Move(Move),
}

impl Message {
    pub fn hello(name: &str) -> Message {
        let name = name
            .chars()
            .filter(|&c| c != DELIMITER && c != '\n' && c != '\r')
            .collect();
        Message::Hello(name)
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(text: &str) -> Result<Message, DecodeError> {
        let text = text.trim_end_matches(|c| c == '\n' || c == '\r');
        if text.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mut fields = text.split(DELIMITER);
        let tag = fields.next().unwrap_or_default();
        let fields: Vec<&str> = fields.collect();
        match tag {
            MOVE_TAG => decode_move_fields(&fields).map(Message::Move),
            HELLO_TAG => match fields.as_slice() {
                [name] => Ok(Message::Hello(name.to_string())),
                _ => Err(DecodeError::FieldCount {
                    expected: 1,
                    found: fields.len(),
                }),
            },
            other => Err(DecodeError::UnknownTag(other.to_owned())),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Message::Hello(ref name) => write!(f, "{}{}{}", HELLO_TAG, DELIMITER, name),
            Message::Move(Move { from, to }) => write!(
                f,
                "{tag}{d}{}{d}{}{d}{}{d}{}",
                from.x,
                from.y,
                to.x,
                to.y,
                tag = MOVE_TAG,
                d = DELIMITER
            ),
        }
    }
}

fn decode_coordinate(field: &str) -> Result<i8, DecodeError> {
    let value: i64 = field
        .parse()
        .map_err(|_| DecodeError::NotAnInteger(field.to_owned()))?;
    if value < 0 || value >= i64::from(BOARD_SIZE) {
        return Err(DecodeError::OffBoard(value));
    }
    Ok(value as i8)
}

fn decode_move_fields(fields: &[&str]) -> Result<Move, DecodeError> {
    if fields.len() != 4 {
        return Err(DecodeError::FieldCount {
            expected: 4,
            found: fields.len(),
        });
    }
    let mut values = [0i8; 4];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = decode_coordinate(field)?;
    }
    Ok(Move::new(
        Coord::new(values[0], values[1]),
        Coord::new(values[2], values[3]),
    ))
}

pub fn encode(mv: &Move) -> String {
    Message::Move(*mv).encode()
}

/// Decodes a move message. Any other well-formed message is reported as an
/// unknown tag.
pub fn decode(text: &str) -> Result<Move, DecodeError> {
    match Message::decode(text)? {
        Message::Move(mv) => Ok(mv),
        Message::Hello(_) => Err(DecodeError::UnknownTag(HELLO_TAG.to_owned())),
    }
}

/// What an inbound message turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Hello(String),
    Move(MoveOutcome),
}

/// Applies one inbound message. Malformed messages and refused moves leave
/// the game untouched.
pub fn receive<T, P>(controller: &mut TurnController<T, P>, text: &str) -> Result<Received, SyncError>
where
    T: Transport,
    P: Presentation,
{
    let message = match Message::decode(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("Badly formatted message from peer: {}: {:?}", e, text);
            return Err(e.into());
        }
    };

    match message {
        Message::Hello(name) => {
            info!("Opponent is {}", name);
            Ok(Received::Hello(name))
        }
        Message::Move(mv) => match controller.attempt_move(mv, Origin::Remote) {
            Ok(outcome) => Ok(Received::Move(outcome)),
            Err(e) => {
                warn!("Remote move {} refused: {}", mv, e);
                Err(e.into())
            }
        },
    }
}
