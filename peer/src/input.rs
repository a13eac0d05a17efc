//! Terminal input. A reader thread turns stdin lines into commands and
//! hands them to the tick loop over a channel, which is the only way input
//! reaches the game.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use common::Coord;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press(Coord),
    Release(Coord),
    Show,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command {0:?}, try move, press, release, board or quit")]
    Unknown(String),
    #[error("{command} takes {expected} coordinates")]
    Arity {
        command: &'static str,
        expected: usize,
    },
    #[error("{0:?} is not a coordinate")]
    Coordinate(String),
}

fn coordinates(command: &'static str, args: &[&str], expected: usize) -> Result<Vec<i8>, InputError> {
    if args.len() != expected {
        return Err(InputError::Arity { command, expected });
    }
    args.iter()
        .map(|arg| arg.parse().map_err(|_| InputError::Coordinate(arg.to_string())))
        .collect()
}

/// Parses one line. A line may expand to several commands: `move` is a
/// press followed by a release. Blank lines yield nothing.
pub fn parse_line(line: &str) -> Result<Vec<Command>, InputError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let (command, args) = match words.split_first() {
        Some((command, args)) => (*command, args),
        None => return Ok(Vec::new()),
    };

    match command {
        "move" | "m" => {
            let v = coordinates("move", args, 4)?;
            Ok(vec![
                Command::Press(Coord::new(v[0], v[1])),
                Command::Release(Coord::new(v[2], v[3])),
            ])
        }
        "press" | "p" => {
            let v = coordinates("press", args, 2)?;
            Ok(vec![Command::Press(Coord::new(v[0], v[1]))])
        }
        "release" | "r" => {
            if args == ["off"] {
                return Ok(vec![Command::Release(Coord::OFF_BOARD)]);
            }
            let v = coordinates("release", args, 2)?;
            Ok(vec![Command::Release(Coord::new(v[0], v[1]))])
        }
        "board" | "b" => Ok(vec![Command::Show]),
        "quit" | "q" => Ok(vec![Command::Quit]),
        other => Err(InputError::Unknown(other.to_owned())),
    }
}

/// Starts the stdin reader. End of input counts as `quit`.
pub fn spawn() -> Receiver<Command> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Could not read from stdin: {}", e);
                    break;
                }
            };
            match parse_line(&line) {
                Ok(commands) => {
                    for command in commands {
                        if sender.send(command).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        let _ = sender.send(Command::Quit);
    });
    receiver
}
