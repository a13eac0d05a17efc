#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate log;
extern crate env_logger;

extern crate common;
extern crate engine;

mod config;
mod input;
mod link;
mod view;

use std::env;
use std::process;
use std::sync::mpsc::TryRecvError;

use common::Board;
use engine::protocol::{self, Received};
use engine::{Message, MoveOutcome, Transport, TurnController};

use crate::config::{Config, Role};
use crate::input::Command;
use crate::link::{Link, LinkError};
use crate::view::TerminalView;

type Game = TurnController<Link, TerminalView>;

fn show(game: &Game) {
    print!("{}", view::render(game.board(), game.turn()));
}

/// Applies one local command. Returns false once the player quits.
fn handle(game: &mut Game, command: Command) -> bool {
    match command {
        Command::Press(at) => {
            if !game.press(at) {
                println!("Cannot pick up a piece on {}.", at);
            }
        }
        Command::Release(at) => match game.release(at) {
            None => println!("No piece selected."),
            Some(Ok(MoveOutcome::Moved(_))) => show(game),
            Some(Ok(MoveOutcome::Cancelled)) => println!("Move cancelled."),
            Some(Err(e)) => println!("Illegal move: {}.", e),
        },
        Command::Show => show(game),
        Command::Quit => return false,
    }
    true
}

fn run(config: &Config) -> Result<(), LinkError> {
    let link = match config.role {
        Role::Host => Link::host(config.address)?,
        Role::Join => Link::join(config.address)?,
    };
    let team = config.role.team();
    let mut game = TurnController::new(Board::standard(), link, TerminalView).with_local_team(team);
    game.transport_mut()
        .send_text(&Message::hello(config.name()).encode());

    println!("You play {:?}.", team);
    show(&game);

    let commands = input::spawn();
    'ticks: loop {
        let inbound = match game.transport_mut().poll_inbound(config.tick()) {
            Ok(inbound) => inbound,
            Err(LinkError::Closed) => {
                println!("The other player left.");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // remote moves are applied before any local input of the same tick
        for text in inbound {
            match protocol::receive(&mut game, &text) {
                Ok(Received::Hello(name)) => println!("Playing against {}.", name),
                Ok(Received::Move(MoveOutcome::Moved(_))) => show(&game),
                Ok(Received::Move(MoveOutcome::Cancelled)) | Err(_) => (),
            }
        }

        loop {
            match commands.try_recv() {
                Ok(command) => {
                    if !handle(&mut game, command) {
                        break 'ticks;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'ticks,
            }
        }
    }

    // lets the other player see a clean close rather than a reset
    game.transport_mut().close();
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("USAGE: checkers configpath");
        process::exit(1);
    }

    let config = match Config::from_file(&args[1]) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", args[1], e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        error!("{}", e);
        process::exit(1);
    }
}
