//! Universal Chess Interface protocol.
//!
//! See <http://wbec-ridderkerk.nl/html/UCIProtocol.html>. The loop reads
//! line-oriented commands from stdin and drives the [`Engine`]; search
//! output (`info` lines and `bestmove`) is printed by the search thread.
//!
//! Malformed commands are logged and ignored. A bad move inside a
//! `position` command is fatal: the GUI supplied an impossible game
//! history and any recovery would be speculative.

pub mod command;
pub mod options;
pub mod report;

use std::fmt;
use std::io::{self, BufRead};

use crate::engine::Engine;
use crate::position::{PositionError, START_FEN};

use command::{parse_go_params, parse_uci_command, UciCommand};
use options::parse_setoption;

/// Errors from UCI command handling.
#[derive(Debug, Clone)]
pub enum UciError {
    /// `position` command without a position.
    MissingPosition,
    /// The position or its move history was invalid.
    BadPosition(PositionError),
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::MissingPosition => write!(f, "position command needs startpos or fen"),
            UciError::BadPosition(e) => write!(f, "bad position: {e}"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<PositionError> for UciError {
    fn from(e: PositionError) -> Self {
        UciError::BadPosition(e)
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the UCI loop until `quit` or end of input.
pub fn run(engine: &mut Engine) {
    log::info!(
        "{} v{} ready",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if handle(engine, &line) == Flow::Quit {
            break;
        }
    }
    engine.stop_search();
}

fn handle(engine: &mut Engine, input: &str) -> Flow {
    let Some(cmd) = parse_uci_command(input) else {
        return Flow::Continue;
    };

    match cmd {
        UciCommand::Uci => engine.options().print_uci(),
        UciCommand::IsReady => println!("readyok"),
        UciCommand::UciNewGame => engine.new_game(),
        UciCommand::Position(parts) => {
            let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
            if let Err(e) = handle_position(engine, &parts) {
                match e {
                    UciError::BadPosition(ref inner) => {
                        // The game history cannot be trusted from here on.
                        log::error!("fatal: {inner}");
                        std::process::exit(1);
                    }
                    UciError::MissingPosition => log::warn!("{e}"),
                }
            }
        }
        UciCommand::Go(parts) => {
            let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
            let params = parse_go_params(&parts);
            engine.go(&params);
        }
        UciCommand::SetOption(parts) => {
            let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
            match parse_setoption(&parts) {
                Some((name, value)) => engine.set_option(&name, value.as_deref()),
                None => log::warn!("could not parse setoption: {input}"),
            }
        }
        UciCommand::Debug(value) => {
            engine.set_debug(value.as_deref() == Some("on"));
        }
        UciCommand::Stop => engine.stop_search(),
        UciCommand::PonderHit => {}
        UciCommand::ClearTt => engine.clear_tt(),
        UciCommand::Start => {
            // Convenience macro for prompt sessions.
            handle(engine, "uci");
            handle(engine, "ucinewgame");
            handle(engine, "position startpos moves e2e4");
        }
        UciCommand::Help => print!("{HELP}"),
        UciCommand::Quit => return Flow::Quit,
        UciCommand::Unknown(s) => log::warn!("unknown command: {s}"),
    }

    Flow::Continue
}

/// Apply a `position {startpos|fen <FEN>} [moves ...]` command.
fn handle_position(engine: &mut Engine, parts: &[&str]) -> Result<(), UciError> {
    let mut i = 1;
    if i >= parts.len() {
        return Err(UciError::MissingPosition);
    }

    let fen = if parts[i] == "startpos" {
        i += 1;
        START_FEN.to_string()
    } else if parts[i] == "fen" && i + 6 < parts.len() {
        let fen = parts[i + 1..i + 7].join(" ");
        i += 7;
        fen
    } else {
        return Err(UciError::MissingPosition);
    };

    let moves = if parts.get(i) == Some(&"moves") {
        &parts[i + 1..]
    } else {
        &[]
    };

    engine.set_position(&fen, moves)?;
    Ok(())
}

const HELP: &str = "This is a UCI-compatible chess engine.
For the full protocol, see:
    http://wbec-ridderkerk.nl/html/UCIProtocol.html

Set up a position:
    ucinewgame
    position startpos moves e2e4 e7e5

Search a position at depth 10:
    go depth 10

Infinite search:
    go infinite
    stop

Custom commands: cleartt (drop the hash table), start (quick setup),
help. Search can be cancelled with stop.
";
