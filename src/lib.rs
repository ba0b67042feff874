//! Petrel, a UCI chess engine.
//!
//! The engine is a parallel iterative-deepening alpha-beta searcher with a
//! tapered piece-square evaluation:
//! - Root moves are searched in parallel by worker threads sharing a
//!   transposition table and killer table
//! - Iterative deepening with an aspiration window around the previous score
//! - Negamax alpha-beta with principal-variation search, null-move pruning,
//!   late-move reductions, mate-distance pruning, and futility pruning
//! - Quiescence search with delta pruning and bad-capture filtering
//! - UCI protocol support for GUI integration
//!
//! Board representation, legal move generation, and Zobrist hashing come
//! from the [`pleco`] board; everything above that lives here.
//!
//! # Quick Start
//!
//! ```
//! use petrel::position::Position;
//! use petrel::search::{iterative_deepening, SearchOptions};
//! use petrel::search::KillerTable;
//! use petrel::tt::TranspositionTable;
//! use std::sync::atomic::AtomicBool;
//!
//! let pos = Position::start();
//! let tt = TranspositionTable::new(16);
//! let killers = KillerTable::new();
//! let stop = AtomicBool::new(false);
//!
//! let results = iterative_deepening(
//!     &pos,
//!     &tt,
//!     &killers,
//!     &stop,
//!     SearchOptions::depth(4),
//!     |_info| {},
//! );
//! println!("best move: {}", results.best_move_uci());
//! ```

// Enable pedantic lints with sensible domain-specific exceptions
#![warn(clippy::pedantic)]
// Bit patterns in masks are clearer without separators
#![allow(clippy::unreadable_literal)]
// Chess engines have intentionally similar names (mg_score/eg_score, etc.)
#![allow(clippy::similar_names)]
// Index casts are ubiquitous and safe here (square indices, ply counters)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod engine;
pub mod eval;
pub mod position;
pub mod search;
pub mod sync;
pub mod timer;
pub mod tt;
pub mod uci;
