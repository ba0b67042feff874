//! The long-lived engine: game state, shared tables, and search control.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::engine::time::think_time;
use crate::eval::is_late_endgame;
use crate::position::{Position, PositionError, START_FEN};
use crate::search::{iterative_deepening, KillerTable, SearchOptions, MAX_DEPTH};
use crate::sync::StopFlag;
use crate::timer::spawn_deadline_timer;
use crate::tt::TranspositionTable;
use crate::uci::command::GoParams;
use crate::uci::options::{EngineOptions, OptionAction};
use crate::uci::report::SearchResults;

/// Stack size for the search thread; the root fan-out itself is shallow,
/// the workers carry their own stacks.
const SEARCH_THREAD_STACK: usize = 4 * 1024 * 1024;

/// Owns the root position, the tables shared across searches, and the
/// currently running search, if any.
pub struct Engine {
    pos: Position,
    tt: Arc<TranspositionTable>,
    killers: Arc<KillerTable>,
    options: EngineOptions,
    stop: StopFlag,
    search: Option<JoinHandle<()>>,
    debug: bool,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        let options = EngineOptions::default();
        Engine {
            pos: Position::start(),
            tt: Arc::new(TranspositionTable::new(options.hash_mb)),
            killers: Arc::new(KillerTable::new()),
            options,
            stop: StopFlag::new(),
            search: None,
            debug: false,
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Reset the game: start position, fresh tables.
    pub fn new_game(&mut self) {
        self.stop_search();
        self.pos = Position::start();
        self.tt = Arc::new(TranspositionTable::new(self.options.hash_mb));
        self.killers = Arc::new(KillerTable::new());
    }

    /// Load a position and replay its move history.
    ///
    /// The transposition table is retained across moves of one game; its
    /// age is bumped so entries from earlier root positions lose
    /// replacement priority.
    pub fn set_position(&mut self, fen: &str, moves: &[&str]) -> Result<(), PositionError> {
        self.stop_search();
        let mut pos = Position::from_fen(fen)?;
        for mv in moves {
            pos.play_uci_move(mv)?;
        }
        self.pos = pos;
        if !moves.is_empty() {
            self.tt.bump_age();
        }
        Ok(())
    }

    /// Shorthand for `set_position(START_FEN, moves)`.
    pub fn set_start_position(&mut self, moves: &[&str]) -> Result<(), PositionError> {
        self.set_position(START_FEN, moves)
    }

    /// Start a search. Results stream to stdout: one `info` line per
    /// completed depth, then `bestmove`. Returns immediately; `stop`
    /// cancels, and a deadline from [`think_time`] bounds the search.
    pub fn go(&mut self, params: &GoParams) {
        self.stop_search();
        self.stop.reset();

        let mut depth = params.depth.map_or(MAX_DEPTH, |d| d as i32);
        // Dig deeper once most material is gone; endgames need it and the
        // tree is small enough to afford it.
        if is_late_endgame(self.pos.board()) {
            depth += 2;
        }

        let opts = SearchOptions {
            depth,
            threads: self.options.threads,
            nullmove: self.options.nullmove,
        };

        let deadline = Instant::now() + think_time(params, self.pos.white_to_move());
        spawn_deadline_timer(deadline, self.stop.clone());

        let pos = self.pos.clone();
        let tt = Arc::clone(&self.tt);
        let killers = Arc::clone(&self.killers);
        let stop = self.stop.clone();
        let debug = self.debug;

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_THREAD_STACK)
            .spawn(move || {
                let start = Instant::now();
                let results = iterative_deepening(
                    &pos,
                    &tt,
                    &killers,
                    stop.as_atomic(),
                    opts,
                    |depth_results| println!("{}", depth_results.print(start)),
                );

                report_search_end(&results, debug);
                println!("bestmove {}", results.best_move_uci());
                // Release the deadline timer.
                stop.stop();
            })
            .expect("failed to spawn search thread");

        self.search = Some(handle);
    }

    /// Cancel the running search, if any, and wait for its `bestmove`.
    pub fn stop_search(&mut self) {
        self.stop.stop();
        if let Some(handle) = self.search.take() {
            let _ = handle.join();
        }
    }

    /// Drop all cached search results.
    pub fn clear_tt(&mut self) {
        self.stop_search();
        self.tt = Arc::new(TranspositionTable::new(self.options.hash_mb));
    }

    /// Apply a `setoption` command.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) {
        if let Some(action) = self.options.apply(name, value) {
            match action {
                OptionAction::ReinitHash(mb) => {
                    self.stop_search();
                    self.tt = Arc::new(TranspositionTable::new(mb));
                }
            }
        }
    }

    /// Toggle `info string` diagnostics.
    pub fn set_debug(&mut self, on: bool) {
        self.debug = on;
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop_search();
    }
}

/// Post-search diagnostics; the quiescence share says how loud the tree
/// was.
fn report_search_end(results: &SearchResults, debug: bool) {
    if results.is_empty() {
        log::info!("search called on a finished game");
        return;
    }
    if debug && results.nodes > 0 {
        #[allow(clippy::cast_precision_loss)]
        let pct = 100.0 * results.qnodes as f64 / results.nodes as f64;
        println!(
            "info string {} / {} = {pct:.1}% quiescent nodes",
            results.qnodes, results.nodes
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_position_replays_history() {
        let mut engine = Engine::new();
        engine
            .set_start_position(&["e2e4", "e7e5", "g1f3"])
            .unwrap();
        assert!(!engine.position().white_to_move());
        assert_eq!(engine.position().ply(), 3);
    }

    #[test]
    fn set_position_rejects_bad_input() {
        let mut engine = Engine::new();
        assert!(engine.set_position("garbage", &[]).is_err());
        assert!(engine.set_start_position(&["e2e5"]).is_err());
    }

    #[test]
    fn new_game_resets_the_board() {
        let mut engine = Engine::new();
        engine.set_start_position(&["e2e4"]).unwrap();
        engine.new_game();
        assert_eq!(engine.position().ply(), 0);
        assert!(engine.position().white_to_move());
    }

    #[test]
    fn hash_option_reallocates_the_table() {
        let mut engine = Engine::new();
        engine.set_option("Hash", Some("8"));
        assert_eq!(engine.options().hash_mb, 8);
        engine.set_option("Nullmove", Some("false"));
        assert!(!engine.options().nullmove);
    }

    #[test]
    fn go_and_stop_round_trip() {
        // A depth-limited search on a quiet position finishes on its own;
        // stop_search must join cleanly either way.
        let mut engine = Engine::new();
        let params = GoParams {
            depth: Some(2),
            ..GoParams::default()
        };
        engine.go(&params);
        engine.stop_search();
    }
}
