//! Search results and their UCI rendering.

use std::fmt::Write as _;
use std::time::Instant;

use pleco::BitMove;

use crate::search::NOT_MATE;

/// Everything one completed depth reports back to the GUI.
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// Best root move; the null move when the game was already over.
    pub best_move: BitMove,
    /// Score in centipawns from the side to move.
    pub score: i16,
    /// Full moves to mate, negative when losing, [`NOT_MATE`] otherwise.
    pub mate: i16,
    /// Principal variation in UCI long algebraic form.
    pub pv: Vec<String>,
    /// Completed search depth.
    pub depth: i32,
    /// Deepest ply reached, quiescence included.
    pub sel_depth: i16,
    /// Nodes searched, quiescence included.
    pub nodes: u64,
    /// Quiescence nodes searched.
    pub qnodes: u64,
    /// Transposition table fill level, in permill.
    pub hashfull: u32,
    /// Transposition table hits so far.
    pub tt_hits: u64,
}

impl SearchResults {
    /// The result of searching a position with no legal moves.
    #[must_use]
    pub fn empty() -> Self {
        SearchResults {
            best_move: BitMove::null(),
            score: 0,
            mate: NOT_MATE,
            pv: Vec::new(),
            depth: 0,
            sel_depth: 0,
            nodes: 0,
            qnodes: 0,
            hashfull: 0,
            tt_hits: 0,
        }
    }

    /// A placeholder carrying the first legal move, returned when the
    /// search is cancelled before any depth completes.
    #[must_use]
    pub fn stub(mv: BitMove) -> Self {
        SearchResults {
            best_move: mv,
            pv: vec![mv.to_string()],
            ..SearchResults::empty()
        }
    }

    /// True when the game was already over at the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.best_move.is_null()
    }

    /// Best move for the `bestmove` line; the reserved `0000` when empty.
    #[must_use]
    pub fn best_move_uci(&self) -> String {
        if self.best_move.is_null() {
            "0000".to_string()
        } else {
            self.best_move.to_string()
        }
    }

    /// Render the per-depth `info` line.
    #[must_use]
    pub fn print(&self, start: Instant) -> String {
        let mut out = String::from("info");
        let _ = write!(out, " depth {}", self.depth);
        let _ = write!(out, " seldepth {}", self.sel_depth);
        if self.mate == NOT_MATE {
            let _ = write!(out, " score cp {}", self.score);
        } else {
            let _ = write!(out, " score mate {}", self.mate);
        }
        let _ = write!(out, " hashfull {}", self.hashfull);
        let _ = write!(out, " time {}", start.elapsed().as_millis());
        let _ = write!(out, " nodes {}", self.nodes);
        let _ = write!(out, " tbhits {}", self.tt_hits);
        if !self.pv.is_empty() {
            let _ = write!(out, " pv {}", self.pv.join(" "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_map_to_the_null_move() {
        let results = SearchResults::empty();
        assert!(results.is_empty());
        assert_eq!(results.best_move_uci(), "0000");
    }

    #[test]
    fn info_line_uses_cp_for_ordinary_scores() {
        let mut results = SearchResults::empty();
        results.depth = 6;
        results.sel_depth = 11;
        results.score = 34;
        results.nodes = 12345;
        results.pv = vec!["e2e4".into(), "e7e5".into()];

        let line = results.print(Instant::now());
        assert!(line.starts_with("info depth 6 seldepth 11 score cp 34"));
        assert!(line.contains(" nodes 12345"));
        assert!(line.ends_with("pv e2e4 e7e5"));
    }

    #[test]
    fn info_line_uses_mate_when_encoded() {
        let mut results = SearchResults::empty();
        results.depth = 4;
        results.mate = 2;
        results.score = 14990;

        let line = results.print(Instant::now());
        assert!(line.contains("score mate 2"));
        assert!(!line.contains("score cp"));
    }

    #[test]
    fn stub_carries_the_move_in_its_pv() {
        let mv = BitMove::new(0x0041);
        let results = SearchResults::stub(mv);
        assert!(!results.is_empty());
        assert_eq!(results.pv, vec![mv.to_string()]);
        assert_eq!(results.mate, NOT_MATE);
    }
}
