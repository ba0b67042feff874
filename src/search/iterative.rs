//! Iterative deepening with an aspiration window.
//!
//! Each completed depth re-centers the alpha-beta window on its score; the
//! next depth is searched inside that narrow window and re-searched with
//! an exponentially wider one whenever the score falls outside. The last
//! fully completed depth's result is what cancellation returns.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::eval::PAWN_VALUE;
use crate::position::Position;
use crate::search::{root_search, SearchOptions, INFINITY, NOT_MATE};
use crate::tt::TranspositionTable;
use crate::uci::report::SearchResults;

use super::KillerTable;

/// Half-width of the aspiration window.
pub const ASPIRATION_WINDOW: i16 = PAWN_VALUE / 4;

/// Widen a window bound away from zero by `window * 2^exp`, saturating at
/// the search bounds.
fn widen(bound: i16, exp: u32, downward: bool) -> i16 {
    let step = i32::from(ASPIRATION_WINDOW) << exp.min(16);
    let wide = if downward {
        i32::from(bound) - step
    } else {
        i32::from(bound) + step
    };
    wide.clamp(i32::from(-INFINITY), i32::from(INFINITY)) as i16
}

/// Search `pos` at increasing depth until the depth limit or cancellation.
///
/// `emit` is called once per fully completed depth with the depth's
/// results (the UCI layer prints an `info` line from it). The returned
/// result is the deepest completed one; if the search is cancelled before
/// depth 1 completes, a stub carrying the first legal move is returned so
/// the caller always has a legal best move. An empty result means the
/// game is already over.
pub fn iterative_deepening(
    pos: &Position,
    tt: &TranspositionTable,
    killers: &KillerTable,
    stop: &AtomicBool,
    opts: SearchOptions,
    mut emit: impl FnMut(&SearchResults),
) -> SearchResults {
    let (moves, _) = pos.gen_moves();
    if moves.is_empty() {
        return SearchResults::empty();
    }

    let mut best = SearchResults::stub(moves[0]);

    // Seed the window from a previous search of this position, if the
    // table still remembers one.
    let (mut alpha, mut beta) = (-INFINITY, INFINITY);
    if let Some(entry) = tt.get(pos.hash(), pos.ply()) {
        alpha = entry.value.saturating_sub(ASPIRATION_WINDOW);
        beta = entry.value.saturating_add(ASPIRATION_WINDOW);
    }

    let mut exp = 1u32;
    let mut depth = 1i32;
    while depth <= opts.depth {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let result = root_search(pos, tt, killers, stop, opts, depth, alpha, beta);
        if stop.load(Ordering::Relaxed) {
            // The depth did not complete; keep the previous result.
            break;
        }

        if result.score <= alpha {
            // Fail low: the position is worse than the window assumed.
            alpha = widen(alpha, exp, true);
            exp += 1;
            continue;
        }
        if result.score >= beta {
            // Fail high: better than assumed.
            beta = widen(beta, exp, false);
            exp += 1;
            continue;
        }

        emit(&result);

        // A forced mate does not get better with more depth.
        if result.mate != NOT_MATE {
            return result;
        }

        alpha = result.score.saturating_sub(ASPIRATION_WINDOW);
        beta = result.score.saturating_add(ASPIRATION_WINDOW);
        exp = 1;
        best = result;
        depth += 1;
    }

    best
}
