//! Time management.

use std::time::Duration;

use crate::uci::command::GoParams;

/// Budget for `go infinite`; effectively unbounded but still releases the
/// timer thread eventually.
const INFINITE_THINK: Duration = Duration::from_secs(3600);

/// Budget when no clock information is given at all.
const DEFAULT_THINK: Duration = Duration::from_secs(5);

/// How long to think on this move.
///
/// With clock information, a fraction of the remaining time plus the
/// increments we will collect: `(t + inc * (mtg + 2)) / (mtg + 2)`, where
/// `mtg` is moves-to-go (0 in sudden death). `movetime` and `infinite`
/// override the formula.
#[must_use]
pub fn think_time(params: &GoParams, white_to_move: bool) -> Duration {
    if params.infinite {
        return INFINITE_THINK;
    }
    if let Some(ms) = params.movetime {
        return Duration::from_millis(ms);
    }

    let (time, inc) = if white_to_move {
        (params.wtime, params.winc)
    } else {
        (params.btime, params.binc)
    };

    match time {
        Some(t) => {
            let mtg = params.movestogo.unwrap_or(0) + 2;
            let inc = inc.unwrap_or(0);
            Duration::from_millis((t + inc * mtg) / mtg)
        }
        None => DEFAULT_THINK,
    }
}
