//! Parallel root search.
//!
//! One depth's work: fan the root moves out over worker threads through a
//! bounded queue, search each root-move child with the full window, and
//! reduce the partial results to the best score. Workers own their
//! position copies; only the killer and transposition tables are shared.

use std::sync::atomic::AtomicBool;
use std::thread;

use pleco::BitMove;

use crate::position::Position;
use crate::search::{mate_score, NodeCount, SearchOptions, Searcher};
use crate::tt::TranspositionTable;
use crate::uci::report::SearchResults;

use super::KillerTable;

/// Plies of principal variation to reconstruct from the table.
const PV_LENGTH: usize = 10;

/// Worker stack size; the recursion is deep at high depths.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// One worker's verdict on one root move.
struct RootScore {
    mv: BitMove,
    score: i16,
    stats: NodeCount,
    pv: Vec<BitMove>,
}

/// Search every root move at `depth` inside `[alpha, beta]` and return the
/// aggregated results. An empty result means the game is over at the root;
/// the caller maps it to `bestmove 0000`.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn root_search(
    pos: &Position,
    tt: &TranspositionTable,
    killers: &KillerTable,
    stop: &AtomicBool,
    opts: SearchOptions,
    depth: i32,
    alpha: i16,
    beta: i16,
) -> SearchResults {
    let (moves, _) = pos.gen_moves();
    if moves.is_empty() {
        return SearchResults::empty();
    }

    let threads = opts.threads.clamp(1, moves.len());
    let root_ply = pos.ply();

    let (job_tx, job_rx) = crossbeam_channel::bounded::<BitMove>(threads);
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<RootScore>();

    let mut best: Option<RootScore> = None;
    let mut nodes = 0u64;
    let mut qnodes = 0u64;
    let mut sel_depth = 0i16;

    thread::scope(|scope| {
        for id in 0..threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let mut worker = Searcher::new(pos.clone(), tt, killers, stop, opts.nullmove);

            thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(WORKER_STACK_SIZE)
                .spawn_scoped(scope, move || {
                    while let Ok(mv) = job_rx.recv() {
                        worker.stats.reset();

                        let undo = worker.pos.make(mv);
                        let score = -worker.alpha_beta(-beta, -alpha, depth);
                        worker.pos.unmake(mv, undo);

                        let pv = worker.principal_variation(mv, PV_LENGTH);
                        let verdict = RootScore {
                            mv,
                            score,
                            stats: worker.stats,
                            pv,
                        };
                        if result_tx.send(verdict).is_err() {
                            break;
                        }
                    }
                })
                .expect("failed to spawn search worker");
        }
        drop(result_tx);
        drop(job_rx);

        for &mv in &moves {
            if job_tx.send(mv).is_err() {
                break;
            }
        }
        drop(job_tx);

        // Reduce as results arrive: highest score wins, the first
        // emission keeps ties.
        for verdict in result_rx {
            nodes += verdict.stats.nodes;
            qnodes += verdict.stats.qnodes;
            sel_depth = sel_depth.max((verdict.stats.max_ply - root_ply).max(0));
            log::debug!("root move {}: {}", verdict.mv, verdict.score);
            if best.as_ref().map_or(true, |b| verdict.score > b.score) {
                best = Some(verdict);
            }
        }
    });

    let best = best.expect("root had moves, workers must report");
    SearchResults {
        best_move: best.mv,
        score: best.score,
        mate: mate_score(best.score, root_ply),
        pv: best.pv.iter().map(ToString::to_string).collect(),
        depth,
        sel_depth,
        nodes,
        qnodes,
        hashfull: tt.permill_full(),
        tt_hits: tt.hits(),
    }
}

impl Searcher<'_> {
    /// Reconstruct the principal variation by following transposition
    /// best moves from `mv`, stopping at `depth` plies or the first move
    /// that is not legal where the walk has arrived.
    pub(crate) fn principal_variation(&mut self, mv: BitMove, depth: usize) -> Vec<BitMove> {
        if depth == 0 || !self.pos.legal(mv) {
            return Vec::new();
        }

        let undo = self.pos.make(mv);
        let mut pv = vec![mv];
        if let Some(next) = self.tt().best_move(self.pos.hash(), self.pos.ply()) {
            pv.extend(self.principal_variation(next, depth - 1));
        }
        self.pos.unmake(mv, undo);
        pv
    }
}
