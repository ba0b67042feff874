//! End-to-end search tests: forced mates, draw handling, and the
//! equivalence of alpha-beta with plain minimax at shallow depth.

use std::sync::atomic::AtomicBool;

use petrel::position::Position;
use petrel::search::{
    iterative_deepening, KillerTable, SearchOptions, Searcher, DRAW, INFINITY, MATE, NOT_MATE,
};
use petrel::tt::TranspositionTable;
use petrel::uci::report::SearchResults;

fn search_fen(fen: &str, depth: i32, threads: usize) -> SearchResults {
    let pos = Position::from_fen(fen).expect("test FEN must parse");
    let tt = TranspositionTable::new(64);
    let killers = KillerTable::new();
    let stop = AtomicBool::new(false);
    let opts = SearchOptions::depth(depth).with_threads(threads);
    iterative_deepening(&pos, &tt, &killers, &stop, opts, |_| {})
}

#[test]
fn finds_mate_in_two_as_white() {
    let results = search_fen(
        "r2qkb1r/pp2nppp/3p4/2pNN1B1/2BnP3/3P4/PPP2PPP/R2bK2R w KQkq - 1 0",
        3,
        2,
    );
    assert_eq!(results.best_move.to_string(), "d5f6");
    assert_ne!(results.mate, NOT_MATE, "mate must be reported");
    assert!(results.mate > 0, "white is the winning side");
}

#[test]
fn finds_mate_in_two_as_black() {
    let results = search_fen("6k1/pp4p1/2p5/2bp4/8/P5Pb/1P3rrP/2BRRN1K b - - 0 1", 3, 2);
    assert_eq!(results.best_move.to_string(), "g2g1");
    assert_ne!(results.mate, NOT_MATE, "mate must be reported");
}

#[test]
fn grinds_out_the_rook_mate() {
    // King and rook against a bare king; the win needs real depth.
    let results = search_fen("8/8/8/8/4K1k1/4R3/8/8 w - - 0 1", 16, 2);
    assert_eq!(results.best_move.to_string(), "e4e5");
    assert_ne!(results.mate, NOT_MATE, "mate must be reported");
    assert!(results.mate > 0);
}

#[test]
fn searching_a_finished_game_returns_the_null_move() {
    // Black is checkmated.
    let results = search_fen("7k/7Q/6K1/8/8/8/8/8 b - - 0 1", 4, 2);
    assert!(results.is_empty());
    assert_eq!(results.best_move_uci(), "0000");
}

#[test]
fn repeated_position_is_scored_as_a_draw() {
    // After the knights shuffle home twice the position has occurred
    // three times; the search must see 0 for the shuffled position.
    let mut pos = Position::start();
    for mv in [
        "b1c3", "g8f6", "c3b1", "f6g8", "b1c3", "g8f6", "c3b1", "f6g8",
    ] {
        pos.play_uci_move(mv).unwrap();
    }
    assert!(pos.draw());

    let tt = TranspositionTable::new(8);
    let killers = KillerTable::new();
    let stop = AtomicBool::new(false);
    let mut searcher = Searcher::new(pos, &tt, &killers, &stop, true);
    let score = searcher.alpha_beta(-INFINITY, INFINITY, 3);
    assert_eq!(score, DRAW);
}

/// Reference negamax without a window, pruning, reductions, or the
/// transposition table. Leaves bottom out in the same quiescence the real
/// search uses.
fn minimax(searcher: &mut Searcher, depth: i32) -> i16 {
    if searcher.pos.draw() {
        return DRAW;
    }
    let (moves, in_check) = searcher.pos.gen_moves();
    if moves.is_empty() {
        return if in_check {
            MATE + searcher.pos.ply()
        } else {
            DRAW
        };
    }
    if depth <= 0 {
        return searcher.quiesce(-INFINITY, INFINITY);
    }

    let mut best = -INFINITY;
    for mv in moves {
        let undo = searcher.pos.make(mv);
        let score = -minimax(searcher, depth - 1);
        searcher.pos.unmake(mv, undo);
        best = best.max(score);
    }
    best
}

#[test]
fn alpha_beta_matches_minimax_at_shallow_depth() {
    // A quiet pawn endgame: no checks in range, so no extensions fire,
    // and at depth 2 no reductions or null-move pruning apply.
    let fens = [
        "4k3/8/8/8/8/8/PPP5/4K3 w - - 0 1",
        "4k3/ppp5/8/8/8/8/PPP5/4K3 b - - 0 1",
    ];

    for fen in fens {
        for depth in 1..=2 {
            let killers = KillerTable::new();
            let stop = AtomicBool::new(false);

            let reference = {
                let tt = TranspositionTable::new(1);
                let pos = Position::from_fen(fen).unwrap();
                let mut s = Searcher::new(pos, &tt, &killers, &stop, true);
                minimax(&mut s, depth)
            };
            let searched = {
                let tt = TranspositionTable::new(1);
                let pos = Position::from_fen(fen).unwrap();
                let mut s = Searcher::new(pos, &tt, &killers, &stop, true);
                s.alpha_beta(-INFINITY, INFINITY, depth)
            };

            assert_eq!(
                searched, reference,
                "alpha-beta diverged from minimax at depth {depth} on {fen}"
            );
        }
    }
}

#[test]
fn deeper_search_does_not_lose_the_tactic() {
    // Hanging queen on d5: every depth from 2 up must keep taking it.
    let fen = "7k/8/8/3q4/4P3/8/8/7K w - - 0 1";
    for depth in 2..=4 {
        let results = search_fen(fen, depth, 1);
        assert_eq!(results.best_move.to_string(), "e4d5", "at depth {depth}");
        assert!(
            results.score > 50,
            "depth {depth} missed the queen: {}",
            results.score
        );
    }
}

#[test]
fn single_reply_positions_are_handled() {
    // Black is in check and has exactly one legal move.
    let results = search_fen("R6k/8/5K2/8/8/8/8/8 b - - 0 1", 4, 2);
    assert_eq!(results.best_move.to_string(), "h8h7");
}
