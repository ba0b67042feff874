//! Negamax alpha-beta recursion and quiescence search.

use pleco::BitMove;

use crate::eval::{eval, KNIGHT_VALUE, PIECE_VALUE, QUEEN_VALUE, ROOK_VALUE};
use crate::position::{NOTHING, PAWN};
use crate::tt::{Bound, Entry};

use super::{Searcher, DRAW, MATE};

impl Searcher<'_> {
    /// Negamax alpha-beta.
    ///
    /// Alpha is the lowest score the maximizing side can already force,
    /// beta the highest the minimizing side will allow; one refutation is
    /// enough to prove a move bad. Each recursion negates window and
    /// score, so only the "max" half is written.
    #[allow(clippy::too_many_lines)]
    pub fn alpha_beta(&mut self, mut alpha: i16, mut beta: i16, mut depth: i32) -> i16 {
        self.stats.inc();
        self.stats.ply(self.pos.ply());

        if self.pos.draw() {
            return DRAW;
        }

        let ply = self.pos.ply();

        // Mate-distance pruning: no line from here can beat a mate we
        // already have, or lose slower than being mated right now.
        let upper = -MATE - ply;
        if upper < beta {
            beta = upper;
        }
        if alpha >= upper {
            return upper;
        }
        let lower = MATE + ply;
        if lower > alpha {
            alpha = lower;
        }
        if beta <= lower {
            return lower;
        }

        let (moves, in_check) = self.pos.gen_moves();
        if moves.is_empty() {
            return if in_check { MATE + ply } else { DRAW };
        }

        // Forced replies and checks are effectively free plies.
        if moves.len() == 1 || in_check {
            depth += 1;
        }

        let hash = self.pos.hash();
        let (tt_value, tt_bound) = self.tt().get_eval(hash, depth, alpha, beta, ply);
        if tt_bound != Bound::Unknown {
            return tt_value;
        }

        if depth <= 0 || self.cancelled() {
            return self.quiesce(alpha, beta);
        }

        let pv_node = alpha != beta - 1;

        // Null-move pruning: hand the opponent a free move; if the
        // position still fails high, a real move will too. Unsound in
        // zugzwang, which is why it stays off in check.
        if self.nullmove_enabled() && !pv_node && !in_check && depth >= 3 {
            let r = if depth < 6 { 2 } else { 4 + depth / 6 };
            self.pos.make_null();
            let score = -self.alpha_beta(-beta, -beta + 1, depth - r);
            self.pos.unmake_null();
            if score >= beta {
                return beta;
            }
        }

        // Futility: a quiet node so far below alpha that a shallow search
        // cannot rescue it goes straight to quiescence.
        if !pv_node && !in_check {
            let static_eval = i32::from(eval(self.pos.board()));
            if depth == 1 && static_eval + i32::from(KNIGHT_VALUE) < i32::from(alpha) {
                return self.quiesce(alpha, beta);
            }
            if depth == 2 && static_eval + i32::from(ROOK_VALUE) < i32::from(alpha) {
                return self.quiesce(alpha, beta);
            }
        }

        let mut sorter = self.new_sorter(&moves);
        let mut bound = Bound::Alpha;
        let mut best_move = BitMove::null();

        for i in 0..sorter.len() {
            let mv = sorter.next(i);

            // Late-move reduction: moves the ordering ranked low get a
            // shallower look, re-searched at full window only if they
            // surprise us.
            let reduction = if i <= 6 || depth < 3 { 1 } else { depth / 3 };
            let next_depth = depth - reduction;

            let undo = self.pos.make(mv);
            let score = if bound == Bound::Exact {
                // A PV candidate exists; probe the rest with a zero
                // window and only re-search inside the window on a fail.
                let mut score = -self.alpha_beta(-alpha - 1, -alpha, next_depth);
                if alpha < score && score < beta {
                    score = -self.alpha_beta(-beta, -alpha, next_depth);
                }
                score
            } else {
                -self.alpha_beta(-beta, -alpha, next_depth)
            };
            self.pos.unmake(mv, undo);

            if score >= beta {
                // The opponent won't allow this line; remember what cut.
                self.killers().add(ply, mv);
                self.tt()
                    .add(ply, Entry::new(hash, next_depth, Bound::Beta, beta, mv));
                return beta;
            }
            if score > alpha {
                alpha = score;
                best_move = mv;
                bound = Bound::Exact;
            }
        }

        self.tt()
            .add(ply, Entry::new(hash, depth, bound, alpha, best_move));
        alpha
    }

    /// Quiescence: expand only captures until the position is quiet.
    ///
    /// The static eval is unreliable in loud positions (a queen may be
    /// hanging), and most searched nodes land here, so the capture list
    /// is filtered hard before recursing.
    pub fn quiesce(&mut self, mut alpha: i16, beta: i16) -> i16 {
        if self.pos.draw() {
            return DRAW;
        }
        self.stats.qinc();
        self.stats.ply(self.pos.ply());

        let ply = self.pos.ply();
        let stand_pat = eval(self.pos.board());
        if stand_pat >= beta {
            return beta;
        }
        // Delta pruning: not even the biggest possible swing helps.
        if i32::from(stand_pat) < i32::from(alpha) - i32::from(QUEEN_VALUE) {
            return alpha;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let (moves, in_check) = self.pos.gen_moves();
        if moves.is_empty() {
            return if in_check { MATE + ply } else { DRAW };
        }

        let mut loud: Vec<BitMove> = Vec::with_capacity(moves.len());
        for &mv in &moves {
            if let Some(score) = self.terminal_score(mv) {
                return -score;
            }

            let victim = self.pos.mirror().kind_of(mv.get_dest());
            if victim == NOTHING {
                // Skip quiet moves.
                continue;
            }
            // Per-move delta cutoff: winning this piece still leaves us
            // below alpha.
            if i32::from(stand_pat) + i32::from(PIECE_VALUE[victim]) + 200 < i32::from(alpha) {
                continue;
            }
            let attacker = self.pos.mirror().kind_of(mv.get_src());
            if bad_capture(attacker, victim) {
                continue;
            }
            loud.push(mv);
        }

        let mut sorter = self.new_sorter(&loud);
        for i in 0..sorter.len() {
            let mv = sorter.next(i);
            let undo = self.pos.make(mv);
            let score = -self.quiesce(-beta, -alpha);
            self.pos.unmake(mv, undo);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    /// Score at terminal child nodes, from the child's perspective.
    ///
    /// Applying `mv` may end the game; returns `Some(MATE + ply)` when the
    /// child is mated, `Some(0)` for stalemate, `None` otherwise.
    fn terminal_score(&mut self, mv: BitMove) -> Option<i16> {
        self.pos.with_move(mv, |pos| {
            let (moves, in_check) = pos.gen_moves();
            if !moves.is_empty() {
                None
            } else if in_check {
                Some(MATE + pos.ply())
            } else {
                Some(DRAW)
            }
        })
    }
}

/// A capture that loses material on its face: the attacker outweighs the
/// victim by more than a pawn's margin and is not a pawn itself.
fn bad_capture(attacker: usize, victim: usize) -> bool {
    attacker != PAWN
        && i32::from(PIECE_VALUE[victim]) < i32::from(PIECE_VALUE[attacker]) - 50
}
