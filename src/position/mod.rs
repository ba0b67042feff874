//! Board adapter: the position owned by each search worker.
//!
//! Wraps the [`pleco`] board together with the square mirror, the hash
//! history, and the ply counter, and keeps all four in lockstep. Every
//! search path that applies a move must undo it before returning; the
//! [`Position::with_move`] helper encodes that discipline, and the raw
//! [`Position::make`]/[`Position::unmake`] pair exists for the search loop
//! where a closure over the searcher is impractical.

mod history;
mod mirror;

use std::fmt;

use pleco::{BitMove, Board, Player};

pub use history::History;
pub use mirror::{kind_code, Mirror, MirrorUndo};
pub use mirror::{BISHOP, KING, KNIGHT, NOTHING, PAWN, QUEEN, ROOK};

/// Start position FEN.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Phase weights per piece code; the game phase is their sum over the
/// board, 24 at the start position.
pub(crate) const PIECE_PHASE: [i16; 7] = [0, 0, 1, 1, 2, 4, 0];

/// Errors from building a position or replaying a move history.
#[derive(Debug, Clone)]
pub enum PositionError {
    /// The FEN string could not be parsed.
    InvalidFen { fen: String },
    /// A move in the history is not legal in the position it was played.
    IllegalMove { mv: String },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::InvalidFen { fen } => write!(f, "invalid FEN: {fen}"),
            PositionError::IllegalMove { mv } => write!(f, "illegal move: {mv}"),
        }
    }
}

impl std::error::Error for PositionError {}

/// Undo token for [`Position::make`].
#[derive(Debug)]
pub struct MoveUndo {
    mirror: MirrorUndo,
}

/// Exclusively-owned search state: board, mirror, draw history, and ply.
#[derive(Clone)]
pub struct Position {
    board: Board,
    mirror: Mirror,
    history: History,
    ply: i16,
}

impl Position {
    /// The standard start position.
    #[must_use]
    pub fn start() -> Self {
        let board = Board::start_pos();
        Position::from_board(board)
    }

    /// Build a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let board = Board::from_fen(fen).map_err(|_| PositionError::InvalidFen {
            fen: fen.to_string(),
        })?;
        Ok(Position::from_board(board))
    }

    fn from_board(board: Board) -> Self {
        let mirror = Mirror::from_board(&board);
        let mut history = History::new();
        history.push(board.zobrist());
        Position {
            board,
            mirror,
            history,
            ply: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.board.zobrist()
    }

    #[inline]
    #[must_use]
    pub fn ply(&self) -> i16 {
        self.ply
    }

    #[inline]
    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.board.turn() == Player::White
    }

    #[inline]
    #[must_use]
    pub fn half_move_clock(&self) -> u8 {
        self.board.rule_50().clamp(0, 255) as u8
    }

    /// Legal moves and whether the side to move is in check.
    #[must_use]
    pub fn gen_moves(&self) -> (Vec<BitMove>, bool) {
        let moves = self.board.generate_moves().iter().copied().collect();
        (moves, self.board.in_check())
    }

    /// Is `mv` legal in the current position?
    #[must_use]
    pub fn legal(&self, mv: BitMove) -> bool {
        self.board.generate_moves().iter().any(|m| *m == mv)
    }

    /// Draw by fifty-move rule or threefold repetition.
    #[must_use]
    pub fn draw(&self) -> bool {
        self.history
            .draw(self.hash(), self.ply, self.half_move_clock())
    }

    /// Game phase 0..=24 from remaining non-pawn material.
    #[must_use]
    pub fn game_phase(&self) -> i16 {
        crate::eval::game_phase(&self.board)
    }

    /// Apply a move, updating board, mirror, history, and ply together.
    #[inline]
    pub fn make(&mut self, mv: BitMove) -> MoveUndo {
        let mirror = self.mirror.make(mv);
        self.board.apply_move(mv);
        self.ply += 1;
        self.history.push(self.board.zobrist());
        MoveUndo { mirror }
    }

    /// Exactly reverse a [`Position::make`].
    #[inline]
    pub fn unmake(&mut self, mv: BitMove, undo: MoveUndo) {
        self.history.pop();
        self.ply -= 1;
        self.board.undo_move();
        self.mirror.unmake(mv, undo.mirror);
    }

    /// Run `f` with `mv` applied; the move is undone on the way out.
    pub fn with_move<R>(&mut self, mv: BitMove, f: impl FnOnce(&mut Position) -> R) -> R {
        let undo = self.make(mv);
        let out = f(self);
        self.unmake(mv, undo);
        out
    }

    /// Pass the turn. The side to move must not be in check.
    #[inline]
    pub fn make_null(&mut self) {
        debug_assert!(!self.board.in_check());
        unsafe {
            self.board.apply_null_move();
        }
        self.ply += 1;
        self.history.push(self.board.zobrist());
    }

    /// Exactly reverse a [`Position::make_null`].
    #[inline]
    pub fn unmake_null(&mut self) {
        self.history.pop();
        self.ply -= 1;
        unsafe {
            self.board.undo_null_move();
        }
    }

    /// Run `f` with the turn passed; restored on the way out.
    pub fn with_null_move<R>(&mut self, f: impl FnOnce(&mut Position) -> R) -> R {
        self.make_null();
        let out = f(self);
        self.unmake_null();
        out
    }

    /// Permanently play a move given in UCI long algebraic form
    /// (`e2e4`, `e7e8q`). Used when replaying a `position` command; the
    /// mirror is rebuilt so castling and promotions land exactly.
    pub fn play_uci_move(&mut self, uci: &str) -> Result<(), PositionError> {
        if !self.board.apply_uci_move(uci) {
            return Err(PositionError::IllegalMove {
                mv: uci.to_string(),
            });
        }
        self.ply += 1;
        self.history.push(self.board.zobrist());
        self.mirror = Mirror::from_board(&self.board);
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uci_move(pos: &Position, uci: &str) -> BitMove {
        pos.gen_moves()
            .0
            .into_iter()
            .find(|m| m.to_string() == uci)
            .expect("move should be legal")
    }

    #[test]
    fn start_position_basics() {
        let pos = Position::start();
        assert_eq!(pos.ply(), 0);
        assert!(pos.white_to_move());
        assert_eq!(pos.half_move_clock(), 0);
        assert_eq!(pos.gen_moves().0.len(), 20);
        assert_eq!(pos.game_phase(), 24);
    }

    #[test]
    fn make_unmake_is_exactly_reversible() {
        let mut pos = Position::start();
        let hash = pos.hash();
        let ply = pos.ply();
        let hist_len = pos.history.len();

        let mv = uci_move(&pos, "e2e4");
        let undo = pos.make(mv);
        assert_ne!(pos.hash(), hash);
        assert_eq!(pos.ply(), ply + 1);
        assert_eq!(pos.history.len(), hist_len + 1);

        pos.unmake(mv, undo);
        assert_eq!(pos.hash(), hash);
        assert_eq!(pos.ply(), ply);
        assert_eq!(pos.history.len(), hist_len);
    }

    #[test]
    fn null_move_is_exactly_reversible() {
        let mut pos = Position::start();
        let hash = pos.hash();
        let ply = pos.ply();

        pos.with_null_move(|inner| {
            assert_ne!(inner.hash(), hash);
            assert_eq!(inner.ply(), ply + 1);
        });
        assert_eq!(pos.hash(), hash);
        assert_eq!(pos.ply(), ply);
    }

    #[test]
    fn with_move_restores_on_the_way_out() {
        let mut pos = Position::start();
        let hash = pos.hash();
        let mv = uci_move(&pos, "g1f3");
        let child_hash = pos.with_move(mv, |p| p.hash());
        assert_ne!(child_hash, hash);
        assert_eq!(pos.hash(), hash);
    }

    #[test]
    fn play_uci_move_rejects_illegal_moves() {
        let mut pos = Position::start();
        assert!(pos.play_uci_move("e2e5").is_err());
        assert!(pos.play_uci_move("e2e4").is_ok());
        assert!(!pos.white_to_move());
    }

    #[test]
    fn threefold_shuffle_is_a_draw() {
        let mut pos = Position::start();
        let shuffle = [
            "b1c3", "g8f6", "c3b1", "f6g8", "b1c3", "g8f6", "c3b1", "f6g8",
        ];
        for uci in shuffle {
            assert!(!pos.draw(), "premature draw before {uci}");
            pos.play_uci_move(uci).unwrap();
        }
        assert!(pos.draw(), "threefold not reported after final move");
    }

    #[test]
    fn threefold_via_search_moves_unwinds() {
        let mut pos = Position::start();
        let shuffle = [
            "b1c3", "g8f6", "c3b1", "f6g8", "b1c3", "g8f6", "c3b1", "f6g8",
        ];
        let mut undos = Vec::new();
        for uci in shuffle {
            let mv = uci_move(&pos, uci);
            undos.push((mv, pos.make(mv)));
        }
        assert!(pos.draw());

        let (mv, undo) = undos.pop().unwrap();
        pos.unmake(mv, undo);
        assert!(!pos.draw(), "draw must clear after one unmove");
    }

    #[test]
    fn fen_round_trips_through_board() {
        let fen = "r2qkb1r/pp2nppp/3p4/2pNN1B1/2BnP3/3P4/PPP2PPP/R2bK2R w KQkq - 1 10";
        let pos = Position::from_fen(fen).unwrap();
        assert!(pos.white_to_move());
        assert_eq!(pos.half_move_clock(), 1);
        assert!(Position::from_fen("not a fen").is_err());
    }
}
