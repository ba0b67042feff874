//! Square-centric mirror of the board.
//!
//! A length-64 array of signed piece codes, incrementally updated on every
//! move. The search uses it for O(1) attacker/victim lookups during move
//! ordering and quiescence filtering, where the bitboard representation
//! would need a scan.

use pleco::{BitMove, Board, Piece, PieceType, SQ};

/// Signed piece codes. Positive is white, negative is black, zero is empty.
pub const NOTHING: usize = 0;
pub const PAWN: usize = 1;
pub const KNIGHT: usize = 2;
pub const BISHOP: usize = 3;
pub const ROOK: usize = 4;
pub const QUEEN: usize = 5;
pub const KING: usize = 6;

/// Map a pleco piece type onto our 0..=6 code space.
#[inline]
#[must_use]
pub fn kind_code(pt: PieceType) -> usize {
    match pt {
        PieceType::P => PAWN,
        PieceType::N => KNIGHT,
        PieceType::B => BISHOP,
        PieceType::R => ROOK,
        PieceType::Q => QUEEN,
        PieceType::K => KING,
        _ => NOTHING,
    }
}

/// Token returned by [`Mirror::make`]; hands the captured square code back
/// to [`Mirror::unmake`].
#[derive(Clone, Copy, Debug)]
pub struct MirrorUndo {
    captured: i8,
}

/// Square-indexed piece table: `+p` for a white piece of kind `p`, `-p` for
/// black, `0` for empty.
#[derive(Clone, Debug)]
pub struct Mirror {
    squares: [i8; 64],
}

impl Mirror {
    /// Build the mirror from scratch by scanning the board.
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let mut squares = [0i8; 64];
        for (idx, slot) in squares.iter_mut().enumerate() {
            let piece = board.piece_at_sq(SQ(idx as u8));
            if piece == Piece::None {
                continue;
            }
            let code = kind_code(piece.type_of()) as i8;
            *slot = match piece.player() {
                Some(pleco::Player::Black) => -code,
                _ => code,
            };
        }
        Mirror { squares }
    }

    /// Apply a move: copy `from` to `to` and clear `from`.
    ///
    /// Promotions keep the pawn code and castling does not move the rook;
    /// the mirror is an ordering heuristic, not a second board, and
    /// [`MirrorUndo`] restores it bit-exactly either way.
    #[inline]
    pub fn make(&mut self, mv: BitMove) -> MirrorUndo {
        let from = mv.get_src().0 as usize;
        let to = mv.get_dest().0 as usize;
        let captured = self.squares[to];
        self.squares[to] = self.squares[from];
        self.squares[from] = 0;
        MirrorUndo { captured }
    }

    /// Undo a move made with [`Mirror::make`].
    #[inline]
    pub fn unmake(&mut self, mv: BitMove, undo: MirrorUndo) {
        let from = mv.get_src().0 as usize;
        let to = mv.get_dest().0 as usize;
        self.squares[from] = self.squares[to];
        self.squares[to] = undo.captured;
    }

    /// Piece kind on a square (0 = empty), ignoring color.
    #[inline]
    #[must_use]
    pub fn kind_of(&self, sq: SQ) -> usize {
        self.squares[sq.0 as usize].unsigned_abs() as usize
    }

    /// Raw signed code on a square.
    #[inline]
    #[must_use]
    pub(crate) fn code_at(&self, idx: usize) -> i8 {
        self.squares[idx]
    }
}
