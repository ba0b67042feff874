//! Static position evaluation.
//!
//! Tapered evaluation: material plus piece-square tables plus pawn, rook,
//! and king structural terms, with the midgame and endgame scores blended
//! by the amount of non-pawn material left on the board. The score is
//! returned from the side-to-move's perspective and never reaches the mate
//! band.

pub mod masks;
pub mod pst;

use pleco::{Board, Piece, PieceType, Player, SQ};

use crate::position::{kind_code, KING, PAWN, PIECE_PHASE, QUEEN, ROOK};

/// Material values in centipawns, indexed by piece code.
pub const PIECE_VALUE: [i16; 7] = [0, 100, 320, 330, 500, 900, 1800];

pub const PAWN_VALUE: i16 = PIECE_VALUE[PAWN];
pub const KNIGHT_VALUE: i16 = PIECE_VALUE[crate::position::KNIGHT];
pub const ROOK_VALUE: i16 = PIECE_VALUE[ROOK];
pub const QUEEN_VALUE: i16 = PIECE_VALUE[QUEEN];

/// Midgame/endgame penalty for each pawn sharing a file with a friend.
const DOUBLED_PAWN: (i32, i32) = (10, 18);

/// Penalty for a pawn with no friendly pawn on an adjacent file.
const ISOLATED_PAWN: (i32, i32) = (12, 8);

/// Bonus for a rook on a file with no pawns at all.
const ROOK_OPEN_FILE: (i32, i32) = (25, 15);

/// Bonus for a rook on a file with exactly one pawn.
const ROOK_SEMI_OPEN_FILE: (i32, i32) = (12, 8);

/// Passed-pawn bonus by relative rank (rank 0 and 7 cannot hold a pawn).
const PASSED_BY_RANK: [i32; 8] = [0, 5, 12, 20, 32, 55, 90, 0];

/// Total phase at the start position; also the blend denominator.
const PHASE_TOTAL: i32 = 24;

/// Game phase 0..=24 from remaining non-pawn, non-king material.
#[must_use]
pub fn game_phase(board: &Board) -> i16 {
    let mut phase = 0i16;
    for player in [Player::White, Player::Black] {
        for pt in [PieceType::N, PieceType::B, PieceType::R, PieceType::Q] {
            let count = board.count_piece(player, pt) as i16;
            phase += count * PIECE_PHASE[kind_code(pt)];
        }
    }
    phase.min(PHASE_TOTAL as i16)
}

/// Raw material balance, white minus black, in centipawns.
#[must_use]
pub fn material(board: &Board) -> i32 {
    let mut mat = 0i32;
    for pt in [
        PieceType::P,
        PieceType::N,
        PieceType::B,
        PieceType::R,
        PieceType::Q,
        PieceType::K,
    ] {
        let value = PIECE_VALUE[kind_code(pt)] as i32;
        mat += board.count_piece(Player::White, pt) as i32 * value;
        mat -= board.count_piece(Player::Black, pt) as i32 * value;
    }
    mat
}

/// Static evaluation from the side-to-move's perspective.
///
/// Deterministic and pure; reads only the board. Positive means the side
/// to move is better.
#[must_use]
pub fn eval(board: &Board) -> i16 {
    let white_pawns = board.piece_bb(Player::White, PieceType::P).0;
    let black_pawns = board.piece_bb(Player::Black, PieceType::P).0;
    let all_pawns = white_pawns | black_pawns;

    // Accumulated (midgame, endgame) scores per color, white first.
    let mut mg = [0i32; 2];
    let mut eg = [0i32; 2];
    let mut phase = 0i32;

    for sq in 0..64usize {
        let piece = board.piece_at_sq(SQ(sq as u8));
        if piece == Piece::None {
            continue;
        }
        let kind = kind_code(piece.type_of());
        let white = piece.player() == Some(Player::White);
        let side = usize::from(!white);

        mg[side] += pst::mg(kind, sq, white) as i32;
        eg[side] += pst::eg(kind, sq, white) as i32;
        phase += PIECE_PHASE[kind] as i32;

        let file = sq % 8;
        let (own_pawns, enemy_pawns) = if white {
            (white_pawns, black_pawns)
        } else {
            (black_pawns, white_pawns)
        };

        match kind {
            PAWN => {
                let (mg_term, eg_term) =
                    pawn_terms(sq, file, white, side, own_pawns, enemy_pawns);
                mg[side] += mg_term;
                eg[side] += eg_term;
            }
            ROOK => {
                let (mg_term, eg_term) = file_occupancy_bonus(file, all_pawns);
                mg[side] += mg_term;
                eg[side] += eg_term;
            }
            KING => {
                // An open file in front of the king is a liability, so the
                // same bonus a rook would get is subtracted here.
                let (mg_term, eg_term) = file_occupancy_bonus(file, all_pawns);
                mg[side] -= mg_term;
                eg[side] -= eg_term;
            }
            _ => {}
        }
    }

    let mat = material(board);
    let mg_score = mg[0] - mg[1];
    let eg_score = eg[0] - eg[1];

    let mg_weight = phase.min(PHASE_TOTAL);
    let eg_weight = PHASE_TOTAL - mg_weight;
    let phase_score = (mg_score * mg_weight + eg_score * eg_weight) / PHASE_TOTAL;

    let side_sign = if board.turn() == Player::White { 1 } else { -1 };
    (side_sign * (mat + phase_score)) as i16
}

/// Doubled, passed, and isolated pawn terms for one pawn.
fn pawn_terms(
    sq: usize,
    file: usize,
    white: bool,
    side: usize,
    own_pawns: u64,
    enemy_pawns: u64,
) -> (i32, i32) {
    let mut mg = 0i32;
    let mut eg = 0i32;

    if (own_pawns & masks::FILES[file]).count_ones() > 1 {
        mg -= DOUBLED_PAWN.0;
        eg -= DOUBLED_PAWN.1;
    }

    if enemy_pawns & masks::PASSED[side][sq] == 0 {
        let rank = sq / 8;
        let relative_rank = if white { rank } else { 7 - rank };
        let bonus = PASSED_BY_RANK[relative_rank];
        mg += bonus;
        eg += bonus;
    }

    if own_pawns & masks::ADJACENT_FILES[file] == 0 {
        mg -= ISOLATED_PAWN.0;
        eg -= ISOLATED_PAWN.1;
    }

    (mg, eg)
}

/// Open/semi-open file bonus keyed on the total pawn count of the file.
fn file_occupancy_bonus(file: usize, all_pawns: u64) -> (i32, i32) {
    match (all_pawns & masks::FILES[file]).count_ones() {
        0 => ROOK_OPEN_FILE,
        1 => ROOK_SEMI_OPEN_FILE,
        _ => (0, 0),
    }
}

/// True once most non-pawn material has left the board; the search digs
/// deeper in such positions.
#[must_use]
pub fn is_late_endgame(board: &Board) -> bool {
    (game_phase(board) as i32) < 12
}
