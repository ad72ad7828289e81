//! Static position evaluation: material balance plus mobility.
//!
//! Returns a score in centipawns from White's perspective.
//! Positive = White advantage, negative = Black advantage.

use crate::engine::attacks;
use crate::engine::board::Position;
use crate::engine::types::{Color, PieceType};

/// Infinity sentinel. Larger than any realistic eval.
pub const INF: i32 = 100_000;

/// Checkmate score base. Actual mate scores are `MATE - ply` so closer mates
/// score higher.
pub const MATE: i32 = 90_000;

/// Centipawns awarded per available move.
const MOBILITY_WEIGHT: i32 = 2;

/// Is this score a forced-mate score?
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE - 500
}

/// Evaluate a position. Returns centipawn score from White's perspective.
pub fn evaluate(pos: &Position) -> i32 {
    let mut material = 0i32;
    for (_, piece) in pos.pieces() {
        match piece.color {
            Color::White => material += piece.kind.value(),
            Color::Black => material -= piece.kind.value(),
        }
    }

    let mobility = mobility(pos, Color::White) - mobility(pos, Color::Black);

    material + MOBILITY_WEIGHT * mobility
}

/// Evaluate from the side-to-move's perspective (for negamax).
#[inline]
pub fn evaluate_relative(pos: &Position) -> i32 {
    let score = evaluate(pos);
    match pos.side_to_move {
        Color::White => score,
        Color::Black => -score,
    }
}

/// Count the squares `color`'s pieces can move to, ignoring pins and
/// castling. Cheap proxy for piece activity; it does not need to agree with
/// the strict legal-move count.
fn mobility(pos: &Position, color: Color) -> i32 {
    let t = attacks::tables();
    let mut count = 0i32;

    for (from, piece) in pos.pieces() {
        if piece.color != color {
            continue;
        }
        match piece.kind {
            PieceType::Pawn => {
                if let Some(to) = from.offset(color.forward()) {
                    if pos.piece_at(to).is_none() {
                        count += 1;
                    }
                }
                for &to in t.pawn_targets(color, from) {
                    if pos.piece_at(to).is_some_and(|p| p.color != color) {
                        count += 1;
                    }
                }
            }
            PieceType::Knight => {
                count += free_or_enemy(pos, color, t.knight_targets(from));
            }
            PieceType::King => {
                count += free_or_enemy(pos, color, t.king_targets(from));
            }
            PieceType::Bishop => count += slider_mobility(pos, color, from, &attacks::BISHOP_DIRS),
            PieceType::Rook => count += slider_mobility(pos, color, from, &attacks::ROOK_DIRS),
            PieceType::Queen => count += slider_mobility(pos, color, from, &attacks::QUEEN_DIRS),
        }
    }

    count
}

fn free_or_enemy(pos: &Position, color: Color, targets: &[crate::engine::types::Square]) -> i32 {
    targets
        .iter()
        .filter(|&&to| match pos.piece_at(to) {
            None => true,
            Some(p) => p.color != color,
        })
        .count() as i32
}

fn slider_mobility(
    pos: &Position,
    color: Color,
    from: crate::engine::types::Square,
    dirs: &[(i8, i8)],
) -> i32 {
    let mut count = 0i32;
    for &dir in dirs {
        for to in attacks::ray(from, dir) {
            match pos.piece_at(to) {
                None => count += 1,
                Some(p) => {
                    if p.color != color {
                        count += 1;
                    }
                    break;
                }
            }
        }
    }
    count
}

// =========================================================================
// Tests
// =========================================================================
