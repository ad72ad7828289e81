//! Legal move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves (ignoring pins / check evasion).
//!   2. Filter: make the move, verify king is not in check, undo.
//!
//! This "make-and-check" approach is simple and correct, and fast enough for
//! the fixed-depth search the bot runs.

use crate::engine::attacks;
use crate::engine::board::Position;
use crate::engine::types::{
    CastlingRights, Color, Move, MoveFlags, PieceType, Square,
};

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the side to move.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(64);
    generate_pseudo_legal(pos, &mut pseudo);

    // Filter: after each move the mover's own king must not be in check.
    let mut scratch = pos.clone();
    let mut legal = Vec::with_capacity(pseudo.len());
    for mv in pseudo {
        let undo = scratch.make_move(mv);
        let us = !scratch.side_to_move;
        if !scratch.is_square_attacked(scratch.king_sq(us), scratch.side_to_move) {
            legal.push(mv);
        }
        scratch.undo_move(mv, &undo);
    }
    legal
}

/// Generate all legal moves originating from a specific square.
pub fn legal_moves_from(pos: &Position, from: Square) -> Vec<Move> {
    legal_moves(pos)
        .into_iter()
        .filter(|m| m.from == from)
        .collect()
}

// =========================================================================
// Pseudo-legal generation (internal)
// =========================================================================

fn generate_pseudo_legal(pos: &Position, moves: &mut Vec<Move>) {
    let us = pos.side_to_move;
    for (from, piece) in pos.pieces() {
        if piece.color != us {
            continue;
        }
        match piece.kind {
            PieceType::Pawn => generate_pawn_moves(pos, us, from, moves),
            PieceType::Knight => generate_leaper_moves(
                pos,
                us,
                from,
                attacks::tables().knight_targets(from),
                moves,
            ),
            PieceType::King => generate_leaper_moves(
                pos,
                us,
                from,
                attacks::tables().king_targets(from),
                moves,
            ),
            PieceType::Bishop => generate_slider_moves(pos, us, from, &attacks::BISHOP_DIRS, moves),
            PieceType::Rook => generate_slider_moves(pos, us, from, &attacks::ROOK_DIRS, moves),
            PieceType::Queen => generate_slider_moves(pos, us, from, &attacks::QUEEN_DIRS, moves),
        }
    }
    generate_castling_moves(pos, us, moves);
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(pos: &Position, us: Color, from: Square, moves: &mut Vec<Move>) {
    let t = attacks::tables();
    let (start_rank, promo_rank): (u8, u8) = match us {
        Color::White => (1, 6), // rank 2 start, rank 7 promotes
        Color::Black => (6, 1), // rank 7 start, rank 2 promotes
    };
    let from_rank = from.rank();

    // --- Single push ---
    if let Some(to) = from.offset(us.forward()) {
        if pos.piece_at(to).is_none() {
            if from_rank == promo_rank {
                add_promotions(from, to, MoveFlags::NONE, moves);
            } else {
                moves.push(Move::new(from, to));
            }

            // --- Double push ---
            if from_rank == start_rank {
                if let Some(to2) = to.offset(us.forward()) {
                    if pos.piece_at(to2).is_none() {
                        moves.push(Move::with_flags(from, to2, MoveFlags::DOUBLE_PUSH));
                    }
                }
            }
        }
    }

    // --- Captures (including promotion captures) and en passant ---
    for &to in t.pawn_targets(us, from) {
        match pos.piece_at(to) {
            Some(target) if target.color != us => {
                if from_rank == promo_rank {
                    add_promotions(from, to, MoveFlags::CAPTURE, moves);
                } else {
                    moves.push(Move::with_flags(from, to, MoveFlags::CAPTURE));
                }
            }
            None if pos.en_passant == Some(to) => {
                moves.push(Move::with_flags(
                    from,
                    to,
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                ));
            }
            _ => {}
        }
    }
}

/// Add all four promotion variants for a pawn push or capture.
fn add_promotions(from: Square, to: Square, extra_flags: MoveFlags, moves: &mut Vec<Move>) {
    for &promo in &PieceType::PROMOTIONS {
        moves.push(Move::with_promotion(from, to, promo, extra_flags));
    }
}

// =========================================================================
// Knight & king moves (table-driven leapers)
// =========================================================================

fn generate_leaper_moves(
    pos: &Position,
    us: Color,
    from: Square,
    targets: &[Square],
    moves: &mut Vec<Move>,
) {
    for &to in targets {
        match pos.piece_at(to) {
            None => moves.push(Move::new(from, to)),
            Some(target) if target.color != us => {
                moves.push(Move::with_flags(from, to, MoveFlags::CAPTURE));
            }
            _ => {}
        }
    }
}

// =========================================================================
// Slider moves (bishop, rook, queen)
// =========================================================================

fn generate_slider_moves(
    pos: &Position,
    us: Color,
    from: Square,
    dirs: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &dir in dirs {
        for to in attacks::ray(from, dir) {
            match pos.piece_at(to) {
                None => moves.push(Move::new(from, to)),
                Some(target) => {
                    if target.color != us {
                        moves.push(Move::with_flags(from, to, MoveFlags::CAPTURE));
                    }
                    break; // ray blocked either way
                }
            }
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

fn generate_castling_moves(pos: &Position, us: Color, moves: &mut Vec<Move>) {
    let them = !us;

    // Can't castle while in check.
    let king_sq = pos.king_sq(us);
    if pos.is_square_attacked(king_sq, them) {
        return;
    }

    let (ks_right, qs_right, rank_base) = match us {
        Color::White => (
            CastlingRights::WHITE_KINGSIDE,
            CastlingRights::WHITE_QUEENSIDE,
            0u8,
        ),
        Color::Black => (
            CastlingRights::BLACK_KINGSIDE,
            CastlingRights::BLACK_QUEENSIDE,
            56u8,
        ),
    };

    // Kingside: king moves e→g, path through f and g must be clear and not attacked.
    if pos.castling_rights.has(ks_right) {
        let f_sq = Square(rank_base + 5);
        let g_sq = Square(rank_base + 6);
        if pos.piece_at(f_sq).is_none()
            && pos.piece_at(g_sq).is_none()
            && !pos.is_square_attacked(f_sq, them)
            && !pos.is_square_attacked(g_sq, them)
        {
            moves.push(Move::with_flags(king_sq, g_sq, MoveFlags::CASTLING));
        }
    }

    // Queenside: king moves e→c, path through b, c, d must be clear; c and d not attacked.
    if pos.castling_rights.has(qs_right) {
        let b_sq = Square(rank_base + 1);
        let c_sq = Square(rank_base + 2);
        let d_sq = Square(rank_base + 3);
        if pos.piece_at(b_sq).is_none()
            && pos.piece_at(c_sq).is_none()
            && pos.piece_at(d_sq).is_none()
            && !pos.is_square_attacked(c_sq, them)
            && !pos.is_square_attacked(d_sq, them)
        {
            moves.push(Move::with_flags(king_sq, c_sq, MoveFlags::CASTLING));
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
