//! Mailbox chess position representation.
//!
//! `Position` stores piece placement as a 64-cell array of optional pieces,
//! plus side to move, castling rights, en-passant square, move counters, and
//! an incremental Zobrist hash. King squares are cached so check detection
//! never scans the board.

use crate::engine::attacks;
use crate::engine::types::{
    CastlingRights, Color, EngineError, Move, Piece, PieceType, Square,
};
use crate::engine::zobrist;

// ---------------------------------------------------------------------------
// UndoInfo — saved state for reversing a move
// ---------------------------------------------------------------------------

/// State that must be saved before making a move so it can be restored on undo.
#[derive(Clone, Debug)]
pub struct UndoInfo {
    pub captured: Option<Piece>,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub zobrist_hash: u64,
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete chess position.
///
/// Square indexing follows LERF (Little-Endian Rank-File) mapping:
/// a1 = 0, b1 = 1, … h1 = 7, a2 = 8, … h8 = 63.
#[derive(Clone, Debug)]
pub struct Position {
    /// One cell per square; `None` is an empty square.
    board: [Option<Piece>; 64],

    /// Cached king squares, kept in sync by `put_piece` / `remove_piece`.
    kings: [Option<Square>; 2],

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Castling availability (K/Q/k/q).
    pub castling_rights: CastlingRights,

    /// En-passant target square (the square *behind* the double-pushed pawn).
    pub en_passant: Option<Square>,

    /// Half-move clock for the 50-move rule (reset on pawn move or capture).
    pub halfmove_clock: u16,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u16,

    /// Incremental Zobrist hash of the position.
    pub zobrist_hash: u64,
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

impl Position {
    /// Create an empty board with no pieces.
    pub fn empty() -> Self {
        Position {
            board: [None; 64],
            kings: [None; 2],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_hash: 0,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        Self::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("starting FEN is always valid")
    }

    // -----------------------------------------------------------------------
    // Piece manipulation (low-level)
    // -----------------------------------------------------------------------

    /// Place a piece on a square. Does NOT update the Zobrist hash.
    #[inline]
    pub fn put_piece(&mut self, sq: Square, piece: Piece) {
        self.board[sq.0 as usize] = Some(piece);
        if piece.kind == PieceType::King {
            self.kings[piece.color.index()] = Some(sq);
        }
    }

    /// Remove a piece from a square. Does NOT update the Zobrist hash.
    #[inline]
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.board[sq.0 as usize].take();
        if let Some(p) = piece {
            if p.kind == PieceType::King {
                self.kings[p.color.index()] = None;
            }
        }
        piece
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.0 as usize]
    }

    /// Find the king square for the given colour.
    #[inline]
    pub fn king_sq(&self, color: Color) -> Square {
        self.kings[color.index()].expect("king must exist")
    }

    /// Iterate over all occupied squares with their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|p| (Square(i as u8), p)))
    }

    // -----------------------------------------------------------------------
    // Zobrist hash computation (full recompute)
    // -----------------------------------------------------------------------

    /// Compute the Zobrist hash from scratch (used on FEN load and in tests
    /// to verify the incremental hash).
    pub fn compute_zobrist(&self) -> u64 {
        let zk = zobrist::keys();
        let mut hash = 0u64;

        for (sq, piece) in self.pieces() {
            hash ^= zk.piece_key(piece, sq);
        }

        if self.side_to_move == Color::Black {
            hash ^= zk.side_to_move;
        }

        hash ^= zk.castling_key(self.castling_rights.0);

        if let Some(ep_sq) = self.en_passant {
            hash ^= zk.ep_key(ep_sq.file());
        }

        hash
    }

    // -----------------------------------------------------------------------
    // Attack detection
    // -----------------------------------------------------------------------

    /// Is `sq` attacked by any piece of colour `by`?
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let t = attacks::tables();

        // Pawns: a pawn of `by` on p attacks sq iff p is a pawn-target of sq
        // from the opposite colour's perspective.
        for &p in t.pawn_targets(!by, sq) {
            if self.piece_at(p) == Some(Piece::new(by, PieceType::Pawn)) {
                return true;
            }
        }

        for &p in t.knight_targets(sq) {
            if self.piece_at(p) == Some(Piece::new(by, PieceType::Knight)) {
                return true;
            }
        }

        for &p in t.king_targets(sq) {
            if self.piece_at(p) == Some(Piece::new(by, PieceType::King)) {
                return true;
            }
        }

        // Sliders: walk each ray to the first occupied square.
        for &dir in &attacks::ROOK_DIRS {
            if let Some(piece) = self.first_piece_on_ray(sq, dir) {
                if piece.color == by
                    && matches!(piece.kind, PieceType::Rook | PieceType::Queen)
                {
                    return true;
                }
            }
        }
        for &dir in &attacks::BISHOP_DIRS {
            if let Some(piece) = self.first_piece_on_ray(sq, dir) {
                if piece.color == by
                    && matches!(piece.kind, PieceType::Bishop | PieceType::Queen)
                {
                    return true;
                }
            }
        }

        false
    }

    /// First piece encountered walking from `sq` in direction `dir`.
    #[inline]
    fn first_piece_on_ray(&self, sq: Square, dir: (i8, i8)) -> Option<Piece> {
        for step in attacks::ray(sq, dir) {
            if let Some(piece) = self.piece_at(step) {
                return Some(piece);
            }
        }
        None
    }

    /// Is the side-to-move's king currently in check?
    #[inline]
    pub fn is_in_check(&self) -> bool {
        let king = self.king_sq(self.side_to_move);
        self.is_square_attacked(king, !self.side_to_move)
    }

    // -----------------------------------------------------------------------
    // Make / Undo move
    // -----------------------------------------------------------------------

    /// Apply a move to the position. Returns `UndoInfo` for reversal.
    ///
    /// The caller is responsible for ensuring the move is legal (i.e. the
    /// king is not left in check); the legality filter in movegen relies on
    /// this being a pure mechanical application.
    pub fn make_move(&mut self, mv: Move) -> UndoInfo {
        let zk = zobrist::keys();
        let us = self.side_to_move;
        let them = !us;

        let undo = UndoInfo {
            captured: None, // updated below if capture
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            zobrist_hash: self.zobrist_hash,
        };

        let moving = self.board[mv.from.0 as usize].expect("no piece on from-square");

        // ---- Remove en-passant hash (if any) ----
        if let Some(ep) = self.en_passant {
            self.zobrist_hash ^= zk.ep_key(ep.file());
        }
        self.en_passant = None;

        // ---- Remove old castling hash ----
        self.zobrist_hash ^= zk.castling_key(self.castling_rights.0);

        // ---- Handle capture ----
        let mut captured = None;
        if mv.flags.is_en_passant() {
            // The captured pawn is behind the target square.
            let cap_sq = match us {
                Color::White => Square(mv.to.0 - 8),
                Color::Black => Square(mv.to.0 + 8),
            };
            let pawn = Piece::new(them, PieceType::Pawn);
            self.remove_piece(cap_sq);
            self.zobrist_hash ^= zk.piece_key(pawn, cap_sq);
            captured = Some(pawn);
        } else if mv.flags.is_capture() {
            let cap = self.remove_piece(mv.to).expect("capture target missing");
            self.zobrist_hash ^= zk.piece_key(cap, mv.to);
            captured = Some(cap);
        }

        // ---- Move the piece ----
        self.remove_piece(mv.from);
        self.zobrist_hash ^= zk.piece_key(moving, mv.from);

        let landing = match mv.promotion {
            Some(kind) => Piece::new(us, kind),
            None => moving,
        };
        self.put_piece(mv.to, landing);
        self.zobrist_hash ^= zk.piece_key(landing, mv.to);

        // ---- Castling: move the rook ----
        if mv.flags.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(mv.to);
            let rook = Piece::new(us, PieceType::Rook);
            self.remove_piece(rook_from);
            self.zobrist_hash ^= zk.piece_key(rook, rook_from);
            self.put_piece(rook_to, rook);
            self.zobrist_hash ^= zk.piece_key(rook, rook_to);
        }

        // ---- Update castling rights ----
        // Moving king or rook, or capturing on a rook's home square.
        self.castling_rights.0 &= CASTLING_MASK[mv.from.0 as usize];
        self.castling_rights.0 &= CASTLING_MASK[mv.to.0 as usize];

        self.zobrist_hash ^= zk.castling_key(self.castling_rights.0);

        // ---- Double pawn push → set en passant ----
        if mv.flags.is_double_push() {
            let ep_sq = match us {
                Color::White => Square(mv.from.0 + 8),
                Color::Black => Square(mv.from.0 - 8),
            };
            self.en_passant = Some(ep_sq);
            self.zobrist_hash ^= zk.ep_key(ep_sq.file());
        }

        // ---- Halfmove clock ----
        if moving.kind == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // ---- Fullmove number ----
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        // ---- Switch side ----
        self.side_to_move = them;
        self.zobrist_hash ^= zk.side_to_move;

        UndoInfo {
            captured,
            ..undo
        }
    }

    /// Reverse a move previously applied with `make_move`.
    pub fn undo_move(&mut self, mv: Move, undo: &UndoInfo) {
        let them = self.side_to_move; // after make_move, side was switched
        let us = !them;

        self.side_to_move = us;

        // ---- Remove the piece from to-square, put back on from-square ----
        let landed = self.remove_piece(mv.to).expect("no piece on to-square");
        let original = if mv.promotion.is_some() {
            Piece::new(us, PieceType::Pawn)
        } else {
            landed
        };
        self.put_piece(mv.from, original);

        // ---- Restore capture ----
        if mv.flags.is_en_passant() {
            let cap_sq = match us {
                Color::White => Square(mv.to.0 - 8),
                Color::Black => Square(mv.to.0 + 8),
            };
            self.put_piece(cap_sq, Piece::new(them, PieceType::Pawn));
        } else if let Some(cap) = undo.captured {
            self.put_piece(mv.to, cap);
        }

        // ---- Undo castling: move the rook back ----
        if mv.flags.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(mv.to);
            self.remove_piece(rook_to);
            self.put_piece(rook_from, Piece::new(us, PieceType::Rook));
        }

        // ---- Restore saved state ----
        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.zobrist_hash = undo.zobrist_hash;

        if us == Color::Black {
            self.fullmove_number -= 1;
        }
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8).rev() {
            s.push((b'1' + rank) as char);
            s.push(' ');
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                let ch = match self.piece_at(sq) {
                    Some(piece) => piece.to_char(),
                    None => '.',
                };
                s.push(ch);
                if file < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

// ---------------------------------------------------------------------------
// Castling helpers (free functions)
// ---------------------------------------------------------------------------

/// For a king-destination square (after castling), return (rook_from, rook_to).
fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to.0 {
        // White kingside: king e1→g1, rook h1→f1.
        6 => (Square(7), Square(5)),
        // White queenside: king e1→c1, rook a1→d1.
        2 => (Square(0), Square(3)),
        // Black kingside: king e8→g8, rook h8→f8.
        62 => (Square(63), Square(61)),
        // Black queenside: king e8→c8, rook a8→d8.
        58 => (Square(56), Square(59)),
        _ => panic!("invalid castling king destination: {king_to}"),
    }
}

/// Mask table indexed by square index. When a move touches a square, AND the
/// castling rights with this mask. E.g. if a rook on a1 moves (or is captured),
/// remove White-queenside. The king's home square removes both that side's rights.
#[rustfmt::skip]
const CASTLING_MASK: [u8; 64] = {
    let mut mask = [0b1111u8; 64];
    // a1 (0): remove white-queenside
    mask[0]  = 0b1111 & !CastlingRights::WHITE_QUEENSIDE;
    // e1 (4): remove both white rights
    mask[4]  = 0b1111 & !(CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE);
    // h1 (7): remove white-kingside
    mask[7]  = 0b1111 & !CastlingRights::WHITE_KINGSIDE;
    // a8 (56): remove black-queenside
    mask[56] = 0b1111 & !CastlingRights::BLACK_QUEENSIDE;
    // e8 (60): remove both black rights
    mask[60] = 0b1111 & !(CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE);
    // h8 (63): remove black-kingside
    mask[63] = 0b1111 & !CastlingRights::BLACK_KINGSIDE;
    mask
};

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Position {
    /// Parse a FEN string into a `Position`.
    ///
    /// Validates all 6 fields (piece placement, side to move, castling,
    /// en passant, halfmove clock, fullmove number) and ensures exactly one
    /// king per side.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(EngineError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut pos = Position::empty();

        // ----- Field 1: Piece placement -----
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(EngineError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut king_count = [0u8; 2];
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8; // FEN starts from rank 8
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if file > 7 {
                    return Err(EngineError::InvalidFen(format!(
                        "too many squares in rank {}",
                        rank + 1
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(EngineError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            rank + 1
                        )));
                    }
                    file += digit as u8;
                } else if let Some((color, kind)) = PieceType::from_char(ch) {
                    let sq = Square::from_file_rank(file, rank);
                    pos.put_piece(sq, Piece::new(color, kind));
                    if kind == PieceType::King {
                        king_count[color.index()] += 1;
                    }
                    file += 1;
                } else {
                    return Err(EngineError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if file != 8 {
                return Err(EngineError::InvalidFen(format!(
                    "rank {} has {} squares instead of 8",
                    rank + 1,
                    file
                )));
            }
        }

        for color in [Color::White, Color::Black] {
            let count = king_count[color.index()];
            if count != 1 {
                return Err(EngineError::InvalidFen(format!(
                    "{color} has {count} kings (expected 1)"
                )));
            }
        }

        // ----- Field 2: Side to move -----
        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(EngineError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // ----- Field 3: Castling availability -----
        pos.castling_rights = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            EngineError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        // ----- Field 4: En passant target square -----
        if fields[3] != "-" {
            let ep_sq = Square::from_algebraic(fields[3]).ok_or_else(|| {
                EngineError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            // En passant target must be on rank 3 (for Black) or rank 6 (for White).
            let rank = ep_sq.rank();
            if rank != 2 && rank != 5 {
                return Err(EngineError::InvalidFen(format!(
                    "en passant square {} is not on rank 3 or 6",
                    fields[3]
                )));
            }
            pos.en_passant = Some(ep_sq);
        }

        // ----- Field 5: Halfmove clock -----
        pos.halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            EngineError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;

        // ----- Field 6: Fullmove number -----
        pos.fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            EngineError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if pos.fullmove_number == 0 {
            return Err(EngineError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        pos.zobrist_hash = pos.compute_zobrist();

        Ok(pos)
    }

    /// Export the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        // ----- Field 1: Piece placement -----
        for rank in (0..8).rev() {
            let mut empty_count = 0u8;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        // ----- Field 2: Side to move -----
        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        // ----- Field 3: Castling -----
        fen.push(' ');
        fen.push_str(&self.castling_rights.to_fen());

        // ----- Field 4: En passant -----
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        // ----- Field 5: Halfmove clock -----
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());

        // ----- Field 6: Fullmove number -----
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
