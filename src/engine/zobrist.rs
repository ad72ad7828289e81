//! Zobrist hashing for position identity.
//!
//! Every hashable feature of a position (piece on square, side to move,
//! castling rights, en-passant file) gets a 64-bit random key; the position
//! hash is the XOR of the applicable keys. Make/undo updates the hash
//! incrementally, and the repetition rule counts equal hashes.

use crate::engine::types::{Piece, Square};

/// 16 possible castling-rights bitmasks (0..15).
const CASTLING_KEYS: usize = 16;
/// 8 en-passant files; only the file matters for repetition identity.
const EP_KEYS: usize = 8;

/// Pre-computed Zobrist random keys (generated once via `OnceLock`).
pub struct ZobristKeys {
    /// piece\[color\]\[piece_type\]\[square\].
    piece: [[[u64; 64]; 6]; 2],
    /// XOR this when it is Black's turn to move.
    pub side_to_move: u64,
    /// One key per possible castling bitmask (0..15).
    castling: [u64; CASTLING_KEYS],
    /// One key per possible en-passant file.
    en_passant: [u64; EP_KEYS],
}

static ZOBRIST: std::sync::OnceLock<ZobristKeys> = std::sync::OnceLock::new();

/// Get a reference to the global Zobrist keys.
pub fn keys() -> &'static ZobristKeys {
    ZOBRIST.get_or_init(ZobristKeys::init)
}

impl ZobristKeys {
    /// Generate all keys from a fixed-seed xorshift64 stream so that hashes
    /// are reproducible across runs.
    fn init() -> Self {
        let mut rng = Xorshift64::new(0x9E37_79B9_7F4A_7C15);

        let mut piece = [[[0u64; 64]; 6]; 2];
        for color in &mut piece {
            for pt in color {
                for sq in pt {
                    *sq = rng.next_u64();
                }
            }
        }

        let side_to_move = rng.next_u64();

        let mut castling = [0u64; CASTLING_KEYS];
        for key in &mut castling {
            *key = rng.next_u64();
        }

        let mut en_passant = [0u64; EP_KEYS];
        for key in &mut en_passant {
            *key = rng.next_u64();
        }

        ZobristKeys {
            piece,
            side_to_move,
            castling,
            en_passant,
        }
    }

    /// Key for a piece standing on a square.
    #[inline]
    pub fn piece_key(&self, piece: Piece, sq: Square) -> u64 {
        self.piece[piece.color.index()][piece.kind.index()][sq.0 as usize]
    }

    /// Key for an en-passant file (0-7).
    #[inline]
    pub fn ep_key(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }

    /// Key for a castling-rights bitmask.
    #[inline]
    pub fn castling_key(&self, rights: u8) -> u64 {
        self.castling[rights as usize]
    }
}

/// Minimal xorshift64 PRNG. Deterministic and never returns zero for a
/// nonzero seed.
struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    fn new(seed: u64) -> Self {
        Xorshift64 {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}
