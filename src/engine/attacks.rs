//! Pre-computed attack tables for move generation and attack queries.
//!
//! Leaper targets (knight, king, pawn captures) are tabulated once per process
//! (via `OnceLock`). Sliding pieces walk their rays on demand against the
//! board occupancy; at the depths this engine searches that is plenty fast.

use crate::engine::types::{Color, Square};
use std::sync::OnceLock;

// =========================================================================
// Public API
// =========================================================================

/// Get a reference to the global attack tables.
pub fn tables() -> &'static AttackTables {
    static TABLES: OnceLock<AttackTables> = OnceLock::new();
    TABLES.get_or_init(AttackTables::init)
}

/// Ray directions for rooks (N, S, W, E) as (rank_delta, file_delta).
pub const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
/// Ray directions for bishops (the four diagonals).
pub const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
/// Ray directions for queens (all eight).
pub const QUEEN_DIRS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Up to eight target squares for a leaper from one origin.
#[derive(Clone, Copy)]
pub struct TargetList {
    squares: [Square; 8],
    len: u8,
}

impl TargetList {
    const EMPTY: TargetList = TargetList {
        squares: [Square(0); 8],
        len: 0,
    };

    fn push(&mut self, sq: Square) {
        self.squares[self.len as usize] = sq;
        self.len += 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len as usize]
    }
}

/// Pre-computed leaper target tables.
pub struct AttackTables {
    knight: [TargetList; 64],
    king: [TargetList; 64],
    /// `pawn_attacks[color][square]` — squares a pawn on `square` attacks.
    pawn_attacks: [[TargetList; 64]; 2],
}

impl AttackTables {
    /// Knight target squares from `sq`.
    #[inline]
    pub fn knight_targets(&self, sq: Square) -> &[Square] {
        self.knight[sq.0 as usize].as_slice()
    }

    /// King target squares from `sq` (one step in each direction).
    #[inline]
    pub fn king_targets(&self, sq: Square) -> &[Square] {
        self.king[sq.0 as usize].as_slice()
    }

    /// Squares a pawn of `color` on `sq` attacks (captures only, not pushes).
    #[inline]
    pub fn pawn_targets(&self, color: Color, sq: Square) -> &[Square] {
        self.pawn_attacks[color.index()][sq.0 as usize].as_slice()
    }
}

// =========================================================================
// Ray walking
// =========================================================================

/// Iterator over the squares along one ray from an origin, edge-bounded.
/// The caller decides where to stop based on occupancy.
pub struct Ray {
    rank: i8,
    file: i8,
    dr: i8,
    df: i8,
}

/// Walk from `sq` in direction `(dr, df)`, excluding the origin itself.
#[inline]
pub fn ray(sq: Square, (dr, df): (i8, i8)) -> Ray {
    Ray {
        rank: sq.rank() as i8,
        file: sq.file() as i8,
        dr,
        df,
    }
}

impl Iterator for Ray {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.rank += self.dr;
        self.file += self.df;
        if (0..8).contains(&self.rank) && (0..8).contains(&self.file) {
            Some(Square::from_file_rank(self.file as u8, self.rank as u8))
        } else {
            None
        }
    }
}

// =========================================================================
// Initialisation
// =========================================================================

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn init_leaper(offsets: &[(i8, i8)]) -> [TargetList; 64] {
    let mut table = [TargetList::EMPTY; 64];
    for sq in 0..64u8 {
        let file = (sq & 7) as i8;
        let rank = (sq >> 3) as i8;
        for &(dr, df) in offsets {
            let r = rank + dr;
            let f = file + df;
            if (0..8).contains(&r) && (0..8).contains(&f) {
                table[sq as usize].push(Square::from_file_rank(f as u8, r as u8));
            }
        }
    }
    table
}

fn init_pawn_attacks() -> [[TargetList; 64]; 2] {
    let mut table = [[TargetList::EMPTY; 64]; 2];
    for sq in 0..64u8 {
        let file = (sq & 7) as i8;
        let rank = (sq >> 3) as i8;

        // White pawns attack NW and NE (rank + 1).
        if rank < 7 {
            for f in [file - 1, file + 1] {
                if (0..8).contains(&f) {
                    table[Color::White.index()][sq as usize]
                        .push(Square::from_file_rank(f as u8, (rank + 1) as u8));
                }
            }
        }

        // Black pawns attack SW and SE (rank - 1).
        if rank > 0 {
            for f in [file - 1, file + 1] {
                if (0..8).contains(&f) {
                    table[Color::Black.index()][sq as usize]
                        .push(Square::from_file_rank(f as u8, (rank - 1) as u8));
                }
            }
        }
    }
    table
}

impl AttackTables {
    fn init() -> Self {
        AttackTables {
            knight: init_leaper(&KNIGHT_OFFSETS),
            king: init_leaper(&KING_OFFSETS),
            pawn_attacks: init_pawn_attacks(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn contains(targets: &[Square], name: &str) -> bool {
        targets.contains(&sq(name))
    }

    // -------------------------------------------------------------------
    // Knight
    // -------------------------------------------------------------------

    #[test]
    fn knight_center_targets() {
        let t = tables();
        let targets = t.knight_targets(sq("e4"));
        // A knight on e4 reaches: d2, f2, c3, g3, c5, g5, d6, f6 = 8 squares.
        assert_eq!(targets.len(), 8);
        for name in ["d2", "f2", "c3", "g3", "c5", "g5", "d6", "f6"] {
            assert!(contains(targets, name), "knight on e4 should reach {name}");
        }
    }

    #[test]
    fn knight_corner_targets() {
        let t = tables();
        let targets = t.knight_targets(sq("a1"));
        assert_eq!(targets.len(), 2);
        assert!(contains(targets, "b3"));
        assert!(contains(targets, "c2"));
    }

    #[test]
    fn knight_edge_targets() {
        let t = tables();
        let targets = t.knight_targets(sq("a4"));
        assert_eq!(targets.len(), 4); // b2, c3, c5, b6
    }

    // -------------------------------------------------------------------
    // King
    // -------------------------------------------------------------------

    #[test]
    fn king_center_targets() {
        let t = tables();
        assert_eq!(t.king_targets(sq("e4")).len(), 8);
    }

    #[test]
    fn king_corner_targets() {
        let t = tables();
        let targets = t.king_targets(sq("a1"));
        assert_eq!(targets.len(), 3); // a2, b1, b2
    }

    // -------------------------------------------------------------------
    // Pawn attacks
    // -------------------------------------------------------------------

    #[test]
    fn white_pawn_targets() {
        let t = tables();
        let targets = t.pawn_targets(Color::White, sq("e4"));
        assert_eq!(targets.len(), 2);
        assert!(contains(targets, "d5"));
        assert!(contains(targets, "f5"));
    }

    #[test]
    fn black_pawn_targets() {
        let t = tables();
        let targets = t.pawn_targets(Color::Black, sq("e4"));
        assert_eq!(targets.len(), 2);
        assert!(contains(targets, "d3"));
        assert!(contains(targets, "f3"));
    }

    #[test]
    fn pawn_targets_a_file() {
        let t = tables();
        // White pawn on a2 attacks only b3.
        let targets = t.pawn_targets(Color::White, sq("a2"));
        assert_eq!(targets.len(), 1);
        assert!(contains(targets, "b3"));
    }

    #[test]
    fn pawn_targets_h_file() {
        let t = tables();
        let targets = t.pawn_targets(Color::White, sq("h2"));
        assert_eq!(targets.len(), 1);
        assert!(contains(targets, "g3"));
    }

    // -------------------------------------------------------------------
    // Rays
    // -------------------------------------------------------------------

    #[test]
    fn ray_north_from_e4() {
        let squares: Vec<Square> = ray(sq("e4"), (1, 0)).collect();
        assert_eq!(squares, vec![sq("e5"), sq("e6"), sq("e7"), sq("e8")]);
    }

    #[test]
    fn ray_diagonal_from_a1() {
        let squares: Vec<Square> = ray(sq("a1"), (1, 1)).collect();
        assert_eq!(squares.len(), 7);
        assert_eq!(squares[0], sq("b2"));
        assert_eq!(squares[6], sq("h8"));
    }

    #[test]
    fn ray_off_edge_is_empty() {
        assert_eq!(ray(sq("h4"), (0, 1)).count(), 0);
        assert_eq!(ray(sq("a1"), (-1, -1)).count(), 0);
    }

    #[test]
    fn rook_rays_cover_fourteen_squares() {
        let total: usize = ROOK_DIRS.iter().map(|&d| ray(sq("e4"), d).count()).sum();
        assert_eq!(total, 14);
    }

    #[test]
    fn bishop_rays_cover_thirteen_squares() {
        let total: usize = BISHOP_DIRS
            .iter()
            .map(|&d| ray(sq("e4"), d).count())
            .sum();
        assert_eq!(total, 13);
    }

    // -------------------------------------------------------------------
    // Sanity: all 64 squares have populated tables
    // -------------------------------------------------------------------

    #[test]
    fn all_leaper_tables_populated() {
        let t = tables();
        for sq in 0..64u8 {
            assert!(
                t.knight_targets(Square(sq)).len() >= 2,
                "knight table empty for sq {sq}"
            );
            assert!(
                t.king_targets(Square(sq)).len() >= 3,
                "king table empty for sq {sq}"
            );
        }
    }
}
