use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Pawn push direction in square-index terms (+8 for White, -8 for Black).
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }

    /// Spanish turn label as used on the wire ("blancas" / "negras").
    pub fn spanish(self) -> &'static str {
        match self {
            Color::White => "blancas",
            Color::Black => "negras",
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType & Piece
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// The four legal promotion targets.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Index for array lookups: Pawn=0 .. King=5.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Material value in centipawns.
    pub fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 320,
            PieceType::Bishop => 330,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 0, // not used numerically
        }
    }

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a FEN piece character; uppercase is white.
    pub fn from_char(c: char) -> Option<(Color, PieceType)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some((color, piece))
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

/// A colored piece, as stored in a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }

    /// Unicode glyph used by the board-state endpoint.
    pub fn glyph(self) -> &'static str {
        match (self.color, self.kind) {
            (Color::White, PieceType::King) => "\u{2654}",
            (Color::White, PieceType::Queen) => "\u{2655}",
            (Color::White, PieceType::Rook) => "\u{2656}",
            (Color::White, PieceType::Bishop) => "\u{2657}",
            (Color::White, PieceType::Knight) => "\u{2658}",
            (Color::White, PieceType::Pawn) => "\u{2659}",
            (Color::Black, PieceType::King) => "\u{265A}",
            (Color::Black, PieceType::Queen) => "\u{265B}",
            (Color::Black, PieceType::Rook) => "\u{265C}",
            (Color::Black, PieceType::Bishop) => "\u{265D}",
            (Color::Black, PieceType::Knight) => "\u{265E}",
            (Color::Black, PieceType::Pawn) => "\u{265F}",
        }
    }

    /// FEN character for this piece.
    pub fn to_char(self) -> char {
        self.kind.to_char(self.color)
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A square on the chess board (0..63, LERF: a1=0, h8=63).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square(pub u8);

impl Square {
    pub const NUM: usize = 64;

    #[inline]
    pub fn new(index: u8) -> Self {
        debug_assert!(index < 64, "Square index out of range: {index}");
        Square(index)
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.0 >> 3
    }

    #[inline]
    pub fn from_file_rank(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    /// Offset by a signed square-index delta, returning None off-board.
    /// Only safe for vertical steps; use file checks for diagonal walks.
    #[inline]
    pub fn offset(self, delta: i8) -> Option<Self> {
        let idx = self.0 as i16 + delta as i16;
        if (0..64).contains(&idx) {
            Some(Square(idx as u8))
        } else {
            None
        }
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Square::from_file_rank(file, rank))
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        format!("{file}{rank}")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// ---------------------------------------------------------------------------
// MoveFlags
// ---------------------------------------------------------------------------

/// Flags for special move types packed in a single byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveFlags(pub u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(1);
    pub const EN_PASSANT: MoveFlags = MoveFlags(2);
    pub const CASTLING: MoveFlags = MoveFlags(4);
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(8);

    #[inline]
    pub fn is_capture(self) -> bool {
        self.0 & Self::CAPTURE.0 != 0
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.0 & Self::EN_PASSANT.0 != 0
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        self.0 & Self::CASTLING.0 != 0
    }

    #[inline]
    pub fn is_double_push(self) -> bool {
        self.0 & Self::DOUBLE_PUSH.0 != 0
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        MoveFlags(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A chess move: from-square, to-square, optional promotion, and flags.
/// Kept at ≤ 8 bytes so it can be passed by value efficiently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
    pub flags: MoveFlags,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags: MoveFlags::NONE,
        }
    }

    pub fn with_flags(from: Square, to: Square, flags: MoveFlags) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags,
        }
    }

    pub fn with_promotion(
        from: Square,
        to: Square,
        promotion: PieceType,
        flags: MoveFlags,
    ) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
            flags,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "={}", promo.to_char(Color::White).to_ascii_lowercase())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Castling availability bitfield: bits 0-3 = WK, WQ, BK, BQ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    #[inline]
    pub fn can_castle_kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.has(Self::WHITE_KINGSIDE),
            Color::Black => self.has(Self::BLACK_KINGSIDE),
        }
    }

    #[inline]
    pub fn can_castle_queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.has(Self::WHITE_QUEENSIDE),
            Color::Black => self.has(Self::BLACK_QUEENSIDE),
        }
    }

    /// Parse FEN castling string (e.g. "KQkq", "-", "Kq").
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = 0u8;
        for c in s.chars() {
            match c {
                'K' => rights |= Self::WHITE_KINGSIDE,
                'Q' => rights |= Self::WHITE_QUEENSIDE,
                'k' => rights |= Self::BLACK_KINGSIDE,
                'q' => rights |= Self::BLACK_QUEENSIDE,
                _ => return None,
            }
        }
        Some(CastlingRights(rights))
    }

    /// Convert to FEN castling string.
    pub fn to_fen(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.has(Self::WHITE_KINGSIDE) {
            s.push('K');
        }
        if self.has(Self::WHITE_QUEENSIDE) {
            s.push('Q');
        }
        if self.has(Self::BLACK_KINGSIDE) {
            s.push('k');
        }
        if self.has(Self::BLACK_QUEENSIDE) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Current status of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw(reason) => reason.as_str(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw(_)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason for a draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl DrawReason {
    pub fn as_str(&self) -> &str {
        match self {
            DrawReason::FiftyMoveRule => "fifty_move_rule",
            DrawReason::ThreefoldRepetition => "threefold_repetition",
        }
    }
}

// ---------------------------------------------------------------------------
// GameMode & Difficulty
// ---------------------------------------------------------------------------

/// Who plays Black: another human at the same board, or the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    Friend,
    Bot,
}

impl GameMode {
    /// Parse the wire value ("amigo" / "bot").
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "amigo" => Some(GameMode::Friend),
            "bot" => Some(GameMode::Bot),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            GameMode::Friend => "amigo",
            GameMode::Bot => "bot",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// Bot difficulty tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
}

impl Difficulty {
    /// Parse the wire value ("principiante" / "intermedio").
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "principiante" => Some(Difficulty::Beginner),
            "intermedio" => Some(Difficulty::Intermediate),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Difficulty::Beginner => "principiante",
            Difficulty::Intermediate => "intermedio",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// Domain errors for the chess engine and session layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("square out of bounds: row {row}, column {col}")]
    OutOfBounds { row: i32, col: i32 },

    #[error("no piece on {0}")]
    NoPieceAtSource(Square),

    #[error("the {piece} on {from} belongs to {owner}, and it is {turn}'s turn")]
    WrongColor {
        piece: PieceType,
        from: Square,
        owner: Color,
        turn: Color,
    },

    #[error("it is not {0}'s turn")]
    NotYourTurn(Color),

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("no legal moves available for move selection")]
    NoLegalMoves,

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("no moves to undo")]
    NothingToUndo,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
