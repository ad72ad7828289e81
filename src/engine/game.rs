//! Stateful game controller wrapping Position.
//!
//! `Game` manages move history, undo stack, repetition tracking, and game
//! status detection (checkmate, stalemate, draws). It is the type the session
//! layer interacts with.

use crate::engine::board::{Position, UndoInfo};
use crate::engine::movegen;
use crate::engine::types::{
    Color, DrawReason, EngineError, GameStatus, Move, PieceType, Square,
};

// =========================================================================
// MoveRecord
// =========================================================================

/// A recorded move in the game history.
#[derive(Clone, Debug)]
pub struct MoveRecord {
    /// The move that was played.
    pub mv: Move,
    /// What game status resulted from this move.
    pub status_after: GameStatus,
}

// =========================================================================
// Game
// =========================================================================

/// A complete chess game with history, undo, and status tracking.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    move_history: Vec<MoveRecord>,
    undo_stack: Vec<UndoInfo>,
    /// Zobrist hashes of all positions reached (for threefold repetition).
    /// Includes the current position.
    position_hashes: Vec<u64>,
    status: GameStatus,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        let pos = Position::starting();
        let hash = pos.zobrist_hash;
        Self {
            position: pos,
            move_history: Vec::new(),
            undo_stack: Vec::new(),
            position_hashes: vec![hash],
            status: GameStatus::Active,
        }
    }

    /// Create a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let pos = Position::from_fen(fen)?;
        let hash = pos.zobrist_hash;
        let mut game = Self {
            position: pos,
            move_history: Vec::new(),
            undo_stack: Vec::new(),
            position_hashes: vec![hash],
            status: GameStatus::Active,
        };
        game.status = game.compute_status();
        Ok(game)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Current game status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Completed move history.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.position)
    }

    /// Legal moves from a specific square.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        movegen::legal_moves_from(&self.position, sq)
    }

    /// Whether the game is over.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// The winner, if the game ended in checkmate.
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            // The mated side is the one to move.
            GameStatus::Checkmate => Some(!self.position.side_to_move),
            _ => None,
        }
    }

    /// Current position as FEN.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Halfmove clock (for 50-move rule).
    pub fn halfmove_clock(&self) -> u16 {
        self.position.halfmove_clock
    }

    // -----------------------------------------------------------------
    // Move resolution & application
    // -----------------------------------------------------------------

    /// Resolve a from/to pair (plus optional promotion choice) against the
    /// legal-move set, reporting why it fails if it does.
    ///
    /// If the matched move is a promotion and no choice is given, queen is
    /// assumed.
    pub fn find_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<Move, EngineError> {
        let piece = self
            .position
            .piece_at(from)
            .ok_or(EngineError::NoPieceAtSource(from))?;
        let turn = self.position.side_to_move;
        if piece.color != turn {
            return Err(EngineError::WrongColor {
                piece: piece.kind,
                from,
                owner: piece.color,
                turn,
            });
        }

        let candidates: Vec<Move> = self
            .legal_moves()
            .into_iter()
            .filter(|m| m.from == from && m.to == to)
            .collect();

        if candidates.is_empty() {
            return Err(EngineError::IllegalMove { from, to });
        }

        // Non-promotion moves are unique per (from, to).
        if candidates[0].promotion.is_none() {
            return Ok(candidates[0]);
        }

        let wanted = promotion.unwrap_or(PieceType::Queen);
        candidates
            .into_iter()
            .find(|m| m.promotion == Some(wanted))
            .ok_or(EngineError::IllegalMove { from, to })
    }

    /// Play a move. The move must come from `legal_moves` / `find_move`.
    ///
    /// Returns `EngineError::GameOver` if the game is already finished, or
    /// `EngineError::IllegalMove` if the move is not legal; the game state is
    /// untouched in either case.
    pub fn make_move(&mut self, mv: Move) -> Result<GameStatus, EngineError> {
        if self.status.is_game_over() {
            return Err(EngineError::GameOver(self.status.to_string()));
        }

        if !self.legal_moves().contains(&mv) {
            return Err(EngineError::IllegalMove {
                from: mv.from,
                to: mv.to,
            });
        }

        let undo = self.position.make_move(mv);
        self.undo_stack.push(undo);
        self.position_hashes.push(self.position.zobrist_hash);

        let status = self.compute_status();
        self.status = status.clone();

        self.move_history.push(MoveRecord {
            mv,
            status_after: status.clone(),
        });

        Ok(status)
    }

    /// Validate and play a move given as coordinates.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<GameStatus, EngineError> {
        if self.status.is_game_over() {
            return Err(EngineError::GameOver(self.status.to_string()));
        }
        let mv = self.find_move(from, to, promotion)?;
        self.make_move(mv)
    }

    /// Undo the last move. Returns the move that was undone.
    pub fn undo_move(&mut self) -> Result<Move, EngineError> {
        let record = self.move_history.pop().ok_or(EngineError::NothingToUndo)?;
        let undo = self
            .undo_stack
            .pop()
            .ok_or(EngineError::NothingToUndo)?;
        self.position_hashes.pop();

        self.position.undo_move(record.mv, &undo);
        self.status = self.compute_status();

        Ok(record.mv)
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn compute_status(&self) -> GameStatus {
        let legal = movegen::legal_moves(&self.position);
        let in_check = self.position.is_in_check();

        if legal.is_empty() {
            if in_check {
                return GameStatus::Checkmate;
            } else {
                return GameStatus::Stalemate;
            }
        }

        // 100 halfmoves without pawn move or capture = 50 full moves.
        if self.position.halfmove_clock >= 100 {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }

        if self.is_threefold_repetition() {
            return GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }

        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }

    /// Threefold repetition: current position hash has appeared 3+ times.
    fn is_threefold_repetition(&self) -> bool {
        let current = self.position.zobrist_hash;
        self.position_hashes
            .iter()
            .filter(|&&h| h == current)
            .count()
            >= 3
    }

    // -----------------------------------------------------------------
    // Board glyphs (for API responses)
    // -----------------------------------------------------------------

    /// Generate the 8×8 board as unicode glyphs, row-major with rank 8 first
    /// (the orientation the web client renders). Empty squares are "".
    pub fn board_glyphs(&self) -> [[String; 8]; 8] {
        let mut board: [[String; 8]; 8] =
            std::array::from_fn(|_| std::array::from_fn(|_| String::new()));
        for row in 0..8u8 {
            for file in 0..8u8 {
                let sq = Square::from_file_rank(file, 7 - row);
                if let Some(piece) = self.position.piece_at(sq) {
                    board[row as usize][file as usize] = piece.glyph().to_string();
                }
            }
        }
        board
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
