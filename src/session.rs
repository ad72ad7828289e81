//! Game session: one live game plus its mode/difficulty configuration.
//!
//! The session owns the [`Game`], the bot configuration, and the RNG the bot
//! draws from. The HTTP layer holds exactly one session behind a lock; all
//! the board-coordinate translation and bot-reply orchestration lives here so
//! the handlers stay thin.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::bot::selector_for;
use crate::engine::game::Game;
use crate::engine::types::{Color, Difficulty, EngineError, GameMode, GameStatus, Move, Square};

/// The bot always takes the black pieces.
const BOT_COLOR: Color = Color::Black;

/// Result of a successfully applied human move, including the bot's reply
/// when one was played.
#[derive(Clone, Debug)]
pub struct MoveOutcome {
    /// Status after the human move (and bot reply, if any).
    pub status: GameStatus,
    /// The human move as resolved against the legal-move set.
    pub played: Move,
    /// The bot's reply, if the session is in bot mode and the game went on.
    pub bot_reply: Option<Move>,
}

/// Translate a wire board coordinate to a square.
///
/// The wire protocol numbers rows from the top of the board as rendered
/// (row 0 = rank 8) and columns from the left (column 0 = file a).
pub fn wire_square(row: i32, col: i32) -> Result<Square, EngineError> {
    if !(0..8).contains(&row) || !(0..8).contains(&col) {
        return Err(EngineError::OutOfBounds { row, col });
    }
    Ok(Square::from_file_rank(col as u8, 7 - row as u8))
}

/// One chess game in progress, with its configuration.
pub struct GameSession {
    game: Game,
    mode: GameMode,
    difficulty: Difficulty,
    rng: StdRng,
}

impl GameSession {
    /// Fresh session: starting position, friend mode, beginner difficulty.
    pub fn new() -> Self {
        Self::with_config(GameMode::Friend, Difficulty::Beginner)
    }

    pub fn with_config(mode: GameMode, difficulty: Difficulty) -> Self {
        GameSession {
            game: Game::new(),
            mode,
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    /// Like [`with_config`](Self::with_config) but with a deterministic RNG,
    /// so bot games replay identically. Used by tests.
    pub fn with_seed(mode: GameMode, difficulty: Difficulty, seed: u64) -> Self {
        GameSession {
            game: Game::new(),
            mode,
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Spanish label for the side to move.
    pub fn turn_label(&self) -> &'static str {
        self.game.side_to_move().spanish()
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Change mode and/or difficulty. A game in progress keeps its board; a
    /// finished game is reset so the new configuration starts clean.
    pub fn configure(&mut self, mode: GameMode, difficulty: Difficulty) {
        info!(mode = %mode, difficulty = %difficulty, "configuring session");
        self.mode = mode;
        self.difficulty = difficulty;
        if self.game.is_game_over() {
            self.game = Game::new();
        }
    }

    /// Reset the board to the starting position. Mode and difficulty are
    /// kept.
    pub fn restart(&mut self) {
        info!("restarting game");
        self.game = Game::new();
    }

    /// Apply a human move given in wire coordinates, then let the bot reply
    /// if the session is in bot mode and the game is still running.
    pub fn submit_move(
        &mut self,
        from: (i32, i32),
        to: (i32, i32),
    ) -> Result<MoveOutcome, EngineError> {
        let from_sq = wire_square(from.0, from.1)?;
        let to_sq = wire_square(to.0, to.1)?;

        if self.mode == GameMode::Bot && self.game.side_to_move() == BOT_COLOR {
            return Err(EngineError::NotYourTurn(BOT_COLOR));
        }

        let mv = self.game.find_move(from_sq, to_sq, None)?;
        let mut status = self.game.make_move(mv)?;
        debug!(%mv, status = %status, "human move applied");

        let mut bot_reply = None;
        if self.mode == GameMode::Bot
            && !status.is_game_over()
            && self.game.side_to_move() == BOT_COLOR
        {
            let reply = self.bot_move()?;
            status = self.game.status().clone();
            bot_reply = Some(reply);
        }

        Ok(MoveOutcome {
            status,
            played: mv,
            bot_reply,
        })
    }

    /// Pick and play the bot's move for the current position.
    fn bot_move(&mut self) -> Result<Move, EngineError> {
        let selector = selector_for(self.difficulty);
        let mv = selector.select_move(&self.game, &mut self.rng)?;
        let status = self.game.make_move(mv)?;
        debug!(%mv, selector = selector.name(), status = %status, "bot move applied");
        Ok(mv)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
