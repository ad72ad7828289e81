//! Bot move selection.
//!
//! Two tiers: `RandomBot` picks uniformly among the legal moves, and
//! `MinimaxBot` runs a fixed-depth negamax search with alpha-beta pruning
//! over the material-plus-mobility evaluation. Both draw randomness from a
//! caller-supplied RNG so games can be replayed from a seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::bot::eval::{self, INF, MATE};
use crate::engine::board::Position;
use crate::engine::game::Game;
use crate::engine::movegen;
use crate::engine::types::{Difficulty, EngineError, Move};

/// Search depth for the intermediate tier, in plies.
const MINIMAX_DEPTH: u8 = 2;

/// A strategy that picks the bot's next move.
pub trait BotSelector: Send + Sync {
    /// Pick a move for the side to move. Fails with
    /// [`EngineError::NoLegalMoves`] when the game is already decided.
    fn select_move(&self, game: &Game, rng: &mut StdRng) -> Result<Move, EngineError>;

    /// Human-readable selector name, used in logs.
    fn name(&self) -> &'static str;
}

// =========================================================================
// RandomBot (beginner tier)
// =========================================================================

/// Uniformly random choice among the legal moves.
pub struct RandomBot;

impl BotSelector for RandomBot {
    fn select_move(&self, game: &Game, rng: &mut StdRng) -> Result<Move, EngineError> {
        let moves = game.legal_moves();
        moves
            .choose(rng)
            .copied()
            .ok_or(EngineError::NoLegalMoves)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

// =========================================================================
// MinimaxBot (intermediate tier)
// =========================================================================

/// Fixed-depth negamax with alpha-beta pruning. Ties at the root are broken
/// uniformly at random so repeated games do not replay identically.
pub struct MinimaxBot {
    depth: u8,
}

impl MinimaxBot {
    pub fn new() -> Self {
        MinimaxBot {
            depth: MINIMAX_DEPTH,
        }
    }
}

impl Default for MinimaxBot {
    fn default() -> Self {
        Self::new()
    }
}

impl BotSelector for MinimaxBot {
    fn select_move(&self, game: &Game, rng: &mut StdRng) -> Result<Move, EngineError> {
        let mut moves = game.legal_moves();
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }
        order_moves(game.position(), &mut moves);

        // Score every root move with a full window so that all ties are
        // visible; pruning still applies inside the subtrees.
        let mut scratch = game.position().clone();
        let mut best_score = -INF;
        let mut best: Vec<Move> = Vec::new();

        for mv in moves {
            let undo = scratch.make_move(mv);
            let score = -negamax(&mut scratch, self.depth - 1, 1, -INF, INF);
            scratch.undo_move(mv, &undo);

            if score > best_score {
                best_score = score;
                best.clear();
                best.push(mv);
            } else if score == best_score {
                best.push(mv);
            }
        }

        if eval::is_mate_score(best_score) {
            debug!(score = best_score, "search found a forced mate line");
        }

        best.choose(rng)
            .copied()
            .ok_or(EngineError::NoLegalMoves)
    }

    fn name(&self) -> &'static str {
        "minimax"
    }
}

/// Negamax with alpha-beta. Returns the score from the perspective of the
/// side to move in `pos`.
fn negamax(pos: &mut Position, depth: u8, ply: u8, mut alpha: i32, beta: i32) -> i32 {
    let mut moves = movegen::legal_moves(pos);

    // Terminal nodes must be detected even at the leaf, otherwise a
    // mate-in-one looks like an ordinary quiet position.
    if moves.is_empty() {
        if pos.is_in_check() {
            return -(MATE - ply as i32);
        }
        return 0;
    }

    if depth == 0 {
        return eval::evaluate_relative(pos);
    }

    order_moves(pos, &mut moves);

    let mut best = -INF;
    for mv in moves {
        let undo = pos.make_move(mv);
        let score = -negamax(pos, depth - 1, ply + 1, -beta, -alpha);
        pos.undo_move(mv, &undo);

        if score > best {
            best = score;
        }
        if best > alpha {
            alpha = best;
        }
        if alpha >= beta {
            break;
        }
    }

    best
}

/// Sort captures first, most-valuable-victim / least-valuable-attacker.
fn order_moves(pos: &Position, moves: &mut [Move]) {
    moves.sort_by_key(|mv| {
        let victim = pos.piece_at(mv.to).map(|p| p.kind.value()).unwrap_or(0);
        let attacker = pos.piece_at(mv.from).map(|p| p.kind.value()).unwrap_or(0);
        // Negated so higher-priority moves sort first.
        -(victim * 10 - attacker)
    });
}

/// Selector for a difficulty tier.
pub fn selector_for(difficulty: Difficulty) -> Box<dyn BotSelector> {
    match difficulty {
        Difficulty::Beginner => Box::new(RandomBot),
        Difficulty::Intermediate => Box::new(MinimaxBot::new()),
    }
}

// =========================================================================
// Tests
// =========================================================================
