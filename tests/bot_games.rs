//! Whole-game bot integration tests: let the selectors play both sides and
//! check the game-level invariants hold from the first move to the end.

use rand::rngs::StdRng;
use rand::SeedableRng;

use ajedrez_server::bot::{BotSelector, MinimaxBot, RandomBot};
use ajedrez_server::engine::game::Game;
use ajedrez_server::engine::types::GameStatus;

/// Play a full game with the given selector on both sides. Panics if the
/// selector ever proposes an illegal move. Returns the final status.
fn play_out(selector: &dyn BotSelector, seed: u64, max_half_moves: usize) -> GameStatus {
    let mut game = Game::new();
    let mut rng = StdRng::seed_from_u64(seed);

    for ply in 0..max_half_moves {
        if game.is_game_over() {
            break;
        }
        let mv = selector
            .select_move(&game, &mut rng)
            .unwrap_or_else(|e| panic!("selector failed at ply {ply}: {e}"));
        assert!(
            game.legal_moves().contains(&mv),
            "illegal move {mv} at ply {ply} (seed {seed})"
        );
        game.make_move(mv)
            .unwrap_or_else(|e| panic!("move {mv} rejected at ply {ply}: {e}"));
    }

    game.status().clone()
}

#[test]
fn random_selfplay_stays_legal() {
    for seed in 0..5 {
        let status = play_out(&RandomBot, seed, 400);
        // Either the game ended or we hit the move cap; both are fine, the
        // point is that nothing illegal happened along the way.
        if status.is_game_over() {
            assert!(matches!(
                status,
                GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw(_)
            ));
        }
    }
}

#[test]
fn minimax_selfplay_stays_legal() {
    for seed in 0..3 {
        let status = play_out(&MinimaxBot::new(), seed, 200);
        if status.is_game_over() {
            assert!(matches!(
                status,
                GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw(_)
            ));
        }
    }
}

#[test]
fn selfplay_history_replays_to_the_same_position() {
    let mut game = Game::new();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..60 {
        if game.is_game_over() {
            break;
        }
        let mv = RandomBot.select_move(&game, &mut rng).unwrap();
        game.make_move(mv).unwrap();
    }

    let mut replay = Game::new();
    for record in game.move_history() {
        replay.make_move(record.mv).unwrap();
    }
    assert_eq!(replay.to_fen(), game.to_fen());
}
