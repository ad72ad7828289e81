use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::session::GameSession;

/// Shared application state passed to all handlers via Axum's State extractor.
///
/// The server hosts a single session; the lock serialises moves so the bot
/// reply is computed and applied atomically with the human move.
pub struct AppState {
    pub session: RwLock<GameSession>,
    pub config: AppConfig,
    pub start_time: std::time::Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> SharedState {
        let session = GameSession::with_config(config.default_mode, config.default_difficulty);
        Arc::new(AppState {
            session: RwLock::new(session),
            config,
            start_time: std::time::Instant::now(),
        })
    }
}
