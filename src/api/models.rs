use serde::{Deserialize, Serialize};

use crate::engine::types::{DrawReason, GameStatus};
use crate::engine::Game;
use crate::session::GameSession;

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

/// A board cell in wire coordinates: row 0 is the top of the rendered board
/// (rank 8), column 0 is the a-file.
#[derive(Debug, Deserialize)]
pub struct Coordenada {
    pub fila: i32,
    pub columna: i32,
}

#[derive(Debug, Deserialize)]
pub struct MoverRequest {
    pub desde: Coordenada,
    pub hacia: Coordenada,
}

#[derive(Debug, Deserialize)]
pub struct ConfigurarQuery {
    pub modo: Option<String>,
    pub nivel: Option<String>,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime: u64,
}

/// Full board snapshot returned by the state endpoint.
#[derive(Debug, Serialize)]
pub struct EstadoResponse {
    /// 8x8 grid of piece glyphs, row 0 = rank 8. Empty squares are "".
    pub tablero: [[String; 8]; 8],
    pub turno: String,
    /// Half-moves played so far.
    pub movimientos: usize,
    pub terminado: bool,
    /// "" while the game is ongoing, "blancas"/"negras" after checkmate,
    /// "empate" after stalemate or a draw.
    pub ganador: String,
    pub modo: String,
    pub nivel: String,
}

#[derive(Debug, Serialize)]
pub struct MoverResponse {
    pub exito: bool,
    pub mensaje: String,
    pub turno: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigurarResponse {
    pub exito: bool,
    pub mensaje: String,
    pub modo: String,
    pub nivel: String,
}

#[derive(Debug, Serialize)]
pub struct SimpleResponse {
    pub exito: bool,
    pub mensaje: String,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Build the state snapshot for a session.
pub fn session_to_estado(session: &GameSession) -> EstadoResponse {
    let game = session.game();
    EstadoResponse {
        tablero: game.board_glyphs(),
        turno: session.turn_label().to_string(),
        movimientos: game.move_history().len(),
        terminado: game.is_game_over(),
        ganador: ganador_label(game),
        modo: session.mode().as_wire().to_string(),
        nivel: session.difficulty().as_wire().to_string(),
    }
}

/// Winner field value: "" while the game runs, the winning color's Spanish
/// name after checkmate, "empate" after any drawn finish.
fn ganador_label(game: &Game) -> String {
    if !game.is_game_over() {
        return String::new();
    }
    match game.winner() {
        Some(color) => color.spanish().to_string(),
        None => "empate".to_string(),
    }
}

/// Spanish result message for a status reached by a move.
pub fn status_message(status: &GameStatus) -> &'static str {
    match status {
        GameStatus::Active => "Movimiento realizado",
        GameStatus::Check => "¡Jaque!",
        GameStatus::Checkmate => "¡Jaque mate!",
        GameStatus::Stalemate => "Tablas por ahogado",
        GameStatus::Draw(DrawReason::FiftyMoveRule) => "Tablas por la regla de 50 movimientos",
        GameStatus::Draw(DrawReason::ThreefoldRepetition) => "Tablas por triple repetición",
    }
}
