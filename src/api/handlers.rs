use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use tracing::info;

use crate::engine::types::{Difficulty, EngineError, GameMode};

use super::models::*;
use super::state::SharedState;

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime,
    })
}

// =========================================================================
// Estado
// =========================================================================

/// GET /api/estado
pub async fn estado(State(state): State<SharedState>) -> Json<EstadoResponse> {
    let session = state.session.read().await;
    Json(session_to_estado(&session))
}

// =========================================================================
// Mover
// =========================================================================

/// POST /api/mover
///
/// Rejections are part of the protocol, not transport failures: an illegal
/// move — and even a malformed body — still answers 200 with `exito: false`
/// and a message the client can show as-is.
pub async fn mover(
    State(state): State<SharedState>,
    body: Result<Json<MoverRequest>, JsonRejection>,
) -> Json<MoverResponse> {
    let mut session = state.session.write().await;

    let input = match body {
        Ok(Json(input)) => input,
        Err(_) => {
            return Json(MoverResponse {
                exito: false,
                mensaje: "Cuerpo de la petición inválido".to_string(),
                turno: session.turn_label().to_string(),
            });
        }
    };

    let result = session.submit_move(
        (input.desde.fila, input.desde.columna),
        (input.hacia.fila, input.hacia.columna),
    );

    let response = match result {
        Ok(outcome) => MoverResponse {
            exito: true,
            mensaje: status_message(&outcome.status).to_string(),
            turno: session.turn_label().to_string(),
        },
        Err(err) => MoverResponse {
            exito: false,
            mensaje: rejection_message(&err),
            turno: session.turn_label().to_string(),
        },
    };

    Json(response)
}

// =========================================================================
// Configurar
// =========================================================================

/// GET /api/configurar?modo=amigo|bot&nivel=principiante|intermedio
///
/// Missing parameters keep their current value; unknown values are rejected
/// without touching the session.
pub async fn configurar(
    State(state): State<SharedState>,
    Query(query): Query<ConfigurarQuery>,
) -> Json<ConfigurarResponse> {
    let mut session = state.session.write().await;

    let mode = match query.modo.as_deref() {
        None => session.mode(),
        Some(s) => match GameMode::from_wire(s) {
            Some(m) => m,
            None => {
                return Json(ConfigurarResponse {
                    exito: false,
                    mensaje: format!("Modo desconocido: {s}"),
                    modo: session.mode().as_wire().to_string(),
                    nivel: session.difficulty().as_wire().to_string(),
                });
            }
        },
    };

    let difficulty = match query.nivel.as_deref() {
        None => session.difficulty(),
        Some(s) => match Difficulty::from_wire(s) {
            Some(d) => d,
            None => {
                return Json(ConfigurarResponse {
                    exito: false,
                    mensaje: format!("Nivel desconocido: {s}"),
                    modo: session.mode().as_wire().to_string(),
                    nivel: session.difficulty().as_wire().to_string(),
                });
            }
        },
    };

    session.configure(mode, difficulty);

    Json(ConfigurarResponse {
        exito: true,
        mensaje: "Configuración actualizada".to_string(),
        modo: mode.as_wire().to_string(),
        nivel: difficulty.as_wire().to_string(),
    })
}

// =========================================================================
// Reiniciar
// =========================================================================

/// POST /api/reiniciar
pub async fn reiniciar(State(state): State<SharedState>) -> Json<SimpleResponse> {
    let mut session = state.session.write().await;
    session.restart();
    info!("game restarted via API");
    Json(SimpleResponse {
        exito: true,
        mensaje: "Juego reiniciado".to_string(),
    })
}

// =========================================================================
// Helpers
// =========================================================================

/// Spanish client-facing message for a rejected move.
fn rejection_message(err: &EngineError) -> String {
    match err {
        EngineError::OutOfBounds { .. } => "Coordenadas fuera del tablero".to_string(),
        EngineError::NoPieceAtSource(_) => "No hay pieza en la casilla de origen".to_string(),
        EngineError::WrongColor { .. } | EngineError::NotYourTurn(_) => {
            "No es tu turno".to_string()
        }
        EngineError::GameOver(_) => "La partida ha terminado".to_string(),
        _ => "Movimiento inválido".to_string(),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router::create_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default())
    }

    async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn mover_body(desde: (i32, i32), hacia: (i32, i32)) -> Body {
        Body::from(
            serde_json::json!({
                "desde": {"fila": desde.0, "columna": desde.1},
                "hacia": {"fila": hacia.0, "columna": hacia.1},
            })
            .to_string(),
        )
    }

    async fn post_move(
        state: &SharedState,
        desde: (i32, i32),
        hacia: (i32, i32),
    ) -> serde_json::Value {
        let app = create_router(state.clone());
        let resp = app
            .oneshot(
                Request::post("/api/mover")
                    .header("content-type", "application/json")
                    .body(mover_body(desde, hacia))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    async fn get_estado(state: &SharedState) -> serde_json::Value {
        let app = create_router(state.clone());
        let resp = app
            .oneshot(Request::get("/api/estado").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    // --- Health ---

    #[tokio::test]
    async fn health_returns_200() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/nonexistent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_preflight() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/estado")
                    .header("Origin", "http://localhost:3000")
                    .header("Access-Control-Request-Method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("access-control-allow-origin").is_some());
    }

    // --- Estado ---

    #[tokio::test]
    async fn estado_initial_position() {
        let state = test_state();
        let json = get_estado(&state).await;

        assert_eq!(json["turno"], "blancas");
        assert_eq!(json["movimientos"], 0);
        assert_eq!(json["terminado"], false);
        assert_eq!(json["ganador"], "");
        assert_eq!(json["modo"], "amigo");
        assert_eq!(json["nivel"], "principiante");

        let tablero = json["tablero"].as_array().unwrap();
        assert_eq!(tablero.len(), 8);
        // Row 0 is rank 8: black pieces on top.
        assert_eq!(tablero[0][4], "♚");
        assert_eq!(tablero[7][4], "♔");
        assert_eq!(tablero[1][0], "♟");
        assert_eq!(tablero[6][0], "♙");
        assert_eq!(tablero[4][4], "");
    }

    // --- Mover ---

    #[tokio::test]
    async fn mover_e2e4() {
        let state = test_state();
        let json = post_move(&state, (6, 4), (4, 4)).await;
        assert_eq!(json["exito"], true);
        assert_eq!(json["mensaje"], "Movimiento realizado");
        assert_eq!(json["turno"], "negras");

        let estado = get_estado(&state).await;
        assert_eq!(estado["movimientos"], 1);
        assert_eq!(estado["tablero"][4][4], "♙");
        assert_eq!(estado["tablero"][6][4], "");
    }

    #[tokio::test]
    async fn mover_illegal_is_rejected_with_200() {
        let state = test_state();
        // e2-e5 is not a legal pawn move.
        let json = post_move(&state, (6, 4), (3, 4)).await;
        assert_eq!(json["exito"], false);
        assert_eq!(json["mensaje"], "Movimiento inválido");
        assert_eq!(json["turno"], "blancas");

        let estado = get_estado(&state).await;
        assert_eq!(estado["movimientos"], 0);
    }

    #[tokio::test]
    async fn mover_malformed_body_is_rejected_with_200() {
        let state = test_state();
        for body in [r#"{"desde": "garbage"}"#, "", "not json at all"] {
            let app = create_router(state.clone());
            let resp = app
                .oneshot(
                    Request::post("/api/mover")
                        .header("content-type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let json = body_json(resp).await;
            assert_eq!(json["exito"], false);
            assert_eq!(json["mensaje"], "Cuerpo de la petición inválido");
            assert_eq!(json["turno"], "blancas");
        }

        let estado = get_estado(&state).await;
        assert_eq!(estado["movimientos"], 0);
    }

    #[tokio::test]
    async fn mover_out_of_bounds() {
        let state = test_state();
        let json = post_move(&state, (9, 4), (4, 4)).await;
        assert_eq!(json["exito"], false);
        assert_eq!(json["mensaje"], "Coordenadas fuera del tablero");
    }

    #[tokio::test]
    async fn mover_empty_source_square() {
        let state = test_state();
        let json = post_move(&state, (4, 4), (3, 4)).await;
        assert_eq!(json["exito"], false);
        assert_eq!(json["mensaje"], "No hay pieza en la casilla de origen");
    }

    #[tokio::test]
    async fn mover_opponent_piece_is_rejected() {
        let state = test_state();
        // White tries to move the black e7 pawn.
        let json = post_move(&state, (1, 4), (3, 4)).await;
        assert_eq!(json["exito"], false);
        assert_eq!(json["mensaje"], "No es tu turno");
    }

    #[tokio::test]
    async fn fools_mate_over_the_wire() {
        let state = test_state();
        post_move(&state, (6, 5), (5, 5)).await; // f2-f3
        post_move(&state, (1, 4), (3, 4)).await; // e7-e5
        post_move(&state, (6, 6), (4, 6)).await; // g2-g4
        let json = post_move(&state, (0, 3), (4, 7)).await; // Qd8-h4#
        assert_eq!(json["exito"], true);
        assert_eq!(json["mensaje"], "¡Jaque mate!");

        let estado = get_estado(&state).await;
        assert_eq!(estado["terminado"], true);
        assert_eq!(estado["ganador"], "negras");

        // Further moves are refused.
        let json = post_move(&state, (6, 0), (5, 0)).await;
        assert_eq!(json["exito"], false);
        assert_eq!(json["mensaje"], "La partida ha terminado");
    }

    // --- Configurar ---

    #[tokio::test]
    async fn configurar_updates_mode_and_level() {
        let state = test_state();
        let app = create_router(state.clone());
        let resp = app
            .oneshot(
                Request::get("/api/configurar?modo=bot&nivel=intermedio")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["exito"], true);
        assert_eq!(json["mensaje"], "Configuración actualizada");
        assert_eq!(json["modo"], "bot");
        assert_eq!(json["nivel"], "intermedio");

        let estado = get_estado(&state).await;
        assert_eq!(estado["modo"], "bot");
        assert_eq!(estado["nivel"], "intermedio");
    }

    #[tokio::test]
    async fn configurar_rejects_unknown_mode() {
        let state = test_state();
        let app = create_router(state.clone());
        let resp = app
            .oneshot(
                Request::get("/api/configurar?modo=torneo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["exito"], false);

        let estado = get_estado(&state).await;
        assert_eq!(estado["modo"], "amigo");
    }

    #[tokio::test]
    async fn configurar_partial_keeps_other_setting() {
        let state = test_state();
        let app = create_router(state.clone());
        let resp = app
            .oneshot(
                Request::get("/api/configurar?nivel=intermedio")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["exito"], true);
        assert_eq!(json["modo"], "amigo");
        assert_eq!(json["nivel"], "intermedio");
    }

    // --- Bot mode ---

    #[tokio::test]
    async fn bot_mode_replies_in_the_same_request() {
        let state = test_state();
        let app = create_router(state.clone());
        app.oneshot(
            Request::get("/api/configurar?modo=bot&nivel=principiante")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        let json = post_move(&state, (6, 4), (4, 4)).await;
        assert_eq!(json["exito"], true);
        // Bot already answered: it is White's turn again.
        assert_eq!(json["turno"], "blancas");

        let estado = get_estado(&state).await;
        assert_eq!(estado["movimientos"], 2);
    }

    // --- Reiniciar ---

    #[tokio::test]
    async fn reiniciar_resets_board_but_keeps_config() {
        let state = test_state();
        let app = create_router(state.clone());
        app.oneshot(
            Request::get("/api/configurar?modo=bot&nivel=intermedio")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
        post_move(&state, (6, 4), (4, 4)).await;

        let app = create_router(state.clone());
        let resp = app
            .oneshot(Request::post("/api/reiniciar").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["exito"], true);
        assert_eq!(json["mensaje"], "Juego reiniciado");

        let estado = get_estado(&state).await;
        assert_eq!(estado["movimientos"], 0);
        assert_eq!(estado["terminado"], false);
        assert_eq!(estado["modo"], "bot");
        assert_eq!(estado["nivel"], "intermedio");
    }
}
