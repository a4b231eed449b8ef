use crate::domain::{Command, CommandOutcome, SyncError};
use crate::interface_adapters::protocol::{
    CommandRequest, CommandResponse, PlayerStateDto, RegisterRequest, RegisterResponse,
    StateRequest, StateResponse,
};
use crate::interface_adapters::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

// Allocate a client id for a new player.
#[tracing::instrument(name = "register", skip_all, fields(name = %body.name))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Json<RegisterResponse> {
    let client_id = state.sync.register(&body.name).await;
    Json(RegisterResponse { client_id })
}

// Apply a position command; stale sequences are a successful no-op.
pub async fn send_command(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CommandRequest>,
) -> (StatusCode, Json<CommandResponse>) {
    let cmd = Command {
        client_id: body.client_id,
        sequence: body.sequence,
        x: body.x,
        y: body.y,
        command: body.command,
    };

    match state.sync.send_command(cmd).await {
        Ok(CommandOutcome::Applied) => (
            StatusCode::OK,
            Json(CommandResponse {
                applied: true,
                error: String::new(),
            }),
        ),
        Ok(CommandOutcome::Stale { .. }) => (
            StatusCode::OK,
            Json(CommandResponse {
                applied: false,
                error: String::new(),
            }),
        ),
        Err(err @ SyncError::UnknownClient) => (
            StatusCode::NOT_FOUND,
            Json(CommandResponse {
                applied: false,
                error: err.to_string(),
            }),
        ),
    }
}

// Return a snapshot of every registered player plus the authoritative map.
pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StateRequest>,
) -> Json<StateResponse> {
    let snapshot = state.sync.get_state(&body.client_id).await;
    Json(StateResponse {
        players: snapshot
            .players
            .into_iter()
            .map(PlayerStateDto::from)
            .collect(),
        time: snapshot.time_ms,
        map_lines: snapshot.map_lines.as_ref().clone(),
    })
}
