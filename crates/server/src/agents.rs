//! Agent CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use skillforge_store::{Agent, AgentPatch, NewAgent};

use crate::{AppState, error};

pub async fn list_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.agents.list().await {
        Ok(agents) => error::data(agents).into_response(),
        Err(e) => error::internal(e),
    }
}

pub async fn get_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.agents.get(&id).await {
        Ok(Some(agent)) => error::data(agent).into_response(),
        Ok(None) => error::not_found("Agent not found"),
        Err(e) => error::internal(e),
    }
}

pub async fn create_handler(
    State(state): State<AppState>,
    Json(body): Json<NewAgent>,
) -> impl IntoResponse {
    if body.name.trim().is_empty() {
        return error::validation_error("Name is required");
    }
    match state.agents.create(Agent::new(body)).await {
        Ok(agent) => (StatusCode::CREATED, error::data(agent)).into_response(),
        Err(e) => error::internal(e),
    }
}

pub async fn update_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(patch): Json<AgentPatch>,
) -> impl IntoResponse {
    match state.agents.update(&id, patch).await {
        Ok(Some(agent)) => error::data(agent).into_response(),
        Ok(None) => error::not_found("Agent not found"),
        Err(e) => error::internal(e),
    }
}

pub async fn delete_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.agents.delete(&id).await {
        Ok(true) => error::data(serde_json::json!({ "success": true })).into_response(),
        Ok(false) => error::not_found("Agent not found"),
        Err(e) => error::internal(e),
    }
}
