//! Library skill CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use skillforge_store::{NewSkill, Skill, SkillPatch};

use crate::{AppState, error};

pub async fn list_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.skills.list().await {
        Ok(skills) => error::data(skills).into_response(),
        Err(e) => error::internal(e),
    }
}

pub async fn get_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.skills.get(&id).await {
        Ok(Some(skill)) => error::data(skill).into_response(),
        Ok(None) => error::not_found("Skill not found"),
        Err(e) => error::internal(e),
    }
}

pub async fn create_handler(
    State(state): State<AppState>,
    Json(body): Json<NewSkill>,
) -> impl IntoResponse {
    if body.name.trim().is_empty() {
        return error::validation_error("Name is required");
    }
    match state.skills.create(Skill::new(body)).await {
        Ok(skill) => (StatusCode::CREATED, error::data(skill)).into_response(),
        Err(e) => error::internal(e),
    }
}

pub async fn update_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(patch): Json<SkillPatch>,
) -> impl IntoResponse {
    match state.skills.update(&id, patch).await {
        Ok(Some(skill)) => error::data(skill).into_response(),
        Ok(None) => error::not_found("Skill not found"),
        Err(e) => error::internal(e),
    }
}

pub async fn delete_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.skills.delete(&id).await {
        Ok(true) => error::data(serde_json::json!({ "success": true })).into_response(),
        Ok(false) => error::not_found("Skill not found"),
        Err(e) => error::internal(e),
    }
}
