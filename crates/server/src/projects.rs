//! Project registration, per-project discovery, and CRUD.

use std::path::Path as FsPath;

use {
    axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    },
    serde::Deserialize,
};

use skillforge_store::{DetectedTool, Project, ProjectPatch};

use crate::{AppState, error};

#[derive(Deserialize)]
struct CreateProject {
    path: Option<String>,
}

pub async fn list_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.projects.list().await {
        Ok(projects) => error::data(projects).into_response(),
        Err(e) => error::internal(e),
    }
}

pub async fn get_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.projects.get(&id).await {
        Ok(Some(project)) => error::data(project).into_response(),
        Ok(None) => error::not_found("Project not found"),
        Err(e) => error::internal(e),
    }
}

pub async fn create_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let body: CreateProject = match serde_json::from_value(body) {
        Ok(b) => b,
        Err(_) => return error::validation_error("Path is required"),
    };
    let Some(path) = body.path.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) else {
        return error::validation_error("Path is required");
    };
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return error::validation_error("Directory does not exist");
    }
    match state.projects.get_by_path(&path).await {
        Ok(Some(_)) => return error::conflict("Project at this path already exists"),
        Ok(None) => {},
        Err(e) => return error::internal(e),
    }

    let detected_tools = detect_tools(&state, FsPath::new(&path)).await;
    match state.projects.create(Project::new(path, detected_tools)).await {
        Ok(project) => (StatusCode::CREATED, error::data(project)).into_response(),
        Err(e) => error::internal(e),
    }
}

pub async fn update_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(patch): Json<ProjectPatch>,
) -> impl IntoResponse {
    match state.projects.update(&id, patch).await {
        Ok(Some(project)) => error::data(project).into_response(),
        Ok(None) => error::not_found("Project not found"),
        Err(e) => error::internal(e),
    }
}

pub async fn delete_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.projects.delete(&id).await {
        Ok(true) => error::data(serde_json::json!({ "success": true })).into_response(),
        Ok(false) => error::not_found("Project not found"),
        Err(e) => error::internal(e),
    }
}

/// Per-project skill listing across every tool, refreshing the stored
/// detection snapshot when it drifted.
pub async fn project_skills_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let project = match state.projects.get(&id).await {
        Ok(Some(project)) => project,
        Ok(None) => return error::not_found("Project not found"),
        Err(e) => return error::internal(e),
    };

    let project_path = FsPath::new(&project.path);
    let (skills_by_tool, detected_tools) = tokio::join!(
        state.registry.list_all_project_skills(project_path),
        detect_tools(&state, project_path),
    );

    if detected_tools != project.detected_tools
        && let Err(e) = state
            .projects
            .set_detected_tools(&project.id, &detected_tools)
            .await
    {
        return error::internal(e);
    }

    let mut by_tool = serde_json::Map::new();
    for (tool, skills) in skills_by_tool {
        match serde_json::to_value(skills) {
            Ok(value) => {
                by_tool.insert(tool.as_str().to_string(), value);
            },
            Err(e) => return error::internal(e),
        }
    }
    error::data(by_tool).into_response()
}

pub async fn favorite_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.projects.toggle_favorite(&id).await {
        Ok(Some(project)) => error::data(project).into_response(),
        Ok(None) => error::not_found("Project not found"),
        Err(e) => error::internal(e),
    }
}

async fn detect_tools(state: &AppState, project_path: &FsPath) -> Vec<DetectedTool> {
    let detections = state.registry.detect_all_project(project_path).await;
    state
        .registry
        .connectors()
        .iter()
        .zip(detections)
        .map(|(connector, detection)| DetectedTool {
            name: connector.name(),
            detected: detection.detected,
        })
        .collect()
}
