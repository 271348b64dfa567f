//! Tool status and per-tool discovery endpoints.

use std::path::PathBuf;

use {
    axum::{
        extract::{Path, State},
        response::IntoResponse,
    },
    serde::Serialize,
};

use skillforge_connectors::ToolName;

use crate::{AppState, error};

/// Display-ready status for one tool, combining detection with counts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolStatus {
    name: ToolName,
    detected: bool,
    paths: ToolStatusPaths,
    command_count: usize,
    skill_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolStatusPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    global_dir: Option<PathBuf>,
}

pub async fn tools_index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (detections, commands, skills) = tokio::join!(
        state.registry.detect_all_global(),
        state.registry.list_global_commands(),
        state.registry.list_all_skills(),
    );

    let tools: Vec<ToolStatus> = state
        .registry
        .connectors()
        .iter()
        .zip(detections)
        .zip(skills)
        .map(|((connector, detection), (_, tool_skills))| ToolStatus {
            name: connector.name(),
            detected: detection.detected,
            paths: ToolStatusPaths {
                global_dir: detection.global_dir,
            },
            command_count: if connector.name() == ToolName::ClaudeCode {
                commands.len()
            } else {
                0
            },
            skill_count: tool_skills.len(),
        })
        .collect();

    error::data(tools)
}

pub async fn tool_skills_handler(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let Ok(tool) = name.parse::<ToolName>() else {
        return error::not_found("Unknown tool");
    };
    let Some(connector) = state.registry.get(tool) else {
        return error::not_found("Unknown tool");
    };
    error::data(connector.list_skills().await).into_response()
}

pub async fn claude_commands_handler(State(state): State<AppState>) -> impl IntoResponse {
    error::data(state.registry.list_global_commands().await)
}
