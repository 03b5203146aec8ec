use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use lumen_core::{AppError, AppState, content, progress, roadmap};
use lumen_database::model::user::User;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, session::CurrentUser};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    node_title: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
pub struct CompleteNodeRequest {
    #[serde(default)]
    node_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompleteNodeResponse {
    success: bool,
    xp: i64,
    message: &'static str,
}

pub async fn generate(
    State(state): State<AppState>,
    _user: CurrentUser,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(invalid_payload)?;

    let content = content::generate(
        &state,
        request.node_title.as_deref(),
        request.mode.as_deref(),
    )
    .await?;

    Ok(Json(GenerateResponse { content }))
}

pub async fn complete_node(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CompleteNodeRequest>, JsonRejection>,
) -> Result<Json<CompleteNodeResponse>, ApiError> {
    let Json(request) = payload.map_err(invalid_payload)?;

    let record = progress::complete_node(&state, &user, request.node_id.as_deref()).await?;

    Ok(Json(CompleteNodeResponse {
        success: true,
        xp: record.xp,
        message: progress::completion_message(&record),
    }))
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    xp: i64,
    streak: i64,
    levels: Vec<LevelView>,
}

#[derive(Debug, Serialize)]
struct LevelView {
    id: &'static str,
    title: &'static str,
    nodes: Vec<NodeView>,
}

#[derive(Debug, Serialize)]
struct NodeView {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    completed: bool,
}

/// The catalog annotated with the caller's completion state.
pub async fn roadmap(CurrentUser(user): CurrentUser) -> Json<RoadmapResponse> {
    Json(annotate_roadmap(&user))
}

fn annotate_roadmap(user: &User) -> RoadmapResponse {
    let levels = roadmap::levels()
        .iter()
        .map(|level| LevelView {
            id: level.id,
            title: level.title,
            nodes: level
                .nodes
                .iter()
                .map(|node| NodeView {
                    id: node.id,
                    title: node.title,
                    description: node.description,
                    completed: user.has_completed(node.id),
                })
                .collect(),
        })
        .collect();

    RoadmapResponse {
        xp: user.xp,
        streak: user.streak,
        levels,
    }
}

fn invalid_payload(rejection: JsonRejection) -> ApiError {
    ApiError(AppError::InvalidPayload(rejection.body_text()))
}
