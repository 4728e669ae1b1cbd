use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::workspace::edits::RecordEdit;
use crate::workspace::{Snapshot, TemplateChoice};

#[derive(Deserialize)]
pub struct MarkupRequest {
    pub markup: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub template_id: String,
    #[serde(default)]
    pub choice: Option<TemplateChoice>,
}

/// GET /api/v1/workspace
pub async fn handle_get_workspace(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.workspace.snapshot().await)
}

/// PUT /api/v1/workspace/record
/// A visual edit: the markup follows after the sync debounce.
pub async fn handle_put_record(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Json<Snapshot> {
    state.workspace.set_record(record).await;
    Json(state.workspace.snapshot().await)
}

/// PUT /api/v1/workspace/markup
/// A code edit: the record follows after the sync debounce.
pub async fn handle_put_markup(
    State(state): State<AppState>,
    Json(req): Json<MarkupRequest>,
) -> Json<Snapshot> {
    state.workspace.set_markup(req.markup).await;
    Json(state.workspace.snapshot().await)
}

/// POST /api/v1/workspace/edits
pub async fn handle_edit(
    State(state): State<AppState>,
    Json(edit): Json<RecordEdit>,
) -> Result<Json<Snapshot>, AppError> {
    state.workspace.edit(edit).await?;
    Ok(Json(state.workspace.snapshot().await))
}

/// POST /api/v1/workspace/template
pub async fn handle_change_template(
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<Snapshot>, AppError> {
    state
        .workspace
        .change_template(&req.template_id, req.choice)
        .await?;
    Ok(Json(state.workspace.snapshot().await))
}

/// POST /api/v1/workspace/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<Snapshot> {
    state.workspace.reset().await;
    Json(state.workspace.snapshot().await)
}

/// POST /api/v1/workspace/compile
/// Queues a manual recompile; progress shows up in the snapshot's `pdf` field.
pub async fn handle_compile(State(state): State<AppState>) -> StatusCode {
    state.workspace.request_compile();
    StatusCode::ACCEPTED
}
