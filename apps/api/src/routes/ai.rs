use axum::{extract::State, Json};
use serde::Deserialize;

use crate::assistant::{Enhancement, MarkupEdit};
use crate::errors::AppError;
use crate::models::document::MarkupDocument;
use crate::models::resume::ResumeRecord;
use crate::routes::templates::find;
use crate::state::AppState;

/// Without a `record`, the workspace record is enhanced and the result is
/// loaded back into the workspace.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    #[serde(default)]
    pub record: Option<ResumeRecord>,
    #[serde(default)]
    pub template_id: Option<String>,
}

/// Without `markup`, the workspace markup is edited and replaced.
#[derive(Deserialize)]
pub struct EditRequest {
    pub instruction: String,
    #[serde(default)]
    pub markup: Option<String>,
}

/// POST /api/v1/ai/enhance
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Json<Enhancement>, AppError> {
    let template_id = match req.template_id {
        Some(id) => id,
        None => state.workspace.markup().await.template_id,
    };
    let template = find(&template_id)?;

    let (record, apply) = match req.record {
        Some(record) => (record, false),
        None => (state.workspace.record().await, true),
    };
    let enhancement = state.assistant.enhance(record, template.id).await?;

    if apply && enhancement.notice.is_none() {
        let markup = MarkupDocument {
            source: enhancement.markup.clone(),
            template_id: template.id.to_string(),
        };
        state
            .workspace
            .load(enhancement.record.clone(), markup)
            .await;
    }
    Ok(Json(enhancement))
}

/// POST /api/v1/ai/edit
pub async fn handle_edit_markup(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> Result<Json<MarkupEdit>, AppError> {
    if req.instruction.trim().is_empty() {
        return Err(AppError::Validation("instruction must not be empty".to_string()));
    }
    let (markup, apply) = match req.markup {
        Some(markup) => (markup, false),
        None => (state.workspace.markup().await.source, true),
    };
    let edit = state.assistant.edit_markup(&markup, &req.instruction).await;

    if apply && edit.notice.is_none() {
        // A code edit like any other: the record follows through sync.
        state.workspace.set_markup(edit.markup.clone()).await;
    }
    Ok(Json(edit))
}
