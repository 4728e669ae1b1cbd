use axum::{extract::Path, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::latex::parse;
use crate::models::resume::ResumeRecord;
use crate::templates::{self, Template};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: &'static Template,
    pub example: ResumeRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub template_id: String,
    #[serde(default)]
    pub record: ResumeRecord,
}

#[derive(Serialize)]
pub struct RenderResponse {
    pub markup: String,
}

#[derive(Deserialize)]
pub struct ParseRequest {
    pub markup: String,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<&'static [Template]> {
    Json(templates::all())
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(Path(id): Path<String>) -> Result<Json<TemplateDetail>, AppError> {
    let template = find(&id)?;
    Ok(Json(TemplateDetail {
        template,
        example: (template.example)(),
    }))
}

/// POST /api/v1/render
/// Stateless: renders the given record without touching the workspace.
pub async fn handle_render(Json(req): Json<RenderRequest>) -> Result<Json<RenderResponse>, AppError> {
    let template = find(&req.template_id)?;
    let mut record = req.record;
    record.normalize();
    let markup = templates::generate(&record, template.id)?;
    Ok(Json(RenderResponse { markup }))
}

/// POST /api/v1/parse
pub async fn handle_parse(Json(req): Json<ParseRequest>) -> Result<Json<ResumeRecord>, AppError> {
    Ok(Json(parse(&req.markup)?))
}

pub(crate) fn find(id: &str) -> Result<&'static Template, AppError> {
    if !templates::exists(id) {
        return Err(AppError::NotFound(format!("template '{id}'")));
    }
    Ok(templates::lookup(id))
}
