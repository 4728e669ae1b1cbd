use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::PdfHandle;
use crate::state::AppState;

/// GET /api/v1/pdf/:handle
/// Handles are released when a newer PDF replaces them.
pub async fn handle_get_pdf(
    State(state): State<AppState>,
    Path(handle): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pdf = state
        .pdfs
        .get(PdfHandle(handle))
        .await
        .ok_or_else(|| AppError::NotFound(format!("pdf '{handle}'")))?;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf))
}
