pub mod ai;
pub mod health;
pub mod pdf;
pub mod templates;
pub mod workspace;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Templates and stateless conversion
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route("/api/v1/templates/:id", get(templates::handle_get_template))
        .route("/api/v1/render", post(templates::handle_render))
        .route("/api/v1/parse", post(templates::handle_parse))
        // Workspace
        .route("/api/v1/workspace", get(workspace::handle_get_workspace))
        .route("/api/v1/workspace/record", put(workspace::handle_put_record))
        .route("/api/v1/workspace/markup", put(workspace::handle_put_markup))
        .route("/api/v1/workspace/edits", post(workspace::handle_edit))
        .route(
            "/api/v1/workspace/template",
            post(workspace::handle_change_template),
        )
        .route("/api/v1/workspace/reset", post(workspace::handle_reset))
        .route("/api/v1/workspace/compile", post(workspace::handle_compile))
        // Preview
        .route("/api/v1/pdf/:handle", get(pdf::handle_get_pdf))
        // AI
        .route("/api/v1/ai/enhance", post(ai::handle_enhance))
        .route("/api/v1/ai/edit", post(ai::handle_edit_markup))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use bytes::Bytes;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::assistant::Assistant;
    use crate::compile::PdfStore;
    use crate::llm_client::LlmClient;
    use crate::workspace::Workspace;

    /// No controllers run and no AI key is set, so nothing leaves the process.
    fn test_state() -> AppState {
        let llm = LlmClient::new("http://127.0.0.1:9".to_string(), None, "test".to_string()).unwrap();
        AppState {
            workspace: Arc::new(Workspace::new("classic")),
            pdfs: Arc::new(PdfStore::new()),
            assistant: Assistant::new(Arc::new(llm)),
        }
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Bytes) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = build_router(state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, to_bytes(response.into_body(), usize::MAX).await.unwrap())
    }

    fn json_of(bytes: &Bytes) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&test_state(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["service"], "vitae-api");
    }

    #[tokio::test]
    async fn test_templates_listing_and_detail() {
        let state = test_state();
        let (status, body) = send(&state, Method::GET, "/api/v1/templates", None).await;
        assert_eq!(status, StatusCode::OK);
        let list = json_of(&body);
        assert_eq!(list.as_array().unwrap().len(), 9);
        assert_eq!(list[0]["id"], "classic");

        let (status, body) = send(&state, Method::GET, "/api/v1/templates/ats", None).await;
        assert_eq!(status, StatusCode::OK);
        let detail = json_of(&body);
        assert_eq!(detail["id"], "ats");
        assert!(detail["example"]["personalInfo"]["name"].is_string());

        let (status, body) = send(&state, Method::GET, "/api/v1/templates/fancy", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_of(&body)["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_render_then_parse() {
        let state = test_state();
        let record = json!({
            "personalInfo": { "name": "Lena Fischer", "email": "lena@example.com" },
            "skills": [ { "category": "Tools", "skills": ["Docker", "Terraform"] } ]
        });
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/render",
            Some(json!({ "templateId": "developer", "record": record })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let markup = json_of(&body)["markup"].as_str().unwrap().to_string();
        assert!(markup.starts_with("\\documentclass"));

        let (status, body) = send(&state, Method::POST, "/api/v1/parse", Some(json!({ "markup": markup }))).await;
        assert_eq!(status, StatusCode::OK);
        let parsed = json_of(&body);
        assert_eq!(parsed["personalInfo"]["name"], "Lena Fischer");
        assert_eq!(parsed["skills"][0]["skills"], json!(["Docker", "Terraform"]));
    }

    #[tokio::test]
    async fn test_parse_rejects_blank_markup() {
        let (status, body) = send(&test_state(), Method::POST, "/api/v1/parse", Some(json!({ "markup": "  " }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_of(&body)["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_workspace_edits_and_template_conflict() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/workspace/edits",
            Some(json!({ "op": "updatePersonalInfo", "info": { "name": "Omar Haddad" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let snapshot = json_of(&body);
        assert_eq!(snapshot["record"]["personalInfo"]["name"], "Omar Haddad");
        assert_eq!(snapshot["sync"]["lastEditedBy"], "visual");

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/workspace/template",
            Some(json!({ "templateId": "minimal" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body)["error"]["code"], "CONFLICT");

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/workspace/template",
            Some(json!({ "templateId": "minimal", "choice": "keepData" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let snapshot = json_of(&body);
        assert_eq!(snapshot["markup"]["templateId"], "minimal");
        assert!(snapshot["markup"]["source"].as_str().unwrap().contains("Omar Haddad"));
    }

    #[tokio::test]
    async fn test_unknown_edit_target_is_not_found() {
        let (status, _) = send(
            &test_state(),
            Method::POST,
            "/api/v1/workspace/edits",
            Some(json!({ "op": "deleteExperience", "id": "missing" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_markup_put_and_reset() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::PUT,
            "/api/v1/workspace/markup",
            Some(json!({ "markup": "\\documentclass{article}" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["sync"]["lastEditedBy"], "code");

        let (status, body) = send(&state, Method::POST, "/api/v1/workspace/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["markup"]["source"], "");

        let (status, _) = send(&state, Method::POST, "/api/v1/workspace/compile", None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_pdf_is_served_by_handle() {
        let state = test_state();
        let handle = state.pdfs.insert(Bytes::from_static(b"%PDF-1.5 body")).await;

        let response = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/pdf/{handle}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

        state.pdfs.release(handle).await;
        let (status, _) = send(&state, Method::GET, &format!("/api/v1/pdf/{handle}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ai_edit_without_key_leaves_markup_alone() {
        let state = test_state();
        state.workspace.set_markup("\\documentclass{article}".to_string()).await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/ai/edit",
            Some(json!({ "instruction": "fit to one page" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let edit = json_of(&body);
        assert_eq!(edit["markup"], "\\documentclass{article}");
        assert!(edit["notice"].as_str().unwrap().contains("not configured"));

        let (status, _) = send(&state, Method::POST, "/api/v1/ai/edit", Some(json!({ "instruction": " " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ai_enhance_without_key_returns_rendered_input() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/ai/enhance",
            Some(json!({ "record": { "personalInfo": { "name": "Ines Duarte" } }, "templateId": "executive" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let result = json_of(&body);
        assert_eq!(result["record"]["personalInfo"]["name"], "Ines Duarte");
        assert!(result["markup"].as_str().unwrap().contains("Ines Duarte"));
        assert!(result["notice"].is_string());
        // An explicit record never touches the workspace.
        assert!(state.workspace.record().await.is_blank());
    }
}
