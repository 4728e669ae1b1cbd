//! AI assistance: enhancing a partial record and editing markup on request.
//!
//! The model is never trusted. Its answer is cut down to the payload we asked
//! for; anything unusable, and any transport failure, falls back to the input
//! with a notice for the user. The assistant never fails a request because the
//! model did.

pub mod extract;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::{
    edit_prompt, enhance_prompt, EDIT_SYSTEM, EDIT_TEMPERATURE, ENHANCE_SYSTEM,
    ENHANCE_TEMPERATURE,
};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::ResumeRecord;
use crate::templates::{self, GenerationError};

/// The model behind the assistant. `LlmClient` in production, a script in tests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str, temperature: f32)
        -> Result<String, LlmError>;
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        LlmClient::complete(self, prompt, system, temperature).await
    }
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("the AI response could not be used: {0}")]
    MalformedResponse(String),

    #[error("the AI service is unavailable: {0}")]
    Transport(#[from] LlmError),
}

impl AssistantError {
    /// What the user is told when their input is returned unchanged.
    pub fn notice(&self) -> String {
        match self {
            AssistantError::MalformedResponse(_) => {
                "The AI response could not be understood; your resume was left unchanged.".to_string()
            }
            AssistantError::Transport(LlmError::MissingApiKey) => {
                "AI features are not configured; your resume was left unchanged.".to_string()
            }
            AssistantError::Transport(_) => {
                "The AI service could not be reached; your resume was left unchanged.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enhancement {
    pub record: ResumeRecord,
    pub markup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupEdit {
    pub markup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Clone)]
pub struct Assistant {
    model: Arc<dyn ChatModel>,
}

impl Assistant {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Asks the model to polish `partial` and renders the result with `template_id`.
    ///
    /// Errors only when the record that ends up being used cannot be rendered.
    pub async fn enhance(
        &self,
        partial: ResumeRecord,
        template_id: &str,
    ) -> Result<Enhancement, GenerationError> {
        let (record, notice) = match self.request_enhancement(&partial, template_id).await {
            Ok(record) => (record, None),
            Err(e) => {
                warn!("enhance fell back to the input: {e}");
                (partial, Some(e.notice()))
            }
        };
        let markup = templates::generate(&record, template_id)?;
        Ok(Enhancement {
            record,
            markup,
            notice,
        })
    }

    /// Applies a free-text instruction to `markup`.
    pub async fn edit_markup(&self, markup: &str, instruction: &str) -> MarkupEdit {
        match self.request_edit(markup, instruction).await {
            Ok(edited) => MarkupEdit {
                markup: edited,
                notice: None,
            },
            Err(e) => {
                warn!("markup edit fell back to the input: {e}");
                MarkupEdit {
                    markup: markup.to_string(),
                    notice: Some(e.notice()),
                }
            }
        }
    }

    async fn request_enhancement(
        &self,
        partial: &ResumeRecord,
        template_id: &str,
    ) -> Result<ResumeRecord, AssistantError> {
        // The image is base64 and means nothing to the model.
        let mut outgoing = partial.clone();
        let image = outgoing.personal_info.profile_image.take();
        let data = serde_json::to_value(&outgoing)
            .map_err(|e| AssistantError::MalformedResponse(e.to_string()))?;
        let template = templates::lookup(template_id);
        let prompt = enhance_prompt(template.description, &data);

        let answer = self
            .model
            .complete(&prompt, ENHANCE_SYSTEM, ENHANCE_TEMPERATURE)
            .await?;
        let json = extract::json_object(&answer).ok_or_else(|| {
            AssistantError::MalformedResponse("no JSON object in the answer".to_string())
        })?;
        let mut record: ResumeRecord = serde_json::from_str(&json)
            .map_err(|e| AssistantError::MalformedResponse(e.to_string()))?;

        record.personal_info.profile_image = image;
        record.normalize();
        info!(template = template.id, "record enhanced");
        Ok(record)
    }

    async fn request_edit(&self, markup: &str, instruction: &str) -> Result<String, AssistantError> {
        let prompt = edit_prompt(markup, instruction);
        let answer = self
            .model
            .complete(&prompt, EDIT_SYSTEM, EDIT_TEMPERATURE)
            .await?;
        let edited = extract::latex_document(&answer).ok_or_else(|| {
            AssistantError::MalformedResponse("no \\documentclass in the answer".to_string())
        })?;
        debug!(bytes = edited.len(), "markup edited");
        Ok(edited.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Answers every call with the same canned result and records the prompts.
    struct ScriptedModel {
        answer: Mutex<Option<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn answering(answer: Result<String, LlmError>) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(answer)),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, prompt: &str, _: &str, _: f32) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn partial() -> ResumeRecord {
        let mut record = ResumeRecord::default();
        record.personal_info.name = "Priya Raman".to_string();
        record.personal_info.profile_image = Some("QUJD".to_string());
        record
    }

    #[tokio::test]
    async fn test_enhance_uses_model_record_and_keeps_image() {
        let answer = r#"Here you go:
```json
{
  "personalInfo": { "name": "Priya Raman", "summary": "Data engineer with eight years of experience.", },
  "skills": [ { "category": "Languages", "skills": ["Python", "SQL"] } ],
}
```"#;
        let model = ScriptedModel::answering(Ok(answer.to_string()));
        let assistant = Assistant::new(model.clone());

        let result = assistant.enhance(partial(), "classic").await.unwrap();
        assert!(result.notice.is_none());
        assert_eq!(result.record.personal_info.summary, "Data engineer with eight years of experience.");
        assert_eq!(result.record.personal_info.profile_image.as_deref(), Some("QUJD"));
        assert!(!result.record.skills[0].id.is_empty());
        assert!(result.markup.contains("Priya Raman"));
        assert!(result.markup.contains("SQL"));
        assert!(!model.prompts.lock().unwrap()[0].contains("QUJD"));
    }

    #[tokio::test]
    async fn test_enhance_falls_back_on_garbage() {
        let assistant = Assistant::new(ScriptedModel::answering(Ok("{ not json at all }".to_string())));
        let result = assistant.enhance(partial(), "developer").await.unwrap();
        assert_eq!(result.record, partial());
        assert!(result.notice.unwrap().contains("could not be understood"));
        assert!(result.markup.contains("Priya Raman"));
    }

    #[tokio::test]
    async fn test_enhance_without_key_returns_input_with_notice() {
        let assistant = Assistant::new(ScriptedModel::answering(Err(LlmError::MissingApiKey)));
        let result = assistant.enhance(partial(), "classic").await.unwrap();
        assert_eq!(result.record.personal_info.name, "Priya Raman");
        assert!(result.notice.unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_edit_markup_extracts_document() {
        let answer = "```latex\n\\documentclass[10pt]{article}\n\\begin{document}\nShorter\n\\end{document}\n```";
        let assistant = Assistant::new(ScriptedModel::answering(Ok(answer.to_string())));
        let result = assistant
            .edit_markup("\\documentclass{article}\n\\begin{document}\nLong\n\\end{document}", "shorten")
            .await;
        assert!(result.notice.is_none());
        assert!(result.markup.starts_with("\\documentclass[10pt]{article}"));
        assert!(result.markup.contains("Shorter"));
    }

    #[tokio::test]
    async fn test_edit_markup_falls_back_on_transport_failure() {
        let original = "\\documentclass{article}";
        let assistant = Assistant::new(ScriptedModel::answering(Err(LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        })));
        let result = assistant.edit_markup(original, "make it pop").await;
        assert_eq!(result.markup, original);
        assert!(result.notice.unwrap().contains("could not be reached"));
    }

    #[tokio::test]
    async fn test_edit_markup_rejects_answer_without_document() {
        let assistant = Assistant::new(ScriptedModel::answering(Ok("I changed the font.".to_string())));
        let result = assistant.edit_markup("\\documentclass{article}", "x").await;
        assert_eq!(result.markup, "\\documentclass{article}");
        assert!(result.notice.is_some());
    }
}
