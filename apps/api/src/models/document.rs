use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generated-or-edited LaTeX source paired with the template dialect it was written for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupDocument {
    pub source: String,
    pub template_id: String,
}

/// Which representation was edited most recently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditSource {
    /// Structured side (visual form).
    Visual,
    /// Markup side (LaTeX editor).
    Code,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Synced,
    Syncing,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetadata {
    pub last_edited_by: EditSource,
    pub last_sync_time: DateTime<Utc>,
    pub dirty: bool,
    pub sync_status: SyncStatus,
    /// User-visible notice for the last failed sync pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl Default for SyncMetadata {
    fn default() -> Self {
        Self {
            last_edited_by: EditSource::None,
            last_sync_time: Utc::now(),
            dirty: false,
            sync_status: SyncStatus::Synced,
            last_error: None,
        }
    }
}

impl SyncMetadata {
    /// Records an edit to one side.
    pub fn touch(&mut self, source: EditSource) {
        self.last_edited_by = source;
        self.last_sync_time = Utc::now();
        self.dirty = true;
    }
}

/// A single line-tagged compiler message. `line == 0` when no line could be attributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationError {
    pub line: u32,
    pub message: String,
}

impl CompilationError {
    pub fn unattributed(message: impl Into<String>) -> Self {
        Self {
            line: 0,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompileErrorKind {
    /// The compiler rejected the source.
    Compile,
    /// The compiler could not be reached.
    Transport,
    /// A success status whose body is not a PDF.
    InvalidDocument,
}

/// Opaque reference to a compiled PDF held in the PDF store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PdfHandle(pub Uuid);

impl PdfHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PdfHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Preview state owned by the compile controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfState {
    pub handle: Option<PdfHandle>,
    pub compiling: bool,
    pub errors: Vec<CompilationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<CompileErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_time_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_source_wire_format() {
        assert_eq!(serde_json::to_string(&EditSource::Visual).unwrap(), "\"visual\"");
        assert_eq!(serde_json::to_string(&EditSource::Code).unwrap(), "\"code\"");
        assert_eq!(serde_json::to_string(&EditSource::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_touch_marks_dirty_and_source() {
        let mut meta = SyncMetadata::default();
        assert!(!meta.dirty);
        meta.touch(EditSource::Code);
        assert!(meta.dirty);
        assert_eq!(meta.last_edited_by, EditSource::Code);
        assert_eq!(meta.sync_status, SyncStatus::Synced);
    }

    #[test]
    fn test_pdf_state_omits_empty_optionals() {
        let value = serde_json::to_value(PdfState::default()).unwrap();
        assert!(value.get("errorKind").is_none());
        assert!(value.get("compileTimeMs").is_none());
        assert_eq!(value["compiling"], false);
    }
}
