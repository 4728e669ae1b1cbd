use std::sync::Arc;

use crate::assistant::Assistant;
use crate::compile::PdfStore;
use crate::workspace::Workspace;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The editing session. The sync and compile controllers hold clones too.
    pub workspace: Arc<Workspace>,
    /// Compiled PDFs, written by the compile controller and served by handle.
    pub pdfs: Arc<PdfStore>,
    pub assistant: Assistant,
}
