//! In-memory home of compiled PDFs, addressed by opaque handles.

use std::collections::HashMap;

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::document::PdfHandle;

#[derive(Debug, Default)]
pub struct PdfStore {
    pdfs: RwLock<HashMap<PdfHandle, Bytes>>,
}

impl PdfStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, pdf: Bytes) -> PdfHandle {
        let handle = PdfHandle::new();
        debug!(%handle, bytes = pdf.len(), "pdf stored");
        self.pdfs.write().await.insert(handle, pdf);
        handle
    }

    pub async fn get(&self, handle: PdfHandle) -> Option<Bytes> {
        self.pdfs.read().await.get(&handle).cloned()
    }

    /// Drops a PDF. Returns false if the handle was unknown or already released.
    pub async fn release(&self, handle: PdfHandle) -> bool {
        let removed = self.pdfs.write().await.remove(&handle).is_some();
        if removed {
            debug!(%handle, "pdf released");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.pdfs.read().await.len()
    }
}
