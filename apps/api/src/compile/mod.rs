//! Turns markup changes into PDF previews.
//!
//! Every markup change is hashed; unchanged content is not sent again unless a
//! recompile was requested. Requests are debounced (short for manual, long for
//! typing) and run in spawned tasks that report back over a channel. Only the
//! result for the most recently scheduled hash is applied.

pub mod client;
pub mod log;
pub mod pdf_store;

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant, Sleep};
use tracing::{debug, info, warn};

use crate::models::document::{CompilationError, CompileErrorKind, PdfHandle};
use crate::workspace::{Workspace, WorkspaceEvent};
pub use client::{CompileFailure, CompileRequest, HttpLatexCompiler, LatexCompiler};
pub use pdf_store::PdfStore;

/// Anything shorter cannot be a real document.
const MIN_PDF_BYTES: usize = 100;
const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileConfig {
    pub debounce: Duration,
    pub manual_debounce: Duration,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(2000),
            manual_debounce: Duration::from_millis(100),
        }
    }
}

/// SHA-256 of the markup, hex encoded.
pub fn content_hash(markup: &str) -> String {
    hex::encode(Sha256::digest(markup.as_bytes()))
}

/// Accepts only bodies that look like a PDF.
pub fn validate_pdf(body: Bytes) -> Result<Bytes, CompileFailure> {
    if body.len() < MIN_PDF_BYTES || !body.starts_with(PDF_MAGIC) {
        return Err(CompileFailure::InvalidDocument);
    }
    Ok(body)
}

/// The error list and kind shown for a failed compile.
pub fn describe_failure(failure: &CompileFailure) -> (Vec<CompilationError>, CompileErrorKind) {
    match failure {
        CompileFailure::Compile { message, logs } => {
            (log::compile_errors(logs, message), CompileErrorKind::Compile)
        }
        CompileFailure::Transport(_) => (
            vec![CompilationError::unattributed(failure.to_string())],
            CompileErrorKind::Transport,
        ),
        CompileFailure::InvalidDocument => (
            vec![CompilationError::unattributed(failure.to_string())],
            CompileErrorKind::InvalidDocument,
        ),
    }
}

struct Pending {
    at: Instant,
    hash: String,
    markup: String,
}

struct Outcome {
    hash: String,
    result: Result<Bytes, CompileFailure>,
    elapsed: Duration,
}

struct Controller {
    workspace: Arc<Workspace>,
    compiler: Arc<dyn LatexCompiler>,
    store: Arc<PdfStore>,
    config: CompileConfig,
    outcomes: mpsc::UnboundedSender<Outcome>,
    pending: Option<Pending>,
    /// Hash of the last markup that compiled successfully.
    compiled: Option<String>,
    /// Hash of the most recently scheduled compile; older outcomes are stale.
    latest: Option<String>,
}

/// Subscribes to the workspace and runs the controller until the bus closes.
pub fn spawn(
    workspace: Arc<Workspace>,
    compiler: Arc<dyn LatexCompiler>,
    store: Arc<PdfStore>,
    config: CompileConfig,
) -> JoinHandle<()> {
    let events = workspace.subscribe();
    let (outcomes, results) = mpsc::unbounded_channel();
    let controller = Controller {
        workspace,
        compiler,
        store,
        config,
        outcomes,
        pending: None,
        compiled: None,
        latest: None,
    };
    tokio::spawn(controller.run(events, results))
}

impl Controller {
    async fn run(
        mut self,
        mut events: broadcast::Receiver<WorkspaceEvent>,
        mut results: mpsc::UnboundedReceiver<Outcome>,
    ) {
        info!(
            debounce_ms = self.config.debounce.as_millis() as u64,
            "compile controller started"
        );
        loop {
            let at = self.pending.as_ref().map(|p| p.at);
            tokio::select! {
                event = events.recv() => match event {
                    Ok(WorkspaceEvent::MarkupChanged(_)) | Ok(WorkspaceEvent::Mounted) => {
                        self.schedule(false).await
                    }
                    Ok(WorkspaceEvent::CompileRequested) => self.schedule(true).await,
                    Ok(WorkspaceEvent::Reset { released }) => self.reset(released).await,
                    Ok(WorkspaceEvent::RecordChanged(_)) => {}
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "compile controller lagged; rescheduling");
                        self.schedule(false).await;
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = deadline(at), if at.is_some() => {
                    if let Some(pending) = self.pending.take() {
                        self.launch(pending).await;
                    }
                }
                Some(outcome) = results.recv() => self.apply(outcome).await,
            }
        }
        info!("compile controller stopped");
    }

    async fn schedule(&mut self, manual: bool) {
        // Any new markup voids the pending timer, even if it is not compiled itself.
        self.pending = None;

        let markup = self.workspace.markup().await.source;
        if markup.trim().is_empty() {
            debug!("blank markup; nothing to compile");
            self.latest = None;
            self.settle(false).await;
            return;
        }
        let hash = content_hash(&markup);
        if !manual && self.compiled.as_deref() == Some(hash.as_str()) {
            debug!("markup matches the shown preview");
            // Results still in flight belong to other content now.
            self.latest = Some(hash);
            self.settle(true).await;
            return;
        }

        let delay = if manual {
            self.config.manual_debounce
        } else {
            self.config.debounce
        };
        debug!(manual, delay_ms = delay.as_millis() as u64, "compile scheduled");
        self.latest = Some(hash.clone());
        self.pending = Some(Pending {
            at: Instant::now() + delay,
            hash,
            markup,
        });
    }

    async fn launch(&self, pending: Pending) {
        let record = self.workspace.record().await;
        let profile_image = record
            .personal_info
            .profile_image_payload()
            .filter(|payload| match STANDARD.decode(payload) {
                Ok(_) => true,
                Err(e) => {
                    warn!("profile image is not valid base64, compiling without it: {e}");
                    false
                }
            })
            .map(str::to_string);

        self.workspace
            .update_pdf(|pdf| {
                pdf.compiling = true;
                pdf.errors.clear();
                pdf.error_kind = None;
                pdf.compile_time_ms = None;
            })
            .await;

        let request = CompileRequest {
            markup: pending.markup,
            profile_image,
        };
        let compiler = self.compiler.clone();
        let outcomes = self.outcomes.clone();
        let hash = pending.hash;
        tokio::spawn(async move {
            let started = Instant::now();
            let result = compiler.compile(request).await.and_then(validate_pdf);
            let outcome = Outcome {
                hash,
                result,
                elapsed: started.elapsed(),
            };
            // The controller is gone when the receiver is closed; nothing to report to.
            let _ = outcomes.send(outcome);
        });
    }

    /// Nothing relevant is compiling any more. With `current`, the shown PDF
    /// matches the markup again, so errors from other content are cleared.
    async fn settle(&self, current: bool) {
        self.workspace
            .update_pdf(|pdf| {
                pdf.compiling = false;
                if current {
                    pdf.errors.clear();
                    pdf.error_kind = None;
                }
            })
            .await;
    }

    /// The workspace was emptied: forget what was compiled and drop the PDFs.
    async fn reset(&mut self, released: Option<PdfHandle>) {
        self.pending = None;
        self.latest = None;
        self.compiled = None;
        // A result applied between the reset and this event is stale too.
        let mut applied = None;
        self.workspace
            .update_pdf(|pdf| {
                applied = pdf.handle.take();
                pdf.compiling = false;
            })
            .await;
        for handle in released.into_iter().chain(applied) {
            self.store.release(handle).await;
        }
        debug!("compile state reset");
    }

    async fn apply(&mut self, outcome: Outcome) {
        if self.latest.as_deref() != Some(outcome.hash.as_str()) {
            debug!("discarding stale compile result");
            return;
        }
        let elapsed_ms = outcome.elapsed.as_millis() as u64;

        match outcome.result {
            Ok(pdf) => {
                let handle = self.store.insert(pdf).await;
                let mut previous = None;
                self.workspace
                    .update_pdf(|state| {
                        previous = state.handle.replace(handle);
                        state.compiling = false;
                        state.errors.clear();
                        state.error_kind = None;
                        state.compile_time_ms = Some(elapsed_ms);
                    })
                    .await;
                if let Some(previous) = previous {
                    self.store.release(previous).await;
                }
                self.compiled = Some(outcome.hash);
                info!(elapsed_ms, %handle, "pdf compiled");
            }
            Err(failure) => {
                warn!(elapsed_ms, "compile failed: {failure}");
                let (errors, kind) = describe_failure(&failure);
                self.workspace
                    .update_pdf(|state| {
                        state.compiling = false;
                        state.errors = errors;
                        state.error_kind = Some(kind);
                        state.compile_time_ms = Some(elapsed_ms);
                    })
                    .await;
            }
        }
    }
}

fn deadline(at: Option<Instant>) -> Sleep {
    sleep_until(at.unwrap_or_else(Instant::now))
}
