//! The editing session shared by the routes and the background controllers.
//!
//! A [`Workspace`] owns the structured record, the markup, the sync metadata and
//! the preview state behind one lock, and announces every change on a broadcast
//! bus. Writers never call the controllers directly: the sync and compile
//! controllers subscribe and react to [`WorkspaceEvent`]s.

pub mod edits;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::models::document::{
    EditSource, MarkupDocument, PdfHandle, PdfState, SyncMetadata, SyncStatus,
};
use crate::models::resume::ResumeRecord;
use crate::templates::{self, GenerationError};
use edits::{EditError, RecordEdit};

const EVENT_CAPACITY: usize = 64;

/// Who wrote a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A user edit through the API.
    User,
    /// The sync controller mirroring the other side.
    Sync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceEvent {
    RecordChanged(Origin),
    MarkupChanged(Origin),
    /// Both sides were replaced at once (load or template switch).
    /// Pending sync work is void; the new markup still needs compiling.
    Mounted,
    /// Both sides were emptied and the preview cleared. `released` is the PDF
    /// that was on show, for the compile controller to drop.
    Reset { released: Option<PdfHandle> },
    /// Compile now, even if the markup was compiled before.
    CompileRequested,
}

/// Everything a client needs to render the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub record: ResumeRecord,
    pub markup: MarkupDocument,
    pub sync: SyncMetadata,
    pub pdf: PdfState,
}

/// How to treat the current record when switching templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateChoice {
    LoadExample,
    KeepData,
}

#[derive(Debug, Error)]
pub enum TemplateChangeError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("the resume has content; choose loadExample or keepData")]
    ChoiceRequired,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub struct Workspace {
    state: RwLock<Snapshot>,
    events: broadcast::Sender<WorkspaceEvent>,
}

impl Workspace {
    pub fn new(template_id: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let snapshot = Snapshot {
            markup: MarkupDocument {
                source: String::new(),
                template_id: templates::lookup(template_id).id.to_string(),
            },
            ..Snapshot::default()
        };
        Self {
            state: RwLock::new(snapshot),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    pub async fn record(&self) -> ResumeRecord {
        self.state.read().await.record.clone()
    }

    pub async fn markup(&self) -> MarkupDocument {
        self.state.read().await.markup.clone()
    }

    pub async fn last_edited_by(&self) -> EditSource {
        self.state.read().await.sync.last_edited_by
    }

    pub async fn pdf(&self) -> PdfState {
        self.state.read().await.pdf.clone()
    }

    // ── User writes ─────────────────────────────────────────────────────────

    /// Replaces the record as a visual edit.
    pub async fn set_record(&self, mut record: ResumeRecord) {
        record.normalize();
        {
            let mut state = self.state.write().await;
            state.record = record;
            state.sync.touch(EditSource::Visual);
        }
        self.emit(WorkspaceEvent::RecordChanged(Origin::User));
    }

    /// Replaces the markup as a code edit.
    pub async fn set_markup(&self, source: String) {
        {
            let mut state = self.state.write().await;
            state.markup.source = source;
            state.sync.touch(EditSource::Code);
        }
        self.emit(WorkspaceEvent::MarkupChanged(Origin::User));
    }

    /// Applies one structured edit as a visual edit. A failed edit changes nothing.
    pub async fn edit(&self, edit: RecordEdit) -> Result<(), EditError> {
        {
            let mut state = self.state.write().await;
            edit.apply(&mut state.record)?;
            state.sync.touch(EditSource::Visual);
        }
        self.emit(WorkspaceEvent::RecordChanged(Origin::User));
        Ok(())
    }

    /// Replaces both sides at once, e.g. with an AI-enhanced record and the
    /// markup generated from it.
    pub async fn load(&self, mut record: ResumeRecord, markup: MarkupDocument) {
        record.normalize();
        {
            let mut state = self.state.write().await;
            state.record = record;
            state.markup = markup;
            state.sync = SyncMetadata::default();
        }
        info!("workspace loaded");
        self.emit(WorkspaceEvent::Mounted);
    }

    /// Empties the record, the markup and the preview. The template stays.
    pub async fn reset(&self) {
        let released = {
            let mut state = self.state.write().await;
            state.record = ResumeRecord::default();
            state.markup.source.clear();
            state.sync = SyncMetadata::default();
            std::mem::take(&mut state.pdf).handle
        };
        info!("workspace reset");
        self.emit(WorkspaceEvent::Reset { released });
    }

    /// Switches the active template and regenerates the markup.
    ///
    /// A blank record always takes the template's example. A record with content
    /// needs an explicit `choice`; without one nothing changes.
    pub async fn change_template(
        &self,
        template_id: &str,
        choice: Option<TemplateChoice>,
    ) -> Result<(), TemplateChangeError> {
        if !templates::exists(template_id) {
            return Err(TemplateChangeError::UnknownTemplate(template_id.to_string()));
        }
        let template = templates::lookup(template_id);

        {
            let mut state = self.state.write().await;
            if state.markup.template_id == template.id && choice.is_none() {
                return Ok(());
            }
            let choice = match choice {
                Some(choice) => choice,
                None if state.record.is_blank() => TemplateChoice::LoadExample,
                None => return Err(TemplateChangeError::ChoiceRequired),
            };
            let record = match choice {
                TemplateChoice::LoadExample => (template.example)(),
                TemplateChoice::KeepData => state.record.clone(),
            };
            let markup = templates::generate(&record, template.id)?;

            state.record = record;
            state.markup = MarkupDocument {
                source: markup,
                template_id: template.id.to_string(),
            };
            state.sync = SyncMetadata::default();
            info!(template = template.id, ?choice, "template switched");
        }
        self.emit(WorkspaceEvent::Mounted);
        Ok(())
    }

    pub fn request_compile(&self) {
        self.emit(WorkspaceEvent::CompileRequested);
    }

    // ── Controller writes ───────────────────────────────────────────────────

    pub(crate) async fn mark_syncing(&self) {
        let mut state = self.state.write().await;
        state.sync.sync_status = SyncStatus::Syncing;
    }

    /// Writes markup regenerated from the record. The edit provenance is kept.
    ///
    /// Dropped when the record is no longer the side last edited: a code edit
    /// that landed while the markup was generated must not be overwritten.
    pub(crate) async fn write_synced_markup(&self, source: String) -> bool {
        {
            let mut state = self.state.write().await;
            if state.sync.last_edited_by != EditSource::Visual {
                debug!("markup edited during sync; regenerated markup dropped");
                return false;
            }
            state.markup.source = source;
            settle(&mut state.sync);
        }
        self.emit(WorkspaceEvent::MarkupChanged(Origin::Sync));
        true
    }

    /// Writes a record parsed from the markup. Markup cannot carry the profile
    /// image, so the current one is kept.
    ///
    /// Dropped when the markup is no longer the side last edited.
    pub(crate) async fn write_synced_record(&self, mut record: ResumeRecord) -> bool {
        {
            let mut state = self.state.write().await;
            if state.sync.last_edited_by != EditSource::Code {
                debug!("record edited during sync; parsed record dropped");
                return false;
            }
            record.personal_info.profile_image = state.record.personal_info.profile_image.take();
            record.normalize();
            state.record = record;
            settle(&mut state.sync);
        }
        self.emit(WorkspaceEvent::RecordChanged(Origin::Sync));
        true
    }

    pub(crate) async fn mark_sync_failed(&self, notice: String) {
        let mut state = self.state.write().await;
        state.sync.sync_status = SyncStatus::Error;
        state.sync.last_error = Some(notice);
    }

    pub(crate) async fn update_pdf(&self, update: impl FnOnce(&mut PdfState)) {
        let mut state = self.state.write().await;
        update(&mut state.pdf);
    }

    fn emit(&self, event: WorkspaceEvent) {
        // No subscribers is fine: the workspace works without controllers.
        if self.events.send(event).is_err() {
            debug!(?event, "no workspace subscribers");
        }
    }
}

fn settle(sync: &mut SyncMetadata) {
    sync.sync_status = SyncStatus::Synced;
    sync.last_sync_time = Utc::now();
    sync.dirty = false;
    sync.last_error = None;
}
