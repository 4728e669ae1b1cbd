//! Keeps the record and the markup in step.
//!
//! A user edit on one side starts that side's debounce timer and cancels the
//! other side's. When a timer fires the controller checks who edited last,
//! then regenerates the markup from the record (visual edits) or parses the
//! record out of the markup (code edits). Its own writes are tagged
//! [`Origin::Sync`] and never schedule another pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant, Sleep};
use tracing::{debug, info, warn};

use crate::latex::parse;
use crate::models::document::EditSource;
use crate::templates;
use crate::workspace::{Origin, Workspace, WorkspaceEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub visual_debounce: Duration,
    pub code_debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            visual_debounce: Duration::from_millis(300),
            code_debounce: Duration::from_millis(500),
        }
    }
}

/// Subscribes to the workspace and runs the controller until the bus closes.
pub fn spawn(workspace: Arc<Workspace>, config: SyncConfig) -> JoinHandle<()> {
    let events = workspace.subscribe();
    tokio::spawn(run(workspace, events, config))
}

async fn run(
    workspace: Arc<Workspace>,
    mut events: broadcast::Receiver<WorkspaceEvent>,
    config: SyncConfig,
) {
    info!(
        visual_ms = config.visual_debounce.as_millis() as u64,
        code_ms = config.code_debounce.as_millis() as u64,
        "sync controller started"
    );
    let mut visual: Option<Instant> = None;
    let mut code: Option<Instant> = None;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(WorkspaceEvent::RecordChanged(Origin::User)) => {
                    if workspace.last_edited_by().await == EditSource::Visual {
                        workspace.mark_syncing().await;
                        visual = Some(Instant::now() + config.visual_debounce);
                        code = None;
                    }
                }
                Ok(WorkspaceEvent::MarkupChanged(Origin::User)) => {
                    if workspace.last_edited_by().await == EditSource::Code {
                        workspace.mark_syncing().await;
                        code = Some(Instant::now() + config.code_debounce);
                        visual = None;
                    }
                }
                Ok(WorkspaceEvent::Mounted | WorkspaceEvent::Reset { .. }) => {
                    let cancelled = [visual.take(), code.take()];
                    if cancelled.iter().any(Option::is_some) {
                        debug!("pending sync cancelled by mount or reset");
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "sync controller lagged behind workspace events");
                }
                Err(RecvError::Closed) => break,
            },
            _ = deadline(visual), if visual.is_some() => {
                visual = None;
                regenerate_markup(&workspace).await;
            }
            _ = deadline(code), if code.is_some() => {
                code = None;
                reparse_record(&workspace).await;
            }
        }
    }
    info!("sync controller stopped");
}

fn deadline(at: Option<Instant>) -> Sleep {
    sleep_until(at.unwrap_or_else(Instant::now))
}

async fn regenerate_markup(workspace: &Workspace) {
    let snapshot = workspace.snapshot().await;
    if snapshot.sync.last_edited_by != EditSource::Visual {
        debug!("markup edited since; skipping regeneration");
        return;
    }
    match templates::generate(&snapshot.record, &snapshot.markup.template_id) {
        Ok(markup) => {
            let bytes = markup.len();
            if workspace.write_synced_markup(markup).await {
                debug!(bytes, "markup regenerated from record");
            }
        }
        Err(e) => {
            warn!("could not regenerate markup: {e}");
            workspace
                .mark_sync_failed(format!("Could not update the LaTeX source: {e}"))
                .await;
        }
    }
}

async fn reparse_record(workspace: &Workspace) {
    let snapshot = workspace.snapshot().await;
    if snapshot.sync.last_edited_by != EditSource::Code {
        debug!("record edited since; skipping parse");
        return;
    }
    match parse(&snapshot.markup.source) {
        Ok(record) => {
            let experience = record.experience.len();
            if workspace.write_synced_record(record).await {
                debug!(experience, "record parsed from markup");
            }
        }
        Err(e) => {
            warn!("could not parse markup: {e}");
            workspace
                .mark_sync_failed(format!("Could not read the LaTeX source: {e}"))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::SyncStatus;
    use crate::models::resume::ResumeRecord;
    use crate::workspace::TemplateChoice;
    use tokio::time::sleep;

    const MARKUP: &str = "\\documentclass{article}\n\\begin{document}\n{\\Huge Noor Haddad}\n\\section*{Skills}\n\\textbf{Tools:} Git, Make\n\\end{document}\n";

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn named(name: &str) -> ResumeRecord {
        let mut record = ResumeRecord::default();
        record.personal_info.name = name.to_string();
        record
    }

    fn start() -> Arc<Workspace> {
        let workspace = Arc::new(Workspace::new("classic"));
        spawn(workspace.clone(), SyncConfig::default());
        workspace
    }

    #[tokio::test(start_paused = true)]
    async fn test_visual_edit_regenerates_after_debounce() {
        let workspace = start();
        workspace.set_record(named("Sam Lee")).await;

        sleep(ms(299)).await;
        let snapshot = workspace.snapshot().await;
        assert!(snapshot.markup.source.is_empty());
        assert_eq!(snapshot.sync.sync_status, SyncStatus::Syncing);

        sleep(ms(2)).await;
        let snapshot = workspace.snapshot().await;
        assert!(snapshot.markup.source.contains("Sam Lee"));
        assert_eq!(snapshot.sync.sync_status, SyncStatus::Synced);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_edit_restarts_the_timer() {
        let workspace = start();
        workspace.set_record(named("First")).await;
        sleep(ms(200)).await;
        workspace.set_record(named("Second")).await;
        sleep(ms(200)).await;
        assert!(workspace.markup().await.source.is_empty());
        sleep(ms(150)).await;
        let source = workspace.markup().await.source;
        assert!(source.contains("Second"));
        assert!(!source.contains("First"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_code_edit_parses_after_debounce() {
        let workspace = start();
        workspace.set_markup(MARKUP.to_string()).await;

        sleep(ms(499)).await;
        assert!(workspace.record().await.is_blank());

        sleep(ms(2)).await;
        let record = workspace.record().await;
        assert_eq!(record.personal_info.name, "Noor Haddad");
        assert_eq!(record.skills[0].skills, vec!["Git", "Make"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_own_writes_do_not_echo() {
        let workspace = start();
        workspace.set_record(named("Sam Lee")).await;
        sleep(ms(350)).await;
        let after_sync = workspace.record().await;

        // A parse pass would replace the record with fresh ids.
        workspace.set_record({
            let mut record = after_sync.clone();
            record.skills.push(crate::models::resume::SkillCategory::new("Tools", &["Git"]));
            record
        })
        .await;
        let ids: Vec<String> = workspace.record().await.skills.iter().map(|s| s.id.clone()).collect();
        sleep(ms(2_000)).await;
        let later: Vec<String> = workspace.record().await.skills.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, later);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_edit_wins_inside_one_window() {
        let workspace = start();
        workspace.set_record(named("Visual Name")).await;
        sleep(ms(100)).await;
        workspace.set_markup(MARKUP.to_string()).await;
        sleep(ms(1_000)).await;

        let snapshot = workspace.snapshot().await;
        assert_eq!(snapshot.markup.source, MARKUP);
        assert_eq!(snapshot.record.personal_info.name, "Noor Haddad");
    }

    #[tokio::test(start_paused = true)]
    async fn test_parse_failure_keeps_record() {
        let workspace = start();
        workspace.set_record(named("Kept")).await;
        sleep(ms(400)).await;
        workspace.set_markup("just some notes".to_string()).await;
        sleep(ms(600)).await;

        let snapshot = workspace.snapshot().await;
        assert_eq!(snapshot.record.personal_info.name, "Kept");
        assert_eq!(snapshot.sync.sync_status, SyncStatus::Error);
        assert!(snapshot.sync.last_error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_cancels_pending_pass() {
        let workspace = start();
        workspace.set_markup(MARKUP.to_string()).await;
        sleep(ms(100)).await;
        workspace
            .change_template("minimal", Some(TemplateChoice::LoadExample))
            .await
            .unwrap();
        sleep(ms(1_000)).await;

        let snapshot = workspace.snapshot().await;
        assert_eq!(snapshot.record.personal_info.name, "Elena Novak");
        assert!(snapshot.markup.source.contains("Elena Novak"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_pass() {
        let workspace = start();
        workspace.set_markup(MARKUP.to_string()).await;
        sleep(ms(100)).await;
        workspace.reset().await;
        sleep(ms(1_000)).await;

        let snapshot = workspace.snapshot().await;
        assert!(snapshot.record.is_blank());
        assert!(snapshot.markup.source.is_empty());
        assert_eq!(snapshot.sync.last_edited_by, EditSource::None);
    }
}
