use crate::backend::{AutomationBackend, AutomationId};
use anyhow::Result;
use std::sync::Arc;
use step_canvas::persistence::{AutomationStatus, LoadReport};
use step_canvas::{Builder, BuilderConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("automation has not been saved yet")]
    NotSaved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A non-blocking notification for the editor shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// One open automation together with the backend it is persisted to.
///
/// Backend failures never touch the graph: they are reported as [`Notice`]s and
/// the user keeps their edits so the action can be retried.
pub struct EditorSession<B: AutomationBackend> {
    pub builder: Builder,
    backend: Arc<B>,
    saved_id: Option<AutomationId>,
    notices: Vec<Notice>,
}

impl<B: AutomationBackend> EditorSession<B> {
    /// Starts a new, unsaved automation.
    pub fn new(backend: Arc<B>, config: BuilderConfig) -> Self {
        Self {
            builder: Builder::new(config),
            backend,
            saved_id: None,
            notices: Vec::new(),
        }
    }

    /// Opens a stored automation.
    pub async fn open(backend: Arc<B>, id: AutomationId, config: BuilderConfig) -> Result<Self> {
        let document = backend.load(id).await?;
        let (builder, report) = Builder::from_document(document, config);
        let mut session = Self {
            builder,
            backend,
            saved_id: Some(id),
            notices: Vec::new(),
        };
        session.report_load(&report);
        Ok(session)
    }

    pub fn saved_id(&self) -> Option<AutomationId> {
        self.saved_id
    }

    /// Sends the current document: created on the first save, updated afterwards.
    pub async fn save(&mut self) -> Result<AutomationId> {
        let document = self.builder.document();
        let result = match self.saved_id {
            None => self.backend.save(document).await,
            Some(id) => self.backend.update(id, document).await.map(|()| id),
        };
        match result {
            Ok(id) => {
                self.saved_id = Some(id);
                tracing::info!(%id, name = %self.builder.meta.name, "automation saved");
                self.notify(NoticeLevel::Info, "Automation saved");
                Ok(id)
            }
            Err(err) => {
                tracing::warn!(error = %err, "save failed");
                self.notify(NoticeLevel::Error, format!("Failed to save automation: {err}"));
                Err(err)
            }
        }
    }

    /// Deletes the stored automation. The graph stays open as an unsaved draft.
    pub async fn delete(&mut self) -> Result<()> {
        let id = self.require_saved()?;
        match self.backend.delete(id).await {
            Ok(()) => {
                self.saved_id = None;
                self.notify(NoticeLevel::Info, "Automation deleted");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "delete failed");
                self.notify(NoticeLevel::Error, format!("Failed to delete automation: {err}"));
                Err(err)
            }
        }
    }

    /// Asks the backend to change the status, mirroring it locally once accepted.
    pub async fn set_status(&mut self, status: AutomationStatus) -> Result<()> {
        let id = self.require_saved()?;
        match self.backend.patch_status(id, status).await {
            Ok(()) => {
                self.builder.apply_remote_status(status);
                self.notify(
                    NoticeLevel::Info,
                    format!("Automation is now {}", status.as_str()),
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "status change failed");
                self.notify(NoticeLevel::Error, format!("Failed to update status: {err}"));
                Err(err)
            }
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn require_saved(&mut self) -> Result<AutomationId> {
        match self.saved_id {
            Some(id) => Ok(id),
            None => {
                self.notify(NoticeLevel::Error, "Save the automation first");
                Err(SessionError::NotSaved.into())
            }
        }
    }

    fn report_load(&mut self, report: &LoadReport) {
        if !report.dropped_steps.is_empty() {
            let ids: Vec<_> = report.dropped_steps.iter().map(|id| id.as_str()).collect();
            self.notify(
                NoticeLevel::Warning,
                format!("Skipped unsupported steps: {}", ids.join(", ")),
            );
        }
        if report.dropped_connections > 0 {
            self.notify(
                NoticeLevel::Warning,
                format!("Removed {} invalid connections", report.dropped_connections),
            );
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }
}
