//! Submission dialog: binds file picking, drag-and-drop and the submit/cancel
//! buttons to the upload simulator, gated by the submission policy.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use shared::{
    domain::{AssignmentId, Submission},
    protocol::{DialogSnapshot, UploadEvent, UploadPhase},
};
use storage::ContentStore;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{
    policy,
    upload::{CompletionHook, UploadSimulator},
    AssignmentBackend, CoreError, StagedFile, UploadSettings,
};

pub struct SubmissionDialog {
    assignment_id: AssignmentId,
    backend: Arc<dyn AssignmentBackend>,
    simulator: Arc<UploadSimulator>,
    open: Arc<AtomicBool>,
    drag_over: bool,
    input_generation: Arc<AtomicU64>,
}

impl SubmissionDialog {
    pub fn new(
        assignment_id: AssignmentId,
        backend: Arc<dyn AssignmentBackend>,
        content: Arc<dyn ContentStore>,
        settings: UploadSettings,
    ) -> Self {
        let open = Arc::new(AtomicBool::new(false));
        let input_generation = Arc::new(AtomicU64::new(0));
        let close_on_complete = Arc::clone(&open);
        let reset_input = Arc::clone(&input_generation);
        let on_complete: CompletionHook = Box::new(move |_: &Submission| {
            close_on_complete.store(false, Ordering::SeqCst);
            reset_input.fetch_add(1, Ordering::SeqCst);
        });
        let simulator = UploadSimulator::with_completion_hook(
            assignment_id.clone(),
            settings,
            Arc::clone(&backend),
            content,
            Some(on_complete),
        );

        Self {
            assignment_id,
            backend,
            simulator,
            open,
            drag_over: false,
            input_generation,
        }
    }

    pub fn assignment_id(&self) -> &AssignmentId {
        &self.assignment_id
    }

    pub fn simulator(&self) -> &Arc<UploadSimulator> {
        &self.simulator
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.simulator.subscribe()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn input_generation(&self) -> u64 {
        self.input_generation.load(Ordering::SeqCst)
    }

    /// Reads the current record every time; nothing is cached between calls.
    pub async fn can_submit(&self) -> Result<bool, CoreError> {
        let record = self.backend.get_assignment(&self.assignment_id).await?;
        Ok(policy::can_submit(&record))
    }

    pub async fn open(&mut self) -> Result<(), CoreError> {
        if !self.can_submit().await? {
            return Err(CoreError::SubmissionClosed {
                id: self.assignment_id.clone(),
            });
        }
        debug!(assignment_id = %self.assignment_id, "dialog: opened");
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub async fn select_file(&mut self, file: StagedFile) -> Result<(), CoreError> {
        self.drag_over = false;
        self.simulator.select(file, self.input_generation()).await
    }

    /// Highlights the drop zone; only while nothing is staged or uploading.
    pub async fn drag_enter(&mut self) -> bool {
        self.drag_over = self.simulator.phase().await == UploadPhase::Idle;
        self.drag_over
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// Returns false when the drop was ignored because an upload is running.
    pub async fn drop_file(&mut self, file: StagedFile) -> Result<bool, CoreError> {
        self.drag_over = false;
        if self.simulator.phase().await == UploadPhase::Uploading {
            debug!(assignment_id = %self.assignment_id, "dialog: drop ignored during upload");
            return Ok(false);
        }
        self.simulator.select(file, self.input_generation()).await?;
        Ok(true)
    }

    /// Back to Idle. Bumps the input generation so picking the same file again
    /// registers as a new selection.
    pub async fn clear_selection(&mut self) {
        self.simulator.cancel().await;
        self.drag_over = false;
        self.input_generation.fetch_add(1, Ordering::SeqCst);
    }

    /// No-op without a staged file or while uploading.
    pub async fn start_upload(&mut self) -> Result<bool, CoreError> {
        if self.simulator.phase().await != UploadPhase::Selected {
            return Ok(false);
        }
        if !self.can_submit().await? {
            return Err(CoreError::SubmissionClosed {
                id: self.assignment_id.clone(),
            });
        }
        Ok(self.simulator.start().await)
    }

    /// Always resets, even mid-upload, so the dialog reopens clean.
    pub async fn close(&mut self) {
        self.clear_selection().await;
        if self.open.swap(false, Ordering::SeqCst) {
            info!(assignment_id = %self.assignment_id, "dialog: closed");
        }
    }

    pub async fn snapshot(&self) -> DialogSnapshot {
        let status = self.simulator.status().await;
        DialogSnapshot {
            open: self.is_open(),
            phase: status.phase,
            staged_file: status.staged_file,
            progress: status.progress,
            drag_over: self.drag_over,
            input_generation: self.input_generation(),
        }
    }
}

#[cfg(test)]
#[path = "tests/dialog_tests.rs"]
mod tests;
