//! Simulated upload: a progress value that advances on a timer and, on reaching
//! 100, records the staged file as a submission exactly once.
//!
//! All transitions happen under one lock. Every tick carries the run it was
//! spawned for, so a tick that races a cancel or a restart finds a different run
//! and changes nothing.

use std::{
    mem,
    ops::ControlFlow,
    sync::{Arc, Weak},
};

use chrono::Utc;
use shared::{
    domain::{AssignmentId, Submission, SubmissionId},
    protocol::{StagedFileSummary, UploadEvent, UploadPhase},
};
use storage::{ContentStore, StoreError};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

use crate::{ticker::RepeatingTask, AssignmentBackend, CoreError, StagedFile, UploadSettings};

const EVENT_CAPACITY: usize = 64;

pub type CompletionHook = Box<dyn Fn(&Submission) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is uploading, or the tick belonged to a run that already ended.
    Inactive,
    Advanced(u8),
    Completed(Submission),
    Rejected(StoreError),
}

/// Phase, staged file and progress read under a single lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    pub phase: UploadPhase,
    pub staged_file: Option<StagedFileSummary>,
    pub progress: u8,
}

#[derive(Debug, Clone)]
struct Staged {
    file: StagedFile,
    generation: u64,
}

impl Staged {
    fn summary(&self) -> StagedFileSummary {
        StagedFileSummary {
            file_name: self.file.file_name.clone(),
            size_bytes: self.file.size_bytes,
            generation: self.generation,
        }
    }
}

enum UploadState {
    Idle,
    Selected(Staged),
    Uploading {
        staged: Staged,
        progress: u8,
        run: u64,
    },
}

struct Inner {
    state: UploadState,
    runs: u64,
    ticker: Option<RepeatingTask>,
}

impl Inner {
    fn phase(&self) -> UploadPhase {
        match self.state {
            UploadState::Idle => UploadPhase::Idle,
            UploadState::Selected(_) => UploadPhase::Selected,
            UploadState::Uploading { .. } => UploadPhase::Uploading,
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

pub struct UploadSimulator {
    assignment_id: AssignmentId,
    settings: UploadSettings,
    backend: Arc<dyn AssignmentBackend>,
    content: Arc<dyn ContentStore>,
    on_complete: Option<CompletionHook>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<UploadEvent>,
}

impl UploadSimulator {
    pub fn new(
        assignment_id: AssignmentId,
        settings: UploadSettings,
        backend: Arc<dyn AssignmentBackend>,
        content: Arc<dyn ContentStore>,
    ) -> Arc<Self> {
        Self::with_completion_hook(assignment_id, settings, backend, content, None)
    }

    pub fn with_completion_hook(
        assignment_id: AssignmentId,
        settings: UploadSettings,
        backend: Arc<dyn AssignmentBackend>,
        content: Arc<dyn ContentStore>,
        on_complete: Option<CompletionHook>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            assignment_id,
            settings,
            backend,
            content,
            on_complete,
            inner: Mutex::new(Inner {
                state: UploadState::Idle,
                runs: 0,
                ticker: None,
            }),
            events,
        })
    }

    pub fn assignment_id(&self) -> &AssignmentId {
        &self.assignment_id
    }

    pub fn settings(&self) -> UploadSettings {
        self.settings
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.events.subscribe()
    }

    pub async fn phase(&self) -> UploadPhase {
        self.inner.lock().await.phase()
    }

    pub async fn progress(&self) -> u8 {
        match self.inner.lock().await.state {
            UploadState::Uploading { progress, .. } => progress,
            _ => 0,
        }
    }

    pub async fn staged_file(&self) -> Option<StagedFileSummary> {
        match &self.inner.lock().await.state {
            UploadState::Idle => None,
            UploadState::Selected(staged) | UploadState::Uploading { staged, .. } => {
                Some(staged.summary())
            }
        }
    }

    pub async fn status(&self) -> UploadStatus {
        let inner = self.inner.lock().await;
        let (staged_file, progress) = match &inner.state {
            UploadState::Idle => (None, 0),
            UploadState::Selected(staged) => (Some(staged.summary()), 0),
            UploadState::Uploading {
                staged, progress, ..
            } => (Some(staged.summary()), *progress),
        };
        UploadStatus {
            phase: inner.phase(),
            staged_file,
            progress,
        }
    }

    pub async fn is_ticking(&self) -> bool {
        self.inner
            .lock()
            .await
            .ticker
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }

    /// Stages `file`, replacing any earlier pick. Refused while uploading.
    pub async fn select(&self, file: StagedFile, generation: u64) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        if matches!(inner.state, UploadState::Uploading { .. }) {
            return Err(CoreError::Busy);
        }

        info!(
            assignment_id = %self.assignment_id,
            file_name = %file.file_name,
            size_bytes = file.size_bytes,
            generation,
            "upload: file staged"
        );
        let _ = self.events.send(UploadEvent::Selected {
            assignment_id: self.assignment_id.clone(),
            file_name: file.file_name.clone(),
            size_bytes: file.size_bytes,
        });
        inner.state = UploadState::Selected(Staged { file, generation });
        Ok(())
    }

    /// Selected -> Uploading. Returns false from any other state.
    pub async fn start(self: &Arc<Self>) -> bool {
        let mut inner = self.inner.lock().await;
        let staged = match mem::replace(&mut inner.state, UploadState::Idle) {
            UploadState::Selected(staged) => staged,
            other => {
                inner.state = other;
                return false;
            }
        };

        inner.runs += 1;
        let run = inner.runs;
        info!(
            assignment_id = %self.assignment_id,
            file_name = %staged.file.file_name,
            run,
            "upload: started"
        );
        inner.state = UploadState::Uploading {
            staged,
            progress: 0,
            run,
        };
        inner.stop_ticker();
        inner.ticker = Some(self.spawn_ticker(run));
        let _ = self.events.send(UploadEvent::Started {
            assignment_id: self.assignment_id.clone(),
        });
        true
    }

    /// Drops the staged file and any partial progress. The tick source is stopped
    /// before this returns; nothing is recorded.
    pub async fn cancel(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.stop_ticker();
        let previous = mem::replace(&mut inner.state, UploadState::Idle);
        match previous {
            UploadState::Idle => false,
            UploadState::Selected(_) => {
                debug!(assignment_id = %self.assignment_id, "upload: selection cleared");
                let _ = self.events.send(UploadEvent::Cancelled {
                    assignment_id: self.assignment_id.clone(),
                });
                true
            }
            UploadState::Uploading { progress, run, .. } => {
                info!(
                    assignment_id = %self.assignment_id,
                    run,
                    progress,
                    "upload: cancelled mid-flight"
                );
                let _ = self.events.send(UploadEvent::Cancelled {
                    assignment_id: self.assignment_id.clone(),
                });
                true
            }
        }
    }

    /// Advances the current run by one increment.
    pub async fn tick(&self) -> TickOutcome {
        self.advance(None).await
    }

    fn spawn_ticker(self: &Arc<Self>, run: u64) -> RepeatingTask {
        let simulator: Weak<Self> = Arc::downgrade(self);
        RepeatingTask::spawn(self.settings.tick_interval, move || {
            let simulator = simulator.clone();
            async move {
                let Some(simulator) = simulator.upgrade() else {
                    return ControlFlow::Break(());
                };
                match simulator.advance(Some(run)).await {
                    TickOutcome::Advanced(_) => ControlFlow::Continue(()),
                    _ => ControlFlow::Break(()),
                }
            }
        })
    }

    async fn advance(&self, expected_run: Option<u64>) -> TickOutcome {
        let mut inner = self.inner.lock().await;
        let increment = self.settings.increment;
        let percent = match &mut inner.state {
            UploadState::Uploading { progress, run, .. }
                if expected_run.map_or(true, |expected| expected == *run) =>
            {
                *progress = progress.saturating_add(increment).min(100);
                *progress
            }
            _ => return TickOutcome::Inactive,
        };

        debug!(assignment_id = %self.assignment_id, percent, "upload: progress");
        let _ = self.events.send(UploadEvent::Progress {
            assignment_id: self.assignment_id.clone(),
            percent,
        });
        if percent < 100 {
            return TickOutcome::Advanced(percent);
        }

        let UploadState::Uploading { staged, run, .. } =
            mem::replace(&mut inner.state, UploadState::Idle)
        else {
            return TickOutcome::Inactive;
        };
        // A step driven by the ticker runs on the ticker's own task: let it finish
        // instead of aborting it. Manual ticks stop the background task outright.
        if let Some(ticker) = inner.ticker.take() {
            if expected_run.is_some() {
                ticker.detach();
            } else {
                ticker.cancel();
            }
        }

        self.complete(staged, run).await
    }

    async fn complete(&self, staged: Staged, run: u64) -> TickOutcome {
        let file = staged.file;
        let file_url = self
            .content
            .create(&file.file_name, Arc::clone(&file.bytes))
            .await;
        let submission = Submission {
            id: SubmissionId::generate(),
            file_name: file.file_name,
            size_bytes: file.size_bytes,
            submitted_at: Utc::now(),
            file_url: Some(file_url),
        };

        match self
            .backend
            .append_submission(&self.assignment_id, submission.clone())
            .await
        {
            Ok(record) => {
                info!(
                    assignment_id = %self.assignment_id,
                    submission_id = %submission.id,
                    run,
                    submissions = record.submissions.len(),
                    allowed = record.allowed_submissions,
                    "upload: completed"
                );
                if let Some(hook) = &self.on_complete {
                    hook(&submission);
                }
                let _ = self.events.send(UploadEvent::Completed {
                    assignment_id: self.assignment_id.clone(),
                    submission: submission.clone(),
                });
                TickOutcome::Completed(submission)
            }
            Err(err) => {
                error!(
                    assignment_id = %self.assignment_id,
                    run,
                    error = %err,
                    "upload: completed but the store refused the submission; policy and store disagree"
                );
                self.content.release(file_url).await;
                let _ = self.events.send(UploadEvent::Rejected {
                    assignment_id: self.assignment_id.clone(),
                    code: err.code(),
                    message: err.to_string(),
                });
                TickOutcome::Rejected(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
