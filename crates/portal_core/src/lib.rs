use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::domain::{AssignmentId, AssignmentRecord, Submission};
use storage::{AssignmentStore, StoreError};

pub mod dialog;
pub mod error;
pub mod policy;
pub mod ticker;
pub mod upload;

pub use dialog::SubmissionDialog;
pub use error::CoreError;
pub use ticker::RepeatingTask;
pub use upload::{CompletionHook, TickOutcome, UploadSimulator, UploadStatus};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(160);
pub const DEFAULT_PROGRESS_INCREMENT: u8 = 7;

/// The slice of the assignment store the submission workflow reads and writes.
#[async_trait]
pub trait AssignmentBackend: Send + Sync {
    async fn get_assignment(&self, id: &AssignmentId) -> Result<AssignmentRecord, StoreError>;
    async fn append_submission(
        &self,
        id: &AssignmentId,
        submission: Submission,
    ) -> Result<AssignmentRecord, StoreError>;
}

#[async_trait]
impl AssignmentBackend for AssignmentStore {
    async fn get_assignment(&self, id: &AssignmentId) -> Result<AssignmentRecord, StoreError> {
        self.get(id).await
    }

    async fn append_submission(
        &self,
        id: &AssignmentId,
        submission: Submission,
    ) -> Result<AssignmentRecord, StoreError> {
        AssignmentStore::append_submission(self, id, submission).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSettings {
    pub tick_interval: Duration,
    pub increment: u8,
}

impl UploadSettings {
    /// Clamps the increment to `1..=100` and the interval to at least 1ms.
    pub fn new(tick_interval: Duration, increment: u8) -> Self {
        Self {
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            increment: increment.clamp(1, 100),
        }
    }

    pub fn ticks_to_complete(&self) -> u32 {
        100_u32.div_ceil(u32::from(self.increment))
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL, DEFAULT_PROGRESS_INCREMENT)
    }
}

/// A file picked or dropped into the dialog. Name and size are fixed at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub file_name: String,
    pub size_bytes: u64,
    pub bytes: Arc<[u8]>,
}

impl StagedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            file_name: file_name.into(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
