use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::domain::{
    AssignmentId, AssignmentRecord, AssignmentStatus, CourseCode, Submission,
};
use storage::{AssignmentStore, MemoryContentStore, StoreError};

use crate::{AssignmentBackend, StagedFile};

pub const ASSIGNMENT: &str = "cs201-queue-sim";

pub fn assignment_id() -> AssignmentId {
    AssignmentId::new(ASSIGNMENT)
}

pub fn record(allowed: u32, status: AssignmentStatus) -> AssignmentRecord {
    AssignmentRecord {
        id: assignment_id(),
        title: "Queue Simulator".into(),
        course_code: CourseCode::new("CS201"),
        module_title: "Stacks & Queues".into(),
        instructions: vec!["Submit a PDF report + source code.".into()],
        start_at: Utc.with_ymd_and_hms(2025, 8, 5, 8, 0, 0).unwrap(),
        deadline_at: Utc.with_ymd_and_hms(2025, 8, 28, 23, 59, 0).unwrap(),
        allowed_submissions: allowed,
        submissions: Vec::new(),
        status,
        grade_percent: None,
        class_submission_count: Some(97),
    }
}

pub fn hw_zip() -> StagedFile {
    StagedFile::new("hw.zip", vec![0_u8; 500_000])
}

/// Wraps the real store and counts append calls.
pub struct CountingBackend {
    pub store: AssignmentStore,
    appends: AtomicUsize,
}

impl CountingBackend {
    pub fn with_record(record: AssignmentRecord) -> Arc<Self> {
        Self::over(AssignmentStore::from_records([record]).expect("store"))
    }

    pub fn over(store: AssignmentStore) -> Arc<Self> {
        Arc::new(Self {
            store,
            appends: AtomicUsize::new(0),
        })
    }

    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssignmentBackend for CountingBackend {
    async fn get_assignment(&self, id: &AssignmentId) -> Result<AssignmentRecord, StoreError> {
        self.store.get(id).await
    }

    async fn append_submission(
        &self,
        id: &AssignmentId,
        submission: Submission,
    ) -> Result<AssignmentRecord, StoreError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.store.append_submission(id, submission).await
    }
}

pub fn content_store() -> Arc<MemoryContentStore> {
    Arc::new(MemoryContentStore::new())
}
