use std::{collections::HashMap, sync::Arc};

use shared::{
    domain::{AssignmentId, AssignmentRecord, AssignmentStatus, Submission},
    error::{ApiError, ErrorCode},
};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub mod content;
pub mod seed;

pub use content::{ContentStore, MemoryContentStore, StoredContent};
pub use seed::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("assignment {id} not found")]
    NotFound { id: AssignmentId },
    #[error("assignment {id} already holds its {allowed} allowed submission(s)")]
    QuotaExceeded { id: AssignmentId, allowed: u32 },
    #[error("invalid assignment record: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NotFound { .. } => ErrorCode::NotFound,
            StoreError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            StoreError::Validation(_) => ErrorCode::Validation,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}

/// Session-scoped assignment records. `append_submission` is the only mutation.
#[derive(Clone, Default)]
pub struct AssignmentStore {
    records: Arc<RwLock<HashMap<AssignmentId, AssignmentRecord>>>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(
        records: impl IntoIterator<Item = AssignmentRecord>,
    ) -> Result<Self, StoreError> {
        let mut by_id = HashMap::new();
        for record in records {
            validate_record(&record)?;
            if by_id.contains_key(&record.id) {
                return Err(StoreError::Validation(format!(
                    "duplicate assignment id {}",
                    record.id
                )));
            }
            by_id.insert(record.id.clone(), record);
        }

        Ok(Self {
            records: Arc::new(RwLock::new(by_id)),
        })
    }

    pub fn seeded() -> Result<Self, StoreError> {
        Self::from_records(seed::seed_assignments()?)
    }

    pub async fn get(&self, id: &AssignmentId) -> Result<AssignmentRecord, StoreError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    pub async fn list(&self) -> Vec<AssignmentRecord> {
        let mut records = self
            .records
            .read()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Appends under the write lock and moves the record into grading.
    /// A full quota leaves the record untouched.
    pub async fn append_submission(
        &self,
        id: &AssignmentId,
        submission: Submission,
    ) -> Result<AssignmentRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;

        if record.quota_reached() {
            warn!(
                assignment_id = %id,
                allowed = record.allowed_submissions,
                "append refused: submission quota already reached"
            );
            return Err(StoreError::QuotaExceeded {
                id: id.clone(),
                allowed: record.allowed_submissions,
            });
        }

        info!(
            assignment_id = %id,
            submission_id = %submission.id,
            file_name = %submission.file_name,
            size_bytes = submission.size_bytes,
            "submission recorded"
        );
        record.submissions.push(submission);
        record.status = AssignmentStatus::Grading;
        Ok(record.clone())
    }
}

pub fn validate_record(record: &AssignmentRecord) -> Result<(), StoreError> {
    if record.id.as_str().trim().is_empty() {
        return Err(StoreError::Validation("assignment id is empty".into()));
    }
    if record.submission_count() > record.allowed_submissions {
        return Err(StoreError::Validation(format!(
            "assignment {} holds {} submissions but allows {}",
            record.id,
            record.submissions.len(),
            record.allowed_submissions
        )));
    }
    if let Some(grade) = record.grade_percent {
        if grade > 100 {
            return Err(StoreError::Validation(format!(
                "assignment {} grade {grade} is outside 0..=100",
                record.id
            )));
        }
    }
    if record.start_at > record.deadline_at {
        return Err(StoreError::Validation(format!(
            "assignment {} starts after its deadline",
            record.id
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
