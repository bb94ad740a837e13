use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        Achievement, AssignmentId, AssignmentRecord, AssignmentStatus, ContentRef, CourseCode,
        CourseModule, Submission, SubmissionId, Term,
    },
    error::ErrorCode,
    format::bytes_pretty,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionView {
    pub id: SubmissionId,
    pub file_name: String,
    pub size_bytes: u64,
    pub size_pretty: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<ContentRef>,
}

impl From<&Submission> for SubmissionView {
    fn from(value: &Submission) -> Self {
        Self {
            id: value.id,
            file_name: value.file_name.clone(),
            size_bytes: value.size_bytes,
            size_pretty: bytes_pretty(value.size_bytes),
            submitted_at: value.submitted_at,
            file_url: value.file_url,
        }
    }
}

/// Everything the assignment page renders, with the derived flags computed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentView {
    pub id: AssignmentId,
    pub title: String,
    pub course_code: CourseCode,
    pub module_title: String,
    pub instructions: Vec<String>,
    pub start_at: DateTime<Utc>,
    pub deadline_at: DateTime<Utc>,
    pub allowed_submissions: u32,
    pub submissions: Vec<SubmissionView>,
    pub status: AssignmentStatus,
    pub status_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_percent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_submission_count: Option<u32>,
    pub has_submission: bool,
    pub can_submit: bool,
}

impl AssignmentView {
    pub fn from_record(record: &AssignmentRecord, can_submit: bool) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            course_code: record.course_code.clone(),
            module_title: record.module_title.clone(),
            instructions: record.instructions.clone(),
            start_at: record.start_at,
            deadline_at: record.deadline_at,
            allowed_submissions: record.allowed_submissions,
            submissions: record.submissions.iter().map(SubmissionView::from).collect(),
            status: record.status,
            status_label: record.status.label().to_string(),
            grade_percent: record.grade_percent,
            class_submission_count: record.class_submission_count,
            has_submission: !record.submissions.is_empty(),
            can_submit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineEntry {
    pub assignment_id: AssignmentId,
    pub title: String,
    pub course_code: CourseCode,
    pub deadline_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleAssignmentLink {
    pub assignment_id: AssignmentId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleView {
    #[serde(flatten)]
    pub module: CourseModule,
    pub assignments: Vec<ModuleAssignmentLink>,
}

/// A weekly slot of an ongoing course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSlot {
    pub course_code: CourseCode,
    pub course_name: String,
    pub schedule: String,
    pub room: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub course_count: usize,
    pub completed_module_count: usize,
    pub active_classmate_count: usize,
    pub classes: Vec<ClassSlot>,
    pub deadlines: Vec<DeadlineEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccomplishedCourse {
    pub code: CourseCode,
    pub name: String,
    pub units: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub student_no: String,
    pub name: String,
    pub school_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    pub year_level: String,
    pub program: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    pub accomplished: Vec<AccomplishedCourse>,
    pub total_units: u32,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    Idle,
    Selected,
    Uploading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFileSummary {
    pub file_name: String,
    pub size_bytes: u64,
    /// Input generation the file was picked in.
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSnapshot {
    pub open: bool,
    pub phase: UploadPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged_file: Option<StagedFileSummary>,
    pub progress: u8,
    pub drag_over: bool,
    pub input_generation: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UploadEvent {
    Selected {
        assignment_id: AssignmentId,
        file_name: String,
        size_bytes: u64,
    },
    Started {
        assignment_id: AssignmentId,
    },
    Progress {
        assignment_id: AssignmentId,
        percent: u8,
    },
    Completed {
        assignment_id: AssignmentId,
        submission: Submission,
    },
    Cancelled {
        assignment_id: AssignmentId,
    },
    Rejected {
        assignment_id: AssignmentId,
        code: ErrorCode,
        message: String,
    },
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
