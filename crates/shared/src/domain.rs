use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }
    };
}

macro_rules! uuid_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

string_id_newtype!(AssignmentId);
string_id_newtype!(CourseCode);
uuid_newtype!(SubmissionId);
uuid_newtype!(ContentRef);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Open,
    Grading,
    Closed,
}

impl AssignmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Open => "Open",
            AssignmentStatus::Grading => "Grading period",
            AssignmentStatus::Closed => "Closed",
        }
    }
}

/// One file handed in against an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub file_name: String,
    pub size_bytes: u64,
    /// Set when the upload finishes, not when the file was picked.
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<ContentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    pub title: String,
    pub course_code: CourseCode,
    pub module_title: String,
    pub instructions: Vec<String>,
    pub start_at: DateTime<Utc>,
    pub deadline_at: DateTime<Utc>,
    pub allowed_submissions: u32,
    pub submissions: Vec<Submission>,
    pub status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_percent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_submission_count: Option<u32>,
}

impl AssignmentRecord {
    pub fn submission_count(&self) -> u32 {
        u32::try_from(self.submissions.len()).unwrap_or(u32::MAX)
    }

    pub fn remaining_submissions(&self) -> u32 {
        self.allowed_submissions
            .saturating_sub(self.submission_count())
    }

    pub fn quota_reached(&self) -> bool {
        self.submission_count() >= self.allowed_submissions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub code: CourseCode,
    pub name: String,
    pub professor: String,
    pub schedule: String,
    pub room: String,
    pub units: u8,
    pub status: CourseStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Prelim,
    Midterms,
    Prefinals,
    Finals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    pub course_code: CourseCode,
    pub title: String,
    pub status: ModuleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handout_url: Option<String>,
    pub term: Term,
    pub assignment_ids: Vec<AssignmentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Online,
    Away,
    Offline,
}

impl Presence {
    pub fn label(self) -> &'static str {
        match self {
            Presence::Online => "Available now",
            Presence::Away => "Away",
            Presence::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMessage {
    pub text: String,
    pub from_me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classmate {
    pub name: String,
    pub presence: Presence,
    pub last_online: String,
    pub last_message: LastMessage,
}

/// Final grade on the transcript, as issued by the registrar (e.g. "1.75").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalGrade {
    pub course_code: CourseCode,
    pub term: Term,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub year: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_no: String,
    pub name: String,
    pub school_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    pub year_level: String,
    pub program: String,
    pub final_grades: Vec<FinalGrade>,
    pub achievements: Vec<Achievement>,
}

impl StudentProfile {
    pub fn program_name(&self) -> Option<&'static str> {
        match self.program.as_str() {
            "BSIT" => Some("Bachelor of Science in Information Technology"),
            "BSCS" => Some("Bachelor of Science in Computer Science"),
            _ => None,
        }
    }

    pub fn final_grade(&self, code: &CourseCode) -> Option<&FinalGrade> {
        self.final_grades
            .iter()
            .find(|grade| &grade.course_code == code)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
