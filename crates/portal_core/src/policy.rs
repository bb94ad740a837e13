use shared::domain::{AssignmentRecord, AssignmentStatus};

/// Open for submissions and quota left. Quota alone never grants permission.
pub fn can_submit(record: &AssignmentRecord) -> bool {
    denial_reason(record).is_none()
}

pub fn denial_reason(record: &AssignmentRecord) -> Option<&'static str> {
    match record.status {
        AssignmentStatus::Grading => Some("submission disabled during grading"),
        AssignmentStatus::Closed => Some("assignment is closed"),
        AssignmentStatus::Open if record.quota_reached() => Some("submission limit reached"),
        AssignmentStatus::Open => None,
    }
}

#[cfg(test)]
#[path = "tests/policy_tests.rs"]
mod tests;
