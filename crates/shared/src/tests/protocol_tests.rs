use super::*;

use chrono::TimeZone;
use serde_json::json;

fn record() -> AssignmentRecord {
    AssignmentRecord {
        id: AssignmentId::new("cs201-queue-sim"),
        title: "Queue Simulation".into(),
        course_code: CourseCode::new("CS201"),
        module_title: "Stacks & Queues".into(),
        instructions: vec!["Implement a circular queue.".into()],
        start_at: Utc.with_ymd_and_hms(2025, 8, 10, 0, 0, 0).unwrap(),
        deadline_at: Utc.with_ymd_and_hms(2025, 8, 24, 23, 59, 0).unwrap(),
        allowed_submissions: 1,
        submissions: Vec::new(),
        status: AssignmentStatus::Open,
        grade_percent: None,
        class_submission_count: Some(97),
    }
}

#[test]
fn view_reflects_submissions_and_status() {
    let mut record = record();
    let empty = AssignmentView::from_record(&record, true);
    assert!(!empty.has_submission);
    assert_eq!(empty.status_label, "Open");

    record.submissions.push(Submission {
        id: SubmissionId::generate(),
        file_name: "hw.zip".into(),
        size_bytes: 2_097_152,
        submitted_at: Utc.with_ymd_and_hms(2025, 8, 20, 9, 0, 0).unwrap(),
        file_url: None,
    });
    record.status = AssignmentStatus::Grading;
    let view = AssignmentView::from_record(&record, false);
    assert!(view.has_submission);
    assert!(!view.can_submit);
    assert_eq!(view.status_label, "Grading period");
    assert_eq!(view.submissions[0].size_pretty, "2.0 MB");
}

#[test]
fn upload_events_are_tagged_snake_case() {
    let event = UploadEvent::Progress {
        assignment_id: AssignmentId::new("cs201-queue-sim"),
        percent: 21,
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({
            "type": "progress",
            "payload": { "assignment_id": "cs201-queue-sim", "percent": 21 }
        })
    );

    let rejected: UploadEvent = serde_json::from_value(json!({
        "type": "rejected",
        "payload": {
            "assignment_id": "cs201-queue-sim",
            "code": "quota_exceeded",
            "message": "submission limit reached"
        }
    }))
    .unwrap();
    assert!(matches!(
        rejected,
        UploadEvent::Rejected { code: ErrorCode::QuotaExceeded, .. }
    ));
}

#[test]
fn snapshot_omits_missing_staged_file() {
    let snapshot = DialogSnapshot {
        open: true,
        phase: UploadPhase::Idle,
        staged_file: None,
        progress: 0,
        drag_over: false,
        input_generation: 2,
    };
    let value = serde_json::to_value(&snapshot).unwrap();
    assert!(value.get("staged_file").is_none());
    assert_eq!(value["phase"], "idle");
}

#[test]
fn error_codes_cover_only_reported_failures() {
    let codes = [
        ErrorCode::NotFound,
        ErrorCode::QuotaExceeded,
        ErrorCode::SubmissionClosed,
        ErrorCode::Busy,
        ErrorCode::Validation,
    ];
    let wire = codes
        .iter()
        .map(|code| serde_json::to_value(code).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        wire,
        vec![
            json!("not_found"),
            json!("quota_exceeded"),
            json!("submission_closed"),
            json!("busy"),
            json!("validation")
        ]
    );
    assert!(serde_json::from_value::<ErrorCode>(json!("internal")).is_err());
}
