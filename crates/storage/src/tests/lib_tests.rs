use super::*;
use chrono::{TimeZone, Utc};
use shared::domain::{CourseCode, SubmissionId};

fn record(id: &str, allowed: u32) -> AssignmentRecord {
    AssignmentRecord {
        id: AssignmentId::new(id),
        title: "Queue Simulator".into(),
        course_code: CourseCode::new("CS201"),
        module_title: "Stacks & Queues".into(),
        instructions: vec!["Submit a PDF report + source code.".into()],
        start_at: Utc.with_ymd_and_hms(2025, 8, 5, 8, 0, 0).unwrap(),
        deadline_at: Utc.with_ymd_and_hms(2025, 8, 28, 23, 59, 0).unwrap(),
        allowed_submissions: allowed,
        submissions: Vec::new(),
        status: AssignmentStatus::Open,
        grade_percent: None,
        class_submission_count: None,
    }
}

fn submission(name: &str, size_bytes: u64) -> Submission {
    Submission {
        id: SubmissionId::generate(),
        file_name: name.into(),
        size_bytes,
        submitted_at: Utc::now(),
        file_url: None,
    }
}

#[tokio::test]
async fn get_returns_not_found_for_unknown_id() {
    let store = AssignmentStore::from_records([record("a1", 1)]).expect("store");
    let err = store
        .get(&AssignmentId::new("missing"))
        .await
        .expect_err("unknown id");
    assert_eq!(
        err,
        StoreError::NotFound {
            id: AssignmentId::new("missing")
        }
    );
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn append_grows_submissions_by_one_and_moves_to_grading() {
    let store = AssignmentStore::from_records([record("a1", 2)]).expect("store");
    let id = AssignmentId::new("a1");

    let updated = store
        .append_submission(&id, submission("hw.zip", 500_000))
        .await
        .expect("append");

    assert_eq!(updated.submissions.len(), 1);
    assert_eq!(updated.status, AssignmentStatus::Grading);
    assert_eq!(store.get(&id).await.expect("get"), updated);
}

#[tokio::test]
async fn append_keeps_insertion_order_and_stays_in_grading() {
    let store = AssignmentStore::from_records([record("a1", 3)]).expect("store");
    let id = AssignmentId::new("a1");

    store
        .append_submission(&id, submission("first.zip", 10))
        .await
        .expect("first");
    let updated = store
        .append_submission(&id, submission("second.zip", 20))
        .await
        .expect("second");

    let names = updated
        .submissions
        .iter()
        .map(|s| s.file_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["first.zip", "second.zip"]);
    assert_eq!(updated.status, AssignmentStatus::Grading);
}

#[tokio::test]
async fn append_at_quota_fails_and_leaves_record_unchanged() {
    let store = AssignmentStore::from_records([record("a1", 1)]).expect("store");
    let id = AssignmentId::new("a1");
    store
        .append_submission(&id, submission("hw.zip", 500_000))
        .await
        .expect("first append");
    let before = store.get(&id).await.expect("get");

    let err = store
        .append_submission(&id, submission("late.zip", 1))
        .await
        .expect_err("quota");

    assert_eq!(
        err,
        StoreError::QuotaExceeded {
            id: id.clone(),
            allowed: 1
        }
    );
    assert_eq!(store.get(&id).await.expect("get"), before);
}

#[tokio::test]
async fn append_to_zero_quota_record_is_refused() {
    let store = AssignmentStore::from_records([record("a0", 0)]).expect("store");
    let err = store
        .append_submission(&AssignmentId::new("a0"), submission("x", 1))
        .await
        .expect_err("zero quota");
    assert_eq!(err.code(), ErrorCode::QuotaExceeded);
}

#[tokio::test]
async fn append_to_unknown_id_is_not_found() {
    let store = AssignmentStore::new();
    let err = store
        .append_submission(&AssignmentId::new("nope"), submission("x", 1))
        .await
        .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn rejects_seed_records_that_break_invariants() {
    let mut over_quota = record("a1", 1);
    over_quota.submissions = vec![submission("a", 1), submission("b", 1)];
    assert!(matches!(
        AssignmentStore::from_records([over_quota]),
        Err(StoreError::Validation(_))
    ));

    let mut bad_grade = record("a2", 1);
    bad_grade.grade_percent = Some(101);
    assert!(matches!(
        AssignmentStore::from_records([bad_grade]),
        Err(StoreError::Validation(_))
    ));

    let mut inverted = record("a3", 1);
    std::mem::swap(&mut inverted.start_at, &mut inverted.deadline_at);
    assert!(matches!(
        AssignmentStore::from_records([inverted]),
        Err(StoreError::Validation(_))
    ));

    assert!(matches!(
        AssignmentStore::from_records([record("dup", 1), record("dup", 2)]),
        Err(StoreError::Validation(_))
    ));
}

#[tokio::test]
async fn seeded_store_holds_open_assignments_without_submissions() {
    let store = AssignmentStore::seeded().expect("seed");
    assert_eq!(store.len().await, 9);
    for record in store.list().await {
        assert_eq!(record.status, AssignmentStatus::Open);
        assert!(record.submissions.is_empty());
        assert!(record.allowed_submissions >= 1);
    }
}

#[tokio::test]
async fn store_error_converts_to_api_error() {
    let api: ApiError = StoreError::QuotaExceeded {
        id: AssignmentId::new("a1"),
        allowed: 2,
    }
    .into();
    assert_eq!(api.code, ErrorCode::QuotaExceeded);
    assert!(api.message.contains("a1"));
}

#[tokio::test]
async fn content_references_resolve_until_released() {
    let content = MemoryContentStore::new();
    let bytes: Arc<[u8]> = Arc::from(b"zip-bytes".as_slice());
    let reference = content.create("hw.zip", bytes.clone()).await;

    let stored = content.resolve(reference).await.expect("resolves");
    assert_eq!(stored.file_name, "hw.zip");
    assert_eq!(stored.bytes, bytes);

    assert!(content.release(reference).await);
    assert!(content.resolve(reference).await.is_none());
    assert!(!content.release(reference).await);
    assert!(content.is_empty().await);
}
