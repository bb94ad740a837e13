use shared::domain::{AssignmentId, CourseCode};
use storage::{AssignmentStore, Catalog};

#[tokio::test]
async fn every_module_assignment_exists_in_the_store() {
    let catalog = Catalog::seeded();
    let store = AssignmentStore::seeded().expect("seed");

    for course in catalog.courses() {
        for module in catalog.modules_for(&course.code) {
            for id in &module.assignment_ids {
                let record = store.get(id).await.expect("module assignment seeded");
                assert_eq!(record.course_code, course.code);
                assert_eq!(record.module_title, module.title);
            }
        }
    }
}

#[test]
fn modules_are_scoped_to_their_course() {
    let catalog = Catalog::seeded();
    let code = CourseCode::new("CS201");
    let titles = catalog
        .modules_for(&code)
        .map(|module| module.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Arrays & Lists", "Stacks & Queues", "Trees & Graphs"]);
    assert!(catalog.course(&CourseCode::new("NOPE101")).is_none());
    assert_eq!(catalog.classmates().len(), 4);
}

#[tokio::test]
async fn queue_sim_allows_a_single_submission() {
    let store = AssignmentStore::seeded().expect("seed");
    let record = store
        .get(&AssignmentId::new("cs201-queue-sim"))
        .await
        .expect("queue sim");
    assert_eq!(record.allowed_submissions, 1);
    assert_eq!(record.class_submission_count, Some(97));
}

#[test]
fn seeded_profile_grades_only_enrolled_courses() {
    let catalog = Catalog::seeded();
    let profile = catalog.profile().expect("seeded profile");
    assert_eq!(profile.student_no, "2025-001234");
    assert_eq!(profile.achievements.len(), 3);
    for grade in &profile.final_grades {
        assert!(catalog.course(&grade.course_code).is_some(), "{}", grade.course_code);
    }
    assert!(Catalog::default().profile().is_none());
}
