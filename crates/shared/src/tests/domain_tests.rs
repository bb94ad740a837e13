use super::*;

#[test]
fn string_ids_honour_width_and_alignment() {
    let code = CourseCode::new("CS201");
    assert_eq!(format!("[{code:<8}]"), "[CS201   ]");
    assert_eq!(format!("[{code:>8}]"), "[   CS201]");
    assert_eq!(format!("[{code}]"), "[CS201]");

    let id = AssignmentId::new("cs201-queue-sim");
    assert_eq!(format!("{id:.4}"), "cs20");
}

#[test]
fn status_labels() {
    assert_eq!(AssignmentStatus::Grading.label(), "Grading period");
    assert_eq!(Presence::Online.label(), "Available now");
}

#[test]
fn profile_looks_up_grades_by_course() {
    let profile = StudentProfile {
        student_no: "2025-001234".into(),
        name: "Soytii D.".into(),
        school_email: "soytii.d@university.edu.ph".into(),
        personal_email: None,
        year_level: "4th Year".into(),
        program: "BSIT".into(),
        final_grades: vec![FinalGrade {
            course_code: CourseCode::new("CS210"),
            term: Term::Midterms,
            grade: "1.75".into(),
        }],
        achievements: Vec::new(),
    };
    assert_eq!(
        profile.program_name(),
        Some("Bachelor of Science in Information Technology")
    );
    assert_eq!(
        profile
            .final_grade(&CourseCode::new("CS210"))
            .map(|grade| grade.grade.as_str()),
        Some("1.75")
    );
    assert!(profile.final_grade(&CourseCode::new("CS201")).is_none());
}
