//! Static data the portal starts every session with.

use chrono::{DateTime, Utc};
use shared::domain::{
    Achievement, AssignmentId, AssignmentRecord, AssignmentStatus, Classmate, Course,
    CourseCode, CourseModule, CourseStatus, FinalGrade, LastMessage, ModuleStatus, Presence,
    StudentProfile, Term,
};

use crate::StoreError;

struct SeedAssignment {
    id: &'static str,
    title: &'static str,
    course: &'static str,
    module: &'static str,
    instructions: &'static [&'static str],
    start_at: &'static str,
    deadline_at: &'static str,
    allowed: u32,
    class_submissions: Option<u32>,
}

const ASSIGNMENTS: &[SeedAssignment] = &[
    SeedAssignment {
        id: "cs201-array-drills",
        title: "Array Drills",
        course: "CS201",
        module: "Arrays & Lists",
        instructions: &[
            "Implement functions to insert, delete, and search in dynamic arrays.",
            "Time each operation and report complexities.",
            "Submit a single .zip with your code and README.",
        ],
        start_at: "2025-08-01T08:00:00Z",
        deadline_at: "2025-08-20T23:59:00Z",
        allowed: 2,
        class_submissions: Some(128),
    },
    SeedAssignment {
        id: "cs201-list-ops",
        title: "List Ops",
        course: "CS201",
        module: "Arrays & Lists",
        instructions: &[
            "Build singly/doubly linked list APIs.",
            "Provide unit tests using your preferred framework.",
        ],
        start_at: "2025-08-03T08:00:00Z",
        deadline_at: "2025-08-25T23:59:00Z",
        allowed: 2,
        class_submissions: Some(123),
    },
    SeedAssignment {
        id: "cs201-queue-sim",
        title: "Queue Simulator",
        course: "CS201",
        module: "Stacks & Queues",
        instructions: &[
            "Simulate queue operations with different scheduling policies.",
            "Record average wait times and throughput.",
            "Submit a PDF report + source code.",
        ],
        start_at: "2025-08-05T08:00:00Z",
        deadline_at: "2025-08-28T23:59:00Z",
        allowed: 1,
        class_submissions: Some(97),
    },
    SeedAssignment {
        id: "cs201-bst-basics",
        title: "BST Basics",
        course: "CS201",
        module: "Trees & Graphs",
        instructions: &[
            "Implement BST insert/search/delete.",
            "Analyze best/worst-case paths.",
        ],
        start_at: "2025-08-10T08:00:00Z",
        deadline_at: "2025-08-30T23:59:00Z",
        allowed: 2,
        class_submissions: Some(76),
    },
    SeedAssignment {
        id: "des110-flex-demo",
        title: "Flex Demo Page",
        course: "DES110",
        module: "Flexbox Layout",
        instructions: &[
            "Create a responsive page using only Flexbox.",
            "Attach a short Loom demo.",
        ],
        start_at: "2025-08-02T08:00:00Z",
        deadline_at: "2025-08-18T23:59:00Z",
        allowed: 3,
        class_submissions: Some(102),
    },
    SeedAssignment {
        id: "des110-color-tokens",
        title: "Color Tokens",
        course: "DES110",
        module: "Color & Contrast",
        instructions: &[
            "Define a color token system.",
            "Show AA/AAA contrast proofs.",
        ],
        start_at: "2025-08-06T08:00:00Z",
        deadline_at: "2025-08-25T23:59:00Z",
        allowed: 2,
        class_submissions: None,
    },
    SeedAssignment {
        id: "cs210-join-practice",
        title: "Join Practice",
        course: "CS210",
        module: "SQL Joins",
        instructions: &["Solve the join kata set.", "Include EXPLAIN plans."],
        start_at: "2025-08-01T08:00:00Z",
        deadline_at: "2025-08-21T23:59:00Z",
        allowed: 2,
        class_submissions: None,
    },
    SeedAssignment {
        id: "cs210-explain-plan",
        title: "Explain Plan",
        course: "CS210",
        module: "Indexes & Query Plans",
        instructions: &[
            "Collect query plans with/without indexes.",
            "Compare costs and latency.",
        ],
        start_at: "2025-08-09T08:00:00Z",
        deadline_at: "2025-08-29T23:59:00Z",
        allowed: 1,
        class_submissions: None,
    },
    SeedAssignment {
        id: "math130-set-proofs-1",
        title: "Set Proofs 1",
        course: "MATH130",
        module: "Set Theory Basics",
        instructions: &[
            "Prove the given set identities.",
            "Submit as a single PDF.",
        ],
        start_at: "2025-08-04T08:00:00Z",
        deadline_at: "2025-08-22T23:59:00Z",
        allowed: 2,
        class_submissions: None,
    },
];

fn parse_instant(id: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|err| StoreError::Validation(format!("assignment {id} timestamp '{raw}': {err}")))
}

pub fn seed_assignments() -> Result<Vec<AssignmentRecord>, StoreError> {
    ASSIGNMENTS
        .iter()
        .map(|seed| {
            Ok(AssignmentRecord {
                id: AssignmentId::new(seed.id),
                title: seed.title.to_string(),
                course_code: CourseCode::new(seed.course),
                module_title: seed.module.to_string(),
                instructions: seed.instructions.iter().map(|s| s.to_string()).collect(),
                start_at: parse_instant(seed.id, seed.start_at)?,
                deadline_at: parse_instant(seed.id, seed.deadline_at)?,
                allowed_submissions: seed.allowed,
                submissions: Vec::new(),
                status: AssignmentStatus::Open,
                grade_percent: None,
                class_submission_count: seed.class_submissions,
            })
        })
        .collect()
}

/// Read-only browsing data: courses, their modules, the classmate directory and
/// the signed-in student's profile.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    modules: Vec<CourseModule>,
    classmates: Vec<Classmate>,
    profile: Option<StudentProfile>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>, modules: Vec<CourseModule>, classmates: Vec<Classmate>) -> Self {
        Self {
            courses,
            modules,
            classmates,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: StudentProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn seeded() -> Self {
        Self::new(seed_courses(), seed_modules(), seed_classmates()).with_profile(seed_profile())
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, code: &CourseCode) -> Option<&Course> {
        self.courses.iter().find(|course| &course.code == code)
    }

    pub fn modules_for<'a>(
        &'a self,
        code: &'a CourseCode,
    ) -> impl Iterator<Item = &'a CourseModule> + 'a {
        self.modules
            .iter()
            .filter(move |module| &module.course_code == code)
    }

    pub fn classmates(&self) -> &[Classmate] {
        &self.classmates
    }

    pub fn modules(&self) -> &[CourseModule] {
        &self.modules
    }

    pub fn profile(&self) -> Option<&StudentProfile> {
        self.profile.as_ref()
    }
}

fn course(
    code: &str,
    name: &str,
    professor: &str,
    schedule: &str,
    room: &str,
    units: u8,
    status: CourseStatus,
) -> Course {
    Course {
        code: CourseCode::new(code),
        name: name.to_string(),
        professor: professor.to_string(),
        schedule: schedule.to_string(),
        room: room.to_string(),
        units,
        status,
    }
}

fn seed_courses() -> Vec<Course> {
    vec![
        course("CS201", "Data Structures", "Dr. Santos", "Wed 3:00–5:00 PM", "Room 201", 3, CourseStatus::Ongoing),
        course("DES110", "UI/UX Intro", "Prof. Reyes", "Tue 1:00–3:00 PM", "Room 305", 2, CourseStatus::Ongoing),
        course("CS210", "Database Systems", "Dr. Cruz", "Thu 9:00–11:00 AM", "Lab 2", 3, CourseStatus::Completed),
        course("MATH130", "Discrete Math", "Prof. Dela Peña", "Mon 10:00–12:00 PM", "Room 104", 3, CourseStatus::Ongoing),
    ]
}

#[allow(clippy::too_many_arguments)]
fn module(
    code: &str,
    title: &str,
    status: ModuleStatus,
    score: Option<u8>,
    progress: u8,
    handout_url: Option<&str>,
    term: Term,
    assignment_ids: &[&str],
) -> CourseModule {
    CourseModule {
        course_code: CourseCode::new(code),
        title: title.to_string(),
        status,
        score,
        progress,
        handout_url: handout_url.map(str::to_string),
        term,
        assignment_ids: assignment_ids.iter().copied().map(AssignmentId::new).collect(),
    }
}

fn seed_modules() -> Vec<CourseModule> {
    use ModuleStatus::{Completed, Ongoing};

    vec![
        module("CS201", "Arrays & Lists", Completed, Some(92), 100, Some("/handouts/cs201-arrays-lists.pdf"), Term::Prelim, &["cs201-array-drills", "cs201-list-ops"]),
        module("CS201", "Stacks & Queues", Ongoing, None, 40, Some("/handouts/cs201-stacks-queues.pdf"), Term::Midterms, &["cs201-queue-sim"]),
        module("CS201", "Trees & Graphs", Ongoing, None, 10, None, Term::Prefinals, &["cs201-bst-basics"]),
        module("DES110", "Flexbox Layout", Ongoing, None, 60, Some("/handouts/des110-flexbox-layout.pdf"), Term::Prelim, &["des110-flex-demo"]),
        module("DES110", "Color & Contrast", Ongoing, None, 20, None, Term::Midterms, &["des110-color-tokens"]),
        module("CS210", "SQL Joins", Completed, Some(88), 100, Some("/handouts/cs210-sql-joins.pdf"), Term::Prelim, &["cs210-join-practice"]),
        module("CS210", "Indexes & Query Plans", Ongoing, None, 30, Some("/handouts/cs210-indexes-query-plans.pdf"), Term::Finals, &["cs210-explain-plan"]),
        module("MATH130", "Set Theory Basics", Ongoing, None, 50, Some("/handouts/math130-set-theory-basics.pdf"), Term::Prelim, &["math130-set-proofs-1"]),
    ]
}

fn classmate(name: &str, presence: Presence, last_online: &str, text: &str, from_me: bool) -> Classmate {
    Classmate {
        name: name.to_string(),
        presence,
        last_online: last_online.to_string(),
        last_message: LastMessage {
            text: text.to_string(),
            from_me,
        },
    }
}

fn seed_classmates() -> Vec<Classmate> {
    vec![
        classmate("Ana D.", Presence::Online, "Just now", "See you later!", false),
        classmate("Brian P.", Presence::Offline, "Yesterday", "Hi", true),
        classmate("Cara L.", Presence::Online, "5m ago", "Okay, thanks!", false),
        classmate("Diego T.", Presence::Away, "3d ago", "You got this!", true),
    ]
}

fn final_grade(code: &str, term: Term, grade: &str) -> FinalGrade {
    FinalGrade {
        course_code: CourseCode::new(code),
        term,
        grade: grade.to_string(),
    }
}

fn achievement(title: &str, year: u16, pdf_url: &str, description: &str) -> Achievement {
    Achievement {
        title: title.to_string(),
        year,
        pdf_url: Some(pdf_url.to_string()),
        description: Some(description.to_string()),
    }
}

fn seed_profile() -> StudentProfile {
    StudentProfile {
        student_no: "2025-001234".to_string(),
        name: "Soytii D.".to_string(),
        school_email: "soytii.d@university.edu.ph".to_string(),
        personal_email: Some("soytii.dev@gmail.com".to_string()),
        year_level: "4th Year".to_string(),
        program: "BSIT".to_string(),
        final_grades: vec![
            final_grade("CS201", Term::Prelim, "1.5"),
            final_grade("CS210", Term::Midterms, "1.75"),
            final_grade("MATH130", Term::Finals, "2.0"),
            final_grade("DES110", Term::Prefinals, "1.75"),
        ],
        achievements: vec![
            achievement("Dean's Lister", 2024, "/achievements/deans-list-2024.pdf", "Top 10% standing for the academic year."),
            achievement("Hackathon Champion", 2025, "/achievements/hackathon-2025-winner.pdf", "1st place in University HackFest (Web category)."),
            achievement("Community Outreach Volunteer", 2023, "/achievements/outreach-certificate-2023.pdf", "50+ hours of tech tutoring for local high school."),
        ],
    }
}
