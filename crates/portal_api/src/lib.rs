use std::sync::Arc;

use chrono::{DateTime, Utc};
use portal_core::{policy, AssignmentBackend, SubmissionDialog, UploadSettings};
use shared::{
    domain::{
        AssignmentId, AssignmentStatus, Classmate, ContentRef, Course, CourseCode, CourseStatus,
        ModuleStatus, Presence,
    },
    error::{ApiError, ErrorCode},
    protocol::{
        AccomplishedCourse, AssignmentView, ClassSlot, DashboardSummary, DeadlineEntry,
        ModuleAssignmentLink, ModuleView, ProfileView,
    },
};
use storage::{AssignmentStore, Catalog, ContentStore, MemoryContentStore, StoredContent};
use tracing::{debug, warn};

/// Everything the presentation layer queries and commands go through.
#[derive(Clone)]
pub struct ApiContext {
    pub store: AssignmentStore,
    pub catalog: Arc<Catalog>,
    pub content: MemoryContentStore,
    pub upload: UploadSettings,
}

impl ApiContext {
    pub fn new(store: AssignmentStore, catalog: Catalog, upload: UploadSettings) -> Self {
        Self {
            store,
            catalog: Arc::new(catalog),
            content: MemoryContentStore::new(),
            upload,
        }
    }

    pub fn seeded(upload: UploadSettings) -> Result<Self, ApiError> {
        let store = AssignmentStore::seeded()?;
        Ok(Self::new(store, Catalog::seeded(), upload))
    }
}

pub async fn get_assignment(ctx: &ApiContext, id: &AssignmentId) -> Result<AssignmentView, ApiError> {
    let record = ctx.store.get(id).await?;
    Ok(AssignmentView::from_record(&record, policy::can_submit(&record)))
}

pub fn list_courses(ctx: &ApiContext) -> Vec<Course> {
    ctx.catalog.courses().to_vec()
}

pub async fn list_modules(ctx: &ApiContext, code: &CourseCode) -> Result<Vec<ModuleView>, ApiError> {
    if ctx.catalog.course(code).is_none() {
        return Err(ApiError::not_found(format!("course {code} not found")));
    }

    let mut views = Vec::new();
    for module in ctx.catalog.modules_for(code) {
        let mut assignments = Vec::with_capacity(module.assignment_ids.len());
        for id in &module.assignment_ids {
            match ctx.store.get(id).await {
                Ok(record) => assignments.push(ModuleAssignmentLink {
                    assignment_id: record.id,
                    title: record.title,
                }),
                Err(err) => {
                    warn!(course_code = %code, module = %module.title, error = %err, "module links a missing assignment");
                }
            }
        }
        views.push(ModuleView {
            module: module.clone(),
            assignments,
        });
    }
    Ok(views)
}

/// Open assignments due after `now`, soonest first.
pub async fn upcoming_deadlines(
    ctx: &ApiContext,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<DeadlineEntry> {
    let mut due = ctx
        .store
        .list()
        .await
        .into_iter()
        .filter(|record| record.status == AssignmentStatus::Open && record.deadline_at > now)
        .map(|record| DeadlineEntry {
            assignment_id: record.id,
            title: record.title,
            course_code: record.course_code,
            deadline_at: record.deadline_at,
        })
        .collect::<Vec<_>>();
    due.sort_by(|a, b| {
        a.deadline_at
            .cmp(&b.deadline_at)
            .then_with(|| a.assignment_id.cmp(&b.assignment_id))
    });
    due.truncate(limit);
    due
}

/// Deadlines shown on the dashboard card.
pub const DASHBOARD_DEADLINES: usize = 3;

pub async fn dashboard_summary(ctx: &ApiContext, now: DateTime<Utc>) -> DashboardSummary {
    let catalog = &ctx.catalog;
    let classes = catalog
        .courses()
        .iter()
        .filter(|course| course.status == CourseStatus::Ongoing)
        .map(|course| ClassSlot {
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            schedule: course.schedule.clone(),
            room: course.room.clone(),
        })
        .collect();

    DashboardSummary {
        course_count: catalog.courses().len(),
        completed_module_count: catalog
            .modules()
            .iter()
            .filter(|module| module.status == ModuleStatus::Completed)
            .count(),
        active_classmate_count: catalog
            .classmates()
            .iter()
            .filter(|mate| mate.presence == Presence::Online)
            .count(),
        classes,
        deadlines: upcoming_deadlines(ctx, now, DASHBOARD_DEADLINES).await,
    }
}

/// Profile with accomplished units taken from completed courses, graded where the
/// transcript has an entry.
pub fn get_profile(ctx: &ApiContext) -> Result<ProfileView, ApiError> {
    let profile = ctx
        .catalog
        .profile()
        .ok_or_else(|| ApiError::not_found("no student profile"))?;

    let accomplished = ctx
        .catalog
        .courses()
        .iter()
        .filter(|course| course.status == CourseStatus::Completed)
        .map(|course| {
            let grade = profile.final_grade(&course.code);
            AccomplishedCourse {
                code: course.code.clone(),
                name: course.name.clone(),
                units: course.units,
                term: grade.map(|grade| grade.term),
                grade: grade.map(|grade| grade.grade.clone()),
            }
        })
        .collect::<Vec<_>>();
    let total_units = accomplished.iter().map(|course| u32::from(course.units)).sum();

    Ok(ProfileView {
        student_no: profile.student_no.clone(),
        name: profile.name.clone(),
        school_email: profile.school_email.clone(),
        personal_email: profile.personal_email.clone(),
        year_level: profile.year_level.clone(),
        program: profile.program.clone(),
        program_name: profile.program_name().map(str::to_string),
        accomplished,
        total_units,
        achievements: profile.achievements.clone(),
    })
}

pub fn search_classmates(ctx: &ApiContext, query: &str) -> Vec<Classmate> {
    let needle = query.trim().to_lowercase();
    ctx.catalog
        .classmates()
        .iter()
        .filter(|mate| needle.is_empty() || mate.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Builds a dialog for `id` and opens it. Fails when the policy denies submitting.
pub async fn open_submission_dialog(
    ctx: &ApiContext,
    id: &AssignmentId,
) -> Result<SubmissionDialog, ApiError> {
    let backend: Arc<dyn AssignmentBackend> = Arc::new(ctx.store.clone());
    let mut dialog = SubmissionDialog::new(
        id.clone(),
        backend,
        Arc::new(ctx.content.clone()),
        ctx.upload,
    );
    dialog.open().await?;
    debug!(assignment_id = %id, "submission dialog ready");
    Ok(dialog)
}

pub async fn resolve_content(ctx: &ApiContext, content: ContentRef) -> Result<StoredContent, ApiError> {
    ctx.content
        .resolve(content)
        .await
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, format!("content {content} not found")))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
