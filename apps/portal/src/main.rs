mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use portal_api::ApiContext;
use portal_core::StagedFile;
use shared::{
    domain::{AssignmentId, CourseCode},
    error::{ApiError, ApiException},
    protocol::{AssignmentView, UploadEvent},
};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Student portal: courses, assignments and submissions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List enrolled courses.
    Courses,
    /// List a course's modules with their linked assignments.
    Modules { code: String },
    /// Show one assignment.
    Assignment {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Open assignments due soonest.
    Deadlines {
        #[arg(long, default_value_t = 5)]
        limit: usize,
        /// Reference time (RFC 3339), defaults to now.
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Course, module and classmate counts plus this week's classes and deadlines.
    Dashboard {
        /// Reference time (RFC 3339), defaults to now.
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Show the student profile and accomplished units.
    Profile {
        #[arg(long)]
        json: bool,
    },
    /// Search classmates by name.
    Classmates { query: Option<String> },
    /// Upload a file as a submission and print the updated assignment.
    Submit {
        id: String,
        path: PathBuf,
        /// Close the dialog once progress reaches this percentage.
        #[arg(long)]
        cancel_at: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = config::load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = ApiContext::seeded(settings.upload_settings()).map_err(api_err)?;

    match cli.command {
        Command::Courses => {
            for course in portal_api::list_courses(&ctx) {
                println!(
                    "{:<8} {:<36} {:<20} {} ({} units)",
                    course.code, course.name, course.professor, course.schedule, course.units
                );
            }
        }
        Command::Modules { code } => {
            let modules = portal_api::list_modules(&ctx, &CourseCode::new(code))
                .await
                .map_err(api_err)?;
            for view in modules {
                println!("{} [{:?}, {}%]", view.module.title, view.module.status, view.module.progress);
                for link in &view.assignments {
                    println!("    {}  {}", link.assignment_id, link.title);
                }
            }
        }
        Command::Assignment { id, json } => {
            let view = portal_api::get_assignment(&ctx, &AssignmentId::new(id))
                .await
                .map_err(api_err)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_assignment(&view);
            }
        }
        Command::Deadlines { limit, at } => {
            let now = at.unwrap_or_else(Utc::now);
            let due = portal_api::upcoming_deadlines(&ctx, now, limit).await;
            if due.is_empty() {
                println!("nothing due after {}", now.to_rfc3339());
            }
            for entry in due {
                println!(
                    "{}  {:<8} {}",
                    entry.deadline_at.format("%Y-%m-%d %H:%M"),
                    entry.course_code,
                    entry.title
                );
            }
        }
        Command::Dashboard { at } => {
            let now = at.unwrap_or_else(Utc::now);
            let summary = portal_api::dashboard_summary(&ctx, now).await;
            println!("courses:            {}", summary.course_count);
            println!("completed modules:  {}", summary.completed_module_count);
            println!("active classmates:  {}", summary.active_classmate_count);
            println!("classes:");
            for slot in &summary.classes {
                println!("  {:<8} {:<24} {:<20} {}", slot.course_code, slot.course_name, slot.schedule, slot.room);
            }
            println!("deadlines:");
            for entry in &summary.deadlines {
                println!(
                    "  {}  {:<8} {}",
                    entry.deadline_at.format("%Y-%m-%d %H:%M"),
                    entry.course_code,
                    entry.title
                );
            }
        }
        Command::Profile { json } => {
            let profile = portal_api::get_profile(&ctx).map_err(api_err)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("{} ({})", profile.name, profile.student_no);
                println!("  school email:   {}", profile.school_email);
                if let Some(email) = &profile.personal_email {
                    println!("  personal email: {email}");
                }
                println!(
                    "  program:        {} {}",
                    profile.program,
                    profile.program_name.as_deref().unwrap_or_default()
                );
                println!("  year level:     {}", profile.year_level);
                println!("  accomplished units: {}", profile.total_units);
                for course in &profile.accomplished {
                    println!(
                        "    {:<8} {:<24} {} units  {}",
                        course.code,
                        course.name,
                        course.units,
                        course.grade.as_deref().unwrap_or("-")
                    );
                }
                for award in &profile.achievements {
                    println!("  * {} ({})", award.title, award.year);
                }
            }
        }
        Command::Classmates { query } => {
            let query = query.unwrap_or_default();
            for mate in portal_api::search_classmates(&ctx, &query) {
                println!("{:<12} {:<14} {}", mate.name, mate.presence.label(), mate.last_online);
            }
        }
        Command::Submit {
            id,
            path,
            cancel_at,
        } => submit(&ctx, AssignmentId::new(id), &path, cancel_at).await?,
    }

    Ok(())
}

async fn submit(
    ctx: &ApiContext,
    id: AssignmentId,
    path: &Path,
    cancel_at: Option<u8>,
) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("path has no file name")?;

    let mut dialog = portal_api::open_submission_dialog(ctx, &id)
        .await
        .map_err(api_err)?;
    let mut events = BroadcastStream::new(dialog.subscribe());

    dialog
        .select_file(StagedFile::new(file_name, bytes))
        .await
        .map_err(api_err)?;
    if !dialog.start_upload().await.map_err(api_err)? {
        bail!("upload did not start");
    }
    info!(assignment_id = %id, "upload started");

    while let Some(item) = events.next().await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "missed upload events");
                continue;
            }
        };
        match event {
            UploadEvent::Progress { percent, .. } => {
                println!("uploading... {percent:>3}%");
                if cancel_at.is_some_and(|limit| percent >= limit && percent < 100) {
                    dialog.close().await;
                    println!("upload cancelled at {percent}%");
                    break;
                }
            }
            UploadEvent::Completed { submission, .. } => {
                println!("submitted {} ({})", submission.file_name, submission.id);
                break;
            }
            UploadEvent::Rejected { message, .. } => bail!("submission rejected: {message}"),
            UploadEvent::Cancelled { .. } => {
                println!("upload cancelled");
                break;
            }
            UploadEvent::Selected { .. } | UploadEvent::Started { .. } => {}
        }
    }

    let view = portal_api::get_assignment(ctx, &id)
        .await
        .map_err(api_err)?;
    print_assignment(&view);
    Ok(())
}

fn api_err(err: impl Into<ApiError>) -> ApiException {
    ApiException::from(err.into())
}

fn print_assignment(view: &AssignmentView) {
    println!("{} ({} / {})", view.title, view.course_code, view.module_title);
    println!("  status:      {}", view.status_label);
    println!("  opens:       {}", view.start_at.format("%Y-%m-%d %H:%M"));
    println!("  due:         {}", view.deadline_at.format("%Y-%m-%d %H:%M"));
    println!(
        "  submissions: {}/{}{}",
        view.submissions.len(),
        view.allowed_submissions,
        if view.can_submit { "" } else { " (submitting disabled)" }
    );
    for sub in &view.submissions {
        println!(
            "    {}  {}  {}",
            sub.file_name,
            sub.size_pretty,
            sub.submitted_at.format("%Y-%m-%d %H:%M")
        );
    }
    if let Some(grade) = view.grade_percent {
        println!("  grade:       {grade}%");
    }
    for (n, step) in view.instructions.iter().enumerate() {
        println!("  {}. {}", n + 1, step);
    }
}
