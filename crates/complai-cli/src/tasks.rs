//! # Tasks Subcommand
//!
//! Task endpoints plus board views computed locally.
//!
//! ## Subcommands
//!
//! - `list` — Fetch tasks, optionally filtered by bucket, status, assignee.
//! - `summary` — Count fetched tasks by urgency.
//! - `create` — Create a task.
//! - `reassign` — Hand a task to another assignee.
//! - `upload` — Upload a task sheet for server-side import.
//! - `attach` — Attach a document to a task.
//! - `comments` / `comment` — Read or post task comments.
//! - `documents` — List documents attached to a task.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use complai_api_client::{ComplaiClient, UploadFile};
use complai_core::{
    ComplianceBucket, Frequency, NewComment, NewTask, Priority, ReassignTask, TaskId, TaskStatus,
};
use complai_store::{TaskBoard, TaskFilter};

use crate::output::{emit, report, task_line, Format};

/// Arguments for the `complai tasks` subcommand.
#[derive(Args, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

/// Task subcommands.
#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// List tasks.
    List {
        /// Only tasks in this compliance bucket (e.g. "GST", "Income Tax").
        #[arg(long, value_parser = parse_bucket)]
        bucket: Option<ComplianceBucket>,
        /// Only tasks in this status (e.g. "in progress").
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Only tasks assigned to this person (case-insensitive).
        #[arg(long)]
        assignee: Option<String>,
        /// Reference date for urgency (default: today, UTC).
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Count tasks by urgency. Exits 2 when any task is overdue.
    Summary {
        /// Reference date (default: today, UTC).
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Create a task.
    Create(CreateTaskArgs),

    /// Reassign a task.
    Reassign {
        /// Task id.
        id: String,
        /// New assignee.
        #[arg(long = "to")]
        assignee: String,
        /// Optional note recorded with the reassignment.
        #[arg(long)]
        note: Option<String>,
    },

    /// Upload a task sheet (CSV or JSON rows) for bulk creation.
    Upload {
        /// Path to the sheet.
        file: PathBuf,
    },

    /// Attach a document to a task.
    Attach {
        /// Task id.
        id: String,
        /// Path to the document.
        file: PathBuf,
    },

    /// List comments on a task.
    Comments {
        /// Task id.
        id: String,
    },

    /// Post a comment on a task.
    Comment {
        /// Task id.
        id: String,
        /// Comment author.
        #[arg(long)]
        author: String,
        /// Comment text.
        #[arg(long)]
        body: String,
    },

    /// List documents attached to a task.
    Documents {
        /// Task id.
        id: String,
    },
}

/// Fields for `complai tasks create`.
#[derive(Args, Debug)]
pub struct CreateTaskArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, value_parser = parse_bucket)]
    pub bucket: ComplianceBucket,
    /// Due date, YYYY-MM-DD.
    #[arg(long)]
    pub due: NaiveDate,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "pending")]
    pub status: TaskStatus,
    #[arg(long, default_value = "medium")]
    pub priority: Priority,
    #[arg(long, default_value = "")]
    pub assignee: String,
    #[arg(long, default_value = "one_time")]
    pub frequency: Frequency,
    /// Client the task is for.
    #[arg(long, default_value = "")]
    pub entity: String,
    /// Comma-separated tags.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    #[arg(long, default_value_t = 0.0)]
    pub estimated_hours: f64,
}

impl CreateTaskArgs {
    fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title.trim().to_string(),
            description: self.description,
            status: self.status,
            priority: self.priority,
            assignee: self.assignee,
            due_date: self.due,
            bucket: self.bucket,
            frequency: self.frequency,
            entity: self.entity,
            tags: self
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            estimated_hours: self.estimated_hours,
        }
    }
}

fn parse_bucket(s: &str) -> Result<ComplianceBucket, String> {
    if s.trim().is_empty() {
        return Err("bucket must not be empty".to_string());
    }
    Ok(ComplianceBucket::parse(s))
}

/// Execute the tasks subcommand.
pub async fn run_tasks(args: TasksArgs, api: &ComplaiClient, format: Format) -> Result<u8> {
    let tasks = api.tasks();
    match args.command {
        TasksCommand::List {
            bucket,
            status,
            assignee,
            today,
        } => {
            let board = load_board(api).await?;
            let filter = TaskFilter {
                bucket,
                status,
                assignee,
            };
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let hits = board.filter(&filter);
            emit(format, &hits, |hits| {
                for task in hits {
                    println!("{}", task_line(task, today));
                }
                println!("{} task(s)", hits.len());
            })?;
            Ok(0)
        }

        TasksCommand::Summary { today } => {
            let board = load_board(api).await?;
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let summary = board.urgency_summary(today);
            emit(format, &summary, |s| {
                println!("overdue    {}", s.overdue);
                println!("due today  {}", s.due_today);
                println!("due soon   {}", s.due_soon);
                println!("upcoming   {}", s.upcoming);
                println!("done       {}", s.done);
                println!("total      {}", s.total());
            })?;
            Ok(if summary.overdue > 0 { 2 } else { 0 })
        }

        TasksCommand::Create(create) => {
            let new = create.into_new_task();
            new.validate().context("invalid task")?;
            report(format, tasks.create(&new).await, |task| {
                println!("created task {} ({})", task.id, task.title);
            })
        }

        TasksCommand::Reassign { id, assignee, note } => {
            if assignee.trim().is_empty() {
                bail!("assignee must not be empty");
            }
            let req = ReassignTask {
                assignee: assignee.trim().to_string(),
                note,
            };
            report(format, tasks.reassign(&TaskId::new(id), &req).await, |task| {
                println!("task {} now assigned to {}", task.id, task.assignee);
            })
        }

        TasksCommand::Upload { file } => {
            let upload = UploadFile::from_path(&file).await?;
            report(format, tasks.upload_tasks(upload).await, |summary| {
                println!("{} created, {} failed", summary.created, summary.failed);
                for error in &summary.errors {
                    println!("  {error}");
                }
            })
        }

        TasksCommand::Attach { id, file } => {
            let upload = UploadFile::from_path(&file).await?;
            report(
                format,
                tasks.upload_task_doc(&TaskId::new(id), upload).await,
                |doc| println!("attached {} as document {}", doc.file_name, doc.id),
            )
        }

        TasksCommand::Comments { id } => {
            report(format, tasks.comments(&TaskId::new(id)).await, |comments| {
                for c in comments {
                    println!("{}  {}: {}", c.created_at.format("%Y-%m-%d %H:%M"), c.author, c.body);
                }
                if comments.is_empty() {
                    println!("no comments");
                }
            })
        }

        TasksCommand::Comment { id, author, body } => {
            let comment = NewComment { author, body };
            report(
                format,
                tasks.add_comment(&TaskId::new(id), &comment).await,
                |c| println!("comment {} posted", c.id),
            )
        }

        TasksCommand::Documents { id } => {
            report(format, tasks.documents(&TaskId::new(id)).await, |docs| {
                for d in docs {
                    let size = d.size_bytes.map(|b| format!("{b} B")).unwrap_or_default();
                    println!("{:<12} {} {}", d.id.as_str(), d.file_name, size);
                }
                if docs.is_empty() {
                    println!("no documents");
                }
            })
        }
    }
}

async fn load_board(api: &ComplaiClient) -> Result<TaskBoard> {
    let board = TaskBoard::new(Arc::new(api.tasks().clone()));
    if !board.load().await {
        bail!("could not fetch tasks from the backend");
    }
    Ok(board)
}
