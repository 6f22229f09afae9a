//! # Import Subcommand
//!
//! Offline check of a task sheet before it is uploaded. The same parser and
//! row conversion the backend uses are run locally, so a clean preview
//! means `tasks upload` will create every row.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use complai_core::{parse_sheet, transform_uploaded_tasks, NewTask};
use serde::Serialize;

use crate::output::{emit, Format};

/// Arguments for the `complai import` subcommand.
#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(subcommand)]
    pub command: ImportCommand,
}

#[derive(Subcommand, Debug)]
pub enum ImportCommand {
    /// Convert a sheet locally and show the tasks it would create.
    /// Exits 2 when any row is rejected.
    Preview {
        /// Path to a CSV or JSON sheet.
        file: PathBuf,
        /// Date used when a row has no due date (default: today, UTC).
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

/// Result of a preview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub tasks: Vec<NewTask>,
    pub errors: Vec<String>,
}

/// Execute the import subcommand.
pub async fn run_import(args: ImportArgs, format: Format) -> Result<u8> {
    match args.command {
        ImportCommand::Preview { file, today } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let preview = preview(&file, &bytes, today)?;
            tracing::debug!(
                accepted = preview.tasks.len(),
                rejected = preview.errors.len(),
                "sheet converted"
            );
            emit(format, &preview, |p| {
                for task in &p.tasks {
                    let assignee = if task.assignee.is_empty() { "-" } else { task.assignee.as_str() };
                    println!(
                        "{}  {:<10} {} [{}]",
                        task.due_date,
                        task.bucket.label(),
                        task.title,
                        assignee
                    );
                }
                for error in &p.errors {
                    println!("{error}");
                }
                println!("{} accepted, {} rejected", p.tasks.len(), p.errors.len());
            })?;
            Ok(if preview.errors.is_empty() { 0 } else { 2 })
        }
    }
}

/// Parse and convert `bytes` read from `path`.
pub fn preview(path: &Path, bytes: &[u8], today: NaiveDate) -> Result<Preview> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let rows = parse_sheet(&file_name, bytes)?;
    let report = transform_uploaded_tasks(&rows, today);
    Ok(Preview {
        tasks: report.tasks,
        errors: report.errors.iter().map(ToString::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    #[test]
    fn csv_rows_are_converted_and_failures_numbered() {
        let sheet = "Title,Bucket,Due Date,Assignee\n\
                     GSTR-3B March,GST,2025-04-20,Priya\n\
                     ,GST,2025-04-20,Priya\n";
        let p = preview(Path::new("/tmp/april.csv"), sheet.as_bytes(), today()).unwrap();
        assert_eq!(p.tasks.len(), 1);
        assert_eq!(p.tasks[0].title, "GSTR-3B March");
        assert_eq!(p.errors.len(), 1);
        assert!(p.errors[0].starts_with("row 2:"), "{}", p.errors[0]);
    }

    #[test]
    fn json_sheet_is_detected_by_extension() {
        let sheet = r#"[{"title": "TDS return Q4", "bucket": "TDS", "dueDate": "2025-05-31"}]"#;
        let p = preview(Path::new("q4.json"), sheet.as_bytes(), today()).unwrap();
        assert!(p.errors.is_empty());
        assert_eq!(p.tasks[0].due_date, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
    }

    #[test]
    fn binary_file_is_an_error() {
        assert!(preview(Path::new("book.xlsx"), &[0xff, 0xfe, 0x00], today()).is_err());
    }
}
