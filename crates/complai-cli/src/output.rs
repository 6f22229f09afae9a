//! Rendering of API results.
//!
//! With `--json` every command prints the uniform envelope
//! (`{success, data, error, message}`) and exits 1 on failure. Otherwise a
//! human-readable rendering goes to stdout and failures become errors.

use anyhow::{anyhow, Result};
use complai_api_client::{ApiError, ApiReply, ApiResponse};
use complai_core::{Client, Task, Urgency};
use chrono::NaiveDate;
use serde::Serialize;

/// Output mode chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Print `result` in `format`. `render` is only called for text output of
/// a successful result.
pub fn report<T: Serialize>(
    format: Format,
    result: Result<ApiReply<T>, ApiError>,
    render: impl FnOnce(&T),
) -> Result<u8> {
    match format {
        Format::Json => {
            let envelope: ApiResponse<T> = result.into();
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(if envelope.success { 0 } else { 1 })
        }
        Format::Text => {
            let reply = result.map_err(|e| anyhow!(e.user_message()))?;
            render(&reply.data);
            if let Some(message) = &reply.message {
                println!("{message}");
            }
            Ok(0)
        }
    }
}

/// Print a plain value as JSON or via `render`.
pub fn emit<T: Serialize>(format: Format, value: &T, render: impl FnOnce(&T)) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Text => render(value),
    }
    Ok(())
}

pub fn task_line(task: &Task, today: NaiveDate) -> String {
    let urgency = Urgency::classify(task.due_date, today, task.status);
    let assignee = if task.assignee.is_empty() {
        "-"
    } else {
        task.assignee.as_str()
    };
    format!(
        "{:<12} {:<10} {:<12} {:<10} {:<9} {:<10} {} [{}]",
        truncate(task.id.as_str(), 12),
        truncate(task.bucket.label(), 10),
        task.status.as_str(),
        task.due_date.to_string(),
        task.priority.as_str(),
        urgency.label(),
        task.title,
        assignee,
    )
}

pub fn client_line(client: &Client) -> String {
    format!(
        "{:<12} {:<14} {:<8} {:<10} {}",
        truncate(client.id.as_str(), 12),
        client.client_type.label(),
        if client.is_active() { "active" } else { "inactive" },
        client.pan.as_deref().unwrap_or("-"),
        client.name,
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
