//! # Bulk Task Import
//!
//! Turns rows of an uploaded task spreadsheet into [`NewTask`] payloads.
//!
//! Rows arrive as JSON objects keyed by column header, the shape produced by
//! common sheet-to-JSON converters. Headers are matched loosely
//! (`"Due Date"`, `"due_date"` and `"dueDate"` are the same column), and each
//! logical column has a few accepted synonyms.
//!
//! Cell handling:
//! - dates may be serial numbers or text (see [`date_from_cell`]); a blank
//!   due date means "today"
//! - status text is normalised, so `"in progress"` becomes `in_progress`
//! - tags may be a comma-separated string or a JSON array; entries are
//!   trimmed and blanks dropped

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ComplianceBucket;
use crate::error::ImportError;
use crate::task::{snake_key, Frequency, NewTask, Priority, TaskStatus};
use crate::temporal::date_from_cell;

/// Logical columns of the import template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Description,
    Status,
    Priority,
    Assignee,
    DueDate,
    Bucket,
    Frequency,
    Entity,
    Tags,
    EstimatedHours,
}

impl Column {
    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Assignee => "assignee",
            Self::DueDate => "dueDate",
            Self::Bucket => "bucket",
            Self::Frequency => "frequency",
            Self::Entity => "entity",
            Self::Tags => "tags",
            Self::EstimatedHours => "estimatedHours",
        }
    }

    /// Header keys (after [`header_key`]) that map to this column, most
    /// specific first.
    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Title => &["title", "task", "task_name", "taskname", "name"],
            Self::Description => &["description", "details", "notes"],
            Self::Status => &["status", "state"],
            Self::Priority => &["priority"],
            Self::Assignee => &["assignee", "assigned_to", "assignedto", "owner"],
            Self::DueDate => &["due_date", "duedate", "due", "deadline"],
            Self::Bucket => &["bucket", "category", "compliance_bucket", "compliance_type", "type"],
            Self::Frequency => &["frequency", "recurrence"],
            Self::Entity => &["entity", "client", "client_name", "clientname"],
            Self::Tags => &["tags", "labels"],
            Self::EstimatedHours => &["estimated_hours", "estimatedhours", "estimate", "hours"],
        }
    }
}

/// Normalise a header: camelCase boundaries and separators become `_`.
fn header_key(header: &str) -> String {
    let mut spaced = String::with_capacity(header.len() + 4);
    let mut prev_lower = false;
    for c in header.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            spaced.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        spaced.push(c);
    }
    snake_key(&spaced)
}

/// One uploaded spreadsheet row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadedTaskRow(Map<String, Value>);

impl UploadedTaskRow {
    /// Wrap a JSON object.
    pub fn new(cells: Map<String, Value>) -> Self {
        Self(cells)
    }

    /// Non-blank cell for `column`. When several headers map to the same
    /// column, the earliest synonym wins (`Task` over `Name` for the title),
    /// independent of key order in the row.
    pub fn cell(&self, column: Column) -> Option<&Value> {
        column.synonyms().iter().find_map(|synonym| {
            self.0
                .iter()
                .find(|(header, v)| header_key(header) == *synonym && !is_blank(v))
                .map(|(_, v)| v)
        })
    }

    fn text(&self, column: Column) -> Option<String> {
        self.cell(column).and_then(cell_text)
    }
}

impl From<Map<String, Value>> for UploadedTaskRow {
    fn from(cells: Map<String, Value>) -> Self {
        Self(cells)
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

fn cell_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Split a tag cell into trimmed, non-empty tags.
pub fn split_tags(cell: &Value) -> Vec<String> {
    let raw: Vec<String> = match cell {
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(items) => items.iter().filter_map(cell_text).collect(),
        other => cell_text(other).into_iter().collect(),
    };
    raw.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_hours(cell: &Value) -> Result<f64, ImportError> {
    let hours = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match hours {
        Some(h) if h.is_finite() && h >= 0.0 => Ok(h),
        _ => Err(ImportError::InvalidCell {
            column: Column::EstimatedHours.name(),
            reason: format!("expected a non-negative number, got {cell}"),
        }),
    }
}

fn parse_column<T>(row: &UploadedTaskRow, column: Column) -> Result<T, ImportError>
where
    T: std::str::FromStr<Err = crate::error::ValidationError> + Default,
{
    match row.text(column) {
        None => Ok(T::default()),
        Some(text) => text.parse().map_err(|_| ImportError::InvalidCell {
            column: column.name(),
            reason: format!("unrecognised value \"{text}\""),
        }),
    }
}

/// Convert one uploaded row into a task creation payload.
///
/// `today` fills in a blank due date.
pub fn transform_uploaded_task(
    row: &UploadedTaskRow,
    today: NaiveDate,
) -> Result<NewTask, ImportError> {
    let title = row
        .text(Column::Title)
        .ok_or(ImportError::MissingColumn(Column::Title.name()))?;
    let bucket = row
        .text(Column::Bucket)
        .map(|b| ComplianceBucket::parse(&b))
        .ok_or(ImportError::MissingColumn(Column::Bucket.name()))?;

    let due_date = match row.cell(Column::DueDate) {
        None => today,
        Some(cell) => date_from_cell(cell).ok_or_else(|| ImportError::InvalidCell {
            column: Column::DueDate.name(),
            reason: format!("not a date: {cell}"),
        })?,
    };

    let status: TaskStatus = parse_column(row, Column::Status)?;
    let priority: Priority = parse_column(row, Column::Priority)?;
    let frequency: Frequency = parse_column(row, Column::Frequency)?;

    let estimated_hours = match row.cell(Column::EstimatedHours) {
        None => 0.0,
        Some(cell) => parse_hours(cell)?,
    };

    Ok(NewTask {
        title,
        description: row.text(Column::Description).unwrap_or_default(),
        status,
        priority,
        assignee: row.text(Column::Assignee).unwrap_or_default(),
        due_date,
        bucket,
        frequency,
        entity: row.text(Column::Entity).unwrap_or_default(),
        tags: row.cell(Column::Tags).map(split_tags).unwrap_or_default(),
        estimated_hours,
    })
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based data row number (the header row is not counted).
    pub row: usize,
    /// Why the row was rejected.
    pub error: ImportError,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.error)
    }
}

/// Outcome of converting a whole sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Rows converted successfully, in sheet order.
    pub tasks: Vec<NewTask>,
    /// Rows rejected, in sheet order.
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Whether every row was accepted.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Convert every row, collecting failures rather than stopping at the first.
/// Entirely blank rows (common at the end of sheets) are skipped silently.
pub fn transform_uploaded_tasks(rows: &[UploadedTaskRow], today: NaiveDate) -> ImportReport {
    let mut report = ImportReport::default();
    for (idx, row) in rows.iter().enumerate() {
        if row.0.values().all(is_blank) {
            continue;
        }
        match transform_uploaded_task(row, today) {
            Ok(task) => report.tasks.push(task),
            Err(error) => report.errors.push(RowError { row: idx + 1, error }),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn row(v: Value) -> UploadedTaskRow {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn competing_headers_resolve_by_synonym_priority() {
        // "Client" sorts before "Entity"; the dedicated column still wins.
        let r = row(json!({
            "Name": "Priya",
            "Task Name": "GSTR-1 April",
            "Client": "Acme",
            "Entity": "Acme Technologies Pvt Ltd",
            "Bucket": "GST"
        }));
        let task = transform_uploaded_task(&r, today()).unwrap();
        assert_eq!(task.title, "GSTR-1 April");
        assert_eq!(task.entity, "Acme Technologies Pvt Ltd");

        // A blank preferred column falls through to the next synonym.
        let r = row(json!({"Title": " ", "Name": "PF ECR", "Bucket": "PF"}));
        assert_eq!(transform_uploaded_task(&r, today()).unwrap().title, "PF ECR");
    }

    #[test]
    fn header_key_handles_camel_case_and_spaces() {
        assert_eq!(header_key("dueDate"), "due_date");
        assert_eq!(header_key("Due Date"), "due_date");
        assert_eq!(header_key("ESTIMATED_HOURS"), "estimated_hours");
        assert_eq!(header_key("Task Name"), "task_name");
    }

    #[test]
    fn transforms_full_row() {
        let r = row(json!({
            "Title": "GSTR-1 April",
            "Description": "Outward supplies",
            "Status": "in progress",
            "Priority": "High",
            "Assigned To": "Priya",
            "Due Date": 45778,
            "Category": "GST",
            "Frequency": "Monthly",
            "Client": "Acme Pvt Ltd",
            "Tags": " gst, monthly ,, returns ",
            "Estimated Hours": "3.5"
        }));
        let task = transform_uploaded_task(&r, today()).unwrap();
        assert_eq!(task.title, "GSTR-1 April");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.assignee, "Priya");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(task.bucket, ComplianceBucket::Gst);
        assert_eq!(task.frequency, Frequency::Monthly);
        assert_eq!(task.entity, "Acme Pvt Ltd");
        assert_eq!(task.tags, vec!["gst", "monthly", "returns"]);
        assert_eq!(task.estimated_hours, 3.5);
    }

    #[test]
    fn status_is_serialized_in_snake_case() {
        let r = row(json!({"title": "TDS Q4", "bucket": "TDS", "status": "In Progress"}));
        let task = transform_uploaded_task(&r, today()).unwrap();
        let body = serde_json::to_value(&task).unwrap();
        assert_eq!(body["status"], "in_progress");
        assert_eq!(body["dueDate"], "2025-04-10");
    }

    #[test]
    fn defaults_fill_optional_columns() {
        let r = row(json!({"title": "ROC filing", "bucket": "roc"}));
        let task = transform_uploaded_task(&r, today()).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.frequency, Frequency::OneTime);
        assert_eq!(task.due_date, today());
        assert!(task.tags.is_empty());
        assert_eq!(task.estimated_hours, 0.0);
    }

    #[test]
    fn tags_accept_arrays() {
        assert_eq!(split_tags(&json!(["a ", "", " b"])), vec!["a", "b"]);
        assert_eq!(split_tags(&json!(" , ,")), Vec::<String>::new());
    }

    #[test]
    fn missing_title_is_rejected() {
        let r = row(json!({"bucket": "GST", "title": "   "}));
        assert_eq!(
            transform_uploaded_task(&r, today()),
            Err(ImportError::MissingColumn("title"))
        );
    }

    #[test]
    fn bad_cells_are_reported_by_column() {
        let r = row(json!({"title": "x", "bucket": "GST", "status": "blocked"}));
        assert!(matches!(
            transform_uploaded_task(&r, today()),
            Err(ImportError::InvalidCell { column: "status", .. })
        ));
        let r = row(json!({"title": "x", "bucket": "GST", "due": "someday"}));
        assert!(matches!(
            transform_uploaded_task(&r, today()),
            Err(ImportError::InvalidCell { column: "dueDate", .. })
        ));
        let r = row(json!({"title": "x", "bucket": "GST", "hours": -2}));
        assert!(matches!(
            transform_uploaded_task(&r, today()),
            Err(ImportError::InvalidCell { column: "estimatedHours", .. })
        ));
    }

    #[test]
    fn batch_collects_errors_with_row_numbers_and_skips_blank_rows() {
        let rows = vec![
            row(json!({"title": "ok", "bucket": "PF"})),
            row(json!({"title": "", "bucket": ""})),
            row(json!({"title": "bad", "bucket": "PF", "priority": "extreme"})),
            row(json!({"title": "also ok", "bucket": "ESI"})),
        ];
        let report = transform_uploaded_tasks(&rows, today());
        assert_eq!(report.tasks.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row, 3);
        assert!(!report.is_clean());
        assert!(report.errors[0].to_string().starts_with("row 3:"));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn split_tags_never_yields_blank_or_padded(input in "[a-z ,]{0,40}") {
                for tag in split_tags(&Value::String(input)) {
                    prop_assert!(!tag.is_empty());
                    prop_assert_eq!(tag.trim(), tag.as_str());
                }
            }
        }
    }
}
