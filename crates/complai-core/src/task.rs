//! # Compliance Tasks
//!
//! Task records, their enumerations, and the request bodies used by the
//! task endpoints (create, reassign, comment).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ComplianceBucket;
use crate::error::ValidationError;
use crate::identity::{CommentId, DocumentId, TaskId};

/// Canonical form of a free-text enum value: trimmed, lower-cased, with
/// runs of spaces and hyphens collapsed to a single `_`.
///
/// `"In Progress"` and `"in-progress"` both become `"in_progress"`.
pub fn snake_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_sep = false;
    for c in s.trim().chars() {
        if c == ' ' || c == '-' || c == '_' {
            pending_sep = !out.is_empty();
            continue;
        }
        if pending_sep {
            out.push('_');
            pending_sep = false;
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

macro_rules! keyed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, default = $default:ident {
            $($(#[$vmeta:meta])* $variant:ident => $key:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $(#[serde(alias = $alias)])*
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            /// Wire value (`snake_case`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            /// Every variant, in declaration order.
            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            /// Lenient parse: see [`snake_key`].
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match snake_key(s).as_str() {
                    $($key $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(ValidationError::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

keyed_enum! {
    /// Workflow state of a task.
    TaskStatus, "status", default = Pending {
        /// Not started.
        Pending => "pending" | "todo" | "not_started" | "open",
        /// Work under way.
        InProgress => "in_progress" | "ongoing" | "started",
        /// Prepared, awaiting partner review or client sign-off.
        Review => "review" | "in_review" | "under_review",
        /// Filed / closed.
        Completed => "completed" | "done" | "filed" | "closed",
        /// Past its due date and not completed.
        Overdue => "overdue",
    }
}

keyed_enum! {
    /// Relative urgency assigned by the practice.
    Priority, "priority", default = Medium {
        /// Low.
        Low => "low",
        /// Medium.
        Medium => "medium" | "normal",
        /// High.
        High => "high",
        /// Critical: penalty exposure is imminent.
        Critical => "critical" | "urgent",
    }
}

keyed_enum! {
    /// How often the underlying compliance recurs.
    Frequency, "frequency", default = OneTime {
        /// Non-recurring.
        OneTime => "one_time" | "once" | "onetime" | "adhoc" | "ad_hoc",
        /// Every week.
        Weekly => "weekly",
        /// Every month (GSTR-3B, PF/ESI challans).
        Monthly => "monthly",
        /// Every quarter (TDS returns).
        Quarterly => "quarterly",
        /// Every six months.
        HalfYearly => "half_yearly" | "halfyearly" | "semi_annual" | "semiannual",
        /// Once a year (ITR, AOC-4, MGT-7).
        Annually => "annually" | "annual" | "yearly",
    }
}

/// Task as returned by `GET /tasks/get-all-tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assignee: String,
    pub due_date: NaiveDate,
    pub bucket: ComplianceBucket,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub completed_hours: f64,
}

impl Task {
    /// Build a local record from a creation request.
    pub fn from_new(id: TaskId, new: NewTask) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            assignee: new.assignee,
            due_date: new.due_date,
            bucket: new.bucket,
            frequency: new.frequency,
            entity: new.entity,
            tags: new.tags,
            estimated_hours: new.estimated_hours,
            completed_hours: 0.0,
        }
    }

    /// Fraction of estimated effort logged, clamped to `[0, 1]`.
    /// Tasks without an estimate report 1.0 once completed, else 0.0.
    pub fn progress(&self) -> f64 {
        if self.estimated_hours <= 0.0 {
            return if self.status == TaskStatus::Completed { 1.0 } else { 0.0 };
        }
        (self.completed_hours / self.estimated_hours).clamp(0.0, 1.0)
    }
}

/// Request body for `POST /tasks/create-task`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assignee: String,
    pub due_date: NaiveDate,
    pub bucket: ComplianceBucket,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub estimated_hours: f64,
}

impl NewTask {
    /// Minimal creation request.
    pub fn new(title: impl Into<String>, bucket: ComplianceBucket, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            assignee: String::new(),
            due_date,
            bucket,
            frequency: Frequency::OneTime,
            entity: String::new(),
            tags: Vec::new(),
            estimated_hours: 0.0,
        }
    }

    /// Title and bucket must be present; hours must be non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.bucket.label().trim().is_empty() {
            return Err(ValidationError::EmptyField("bucket"));
        }
        if !(self.estimated_hours >= 0.0) {
            return Err(ValidationError::Negative("estimated hours"));
        }
        Ok(())
    }
}

/// Request body for `PUT /tasks/reassign-task/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignTask {
    pub assignee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Comment posted on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    #[serde(default)]
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /tasks/:id/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub author: String,
    pub body: String,
}

/// Document attached to a task (stored in the vault).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDocument {
    pub id: DocumentId,
    pub task_id: TaskId,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub uploaded_at: DateTime<Utc>,
}
