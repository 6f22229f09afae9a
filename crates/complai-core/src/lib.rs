//! # complai-core — Foundational Types for ComplAI
//!
//! Domain records and pure helpers shared by every other crate in the
//! workspace. This crate performs no I/O.
//!
//! ## Contents
//!
//! - [`client`] — client records, constitution types, create/patch bodies.
//! - [`task`] — compliance tasks, workflow enums, comment/document records.
//! - [`domain`] — the [`ComplianceBucket`] a task is filed under.
//! - [`identity`] — record ids and validated PAN / TAN / GSTIN / CIN.
//! - [`temporal`] — spreadsheet serial dates and due-date [`Urgency`].
//! - [`import`] — bulk task upload rows to [`NewTask`] payloads.
//! - [`sheet`] — uploaded CSV / JSON files to import rows.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `complai-*` crates.
//! - No `.unwrap()` outside tests.
//! - Wire records use camelCase JSON field names.

pub mod client;
pub mod domain;
pub mod error;
pub mod identity;
pub mod import;
pub mod sheet;
pub mod task;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use client::{Client, ClientPatch, ClientStatus, ClientType, NewClient};
pub use domain::ComplianceBucket;
pub use error::{CoreError, ImportError, ValidationError};
pub use identity::{Cin, ClientId, CommentId, DocumentId, Gstin, Pan, Tan, TaskId};
pub use import::{transform_uploaded_task, transform_uploaded_tasks, ImportReport, UploadedTaskRow};
pub use task::{
    Comment, Frequency, NewComment, NewTask, Priority, ReassignTask, Task, TaskDocument, TaskStatus,
};
pub use sheet::parse_sheet;
pub use temporal::{excel_date_to_datetime, Urgency};
