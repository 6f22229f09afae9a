//! # complai-cli — ComplAI Command-Line Interface
//!
//! Scriptable access to the same backend the web dashboard talks to.
//!
//! ## Subcommands
//!
//! - `tasks` — List, summarise, create and reassign tasks; comments,
//!   documents and bulk sheet upload.
//! - `clients` — Client CRUD with local registration-number checks.
//! - `import` — Offline preview of a task sheet.
//!
//! ## Exit Codes
//!
//! - `0` — success.
//! - `1` — the command failed (backend error, invalid input, I/O).
//! - `2` — the command ran but found a problem: overdue tasks for
//!   `tasks summary`, rejected rows for `import preview`.

pub mod clients;
pub mod import;
pub mod output;
pub mod tasks;
