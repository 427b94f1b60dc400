//! # taskboard
//!
//! Task records and the operations a task-tracking web application needs,
//! stored through SeaORM.
//!
//! ## Quick start
//!
//! ```ignore
//! use taskboard::{TaskDbBuilder, TaskFilter, TaskForm};
//!
//! let db = TaskDbBuilder::new("sqlite:./taskboard.db?mode=rwc").build().await?;
//!
//! let form = TaskForm { title: "Write report".into(), ..TaskForm::initial() };
//! let task = db.create(form.validate()?).await?;
//! db.toggle(task.id).await?;
//!
//! let open = db.list(&TaskFilter::new("IN_PROGRESS", "")).await?;
//! ```
//!
//! ## Key types
//!
//! - [`TaskDb`] — connection handle carrying the CRUD operations
//! - [`TaskDbBuilder`] — connects and creates the schema
//! - [`TaskForm`] — raw form input, validated into a [`ValidatedTask`]
//! - [`task::Model`] — a stored task, with [`task::TaskStatus`] and [`task::TaskPriority`]

pub mod connection;
pub mod crud;
pub mod entity;
pub mod form;

pub use connection::{SchemaBuilder, TaskDb, TaskDbBuilder};
pub use crud::{CrudError, TaskCounts, TaskFilter, next_timestamp};
pub use entity::task::{self, TaskPriority, TaskStatus, next_status};
pub use form::{FormErrors, TaskForm, ValidatedTask};

// Re-export sea-orm for users of the library
pub use sea_orm;
