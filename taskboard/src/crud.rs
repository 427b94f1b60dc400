//! Create, read, update and delete operations on tasks.
//!
//! Every mutation stamps `updated_at` through [`next_timestamp`], which keeps
//! the value strictly increasing for a given row even when two writes land
//! inside the same clock tick.

use chrono::{Duration, Utc};
use log::{debug, info};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, prelude::DateTimeUtc,
};
use serde::Serialize;
use thiserror::Error;

use crate::connection::TaskDb;
use crate::entity::task::{self, TaskStatus};
use crate::form::ValidatedTask;

#[derive(Error, Debug)]
pub enum CrudError {
    #[error("Database operation failed: {0}")]
    Database(#[from] DbErr),

    #[error("Task with ID {0} not found")]
    NotFound(i32),
}

/// Exact-match filters for the task list. Empty values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl TaskFilter {
    pub fn new(status: &str, priority: &str) -> Self {
        let non_empty = |raw: &str| (!raw.is_empty()).then(|| raw.to_string());
        Self {
            status: non_empty(status),
            priority: non_empty(priority),
        }
    }
}

/// Aggregate counts over every stored task, regardless of any list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: u64,
    pub todo: u64,
    pub in_progress: u64,
    pub done: u64,
}

/// Timestamp for a mutation of a row last stamped at `previous`.
pub fn next_timestamp(previous: DateTimeUtc) -> DateTimeUtc {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

impl TaskDb {
    /// Tasks matching `filter`, newest first.
    pub async fn list(&self, filter: &TaskFilter) -> Result<Vec<task::Model>, CrudError> {
        let mut query = task::Entity::find();
        if let Some(status) = &filter.status {
            query = query.filter(task::Column::Status.eq(status.as_str()));
        }
        if let Some(priority) = &filter.priority {
            query = query.filter(task::Column::Priority.eq(priority.as_str()));
        }
        let tasks = query
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id)
            .all(&self.inner)
            .await?;
        Ok(tasks)
    }

    pub async fn counts(&self) -> Result<TaskCounts, CrudError> {
        let total = task::Entity::find().count(&self.inner).await?;
        let todo = self.count_with_status(TaskStatus::Todo).await?;
        let in_progress = self.count_with_status(TaskStatus::InProgress).await?;
        let done = self.count_with_status(TaskStatus::Done).await?;
        Ok(TaskCounts {
            total,
            todo,
            in_progress,
            done,
        })
    }

    async fn count_with_status(&self, status: TaskStatus) -> Result<u64, DbErr> {
        task::Entity::find()
            .filter(task::Column::Status.eq(status))
            .count(&self.inner)
            .await
    }

    /// Fetch a task by primary key.
    pub async fn get(&self, id: i32) -> Result<task::Model, CrudError> {
        task::Entity::find_by_id(id)
            .one(&self.inner)
            .await?
            .ok_or(CrudError::NotFound(id))
    }

    pub async fn create(&self, fields: ValidatedTask) -> Result<task::Model, CrudError> {
        let now = Utc::now();
        let created = task::ActiveModel {
            title: Set(fields.title),
            description: Set(fields.description),
            status: Set(fields.status),
            priority: Set(fields.priority),
            due_date: Set(fields.due_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.inner)
        .await?;

        info!("created task {} ({:?})", created.id, created.title);
        Ok(created)
    }

    /// Overwrite every mutable field of an existing task.
    pub async fn update(&self, id: i32, fields: ValidatedTask) -> Result<task::Model, CrudError> {
        let existing = self.get(id).await?;
        let updated_at = next_timestamp(existing.updated_at);

        let mut active: task::ActiveModel = existing.into();
        active.title = Set(fields.title);
        active.description = Set(fields.description);
        active.status = Set(fields.status);
        active.priority = Set(fields.priority);
        active.due_date = Set(fields.due_date);
        active.updated_at = Set(updated_at);
        let updated = active.update(&self.inner).await?;

        info!("updated task {}", updated.id);
        Ok(updated)
    }

    /// Advance a task to its next status.
    pub async fn toggle(&self, id: i32) -> Result<task::Model, CrudError> {
        let existing = self.get(id).await?;
        let from = existing.status;
        let next = existing.next_status();
        let updated_at = next_timestamp(existing.updated_at);

        let mut active: task::ActiveModel = existing.into();
        active.status = Set(next);
        active.updated_at = Set(updated_at);
        let toggled = active.update(&self.inner).await?;

        debug!("task {} status {} -> {}", id, from.code(), next.code());
        Ok(toggled)
    }

    /// Permanently remove a task.
    pub async fn delete(&self, id: i32) -> Result<(), CrudError> {
        let result = task::Entity::delete_by_id(id).exec(&self.inner).await?;
        if result.rows_affected == 0 {
            return Err(CrudError::NotFound(id));
        }
        info!("deleted task {}", id);
        Ok(())
    }
}
