//! Request handlers, one per page or action.
//!
//! Successful mutations answer with a `303 See Other` back to the list.
//! Unknown or malformed task ids answer with a 404 page.

use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, Query, State, rejection::FormRejection},
    response::{Html, IntoResponse, Redirect, Response},
};
use log::{debug, info};
use minijinja::context;
use serde::Deserialize;
use taskboard::{FormErrors, TaskDb, TaskDbBuilder, TaskFilter, TaskForm, task};

use crate::error::AppError;
use crate::templates::{Templates, TaskView, priority_choices, status_choices};

/// Shared application dependencies.
#[derive(Clone)]
pub struct AppState {
    pub db: TaskDb,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(db: TaskDb) -> Result<Self, AppError> {
        Ok(Self {
            db,
            templates: Arc::new(Templates::new()?),
        })
    }

    /// Connect to `database_url`, create the schema if needed and load templates.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let db = TaskDbBuilder::new(database_url).build().await?;
        Self::new(db)
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<Html<String>, AppError> {
        Ok(Html(self.templates.render(name, ctx)?))
    }
}

/// Parse a task id path segment. Anything that is not an integer names no task.
fn parse_task_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>().map_err(|_| AppError::NotFound)
}

/// The submitted fields. A missing or unreadable body counts as an empty
/// submission so validation reports every required field.
fn submitted(form: Result<Form<TaskForm>, FormRejection>) -> TaskForm {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("empty task form body: {rejection}");
            TaskForm::default()
        }
    }
}

fn to_list() -> Redirect {
    Redirect::to("/")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub status: String,
    pub priority: String,
}

/// `GET /`
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, AppError> {
    let filter = TaskFilter::new(&query.status, &query.priority);
    let tasks = state.db.list(&filter).await?;
    let counts = state.db.counts().await?;
    let tasks: Vec<TaskView> = tasks.iter().map(TaskView::from).collect();

    state.render(
        "task_list.html",
        context! {
            tasks => tasks,
            counts => counts,
            current_status => query.status,
            current_priority => query.priority,
            statuses => status_choices(),
            priorities => priority_choices(),
        },
    )
}

/// `GET /<id>/`
pub async fn task_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let task = state.db.get(parse_task_id(&id)?).await?;
    state.render(
        "task_detail.html",
        context! { task => TaskView::from(&task) },
    )
}

fn render_form(
    state: &AppState,
    form_title: String,
    submit_label: &str,
    action: String,
    form: &TaskForm,
    errors: &FormErrors,
) -> Result<Html<String>, AppError> {
    state.render(
        "task_form.html",
        context! {
            form_title => form_title,
            submit_label => submit_label,
            action => action,
            form => form,
            errors => errors,
            statuses => status_choices(),
            priorities => priority_choices(),
        },
    )
}

fn render_create_form(
    state: &AppState,
    form: &TaskForm,
    errors: &FormErrors,
) -> Result<Html<String>, AppError> {
    render_form(
        state,
        "Create New Task".to_string(),
        "Create Task",
        "/create/".to_string(),
        form,
        errors,
    )
}

fn render_edit_form(
    state: &AppState,
    task: &task::Model,
    form: &TaskForm,
    errors: &FormErrors,
) -> Result<Html<String>, AppError> {
    render_form(
        state,
        format!("Edit: {}", task.title),
        "Save Changes",
        format!("/{}/edit/", task.id),
        form,
        errors,
    )
}

/// `GET /create/`
pub async fn create_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_create_form(&state, &TaskForm::initial(), &FormErrors::default())
}

/// `POST /create/`
pub async fn create_task(
    State(state): State<AppState>,
    form: Result<Form<TaskForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = submitted(form);
    match form.validate() {
        Ok(fields) => {
            state.db.create(fields).await?;
            Ok(to_list().into_response())
        }
        Err(errors) => {
            debug!("create form rejected: {errors}");
            Ok(render_create_form(&state, &form, &errors)?.into_response())
        }
    }
}

/// `GET /<id>/edit/`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let task = state.db.get(parse_task_id(&id)?).await?;
    render_edit_form(&state, &task, &TaskForm::from_model(&task), &FormErrors::default())
}

/// `POST /<id>/edit/`
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<TaskForm>, FormRejection>,
) -> Result<Response, AppError> {
    let task = state.db.get(parse_task_id(&id)?).await?;
    let form = submitted(form);
    match form.validate() {
        Ok(fields) => {
            state.db.update(task.id, fields).await?;
            Ok(to_list().into_response())
        }
        Err(errors) => {
            debug!("edit form for task {} rejected: {errors}", task.id);
            Ok(render_edit_form(&state, &task, &form, &errors)?.into_response())
        }
    }
}

/// `GET /<id>/delete/`
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let task = state.db.get(parse_task_id(&id)?).await?;
    state.render(
        "task_confirm_delete.html",
        context! { task => TaskView::from(&task) },
    )
}

/// `POST /<id>/delete/`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    state.db.delete(parse_task_id(&id)?).await?;
    Ok(to_list())
}

/// `POST /<id>/toggle/`
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let task = state.db.toggle(parse_task_id(&id)?).await?;
    info!("task {} is now {}", task.id, task.status.code());
    Ok(to_list())
}
