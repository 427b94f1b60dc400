//! HTML templates compiled into the binary and the view structs they render.

use minijinja::Environment;
use serde::Serialize;
use taskboard::{TaskPriority, TaskStatus, task};

const TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    ("task_list.html", include_str!("../templates/task_list.html")),
    ("task_detail.html", include_str!("../templates/task_detail.html")),
    ("task_form.html", include_str!("../templates/task_form.html")),
    (
        "task_confirm_delete.html",
        include_str!("../templates/task_confirm_delete.html"),
    ),
];

pub const NOT_FOUND_PAGE: &str = include_str!("../templates/not_found.html");
pub const ERROR_PAGE: &str = include_str!("../templates/error.html");

/// Template environment. HTML auto-escaping is on for every `.html` template.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

/// A select option.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn status_choices() -> Vec<Choice> {
    TaskStatus::ALL
        .into_iter()
        .map(|s| Choice {
            value: s.code(),
            label: s.label(),
        })
        .collect()
}

pub fn priority_choices() -> Vec<Choice> {
    TaskPriority::ALL
        .into_iter()
        .map(|p| Choice {
            value: p.code(),
            label: p.label(),
        })
        .collect()
}

/// Flattened task as the templates see it.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub next_status_label: &'static str,
    pub priority: &'static str,
    pub priority_label: &'static str,
    pub due_date: Option<String>,
    pub is_overdue: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&task::Model> for TaskView {
    fn from(model: &task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title.clone(),
            description: model.description.clone(),
            status: model.status.code(),
            status_label: model.status.label(),
            next_status_label: model.next_status().label(),
            priority: model.priority.code(),
            priority_label: model.priority.label(),
            due_date: model.due_date.map(|d| d.format("%b %d, %Y").to_string()),
            is_overdue: model.is_overdue(),
            created_at: model.created_at.format("%b %d, %Y %H:%M").to_string(),
            updated_at: model.updated_at.format("%b %d, %Y %H:%M").to_string(),
        }
    }
}
