//! Validation of user-submitted task fields.
//!
//! A [`TaskForm`] holds the raw strings exactly as they arrived from the
//! browser, so a rejected submission can be shown back to the user unchanged.
//! [`TaskForm::validate`] either produces a [`ValidatedTask`] ready to be
//! persisted, or [`FormErrors`] keyed by field name.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::task::{self, TITLE_MAX_LENGTH, TaskPriority, TaskStatus};

const REQUIRED: &str = "This field is required.";
const INVALID_DATE: &str = "Enter a valid date.";

/// Accepted `due_date` input formats, tried in order.
const DATE_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Raw form fields for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
}

/// Field values that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

/// Error messages per field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for a single field; empty when the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl TaskForm {
    /// Blank form with the model defaults preselected.
    pub fn initial() -> Self {
        Self {
            status: TaskStatus::default().code().to_string(),
            priority: TaskPriority::default().code().to_string(),
            ..Default::default()
        }
    }

    /// Form pre-filled from a stored task, as shown on the edit page.
    pub fn from_model(model: &task::Model) -> Self {
        Self {
            title: model.title.clone(),
            description: model.description.clone(),
            status: model.status.code().to_string(),
            priority: model.priority.code().to_string(),
            due_date: model
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedTask, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        let title_len = title.chars().count();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title_len > TITLE_MAX_LENGTH {
            errors.add(
                "title",
                format!(
                    "Ensure this value has at most {TITLE_MAX_LENGTH} characters (it has {title_len})."
                ),
            );
        }

        let status = parse_choice::<TaskStatus>(&self.status, "status", &mut errors);
        let priority = parse_choice::<TaskPriority>(&self.priority, "priority", &mut errors);

        let due_date = match self.due_date.trim() {
            "" => None,
            raw => match parse_date(raw) {
                Some(date) => Some(date),
                None => {
                    errors.add("due_date", INVALID_DATE);
                    None
                }
            },
        };

        match (status, priority) {
            (Some(status), Some(priority)) if errors.is_empty() => Ok(ValidatedTask {
                title: title.to_string(),
                description: self.description.trim().to_string(),
                status,
                priority,
                due_date,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_choice<T>(raw: &str, field: &'static str, errors: &mut FormErrors) -> Option<T>
where
    T: std::str::FromStr<Err = task::UnknownChoice>,
{
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            errors.add(field, err.to_string());
            None
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS.iter().find_map(|fmt| {
        // chrono's `%Y` takes any number of digits; a full year is four.
        if fmt.contains("%Y") && !has_four_digit_year(raw) {
            return None;
        }
        NaiveDate::parse_from_str(raw, fmt).ok()
    })
}

fn has_four_digit_year(raw: &str) -> bool {
    raw.split(['-', '/'])
        .any(|part| part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit()))
}
