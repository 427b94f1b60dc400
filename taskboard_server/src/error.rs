use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use log::error;
use taskboard::CrudError;
use taskboard::sea_orm::DbErr;
use thiserror::Error;

use crate::templates::{ERROR_PAGE, NOT_FOUND_PAGE};

/// Failures a request handler can end in. Form validation errors are not
/// here: they re-render the form with a 200.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Task not found")]
    NotFound,

    #[error("Database operation failed: {0}")]
    Database(#[from] DbErr),

    #[error("Template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

impl From<CrudError> for AppError {
    fn from(err: CrudError) -> Self {
        match err {
            CrudError::NotFound(_) => AppError::NotFound,
            CrudError::Database(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            other => {
                error!("request failed: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_PAGE)).into_response()
            }
        }
    }
}
