//! # taskboard_server
//!
//! Server-rendered web interface over [`taskboard`].
//!
//! ```ignore
//! let state = AppState::connect("sqlite:./taskboard.db?mode=rwc").await?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod templates;

use axum::{
    Router,
    routing::{get, post},
};

pub use config::Config;
pub use error::AppError;
pub use handlers::AppState;

/// Build the routing table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_tasks))
        .route(
            "/create/",
            get(handlers::create_form).post(handlers::create_task),
        )
        .route("/:id/", get(handlers::task_detail))
        .route(
            "/:id/edit/",
            get(handlers::edit_form).post(handlers::update_task),
        )
        .route(
            "/:id/delete/",
            get(handlers::confirm_delete).post(handlers::delete_task),
        )
        .route("/:id/toggle/", post(handlers::toggle_task))
        .with_state(state)
}
