mod handlers;
mod model;
mod repository;
mod routes;
mod validation;

pub use model::*;
pub use validation::{validate, Violation};

use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().nest("/api/notes", routes::router(state))
}
