pub mod files;
pub mod submit;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn report_routes() -> Router<SharedState> {
    Router::new()
        .route("/submit", post(submit::submit))
        // Downloads
        .route("/generated/{filename}", get(files::generated))
        .route("/uploads/{filename}", get(files::uploaded))
}
