pub mod form;
pub mod result;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(form::form_page))
        .route("/result/{filename}", get(result::result_page))
}
