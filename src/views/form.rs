use askama::Template;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;

use crate::flash::{self, Flash};
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "form.html")]
struct FormTemplate {
    today: String,
    flash: Option<Flash>,
}

pub async fn form_page(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let jar = SignedCookieJar::from_headers(&headers, state.cookie_key.clone());
    let (jar, flash) = flash::take(jar);

    let template = FormTemplate {
        today: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        flash,
    };
    (jar, Html(template.render().unwrap_or_default())).into_response()
}
