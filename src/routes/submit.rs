use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;

use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::state::SharedState;
use crate::submission::parser;
use crate::submission::pipeline::{self, PipelineResult};

pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match generate(&state, &headers, body).await {
        Ok(result) => {
            tracing::info!(
                "Generated {} ({} conditions, {} corrections)",
                result.file_name,
                result.conditions,
                result.corrections
            );
            Redirect::to(&format!("/result/{}", result.file_name)).into_response()
        }
        Err(e) => {
            tracing::error!("Report generation failed: {e}");
            let jar = SignedCookieJar::from_headers(&headers, state.cookie_key.clone());
            let jar = flash::set(jar, &Flash::danger(format!("Error generando DOCX: {e}")));
            (jar, Redirect::to("/")).into_response()
        }
    }
}

async fn generate(
    state: &SharedState,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<PipelineResult, AppError> {
    let raw = parser::parse_multipart(headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let storage = state.storage.clone();
    let now = chrono::Local::now().naive_local();

    tokio::task::spawn_blocking(move || pipeline::run(&storage, &raw, now))
        .await
        .map_err(|e| AppError::Internal(format!("Report task failed: {e}")))?
}
