use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};

use crate::error::AppError;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "result.html")]
struct ResultTemplate {
    docx_file: String,
}

pub async fn result_page(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exists = match state.storage.generated_path(&filename) {
        Some(path) => tokio::fs::try_exists(&path).await?,
        None => false,
    };
    if !exists {
        return Err(AppError::NotFound("Report not found".to_string()));
    }

    let template = ResultTemplate {
        docx_file: filename,
    };
    Ok(Html(template.render().unwrap_or_default()))
}
