use super::AppState;
use crate::{error::AppError, templates};
use axum::{extract::State, response::Html};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HomeContext<'a> {
    version: &'a str,
}

#[tracing::instrument(skip_all)]
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let context = HomeContext {
        version: &state.version,
    };

    Ok(Html(state.templates.render(templates::INDEX, context)?))
}
