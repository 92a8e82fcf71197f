use crate::client_addr::ClientAddrError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    ClientAddr(#[from] ClientAddrError),

    #[error("failed to render template: {0}")]
    Render(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::ClientAddr(err) => warn!("Unusable client address: {err}"),
            Self::Render(_) => error!("{self}"),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
