use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use wall_db::StoreError;
use wall_types::api::MissingField;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid json")]
    InvalidJson(#[from] serde_json::Error),

    #[error("message and color required")]
    MissingField,

    #[error("db error")]
    Store(#[from] StoreError),

    #[error("internal error")]
    Join(#[from] tokio::task::JoinError),
}

impl From<MissingField> for ApiError {
    fn from(_: MissingField) -> Self {
        ApiError::MissingField
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidJson(e) => {
                warn!("Rejected entry payload: {}", e);
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingField => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => {
                error!("Store failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Join(e) => {
                error!("spawn_blocking join error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
