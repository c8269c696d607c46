use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use noaas_core::error::{ProvisionError, ResolveError};
use noaas_model::ModelError;
use thiserror::Error;

use crate::http::ServiceResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Provision(e) => match e {
                ProvisionError::Fetch(_) => StatusCode::BAD_GATEWAY,
                ProvisionError::Execution(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ProvisionError::Submission(_) => StatusCode::BAD_GATEWAY,
                ProvisionError::Resolution(ResolveError::Timeout(_)) => {
                    StatusCode::GATEWAY_TIMEOUT
                }
                ProvisionError::Resolution(ResolveError::Cancelled) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ProvisionError::Resolution(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ServiceResponse::failure(self.to_string()))).into_response()
    }
}
