use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use thiserror::Error;
use crate::error::ProcessError;

/// Every non-success outcome of the HTTP API. Rendered as `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No image file provided")]
    MissingImage,

    #[error("Empty filename")]
    EmptyFilename,

    /// The multipart body could not be read, e.g. it exceeded the upload limit.
    #[error("{message}")]
    UploadRejected { status: StatusCode, message: String },

    #[error("Invalid image file")]
    InvalidImage,

    #[error("No face detected")]
    NoFace,

    #[error("Incomplete facial landmarks detected")]
    IncompleteLandmarks,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingImage | Self::EmptyFilename | Self::InvalidImage => StatusCode::BAD_REQUEST,
            Self::UploadRejected { status, .. } => *status,
            Self::NoFace | Self::IncompleteLandmarks => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::InvalidImage => ApiError::InvalidImage,
            ProcessError::NoFace => ApiError::NoFace,
            ProcessError::Measurement(e) => {
                warn!("{e}");
                ApiError::IncompleteLandmarks
            }
            ProcessError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(e) => error!("Error while processing image: {e:?}"),
            other => warn!("Request rejected ({}): {other}", status.as_u16()),
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use crate::error::{MeasurementError, ProcessError};
    use crate::server::error::ApiError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmptyFilename.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NoFace.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::IncompleteLandmarks.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::Internal(anyhow::anyhow!("boom")).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_process_errors_map_to_api_messages() {
        let err = ApiError::from(ProcessError::Measurement(MeasurementError::IncompleteLandmarks("477 points".into())));
        assert_eq!(err.to_string(), "Incomplete facial landmarks detected");

        let err = ApiError::from(ProcessError::Other(anyhow::anyhow!("decoder crashed")));
        assert_eq!(err.to_string(), "decoder crashed");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
