use std::sync::Arc;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use log::{info, warn};
use serde_json::{json, Value};
use crate::server::error::ApiError;
use crate::server::response::MeasurementResponse;
use crate::server::upload::TransientFile;
use crate::server::AppState;

const IMAGE_FIELD: &str = "image";

pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "Face measurement server is running!" }))
}

/// Finds the `image` file field. Fields without a filename are form values,
/// not files, and are skipped.
async fn read_image_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(ApiError::MissingImage),
            Err(e) => {
                return Err(ApiError::UploadRejected { status: e.status(), message: e.body_text() })
            }
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue
        }
        let file_name = match field.file_name() {
            Some(file_name) => file_name.to_string(),
            None => continue,
        };
        if file_name.is_empty() {
            return Err(ApiError::EmptyFilename)
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::UploadRejected { status: e.status(), message: e.body_text() })?;
        return Ok((file_name, data))
    }
}

pub async fn process_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MeasurementResponse>, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => {
            warn!("Request without a multipart body: {e}");
            return Err(ApiError::MissingImage)
        }
    };

    let (file_name, data) = read_image_field(&mut multipart).await?;
    let upload = TransientFile::create(&state.temp_dir, &data).await?;
    info!("Image received: {}, saved temporarily as: {}", file_name, upload.path().display());

    let report = state.pipeline.process_file(upload.path()).await?;
    Ok(Json(MeasurementResponse::from(&report)))
}
