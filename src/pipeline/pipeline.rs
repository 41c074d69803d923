use std::path::Path;
use std::sync::Arc;
use anyhow::Error;
use log::info;
use crate::error::ProcessError;
use crate::helper::measurement::{MeasurementEngine, MeasurementReport};
use crate::modules::landmark_provider::LandmarkProvider;
use crate::utils::image::{read_image, DecodedImage};

/// Decode, detect, measure.
#[derive(Clone)]
pub struct MeasurementPipeline {
    provider: Arc<dyn LandmarkProvider>,
    engine: MeasurementEngine,
}

impl MeasurementPipeline {

    /// new initializes new instance of the pipeline
    pub fn new(provider: Arc<dyn LandmarkProvider>, engine: MeasurementEngine) -> Self {
        MeasurementPipeline {
            provider,
            engine,
        }
    }

    /// process_file measures the face in the image file at `path`.
    ///
    /// Decoding runs on the blocking thread pool.
    ///
    /// # Arguments
    /// * `path` - Path of the uploaded image
    ///
    /// # Returns
    /// * `Result<MeasurementReport, ProcessError>`
    pub async fn process_file(&self, path: &Path) -> Result<MeasurementReport, ProcessError> {
        let owned_path = path.to_path_buf();
        let decoded = tokio::task::spawn_blocking(move || read_image(&owned_path))
            .await
            .map_err(Error::from)??;

        let image = match decoded {
            Some(image) => image,
            None => return Err(ProcessError::InvalidImage),
        };
        self.process_image(&image).await
    }

    /// process_image measures the first face found in a decoded image.
    ///
    /// # Arguments
    /// * `image` - DecodedImage
    ///
    /// # Returns
    /// * `Result<MeasurementReport, ProcessError>`
    pub async fn process_image(&self, image: &DecodedImage) -> Result<MeasurementReport, ProcessError> {
        let landmarks = match self.provider.detect(image).await? {
            Some(landmarks) => landmarks,
            None => return Err(ProcessError::NoFace),
        };

        let report = self.engine.measure(&landmarks, image.width, image.height)?;
        info!(
            "Face processed. PD: {:.1} mm, PH: {:.1} mm, Shape: {}, Accuracy: {}%",
            report.millimeters.pupillary_distance,
            report.millimeters.pupil_height,
            report.face_shape,
            report.accuracy,
        );
        Ok(report)
    }
}
