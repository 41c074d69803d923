use thiserror::Error;

/// Failures of the measurement engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasurementError {
    /// Fewer points than the full mesh, or a pupil point that was not detected.
    #[error("Incomplete facial landmarks detected: {0}")]
    IncompleteLandmarks(String),
}

/// Outcome of running one image through the pipeline.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Invalid image file")]
    InvalidImage,

    #[error("No face detected")]
    NoFace,

    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
