use anyhow::Error;
use async_trait::async_trait;
use crate::utils::coordinate::LandmarkSet;
use crate::utils::image::DecodedImage;

/// A facial landmark detector.
///
/// Implementations return the normalized landmarks of the first detected face
/// only, or `None` when the image contains no face. A model instance that is
/// not reentrant must serialize calls itself.
#[async_trait]
pub trait LandmarkProvider: Send + Sync {
    async fn detect(&self, image: &DecodedImage) -> Result<Option<LandmarkSet>, Error>;
}
