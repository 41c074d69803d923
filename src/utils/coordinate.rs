use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A point in image pixel space.
pub type PixelPoint = Vector2<f64>;

/// A single landmark in normalized image coordinates, both axes in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate2D {
    pub x: f32,
    pub y: f32,
}

impl Coordinate2D {
    pub fn new(x: f32, y: f32) -> Self {
        Coordinate2D { x, y }
    }

    /// to_pixel scales the normalized coordinate by the image dimensions.
    pub fn to_pixel(&self, width: u32, height: u32) -> PixelPoint {
        Vector2::new(self.x as f64 * width as f64, self.y as f64 * height as f64)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The ordered landmark points of one detected face.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Coordinate2D>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Coordinate2D>) -> Self {
        LandmarkSet { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Coordinate2D> {
        self.points.get(index)
    }
}

impl From<Vec<Coordinate2D>> for LandmarkSet {
    fn from(points: Vec<Coordinate2D>) -> Self {
        LandmarkSet::new(points)
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::coordinate::{Coordinate2D, LandmarkSet};

    #[test]
    fn test_to_pixel_scales_by_image_size() {
        let c = Coordinate2D::new(0.25, 0.5);
        let p = c.to_pixel(640, 480);
        assert!((p.x - 160.0).abs() < 1e-9);
        assert!((p.y - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_landmark_set_deserializes_from_json() {
        let raw = r#"{"points":[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4}]}"#;
        let set: LandmarkSet = serde_json::from_str(raw).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1), Some(&Coordinate2D::new(0.3, 0.4)));
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_non_finite_coordinate() {
        assert!(!Coordinate2D::new(f32::NAN, 0.5).is_finite());
        assert!(Coordinate2D::new(0.0, 0.5).is_finite());
    }
}
