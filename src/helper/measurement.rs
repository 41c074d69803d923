//! Pixel distances, millimeter conversion and accuracy scoring.
//!
//! The millimeter scale is not measured. It assumes the detected jaw is as wide
//! as an average adult jaw (`MeasurementConfig::assumed_jaw_width_mm`). When
//! the jaw width collapses to zero the scale falls back to one pixel per
//! millimeter, so the reported values are raw pixels.

use log::debug;
use serde::Serialize;
use crate::config::config::MeasurementConfig;
use crate::error::MeasurementError;
use crate::helper::face_helper::{extract_face_points, FacePoints};
use crate::helper::face_shape::{FaceShape, RatioSet};
use crate::utils::coordinate::LandmarkSet;
use crate::utils::utils::round_to;

/// Width of an ISO/IEC 7810 ID-1 card.
// TODO: derive pixels_per_mm from a detected reference card instead of the jaw width.
pub const CREDIT_CARD_WIDTH_MM: f64 = 85.60;

pub const FALLBACK_PIXELS_PER_MM: f64 = 1.0;

const LANDMARK_ACCURACY_WEIGHT: f64 = 0.6;
const SYMMETRY_WEIGHT: f64 = 0.4;

/// safe_divide returns `fallback` unless the denominator is strictly positive.
pub fn safe_divide(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        fallback
    }
}

/// The eight distances the service reports. Used both in pixels and in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementSet {
    pub pupillary_distance: f64,
    pub pupil_height: f64,
    pub npd_left: f64,
    pub npd_right: f64,
    pub face_length: f64,
    pub cheekbone_width: f64,
    pub jaw_width: f64,
    pub forehead_width: f64,
}

impl MeasurementSet {
    pub fn from_points(p: &FacePoints) -> Self {
        let eye_center = (p.left_pupil + p.right_pupil) / 2.0;

        MeasurementSet {
            pupillary_distance: (p.right_pupil - p.left_pupil).norm(),
            pupil_height: (eye_center - p.top_of_face).norm(),
            npd_left: (p.left_pupil - p.nose_tip).norm(),
            npd_right: (p.right_pupil - p.nose_tip).norm(),
            face_length: (p.chin_bottom - p.top_of_face).norm(),
            cheekbone_width: (p.cheekbone_right - p.cheekbone_left).norm(),
            jaw_width: (p.jaw_right - p.jaw_left).norm(),
            forehead_width: (p.forehead_right - p.forehead_left).norm(),
        }
    }

    /// to_millimeters divides every distance by the scale. A non-positive
    /// scale leaves the values in pixels.
    pub fn to_millimeters(&self, pixels_per_mm: f64) -> Self {
        let convert = |px: f64| safe_divide(px, pixels_per_mm, px);

        MeasurementSet {
            pupillary_distance: convert(self.pupillary_distance),
            pupil_height: convert(self.pupil_height),
            npd_left: convert(self.npd_left),
            npd_right: convert(self.npd_right),
            face_length: convert(self.face_length),
            cheekbone_width: convert(self.cheekbone_width),
            jaw_width: convert(self.jaw_width),
            forehead_width: convert(self.forehead_width),
        }
    }

    pub fn ratios(&self) -> RatioSet {
        RatioSet::from_dimensions(self.face_length, self.cheekbone_width, self.jaw_width, self.forehead_width)
    }
}

pub fn pixels_per_mm(jaw_width_px: f64, assumed_jaw_width_mm: f64) -> f64 {
    if jaw_width_px > 0.0 {
        safe_divide(jaw_width_px, assumed_jaw_width_mm, FALLBACK_PIXELS_PER_MM)
    } else {
        FALLBACK_PIXELS_PER_MM
    }
}

/// Share of the expected mesh that was detected, in percent, capped at 100.
pub fn landmark_accuracy(detected: usize, expected: usize) -> f64 {
    (safe_divide(detected as f64, expected as f64, 0.0) * 100.0).min(100.0)
}

/// How closely the two naso-pupillary distances agree, relative to the
/// pupillary distance, in percent. Zero when the pupillary distance is zero.
pub fn symmetry_score(millimeters: &MeasurementSet) -> f64 {
    let difference = (millimeters.npd_left - millimeters.npd_right).abs();
    let asymmetry = safe_divide(difference, millimeters.pupillary_distance, 1.0);
    (100.0 - asymmetry * 100.0).max(0.0)
}

pub fn final_accuracy(landmark_accuracy: f64, symmetry_score: f64) -> f64 {
    round_to(landmark_accuracy * LANDMARK_ACCURACY_WEIGHT + symmetry_score * SYMMETRY_WEIGHT, 2)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementReport {
    pub landmark_count: usize,
    pub pixels_per_mm: f64,
    pub pixels: MeasurementSet,
    pub millimeters: MeasurementSet,
    pub ratios: RatioSet,
    pub face_shape: FaceShape,
    pub landmark_accuracy: f64,
    pub symmetry_score: f64,
    /// Weighted accuracy in percent, rounded to two decimals.
    pub accuracy: f64,
}

#[derive(Debug, Clone)]
pub struct MeasurementEngine {
    config: MeasurementConfig,
}

impl MeasurementEngine {
    pub fn new(config: MeasurementConfig) -> Self {
        MeasurementEngine { config }
    }

    /// measure derives every measurement of one face.
    ///
    /// # Arguments
    /// * `landmarks` - Normalized landmarks of the first detected face
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    ///
    /// # Returns
    /// * `Result<MeasurementReport, MeasurementError>`
    pub fn measure(&self, landmarks: &LandmarkSet, width: u32, height: u32) -> Result<MeasurementReport, MeasurementError> {
        let points = extract_face_points(landmarks, width, height, self.config.expected_landmark_count)?;

        let pixels = MeasurementSet::from_points(&points);
        let pixels_per_mm = pixels_per_mm(pixels.jaw_width, self.config.assumed_jaw_width_mm);
        debug!("pixels_per_mm (from jaw width): {:.2}", pixels_per_mm);
        debug!("pixel measurements: {:?}", pixels);

        let millimeters = pixels.to_millimeters(pixels_per_mm);
        debug!("millimeter measurements: {:?}", millimeters);

        let ratios = millimeters.ratios();
        let face_shape = FaceShape::classify(&ratios);

        let landmark_accuracy = landmark_accuracy(landmarks.len(), self.config.expected_landmark_count);
        let symmetry_score = symmetry_score(&millimeters);
        let accuracy = final_accuracy(landmark_accuracy, symmetry_score);

        Ok(MeasurementReport {
            landmark_count: landmarks.len(),
            pixels_per_mm,
            pixels,
            millimeters,
            ratios,
            face_shape,
            landmark_accuracy,
            symmetry_score,
            accuracy,
        })
    }
}

impl Default for MeasurementEngine {
    fn default() -> Self {
        MeasurementEngine::new(MeasurementConfig::default())
    }
}
