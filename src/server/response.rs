use serde::{Deserialize, Serialize};
use crate::helper::measurement::MeasurementReport;
use crate::utils::utils::round_to;

pub const DISCLAIMER: &str = "These measurements were estimated using computer vision technology and an assumed scale. For confirmation, please consult a certified professional with proper measuring tools, ideally by using an image with a known reference object.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasoPupillaryDistance {
    #[serde(rename = "Left Eye")]
    pub left_eye: String,
    #[serde(rename = "Right Eye")]
    pub right_eye: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedMeasurements {
    #[serde(rename = "Face Length (mm)")]
    pub face_length: f64,
    #[serde(rename = "Cheekbone Width (mm)")]
    pub cheekbone_width: f64,
    #[serde(rename = "Jaw Width (mm)")]
    pub jaw_width: f64,
    #[serde(rename = "Forehead Width (mm)")]
    pub forehead_width: f64,
}

/// Body of a successful `POST /process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResponse {
    #[serde(rename = "Pupillary Distance (PD)")]
    pub pupillary_distance: String,
    #[serde(rename = "Pupil Height (PH)")]
    pub pupil_height: String,
    #[serde(rename = "Naso-Pupillary Distance (NPD)")]
    pub naso_pupillary_distance: NasoPupillaryDistance,
    #[serde(rename = "Face Shape")]
    pub face_shape: String,
    #[serde(rename = "Measurement Accuracy")]
    pub measurement_accuracy: String,
    #[serde(rename = "Detailed Measurements")]
    pub detailed_measurements: DetailedMeasurements,
    #[serde(rename = "Message")]
    pub message: String,
}

fn millimeters(value: f64) -> String {
    format!("{:.1} mm", value)
}

/// Whole numbers keep one decimal, "100.0%" rather than "100%".
fn percentage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}%", value)
    } else {
        format!("{}%", value)
    }
}

impl From<&MeasurementReport> for MeasurementResponse {
    fn from(report: &MeasurementReport) -> Self {
        let mm = &report.millimeters;

        MeasurementResponse {
            pupillary_distance: millimeters(mm.pupillary_distance),
            pupil_height: millimeters(mm.pupil_height),
            naso_pupillary_distance: NasoPupillaryDistance {
                left_eye: millimeters(mm.npd_left),
                right_eye: millimeters(mm.npd_right),
            },
            face_shape: report.face_shape.name().to_string(),
            measurement_accuracy: percentage(report.accuracy),
            detailed_measurements: DetailedMeasurements {
                face_length: round_to(mm.face_length, 2),
                cheekbone_width: round_to(mm.cheekbone_width, 2),
                jaw_width: round_to(mm.jaw_width, 2),
                forehead_width: round_to(mm.forehead_width, 2),
            },
            message: DISCLAIMER.to_string(),
        }
    }
}
