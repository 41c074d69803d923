use crate::error::MeasurementError;
use crate::utils::coordinate::{LandmarkSet, PixelPoint};

/// Points of the refined face mesh topology used for measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacialLandmark {
    LeftPupil,
    RightPupil,
    NoseTip,
    TopOfFace,
    ChinBottom,
    JawRight,
    JawLeft,
    CheekboneRight,
    CheekboneLeft,
    ForeheadRight,
    ForeheadLeft,
}

impl FacialLandmark {
    pub const ALL: [FacialLandmark; 11] = [
        FacialLandmark::LeftPupil,
        FacialLandmark::RightPupil,
        FacialLandmark::NoseTip,
        FacialLandmark::TopOfFace,
        FacialLandmark::ChinBottom,
        FacialLandmark::JawRight,
        FacialLandmark::JawLeft,
        FacialLandmark::CheekboneRight,
        FacialLandmark::CheekboneLeft,
        FacialLandmark::ForeheadRight,
        FacialLandmark::ForeheadLeft,
    ];

    /// Index of the point in the 478-point refined mesh. 468 and 473 are iris centers.
    pub fn index(&self) -> usize {
        match self {
            FacialLandmark::LeftPupil => 468,
            FacialLandmark::RightPupil => 473,
            FacialLandmark::NoseTip => 1,
            FacialLandmark::TopOfFace => 10,
            FacialLandmark::ChinBottom => 152,
            FacialLandmark::JawRight => 454,
            FacialLandmark::JawLeft => 234,
            FacialLandmark::CheekboneRight => 323,
            FacialLandmark::CheekboneLeft => 93,
            FacialLandmark::ForeheadRight => 301,
            FacialLandmark::ForeheadLeft => 71,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FacialLandmark::LeftPupil => "left_pupil",
            FacialLandmark::RightPupil => "right_pupil",
            FacialLandmark::NoseTip => "nose_tip",
            FacialLandmark::TopOfFace => "top_of_face",
            FacialLandmark::ChinBottom => "chin_bottom",
            FacialLandmark::JawRight => "jaw_right",
            FacialLandmark::JawLeft => "jaw_left",
            FacialLandmark::CheekboneRight => "cheekbone_right",
            FacialLandmark::CheekboneLeft => "cheekbone_left",
            FacialLandmark::ForeheadRight => "forehead_right",
            FacialLandmark::ForeheadLeft => "forehead_left",
        }
    }
}

/// The named measurement points of one face, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePoints {
    pub left_pupil: PixelPoint,
    pub right_pupil: PixelPoint,
    pub nose_tip: PixelPoint,
    pub top_of_face: PixelPoint,
    pub chin_bottom: PixelPoint,
    pub jaw_right: PixelPoint,
    pub jaw_left: PixelPoint,
    pub cheekbone_right: PixelPoint,
    pub cheekbone_left: PixelPoint,
    pub forehead_right: PixelPoint,
    pub forehead_left: PixelPoint,
}

/// validate_landmarks checks the landmark set is complete enough to measure.
///
/// # Arguments
/// * `landmarks` - Normalized landmarks of one face
/// * `expected_count` - Minimum number of points, 478 for the refined mesh
///
/// # Returns
/// * `Result<(), MeasurementError>`
pub fn validate_landmarks(landmarks: &LandmarkSet, expected_count: usize) -> Result<(), MeasurementError> {
    if landmarks.len() < expected_count {
        return Err(MeasurementError::IncompleteLandmarks(format!(
            "expected at least {} points, got {}", expected_count, landmarks.len()
        )))
    }

    for pupil in [FacialLandmark::LeftPupil, FacialLandmark::RightPupil] {
        match landmarks.get(pupil.index()) {
            Some(point) if point.x == 0.0 => {
                return Err(MeasurementError::IncompleteLandmarks(format!("{} was not detected", pupil.name())))
            }
            Some(_) => {}
            None => {
                return Err(MeasurementError::IncompleteLandmarks(format!("{} is missing", pupil.name())))
            }
        }
    }
    Ok(())
}

/// extract_face_points maps the named landmarks into pixel space.
///
/// # Arguments
/// * `landmarks` - Normalized landmarks of one face
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `expected_count` - Minimum number of points, 478 for the refined mesh
///
/// # Returns
/// * `Result<FacePoints, MeasurementError>`
pub fn extract_face_points(
    landmarks: &LandmarkSet,
    width: u32,
    height: u32,
    expected_count: usize,
) -> Result<FacePoints, MeasurementError> {
    validate_landmarks(landmarks, expected_count)?;

    let point = |landmark: FacialLandmark| -> Result<PixelPoint, MeasurementError> {
        match landmarks.get(landmark.index()) {
            Some(c) if c.is_finite() => Ok(c.to_pixel(width, height)),
            Some(_) => Err(MeasurementError::IncompleteLandmarks(format!("{} is not finite", landmark.name()))),
            None => Err(MeasurementError::IncompleteLandmarks(format!("{} is missing", landmark.name()))),
        }
    };

    Ok(FacePoints {
        left_pupil: point(FacialLandmark::LeftPupil)?,
        right_pupil: point(FacialLandmark::RightPupil)?,
        nose_tip: point(FacialLandmark::NoseTip)?,
        top_of_face: point(FacialLandmark::TopOfFace)?,
        chin_bottom: point(FacialLandmark::ChinBottom)?,
        jaw_right: point(FacialLandmark::JawRight)?,
        jaw_left: point(FacialLandmark::JawLeft)?,
        cheekbone_right: point(FacialLandmark::CheekboneRight)?,
        cheekbone_left: point(FacialLandmark::CheekboneLeft)?,
        forehead_right: point(FacialLandmark::ForeheadRight)?,
        forehead_left: point(FacialLandmark::ForeheadLeft)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;
    use crate::error::MeasurementError;
    use crate::helper::face_helper::{extract_face_points, FacialLandmark};
    use crate::utils::coordinate::{Coordinate2D, LandmarkSet};

    /// A full refined mesh with every point at the image center except the
    /// ones given in `overrides`.
    pub(crate) fn landmark_set(count: usize, overrides: &[(FacialLandmark, (f32, f32))]) -> LandmarkSet {
        let mut points = vec![Coordinate2D::new(0.5, 0.5); count];
        for (landmark, (x, y)) in overrides {
            if landmark.index() < count {
                points[landmark.index()] = Coordinate2D::new(*x, *y);
            }
        }
        LandmarkSet::new(points)
    }

    /// A plausible frontal face, normalized to a square image.
    pub(crate) fn frontal_face() -> Vec<(FacialLandmark, (f32, f32))> {
        vec![
            (FacialLandmark::LeftPupil, (0.40, 0.45)),
            (FacialLandmark::RightPupil, (0.60, 0.45)),
            (FacialLandmark::NoseTip, (0.50, 0.58)),
            (FacialLandmark::TopOfFace, (0.50, 0.20)),
            (FacialLandmark::ChinBottom, (0.50, 0.90)),
            (FacialLandmark::JawRight, (0.78, 0.55)),
            (FacialLandmark::JawLeft, (0.22, 0.55)),
            (FacialLandmark::CheekboneRight, (0.76, 0.50)),
            (FacialLandmark::CheekboneLeft, (0.24, 0.50)),
            (FacialLandmark::ForeheadRight, (0.70, 0.30)),
            (FacialLandmark::ForeheadLeft, (0.30, 0.30)),
        ]
    }

    #[test]
    fn test_landmark_indices_are_distinct() {
        let indices: HashSet<usize> = FacialLandmark::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(indices.len(), FacialLandmark::ALL.len());
        assert!(indices.iter().all(|&i| i < 478));
    }

    #[test]
    fn test_extract_face_points_scales_to_pixels() {
        let set = landmark_set(478, &frontal_face());
        let points = extract_face_points(&set, 1000, 500, 478).unwrap();
        assert!((points.left_pupil.x - 400.0).abs() < 1e-3);
        assert!((points.left_pupil.y - 225.0).abs() < 1e-3);
        assert!((points.chin_bottom.y - 450.0).abs() < 1e-3);
    }

    #[test]
    fn test_477_points_are_incomplete() {
        let set = landmark_set(477, &frontal_face());
        let err = extract_face_points(&set, 640, 480, 478).unwrap_err();
        assert!(matches!(err, MeasurementError::IncompleteLandmarks(_)));
    }

    #[test]
    fn test_zero_left_pupil_is_incomplete() {
        let mut face = frontal_face();
        face[0] = (FacialLandmark::LeftPupil, (0.0, 0.45));
        let set = landmark_set(478, &face);
        assert!(extract_face_points(&set, 640, 480, 478).is_err());
    }

    #[test]
    fn test_zero_right_pupil_is_incomplete() {
        let mut face = frontal_face();
        face[1] = (FacialLandmark::RightPupil, (0.0, 0.45));
        let set = landmark_set(500, &face);
        assert!(extract_face_points(&set, 640, 480, 478).is_err());
    }

    #[test]
    fn test_non_finite_point_is_incomplete() {
        let mut face = frontal_face();
        face[4] = (FacialLandmark::ChinBottom, (f32::NAN, 0.9));
        let set = landmark_set(478, &face);
        assert!(extract_face_points(&set, 640, 480, 478).is_err());
    }
}
