//! Rule-based face shape classification from width and length ratios.

use std::fmt;
use serde::{Deserialize, Serialize};

pub const TIGHT_SIMILARITY: f64 = 0.10;
pub const MODERATE_SIMILARITY: f64 = 0.15;
pub const SIGNIFICANT_DIFFERENCE: f64 = 0.25;

/// Length tolerance of the square rule, wider than `TIGHT_SIMILARITY`.
const SQUARE_LENGTH_TOLERANCE: f64 = 0.20;

/// Added to each width and length before dividing.
pub const RATIO_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceShape {
    Square,
    Diamond,
    Heart,
    Triangle,
    Round,
    Rectangle,
    Oval,
}

impl FaceShape {
    pub fn name(&self) -> &'static str {
        match self {
            FaceShape::Square => "Square",
            FaceShape::Diamond => "Diamond",
            FaceShape::Heart => "Heart",
            FaceShape::Triangle => "Triangle",
            FaceShape::Round => "Round",
            FaceShape::Rectangle => "Rectangle",
            FaceShape::Oval => "Oval",
        }
    }

    /// classify walks the rules in priority order; the first match wins and
    /// anything unmatched is `Oval`.
    pub fn classify(ratios: &RatioSet) -> FaceShape {
        let ltw = ratios.length_to_width;
        let jtc = ratios.jaw_to_cheekbone;
        let ftc = ratios.forehead_to_cheekbone;
        let ftj = ratios.forehead_to_jaw;

        let near = |ratio: f64, tolerance: f64| (ratio - 1.0).abs() <= tolerance;

        if near(ltw, SQUARE_LENGTH_TOLERANCE) && near(ftc, TIGHT_SIMILARITY) && near(jtc, TIGHT_SIMILARITY) {
            FaceShape::Square
        } else if jtc < 1.0 - SIGNIFICANT_DIFFERENCE
            && ftc < 1.0 - SIGNIFICANT_DIFFERENCE
            && ltw > 1.0 + MODERATE_SIMILARITY
        {
            FaceShape::Diamond
        } else if ftc > 1.0 + MODERATE_SIMILARITY && ftj > 1.0 + SIGNIFICANT_DIFFERENCE {
            FaceShape::Heart
        } else if jtc > 1.0 + MODERATE_SIMILARITY && ftj < 1.0 - SIGNIFICANT_DIFFERENCE {
            FaceShape::Triangle
        } else if near(ltw, MODERATE_SIMILARITY) && near(ftc, MODERATE_SIMILARITY) && near(jtc, MODERATE_SIMILARITY) {
            FaceShape::Round
        } else if ltw > 1.0 + SIGNIFICANT_DIFFERENCE && near(ftc, MODERATE_SIMILARITY) && near(jtc, MODERATE_SIMILARITY) {
            FaceShape::Rectangle
        } else {
            FaceShape::Oval
        }
    }
}

impl fmt::Display for FaceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub length_to_width: f64,
    pub jaw_to_cheekbone: f64,
    pub forehead_to_cheekbone: f64,
    pub forehead_to_jaw: f64,
}

impl RatioSet {
    /// from_dimensions derives the ratios from face length and the three widths,
    /// all in the same unit.
    pub fn from_dimensions(length: f64, cheekbone: f64, jaw: f64, forehead: f64) -> Self {
        let length = length + RATIO_EPSILON;
        let cheekbone = cheekbone + RATIO_EPSILON;
        let jaw = jaw + RATIO_EPSILON;
        let forehead = forehead + RATIO_EPSILON;

        RatioSet {
            length_to_width: length / cheekbone,
            jaw_to_cheekbone: jaw / cheekbone,
            forehead_to_cheekbone: forehead / cheekbone,
            forehead_to_jaw: forehead / jaw,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::helper::face_shape::{FaceShape, RatioSet};

    fn ratios(ltw: f64, jtc: f64, ftc: f64, ftj: f64) -> RatioSet {
        RatioSet {
            length_to_width: ltw,
            jaw_to_cheekbone: jtc,
            forehead_to_cheekbone: ftc,
            forehead_to_jaw: ftj,
        }
    }

    #[test]
    fn test_square_all_equal() {
        assert_eq!(FaceShape::classify(&ratios(1.0, 1.0, 1.0, 1.0)), FaceShape::Square);
    }

    #[test]
    fn test_square_length_tolerance_is_twenty_percent() {
        assert_eq!(FaceShape::classify(&ratios(1.19, 1.0, 1.0, 1.0)), FaceShape::Square);
        assert_ne!(FaceShape::classify(&ratios(1.21, 1.0, 1.0, 1.0)), FaceShape::Square);
    }

    #[test]
    fn test_diamond() {
        assert_eq!(FaceShape::classify(&ratios(1.20, 0.70, 0.70, 1.0)), FaceShape::Diamond);
    }

    #[test]
    fn test_heart() {
        assert_eq!(FaceShape::classify(&ratios(1.3, 0.9, 1.2, 1.3)), FaceShape::Heart);
    }

    #[test]
    fn test_triangle() {
        assert_eq!(FaceShape::classify(&ratios(1.3, 1.2, 0.85, 0.7)), FaceShape::Triangle);
    }

    #[test]
    fn test_round_when_square_bound_fails() {
        // widths within 15% of each other but outside the 10% square bound
        assert_eq!(FaceShape::classify(&ratios(1.05, 0.88, 1.12, 1.2)), FaceShape::Round);
        assert_eq!(FaceShape::classify(&ratios(0.9, 1.13, 0.95, 0.84)), FaceShape::Round);
    }

    #[test]
    fn test_rectangle() {
        assert_eq!(FaceShape::classify(&ratios(1.4, 0.95, 1.05, 1.1)), FaceShape::Rectangle);
    }

    #[test]
    fn test_oval_fallback() {
        assert_eq!(FaceShape::classify(&ratios(1.4, 0.8, 0.9, 1.1)), FaceShape::Oval);
        assert_eq!(FaceShape::classify(&ratios(1.2, 0.8, 0.9, 1.1)), FaceShape::Oval);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // jaw and forehead exactly at 0.75 of the cheekbones
        assert_eq!(FaceShape::classify(&ratios(1.2, 0.75, 0.75, 1.0)), FaceShape::Oval);
        // length exactly 1.25 of the width
        assert_eq!(FaceShape::classify(&ratios(1.25, 1.0, 1.0, 1.0)), FaceShape::Oval);
    }

    #[test]
    fn test_earlier_rule_wins() {
        // also satisfies the round rule
        assert_eq!(FaceShape::classify(&ratios(1.1, 1.05, 0.95, 0.9)), FaceShape::Square);
        assert_eq!(FaceShape::classify(&ratios(1.0, 1.0, 1.0, 1.0)), FaceShape::Square);
    }

    #[test]
    fn test_from_dimensions() {
        let r = RatioSet::from_dimensions(200.0, 140.0, 140.0, 120.0);
        assert!((r.length_to_width - 200.0 / 140.0).abs() < 1e-6);
        assert!((r.jaw_to_cheekbone - 1.0).abs() < 1e-9);
        assert!((r.forehead_to_jaw - 120.0 / 140.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_dimensions_zero_widths_are_finite() {
        let r = RatioSet::from_dimensions(0.0, 0.0, 0.0, 0.0);
        assert_eq!(r.length_to_width, 1.0);
        assert!(r.forehead_to_jaw.is_finite());
        assert_eq!(FaceShape::classify(&r), FaceShape::Square);
    }
}
