mod curve_offset_2d;
mod polyline_offset_2d;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, OperationError, Result};
use crate::math::Tolerance;

pub use curve_offset_2d::CurveOffset2D;
pub use polyline_offset_2d::PolylineOffset2D;

/// Side of the direction of travel an offset moves to.
///
/// Circles are treated as counter-clockwise, so `Left` is inward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `+1` for left, `-1` for right.
    pub(crate) fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Offset distances are unsigned and strictly positive.
fn check_distance(distance: f64, tol: &Tolerance) -> Result<()> {
    if !distance.is_finite() {
        return Err(GeometryError::NonFinite("offset distance").into());
    }
    if distance < 0.0 {
        return Err(OperationError::InvalidInput(format!(
            "offset distance must be unsigned, got {distance}; choose the side instead"
        ))
        .into());
    }
    if tol.is_zero(distance) {
        return Err(GeometryError::Degenerate("zero offset distance".into()).into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn distance_validation() {
        let tol = Tolerance::default();
        assert!(check_distance(1.0, &tol).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = check_distance(bad, &tol).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DegenerateInput, "distance {bad}");
        }
    }

    #[test]
    fn sides() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert!((Side::Right.sign() + 1.0).abs() < f64::EPSILON);
    }
}
