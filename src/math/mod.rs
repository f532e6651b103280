pub mod angle;
pub mod distance_2d;
pub mod intersect_2d;
pub mod tolerance;

pub use tolerance::{is_close, Tolerance};

use crate::error::{GeometryError, Result};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Z component of the 3D cross product of two planar vectors.
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Normalizes `v`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` when the magnitude is zero within
/// tolerance instead of producing a NaN or zero vector.
pub fn normalize(v: &Vector2, tol: &Tolerance) -> Result<Vector2> {
    let len = v.norm();
    if !len.is_finite() {
        return Err(GeometryError::NonFinite("vector").into());
    }
    if tol.is_zero(len) {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(v / len)
}

/// Rejects points with NaN or infinite coordinates.
///
/// # Errors
///
/// Returns `GeometryError::NonFinite` naming `what`.
pub fn ensure_finite(p: &Point2, what: &'static str) -> Result<()> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite(what).into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_unit_length() {
        let n = normalize(&Vector2::new(3.0, 4.0), &Tolerance::default()).unwrap();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn normalize_zero_vector_fails() {
        let err = normalize(&Vector2::zeros(), &Tolerance::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::KernelError::Geometry(GeometryError::ZeroVector)
        ));
    }

    #[test]
    fn left_normal_rotates_ccw() {
        let n = left_normal(&Vector2::new(1.0, 0.0));
        assert!(n.x.abs() < 1e-12);
        assert!((n.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cross_sign() {
        assert!(cross(&Vector2::x(), &Vector2::y()) > 0.0);
        assert!(cross(&Vector2::y(), &Vector2::x()) < 0.0);
    }

    #[test]
    fn finite_check() {
        assert!(ensure_finite(&Point2::new(1.0, 2.0), "p").is_ok());
        assert!(ensure_finite(&Point2::new(f64::NAN, 2.0), "p").is_err());
        assert!(ensure_finite(&Point2::new(1.0, f64::INFINITY), "p").is_err());
    }
}
