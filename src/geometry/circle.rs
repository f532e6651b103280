use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::angle::{normalize_angle, point_at_angle};
use crate::math::{ensure_finite, Point2, Tolerance};

/// A full circle.
///
/// Kept distinct from [`super::Arc`] so downstream code never has to ask
/// whether an arc is "really" a full turn. The parameter is
/// `angle / 2π` in `[0, 1)`, measured counter-clockwise from `+X`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    /// Creates a circle using the default tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is not finite or the radius is not
    /// positive.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        Self::with_tolerance(center, radius, &Tolerance::default())
    }

    /// Creates a circle, rejecting radii that are zero within `tol`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` or `GeometryError::Degenerate`.
    pub fn with_tolerance(center: Point2, radius: f64, tol: &Tolerance) -> Result<Self> {
        ensure_finite(&center, "circle center")?;
        if !radius.is_finite() {
            return Err(GeometryError::NonFinite("circle radius").into());
        }
        if radius <= 0.0 || tol.is_zero(radius) {
            return Err(
                GeometryError::Degenerate(format!("circle radius must be positive, got {radius}"))
                    .into(),
            );
        }
        Ok(Self { center, radius })
    }

    /// Builds a circle from parts already validated by another primitive.
    pub(crate) fn from_parts(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        point_at_angle(&self.center, self.radius, t * TAU)
    }

    #[must_use]
    pub fn param_of_angle(&self, angle: f64) -> f64 {
        normalize_angle(angle) / TAU
    }

    #[must_use]
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        ((p - self.center).norm() - self.radius).abs()
    }

    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        tol.points_coincide(&self.center, &other.center) && tol.is_close(self.radius, other.radius)
    }
}
