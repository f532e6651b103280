use crate::error::{GeometryError, Result};
use crate::math::distance_2d::{point_to_segment_dist, project_param};
use crate::math::{ensure_finite, left_normal, Point2, Tolerance, Vector2};

/// A bounded line segment from `a` to `b`.
///
/// Parametric form: `P(t) = a + t * (b - a)`, so `t = 0` is `a` and `t = 1`
/// is `b`. Values outside `[0, 1]` address the infinite extension.
///
/// The derived `PartialEq` is exact identity; geometric equality goes
/// through [`LineSegment::approx_eq`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    a: Point2,
    b: Point2,
}

impl LineSegment {
    /// Creates a segment using the default tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is not finite or the endpoints
    /// coincide.
    pub fn new(a: Point2, b: Point2) -> Result<Self> {
        Self::with_tolerance(a, b, &Tolerance::default())
    }

    /// Creates a segment, rejecting endpoints that coincide within `tol`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` or `GeometryError::Degenerate`.
    pub fn with_tolerance(a: Point2, b: Point2, tol: &Tolerance) -> Result<Self> {
        ensure_finite(&a, "segment start")?;
        ensure_finite(&b, "segment end")?;
        if tol.points_coincide(&a, &b) {
            return Err(GeometryError::Degenerate(format!(
                "zero-length segment at ({}, {})",
                a.x, a.y
            ))
            .into());
        }
        Ok(Self { a, b })
    }

    #[must_use]
    pub fn a(&self) -> &Point2 {
        &self.a
    }

    #[must_use]
    pub fn b(&self) -> &Point2 {
        &self.b
    }

    /// Unnormalized direction `b - a`.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.b - self.a
    }

    /// Unit direction from `a` to `b`.
    #[must_use]
    pub fn unit_direction(&self) -> Vector2 {
        self.direction() / self.length()
    }

    /// Unit normal on the left of the direction of travel.
    #[must_use]
    pub fn left_normal(&self) -> Vector2 {
        left_normal(&self.unit_direction())
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.a + self.direction() * t
    }

    /// Parameter of the projection of `p` onto the supporting line.
    #[must_use]
    pub fn param_of(&self, p: &Point2) -> f64 {
        project_param(p, &self.a, &self.direction())
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// Translates both endpoints by `v`; length is preserved.
    #[must_use]
    pub fn translated(&self, v: &Vector2) -> Self {
        Self {
            a: self.a + v,
            b: self.b + v,
        }
    }

    #[must_use]
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        point_to_segment_dist(p, &self.a, &self.b)
    }

    /// Returns `true` if both endpoints coincide within `tol`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        tol.points_coincide(&self.a, &other.a) && tol.points_coincide(&self.b, &other.b)
    }
}
