use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::angle::{normalize_angle, point_at_angle, sweep_between, tangent_at_angle};
use crate::math::distance_2d::point_to_arc_dist;
use crate::math::{ensure_finite, Point2, Tolerance, Vector2};

use super::Circle;

/// A circular arc.
///
/// Angles are in radians; `span_angle` is signed, positive meaning
/// counter-clockwise, with `0 < |span_angle| < 2π`. A full turn is a
/// [`Circle`].
///
/// The parameter `t` is the fraction of the span travelled from the start:
/// `t = 0` is the start point and `t = 1` the end point. Points of the
/// supporting circle beyond the end map forward into `[1, 2π / |span|)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    center: Point2,
    radius: f64,
    start_angle: f64,
    span_angle: f64,
}

impl Arc {
    /// Creates an arc using the default tolerance.
    ///
    /// # Errors
    ///
    /// See [`Arc::with_tolerance`].
    pub fn new(center: Point2, radius: f64, start_angle: f64, span_angle: f64) -> Result<Self> {
        Self::with_tolerance(center, radius, start_angle, span_angle, &Tolerance::default())
    }

    /// Creates an arc.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN/infinite values and
    /// `GeometryError::Degenerate` for a non-positive radius, a zero span,
    /// or a span that reaches a full turn.
    pub fn with_tolerance(
        center: Point2,
        radius: f64,
        start_angle: f64,
        span_angle: f64,
        tol: &Tolerance,
    ) -> Result<Self> {
        ensure_finite(&center, "arc center")?;
        if !radius.is_finite() || !start_angle.is_finite() || !span_angle.is_finite() {
            return Err(GeometryError::NonFinite("arc").into());
        }
        if radius <= 0.0 || tol.is_zero(radius) {
            return Err(
                GeometryError::Degenerate(format!("arc radius must be positive, got {radius}")).into(),
            );
        }
        if tol.is_zero(span_angle * radius) {
            return Err(GeometryError::Degenerate("arc span is zero".into()).into());
        }
        if span_angle.abs() >= TAU - tol.angular(radius) {
            return Err(GeometryError::Degenerate(
                "arc span reaches a full turn; use a circle".into(),
            )
            .into());
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            span_angle,
        })
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
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn span_angle(&self) -> f64 {
        self.span_angle
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.span_angle
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.span_angle > 0.0
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.span_angle.abs()
    }

    /// The full circle this arc lies on.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::from_parts(self.center, self.radius)
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        point_at_angle(&self.center, self.radius, self.start_angle + self.span_angle * t)
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        self.point_at(0.0)
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.point_at(1.0)
    }

    /// Unit tangent at parameter `t`, in the direction of travel.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        tangent_at_angle(self.start_angle + self.span_angle * t, self.span_angle)
    }

    /// Exclusive upper bound of forward parameters on the supporting circle.
    #[must_use]
    pub fn param_limit(&self) -> f64 {
        TAU / self.span_angle.abs()
    }

    /// Forward parameter of the circle point at `angle`, in
    /// `[0, param_limit())`.
    ///
    /// Angles just short of a full turn back to the start snap to `0`.
    #[must_use]
    pub fn param_of_angle(&self, angle: f64, tol: &Tolerance) -> f64 {
        let swept = sweep_between(self.start_angle, angle, self.is_ccw());
        if swept >= TAU - tol.angular(self.radius) {
            return 0.0;
        }
        swept / self.span_angle.abs()
    }

    /// Parameter slack equivalent to the linear tolerance along this arc.
    #[must_use]
    pub fn param_eps(&self, tol: &Tolerance) -> f64 {
        tol.angular(self.radius) / self.span_angle.abs()
    }

    /// Returns a copy running from the current end back to the start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            center: self.center,
            radius: self.radius,
            start_angle: self.end_angle(),
            span_angle: -self.span_angle,
        }
    }

    /// Same angles on a concentric circle of radius `radius`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if `radius` is not positive.
    pub fn with_radius(&self, radius: f64, tol: &Tolerance) -> Result<Self> {
        Self::with_tolerance(self.center, radius, self.start_angle, self.span_angle, tol)
    }

    #[must_use]
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        point_to_arc_dist(p, &self.center, self.radius, self.start_angle, self.span_angle)
    }

    /// Geometric equality: same circle, same start and end points, same
    /// direction. Start angles are compared modulo a full turn.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        tol.points_coincide(&self.center, &other.center)
            && tol.is_close(self.radius, other.radius)
            && tol.is_close(self.span_angle, other.span_angle)
            && tol.points_coincide(&self.start_point(), &other.start_point())
            && tol.points_coincide(&self.end_point(), &other.end_point())
    }

    /// Start angle wrapped into `[0, 2π)`.
    #[must_use]
    pub fn normalized_start(&self) -> f64 {
        normalize_angle(self.start_angle)
    }
}
