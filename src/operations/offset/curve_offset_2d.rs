use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{Arc, Circle, Curve, Entity, LineSegment};
use crate::math::Tolerance;

use super::{check_distance, Side};

/// Offsets a single line, arc or circle by a given distance.
///
/// Lines translate along their normal. Arcs and circles keep their center
/// and angles and change radius: moving toward the center shrinks them.
#[derive(Debug, Clone)]
pub struct CurveOffset2D {
    entity: Entity,
    distance: f64,
    side: Side,
    tol: Tolerance,
}

impl CurveOffset2D {
    /// Creates a new `CurveOffset2D` operation.
    #[must_use]
    pub fn new(entity: impl Into<Entity>, distance: f64, side: Side) -> Self {
        Self {
            entity: entity.into(),
            distance,
            side,
            tol: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tol: Tolerance) -> Self {
        self.tol = tol;
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns a `DegenerateInput`-kind error for a zero, negative or
    /// non-finite distance, and `OperationError::Collapsed` when an arc or
    /// circle would shrink to a point or turn inside out.
    pub fn execute(&self) -> Result<Entity> {
        check_distance(self.distance, &self.tol)?;
        let (d, side, tol) = (self.distance, self.side, &self.tol);
        match &self.entity {
            Entity::Line(line) => Ok(offset_line(line, d, side).into()),
            Entity::Arc(arc) => offset_arc(arc, d, side, tol)?
                .map(Entity::Arc)
                .ok_or_else(|| collapsed("arc shrinks to its center")),
            Entity::Circle(circle) => {
                let r = shifted_radius(circle.radius(), true, d, side, tol)?
                    .ok_or_else(|| collapsed("circle shrinks to its center"))?;
                Ok(Circle::with_tolerance(*circle.center(), r, tol)?.into())
            }
        }
    }
}

pub(super) fn offset_line(line: &LineSegment, d: f64, side: Side) -> LineSegment {
    line.translated(&(line.left_normal() * (d * side.sign())))
}

/// Offset of an arc, or `None` when it shrinks exactly to its center.
pub(super) fn offset_arc(arc: &Arc, d: f64, side: Side, tol: &Tolerance) -> Result<Option<Arc>> {
    match shifted_radius(arc.radius(), arc.is_ccw(), d, side, tol)? {
        Some(r) => Ok(Some(arc.with_radius(r, tol)?)),
        None => Ok(None),
    }
}

pub(super) fn offset_curve(curve: &Curve, d: f64, side: Side, tol: &Tolerance) -> Result<Option<Curve>> {
    match curve {
        Curve::Line(line) => Ok(Some(offset_line(line, d, side).into())),
        Curve::Arc(arc) => Ok(offset_arc(arc, d, side, tol)?.map(Curve::Arc)),
    }
}

/// The left of a counter-clockwise traversal faces the center.
fn shifted_radius(radius: f64, ccw: bool, d: f64, side: Side, tol: &Tolerance) -> Result<Option<f64>> {
    let inward = ccw == (side == Side::Left);
    if !inward {
        return Ok(Some(radius + d));
    }
    if tol.is_close(radius, d) {
        return Ok(None);
    }
    if radius < d {
        debug!(radius, distance = d, "offset turns a circle inside out");
        return Err(collapsed(&format!("offset {d} exceeds radius {radius}")));
    }
    Ok(Some(radius - d))
}

pub(super) fn collapsed(what: &str) -> crate::error::KernelError {
    OperationError::Collapsed(what.to_owned()).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn line_moves_along_its_normal() {
        let line = LineSegment::new(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)).unwrap();
        let Entity::Line(left) = CurveOffset2D::new(line, 2.0, Side::Left).execute().unwrap() else {
            panic!("expected a line");
        };
        assert_abs_diff_eq!(*left.a(), Point2::new(0.0, 2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(*left.b(), Point2::new(4.0, 2.0), epsilon = 1e-12);

        let Entity::Line(right) = CurveOffset2D::new(line, 2.0, Side::Right).execute().unwrap() else {
            panic!("expected a line");
        };
        assert_abs_diff_eq!(*right.a(), Point2::new(0.0, -2.0), epsilon = 1e-12);
    }

    #[test]
    fn arc_radius_follows_direction() {
        let ccw = Arc::new(Point2::origin(), 3.0, 0.0, FRAC_PI_2).unwrap();
        let Entity::Arc(inner) = CurveOffset2D::new(ccw, 1.0, Side::Left).execute().unwrap() else {
            panic!("expected an arc");
        };
        assert_abs_diff_eq!(inner.radius(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(inner.span_angle(), FRAC_PI_2, epsilon = 1e-12);

        let cw = ccw.reversed();
        let Entity::Arc(outer) = CurveOffset2D::new(cw, 1.0, Side::Left).execute().unwrap() else {
            panic!("expected an arc");
        };
        assert_abs_diff_eq!(outer.radius(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn circle_left_is_inward() {
        let circle = Circle::new(Point2::new(1.0, 1.0), 3.0).unwrap();
        let Entity::Circle(inner) = CurveOffset2D::new(circle, 1.0, Side::Left).execute().unwrap()
        else {
            panic!("expected a circle");
        };
        assert_abs_diff_eq!(inner.radius(), 2.0, epsilon = 1e-12);
        let err = CurveOffset2D::new(circle, 3.0, Side::Left).execute().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSolution);
        let err = CurveOffset2D::new(circle, 5.0, Side::Left).execute().unwrap_err();
        assert!(matches!(
            err,
            crate::error::KernelError::Operation(OperationError::Collapsed(_))
        ));
    }

    #[test]
    fn zero_and_negative_distance_are_rejected() {
        let line = LineSegment::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap();
        for d in [0.0, -1.0] {
            let err = CurveOffset2D::new(line, d, Side::Left).execute().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DegenerateInput);
        }
    }

    #[test]
    fn round_trip_restores_arc() {
        let tol = Tolerance::default();
        let arc = Arc::new(Point2::new(2.0, -1.0), 5.0, 0.3, -2.0).unwrap();
        let out = CurveOffset2D::new(arc, 1.5, Side::Right).execute().unwrap();
        let back = CurveOffset2D::new(out, 1.5, Side::Left).execute().unwrap();
        assert!(back.approx_eq(&Entity::Arc(arc), &tol));
    }
}
