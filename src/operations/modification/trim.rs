use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geometry::{Arc, Curve, Endpoint, Entity, LineSegment};
use crate::math::Tolerance;
use crate::operations::intersect::{intersect_extended, Intersection};

/// Shortens one end of a curve back to the nearest crossing with a boundary.
///
/// Only crossings on the curve itself qualify: the kept portion runs from
/// the opposite endpoint to the crossing closest to `end`. A crossing that
/// already sits at `end` leaves the curve unchanged, so trimming is
/// idempotent.
#[derive(Debug, Clone)]
pub struct Trim {
    curve: Curve,
    boundary: Entity,
    end: Endpoint,
    tol: Tolerance,
}

impl Trim {
    /// Creates a new `Trim` operation with the default tolerance.
    #[must_use]
    pub fn new(curve: impl Into<Curve>, boundary: impl Into<Entity>, end: Endpoint) -> Self {
        Self {
            curve: curve.into(),
            boundary: boundary.into(),
            end,
            tol: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tol: Tolerance) -> Self {
        self.tol = tol;
        self
    }

    /// Executes the trim.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if the curve lies on the boundary.
    /// - `OperationError::NoIntersectionInRange` if no crossing shortens the
    ///   curve at `end`.
    pub fn execute(&self) -> Result<Curve> {
        let params = boundary_params(&self.curve, &self.boundary, &self.tol)?;
        let eps = param_eps(&self.curve, &self.tol);
        // Arc parameters are forward-only, so a crossing at the start reads 0.
        let t = match self.end {
            Endpoint::End => params
                .iter()
                .copied()
                .filter(|&t| t > eps && t <= 1.0 + eps)
                .max_by(f64::total_cmp),
            Endpoint::Start => params
                .iter()
                .copied()
                .filter(|&t| t >= -eps && t < 1.0 - eps)
                .min_by(f64::total_cmp),
        };
        let Some(t) = t else {
            debug!(end = ?self.end, ?params, "trim: no crossing on the curve");
            return Err(OperationError::NoIntersectionInRange.into());
        };
        trace!(end = ?self.end, t, "trim: selected crossing");
        resize(&self.curve, self.end, t, &self.tol)
    }
}

/// Parameters on `curve`'s supporting geometry where it meets `boundary`.
pub(super) fn boundary_params(curve: &Curve, boundary: &Entity, tol: &Tolerance) -> Result<Vec<f64>> {
    match intersect_extended(curve, boundary, tol) {
        Intersection::Points(points) => Ok(points.map(|p| p.t_a).collect()),
        Intersection::Coincident => {
            debug!(boundary = boundary.kind_name(), "curve lies on its boundary");
            Err(OperationError::InvalidInput(format!(
                "curve lies on the {} boundary",
                boundary.kind_name()
            ))
            .into())
        }
    }
}

/// Parameter slack equivalent to the linear tolerance along `curve`.
pub(crate) fn param_eps(curve: &Curve, tol: &Tolerance) -> f64 {
    match curve {
        Curve::Line(l) => tol.linear(l.length()) / l.length(),
        Curve::Arc(a) => a.param_eps(tol),
    }
}

/// Moves `end` of `curve` to parameter `t`, keeping the other end fixed.
///
/// `t` may lie outside `[0, 1]` to lengthen the curve. A `t` within
/// tolerance of the current endpoint returns the curve untouched.
pub(crate) fn resize(curve: &Curve, end: Endpoint, t: f64, tol: &Tolerance) -> Result<Curve> {
    let eps = param_eps(curve, tol);
    let unchanged = match end {
        Endpoint::End => (t - 1.0).abs() <= eps,
        Endpoint::Start => t.abs() <= eps,
    };
    if unchanged {
        return Ok(*curve);
    }
    match curve {
        Curve::Line(line) => {
            let p = line.point_at(t);
            let resized = match end {
                Endpoint::End => LineSegment::with_tolerance(*line.a(), p, tol)?,
                Endpoint::Start => LineSegment::with_tolerance(p, *line.b(), tol)?,
            };
            Ok(resized.into())
        }
        Curve::Arc(arc) => {
            let (start, span) = match end {
                Endpoint::End => (arc.start_angle(), arc.span_angle() * t),
                Endpoint::Start => (
                    arc.start_angle() + arc.span_angle() * t,
                    arc.span_angle() * (1.0 - t),
                ),
            };
            Ok(Arc::with_tolerance(*arc.center(), arc.radius(), start, span, tol)?.into())
        }
    }
}
