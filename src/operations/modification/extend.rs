use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geometry::{Curve, Endpoint, Entity};
use crate::math::Tolerance;

use super::trim::{boundary_params, param_eps, resize};

/// Lengthens one end of a curve out to the nearest crossing with a boundary.
///
/// Segments extend along their line; arcs extend around their circle. Only
/// crossings at or beyond `end` qualify.
#[derive(Debug, Clone)]
pub struct Extend {
    curve: Curve,
    boundary: Entity,
    end: Endpoint,
    tol: Tolerance,
}

impl Extend {
    /// Creates a new `Extend` operation with the default tolerance.
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

    /// Executes the extension.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if the curve lies on the boundary.
    /// - `OperationError::NoIntersectionInRange` if no crossing lies beyond
    ///   `end`.
    pub fn execute(&self) -> Result<Curve> {
        let params = boundary_params(&self.curve, &self.boundary, &self.tol)?;
        let eps = param_eps(&self.curve, &self.tol);

        let t = match (&self.curve, self.end) {
            (Curve::Line(_), Endpoint::End) => params
                .iter()
                .copied()
                .filter(|&t| t >= 1.0 - eps)
                .min_by(f64::total_cmp),
            (Curve::Line(_), Endpoint::Start) => params
                .iter()
                .copied()
                .filter(|&t| t <= eps)
                .max_by(f64::total_cmp),
            (Curve::Arc(arc), Endpoint::End) => {
                let limit = arc.param_limit() - eps;
                params
                    .iter()
                    .copied()
                    .filter(|&t| t >= 1.0 - eps && t < limit)
                    .min_by(f64::total_cmp)
            }
            (Curve::Arc(arc), Endpoint::Start) => {
                // Walk backwards from the start: a forward parameter t
                // beyond the end sits (limit - t) spans behind the start.
                let limit = arc.param_limit();
                params
                    .iter()
                    .copied()
                    .filter_map(|t| {
                        if t <= eps {
                            Some(0.0)
                        } else if t > 1.0 + eps && limit - t > eps {
                            Some(limit - t)
                        } else {
                            None
                        }
                    })
                    .min_by(f64::total_cmp)
                    .map(|back| -back)
            }
        };
        let Some(t) = t else {
            debug!(end = ?self.end, ?params, "extend: no crossing beyond the endpoint");
            return Err(OperationError::NoIntersectionInRange.into());
        };
        trace!(end = ?self.end, t, "extend: selected crossing");
        resize(&self.curve, self.end, t, &self.tol)
    }
}
