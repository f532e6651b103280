use crate::error::{GeometryError, Result};

use super::Point2;

/// Returns `true` if `a` and `b` are equal within an absolute or relative
/// tolerance.
///
/// The test is `|a - b| <= max(abs_tol, rel_tol * max(|a|, |b|))`. Identical
/// values (including equal infinities) always compare close; NaN never does.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_close(a: f64, b: f64, abs_tol: f64, rel_tol: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    if !diff.is_finite() {
        return false;
    }
    diff <= abs_tol.max(rel_tol * a.abs().max(b.abs()))
}

/// Precision policy threaded through every kernel call.
///
/// Every geometric predicate (coincidence, collinearity, tangency, range
/// checks) goes through one of these methods so a single value decides
/// the behavior of a whole call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Absolute epsilon.
    pub abs_tol: f64,
    /// Relative epsilon, scaled by the magnitude of the compared values.
    pub rel_tol: f64,
}

impl Tolerance {
    pub const DEFAULT_ABS: f64 = 1e-9;
    pub const DEFAULT_REL: f64 = 1e-7;

    /// Creates a tolerance without validation.
    #[must_use]
    pub const fn new(abs_tol: f64, rel_tol: f64) -> Self {
        Self { abs_tol, rel_tol }
    }

    /// Creates a tolerance, rejecting negative or non-finite epsilons.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` or `GeometryError::Degenerate`.
    pub fn try_new(abs_tol: f64, rel_tol: f64) -> Result<Self> {
        if !abs_tol.is_finite() || !rel_tol.is_finite() {
            return Err(GeometryError::NonFinite("tolerance").into());
        }
        if abs_tol < 0.0 || rel_tol < 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "tolerance must be non-negative, got abs={abs_tol} rel={rel_tol}"
            ))
            .into());
        }
        Ok(Self { abs_tol, rel_tol })
    }

    #[must_use]
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        is_close(a, b, self.abs_tol, self.rel_tol)
    }

    /// Absolute-only zero test.
    #[must_use]
    pub fn is_zero(&self, v: f64) -> bool {
        v.abs() <= self.abs_tol
    }

    /// Effective linear threshold for quantities of magnitude `scale`.
    #[must_use]
    pub fn linear(&self, scale: f64) -> f64 {
        self.abs_tol.max(self.rel_tol * scale.abs())
    }

    /// Returns `true` if `v` is negligible next to a quantity of size `scale`.
    #[must_use]
    pub fn is_negligible(&self, v: f64, scale: f64) -> bool {
        v.abs() <= self.linear(scale)
    }

    /// Angular threshold (radians) on a circle of the given radius.
    #[must_use]
    pub fn angular(&self, radius: f64) -> f64 {
        if radius <= 0.0 {
            return self.rel_tol;
        }
        (self.abs_tol / radius).max(self.rel_tol)
    }

    #[must_use]
    pub fn points_coincide(&self, p: &Point2, q: &Point2) -> bool {
        self.is_close(p.x, q.x) && self.is_close(p.y, q.y)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ABS, Self::DEFAULT_REL)
    }
}
