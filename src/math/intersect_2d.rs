use super::distance_2d::signed_distance_to_line;
use super::{cross, left_normal, Point2, Tolerance, Vector2};

/// Classification of two infinite lines `p1 + t * d1` and `p2 + u * d2`.
///
/// The solvers here see only supporting geometry; range filtering for
/// bounded entities happens in the callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineLine {
    /// Single crossing at parameters `(t, u)`.
    Crossing { t: f64, u: f64 },
    /// Parallel and separated.
    Parallel,
    /// Parallel and coincident.
    Collinear,
}

/// Classification of an infinite line `p + t * d` against a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineCircle {
    Miss,
    /// Tangent at a single line parameter.
    Tangent(f64),
    /// Two crossings, in increasing line parameter.
    Secant(f64, f64),
}

/// Classification of two full circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleCircle {
    /// No common point (including concentric circles of different radius).
    Disjoint,
    /// Same center and radius.
    Coincident,
    /// Internally or externally tangent.
    Tangent(Point2),
    Crossing(Point2, Point2),
}

/// Intersects two infinite lines.
///
/// The lines are parallel when the sine of the angle between them is zero
/// within the absolute tolerance; no near-infinite crossing is produced.
/// Parallel lines are collinear when their separation is negligible
/// relative to the longer direction vector, so the result does not depend
/// on where the pair sits in the plane.
#[must_use]
pub fn line_line(p1: &Point2, d1: &Vector2, p2: &Point2, d2: &Vector2, tol: &Tolerance) -> LineLine {
    let len1 = d1.norm();
    let len2 = d2.norm();
    let det = cross(d1, d2);

    if tol.is_zero(det / (len1 * len2)) {
        let offset = signed_distance_to_line(p2, p1, d1);
        return if tol.is_negligible(offset, len1.max(len2)) {
            LineLine::Collinear
        } else {
            LineLine::Parallel
        };
    }

    let w = p2 - p1;
    LineLine::Crossing {
        t: cross(&w, d2) / det,
        u: cross(&w, d1) / det,
    }
}

/// Intersects the infinite line `p + t * d` with a circle.
///
/// The quadratic is solved in the perpendicular-distance form: the line is
/// tangent when its distance from the center is close to the radius, which
/// is the discriminant-near-zero case resolved through the tolerance.
#[must_use]
pub fn line_circle(p: &Point2, d: &Vector2, center: &Point2, radius: f64, tol: &Tolerance) -> LineCircle {
    let len = d.norm();
    let u = d / len;
    let along = (center - p).dot(&u);
    let foot = p + u * along;
    let h = (center - foot).norm();

    if tol.is_close(h, radius) {
        return LineCircle::Tangent(along / len);
    }
    if h > radius {
        return LineCircle::Miss;
    }
    let half_chord = (radius * radius - h * h).sqrt();
    LineCircle::Secant((along - half_chord) / len, (along + half_chord) / len)
}

/// Intersects two full circles.
#[must_use]
pub fn circle_circle(c1: &Point2, r1: f64, c2: &Point2, r2: f64, tol: &Tolerance) -> CircleCircle {
    let delta = c2 - c1;
    let dist = delta.norm();

    if tol.is_negligible(dist, r1.max(r2)) {
        return if tol.is_close(r1, r2) {
            CircleCircle::Coincident
        } else {
            CircleCircle::Disjoint
        };
    }

    let u = delta / dist;
    let sum = r1 + r2;
    let diff = (r1 - r2).abs();

    if tol.is_close(dist, sum) {
        return CircleCircle::Tangent(c1 + u * r1);
    }
    if tol.is_close(dist, diff) {
        let toward = if r1 >= r2 { u } else { -u };
        return CircleCircle::Tangent(c1 + toward * r1);
    }
    if dist > sum || dist < diff {
        return CircleCircle::Disjoint;
    }

    // Distance from c1 along c1→c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist * dist) / (2.0 * dist);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let mid = c1 + u * a;
    let perp = left_normal(&u);
    CircleCircle::Crossing(mid + perp * h, mid - perp * h)
}
