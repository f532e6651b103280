use std::f64::consts::{PI, TAU};

use super::{cross, Point2, Tolerance, Vector2};

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Angle travelled from `from` to `to` in the given rotational direction,
/// in `[0, 2π)`.
#[must_use]
pub fn sweep_between(from: f64, to: f64, ccw: bool) -> f64 {
    if ccw {
        normalize_angle(to - from)
    } else {
        normalize_angle(from - to)
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-π, π]`.
#[must_use]
pub fn short_span(from: f64, to: f64) -> f64 {
    let delta = normalize_angle(to - from);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

/// Signed turn from direction `from` to direction `to`, in `(-π, π]`.
///
/// Positive is a left (counter-clockwise) turn.
#[must_use]
pub fn turn_angle(from: &Vector2, to: &Vector2) -> f64 {
    cross(from, to).atan2(from.dot(to))
}

/// Direction angle of `p` as seen from `center`.
#[must_use]
pub fn angle_of(center: &Point2, p: &Point2) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Point on a circle at `angle`.
#[must_use]
pub fn point_at_angle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Unit tangent on a circle at `angle`, pointing in the direction of travel
/// of a span with the sign of `span`.
#[must_use]
pub fn tangent_at_angle(angle: f64, span: f64) -> Vector2 {
    let sign = if span >= 0.0 { 1.0 } else { -1.0 };
    // Tangent to circle at angle θ is (-sin θ, cos θ) for CCW; negate for CW.
    Vector2::new(-sign * angle.sin(), sign * angle.cos())
}

/// Converts a bulge-defined arc segment to center-radius-angle form.
///
/// Bulge convention: `bulge = tan(span / 4)`.
/// - `bulge = 0`: straight line
/// - `bulge > 0`: counter-clockwise arc
/// - `bulge < 0`: clockwise arc
/// - `|bulge| = 1`: semicircle
///
/// Returns `(center, radius, start_angle, span)`, or `None` when the chord
/// endpoints coincide or the bulge is zero within `tol` (a straight segment
/// has no arc form).
#[must_use]
pub fn arc_from_bulge(
    p0: &Point2,
    p1: &Point2,
    bulge: f64,
    tol: &Tolerance,
) -> Option<(Point2, f64, f64, f64)> {
    if tol.points_coincide(p0, p1) || tol.is_zero(bulge) {
        return None;
    }
    let chord = p1 - p0;
    let chord_len = chord.norm();

    // Distance from chord midpoint to center, in half-chord units.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mid = Point2::from((p0.coords + p1.coords) * 0.5);

    // Normal to chord pointing toward center (for positive bulge, center is left of chord).
    let normal = Vector2::new(-chord.y, chord.x) / chord_len;
    let center = mid + normal * (sagitta_ratio * chord_len * 0.5);

    // r = d*(1+b²)/(4*|b|) derived from r = d/(2*sin(θ/2)) with θ=4*atan(b)
    let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = angle_of(&center, p0);
    let span = 4.0 * bulge.atan();

    Some((center, radius, start_angle, span))
}

/// Bulge value of an arc with the given signed span.
#[must_use]
pub fn bulge_from_span(span: f64) -> f64 {
    (span / 4.0).tan()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-10;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn normalize_wraps_negative() {
        assert!((normalize_angle(-FRAC_PI_2) - 1.5 * PI).abs() < TOL);
        assert!(normalize_angle(TAU).abs() < TOL);
        assert!(normalize_angle(-1e-18) < TAU);
    }

    #[test]
    fn sweep_between_directions() {
        assert!((sweep_between(0.0, FRAC_PI_2, true) - FRAC_PI_2).abs() < TOL);
        assert!((sweep_between(0.0, FRAC_PI_2, false) - 1.5 * PI).abs() < TOL);
    }

    #[test]
    fn short_span_picks_minor_rotation() {
        assert!((short_span(0.0, 1.5 * PI) + FRAC_PI_2).abs() < TOL);
        assert!((short_span(-FRAC_PI_2, PI) + FRAC_PI_2).abs() < TOL);
        assert!((short_span(0.0, PI) - PI).abs() < TOL);
    }

    #[test]
    fn turn_angle_sign() {
        let right = turn_angle(&Vector2::x(), &Vector2::new(0.0, -1.0));
        assert!((right + FRAC_PI_2).abs() < TOL);
        let left = turn_angle(&Vector2::x(), &Vector2::y());
        assert!((left - FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn semicircle_ccw() {
        // CCW semicircle from (0,0) to (2,0), bulge=1.
        // Center at (1,0), radius=1, span=+π, passing through the bottom.
        let (c, r, sa, sw) =
            arc_from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), 1.0, &tol()).unwrap();
        assert!((c.x - 1.0).abs() < TOL, "cx={}", c.x);
        assert!(c.y.abs() < TOL, "cy={}", c.y);
        assert!((r - 1.0).abs() < TOL, "r={r}");
        assert!((sw - PI).abs() < TOL, "span={sw}");

        let mid = point_at_angle(&c, r, sa + sw * 0.5);
        assert!((mid.x - 1.0).abs() < TOL, "mid.x={}", mid.x);
        assert!((mid.y + 1.0).abs() < TOL, "mid.y={}", mid.y);
    }

    #[test]
    fn semicircle_cw_goes_through_top() {
        let (c, r, sa, sw) =
            arc_from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), -1.0, &tol()).unwrap();
        assert!((sw + PI).abs() < TOL, "span={sw}");
        let mid = point_at_angle(&c, r, sa + sw * 0.5);
        assert!((mid.x - 1.0).abs() < TOL, "mid.x={}", mid.x);
        assert!((mid.y - 1.0).abs() < TOL, "mid.y={}", mid.y);
    }

    #[test]
    fn quarter_circle_ccw() {
        let bulge = (PI / 8.0).tan();
        let (c, r, _, sw) =
            arc_from_bulge(&Point2::new(1.0, 0.0), &Point2::new(0.0, 1.0), bulge, &tol()).unwrap();
        assert!((r - 1.0).abs() < 1e-9, "r={r}");
        assert!(c.coords.norm() < 1e-9, "center={c}");
        assert!((sw - FRAC_PI_2).abs() < 1e-9, "span={sw}");
        assert!((bulge_from_span(sw) - bulge).abs() < 1e-12);
    }

    #[test]
    fn straight_chord_has_no_arc_form() {
        let (p0, p1) = (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert!(arc_from_bulge(&p0, &p1, 0.0, &tol()).is_none());
        assert!(arc_from_bulge(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.0), 0.5, &tol()).is_none());
        assert!(arc_from_bulge(&p0, &Point2::new(1e-11, 0.0), 0.5, &tol()).is_none());
    }

    #[test]
    fn flat_bulge_threshold_follows_tolerance() {
        let (p0, p1) = (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert!(arc_from_bulge(&p0, &p1, 1e-6, &tol()).is_some());
        let loose = Tolerance::new(1e-5, 1e-7);
        assert!(arc_from_bulge(&p0, &p1, 1e-6, &loose).is_none());
    }

    #[test]
    fn tangent_is_unit_and_follows_span_sign() {
        // At angle π on a CCW span the travel direction is straight down.
        let t = tangent_at_angle(PI, 1.0);
        assert!((t.norm() - 1.0).abs() < TOL);
        assert!(t.x.abs() < TOL);
        assert!((t.y + 1.0).abs() < TOL);
        let back = tangent_at_angle(PI, -1.0);
        assert!((back.y - 1.0).abs() < TOL);
    }
}
