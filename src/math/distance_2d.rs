use super::angle::{angle_of, point_at_angle, sweep_between};
use super::{cross, Point2, Vector2};

/// Parameter of the orthogonal projection of `p` onto the line
/// `origin + t * dir`. `dir` need not be unit length.
#[must_use]
pub fn project_param(p: &Point2, origin: &Point2, dir: &Vector2) -> f64 {
    let len_sq = dir.norm_squared();
    if len_sq < 1e-300 {
        return 0.0;
    }
    (p - origin).dot(dir) / len_sq
}

/// Foot of the perpendicular from `p` to the line `origin + t * dir`.
#[must_use]
pub fn foot_on_line(p: &Point2, origin: &Point2, dir: &Vector2) -> Point2 {
    origin + dir * project_param(p, origin, dir)
}

/// Signed distance from `p` to the line through `origin` along `dir`.
///
/// Positive on the left of `dir`.
#[must_use]
pub fn signed_distance_to_line(p: &Point2, origin: &Point2, dir: &Vector2) -> f64 {
    let len = dir.norm();
    if len < 1e-300 {
        return (p - origin).norm();
    }
    cross(dir, &(p - origin)) / len
}

/// Returns the minimum distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    // Project point onto the infinite line, clamp to [0, 1].
    let t = project_param(p, a, &d).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// If the point's angle (relative to the center) falls within the arc
/// range, the distance is `||p - center| - radius|`. Otherwise it is the
/// distance to the nearer arc endpoint.
#[must_use]
pub fn point_to_arc_dist(p: &Point2, center: &Point2, radius: f64, start_angle: f64, span: f64) -> f64 {
    let dist_to_center = (p - center).norm();
    let swept = sweep_between(start_angle, angle_of(center, p), span >= 0.0);
    if swept <= span.abs() {
        return (dist_to_center - radius).abs();
    }

    let p0 = point_at_angle(center, radius, start_angle);
    let p1 = point_at_angle(center, radius, start_angle + span);
    (p - p0).norm().min((p - p1).norm())
}
