use std::f64::consts::{PI, TAU};

use tracing::{debug, trace};

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::{Arc, Curve, LineSegment};
use crate::math::angle::{angle_of, short_span, sweep_between, tangent_at_angle};
use crate::math::distance_2d::{foot_on_line, signed_distance_to_line};
use crate::math::intersect_2d::{self, LineLine};
use crate::math::{cross, normalize, Point2, Tolerance, Vector2};
use crate::operations::intersect::{intersect_supports, Support, SupportIntersection};

/// Output of a [`Fillet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilletResult {
    /// The tangent arc, running from the trim point on `a` to the trim
    /// point on `b`.
    pub arc: Arc,
    /// `a` cut back (or extended) to the arc; `None` when the arc consumes
    /// all of it.
    pub trimmed_a: Option<Curve>,
    /// `b` cut back (or extended) to the arc; `None` when the arc consumes
    /// all of it.
    pub trimmed_b: Option<Curve>,
}

/// Joins two curves with a tangent arc of fixed radius.
///
/// Centers are found by intersecting the loci of points at distance
/// `radius` from each curve: the two offset lines of a segment, the
/// concentric circles `R + radius` and `|R - radius|` of an arc. Each
/// candidate is accepted only if both curves can be cut back to their
/// tangent points while keeping the side facing away from the arc. Among
/// the accepted ones the candidate with the smallest total change in
/// curve length wins; ties keep enumeration order.
///
/// Parallel segments admit a half-circle cap only when their separation is
/// `2 * radius`; the cap is tried at `a`'s end first, then at its start.
#[derive(Debug, Clone)]
pub struct Fillet {
    a: Curve,
    b: Curve,
    radius: f64,
    tol: Tolerance,
}

impl Fillet {
    /// Creates a new `Fillet` operation with the default tolerance.
    #[must_use]
    pub fn new(a: impl Into<Curve>, b: impl Into<Curve>, radius: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            radius,
            tol: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tol: Tolerance) -> Self {
        self.tol = tol;
        self
    }

    /// Executes the fillet.
    ///
    /// # Errors
    ///
    /// - `GeometryError` for a non-finite or non-positive radius.
    /// - `OperationError::Unsupported` for two arcs.
    /// - `OperationError::Coincident` for collinear segments.
    /// - `OperationError::NoValidCenter` when no tangent circle exists.
    /// - `OperationError::InfeasibleRadius` when every tangent circle
    ///   would trim past the far end of a curve.
    pub fn execute(&self) -> Result<FilletResult> {
        let r = self.radius;
        if !r.is_finite() {
            return Err(GeometryError::NonFinite("fillet radius").into());
        }
        if r <= 0.0 || self.tol.is_zero(r) {
            return Err(
                GeometryError::Degenerate(format!("fillet radius must be positive, got {r}")).into(),
            );
        }

        let candidates = match (&self.a, &self.b) {
            (Curve::Arc(_), Curve::Arc(_)) => {
                debug!("fillet: arc-arc pair rejected");
                return Err(OperationError::Unsupported("arc-arc fillet".into()).into());
            }
            (Curve::Line(la), Curve::Line(lb)) => {
                match intersect_2d::line_line(la.a(), &la.direction(), lb.a(), &lb.direction(), &self.tol) {
                    LineLine::Collinear => {
                        debug!("fillet: collinear segments");
                        return Err(
                            OperationError::Coincident("fillet segments are collinear".into()).into(),
                        );
                    }
                    LineLine::Parallel => self.parallel_caps(la, lb)?,
                    LineLine::Crossing { .. } => self.tangent_circles(),
                }
            }
            _ => self.tangent_circles(),
        };
        self.select(candidates)
    }

    /// Candidate arcs from every tangent circle of the two curves.
    fn tangent_circles(&self) -> Vec<Arc> {
        let (r, tol) = (self.radius, &self.tol);
        let loci_a = center_loci(&self.a, r, tol);
        let loci_b = center_loci(&self.b, r, tol);

        let mut arcs = Vec::new();
        for la in &loci_a {
            for lb in &loci_b {
                let SupportIntersection::Hits(hits) = intersect_supports(la, lb, tol) else {
                    continue;
                };
                for hit in hits {
                    let c = hit.point;
                    let (Some(ta), Some(tb)) = (touch_point(&self.a, &c, r, tol), touch_point(&self.b, &c, r, tol))
                    else {
                        continue;
                    };
                    let start = angle_of(&c, &ta);
                    let span = short_span(start, angle_of(&c, &tb));
                    // A half turn can go either way round.
                    let spans = if (span.abs() - PI).abs() <= tol.angular(r) {
                        vec![PI, -PI]
                    } else {
                        vec![span]
                    };
                    for span in spans {
                        match Arc::with_tolerance(c, r, start, span, tol) {
                            Ok(arc) => arcs.push(arc),
                            Err(err) => trace!(center = ?c, %err, "fillet: skipping candidate"),
                        }
                    }
                }
            }
        }
        arcs
    }

    /// Half-circle caps between two parallel segments.
    fn parallel_caps(&self, la: &LineSegment, lb: &LineSegment) -> Result<Vec<Arc>> {
        let (r, tol) = (self.radius, &self.tol);
        let offset = signed_distance_to_line(lb.a(), la.a(), &la.direction());
        if !tol.is_close(offset.abs(), 2.0 * r) {
            debug!(separation = offset.abs(), radius = r, "fillet: parallel segments");
            return Err(OperationError::NoValidCenter.into());
        }
        let toward_b = la.left_normal() * offset.signum();
        let dir = la.unit_direction();

        let mut arcs = Vec::with_capacity(2);
        for (ta, outward) in [(*la.b(), dir), (*la.a(), -dir)] {
            let c = ta + toward_b * r;
            let span = if cross(&(ta - c), &outward) > 0.0 { PI } else { -PI };
            arcs.push(Arc::with_tolerance(c, r, angle_of(&c, &ta), span, tol)?);
        }
        Ok(arcs)
    }

    fn select(&self, candidates: Vec<Arc>) -> Result<FilletResult> {
        if candidates.is_empty() {
            debug!(radius = self.radius, "fillet: no tangent circle");
            return Err(OperationError::NoValidCenter.into());
        }

        let mut best: Option<(f64, FilletResult)> = None;
        for arc in candidates {
            let kept_a = keep(&self.a, &arc.start_point(), &-arc.tangent_at(0.0), &self.tol);
            let kept_b = keep(&self.b, &arc.end_point(), &arc.tangent_at(1.0), &self.tol);
            let (Some(kept_a), Some(kept_b)) = (kept_a, kept_b) else {
                trace!(center = ?arc.center(), "fillet: candidate trims past an endpoint");
                continue;
            };
            let cost = (self.a.length() - kept_a.length()).abs() + (self.b.length() - kept_b.length()).abs();
            trace!(center = ?arc.center(), span = arc.span_angle(), cost, "fillet: candidate");

            let better = match &best {
                Some((best_cost, _)) => cost < *best_cost && !self.tol.is_close(cost, *best_cost),
                None => true,
            };
            if better {
                best = Some((
                    cost,
                    FilletResult {
                        arc,
                        trimmed_a: kept_a.into_curve(),
                        trimmed_b: kept_b.into_curve(),
                    },
                ));
            }
        }

        best.map(|(_, result)| result).ok_or_else(|| {
            debug!(radius = self.radius, "fillet: every candidate infeasible");
            OperationError::InfeasibleRadius { radius: self.radius }.into()
        })
    }
}

/// Curves of possible fillet centers at distance `r` from `curve`.
fn center_loci(curve: &Curve, r: f64, tol: &Tolerance) -> Vec<Support> {
    match curve {
        Curve::Line(l) => {
            let n = l.left_normal() * r;
            vec![
                Support::Line {
                    origin: l.a() + n,
                    dir: l.direction(),
                },
                Support::Line {
                    origin: l.a() - n,
                    dir: l.direction(),
                },
            ]
        }
        Curve::Arc(a) => {
            let mut loci = vec![Support::Circle {
                center: *a.center(),
                radius: a.radius() + r,
            }];
            if !tol.is_close(a.radius(), r) {
                loci.push(Support::Circle {
                    center: *a.center(),
                    radius: (a.radius() - r).abs(),
                });
            }
            loci
        }
    }
}

/// Point where the circle at `c` with radius `r` touches `curve`'s support.
fn touch_point(curve: &Curve, c: &Point2, r: f64, tol: &Tolerance) -> Option<Point2> {
    match curve {
        Curve::Line(l) => Some(foot_on_line(c, l.a(), &l.direction())),
        Curve::Arc(a) => {
            let u = normalize(&(c - a.center()), tol).ok()?;
            let near = a.center() + u * a.radius();
            let far = a.center() - u * a.radius();
            let miss = |p: &Point2| ((p - c).norm() - r).abs();
            Some(if miss(&near) <= miss(&far) { near } else { far })
        }
    }
}

/// Portion of a curve kept by a fillet.
enum Kept {
    Part(Curve),
    Consumed,
}

impl Kept {
    fn length(&self) -> f64 {
        match self {
            Self::Part(curve) => curve.length(),
            Self::Consumed => 0.0,
        }
    }

    fn into_curve(self) -> Option<Curve> {
        match self {
            Self::Part(curve) => Some(curve),
            Self::Consumed => None,
        }
    }
}

/// Cuts `curve` at the tangent point `t`, keeping the part that leaves `t`
/// in direction `k`. Orientation is preserved. Returns `None` when the
/// kept part would have negative length.
fn keep(curve: &Curve, t: &Point2, k: &Vector2, tol: &Tolerance) -> Option<Kept> {
    match curve {
        Curve::Line(line) => {
            let d = line.unit_direction();
            let keep_end = k.dot(&d) > 0.0;
            let remaining = if keep_end {
                (line.b() - t).dot(&d)
            } else {
                (t - line.a()).dot(&d)
            };
            let slack = tol.linear(line.length());
            if remaining < -slack {
                return None;
            }
            if remaining <= slack {
                return Some(Kept::Consumed);
            }
            let part = if keep_end {
                LineSegment::with_tolerance(*t, *line.b(), tol)
            } else {
                LineSegment::with_tolerance(*line.a(), *t, tol)
            };
            part.ok().map(|s| Kept::Part(s.into()))
        }
        Curve::Arc(arc) => {
            let ang = tol.angular(arc.radius());
            let span = arc.span_angle().abs();
            let theta = angle_of(arc.center(), t);
            let mut swept = sweep_between(arc.start_angle(), theta, arc.is_ccw());
            if swept >= TAU - ang {
                swept = 0.0;
            }
            let keep_end = k.dot(&tangent_at_angle(theta, arc.span_angle())) > 0.0;
            // Off the arc, the tangent point belongs to whichever end is nearer
            // around the gap. Only the end facing the kept side may be extended.
            let outside = swept > span + ang;
            let past_end = outside && swept - span <= TAU - swept;
            let (start, remaining) = if keep_end {
                if past_end {
                    return None;
                }
                let rest = if outside { span + TAU - swept } else { span - swept };
                (theta, rest)
            } else if outside && !past_end {
                return None;
            } else {
                (arc.start_angle(), swept)
            };
            if remaining >= TAU - ang {
                return None;
            }
            if remaining <= ang {
                return Some(Kept::Consumed);
            }
            Arc::with_tolerance(
                *arc.center(),
                arc.radius(),
                start,
                remaining.copysign(arc.span_angle()),
                tol,
            )
            .ok()
            .map(|a| Kept::Part(a.into()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> LineSegment {
        LineSegment::new(Point2::new(ax, ay), Point2::new(bx, by)).unwrap()
    }

    fn assert_tangent(result: &FilletResult, a: &Curve, b: &Curve, r: f64) {
        let c = result.arc.center();
        let on_a = result.trimmed_a.as_ref().unwrap_or(a);
        let on_b = result.trimmed_b.as_ref().unwrap_or(b);
        assert_abs_diff_eq!(on_a.distance_to_point(c), r, epsilon = 1e-9);
        assert_abs_diff_eq!(on_b.distance_to_point(c), r, epsilon = 1e-9);
    }

    #[test]
    fn perpendicular_unit_lines() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(0.0, 0.0, 0.0, 1.0);
        let result = Fillet::new(a, b, 1.0).execute().unwrap();
        assert_abs_diff_eq!(*result.arc.center(), Point2::new(1.0, 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(result.arc.span_angle().abs(), FRAC_PI_2, epsilon = 1e-12);
        // The whole of both unit segments is used up by a radius-1 fillet.
        assert!(result.trimmed_a.is_none());
        assert!(result.trimmed_b.is_none());
        assert_tangent(&result, &a.into(), &b.into(), 1.0);
    }

    #[test]
    fn perpendicular_corner_trims_both_segments() {
        let a = seg(-5.0, 0.0, 0.0, 0.0);
        let b = seg(0.0, 0.0, 0.0, 5.0);
        let result = Fillet::new(a, b, 1.0).execute().unwrap();
        assert_abs_diff_eq!(*result.arc.center(), Point2::new(-1.0, 1.0), epsilon = 1e-12);
        let ta = result.trimmed_a.unwrap();
        let tb = result.trimmed_b.unwrap();
        assert_abs_diff_eq!(ta.start_point(), Point2::new(-5.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(ta.end_point(), Point2::new(-1.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(tb.start_point(), Point2::new(0.0, 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(tb.end_point(), Point2::new(0.0, 5.0), epsilon = 1e-12);
        assert_abs_diff_eq!(result.arc.start_point(), ta.end_point(), epsilon = 1e-12);
        assert_abs_diff_eq!(result.arc.end_point(), tb.start_point(), epsilon = 1e-12);
    }

    #[test]
    fn oblique_lines() {
        let a = seg(-4.0, 0.0, 0.0, 0.0);
        let b = seg(0.0, 0.0, 3.0, 3.0);
        let result = Fillet::new(a, b, 0.5).execute().unwrap();
        assert_tangent(&result, &a.into(), &b.into(), 0.5);
        // 135° interior corner: the fillet turns 45°.
        assert_abs_diff_eq!(result.arc.span_angle().abs(), PI / 4.0, epsilon = 1e-9);
    }

    #[test]
    fn lines_that_do_not_reach_the_corner_are_extended() {
        let a = seg(-5.0, 0.0, -2.0, 0.0);
        let b = seg(0.0, 2.0, 0.0, 5.0);
        let result = Fillet::new(a, b, 1.0).execute().unwrap();
        assert_abs_diff_eq!(*result.arc.center(), Point2::new(-1.0, 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(result.trimmed_a.unwrap().end_point(), Point2::new(-1.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(result.trimmed_b.unwrap().start_point(), Point2::new(0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn parallel_lines_at_twice_the_radius() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(0.0, 10.0, 10.0, 10.0);
        let result = Fillet::new(a, b, 5.0).execute().unwrap();
        assert_abs_diff_eq!(*result.arc.center(), Point2::new(10.0, 5.0), epsilon = 1e-12);
        assert_abs_diff_eq!(result.arc.span_angle().abs(), PI, epsilon = 1e-12);
        assert_tangent(&result, &a.into(), &b.into(), 5.0);

        let err = Fillet::new(a, b, 4.0).execute().unwrap_err();
        assert!(matches!(
            err,
            crate::error::KernelError::Operation(OperationError::NoValidCenter)
        ));
    }

    #[test]
    fn radius_too_large_for_segments() {
        let err = Fillet::new(seg(0.0, 0.0, 1.0, 0.0), seg(0.0, 0.0, 0.0, 1.0), 2.0)
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::KernelError::Operation(OperationError::InfeasibleRadius { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::NoSolution);
    }

    #[test]
    fn invalid_radius_and_pairs() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(0.0, 0.0, 0.0, 1.0);
        for r in [0.0, -1.0, f64::NAN] {
            let err = Fillet::new(a, b, r).execute().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DegenerateInput);
        }
        let arc = Arc::new(Point2::origin(), 1.0, 0.0, 1.0).unwrap();
        let err = Fillet::new(arc, arc, 0.5).execute().unwrap_err();
        assert!(matches!(
            err,
            crate::error::KernelError::Operation(OperationError::Unsupported(_))
        ));
        let err = Fillet::new(a, seg(2.0, 0.0, 3.0, 0.0), 0.5).execute().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Coincident);
    }

    #[test]
    fn line_to_arc() {
        // Lower-left quarter of a radius-2 circle at (4, 3), ending at its
        // bottom point (4, 1), one unit above the segment's line.
        let line = seg(-4.0, 0.0, 4.0, 0.0);
        let arc = Arc::new(Point2::new(4.0, 3.0), 2.0, PI, FRAC_PI_2).unwrap();
        let result = Fillet::new(line, arc, 0.5).execute().unwrap();
        assert_tangent(&result, &line.into(), &arc.into(), 0.5);
        assert_abs_diff_eq!(*result.arc.center(), Point2::new(4.0, 0.5), epsilon = 1e-9);

        let ta = result.trimmed_a.unwrap();
        let tb = result.trimmed_b.unwrap();
        assert_abs_diff_eq!(ta.end_point(), result.arc.start_point(), epsilon = 1e-9);
        assert_abs_diff_eq!(tb.end_point(), result.arc.end_point(), epsilon = 1e-9);
        assert_abs_diff_eq!(tb.start_point(), Point2::new(2.0, 3.0), epsilon = 1e-9);
    }

    #[test]
    fn arc_too_short_for_radius() {
        // About one unit of a radius-5 arc leaving the corner upward. Every
        // tangent circle of radius 3 touches the circle past the arc's end
        // or behind its start, so nothing may wrap around the gap.
        let line = seg(-10.0, 0.0, 0.0, 0.0);
        let arc = Arc::new(Point2::new(5.0, 0.0), 5.0, PI, -0.2).unwrap();
        let err = Fillet::new(line, arc, 3.0).execute().unwrap_err();
        assert!(matches!(
            err,
            crate::error::KernelError::Operation(OperationError::InfeasibleRadius { .. })
        ));

        let err = Fillet::new(arc, line, 3.0).execute().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSolution);
    }

    #[test]
    fn kept_arc_never_exceeds_its_sweep() {
        let line = seg(-10.0, 0.0, 0.0, 0.0);
        let arc = Arc::new(Point2::new(5.0, 0.0), 5.0, PI, -0.2).unwrap();
        let result = Fillet::new(line, arc, 0.1).execute().unwrap();
        assert_tangent(&result, &line.into(), &arc.into(), 0.1);
        if let Some(Curve::Arc(kept)) = result.trimmed_b {
            assert!(kept.span_angle().abs() <= 0.2 + 1e-12);
            assert!(kept.span_angle() < 0.0);
        }
    }

    #[test]
    fn arc_then_line_mirrors_line_then_arc() {
        let line = seg(-4.0, 0.0, 4.0, 0.0);
        let arc = Arc::new(Point2::new(4.0, 3.0), 2.0, PI, FRAC_PI_2).unwrap();
        let ab = Fillet::new(line, arc, 0.5).execute().unwrap();
        let ba = Fillet::new(arc, line, 0.5).execute().unwrap();
        assert_abs_diff_eq!(*ab.arc.center(), *ba.arc.center(), epsilon = 1e-9);
        assert_abs_diff_eq!(ab.arc.start_point(), ba.arc.end_point(), epsilon = 1e-9);
    }

    #[test]
    fn perpendicular_matches_oblique_path() {
        // A slightly rotated copy of the same corner should move the center
        // continuously, with no special-cased right angle.
        let square = Fillet::new(seg(-3.0, 0.0, 0.0, 0.0), seg(0.0, 0.0, 0.0, 3.0), 1.0)
            .execute()
            .unwrap();
        let nearly = Fillet::new(seg(-3.0, 0.0, 0.0, 0.0), seg(0.0, 0.0, -1e-7, 3.0), 1.0)
            .execute()
            .unwrap();
        assert_abs_diff_eq!(*square.arc.center(), *nearly.arc.center(), epsilon = 1e-6);
    }
}
