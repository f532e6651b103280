use std::iter::FusedIterator;

use crate::geometry::{Arc, Circle, Curve, Entity, LineSegment};
use crate::math::angle::angle_of;
use crate::math::intersect_2d::{self, CircleCircle, LineCircle, LineLine};
use crate::math::{Point2, Tolerance, Vector2};

/// One intersection point, tagged with its parameter on each input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPoint {
    pub point: Point2,
    /// Parameter on the first entity.
    pub t_a: f64,
    /// Parameter on the second entity.
    pub t_b: f64,
    /// `true` when the entities touch without crossing.
    pub tangent: bool,
}

impl IntersectionPoint {
    fn swapped(self) -> Self {
        Self {
            t_a: self.t_b,
            t_b: self.t_a,
            ..self
        }
    }
}

/// Zero, one or two intersection points, ordered by increasing parameter on
/// the first entity.
///
/// This is a consuming iterator: once drained it stays empty.
#[derive(Debug)]
pub struct IntersectionPoints {
    slots: [Option<IntersectionPoint>; 2],
    next: usize,
}

impl IntersectionPoints {
    fn empty() -> Self {
        Self {
            slots: [None, None],
            next: 0,
        }
    }

    fn sorted(mut hits: Vec<IntersectionPoint>) -> Self {
        hits.sort_by(|p, q| p.t_a.total_cmp(&q.t_a));
        let mut out = Self::empty();
        for (slot, hit) in out.slots.iter_mut().zip(hits) {
            *slot = Some(hit);
        }
        out
    }

    fn swapped(self) -> Self {
        Self::sorted(self.map(IntersectionPoint::swapped).collect())
    }
}

impl Iterator for IntersectionPoints {
    type Item = IntersectionPoint;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.slots.len() {
            let slot = self.slots[self.next].take();
            self.next += 1;
            if slot.is_some() {
                return slot;
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.slots[self.next.min(2)..]
            .iter()
            .filter(|s| s.is_some())
            .count();
        (n, Some(n))
    }
}

impl ExactSizeIterator for IntersectionPoints {}

impl FusedIterator for IntersectionPoints {}

/// Outcome of an intersection query.
#[derive(Debug)]
pub enum Intersection {
    /// A finite set of points (possibly empty: disjoint or parallel).
    Points(IntersectionPoints),
    /// The entities overlap along a stretch of positive length.
    Coincident,
}

impl Intersection {
    #[must_use]
    pub fn is_coincident(&self) -> bool {
        matches!(self, Self::Coincident)
    }

    /// The point set, or `None` for coincident entities.
    #[must_use]
    pub fn into_points(self) -> Option<IntersectionPoints> {
        match self {
            Self::Points(points) => Some(points),
            Self::Coincident => None,
        }
    }

    fn swapped(self) -> Self {
        match self {
            Self::Points(points) => Self::Points(points.swapped()),
            Self::Coincident => Self::Coincident,
        }
    }
}

/// Intersects two bounded entities.
///
/// Solved on the supporting geometry (infinite line, full circle), then
/// filtered by each entity's parameter range. [`intersect_extended`] shares
/// the same path without the range filter on the first operand.
///
/// Commutative: `intersect(b, a)` yields the same points as
/// `intersect(a, b)` with `t_a`/`t_b` exchanged.
#[must_use]
pub fn intersect(a: &Entity, b: &Entity, tol: &Tolerance) -> Intersection {
    if rank(a) > rank(b) {
        return solve(b, a, Extent::Bounded, tol).swapped();
    }
    solve(a, b, Extent::Bounded, tol)
}

/// Intersects the supporting geometry of `curve` (infinite line or full
/// circle) with the bounded `boundary`.
///
/// `t_a` is unbounded for lines; for arcs it is the forward parameter in
/// `[0, 2π / |span|)`.
#[must_use]
pub fn intersect_extended(curve: &Curve, boundary: &Entity, tol: &Tolerance) -> Intersection {
    solve(&Entity::from(*curve), boundary, Extent::Extended, tol)
}

#[must_use]
pub fn line_line(a: &LineSegment, b: &LineSegment, tol: &Tolerance) -> Intersection {
    intersect(&Entity::Line(*a), &Entity::Line(*b), tol)
}

#[must_use]
pub fn line_circle(line: &LineSegment, circle: &Circle, tol: &Tolerance) -> Intersection {
    intersect(&Entity::Line(*line), &Entity::Circle(*circle), tol)
}

#[must_use]
pub fn line_arc(line: &LineSegment, arc: &Arc, tol: &Tolerance) -> Intersection {
    intersect(&Entity::Line(*line), &Entity::Arc(*arc), tol)
}

#[must_use]
pub fn circle_circle(a: &Circle, b: &Circle, tol: &Tolerance) -> Intersection {
    intersect(&Entity::Circle(*a), &Entity::Circle(*b), tol)
}

#[must_use]
pub fn arc_circle(arc: &Arc, circle: &Circle, tol: &Tolerance) -> Intersection {
    intersect(&Entity::Arc(*arc), &Entity::Circle(*circle), tol)
}

#[must_use]
pub fn arc_arc(a: &Arc, b: &Arc, tol: &Tolerance) -> Intersection {
    intersect(&Entity::Arc(*a), &Entity::Arc(*b), tol)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extent {
    Bounded,
    Extended,
}

/// Infinite line or full circle underlying an entity.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Support {
    Line { origin: Point2, dir: Vector2 },
    Circle { center: Point2, radius: f64 },
}

impl Support {
    pub(crate) fn of(entity: &Entity) -> Self {
        match entity {
            Entity::Line(l) => Self::Line {
                origin: *l.a(),
                dir: l.direction(),
            },
            Entity::Arc(a) => Self::Circle {
                center: *a.center(),
                radius: a.radius(),
            },
            Entity::Circle(c) => Self::Circle {
                center: *c.center(),
                radius: c.radius(),
            },
        }
    }
}

/// Raw hit on supporting geometry. `s` is a line parameter or an absolute
/// angle on a circle.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SupportHit {
    pub point: Point2,
    pub s_a: f64,
    pub s_b: f64,
    pub tangent: bool,
}

pub(crate) enum SupportIntersection {
    Hits(Vec<SupportHit>),
    Coincident,
}

pub(crate) fn intersect_supports(a: &Support, b: &Support, tol: &Tolerance) -> SupportIntersection {
    match (a, b) {
        (Support::Line { origin: p1, dir: d1 }, Support::Line { origin: p2, dir: d2 }) => {
            match intersect_2d::line_line(p1, d1, p2, d2, tol) {
                LineLine::Crossing { t, u } => SupportIntersection::Hits(vec![SupportHit {
                    point: p1 + d1 * t,
                    s_a: t,
                    s_b: u,
                    tangent: false,
                }]),
                LineLine::Parallel => SupportIntersection::Hits(Vec::new()),
                LineLine::Collinear => SupportIntersection::Coincident,
            }
        }
        (Support::Line { origin, dir }, Support::Circle { center, radius }) => {
            let hit = |t: f64, tangent: bool| {
                let point = origin + dir * t;
                SupportHit {
                    point,
                    s_a: t,
                    s_b: angle_of(center, &point),
                    tangent,
                }
            };
            let hits = match intersect_2d::line_circle(origin, dir, center, *radius, tol) {
                LineCircle::Miss => Vec::new(),
                LineCircle::Tangent(t) => vec![hit(t, true)],
                LineCircle::Secant(t0, t1) => vec![hit(t0, false), hit(t1, false)],
            };
            SupportIntersection::Hits(hits)
        }
        (Support::Circle { .. }, Support::Line { .. }) => match intersect_supports(b, a, tol) {
            SupportIntersection::Hits(hits) => SupportIntersection::Hits(
                hits.into_iter()
                    .map(|h| SupportHit {
                        s_a: h.s_b,
                        s_b: h.s_a,
                        ..h
                    })
                    .collect(),
            ),
            SupportIntersection::Coincident => SupportIntersection::Coincident,
        },
        (
            Support::Circle {
                center: c1,
                radius: r1,
            },
            Support::Circle {
                center: c2,
                radius: r2,
            },
        ) => {
            let hit = |point: Point2, tangent: bool| SupportHit {
                point,
                s_a: angle_of(c1, &point),
                s_b: angle_of(c2, &point),
                tangent,
            };
            match intersect_2d::circle_circle(c1, *r1, c2, *r2, tol) {
                CircleCircle::Disjoint => SupportIntersection::Hits(Vec::new()),
                CircleCircle::Coincident => SupportIntersection::Coincident,
                CircleCircle::Tangent(p) => SupportIntersection::Hits(vec![hit(p, true)]),
                CircleCircle::Crossing(p, q) => {
                    SupportIntersection::Hits(vec![hit(p, false), hit(q, false)])
                }
            }
        }
    }
}

fn rank(entity: &Entity) -> u8 {
    match entity {
        Entity::Line(_) => 0,
        Entity::Arc(_) => 1,
        Entity::Circle(_) => 2,
    }
}

/// Converts a support parameter (line `t` or absolute angle) into the
/// entity's own parameter.
fn entity_param(entity: &Entity, s: f64, tol: &Tolerance) -> f64 {
    match entity {
        Entity::Line(_) => s,
        Entity::Arc(a) => a.param_of_angle(s, tol),
        Entity::Circle(c) => c.param_of_angle(s),
    }
}

/// Snaps `t` into the entity's bounded range, or `None` if it lies outside.
fn clamp_to_bounds(entity: &Entity, t: f64, tol: &Tolerance) -> Option<f64> {
    match entity {
        Entity::Line(l) => {
            let len = l.length();
            let eps = tol.linear(len) / len;
            (t >= -eps && t <= 1.0 + eps).then(|| t.clamp(0.0, 1.0))
        }
        Entity::Arc(a) => (t <= 1.0 + a.param_eps(tol)).then(|| t.min(1.0)),
        Entity::Circle(_) => Some(t),
    }
}

fn solve(a: &Entity, b: &Entity, extent: Extent, tol: &Tolerance) -> Intersection {
    match intersect_supports(&Support::of(a), &Support::of(b), tol) {
        SupportIntersection::Coincident => overlap(a, b, extent, tol),
        SupportIntersection::Hits(hits) => {
            let mut points = Vec::with_capacity(hits.len());
            for hit in hits {
                let t_a = entity_param(a, hit.s_a, tol);
                let t_a = match extent {
                    Extent::Extended => t_a,
                    Extent::Bounded => match clamp_to_bounds(a, t_a, tol) {
                        Some(t) => t,
                        None => continue,
                    },
                };
                let Some(t_b) = clamp_to_bounds(b, entity_param(b, hit.s_b, tol), tol) else {
                    continue;
                };
                points.push(IntersectionPoint {
                    point: hit.point,
                    t_a,
                    t_b,
                    tangent: hit.tangent,
                });
            }
            Intersection::Points(IntersectionPoints::sorted(points))
        }
    }
}

/// Resolves entities whose supports coincide.
fn overlap(a: &Entity, b: &Entity, extent: Extent, tol: &Tolerance) -> Intersection {
    match (extent, a, b) {
        (Extent::Bounded, Entity::Line(la), Entity::Line(lb)) => collinear_overlap(la, lb, tol),
        (Extent::Bounded, Entity::Arc(aa), Entity::Arc(ab)) => cocircular_overlap(aa, ab, tol),
        // An infinite support, or a full circle, covers every point of the other.
        _ => Intersection::Coincident,
    }
}

fn collinear_overlap(a: &LineSegment, b: &LineSegment, tol: &Tolerance) -> Intersection {
    let u0 = a.param_of(b.a());
    let u1 = a.param_of(b.b());
    let lo = u0.min(u1).max(0.0);
    let hi = u0.max(u1).min(1.0);
    let len = a.length();
    let eps = tol.linear(len) / len;

    if hi < lo - eps {
        return Intersection::Points(IntersectionPoints::empty());
    }
    if hi - lo > eps {
        return Intersection::Coincident;
    }
    // End-to-end touch.
    let t_a = (0.5 * (lo + hi)).clamp(0.0, 1.0);
    let point = a.point_at(t_a);
    Intersection::Points(IntersectionPoints::sorted(vec![IntersectionPoint {
        point,
        t_a,
        t_b: b.param_of(&point).clamp(0.0, 1.0),
        tangent: false,
    }]))
}

fn cocircular_overlap(a: &Arc, b: &Arc, tol: &Tolerance) -> Intersection {
    let param_on = |arc: &Arc, p: Point2| arc.param_of_angle(angle_of(arc.center(), &p), tol);
    let strictly_inside = |arc: &Arc, p: Point2| {
        let eps = arc.param_eps(tol);
        let t = param_on(arc, p);
        t > eps && t < 1.0 - eps
    };
    let within = |arc: &Arc, p: Point2| param_on(arc, p) <= 1.0 + arc.param_eps(tol);

    let interior_overlap = strictly_inside(b, a.start_point())
        || strictly_inside(b, a.end_point())
        || strictly_inside(a, b.start_point())
        || strictly_inside(a, b.end_point())
        || within(b, a.point_at(0.5))
        || within(a, b.point_at(0.5));
    if interior_overlap {
        return Intersection::Coincident;
    }

    let mut touches = Vec::with_capacity(2);
    for (t_a, p) in [(0.0, a.start_point()), (1.0, a.end_point())] {
        if within(b, p) {
            touches.push(IntersectionPoint {
                point: p,
                t_a,
                t_b: param_on(b, p).min(1.0),
                tangent: false,
            });
        }
    }
    Intersection::Points(IntersectionPoints::sorted(touches))
}
