use std::f64::consts::PI;

use tracing::{debug, trace};

use crate::error::{GeometryError, Result};
use crate::geometry::{Arc, Curve, Endpoint, Entity, LineSegment, Polyline};
use crate::math::angle::{angle_of, turn_angle};
use crate::math::{Point2, Tolerance};
use crate::operations::intersect::{intersect_supports, Support, SupportIntersection};
use crate::operations::modification::{param_eps, resize};

use super::curve_offset_2d::{collapsed, offset_curve};
use super::{check_distance, Side};

/// Offsets a bulge polyline to one side.
///
/// Each segment is offset on its own, then neighbours are re-joined at the
/// source vertex:
/// - a convex corner (the gap opens on the offset side) gets an arc of
///   radius `distance` centered on the vertex;
/// - a concave corner cuts both neighbours back to their crossing.
///
/// Arc segments whose radius shrinks exactly to zero vanish from the
/// output. Closed polylines are joined across the wrap as well.
#[derive(Debug, Clone)]
pub struct PolylineOffset2D {
    polyline: Polyline,
    distance: f64,
    side: Side,
    tol: Tolerance,
}

/// How two consecutive offset pieces are connected.
enum Corner {
    Meet,
    Bridge(Curve),
    Cut { prev: Curve, next: Curve },
}

impl PolylineOffset2D {
    /// Creates a new polyline offset operation.
    #[must_use]
    pub fn new(polyline: Polyline, distance: f64, side: Side) -> Self {
        Self {
            polyline,
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
    /// - A `DegenerateInput`-kind error for a bad distance, a polyline with
    ///   no segments, or a zero-length segment.
    /// - `OperationError::Collapsed` when an arc turns inside out, a
    ///   concave corner reverses a segment, or every segment vanishes.
    pub fn execute(&self) -> Result<Polyline> {
        check_distance(self.distance, &self.tol)?;
        let segments = self.polyline.segments(&self.tol)?;
        if segments.is_empty() {
            return Err(GeometryError::Degenerate("polyline has no segments".into()).into());
        }

        // Phase A: offset each segment, remembering the vertex it starts at.
        let mut pieces: Vec<(Point2, Curve)> = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            match offset_curve(segment, self.distance, self.side, &self.tol)? {
                Some(piece) => pieces.push((segment.start_point(), piece)),
                None => trace!(segment = i, "polyline offset: arc collapsed to a point"),
            }
        }
        if pieces.is_empty() {
            debug!("polyline offset: every segment collapsed");
            return Err(collapsed("every segment collapsed"));
        }

        // Phase B: join consecutive pieces.
        let mut chain: Vec<Curve> = Vec::with_capacity(pieces.len() * 2);
        for (pivot, piece) in pieces.iter().copied() {
            let Some(prev) = chain.last_mut() else {
                chain.push(piece);
                continue;
            };
            match self.corner(prev, &piece, &pivot)? {
                Corner::Meet => chain.push(piece),
                Corner::Bridge(bridge) => {
                    chain.push(bridge);
                    chain.push(piece);
                }
                Corner::Cut { prev: p, next } => {
                    *prev = p;
                    chain.push(next);
                }
            }
        }

        if self.polyline.closed && chain.len() > 1 {
            let pivot = pieces[0].0;
            let last = chain.len() - 1;
            match self.corner(&chain[last], &chain[0], &pivot)? {
                Corner::Meet => {}
                Corner::Bridge(bridge) => chain.push(bridge),
                Corner::Cut { prev, next } => {
                    chain[last] = prev;
                    chain[0] = next;
                }
            }
        }

        Ok(Polyline::from_curves(&chain, self.polyline.closed))
    }

    fn corner(&self, prev: &Curve, next: &Curve, pivot: &Point2) -> Result<Corner> {
        let tol = &self.tol;
        let (end, start) = (prev.end_point(), next.start_point());
        if tol.points_coincide(&end, &start) {
            return Ok(Corner::Meet);
        }

        let ang = tol.angular(self.distance);
        let mut turn = turn_angle(&prev.tangent_at(1.0), &next.tangent_at(0.0));
        if turn.abs() <= ang {
            return Ok(Corner::Bridge(LineSegment::with_tolerance(end, start, tol)?.into()));
        }
        if (turn.abs() - PI).abs() <= ang {
            // A full reversal is convex on either side.
            turn = -PI * self.side.sign();
        }

        let convex = match self.side {
            Side::Left => turn < 0.0,
            Side::Right => turn > 0.0,
        };
        if !convex {
            return self.cut(prev, next, pivot);
        }

        let on_circle = |p: &Point2| tol.is_close((p - pivot).norm(), self.distance);
        if !on_circle(&end) || !on_circle(&start) {
            return Ok(Corner::Bridge(LineSegment::with_tolerance(end, start, tol)?.into()));
        }
        let arc = Arc::with_tolerance(*pivot, self.distance, angle_of(pivot, &end), turn, tol)?;
        trace!(pivot = ?pivot, turn, "polyline offset: convex corner");
        Ok(Corner::Bridge(arc.into()))
    }

    /// Cuts both pieces back to the crossing of their supports nearest the
    /// source vertex.
    fn cut(&self, prev: &Curve, next: &Curve, pivot: &Point2) -> Result<Corner> {
        let tol = &self.tol;
        let supports = (
            Support::of(&Entity::from(*prev)),
            Support::of(&Entity::from(*next)),
        );
        let SupportIntersection::Hits(hits) = intersect_supports(&supports.0, &supports.1, tol) else {
            return Err(collapsed("concave corner between overlapping pieces"));
        };
        let Some(x) = hits
            .iter()
            .map(|h| h.point)
            .min_by(|p, q| (p - pivot).norm().total_cmp(&(q - pivot).norm()))
        else {
            debug!(pivot = ?pivot, "polyline offset: concave pieces never meet");
            return Err(collapsed("concave corner has no crossing"));
        };

        let t_prev = param_on(prev, &x, tol);
        let t_next = match next {
            Curve::Arc(arc) => {
                // Crossings beyond the end lie behind the start.
                let t = param_on(next, &x, tol);
                if t > 1.0 + arc.param_eps(tol) {
                    t - arc.param_limit()
                } else {
                    t
                }
            }
            Curve::Line(_) => param_on(next, &x, tol),
        };
        if t_prev <= param_eps(prev, tol) || t_next >= 1.0 - param_eps(next, tol) {
            debug!(pivot = ?pivot, t_prev, t_next, "polyline offset: concave corner reverses a piece");
            return Err(collapsed("offset reverses a segment at a concave corner"));
        }
        trace!(pivot = ?pivot, t_prev, t_next, "polyline offset: concave corner");

        let reversed = |_| collapsed("offset reverses a segment at a concave corner");
        Ok(Corner::Cut {
            prev: resize(prev, Endpoint::End, t_prev, tol).map_err(reversed)?,
            next: resize(next, Endpoint::Start, t_next, tol).map_err(reversed)?,
        })
    }
}

fn param_on(curve: &Curve, p: &Point2, tol: &Tolerance) -> f64 {
    match curve {
        Curve::Line(line) => line.param_of(p),
        Curve::Arc(arc) => arc.param_of_angle(angle_of(arc.center(), p), tol),
    }
}
