use crate::error::{GeometryError, Result};
use crate::math::angle::{arc_from_bulge, bulge_from_span};
use crate::math::{Point2, Tolerance};

use super::{Arc, Curve, LineSegment};

/// Bulge-encoded polyline vertex for mixed line/arc segments.
///
/// `bulge = tan(span / 4)` describes the segment leaving this vertex:
/// - `0` = straight line to next vertex
/// - `> 0` = counter-clockwise arc to next vertex
/// - `< 0` = clockwise arc to next vertex
/// - `|bulge| = 1` = semicircle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineVertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl PolylineVertex {
    /// Creates a new vertex with the given coordinates and bulge.
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// Creates a line vertex (bulge = 0).
    #[must_use]
    pub fn line(x: f64, y: f64) -> Self {
        Self { x, y, bulge: 0.0 }
    }

    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    #[must_use]
    pub fn with_bulge(&self, bulge: f64) -> Self {
        Self { bulge, ..*self }
    }
}

/// An ordered chain of line and arc segments.
///
/// For closed polylines, the last vertex connects back to the first and its
/// bulge describes that closing segment; for open polylines the last
/// vertex's bulge is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub vertices: Vec<PolylineVertex>,
    pub closed: bool,
}

impl Polyline {
    #[must_use]
    pub fn new(vertices: Vec<PolylineVertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// Creates a polyline of straight segments through `points`.
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let vertices = points
            .iter()
            .map(|p| PolylineVertex::line(p.x, p.y))
            .collect();
        Self { vertices, closed }
    }

    /// Builds a polyline from a chain of curves, each starting where the
    /// previous one ends. For closed output the last curve is expected to
    /// end at the first curve's start.
    #[must_use]
    pub fn from_curves(curves: &[Curve], closed: bool) -> Self {
        let mut vertices = Vec::with_capacity(curves.len() + 1);
        for curve in curves {
            let start = curve.start_point();
            let bulge = match curve {
                Curve::Line(_) => 0.0,
                Curve::Arc(arc) => bulge_from_span(arc.span_angle()),
            };
            vertices.push(PolylineVertex::new(start.x, start.y, bulge));
        }
        if !closed {
            if let Some(last) = curves.last() {
                let end = last.end_point();
                vertices.push(PolylineVertex::line(end.x, end.y));
            }
        }
        Self { vertices, closed }
    }

    /// Returns the number of segments in this polyline.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Decodes every segment into a [`Curve`].
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for zero-length segments and
    /// `GeometryError::NonFinite` for non-finite coordinates or bulges.
    pub fn segments(&self, tol: &Tolerance) -> Result<Vec<Curve>> {
        let n = self.vertices.len();
        let mut curves = Vec::with_capacity(self.segment_count());
        for i in 0..self.segment_count() {
            let v0 = &self.vertices[i];
            let v1 = &self.vertices[(i + 1) % n];
            if !v0.bulge.is_finite() {
                return Err(GeometryError::NonFinite("polyline bulge").into());
            }
            let (p0, p1) = (v0.point(), v1.point());

            if tol.is_zero(v0.bulge) {
                curves.push(LineSegment::with_tolerance(p0, p1, tol)?.into());
                continue;
            }
            let (center, radius, start, span) =
                arc_from_bulge(&p0, &p1, v0.bulge, tol).ok_or_else(|| {
                    GeometryError::Degenerate(format!(
                        "zero-length arc segment at ({}, {})",
                        p0.x, p0.y
                    ))
                })?;
            curves.push(Arc::with_tolerance(center, radius, start, span, tol)?.into());
        }
        Ok(curves)
    }

    /// Returns a new polyline with vertices in reverse order and negated bulges.
    ///
    /// For a segment `v[i] → v[i+1]` with bulge `b`, the reversed segment
    /// `v[i+1] → v[i]` has bulge `-b` (arc direction flips).
    #[must_use]
    pub fn reversed(&self) -> Self {
        let m = self.vertices.len();
        if m == 0 {
            return self.clone();
        }
        if self.closed {
            // Closed: keep vertex 0 first so the closing segment stays last.
            let mut new_verts = Vec::with_capacity(m);
            for j in 0..m {
                let orig_idx = (m - j) % m;
                // Reversed segment j runs orig_idx → orig_idx - 1, i.e. the
                // reverse of input segment (orig_idx - 1).
                let seg = (orig_idx + m - 1) % m;
                let v = &self.vertices[orig_idx];
                new_verts.push(v.with_bulge(-self.vertices[seg].bulge));
            }
            return Self {
                vertices: new_verts,
                closed: true,
            };
        }
        let mut new_verts = Vec::with_capacity(m);
        for j in 0..m {
            let orig_idx = m - 1 - j;
            // In the reversed polyline, vertex j connects to vertex j+1,
            // which corresponds to the reverse of input segment (m-2-j).
            let bulge = if j < m - 1 {
                -self.vertices[m - 2 - j].bulge
            } else {
                0.0
            };
            new_verts.push(self.vertices[orig_idx].with_bulge(bulge));
        }
        Self {
            vertices: new_verts,
            closed: false,
        }
    }

    /// Returns `true` if both polylines have the same closure and vertex
    /// count, with coincident vertices and matching bulges.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        self.closed == other.closed
            && self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .zip(&other.vertices)
                .enumerate()
                .all(|(i, (a, b))| {
                    let last_open = !self.closed && i + 1 == self.vertices.len();
                    tol.points_coincide(&a.point(), &b.point())
                        && (last_open || tol.is_close(a.bulge, b.bulge))
                })
    }
}
