mod arc;
mod circle;
pub mod polyline;
mod segment;

pub use arc::Arc;
pub use circle::Circle;
pub use polyline::{Polyline, PolylineVertex};
pub use segment::LineSegment;

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Tolerance, Vector2};

/// Which end of a curve an operation adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Segment `a`, or the arc's start angle.
    Start,
    /// Segment `b`, or the arc's end angle.
    End,
}

/// An entity with two endpoints: the things trim, extend and fillet
/// can shorten or lengthen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Line(LineSegment),
    Arc(Arc),
}

impl Curve {
    #[must_use]
    pub fn start_point(&self) -> Point2 {
        match self {
            Self::Line(l) => *l.a(),
            Self::Arc(a) => a.start_point(),
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Line(l) => *l.b(),
            Self::Arc(a) => a.end_point(),
        }
    }

    #[must_use]
    pub fn endpoint(&self, end: Endpoint) -> Point2 {
        match end {
            Endpoint::Start => self.start_point(),
            Endpoint::End => self.end_point(),
        }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Line(l) => l.point_at(t),
            Self::Arc(a) => a.point_at(t),
        }
    }

    /// Unit direction of travel at parameter `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        match self {
            Self::Line(l) => l.unit_direction(),
            Self::Arc(a) => a.tangent_at(t),
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.length(),
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.reversed()),
            Self::Arc(a) => Self::Arc(a.reversed()),
        }
    }

    #[must_use]
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        match self {
            Self::Line(l) => l.distance_to_point(p),
            Self::Arc(a) => a.distance_to_point(p),
        }
    }

    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        match (self, other) {
            (Self::Line(a), Self::Line(b)) => a.approx_eq(b, tol),
            (Self::Arc(a), Self::Arc(b)) => a.approx_eq(b, tol),
            _ => false,
        }
    }
}

impl From<LineSegment> for Curve {
    fn from(line: LineSegment) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for Curve {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

/// Every primitive kind the kernel operates on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity {
    Line(LineSegment),
    Arc(Arc),
    Circle(Circle),
}

impl Entity {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Arc(_) => "arc",
            Self::Circle(_) => "circle",
        }
    }

    #[must_use]
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        match self {
            Self::Line(l) => l.distance_to_point(p),
            Self::Arc(a) => a.distance_to_point(p),
            Self::Circle(c) => c.distance_to_point(p),
        }
    }

    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        match (self, other) {
            (Self::Line(a), Self::Line(b)) => a.approx_eq(b, tol),
            (Self::Arc(a), Self::Arc(b)) => a.approx_eq(b, tol),
            (Self::Circle(a), Self::Circle(b)) => a.approx_eq(b, tol),
            _ => false,
        }
    }
}

impl From<Curve> for Entity {
    fn from(curve: Curve) -> Self {
        match curve {
            Curve::Line(l) => Self::Line(l),
            Curve::Arc(a) => Self::Arc(a),
        }
    }
}

impl From<LineSegment> for Entity {
    fn from(line: LineSegment) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for Entity {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

impl From<Circle> for Entity {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}
