use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ErrorKind, OperationError, Result};
use crate::geometry::{Arc, Circle, Curve, Endpoint, Entity, LineSegment, Polyline, PolylineVertex};
use crate::math::{Point2, Tolerance};
use crate::operations::{
    intersect, CurveOffset2D, Extend, Fillet, Intersection, IntersectionPoint, PolylineOffset2D, Side, Trim,
};

/// Serializable form of a kernel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Line {
        a: [f64; 2],
        b: [f64; 2],
    },
    Arc {
        center: [f64; 2],
        radius: f64,
        start_angle: f64,
        span_angle: f64,
    },
    Circle {
        center: [f64; 2],
        radius: f64,
    },
    /// Vertices as `[x, y, bulge]`.
    Polyline {
        vertices: Vec<[f64; 3]>,
        closed: bool,
    },
}

fn point([x, y]: [f64; 2]) -> Point2 {
    Point2::new(x, y)
}

fn coords(p: &Point2) -> [f64; 2] {
    [p.x, p.y]
}

impl Shape {
    /// Builds the primitive this shape describes.
    ///
    /// # Errors
    ///
    /// Returns the constructor's error for invalid geometry, or
    /// `OperationError::InvalidInput` for a polyline.
    pub fn to_entity(&self, tol: &Tolerance) -> Result<Entity> {
        match self {
            Self::Line { a, b } => Ok(LineSegment::with_tolerance(point(*a), point(*b), tol)?.into()),
            Self::Arc {
                center,
                radius,
                start_angle,
                span_angle,
            } => Ok(Arc::with_tolerance(point(*center), *radius, *start_angle, *span_angle, tol)?.into()),
            Self::Circle { center, radius } => Ok(Circle::with_tolerance(point(*center), *radius, tol)?.into()),
            Self::Polyline { .. } => {
                Err(OperationError::InvalidInput("a polyline is not a primitive".into()).into())
            }
        }
    }

    /// Builds the line or arc this shape describes.
    ///
    /// # Errors
    ///
    /// As [`Shape::to_entity`]; circles have no endpoints and are rejected
    /// with `OperationError::InvalidInput`.
    pub fn to_curve(&self, tol: &Tolerance) -> Result<Curve> {
        match self.to_entity(tol)? {
            Entity::Line(l) => Ok(l.into()),
            Entity::Arc(a) => Ok(a.into()),
            Entity::Circle(_) => {
                Err(OperationError::InvalidInput("a circle has no endpoints".into()).into())
            }
        }
    }

    #[must_use]
    pub fn to_polyline(&self) -> Option<Polyline> {
        match self {
            Self::Polyline { vertices, closed } => Some(Polyline::new(
                vertices
                    .iter()
                    .map(|[x, y, bulge]| PolylineVertex::new(*x, *y, *bulge))
                    .collect(),
                *closed,
            )),
            _ => None,
        }
    }

    /// Geometric equality within `tol`.
    ///
    /// Falls back to exact equality when either side is not valid geometry.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        if let (Some(a), Some(b)) = (self.to_polyline(), other.to_polyline()) {
            return a.approx_eq(&b, tol);
        }
        match (self.to_entity(tol), other.to_entity(tol)) {
            (Ok(a), Ok(b)) => a.approx_eq(&b, tol),
            _ => self == other,
        }
    }
}

impl From<&Entity> for Shape {
    fn from(entity: &Entity) -> Self {
        match entity {
            Entity::Line(l) => Self::Line {
                a: coords(l.a()),
                b: coords(l.b()),
            },
            Entity::Arc(a) => Self::Arc {
                center: coords(a.center()),
                radius: a.radius(),
                start_angle: a.start_angle(),
                span_angle: a.span_angle(),
            },
            Entity::Circle(c) => Self::Circle {
                center: coords(c.center()),
                radius: c.radius(),
            },
        }
    }
}

impl From<&Curve> for Shape {
    fn from(curve: &Curve) -> Self {
        Self::from(&Entity::from(*curve))
    }
}

impl From<&Polyline> for Shape {
    fn from(polyline: &Polyline) -> Self {
        Self::Polyline {
            vertices: polyline.vertices.iter().map(|v| [v.x, v.y, v.bulge]).collect(),
            closed: polyline.closed,
        }
    }
}

/// One recorded intersection point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub point: [f64; 2],
    pub t_a: f64,
    pub t_b: f64,
    #[serde(default)]
    pub tangent: bool,
}

impl From<IntersectionPoint> for PointRecord {
    fn from(p: IntersectionPoint) -> Self {
        Self {
            point: coords(&p.point),
            t_a: p.t_a,
            t_b: p.t_b,
            tangent: p.tangent,
        }
    }
}

impl PointRecord {
    fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        tol.points_coincide(&point(self.point), &point(other.point))
            && tol.is_close(self.t_a, other.t_a)
            && tol.is_close(self.t_b, other.t_b)
            && self.tangent == other.tangent
    }
}

/// A kernel call to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Intersect {
        a: Shape,
        b: Shape,
    },
    Trim {
        entity: Shape,
        boundary: Shape,
        end: Endpoint,
    },
    Extend {
        entity: Shape,
        boundary: Shape,
        end: Endpoint,
    },
    Fillet {
        a: Shape,
        b: Shape,
        radius: f64,
    },
    Offset {
        entity: Shape,
        distance: f64,
        side: Side,
    },
}

impl Operation {
    /// Runs the call against the kernel. Errors become
    /// [`Outcome::Failure`], so every call has an outcome.
    #[must_use]
    pub fn run(&self, tol: &Tolerance) -> Outcome {
        self.try_run(tol).unwrap_or_else(|err| Outcome::Failure { error: err.kind() })
    }

    fn try_run(&self, tol: &Tolerance) -> Result<Outcome> {
        let outcome = match self {
            Self::Intersect { a, b } => match intersect(&a.to_entity(tol)?, &b.to_entity(tol)?, tol) {
                Intersection::Points(points) => Outcome::Points {
                    points: points.map(PointRecord::from).collect(),
                },
                Intersection::Coincident => Outcome::Coincident,
            },
            Self::Trim { entity, boundary, end } => {
                let curve = Trim::new(entity.to_curve(tol)?, boundary.to_entity(tol)?, *end)
                    .with_tolerance(*tol)
                    .execute()?;
                Outcome::Shape {
                    shape: Shape::from(&curve),
                }
            }
            Self::Extend { entity, boundary, end } => {
                let curve = Extend::new(entity.to_curve(tol)?, boundary.to_entity(tol)?, *end)
                    .with_tolerance(*tol)
                    .execute()?;
                Outcome::Shape {
                    shape: Shape::from(&curve),
                }
            }
            Self::Fillet { a, b, radius } => {
                let result = Fillet::new(a.to_curve(tol)?, b.to_curve(tol)?, *radius)
                    .with_tolerance(*tol)
                    .execute()?;
                Outcome::Fillet {
                    arc: Shape::from(&Entity::Arc(result.arc)),
                    trimmed_a: result.trimmed_a.as_ref().map(Shape::from),
                    trimmed_b: result.trimmed_b.as_ref().map(Shape::from),
                }
            }
            Self::Offset { entity, distance, side } => {
                let shape = if let Some(polyline) = entity.to_polyline() {
                    let out = PolylineOffset2D::new(polyline, *distance, *side)
                        .with_tolerance(*tol)
                        .execute()?;
                    Shape::from(&out)
                } else {
                    let out = CurveOffset2D::new(entity.to_entity(tol)?, *distance, *side)
                        .with_tolerance(*tol)
                        .execute()?;
                    Shape::from(&out)
                };
                Outcome::Shape { shape }
            }
        };
        Ok(outcome)
    }
}

/// Recorded result of an [`Operation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Points {
        points: Vec<PointRecord>,
    },
    Coincident,
    Shape {
        shape: Shape,
    },
    Fillet {
        arc: Shape,
        trimmed_a: Option<Shape>,
        trimmed_b: Option<Shape>,
    },
    Failure {
        error: ErrorKind,
    },
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Points { .. } => "points",
            Self::Coincident => "coincident",
            Self::Shape { .. } => "shape",
            Self::Fillet { .. } => "fillet",
            Self::Failure { .. } => "failure",
        }
    }
}

/// A named call with its expected outcome.
///
/// Cases are plain serde data, so a corpus can be kept as JSON and replayed
/// with [`check_corpus`]. Geometry is compared within the [`Tolerance`]
/// passed in, failures by [`ErrorKind`] only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenCase {
    pub name: String,
    pub operation: Operation,
    pub expected: Outcome,
}

/// Why an outcome does not match its golden record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParityMismatch {
    #[error("expected a {expected} outcome, got {actual}")]
    OutcomeKind {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("expected {expected} intersection points, got {actual}")]
    PointCount { expected: usize, actual: usize },

    #[error("intersection point {index} differs: expected {expected:?}, got {actual:?}")]
    Point {
        index: usize,
        expected: PointRecord,
        actual: PointRecord,
    },

    #[error("{what} differs: expected {expected:?}, got {actual:?}")]
    Shape {
        what: &'static str,
        expected: Option<Shape>,
        actual: Option<Shape>,
    },

    #[error("expected failure {expected:?}, got {actual:?}")]
    Failure { expected: ErrorKind, actual: ErrorKind },

    #[error("case `{case}`: {source}")]
    Case {
        case: String,
        #[source]
        source: Box<ParityMismatch>,
    },
}

fn compare_shapes(
    what: &'static str,
    expected: Option<&Shape>,
    actual: Option<&Shape>,
    tol: &Tolerance,
) -> std::result::Result<(), ParityMismatch> {
    let matches = match (expected, actual) {
        (Some(e), Some(a)) => e.approx_eq(a, tol),
        (None, None) => true,
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(ParityMismatch::Shape {
            what,
            expected: expected.cloned(),
            actual: actual.cloned(),
        })
    }
}

/// Compares an outcome against its golden record.
///
/// # Errors
///
/// Returns the first difference found.
pub fn compare(expected: &Outcome, actual: &Outcome, tol: &Tolerance) -> std::result::Result<(), ParityMismatch> {
    match (expected, actual) {
        (Outcome::Points { points: e }, Outcome::Points { points: a }) => {
            if e.len() != a.len() {
                return Err(ParityMismatch::PointCount {
                    expected: e.len(),
                    actual: a.len(),
                });
            }
            for (index, (ep, ap)) in e.iter().zip(a).enumerate() {
                if !ep.approx_eq(ap, tol) {
                    return Err(ParityMismatch::Point {
                        index,
                        expected: *ep,
                        actual: *ap,
                    });
                }
            }
            Ok(())
        }
        (Outcome::Coincident, Outcome::Coincident) => Ok(()),
        (Outcome::Shape { shape: e }, Outcome::Shape { shape: a }) => compare_shapes("shape", Some(e), Some(a), tol),
        (
            Outcome::Fillet {
                arc: ea,
                trimmed_a: eta,
                trimmed_b: etb,
            },
            Outcome::Fillet {
                arc: aa,
                trimmed_a: ata,
                trimmed_b: atb,
            },
        ) => {
            compare_shapes("fillet arc", Some(ea), Some(aa), tol)?;
            compare_shapes("trimmed a", eta.as_ref(), ata.as_ref(), tol)?;
            compare_shapes("trimmed b", etb.as_ref(), atb.as_ref(), tol)
        }
        (Outcome::Failure { error: e }, Outcome::Failure { error: a }) => {
            if e == a {
                Ok(())
            } else {
                Err(ParityMismatch::Failure {
                    expected: *e,
                    actual: *a,
                })
            }
        }
        _ => Err(ParityMismatch::OutcomeKind {
            expected: expected.label(),
            actual: actual.label(),
        }),
    }
}

/// Replays every case and collects the mismatches, tagged with case names.
#[must_use]
pub fn check_corpus(cases: &[GoldenCase], tol: &Tolerance) -> Vec<ParityMismatch> {
    cases
        .iter()
        .filter_map(|case| {
            let actual = case.operation.run(tol);
            compare(&case.expected, &actual, tol)
                .err()
                .map(|mismatch| ParityMismatch::Case {
                    case: case.name.clone(),
                    source: Box::new(mismatch),
                })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(a: [f64; 2], b: [f64; 2]) -> Shape {
        Shape::Line { a, b }
    }

    #[test]
    fn trim_case_matches_recorded_shape() {
        let tol = Tolerance::default();
        let op = Operation::Trim {
            entity: line([0.0, 0.0], [10.0, 0.0]),
            boundary: Shape::Circle {
                center: [5.0, 0.0],
                radius: 2.0,
            },
            end: Endpoint::End,
        };
        let expected = Outcome::Shape {
            shape: line([0.0, 0.0], [7.0, 0.0]),
        };
        assert_eq!(compare(&expected, &op.run(&tol), &tol), Ok(()));
    }

    #[test]
    fn failures_compare_by_kind() {
        let tol = Tolerance::default();
        let op = Operation::Fillet {
            a: line([0.0, 0.0], [10.0, 0.0]),
            b: line([0.0, 10.0], [10.0, 10.0]),
            radius: 4.0,
        };
        let actual = op.run(&tol);
        assert_eq!(
            actual,
            Outcome::Failure {
                error: ErrorKind::NoSolution
            }
        );
        let wrong = Outcome::Failure {
            error: ErrorKind::Coincident,
        };
        assert!(matches!(
            compare(&wrong, &actual, &tol),
            Err(ParityMismatch::Failure { .. })
        ));
    }

    #[test]
    fn arcs_compare_modulo_full_turns() {
        let tol = Tolerance::default();
        let a = Shape::Arc {
            center: [0.0, 0.0],
            radius: 1.0,
            start_angle: -1.0,
            span_angle: 0.5,
        };
        let b = Shape::Arc {
            center: [0.0, 0.0],
            radius: 1.0,
            start_angle: std::f64::consts::TAU - 1.0,
            span_angle: 0.5,
        };
        assert!(a.approx_eq(&b, &tol));
    }

    #[test]
    fn mismatched_outcome_kinds() {
        let tol = Tolerance::default();
        let err = compare(&Outcome::Coincident, &Outcome::Points { points: vec![] }, &tol).unwrap_err();
        assert_eq!(err.to_string(), "expected a coincident outcome, got points");
    }

    #[test]
    fn case_json_round_trip() {
        let case = GoldenCase {
            name: "tangent circles".into(),
            operation: Operation::Intersect {
                a: Shape::Circle {
                    center: [0.0, 0.0],
                    radius: 3.0,
                },
                b: Shape::Circle {
                    center: [5.0, 0.0],
                    radius: 2.0,
                },
            },
            expected: Outcome::Points {
                points: vec![PointRecord {
                    point: [3.0, 0.0],
                    t_a: 0.0,
                    t_b: 0.5,
                    tangent: true,
                }],
            },
        };
        let json = serde_json::to_string(&case).unwrap();
        assert!(json.contains(r#""op":"intersect""#));
        assert!(json.contains(r#""type":"circle""#));
        let back: GoldenCase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, case);
        assert!(check_corpus(&[case], &Tolerance::default()).is_empty());
    }

    #[test]
    fn corpus_reports_case_names() {
        let case = GoldenCase {
            name: "wrong count".into(),
            operation: Operation::Intersect {
                a: line([0.0, 0.0], [2.0, 2.0]),
                b: line([0.0, 2.0], [2.0, 0.0]),
            },
            expected: Outcome::Points { points: vec![] },
        };
        let mismatches = check_corpus(&[case], &Tolerance::default());
        assert_eq!(mismatches.len(), 1);
        assert!(mismatches[0].to_string().starts_with("case `wrong count`"));
    }
}
