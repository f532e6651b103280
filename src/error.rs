use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for the drafting kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised while constructing or validating primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised by the intersect, trim/extend, fillet and offset engines.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no intersection in range")]
    NoIntersectionInRange,

    #[error("no valid fillet center")]
    NoValidCenter,

    #[error("fillet radius {radius} exceeds the available tangent length")]
    InfeasibleRadius { radius: f64 },

    #[error("coincident geometry: {0}")]
    Coincident(String),

    #[error("unsupported entity combination: {0}")]
    Unsupported(String),

    #[error("offset collapsed: {0}")]
    Collapsed(String),
}

/// Coarse failure classification shared by every engine.
///
/// Callers usually branch on this rather than on the concrete variant:
/// a [`ErrorKind::Coincident`] result can often be reported as
/// "already satisfied" while the other two are genuine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input violates a structural invariant (zero length, zero radius, ...).
    DegenerateInput,
    /// The inputs are valid but no geometric answer exists.
    NoSolution,
    /// The inputs overlap, so the answer is not a finite point set.
    Coincident,
}

impl KernelError {
    /// Classifies this error into the kernel's failure taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Geometry(_) => ErrorKind::DegenerateInput,
            Self::Operation(err) => match err {
                OperationError::InvalidInput(_) => ErrorKind::DegenerateInput,
                OperationError::NoIntersectionInRange
                | OperationError::NoValidCenter
                | OperationError::InfeasibleRadius { .. }
                | OperationError::Unsupported(_)
                | OperationError::Collapsed(_) => ErrorKind::NoSolution,
                OperationError::Coincident(_) => ErrorKind::Coincident,
            },
        }
    }
}

/// Convenience type alias for results using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_errors_are_degenerate_input() {
        let err: KernelError = GeometryError::ZeroVector.into();
        assert_eq!(err.kind(), ErrorKind::DegenerateInput);
        let err: KernelError = GeometryError::NonFinite("point").into();
        assert_eq!(err.kind(), ErrorKind::DegenerateInput);
    }

    #[test]
    fn coincident_is_its_own_kind() {
        let err: KernelError = OperationError::Coincident("collinear".into()).into();
        assert_eq!(err.kind(), ErrorKind::Coincident);
        let err: KernelError = OperationError::NoIntersectionInRange.into();
        assert_eq!(err.kind(), ErrorKind::NoSolution);
    }

    #[test]
    fn messages_are_transparent() {
        let err: KernelError = OperationError::InfeasibleRadius { radius: 2.5 }.into();
        assert_eq!(
            err.to_string(),
            "fillet radius 2.5 exceeds the available tangent length"
        );
    }
}
