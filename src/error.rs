//! Defines [`WkError`], representing all errors returned by this crate.

use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WkError {
    /// Malformed WKT, naming the token that was found and its character offset.
    #[error("Expected {expected} but found {found} (:{position})")]
    WktParse {
        expected: String,
        found: String,
        position: usize,
    },

    /// Malformed or truncated WKB.
    #[error("{0}")]
    WkbParse(String),

    /// Raised by a coordinate-capped formatter once its budget is spent.
    #[error("Too many coordinates")]
    MaxCoordinatesExceeded,

    /// A sequence of geometry events that can't be assembled into a geometry.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A writer was asked to force a dimension the source geometry doesn't carry.
    #[error("Can't include {0} values in a geometry for which {0} values are not defined")]
    IncludeUndefined(&'static str),

    /// WKB output needs every element count up front.
    #[error("Can't write WKB without a valid meta.size")]
    MissingSize,

    /// A provider or exporter was asked for a feature outside its range.
    #[error("Attempt to access index out of range: {0}")]
    IndexOutOfRange(String),

    /// [`Reader`](crate::io::Reader) was driven before a handler was bound.
    #[error("Unset handler in Reader::iterate_feature()")]
    HandlerUnset,

    /// A handler that already ran was initialized again.
    #[error("Can't re-use this handler")]
    HandlerReused,

    /// Incorrect geometry type was passed to an operation.
    #[error("Incorrect geometry type for operation: {0}")]
    IncorrectGeometryType(String),

    /// Invalid argument passed to a constructor or setter.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An interruption check requested the run to stop.
    #[error("Interrupted")]
    Interrupted,

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl WkError {
    /// Whether this error belongs to a single feature and may be offered to
    /// [`GeometryHandler::next_error`](crate::handler::GeometryHandler::next_error).
    ///
    /// Everything else is a usage error and aborts the run.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            WkError::WktParse { .. }
                | WkError::WkbParse(_)
                | WkError::MaxCoordinatesExceeded
                | WkError::InvalidGeometry(_)
        )
    }
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, WkError>;
