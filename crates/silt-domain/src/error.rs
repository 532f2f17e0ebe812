//! Error type for domain configuration and refresh.

use silt_core::SchemaError;
use std::error::Error;
use std::fmt;

/// Errors from domain construction and per-step refresh.
///
/// Every variant is fatal: a failed refresh means a broken setup
/// invariant, not a transient condition, and is never retried.
#[derive(Clone, Debug, PartialEq)]
pub enum DomainError {
    /// A box axis has `min >= max` or a non-finite bound.
    InvalidBounds {
        /// Axis name, `"x"` or `"y"`.
        axis: &'static str,
        /// Lower bound supplied.
        min: f64,
        /// Upper bound supplied.
        max: f64,
    },
    /// The ghost-layer width is non-finite or non-positive while a
    /// periodic axis is configured.
    InvalidGhostExtent {
        /// The rejected width.
        value: f64,
    },
    /// The ghost layer is thinner than the kernel support radius.
    ///
    /// Boundary interactions would silently lose neighbors; rejected
    /// at setup rather than guarded at runtime.
    GhostLayerTooThin {
        /// Configured ghost-layer width.
        ghost_extent: f64,
        /// Kernel support radius that must be covered.
        required: f64,
    },
    /// A periodic axis is narrower than twice the ghost layer.
    ///
    /// A single particle would need more than one image per side,
    /// which the one-period translation scheme does not produce.
    BoxTooNarrow {
        /// Axis name, `"x"` or `"y"`.
        axis: &'static str,
        /// Axis period.
        period: f64,
        /// Configured ghost-layer width.
        ghost_extent: f64,
    },
    /// A wrap or refresh touched an undeclared property.
    Schema(SchemaError),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { axis, min, max } => {
                write!(f, "invalid {axis} bounds [{min}, {max})")
            }
            Self::InvalidGhostExtent { value } => {
                write!(f, "ghost extent must be finite and positive, got {value}")
            }
            Self::GhostLayerTooThin {
                ghost_extent,
                required,
            } => {
                write!(
                    f,
                    "ghost extent {ghost_extent} is thinner than the kernel \
                     support radius {required}"
                )
            }
            Self::BoxTooNarrow {
                axis,
                period,
                ghost_extent,
            } => {
                write!(
                    f,
                    "{axis} period {period} is narrower than twice the ghost \
                     extent {ghost_extent}"
                )
            }
            Self::Schema(e) => write!(f, "schema: {e}"),
        }
    }
}

impl Error for DomainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for DomainError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}
