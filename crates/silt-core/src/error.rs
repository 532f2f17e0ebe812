//! Shared error types for the silt workspace.
//!
//! Two layers: [`SchemaError`] covers configuration mistakes caught at
//! setup (undeclared properties, bad partitions), [`EquationError`]
//! covers failures raised while an equation executes. Higher-level
//! errors in `silt-sph` and `silt-solver` wrap these via `From`.

use std::error::Error;
use std::fmt;

/// Errors from particle-collection schema access and mutation.
///
/// All variants are configuration errors: they indicate a mistake in
/// how the simulation was set up, not a transient runtime condition,
/// and are fatal before any time step executes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// A property was read or written before being declared.
    UndeclaredProperty {
        /// Collection on which the access was attempted.
        collection: String,
        /// The missing property name.
        property: String,
    },
    /// A property was declared twice on the same collection.
    DuplicateProperty {
        /// Collection carrying the duplicate.
        collection: String,
        /// The property name declared twice.
        property: String,
    },
    /// A property declaration was attempted after the schema was sealed.
    ///
    /// Schemas are sealed when the builder finishes; the full property
    /// set must be known before the time loop starts.
    SchemaSealed {
        /// Collection whose schema is sealed.
        collection: String,
        /// The property that arrived too late.
        property: String,
    },
    /// A property array's length diverged from the particle count.
    LengthMismatch {
        /// Collection carrying the bad array.
        collection: String,
        /// The offending property.
        property: String,
        /// Particle count of the collection.
        expected: usize,
        /// Actual array length supplied.
        actual: usize,
    },
    /// A partition produced an empty result where the caller requires
    /// at least one particle.
    EmptyPartition {
        /// Collection that came out empty.
        collection: String,
    },
    /// A named collection does not exist in the particle system.
    UnknownCollection {
        /// The missing collection name.
        name: String,
    },
    /// Two collections with differing schemas were merged.
    IncompatibleSchema {
        /// The collection being extended.
        left: String,
        /// The collection supplying particles.
        right: String,
    },
    /// A particle index was outside the collection.
    IndexOutOfRange {
        /// Collection on which the access was attempted.
        collection: String,
        /// The offending index.
        index: usize,
        /// Particle count of the collection.
        len: usize,
    },
    /// Two collections with the same name were registered.
    DuplicateCollection {
        /// The contested name.
        name: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeclaredProperty {
                collection,
                property,
            } => {
                write!(f, "property '{property}' not declared on '{collection}'")
            }
            Self::DuplicateProperty {
                collection,
                property,
            } => {
                write!(f, "property '{property}' declared twice on '{collection}'")
            }
            Self::SchemaSealed {
                collection,
                property,
            } => {
                write!(
                    f,
                    "schema of '{collection}' is sealed; cannot declare '{property}'"
                )
            }
            Self::LengthMismatch {
                collection,
                property,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "property '{property}' on '{collection}' has length {actual}, \
                     expected {expected}"
                )
            }
            Self::EmptyPartition { collection } => {
                write!(f, "partition left '{collection}' empty")
            }
            Self::UnknownCollection { name } => {
                write!(f, "no collection named '{name}'")
            }
            Self::IncompatibleSchema { left, right } => {
                write!(f, "schemas of '{left}' and '{right}' do not match")
            }
            Self::IndexOutOfRange {
                collection,
                index,
                len,
            } => {
                write!(
                    f,
                    "index {index} out of range for '{collection}' with {len} particles"
                )
            }
            Self::DuplicateCollection { name } => {
                write!(f, "collection '{name}' already registered")
            }
        }
    }
}

impl Error for SchemaError {}

/// Errors raised during equation execution.
///
/// Wrapped by the pipeline into its own error type with the offending
/// equation and group identified.
#[derive(Clone, Debug, PartialEq)]
pub enum EquationError {
    /// The equation's compute function failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A non-finite value was produced or detected.
    ///
    /// The explicit weakly-compressible scheme has no recovery path for
    /// divergence, so this is terminal for the run.
    NonFinite {
        /// The property containing the non-finite value.
        property: String,
        /// Index of the first offending particle.
        index: usize,
    },
}

impl fmt::Display for EquationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::NonFinite { property, index } => {
                write!(
                    f,
                    "non-finite value in property '{property}' at particle {index}"
                )
            }
        }
    }
}

impl Error for EquationError {}
