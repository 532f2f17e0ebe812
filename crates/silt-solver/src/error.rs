//! Error type for the solver loop.

use crate::integrator::Phase;
use silt_core::{ConfigError, SchemaError};
use silt_domain::DomainError;
use silt_sph::{EvaluateError, PipelineError};
use std::error::Error;
use std::fmt;

/// Errors from solver construction and time stepping.
#[derive(Debug)]
pub enum SolverError {
    /// The flow configuration failed validation.
    Config(ConfigError),
    /// The pipeline failed to compile.
    Pipeline(PipelineError),
    /// A domain refresh failed.
    Domain(DomainError),
    /// An acceleration evaluation failed.
    Evaluate(EvaluateError),
    /// An integrator or scan access touched an undeclared property.
    Schema(SchemaError),
    /// The divergence scan found a non-finite value at a step boundary.
    ///
    /// The explicit scheme has no recovery path; the run is over and
    /// the offending particle is named for diagnosis.
    NonFinite {
        /// Collection carrying the bad value.
        collection: String,
        /// Property carrying the bad value.
        property: String,
        /// Index of the first offending particle.
        index: usize,
        /// Simulation time of the failed step.
        time: f64,
    },
    /// An integrator stage was invoked out of order.
    PhaseOrder {
        /// Phase the integrator was in.
        actual: Phase,
        /// Phase the stage requires.
        expected: Phase,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Pipeline(e) => write!(f, "pipeline: {e}"),
            Self::Domain(e) => write!(f, "domain: {e}"),
            Self::Evaluate(e) => write!(f, "evaluate: {e}"),
            Self::Schema(e) => write!(f, "schema: {e}"),
            Self::NonFinite {
                collection,
                property,
                index,
                time,
            } => {
                write!(
                    f,
                    "simulation diverged at t = {time}: non-finite '{property}' \
                     on '{collection}' at particle {index}"
                )
            }
            Self::PhaseOrder { actual, expected } => {
                write!(
                    f,
                    "integrator stage out of order: in phase '{actual}', \
                     stage requires '{expected}'"
                )
            }
        }
    }
}

impl Error for SolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Pipeline(e) => Some(e),
            Self::Domain(e) => Some(e),
            Self::Evaluate(e) => Some(e),
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SolverError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PipelineError> for SolverError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

impl From<DomainError> for SolverError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

impl From<EvaluateError> for SolverError {
    fn from(e: EvaluateError) -> Self {
        Self::Evaluate(e)
    }
}

impl From<SchemaError> for SolverError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}
