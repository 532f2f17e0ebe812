//! Core types for the silt SPH workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the shared error taxonomy, the smoothing-kernel trait with the
//! quintic-spline reference kernel, and the immutable physical
//! configuration record passed to every other subsystem at setup.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod kernel;

pub use config::{ConfigError, FlowConfig};
pub use error::{EquationError, SchemaError};
pub use kernel::{Kernel, QuinticSpline};
