//! Time stepping for the silt workspace: the transport-velocity
//! predict/correct integrator, the fixed stable time step, and the
//! outer solver loop tying system, domain, and pipeline together.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod integrator;
pub mod solver;
pub mod timestep;

pub use error::SolverError;
pub use integrator::{Phase, TransportVelocityStep};
pub use solver::{OutputHook, Solver};
pub use timestep::TimestepBounds;
