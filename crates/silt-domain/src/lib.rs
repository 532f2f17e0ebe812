//! Periodic domain management for the silt workspace.
//!
//! [`DomainBox`] wraps particle positions into a periodic box and
//! derives read-only ghost images for particles near periodic
//! boundaries. [`SourceIndex`] is the uniform cell list built over the
//! real and ghost positions of one collection; equations query it for
//! neighbors within the kernel support radius. [`DomainManager`] ties
//! both together and refreshes them once per integrator stage, before
//! any pipeline group runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod index;
pub mod manager;

pub use domain::{DomainBox, GhostLayer};
pub use error::DomainError;
pub use index::{Neighbor, SourceIndex};
pub use manager::DomainManager;
