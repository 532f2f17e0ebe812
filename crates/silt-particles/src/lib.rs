//! Schema-first particle storage for the silt workspace.
//!
//! Particles live in named [`ParticleCollection`]s: parallel scalar
//! arrays keyed by property name, one value per particle. A collection's
//! full property set is declared once through [`CollectionBuilder`]
//! before the time loop starts; later declarations are rejected. The
//! [`ParticleSystem`] groups the collections of one simulation and
//! hands them to the pipeline and solver.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collection;
pub mod system;

pub use collection::{CollectionBuilder, ParticleCollection, STANDARD_PROPERTIES};
pub use system::ParticleSystem;
