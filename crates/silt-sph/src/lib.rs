//! Equation groups and barrier-committed pipelines for the silt
//! workspace.
//!
//! An acceleration evaluation is a [`Pipeline`] of [`Group`]s in fixed
//! [`Stage`] order. Every equation in a group reads the state committed
//! before the group started and publishes into staging buffers; the
//! buffers commit together at the group barrier. Within a group, write
//! targets are either solely assigned or shared as associative sums
//! ([`WriteMode`]), so equation order inside a group never matters.
//!
//! [`suite::standard_pipeline`] assembles the transport-velocity suite
//! for a fluid flowing past a wall; the individual equations live in
//! [`equations`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod equation;
pub mod equations;
pub mod pipeline;
pub mod scope;
pub mod suite;

pub use equation::{Equation, Group, Locality, Stage, WriteMode};
pub use pipeline::{CompiledPipeline, EvaluateError, Pipeline, PipelineError};
pub use scope::EquationScope;
pub use suite::{fluid_schema, solid_schema, standard_pipeline};
