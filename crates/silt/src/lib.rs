//! Silt: transport-velocity SPH simulation of viscous flow in periodic
//! domains.
//!
//! This is the top-level facade crate re-exporting the public API of
//! the silt sub-crates. For most users, adding `silt` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use silt::prelude::*;
//! use silt::sph::equations::SummationDensity;
//!
//! // Four fluid particles in a periodic unit box.
//! let mut fluid = fluid_schema("fluid").build(4).unwrap();
//! fluid.set_scalar("x", &[0.3, 0.7, 0.3, 0.7]).unwrap();
//! fluid.set_scalar("y", &[0.3, 0.3, 0.7, 0.7]).unwrap();
//! fluid.fill("m", 2.5).unwrap();
//! fluid.fill("h", 0.05).unwrap();
//! let mut system = ParticleSystem::new();
//! system.add(fluid).unwrap();
//!
//! // Wrap positions, build ghosts, and index neighbors.
//! let boxx = DomainBox::new(0.0, 1.0, 0.0, 1.0, true, true, 0.2).unwrap();
//! let mut domain = DomainManager::new(boxx, &QuinticSpline, 0.05).unwrap();
//! domain.update(&mut system).unwrap();
//!
//! // One-group pipeline: summation density over the fluid itself.
//! let mut pipeline = Pipeline::new(Box::new(QuinticSpline));
//! pipeline.push(
//!     Group::new(Stage::Density, Locality::WithRemote)
//!         .with(Box::new(SummationDensity::new("fluid", &["fluid"]))),
//! );
//! let compiled = pipeline.compile(&system, &domain).unwrap();
//! compiled.run(&mut system, &domain, 0.0).unwrap();
//!
//! let rho = system.collection("fluid").unwrap().scalar("rho").unwrap();
//! assert!(rho.iter().all(|&r| r > 0.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`base`] | `silt-core` | Flow configuration, kernels, shared errors |
//! | [`particles`] | `silt-particles` | Collections, schemas, the particle system |
//! | [`domain`] | `silt-domain` | Periodic box, ghost layers, neighbor indexes |
//! | [`sph`] | `silt-sph` | Equation groups, pipelines, the transport-velocity suite |
//! | [`solver`] | `silt-solver` | Integrator, time-step bounds, the solver loop |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Flow configuration, smoothing kernels, and shared errors
/// (`silt-core`).
pub use silt_core as base;

/// Particle collections and the particle system (`silt-particles`).
pub use silt_particles as particles;

/// Periodic domain management (`silt-domain`).
///
/// [`domain::DomainManager`] is the per-stage refresh entry point;
/// [`domain::DomainBox`] and [`domain::SourceIndex`] sit underneath.
pub use silt_domain as domain;

/// Equations, groups, and pipelines (`silt-sph`).
///
/// The [`sph::Equation`] trait is the main extension point for
/// user-defined physics; [`sph::suite`] holds the transport-velocity
/// equations and the standard four-group pipeline.
pub use silt_sph as sph;

/// Time stepping (`silt-solver`).
pub use silt_solver as solver;

/// Common imports for typical silt usage.
///
/// ```rust
/// use silt::prelude::*;
/// ```
pub mod prelude {
    // Configuration and kernels
    pub use silt_core::{FlowConfig, Kernel, QuinticSpline};

    // Errors
    pub use silt_core::{ConfigError, EquationError, SchemaError};

    // Particles
    pub use silt_particles::{CollectionBuilder, ParticleCollection, ParticleSystem};

    // Domain
    pub use silt_domain::{DomainBox, DomainManager, Neighbor};

    // Equations and pipelines
    pub use silt_sph::{
        fluid_schema, solid_schema, standard_pipeline, CompiledPipeline, Equation, EquationScope,
        Group, Locality, Pipeline, PipelineError, Stage, WriteMode,
    };

    // Time stepping
    pub use silt_solver::{Solver, SolverError, TimestepBounds, TransportVelocityStep};
}
