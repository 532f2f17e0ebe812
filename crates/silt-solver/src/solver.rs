//! The outer time loop.

use crate::error::SolverError;
use crate::integrator::TransportVelocityStep;
use crate::timestep::TimestepBounds;
use silt_core::FlowConfig;
use silt_domain::DomainManager;
use silt_particles::ParticleSystem;
use silt_sph::{CompiledPipeline, Pipeline};

/// Properties scanned for divergence at every step boundary.
const SCANNED: [&str; 8] = ["x", "y", "u", "v", "rho", "p", "au", "av"];

/// Hook invoked after selected steps with the step count, time, and
/// the current particle state.
pub type OutputHook = Box<dyn FnMut(u64, f64, &ParticleSystem)>;

/// Owns the particle system, domain, pipeline, and integrator, and
/// advances them together.
///
/// One step is: predict on the previous accelerations, refresh the
/// domain at the half-step positions, evaluate the pipeline there, scan
/// for divergence, then correct from the saved pre-step state. The
/// first step is preceded by a bootstrap evaluation so the very first
/// predict has accelerations to work from.
pub struct Solver {
    system: ParticleSystem,
    domain: DomainManager,
    pipeline: CompiledPipeline,
    integrator: TransportVelocityStep,
    dt: f64,
    tf: f64,
    t: f64,
    steps: u64,
    bootstrapped: bool,
    output: Option<(u64, OutputHook)>,
}

impl Solver {
    /// Compile the pipeline and fix the time step.
    ///
    /// The step comes from [`TimestepBounds`]; it never changes
    /// mid-run.
    pub fn new(
        config: &FlowConfig,
        system: ParticleSystem,
        domain: DomainManager,
        pipeline: Pipeline,
        fluid: &str,
    ) -> Result<Self, SolverError> {
        config.validate()?;
        system.collection(fluid)?.require_non_empty()?;
        let dt = TimestepBounds::from_config(config).dt();
        if !dt.is_finite() || dt <= 0.0 {
            return Err(silt_core::ConfigError::NotPositive {
                parameter: "dt",
                value: dt,
            }
            .into());
        }
        let pipeline = pipeline.compile(&system, &domain)?;
        Ok(Self {
            system,
            domain,
            pipeline,
            integrator: TransportVelocityStep::new(fluid),
            dt,
            tf: config.tf,
            t: 0.0,
            steps: 0,
            bootstrapped: false,
            output: None,
        })
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// The fixed time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The particle system.
    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    /// Install an output hook firing every `every` completed steps.
    pub fn on_output(&mut self, every: u64, hook: OutputHook) {
        self.output = Some((every.max(1), hook));
    }

    /// Advance one step.
    pub fn step(&mut self) -> Result<(), SolverError> {
        if !self.bootstrapped {
            self.evaluate(self.t)?;
            self.scan()?;
            self.bootstrapped = true;
        }

        self.integrator.predict(&mut self.system, self.dt)?;
        self.evaluate(self.t + 0.5 * self.dt)?;
        self.integrator.mark_evaluated()?;
        self.scan()?;
        self.integrator.correct(&mut self.system, self.dt)?;

        self.t += self.dt;
        self.steps += 1;
        if let Some((every, hook)) = &mut self.output {
            if self.steps % *every == 0 {
                hook(self.steps, self.t, &self.system);
            }
        }
        Ok(())
    }

    /// Step until the configured termination time.
    pub fn run(&mut self) -> Result<(), SolverError> {
        self.run_until(self.tf)
    }

    /// Step until the accumulated time reaches `t_end`.
    pub fn run_until(&mut self, t_end: f64) -> Result<(), SolverError> {
        while self.t < t_end {
            self.step()?;
        }
        Ok(())
    }

    fn evaluate(&mut self, time: f64) -> Result<(), SolverError> {
        self.domain.update(&mut self.system)?;
        self.pipeline.run(&mut self.system, &self.domain, time)?;
        Ok(())
    }

    /// Fail on the first non-finite value in any scanned property.
    fn scan(&self) -> Result<(), SolverError> {
        for collection in self.system.iter() {
            for property in SCANNED {
                if !collection.has_property(property) {
                    continue;
                }
                for (index, &value) in collection.scalar(property)?.iter().enumerate() {
                    if !value.is_finite() {
                        return Err(SolverError::NonFinite {
                            collection: collection.name().to_string(),
                            property: property.to_string(),
                            index,
                            time: self.t,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
