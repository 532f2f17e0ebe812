//! The transport-velocity predict/correct integrator.

use crate::error::SolverError;
use silt_particles::{ParticleCollection, ParticleSystem};
use std::fmt;

/// Integrator state machine.
///
/// `predict` requires `Corrected`, `correct` requires `Evaluated`; the
/// solver reports the acceleration evaluation via
/// [`TransportVelocityStep::mark_evaluated`], so a correct without a
/// fresh evaluation cannot happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Between steps; saved state discarded.
    Corrected,
    /// Mid-step; positions and velocities hold half-step values and the
    /// pre-step originals are saved.
    Predicted,
    /// Mid-step with accelerations evaluated at the half-step state.
    Evaluated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrected => write!(f, "corrected"),
            Self::Predicted => write!(f, "predicted"),
            Self::Evaluated => write!(f, "evaluated"),
        }
    }
}

/// Midpoint integrator for the transport-velocity scheme.
///
/// One acceleration evaluation per step. `predict` saves the pre-step
/// state and advances the fluid a half step on the previous
/// accelerations; after the pipeline evaluates at the half-step
/// positions, `correct` advances a full step from the saved originals
/// on the fresh accelerations. Positions move with the advection
/// velocity `uhat`; the momentum velocity `u` feeds the physics.
///
/// Wall collections never move; the integrator touches only the fluid.
#[derive(Debug)]
pub struct TransportVelocityStep {
    fluid: String,
    phase: Phase,
    x0: Vec<f64>,
    y0: Vec<f64>,
    u0: Vec<f64>,
    v0: Vec<f64>,
}

impl TransportVelocityStep {
    /// Integrator for the named fluid collection.
    pub fn new(fluid: impl Into<String>) -> Self {
        Self {
            fluid: fluid.into(),
            phase: Phase::Corrected,
            x0: Vec::new(),
            y0: Vec::new(),
            u0: Vec::new(),
            v0: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Half-step advance on the previous accelerations.
    ///
    /// Saves the pre-step positions and velocities, then sets
    /// `u += dt/2 · au`, `uhat = u + dt/2 · auhat`, and
    /// `x += dt/2 · uhat` (likewise along y).
    pub fn predict(&mut self, system: &mut ParticleSystem, dt: f64) -> Result<(), SolverError> {
        self.require(Phase::Corrected)?;
        let fluid = system.collection_mut(&self.fluid)?;
        let half = 0.5 * dt;

        self.x0 = fluid.scalar("x")?.to_vec();
        self.y0 = fluid.scalar("y")?.to_vec();
        self.u0 = fluid.scalar("u")?.to_vec();
        self.v0 = fluid.scalar("v")?.to_vec();

        let (u, uhat, x) = Self::axis(fluid, &self.u0, &self.x0, "au", "auhat", half)?;
        let (v, vhat, y) = Self::axis(fluid, &self.v0, &self.y0, "av", "avhat", half)?;
        fluid.set_scalar("u", &u)?;
        fluid.set_scalar("uhat", &uhat)?;
        fluid.set_scalar("x", &x)?;
        fluid.set_scalar("v", &v)?;
        fluid.set_scalar("vhat", &vhat)?;
        fluid.set_scalar("y", &y)?;

        self.phase = Phase::Predicted;
        Ok(())
    }

    /// Record that the pipeline has evaluated at the half-step state.
    pub fn mark_evaluated(&mut self) -> Result<(), SolverError> {
        self.require(Phase::Predicted)?;
        self.phase = Phase::Evaluated;
        Ok(())
    }

    /// Full-step advance from the saved originals on the fresh
    /// accelerations.
    ///
    /// `u = u0 + dt · au` and `x = x0 + dt · uhat`, with `uhat` still
    /// holding the half-step advection velocity. Updates `vmag2` and
    /// discards the saved state.
    pub fn correct(&mut self, system: &mut ParticleSystem, dt: f64) -> Result<(), SolverError> {
        self.require(Phase::Evaluated)?;
        let fluid = system.collection_mut(&self.fluid)?;

        let au = fluid.scalar("au")?.to_vec();
        let av = fluid.scalar("av")?.to_vec();
        let uhat = fluid.scalar("uhat")?.to_vec();
        let vhat = fluid.scalar("vhat")?.to_vec();

        let full = |base: &[f64], rate: &[f64]| -> Vec<f64> {
            base.iter().zip(rate).map(|(&b, &r)| b + dt * r).collect()
        };
        let u = full(&self.u0, &au);
        let v = full(&self.v0, &av);
        let x = full(&self.x0, &uhat);
        let y = full(&self.y0, &vhat);
        let vmag2: Vec<f64> = u.iter().zip(&v).map(|(&u, &v)| u * u + v * v).collect();

        fluid.set_scalar("u", &u)?;
        fluid.set_scalar("v", &v)?;
        fluid.set_scalar("x", &x)?;
        fluid.set_scalar("y", &y)?;
        fluid.set_scalar("vmag2", &vmag2)?;

        self.x0.clear();
        self.y0.clear();
        self.u0.clear();
        self.v0.clear();
        self.phase = Phase::Corrected;
        Ok(())
    }

    /// One axis of the predict stage: returns the new velocity,
    /// advection velocity, and position.
    fn axis(
        fluid: &ParticleCollection,
        vel0: &[f64],
        pos0: &[f64],
        accel: &str,
        accel_hat: &str,
        half: f64,
    ) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), SolverError> {
        let a = fluid.scalar(accel)?;
        let ahat = fluid.scalar(accel_hat)?;
        let vel: Vec<f64> = vel0.iter().zip(a).map(|(&v, &a)| v + half * a).collect();
        let vel_hat: Vec<f64> = vel.iter().zip(ahat).map(|(&v, &a)| v + half * a).collect();
        let pos: Vec<f64> = pos0
            .iter()
            .zip(&vel_hat)
            .map(|(&p, &v)| p + half * v)
            .collect();
        Ok((vel, vel_hat, pos))
    }

    fn require(&self, expected: Phase) -> Result<(), SolverError> {
        if self.phase != expected {
            return Err(SolverError::PhaseOrder {
                actual: self.phase,
                expected,
            });
        }
        Ok(())
    }
}
