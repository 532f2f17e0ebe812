//! Weakly-compressible equation of state.

use crate::equation::{Equation, WriteMode};
use crate::scope::EquationScope;
use silt_core::EquationError;

/// Linear background-pressure state equation,
/// `p = p0 · (rho / rho0 − b)`.
///
/// With `b = 1` the pressure crosses zero exactly at the rest density;
/// compressed particles push, rarefied particles pull. Per-particle
/// only, no neighbor access.
pub struct StateEquation {
    dest: String,
    sources: Vec<String>,
    p0: f64,
    rho0: f64,
    b: f64,
}

impl StateEquation {
    /// State equation on `dest` with reference pressure `p0`, rest
    /// density `rho0`, and offset `b`.
    pub fn new(dest: impl Into<String>, p0: f64, rho0: f64, b: f64) -> Self {
        Self {
            dest: dest.into(),
            sources: Vec::new(),
            p0,
            rho0,
            b,
        }
    }
}

impl Equation for StateEquation {
    fn name(&self) -> &str {
        "state-equation"
    }

    fn dest(&self) -> &str {
        &self.dest
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn reads_dest(&self) -> &'static [&'static str] {
        &["rho"]
    }

    fn writes(&self) -> &'static [(&'static str, WriteMode)] {
        &[("p", WriteMode::Assign)]
    }

    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError> {
        let rho = scope.read_dest("rho")?;
        let p: Vec<f64> = rho
            .iter()
            .map(|&r| self.p0 * (r / self.rho0 - self.b))
            .collect();
        scope.assign("p", &p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::{Group, Locality, Stage};
    use crate::pipeline::Pipeline;
    use crate::suite::fluid_schema;
    use silt_core::QuinticSpline;
    use silt_domain::{DomainBox, DomainManager};
    use silt_particles::ParticleSystem;

    #[test]
    fn zero_crossing_at_rest_density() {
        let mut fluid = fluid_schema("fluid").build(3).unwrap();
        fluid.set_scalar("x", &[0.2, 0.5, 0.8]).unwrap();
        fluid.fill("y", 0.5).unwrap();
        fluid.fill("h", 0.1).unwrap();
        fluid
            .set_scalar("rho", &[1000.0, 1100.0, 900.0])
            .unwrap();
        let mut sys = ParticleSystem::new();
        sys.add(fluid).unwrap();

        let boxx = DomainBox::new(0.0, 1.0, 0.0, 1.0, false, false, 0.3).unwrap();
        let mut domain = DomainManager::new(boxx, &QuinticSpline, 0.1).unwrap();
        domain.update(&mut sys).unwrap();

        let mut pipeline = Pipeline::new(Box::new(QuinticSpline));
        pipeline.push(
            Group::new(Stage::StateAndExtrapolation, Locality::Local)
                .with(Box::new(StateEquation::new("fluid", 0.25, 1000.0, 1.0))),
        );
        let compiled = pipeline.compile(&sys, &domain).unwrap();
        compiled.run(&mut sys, &domain, 0.0).unwrap();

        let p = sys.collection("fluid").unwrap().scalar("p").unwrap();
        // With b = 1 the pressure crosses zero exactly at the rest
        // density; compressed particles push, rarefied particles pull.
        assert_eq!(p[0], 0.0);
        assert!(p[1] > 0.0);
        assert!(p[2] < 0.0);
    }
}
