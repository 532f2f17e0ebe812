//! Stable time-step bounds for the explicit scheme.

use silt_core::FlowConfig;

/// The three stability limits of the weakly-compressible explicit
/// scheme, evaluated once at setup.
///
/// The step is fixed for the whole run: the reference quantities bound
/// the dynamics, so the limits never tighten mid-run. A flow that
/// substantially exceeds `u_ref` violates that premise and shows up in
/// the divergence scan instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimestepBounds {
    /// Acoustic limit, `0.25 · h / (c0 + u_ref)`.
    pub cfl: f64,
    /// Viscous diffusion limit, `0.125 · h² / nu`.
    pub viscous: f64,
    /// Body-force limit, `0.25 · √(h / |f|)`; absent without a force.
    pub force: Option<f64>,
}

impl TimestepBounds {
    /// Evaluate the limits for a configuration.
    pub fn from_config(config: &FlowConfig) -> Self {
        let h = config.h();
        let force_mag = config.body_force_mag();
        Self {
            cfl: 0.25 * h / (config.c0 + config.u_ref),
            viscous: 0.125 * h * h / config.nu,
            force: (force_mag > 0.0).then(|| 0.25 * (h / force_mag).sqrt()),
        }
    }

    /// The fixed step: half the tightest limit.
    pub fn dt(&self) -> f64 {
        let mut tightest = self.cfl.min(self.viscous);
        if let Some(force) = self.force {
            tightest = tightest.min(force);
        }
        0.5 * tightest
    }
}
