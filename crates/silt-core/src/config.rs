//! Physical flow configuration.
//!
//! [`FlowConfig`] is the immutable record of reference quantities built
//! once at setup and passed to the domain manager, equations, and
//! solver. It replaces module-level constants: there is no process-wide
//! mutable state anywhere in the workspace.

use std::error::Error;
use std::fmt;

/// Errors from [`FlowConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A quantity that must be finite and strictly positive is not.
    NotPositive {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A quantity that must be finite is not.
    NotFinite {
        /// Name of the offending parameter.
        parameter: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { parameter, value } => {
                write!(f, "{parameter} must be finite and positive, got {value}")
            }
            Self::NotFinite { parameter } => write!(f, "{parameter} must be finite"),
        }
    }
}

impl Error for ConfigError {}

/// Immutable physical configuration for a periodic-lattice flow run.
///
/// Reference quantities follow the weakly-compressible convention: the
/// reference pressure is derived as `p0 = c0² · rho0`, and the sound
/// speed `c0` is chosen as a multiple of the expected peak velocity
/// `u_ref` to bound density fluctuations.
#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// Domain extent along x (one lattice period).
    pub length: f64,
    /// Domain extent along y.
    pub height: f64,
    /// Reference (rest) density.
    pub rho0: f64,
    /// Artificial sound speed.
    pub c0: f64,
    /// Expected peak flow velocity, used for the acoustic step bound.
    pub u_ref: f64,
    /// Kinematic viscosity.
    pub nu: f64,
    /// Uniform body force, x component.
    pub fx: f64,
    /// Uniform body force, y component.
    pub fy: f64,
    /// Initial lattice spacing.
    pub dx: f64,
    /// Smoothing length as a multiple of `dx`.
    pub hdx: f64,
    /// Equation-of-state offset; `b = 1` gives zero pressure at `rho0`.
    pub b: f64,
    /// Obstacle radius for the lattice demo geometry.
    pub obstacle_radius: f64,
    /// Termination time for the solver loop.
    pub tf: f64,
}

impl FlowConfig {
    /// Smoothing length `h = hdx · dx`.
    pub fn h(&self) -> f64 {
        self.hdx * self.dx
    }

    /// Reference pressure `p0 = c0² · rho0`.
    pub fn p0(&self) -> f64 {
        self.c0 * self.c0 * self.rho0
    }

    /// Magnitude of the body force vector.
    pub fn body_force_mag(&self) -> f64 {
        (self.fx * self.fx + self.fy * self.fy).sqrt()
    }

    /// Check every reference quantity once, before any setup proceeds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("length", self.length),
            ("height", self.height),
            ("rho0", self.rho0),
            ("c0", self.c0),
            ("nu", self.nu),
            ("dx", self.dx),
            ("hdx", self.hdx),
            ("tf", self.tf),
        ];
        for (parameter, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { parameter, value });
            }
        }
        let finite = [
            ("u_ref", self.u_ref),
            ("fx", self.fx),
            ("fy", self.fy),
            ("b", self.b),
            ("obstacle_radius", self.obstacle_radius),
        ];
        for (parameter, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { parameter });
            }
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    /// Reference values of the periodic-lattice benchmark at Re = 1.
    fn default() -> Self {
        let length = 0.1;
        let u_ref = 5e-5;
        let obstacle_radius = 0.02;
        Self {
            length,
            height: length,
            rho0: 1000.0,
            c0: 10.0 * u_ref,
            u_ref,
            nu: obstacle_radius * u_ref / 1.0,
            fx: 1.5e-7,
            fy: 0.0,
            dx: length / 100.0,
            hdx: 1.0,
            b: 1.0,
            obstacle_radius,
            tf: 1000.0,
        }
    }
}
