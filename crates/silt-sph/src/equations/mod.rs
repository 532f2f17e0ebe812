//! The transport-velocity equation suite.
//!
//! Summation density, the weakly-compressible state equation, the
//! generalized wall boundary conditions, and the momentum equations of
//! the transport-velocity formulation. Each equation declares its
//! sources and writes up front and evaluates against pre-group state;
//! see the crate docs for the group layout that stitches them together.

mod density;
mod momentum;
mod state;
mod walls;

pub use density::SummationDensity;
pub use momentum::{
    MomentumEquationArtificialStress, MomentumEquationPressureGradient, MomentumEquationViscosity,
    SolidWallNoSlipBC,
};
pub use state::StateEquation;
pub use walls::{SetWallVelocity, SolidWallPressureBC};

use silt_core::Kernel;
use silt_domain::Neighbor;

/// Kernel gradient vector for one pair, `dW/dr · x_ij / r`.
///
/// Zero at coincident positions; the radial derivative vanishes there
/// and the direction is undefined.
pub(crate) fn gradient_vector(kernel: &dyn Kernel, nb: &Neighbor, hij: f64) -> (f64, f64) {
    if nb.rij > 1e-12 {
        let dwdr = kernel.gradient(nb.rij, hij);
        (dwdr * nb.dx / nb.rij, dwdr * nb.dy / nb.rij)
    } else {
        (0.0, 0.0)
    }
}
