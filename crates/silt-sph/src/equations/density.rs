//! Summation density and particle volume.

use crate::equation::{Equation, WriteMode};
use crate::scope::EquationScope;
use silt_core::EquationError;

/// Kernel-sum density and inverse particle volume.
///
/// For each destination particle, `V = Σ_j W(r_ij, h_ij)` over every
/// declared source (the number density) and `rho = m · V`. The particle
/// itself is a zero-distance neighbor of its own collection, so an
/// isolated particle lands at `rho = m · W(0, h)` rather than zero.
pub struct SummationDensity {
    dest: String,
    sources: Vec<String>,
}

impl SummationDensity {
    /// Sum density on `dest` over the given sources.
    pub fn new(dest: impl Into<String>, sources: &[&str]) -> Self {
        Self {
            dest: dest.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Equation for SummationDensity {
    fn name(&self) -> &str {
        "summation-density"
    }

    fn dest(&self) -> &str {
        &self.dest
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn reads_dest(&self) -> &'static [&'static str] {
        &["x", "y", "m", "h"]
    }

    fn reads_source(&self) -> &'static [&'static str] {
        &["h"]
    }

    fn writes(&self) -> &'static [(&'static str, WriteMode)] {
        &[("rho", WriteMode::Assign), ("V", WriteMode::Assign)]
    }

    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError> {
        let n = scope.dest_len()?;
        let x = scope.read_dest("x")?;
        let y = scope.read_dest("y")?;
        let m = scope.read_dest("m")?;
        let h = scope.read_dest("h")?;

        let mut volume = vec![0.0; n];
        for source in 0..scope.source_count() {
            let hs = scope.read_source(source, "h")?;
            for i in 0..n {
                for nb in scope.neighbors(source, x[i], y[i])? {
                    let hij = 0.5 * (h[i] + hs[nb.index]);
                    volume[i] += scope.kernel().weight(nb.rij, hij);
                }
            }
        }

        let rho: Vec<f64> = m.iter().zip(&volume).map(|(&mi, &vi)| mi * vi).collect();
        scope.assign("V", &volume)?;
        scope.assign("rho", &rho)
    }
}
