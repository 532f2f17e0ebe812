//! Generalized wall boundary conditions.
//!
//! Dummy-particle treatment: wall particles carry extrapolated fluid
//! velocities and pressures so fluid neighbors see a consistent
//! continuation of the flow field across the interface.

use crate::equation::{Equation, WriteMode};
use crate::scope::EquationScope;
use silt_core::EquationError;

/// Shepard-filtered fluid velocity on wall particles, plus the dummy
/// no-slip velocity.
///
/// `uf = Σ u_j W / Σ W` over fluid neighbors (left as the raw sum when
/// the weight sum is below `1e-12`, i.e. no fluid in range), and
/// `ug = 2 u_wall − uf` so that the interpolated velocity at the wall
/// surface equals the wall's own.
pub struct SetWallVelocity {
    dest: String,
    sources: Vec<String>,
}

impl SetWallVelocity {
    /// Extrapolate onto `dest` from the given fluid sources.
    pub fn new(dest: impl Into<String>, sources: &[&str]) -> Self {
        Self {
            dest: dest.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Equation for SetWallVelocity {
    fn name(&self) -> &str {
        "set-wall-velocity"
    }

    fn dest(&self) -> &str {
        &self.dest
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn reads_dest(&self) -> &'static [&'static str] {
        &["x", "y", "u", "v", "h"]
    }

    fn reads_source(&self) -> &'static [&'static str] {
        &["u", "v", "h"]
    }

    fn writes(&self) -> &'static [(&'static str, WriteMode)] {
        &[
            ("uf", WriteMode::Assign),
            ("vf", WriteMode::Assign),
            ("wij", WriteMode::Assign),
            ("ug", WriteMode::Assign),
            ("vg", WriteMode::Assign),
        ]
    }

    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError> {
        let n = scope.dest_len()?;
        let x = scope.read_dest("x")?;
        let y = scope.read_dest("y")?;
        let u = scope.read_dest("u")?;
        let v = scope.read_dest("v")?;
        let h = scope.read_dest("h")?;

        let mut uf = vec![0.0; n];
        let mut vf = vec![0.0; n];
        let mut wij = vec![0.0; n];
        for source in 0..scope.source_count() {
            let us = scope.read_source(source, "u")?;
            let vs = scope.read_source(source, "v")?;
            let hs = scope.read_source(source, "h")?;
            for i in 0..n {
                for nb in scope.neighbors(source, x[i], y[i])? {
                    let hij = 0.5 * (h[i] + hs[nb.index]);
                    let w = scope.kernel().weight(nb.rij, hij);
                    uf[i] += us[nb.index] * w;
                    vf[i] += vs[nb.index] * w;
                    wij[i] += w;
                }
            }
        }

        let mut ug = vec![0.0; n];
        let mut vg = vec![0.0; n];
        for i in 0..n {
            if wij[i] > 1e-12 {
                uf[i] /= wij[i];
                vf[i] /= wij[i];
            }
            ug[i] = 2.0 * u[i] - uf[i];
            vg[i] = 2.0 * v[i] - vf[i];
        }

        scope.assign("uf", &uf)?;
        scope.assign("vf", &vf)?;
        scope.assign("wij", &wij)?;
        scope.assign("ug", &ug)?;
        scope.assign("vg", &vg)
    }
}

/// Wall pressure from the fluid, with the hydrostatic body-force
/// correction, and the matching dummy density.
///
/// `p_wall = Σ_j (p_j + rho_j · g · x_ij) W / Σ_j W`, left at the raw
/// sum when the weight sum is below `1e-14`. The wall density is then
/// recovered by inverting the state equation,
/// `rho = rho0 · (p / p0 + b)`, so pressure-gradient pairs against the
/// wall use a consistent density.
pub struct SolidWallPressureBC {
    dest: String,
    sources: Vec<String>,
    rho0: f64,
    p0: f64,
    b: f64,
    gx: f64,
    gy: f64,
}

impl SolidWallPressureBC {
    /// Extrapolate wall pressure on `dest` from the given fluid
    /// sources, under the body force `(gx, gy)`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dest: impl Into<String>,
        sources: &[&str],
        rho0: f64,
        p0: f64,
        b: f64,
        gx: f64,
        gy: f64,
    ) -> Self {
        Self {
            dest: dest.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            rho0,
            p0,
            b,
            gx,
            gy,
        }
    }
}

impl Equation for SolidWallPressureBC {
    fn name(&self) -> &str {
        "solid-wall-pressure-bc"
    }

    fn dest(&self) -> &str {
        &self.dest
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn reads_dest(&self) -> &'static [&'static str] {
        &["x", "y", "h"]
    }

    fn reads_source(&self) -> &'static [&'static str] {
        &["p", "rho", "h"]
    }

    fn writes(&self) -> &'static [(&'static str, WriteMode)] {
        &[("p", WriteMode::Assign), ("rho", WriteMode::Assign)]
    }

    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError> {
        let n = scope.dest_len()?;
        let x = scope.read_dest("x")?;
        let y = scope.read_dest("y")?;
        let h = scope.read_dest("h")?;

        let mut p = vec![0.0; n];
        let mut wsum = vec![0.0; n];
        for source in 0..scope.source_count() {
            let ps = scope.read_source(source, "p")?;
            let rhos = scope.read_source(source, "rho")?;
            let hs = scope.read_source(source, "h")?;
            for i in 0..n {
                for nb in scope.neighbors(source, x[i], y[i])? {
                    let j = nb.index;
                    let hij = 0.5 * (h[i] + hs[j]);
                    let w = scope.kernel().weight(nb.rij, hij);
                    let gdotx = self.gx * nb.dx + self.gy * nb.dy;
                    p[i] += (ps[j] + rhos[j] * gdotx) * w;
                    wsum[i] += w;
                }
            }
        }

        let mut rho = vec![0.0; n];
        for i in 0..n {
            if wsum[i] > 1e-14 {
                p[i] /= wsum[i];
            }
            rho[i] = self.rho0 * (p[i] / self.p0 + self.b);
        }

        scope.assign("p", &p)?;
        scope.assign("rho", &rho)
    }
}
