//! Momentum equations of the transport-velocity formulation.
//!
//! All four accumulate into the shared `au`/`av` buffers; the pressure
//! gradient additionally owns the advection accelerations
//! `auhat`/`avhat` driven by the constant background pressure.

use crate::equation::{Equation, WriteMode};
use crate::equations::gradient_vector;
use crate::scope::EquationScope;
use silt_core::EquationError;
use std::f64::consts::PI;

/// Density-weighted inter-particle pressure,
/// `(rho_j p_i + rho_i p_j) / (rho_i + rho_j)`.
fn pair_pressure(rhoi: f64, pi: f64, rhoj: f64, pj: f64) -> f64 {
    (rhoj * pi + rhoi * pj) / (rhoi + rhoj)
}

/// Pressure gradient, body force, and background-pressure transport
/// acceleration.
///
/// Per pair: `−(1/m_i)(V_i² + V_j²) p̄_ij ∇W` into `au`/`av` and
/// `−(1/m_i)(V_i² + V_j²) pb ∇W` into `auhat`/`avhat`, where `V` holds
/// the number density so `V_i = 1 / Σ W` is the particle volume. The
/// uniform body force ramps in over `tdamp` with a half-sine when
/// `tdamp > 0`.
pub struct MomentumEquationPressureGradient {
    dest: String,
    sources: Vec<String>,
    pb: f64,
    gx: f64,
    gy: f64,
    tdamp: f64,
}

impl MomentumEquationPressureGradient {
    /// Pressure gradient on `dest` over the given sources, with
    /// background pressure `pb`, body force `(gx, gy)`, and ramp
    /// duration `tdamp` (no ramp when zero).
    pub fn new(
        dest: impl Into<String>,
        sources: &[&str],
        pb: f64,
        gx: f64,
        gy: f64,
        tdamp: f64,
    ) -> Self {
        Self {
            dest: dest.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            pb,
            gx,
            gy,
            tdamp,
        }
    }

    fn damping(&self, t: f64) -> f64 {
        if self.tdamp > 0.0 && t < self.tdamp {
            0.5 * ((PI * (-0.5 + t / self.tdamp)).sin() + 1.0)
        } else {
            1.0
        }
    }
}

impl Equation for MomentumEquationPressureGradient {
    fn name(&self) -> &str {
        "momentum-pressure-gradient"
    }

    fn dest(&self) -> &str {
        &self.dest
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn reads_dest(&self) -> &'static [&'static str] {
        &["x", "y", "m", "rho", "p", "V", "h"]
    }

    fn reads_source(&self) -> &'static [&'static str] {
        &["rho", "p", "V", "h"]
    }

    fn writes(&self) -> &'static [(&'static str, WriteMode)] {
        &[
            ("au", WriteMode::Accumulate),
            ("av", WriteMode::Accumulate),
            ("auhat", WriteMode::Assign),
            ("avhat", WriteMode::Assign),
        ]
    }

    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError> {
        let n = scope.dest_len()?;
        let x = scope.read_dest("x")?;
        let y = scope.read_dest("y")?;
        let m = scope.read_dest("m")?;
        let rho = scope.read_dest("rho")?;
        let p = scope.read_dest("p")?;
        let vol = scope.read_dest("V")?;
        let h = scope.read_dest("h")?;

        let damp = self.damping(scope.time());
        let mut au = vec![0.0; n];
        let mut av = vec![0.0; n];
        let mut auhat = vec![0.0; n];
        let mut avhat = vec![0.0; n];
        for i in 0..n {
            au[i] = self.gx * damp;
            av[i] = self.gy * damp;
        }

        for source in 0..scope.source_count() {
            let rhos = scope.read_source(source, "rho")?;
            let ps = scope.read_source(source, "p")?;
            let vols = scope.read_source(source, "V")?;
            let hs = scope.read_source(source, "h")?;
            for i in 0..n {
                let mi1 = 1.0 / m[i];
                let vi = 1.0 / vol[i];
                let vi2 = vi * vi;
                for nb in scope.neighbors(source, x[i], y[i])? {
                    let j = nb.index;
                    let hij = 0.5 * (h[i] + hs[j]);
                    let (dwx, dwy) = gradient_vector(scope.kernel(), &nb, hij);
                    let vj = 1.0 / vols[j];
                    let vj2 = vj * vj;

                    let pij = pair_pressure(rho[i], p[i], rhos[j], ps[j]);
                    let tmp = -pij * mi1 * (vi2 + vj2);
                    au[i] += tmp * dwx;
                    av[i] += tmp * dwy;

                    let tmp = -self.pb * mi1 * (vi2 + vj2);
                    auhat[i] += tmp * dwx;
                    avhat[i] += tmp * dwy;
                }
            }
        }

        scope.accumulate("au", &au)?;
        scope.accumulate("av", &av)?;
        scope.assign("auhat", &auhat)?;
        scope.assign("avhat", &avhat)
    }
}

/// Laminar viscosity with harmonic-mean pair viscosity.
///
/// Per pair: `(1/m_i)(V_i² + V_j²) η̄_ij (x_ij · ∇W) /
/// (r² + (0.01 h_ij)²) · (u_i − u_j)`, with
/// `η̄_ij = 2 η_i η_j / (η_i + η_j)` and `η = nu · rho`.
pub struct MomentumEquationViscosity {
    dest: String,
    sources: Vec<String>,
    nu: f64,
}

impl MomentumEquationViscosity {
    /// Viscous acceleration on `dest` over the given sources, with
    /// kinematic viscosity `nu`.
    pub fn new(dest: impl Into<String>, sources: &[&str], nu: f64) -> Self {
        Self {
            dest: dest.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            nu,
        }
    }
}

impl Equation for MomentumEquationViscosity {
    fn name(&self) -> &str {
        "momentum-viscosity"
    }

    fn dest(&self) -> &str {
        &self.dest
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn reads_dest(&self) -> &'static [&'static str] {
        &["x", "y", "m", "rho", "u", "v", "V", "h"]
    }

    fn reads_source(&self) -> &'static [&'static str] {
        &["rho", "u", "v", "V", "h"]
    }

    fn writes(&self) -> &'static [(&'static str, WriteMode)] {
        &[("au", WriteMode::Accumulate), ("av", WriteMode::Accumulate)]
    }

    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError> {
        let n = scope.dest_len()?;
        let x = scope.read_dest("x")?;
        let y = scope.read_dest("y")?;
        let m = scope.read_dest("m")?;
        let rho = scope.read_dest("rho")?;
        let u = scope.read_dest("u")?;
        let v = scope.read_dest("v")?;
        let vol = scope.read_dest("V")?;
        let h = scope.read_dest("h")?;

        let mut au = vec![0.0; n];
        let mut av = vec![0.0; n];
        for source in 0..scope.source_count() {
            let rhos = scope.read_source(source, "rho")?;
            let us = scope.read_source(source, "u")?;
            let vs = scope.read_source(source, "v")?;
            let vols = scope.read_source(source, "V")?;
            let hs = scope.read_source(source, "h")?;
            for i in 0..n {
                let mi1 = 1.0 / m[i];
                let vi = 1.0 / vol[i];
                let vi2 = vi * vi;
                let etai = self.nu * rho[i];
                for nb in scope.neighbors(source, x[i], y[i])? {
                    let j = nb.index;
                    let etaj = self.nu * rhos[j];
                    let eta_sum = etai + etaj;
                    if eta_sum <= 0.0 {
                        continue;
                    }
                    let etaij = 2.0 * etai * etaj / eta_sum;

                    let hij = 0.5 * (h[i] + hs[j]);
                    let (dwx, dwy) = gradient_vector(scope.kernel(), &nb, hij);
                    let vj = 1.0 / vols[j];
                    let xdotdw = nb.dx * dwx + nb.dy * dwy;
                    let eps = 0.01 * hij * hij;
                    let tmp = mi1 * (vi2 + vj * vj) * etaij * xdotdw
                        / (nb.rij * nb.rij + eps);
                    au[i] += tmp * (u[i] - us[j]);
                    av[i] += tmp * (v[i] - vs[j]);
                }
            }
        }

        scope.accumulate("au", &au)?;
        scope.accumulate("av", &av)
    }
}

/// No-slip wall friction against the dummy wall velocities.
///
/// Identical in form to [`MomentumEquationViscosity`], but the velocity
/// difference pairs the fluid velocity against the wall's extrapolated
/// dummy velocity `ug`/`vg`, so the interpolated velocity vanishes at
/// the wall surface.
pub struct SolidWallNoSlipBC {
    dest: String,
    sources: Vec<String>,
    nu: f64,
}

impl SolidWallNoSlipBC {
    /// No-slip friction on `dest` from the given wall sources.
    pub fn new(dest: impl Into<String>, sources: &[&str], nu: f64) -> Self {
        Self {
            dest: dest.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            nu,
        }
    }
}

impl Equation for SolidWallNoSlipBC {
    fn name(&self) -> &str {
        "solid-wall-no-slip-bc"
    }

    fn dest(&self) -> &str {
        &self.dest
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn reads_dest(&self) -> &'static [&'static str] {
        &["x", "y", "m", "rho", "u", "v", "V", "h"]
    }

    fn reads_source(&self) -> &'static [&'static str] {
        &["rho", "ug", "vg", "V", "h"]
    }

    fn writes(&self) -> &'static [(&'static str, WriteMode)] {
        &[("au", WriteMode::Accumulate), ("av", WriteMode::Accumulate)]
    }

    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError> {
        let n = scope.dest_len()?;
        let x = scope.read_dest("x")?;
        let y = scope.read_dest("y")?;
        let m = scope.read_dest("m")?;
        let rho = scope.read_dest("rho")?;
        let u = scope.read_dest("u")?;
        let v = scope.read_dest("v")?;
        let vol = scope.read_dest("V")?;
        let h = scope.read_dest("h")?;

        let mut au = vec![0.0; n];
        let mut av = vec![0.0; n];
        for source in 0..scope.source_count() {
            let rhos = scope.read_source(source, "rho")?;
            let ugs = scope.read_source(source, "ug")?;
            let vgs = scope.read_source(source, "vg")?;
            let vols = scope.read_source(source, "V")?;
            let hs = scope.read_source(source, "h")?;
            for i in 0..n {
                let mi1 = 1.0 / m[i];
                let vi = 1.0 / vol[i];
                let vi2 = vi * vi;
                let etai = self.nu * rho[i];
                for nb in scope.neighbors(source, x[i], y[i])? {
                    let j = nb.index;
                    let etaj = self.nu * rhos[j];
                    let eta_sum = etai + etaj;
                    if eta_sum <= 0.0 {
                        continue;
                    }
                    let etaij = 2.0 * etai * etaj / eta_sum;

                    let hij = 0.5 * (h[i] + hs[j]);
                    let (dwx, dwy) = gradient_vector(scope.kernel(), &nb, hij);
                    let vj = 1.0 / vols[j];
                    let xdotdw = nb.dx * dwx + nb.dy * dwy;
                    let eps = 0.01 * hij * hij;
                    let tmp = mi1 * (vi2 + vj * vj) * etaij * xdotdw
                        / (nb.rij * nb.rij + eps);
                    au[i] += tmp * (u[i] - ugs[j]);
                    av[i] += tmp * (v[i] - vgs[j]);
                }
            }
        }

        scope.accumulate("au", &au)?;
        scope.accumulate("av", &av)
    }
}

/// Artificial stress from the advection/momentum velocity mismatch.
///
/// `A = rho · u ⊗ (uhat − u)` per particle; the pair contribution is
/// `(1/m_i)(V_i² + V_j²) · ½(A_i + A_j) · ∇W`. Vanishes wherever the
/// two velocities agree.
pub struct MomentumEquationArtificialStress {
    dest: String,
    sources: Vec<String>,
}

impl MomentumEquationArtificialStress {
    /// Artificial-stress acceleration on `dest` over the given sources.
    pub fn new(dest: impl Into<String>, sources: &[&str]) -> Self {
        Self {
            dest: dest.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The four components of `rho · u ⊗ (uhat − u)` for one particle.
fn stress(rho: f64, u: f64, v: f64, uhat: f64, vhat: f64) -> [f64; 4] {
    let du = uhat - u;
    let dv = vhat - v;
    [rho * u * du, rho * u * dv, rho * v * du, rho * v * dv]
}

impl Equation for MomentumEquationArtificialStress {
    fn name(&self) -> &str {
        "momentum-artificial-stress"
    }

    fn dest(&self) -> &str {
        &self.dest
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn reads_dest(&self) -> &'static [&'static str] {
        &["x", "y", "m", "rho", "u", "v", "uhat", "vhat", "V", "h"]
    }

    fn reads_source(&self) -> &'static [&'static str] {
        &["rho", "u", "v", "uhat", "vhat", "V", "h"]
    }

    fn writes(&self) -> &'static [(&'static str, WriteMode)] {
        &[("au", WriteMode::Accumulate), ("av", WriteMode::Accumulate)]
    }

    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError> {
        let n = scope.dest_len()?;
        let x = scope.read_dest("x")?;
        let y = scope.read_dest("y")?;
        let m = scope.read_dest("m")?;
        let rho = scope.read_dest("rho")?;
        let u = scope.read_dest("u")?;
        let v = scope.read_dest("v")?;
        let uhat = scope.read_dest("uhat")?;
        let vhat = scope.read_dest("vhat")?;
        let vol = scope.read_dest("V")?;
        let h = scope.read_dest("h")?;

        let mut au = vec![0.0; n];
        let mut av = vec![0.0; n];
        for source in 0..scope.source_count() {
            let rhos = scope.read_source(source, "rho")?;
            let us = scope.read_source(source, "u")?;
            let vs = scope.read_source(source, "v")?;
            let uhats = scope.read_source(source, "uhat")?;
            let vhats = scope.read_source(source, "vhat")?;
            let vols = scope.read_source(source, "V")?;
            let hs = scope.read_source(source, "h")?;
            for i in 0..n {
                let mi1 = 1.0 / m[i];
                let vi = 1.0 / vol[i];
                let vi2 = vi * vi;
                let ai = stress(rho[i], u[i], v[i], uhat[i], vhat[i]);
                for nb in scope.neighbors(source, x[i], y[i])? {
                    let j = nb.index;
                    let hij = 0.5 * (h[i] + hs[j]);
                    let (dwx, dwy) = gradient_vector(scope.kernel(), &nb, hij);
                    let vj = 1.0 / vols[j];
                    let aj = stress(rhos[j], us[j], vs[j], uhats[j], vhats[j]);

                    let ax = 0.5 * ((ai[0] + aj[0]) * dwx + (ai[1] + aj[1]) * dwy);
                    let ay = 0.5 * ((ai[2] + aj[2]) * dwx + (ai[3] + aj[3]) * dwy);
                    let tmp = mi1 * (vi2 + vj * vj);
                    au[i] += tmp * ax;
                    av[i] += tmp * ay;
                }
            }
        }

        scope.accumulate("au", &au)?;
        scope.accumulate("av", &av)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_pressure_is_density_weighted() {
        // Equal densities reduce to the arithmetic mean.
        assert_eq!(pair_pressure(1000.0, 2.0, 1000.0, 4.0), 3.0);
        // The lighter side's pressure dominates.
        let p = pair_pressure(1.0, 0.0, 1000.0, 10.0);
        assert!(p < 0.1);
    }

    #[test]
    fn stress_vanishes_when_velocities_agree() {
        assert_eq!(stress(1000.0, 0.3, -0.2, 0.3, -0.2), [0.0; 4]);
    }

    #[test]
    fn body_force_ramp_is_monotone_and_saturates() {
        let eq = MomentumEquationPressureGradient::new("fluid", &[], 0.0, 1.0, 0.0, 10.0);
        assert!(eq.damping(0.0).abs() < 1e-12);
        assert!((eq.damping(5.0) - 0.5).abs() < 1e-12);
        let (a, b) = (eq.damping(2.0), eq.damping(8.0));
        assert!(a < b);
        assert_eq!(eq.damping(10.0), 1.0);
        assert_eq!(eq.damping(500.0), 1.0);
    }

    #[test]
    fn no_ramp_without_damping_window() {
        let eq = MomentumEquationPressureGradient::new("fluid", &[], 0.0, 1.0, 0.0, 0.0);
        assert_eq!(eq.damping(0.0), 1.0);
    }
}
