//! Smoothing-kernel trait and the quintic-spline reference kernel.
//!
//! Every interaction equation and the domain manager's ghost-layer
//! validation consume kernels through the [`Kernel`] trait; the trait
//! is the seam where alternative kernels plug in.

use std::f64::consts::PI;

/// A compact-support smoothing kernel.
///
/// # Contract
///
/// - `weight(r, h)` and `gradient(r, h)` are zero for
///   `r >= support_radius(h)`.
/// - `support_radius(h)` is a fixed multiple of the smoothing length;
///   the domain manager validates the ghost-layer width against it.
/// - `weight(0.0, h) > 0.0` — a particle contributes to its own kernel
///   sums. The summation-density convention for isolated particles
///   depends on this.
pub trait Kernel: Send + Sync {
    /// Kernel weight `W(r, h)` at separation `r`.
    fn weight(&self, r: f64, h: f64) -> f64;

    /// Radial derivative `dW/dr` at separation `r`.
    ///
    /// Callers scale by the unit separation vector to obtain the
    /// kernel gradient; the derivative is zero at `r = 0`.
    fn gradient(&self, r: f64, h: f64) -> f64;

    /// Radius beyond which the kernel is identically zero.
    fn support_radius(&self, h: f64) -> f64;
}

/// Quintic spline kernel, 2D normalization.
///
/// Support radius `3h`, normalization `7 / (478 π h²)`. The standard
/// choice for transport-velocity simulations of viscous flow.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuinticSpline;

impl QuinticSpline {
    /// 2D normalization factor `7 / (478 π h²)`.
    fn sigma(h: f64) -> f64 {
        7.0 / (478.0 * PI * h * h)
    }
}

impl Kernel for QuinticSpline {
    fn weight(&self, r: f64, h: f64) -> f64 {
        let q = r / h;
        let val = if q < 1.0 {
            let a = 3.0 - q;
            let b = 2.0 - q;
            let c = 1.0 - q;
            a.powi(5) - 6.0 * b.powi(5) + 15.0 * c.powi(5)
        } else if q < 2.0 {
            let a = 3.0 - q;
            let b = 2.0 - q;
            a.powi(5) - 6.0 * b.powi(5)
        } else if q < 3.0 {
            (3.0 - q).powi(5)
        } else {
            0.0
        };
        Self::sigma(h) * val
    }

    fn gradient(&self, r: f64, h: f64) -> f64 {
        let q = r / h;
        let val = if q < 1.0 {
            let a = 3.0 - q;
            let b = 2.0 - q;
            let c = 1.0 - q;
            -5.0 * a.powi(4) + 30.0 * b.powi(4) - 75.0 * c.powi(4)
        } else if q < 2.0 {
            let a = 3.0 - q;
            let b = 2.0 - q;
            -5.0 * a.powi(4) + 30.0 * b.powi(4)
        } else if q < 3.0 {
            -5.0 * (3.0 - q).powi(4)
        } else {
            0.0
        };
        Self::sigma(h) * val / h
    }

    fn support_radius(&self, h: f64) -> f64 {
        3.0 * h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const H: f64 = 0.01;

    #[test]
    fn self_weight_is_positive() {
        let k = QuinticSpline;
        assert!(k.weight(0.0, H) > 0.0);
        // W(0) = 66 * sigma for the quintic spline.
        let expected = 66.0 * 7.0 / (478.0 * PI * H * H);
        assert!((k.weight(0.0, H) - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn zero_beyond_support() {
        let k = QuinticSpline;
        assert_eq!(k.weight(3.0 * H, H), 0.0);
        assert_eq!(k.gradient(3.0 * H, H), 0.0);
        assert_eq!(k.weight(10.0 * H, H), 0.0);
    }

    #[test]
    fn gradient_vanishes_at_origin() {
        let k = QuinticSpline;
        assert!(k.gradient(0.0, H).abs() < 1e-9);
    }

    #[test]
    fn support_radius_fixed_multiple() {
        let k = QuinticSpline;
        assert_eq!(k.support_radius(H), 3.0 * H);
        assert_eq!(k.support_radius(2.0 * H), 6.0 * H);
    }

    #[test]
    fn normalization_unit_integral() {
        // ∫ W dA over the support should be ~1 (midpoint rule on a
        // fine polar grid).
        let k = QuinticSpline;
        let nr = 3000;
        let dr = 3.0 * H / nr as f64;
        let mut integral = 0.0;
        for i in 0..nr {
            let r = (i as f64 + 0.5) * dr;
            integral += k.weight(r, H) * 2.0 * PI * r * dr;
        }
        assert!((integral - 1.0).abs() < 1e-4, "integral = {integral}");
    }

    proptest! {
        #[test]
        fn weight_nonnegative_and_monotone_near_origin(q in 0.0f64..3.0) {
            let k = QuinticSpline;
            let r = q * H;
            prop_assert!(k.weight(r, H) >= 0.0);
            // dW/dr <= 0 everywhere: the kernel decays radially.
            prop_assert!(k.gradient(r, H) <= 1e-12);
        }

        #[test]
        fn weight_finite(q in 0.0f64..10.0) {
            let k = QuinticSpline;
            prop_assert!(k.weight(q * H, H).is_finite());
            prop_assert!(k.gradient(q * H, H).is_finite());
        }
    }
}
