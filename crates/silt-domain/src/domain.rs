//! The periodic box: position wrapping and ghost-image generation.

use crate::error::DomainError;
use silt_core::Kernel;
use silt_particles::ParticleCollection;
use smallvec::SmallVec;

/// Axis-aligned 2D box with independent per-axis periodicity.
///
/// Positions live in `[min, max)` on each periodic axis. The
/// `ghost_extent` is the width of the boundary band whose particles
/// get translated images; it must cover the kernel support radius
/// (checked by [`validate_support`](Self::validate_support)).
#[derive(Clone, Copy, Debug)]
pub struct DomainBox {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    periodic_x: bool,
    periodic_y: bool,
    ghost_extent: f64,
}

impl DomainBox {
    /// Create a box, validating bounds and ghost-layer width.
    pub fn new(
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
        periodic_x: bool,
        periodic_y: bool,
        ghost_extent: f64,
    ) -> Result<Self, DomainError> {
        if !xmin.is_finite() || !xmax.is_finite() || xmin >= xmax {
            return Err(DomainError::InvalidBounds {
                axis: "x",
                min: xmin,
                max: xmax,
            });
        }
        if !ymin.is_finite() || !ymax.is_finite() || ymin >= ymax {
            return Err(DomainError::InvalidBounds {
                axis: "y",
                min: ymin,
                max: ymax,
            });
        }
        if (periodic_x || periodic_y) && (!ghost_extent.is_finite() || ghost_extent <= 0.0) {
            return Err(DomainError::InvalidGhostExtent {
                value: ghost_extent,
            });
        }
        if periodic_x && xmax - xmin < 2.0 * ghost_extent {
            return Err(DomainError::BoxTooNarrow {
                axis: "x",
                period: xmax - xmin,
                ghost_extent,
            });
        }
        if periodic_y && ymax - ymin < 2.0 * ghost_extent {
            return Err(DomainError::BoxTooNarrow {
                axis: "y",
                period: ymax - ymin,
                ghost_extent,
            });
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
            periodic_x,
            periodic_y,
            ghost_extent,
        })
    }

    /// Period along x.
    pub fn period_x(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Period along y.
    pub fn period_y(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Ghost-layer width.
    pub fn ghost_extent(&self) -> f64 {
        self.ghost_extent
    }

    /// Whether the x axis is periodic.
    pub fn periodic_x(&self) -> bool {
        self.periodic_x
    }

    /// Whether the y axis is periodic.
    pub fn periodic_y(&self) -> bool {
        self.periodic_y
    }

    /// Required setup check: the ghost layer must cover the kernel
    /// support radius at the largest smoothing length in use.
    pub fn validate_support(&self, kernel: &dyn Kernel, h_max: f64) -> Result<(), DomainError> {
        if !self.periodic_x && !self.periodic_y {
            return Ok(());
        }
        let required = kernel.support_radius(h_max);
        if self.ghost_extent < required {
            return Err(DomainError::GhostLayerTooThin {
                ghost_extent: self.ghost_extent,
                required,
            });
        }
        Ok(())
    }

    /// Map every position into `[min, max)` on each periodic axis.
    ///
    /// Must run on real particles before neighbor search each stage.
    pub fn wrap(&self, collection: &mut ParticleCollection) -> Result<(), DomainError> {
        if self.periodic_x {
            let (xmin, period) = (self.xmin, self.period_x());
            for x in collection.scalar_mut("x")? {
                *x = xmin + (*x - xmin).rem_euclid(period);
            }
        }
        if self.periodic_y {
            let (ymin, period) = (self.ymin, self.period_y());
            for y in collection.scalar_mut("y")? {
                *y = ymin + (*y - ymin).rem_euclid(period);
            }
        }
        Ok(())
    }

    /// Recompute the ghost layer of a collection from scratch.
    ///
    /// A ghost is a position image `(x + sx·Lx, y + sy·Ly)` plus the
    /// index of its source particle; it carries no property storage of
    /// its own. Property reads go through the source index to the live
    /// real particle, so mirrored values can never go stale within a
    /// step. Corner images appear when both axes are periodic and the
    /// particle sits in both boundary bands.
    ///
    /// Callers must [`wrap`](Self::wrap) first; positions are assumed
    /// in range.
    pub fn refresh_ghosts(
        &self,
        collection: &ParticleCollection,
    ) -> Result<GhostLayer, DomainError> {
        let xs = collection.scalar("x")?;
        let ys = collection.scalar("y")?;
        let mut layer = GhostLayer::default();

        for (i, (&x, &y)) in xs.iter().zip(ys.iter()).enumerate() {
            let mut shifts_x: SmallVec<[f64; 3]> = SmallVec::new();
            shifts_x.push(0.0);
            if self.periodic_x {
                if x - self.xmin < self.ghost_extent {
                    shifts_x.push(self.period_x());
                }
                if self.xmax - x <= self.ghost_extent {
                    shifts_x.push(-self.period_x());
                }
            }
            let mut shifts_y: SmallVec<[f64; 3]> = SmallVec::new();
            shifts_y.push(0.0);
            if self.periodic_y {
                if y - self.ymin < self.ghost_extent {
                    shifts_y.push(self.period_y());
                }
                if self.ymax - y <= self.ghost_extent {
                    shifts_y.push(-self.period_y());
                }
            }
            for &sx in &shifts_x {
                for &sy in &shifts_y {
                    if sx == 0.0 && sy == 0.0 {
                        continue;
                    }
                    layer.x.push(x + sx);
                    layer.y.push(y + sy);
                    layer.source.push(i);
                }
            }
        }
        Ok(layer)
    }
}

/// Read-only ghost images of one collection for one step.
///
/// Recomputed from scratch every refresh and discarded afterwards;
/// never advanced by the integrator, never the target of any equation
/// write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GhostLayer {
    /// Image x positions.
    pub x: Vec<f64>,
    /// Image y positions.
    pub y: Vec<f64>,
    /// Index of the real source particle behind each image.
    pub source: Vec<usize>,
}

impl GhostLayer {
    /// Number of ghost images.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether the layer holds no images.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use silt_core::QuinticSpline;
    use silt_particles::CollectionBuilder;

    fn unit_box(gx: bool, gy: bool) -> DomainBox {
        DomainBox::new(0.0, 1.0, 0.0, 1.0, gx, gy, 0.2).unwrap()
    }

    fn points(pts: &[(f64, f64)]) -> silt_particles::ParticleCollection {
        let mut c = CollectionBuilder::new("pts").build(pts.len()).unwrap();
        let xs: Vec<f64> = pts.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = pts.iter().map(|p| p.1).collect();
        c.set_scalar("x", &xs).unwrap();
        c.set_scalar("y", &ys).unwrap();
        c
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn rejects_inverted_bounds() {
        assert!(matches!(
            DomainBox::new(1.0, 0.0, 0.0, 1.0, true, true, 0.1),
            Err(DomainError::InvalidBounds { axis: "x", .. })
        ));
    }

    #[test]
    fn rejects_zero_ghost_extent_when_periodic() {
        assert!(matches!(
            DomainBox::new(0.0, 1.0, 0.0, 1.0, true, false, 0.0),
            Err(DomainError::InvalidGhostExtent { .. })
        ));
    }

    #[test]
    fn nonperiodic_box_ignores_ghost_extent() {
        assert!(DomainBox::new(0.0, 1.0, 0.0, 1.0, false, false, 0.0).is_ok());
    }

    #[test]
    fn rejects_box_narrower_than_ghost_bands() {
        assert!(matches!(
            DomainBox::new(0.0, 0.3, 0.0, 1.0, true, false, 0.2),
            Err(DomainError::BoxTooNarrow { axis: "x", .. })
        ));
    }

    // ── Support validation ──────────────────────────────────────

    #[test]
    fn ghost_layer_thinner_than_support_is_fatal() {
        let b = unit_box(true, true);
        // 3h support with h = 0.1 needs 0.3 > 0.2.
        assert!(matches!(
            b.validate_support(&QuinticSpline, 0.1),
            Err(DomainError::GhostLayerTooThin { .. })
        ));
        assert!(b.validate_support(&QuinticSpline, 0.05).is_ok());
    }

    // ── Wrap ────────────────────────────────────────────────────

    #[test]
    fn wrap_maps_exact_max_to_min() {
        let b = unit_box(true, false);
        let mut c = points(&[(1.0, 0.5)]);
        b.wrap(&mut c).unwrap();
        assert_eq!(c.scalar("x").unwrap()[0], 0.0);
    }

    #[test]
    fn wrap_ignores_nonperiodic_axis() {
        let b = unit_box(true, false);
        let mut c = points(&[(-0.25, 3.5)]);
        b.wrap(&mut c).unwrap();
        assert!((c.scalar("x").unwrap()[0] - 0.75).abs() < 1e-12);
        assert_eq!(c.scalar("y").unwrap()[0], 3.5);
    }

    proptest! {
        #[test]
        fn wrap_lands_in_half_open_range(
            x in -10.0f64..10.0,
            y in -10.0f64..10.0,
        ) {
            let b = unit_box(true, true);
            let mut c = points(&[(x, y)]);
            b.wrap(&mut c).unwrap();
            let (wx, wy) = (c.scalar("x").unwrap()[0], c.scalar("y").unwrap()[0]);
            prop_assert!((0.0..1.0).contains(&wx), "wx = {wx}");
            prop_assert!((0.0..1.0).contains(&wy), "wy = {wy}");
        }
    }

    // ── Ghosts ──────────────────────────────────────────────────

    #[test]
    fn interior_particle_has_no_images() {
        let b = unit_box(true, true);
        let layer = b.refresh_ghosts(&points(&[(0.5, 0.5)])).unwrap();
        assert!(layer.is_empty());
    }

    #[test]
    fn edge_particle_has_one_image() {
        let b = unit_box(true, false);
        let layer = b.refresh_ghosts(&points(&[(0.1, 0.5)])).unwrap();
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.x[0], 1.1);
        assert_eq!(layer.y[0], 0.5);
        assert_eq!(layer.source[0], 0);
    }

    #[test]
    fn corner_particle_has_three_images() {
        let b = unit_box(true, true);
        let layer = b.refresh_ghosts(&points(&[(0.05, 0.95)])).unwrap();
        // +x, -y, and the (+x, -y) corner image.
        assert_eq!(layer.len(), 3);
        let mut images: Vec<(i64, i64)> = layer
            .x
            .iter()
            .zip(&layer.y)
            .map(|(&x, &y)| ((x * 100.0).round() as i64, (y * 100.0).round() as i64))
            .collect();
        images.sort_unstable();
        assert_eq!(images, [(5, -5), (105, -5), (105, 95)]);
    }

    #[test]
    fn refresh_is_idempotent_for_fixed_positions() {
        let b = unit_box(true, true);
        let c = points(&[(0.05, 0.5), (0.95, 0.95), (0.5, 0.1)]);
        let first = b.refresh_ghosts(&c).unwrap();
        let second = b.refresh_ghosts(&c).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn stale_ghosts_are_replaced_after_motion() {
        let b = unit_box(true, false);
        let mut c = points(&[(0.1, 0.5)]);
        let before = b.refresh_ghosts(&c).unwrap();
        assert_eq!(before.len(), 1);
        c.scalar_mut("x").unwrap()[0] = 0.5;
        let after = b.refresh_ghosts(&c).unwrap();
        assert!(after.is_empty());
    }
}
