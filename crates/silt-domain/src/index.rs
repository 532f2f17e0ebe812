//! Uniform cell-list neighbor index over one source collection.

use crate::domain::GhostLayer;
use crate::error::DomainError;
use silt_particles::ParticleCollection;
use smallvec::SmallVec;

/// One neighbor hit from a [`SourceIndex`] query.
///
/// `index` refers to the *real* source particle even when the hit came
/// through a ghost image; the separation vector is taken against the
/// image position, so periodic interactions get the short displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Index of the source particle in its collection.
    pub index: usize,
    /// `x_dest − x_source_image`.
    pub dx: f64,
    /// `y_dest − y_source_image`.
    pub dy: f64,
    /// Separation distance.
    pub rij: f64,
}

/// Cell list over the real + ghost positions of one collection.
///
/// Built from scratch each refresh; cell edge equals the query radius,
/// so a query scans at most a 3×3 block of cells. A destination
/// particle querying its own collection sees itself as a zero-distance
/// neighbor — the self-contribution convention every summation in this
/// workspace relies on.
#[derive(Clone, Debug)]
pub struct SourceIndex {
    radius: f64,
    inv_cell: f64,
    x0: f64,
    y0: f64,
    nx: i64,
    ny: i64,
    /// Flattened cell → point-index lists.
    cells: Vec<Vec<u32>>,
    px: Vec<f64>,
    py: Vec<f64>,
    source: Vec<usize>,
}

impl SourceIndex {
    /// Build the index over a collection and its current ghost layer.
    ///
    /// `radius` is the interaction radius (kernel support at the
    /// largest smoothing length in use); hits beyond it are excluded.
    pub fn build(
        collection: &ParticleCollection,
        ghosts: &GhostLayer,
        radius: f64,
    ) -> Result<Self, DomainError> {
        let xs = collection.scalar("x")?;
        let ys = collection.scalar("y")?;

        let n_points = xs.len() + ghosts.len();
        let mut px = Vec::with_capacity(n_points);
        let mut py = Vec::with_capacity(n_points);
        let mut source = Vec::with_capacity(n_points);
        px.extend_from_slice(xs);
        py.extend_from_slice(ys);
        source.extend(0..xs.len());
        px.extend_from_slice(&ghosts.x);
        py.extend_from_slice(&ghosts.y);
        source.extend_from_slice(&ghosts.source);

        let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
        let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (&x, &y) in px.iter().zip(py.iter()) {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        if px.is_empty() {
            (x0, y0, x1, y1) = (0.0, 0.0, 0.0, 0.0);
        }

        let inv_cell = 1.0 / radius;
        let nx = (((x1 - x0) * inv_cell).floor() as i64 + 1).max(1);
        let ny = (((y1 - y0) * inv_cell).floor() as i64 + 1).max(1);

        let mut cells = vec![Vec::new(); (nx * ny) as usize];
        for (i, (&x, &y)) in px.iter().zip(py.iter()).enumerate() {
            let cx = (((x - x0) * inv_cell).floor() as i64).clamp(0, nx - 1);
            let cy = (((y - y0) * inv_cell).floor() as i64).clamp(0, ny - 1);
            cells[(cy * nx + cx) as usize].push(i as u32);
        }

        Ok(Self {
            radius,
            inv_cell,
            x0,
            y0,
            nx,
            ny,
            cells,
            px,
            py,
            source,
        })
    }

    /// Interaction radius the index was built for.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Total indexed points (real + ghost images).
    pub fn point_count(&self) -> usize {
        self.px.len()
    }

    /// All source points within `radius` of `(x, y)`.
    ///
    /// Hits at exactly the radius are included.
    pub fn query(&self, x: f64, y: f64) -> SmallVec<[Neighbor; 32]> {
        let mut hits = SmallVec::new();
        let cx = ((x - self.x0) * self.inv_cell).floor() as i64;
        let cy = ((y - self.y0) * self.inv_cell).floor() as i64;
        for gy in (cy - 1)..=(cy + 1) {
            if gy < 0 || gy >= self.ny {
                continue;
            }
            for gx in (cx - 1)..=(cx + 1) {
                if gx < 0 || gx >= self.nx {
                    continue;
                }
                for &p in &self.cells[(gy * self.nx + gx) as usize] {
                    let p = p as usize;
                    let dx = x - self.px[p];
                    let dy = y - self.py[p];
                    let rij = (dx * dx + dy * dy).sqrt();
                    if rij <= self.radius {
                        hits.push(Neighbor {
                            index: self.source[p],
                            dx,
                            dy,
                            rij,
                        });
                    }
                }
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainBox;
    use silt_particles::CollectionBuilder;

    fn points(pts: &[(f64, f64)]) -> ParticleCollection {
        let mut c = CollectionBuilder::new("pts").build(pts.len()).unwrap();
        let xs: Vec<f64> = pts.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = pts.iter().map(|p| p.1).collect();
        c.set_scalar("x", &xs).unwrap();
        c.set_scalar("y", &ys).unwrap();
        c
    }

    #[test]
    fn self_pair_included_at_zero_distance() {
        let c = points(&[(0.5, 0.5)]);
        let idx = SourceIndex::build(&c, &GhostLayer::default(), 0.1).unwrap();
        let hits = idx.query(0.5, 0.5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 0);
        assert_eq!(hits[0].rij, 0.0);
    }

    #[test]
    fn radius_filter_is_inclusive() {
        let c = points(&[(0.0, 0.0), (0.1, 0.0), (0.25, 0.0)]);
        let idx = SourceIndex::build(&c, &GhostLayer::default(), 0.1).unwrap();
        let hits = idx.query(0.0, 0.0);
        let mut indices: Vec<usize> = hits.iter().map(|n| n.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, [0, 1]);
    }

    #[test]
    fn query_outside_cloud_returns_nothing() {
        let c = points(&[(0.5, 0.5)]);
        let idx = SourceIndex::build(&c, &GhostLayer::default(), 0.1).unwrap();
        assert!(idx.query(5.0, 5.0).is_empty());
    }

    #[test]
    fn separation_vector_points_from_source_to_dest() {
        let c = points(&[(0.4, 0.5)]);
        let idx = SourceIndex::build(&c, &GhostLayer::default(), 0.2).unwrap();
        let hits = idx.query(0.5, 0.5);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].dx - 0.1).abs() < 1e-12);
        assert_eq!(hits[0].dy, 0.0);
    }

    #[test]
    fn ghost_image_reaches_across_periodic_boundary() {
        // One particle near x = 1; a dest near x = 0 only sees it
        // through the -period image.
        let b = DomainBox::new(0.0, 1.0, 0.0, 1.0, true, false, 0.2).unwrap();
        let c = points(&[(0.95, 0.5), (0.05, 0.5)]);
        let ghosts = b.refresh_ghosts(&c).unwrap();
        let idx = SourceIndex::build(&c, &ghosts, 0.15).unwrap();

        let hits = idx.query(0.05, 0.5);
        let through_ghost: Vec<&Neighbor> =
            hits.iter().filter(|n| n.index == 0).collect();
        assert_eq!(through_ghost.len(), 1);
        // Short displacement: 0.05 - (-0.05) = 0.1, not -0.9.
        assert!((through_ghost[0].dx - 0.1).abs() < 1e-12);
        assert!((through_ghost[0].rij - 0.1).abs() < 1e-12);
    }

    #[test]
    fn empty_collection_builds_and_queries() {
        let c = points(&[]);
        let idx = SourceIndex::build(&c, &GhostLayer::default(), 0.1).unwrap();
        assert_eq!(idx.point_count(), 0);
        assert!(idx.query(0.0, 0.0).is_empty());
    }
}
