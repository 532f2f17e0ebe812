//! Per-step domain refresh: wrap, ghost regeneration, index rebuild.

use crate::domain::{DomainBox, GhostLayer};
use crate::error::DomainError;
use crate::index::SourceIndex;
use indexmap::IndexMap;
use silt_core::Kernel;
use silt_particles::ParticleSystem;

/// Owns the periodic box plus the current ghost layers and neighbor
/// indexes of every collection.
///
/// [`update`](Self::update) is the single refresh entry point: it
/// wraps real positions, regenerates every ghost layer from scratch,
/// and rebuilds every cell list. It must complete before any pipeline
/// group runs against the current positions; the solver calls it once
/// per integrator stage that moves particles.
#[derive(Debug)]
pub struct DomainManager {
    boxx: DomainBox,
    radius: f64,
    ghosts: IndexMap<String, GhostLayer>,
    indexes: IndexMap<String, SourceIndex>,
}

impl DomainManager {
    /// Create a manager, running the ghost-extent setup check.
    ///
    /// `h_max` is the largest smoothing length any collection uses;
    /// the interaction radius becomes the kernel support radius there.
    pub fn new(boxx: DomainBox, kernel: &dyn Kernel, h_max: f64) -> Result<Self, DomainError> {
        boxx.validate_support(kernel, h_max)?;
        Ok(Self {
            boxx,
            radius: kernel.support_radius(h_max),
            ghosts: IndexMap::new(),
            indexes: IndexMap::new(),
        })
    }

    /// The periodic box.
    pub fn domain(&self) -> &DomainBox {
        &self.boxx
    }

    /// Interaction radius used for neighbor queries.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Wrap, regenerate ghosts, and rebuild indexes for every collection.
    ///
    /// Previous ghost layers and indexes are discarded wholesale —
    /// ghosts are never updated incrementally or reused across stages.
    pub fn update(&mut self, system: &mut ParticleSystem) -> Result<(), DomainError> {
        self.ghosts.clear();
        self.indexes.clear();
        for collection in system.iter_mut() {
            self.boxx.wrap(collection)?;
        }
        for collection in system.iter() {
            let layer = self.boxx.refresh_ghosts(collection)?;
            let index = SourceIndex::build(collection, &layer, self.radius)?;
            self.ghosts.insert(collection.name().to_string(), layer);
            self.indexes.insert(collection.name().to_string(), index);
        }
        Ok(())
    }

    /// Neighbor index of a collection, if refreshed this stage.
    pub fn index(&self, collection: &str) -> Option<&SourceIndex> {
        self.indexes.get(collection)
    }

    /// Ghost layer of a collection, if refreshed this stage.
    pub fn ghosts(&self, collection: &str) -> Option<&GhostLayer> {
        self.ghosts.get(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_core::QuinticSpline;
    use silt_particles::CollectionBuilder;

    fn two_collection_system() -> ParticleSystem {
        let mut sys = ParticleSystem::new();
        let mut fluid = CollectionBuilder::new("fluid").build(2).unwrap();
        fluid.set_scalar("x", &[0.02, 1.3]).unwrap();
        fluid.set_scalar("y", &[0.5, 0.5]).unwrap();
        let mut solid = CollectionBuilder::new("solid").build(1).unwrap();
        solid.set_scalar("x", &[0.5]).unwrap();
        solid.set_scalar("y", &[0.98]).unwrap();
        sys.add(fluid).unwrap();
        sys.add(solid).unwrap();
        sys
    }

    fn manager() -> DomainManager {
        let b = DomainBox::new(0.0, 1.0, 0.0, 1.0, true, true, 0.2).unwrap();
        // Support 3h = 0.15 fits inside the 0.2 ghost layer.
        DomainManager::new(b, &QuinticSpline, 0.05).unwrap()
    }

    #[test]
    fn construction_enforces_support_check() {
        let b = DomainBox::new(0.0, 1.0, 0.0, 1.0, true, true, 0.2).unwrap();
        assert!(matches!(
            DomainManager::new(b, &QuinticSpline, 0.1),
            Err(DomainError::GhostLayerTooThin { .. })
        ));
    }

    #[test]
    fn update_wraps_then_indexes_everything() {
        let mut sys = two_collection_system();
        let mut dm = manager();
        dm.update(&mut sys).unwrap();

        // The out-of-box fluid particle was wrapped to 0.3.
        let x = sys.collection("fluid").unwrap().scalar("x").unwrap()[1];
        assert!((x - 0.3).abs() < 1e-12);

        // Both collections got ghosts and indexes.
        assert!(dm.index("fluid").is_some());
        assert!(dm.index("solid").is_some());
        // Fluid particle at x = 0.02 is in the boundary band.
        assert_eq!(dm.ghosts("fluid").unwrap().len(), 1);
        // Solid particle at y = 0.98 likewise.
        assert_eq!(dm.ghosts("solid").unwrap().len(), 1);
    }

    #[test]
    fn update_discards_previous_step_state() {
        let mut sys = two_collection_system();
        let mut dm = manager();
        dm.update(&mut sys).unwrap();

        // Move the boundary fluid particle to the interior and refresh.
        sys.collection_mut("fluid")
            .unwrap()
            .scalar_mut("x")
            .unwrap()[0] = 0.5;
        dm.update(&mut sys).unwrap();
        assert!(dm.ghosts("fluid").unwrap().is_empty());
    }

    #[test]
    fn double_update_is_idempotent_for_fixed_positions() {
        let mut sys = two_collection_system();
        let mut dm = manager();
        dm.update(&mut sys).unwrap();
        let first = dm.ghosts("fluid").unwrap().clone();
        dm.update(&mut sys).unwrap();
        assert_eq!(&first, dm.ghosts("fluid").unwrap());
    }
}
