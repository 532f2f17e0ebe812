//! Per-equation view of the system during one group evaluation.

use crate::equation::WriteMode;
use indexmap::IndexMap;
use silt_core::{EquationError, Kernel};
use silt_domain::{DomainManager, Neighbor};
use silt_particles::ParticleSystem;
use smallvec::SmallVec;

/// Staged write buffers for one group, keyed by collection and property.
///
/// `Assign` buffers are seeded from the committed property; `Accumulate`
/// buffers start at zero. All buffers commit together at the group
/// barrier, so no equation in the group observes another's writes.
#[derive(Debug, Default)]
pub(crate) struct GroupStaging {
    buffers: IndexMap<(String, String), StagedBuffer>,
}

#[derive(Debug)]
pub(crate) struct StagedBuffer {
    pub(crate) mode: WriteMode,
    pub(crate) data: Vec<f64>,
}

impl GroupStaging {
    pub(crate) fn has(&self, collection: &str, property: &str) -> bool {
        self.buffers
            .contains_key(&(collection.to_string(), property.to_string()))
    }

    pub(crate) fn insert(
        &mut self,
        collection: &str,
        property: &str,
        mode: WriteMode,
        data: Vec<f64>,
    ) {
        self.buffers
            .insert((collection.to_string(), property.to_string()), StagedBuffer { mode, data });
    }

    pub(crate) fn drain(self) -> impl Iterator<Item = ((String, String), Vec<f64>)> {
        self.buffers.into_iter().map(|(key, buf)| (key, buf.data))
    }

    fn get_mut(&mut self, collection: &str, property: &str) -> Option<&mut StagedBuffer> {
        self.buffers
            .get_mut(&(collection.to_string(), property.to_string()))
    }
}

/// Everything one equation may touch while it runs.
///
/// Reads come from the state committed before the group started; writes
/// go to the group's staging buffers through [`assign`](Self::assign)
/// and [`accumulate`](Self::accumulate). Read borrows outlive the scope
/// borrow itself, so an equation can hold source slices across its
/// publish calls.
pub struct EquationScope<'a> {
    system: &'a ParticleSystem,
    domain: &'a DomainManager,
    kernel: &'a dyn Kernel,
    dest: &'a str,
    sources: &'a [String],
    time: f64,
    staging: &'a mut GroupStaging,
}

impl<'a> EquationScope<'a> {
    pub(crate) fn new(
        system: &'a ParticleSystem,
        domain: &'a DomainManager,
        kernel: &'a dyn Kernel,
        dest: &'a str,
        sources: &'a [String],
        time: f64,
        staging: &'a mut GroupStaging,
    ) -> Self {
        Self {
            system,
            domain,
            kernel,
            dest,
            sources,
            time,
            staging,
        }
    }

    /// Particle count of the destination collection.
    pub fn dest_len(&self) -> Result<usize, EquationError> {
        Ok(self
            .system
            .collection(self.dest)
            .map_err(execution)?
            .len())
    }

    /// Number of declared source collections.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Read a destination property as committed before the group.
    pub fn read_dest(&self, property: &str) -> Result<&'a [f64], EquationError> {
        self.system
            .collection(self.dest)
            .and_then(|c| c.scalar(property))
            .map_err(execution)
    }

    /// Read a property of the `source`-th declared source collection.
    pub fn read_source(&self, source: usize, property: &str) -> Result<&'a [f64], EquationError> {
        let name = self.source_name(source)?;
        self.system
            .collection(name)
            .and_then(|c| c.scalar(property))
            .map_err(execution)
    }

    /// Neighbors of `(x, y)` within the `source`-th source collection.
    ///
    /// Hits through periodic ghost images carry the image displacement
    /// but the real particle's index, so property reads through
    /// [`read_source`](Self::read_source) are never stale.
    pub fn neighbors(
        &self,
        source: usize,
        x: f64,
        y: f64,
    ) -> Result<SmallVec<[Neighbor; 32]>, EquationError> {
        let name = self.source_name(source)?;
        let index = self.domain.index(name).ok_or_else(|| EquationError::ExecutionFailed {
            reason: format!("no neighbor index for '{name}'; domain not refreshed"),
        })?;
        Ok(index.query(x, y))
    }

    /// The smoothing kernel.
    pub fn kernel(&self) -> &'a dyn Kernel {
        self.kernel
    }

    /// Simulation time of this evaluation.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Publish a buffer into a declared `Assign` slot on the destination.
    pub fn assign(&mut self, property: &str, values: &[f64]) -> Result<(), EquationError> {
        let dest = self.dest;
        let buffer = self.staged(property, WriteMode::Assign)?;
        if buffer.data.len() != values.len() {
            return Err(EquationError::ExecutionFailed {
                reason: format!(
                    "published '{property}' on '{dest}' with length {}, expected {}",
                    values.len(),
                    buffer.data.len()
                ),
            });
        }
        buffer.data.copy_from_slice(values);
        Ok(())
    }

    /// Add a buffer into a declared `Accumulate` slot on the destination.
    pub fn accumulate(&mut self, property: &str, values: &[f64]) -> Result<(), EquationError> {
        let dest = self.dest;
        let buffer = self.staged(property, WriteMode::Accumulate)?;
        if buffer.data.len() != values.len() {
            return Err(EquationError::ExecutionFailed {
                reason: format!(
                    "published '{property}' on '{dest}' with length {}, expected {}",
                    values.len(),
                    buffer.data.len()
                ),
            });
        }
        for (slot, value) in buffer.data.iter_mut().zip(values) {
            *slot += value;
        }
        Ok(())
    }

    fn source_name(&self, source: usize) -> Result<&'a String, EquationError> {
        self.sources
            .get(source)
            .ok_or_else(|| EquationError::ExecutionFailed {
                reason: format!("source index {source} out of range"),
            })
    }

    fn staged(
        &mut self,
        property: &str,
        mode: WriteMode,
    ) -> Result<&mut StagedBuffer, EquationError> {
        let dest = self.dest;
        let buffer = self.staging.get_mut(dest, property).ok_or_else(|| {
            EquationError::ExecutionFailed {
                reason: format!("write to '{property}' on '{dest}' was not declared"),
            }
        })?;
        if buffer.mode != mode {
            return Err(EquationError::ExecutionFailed {
                reason: format!(
                    "'{property}' on '{dest}' is staged as {}, published as {mode}",
                    buffer.mode
                ),
            });
        }
        Ok(buffer)
    }
}

fn execution(e: silt_core::SchemaError) -> EquationError {
    EquationError::ExecutionFailed {
        reason: e.to_string(),
    }
}
