//! Pipeline compilation and group-barrier evaluation.

use crate::equation::{Group, Stage, WriteMode};
use crate::scope::{EquationScope, GroupStaging};
use indexmap::IndexMap;
use silt_core::{EquationError, Kernel, SchemaError};
use silt_domain::{DomainError, DomainManager};
use silt_particles::ParticleSystem;
use std::error::Error;
use std::fmt;

/// Errors from [`Pipeline::compile`].
///
/// Everything here is a configuration mistake; compilation runs once at
/// setup and a compiled pipeline is never re-validated.
#[derive(Clone, Debug)]
pub enum PipelineError {
    /// The pipeline has no groups.
    EmptyPipeline,
    /// A group has no equations.
    EmptyGroup {
        /// Stage of the offending group.
        stage: Stage,
    },
    /// Groups were pushed out of stage order.
    StageOrder {
        /// Stage of the earlier group.
        previous: Stage,
        /// Stage that arrived at or before it.
        next: Stage,
    },
    /// An equation's declarations do not resolve against the system.
    Schema {
        /// Name of the offending equation.
        equation: String,
        /// The unresolved declaration.
        source: SchemaError,
    },
    /// Two equations in one group write the same property and at least
    /// one of them assigns.
    WriteConflict {
        /// Collection carrying the contested property.
        collection: String,
        /// The contested property.
        property: String,
        /// Name of the first writer.
        first: String,
        /// Name of the second writer.
        second: String,
    },
    /// The kernel support at the largest smoothing length exceeds the
    /// ghost layer.
    Domain(DomainError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPipeline => write!(f, "pipeline has no groups"),
            Self::EmptyGroup { stage } => write!(f, "group at stage '{stage}' has no equations"),
            Self::StageOrder { previous, next } => {
                write!(
                    f,
                    "group at stage '{next}' pushed after stage '{previous}'; \
                     stages must strictly ascend"
                )
            }
            Self::Schema { equation, source } => {
                write!(f, "equation '{equation}': {source}")
            }
            Self::WriteConflict {
                collection,
                property,
                first,
                second,
            } => {
                write!(
                    f,
                    "equations '{first}' and '{second}' both write '{property}' \
                     on '{collection}' in one group"
                )
            }
            Self::Domain(e) => write!(f, "domain: {e}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema { source, .. } => Some(source),
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DomainError> for PipelineError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

/// Errors from [`CompiledPipeline::run`].
#[derive(Clone, Debug)]
pub enum EvaluateError {
    /// An equation failed while computing.
    EquationFailed {
        /// Name of the failing equation.
        equation: String,
        /// Stage of its group.
        stage: Stage,
        /// The underlying failure.
        source: EquationError,
    },
    /// A staged commit touched an undeclared property or collection.
    ///
    /// Compilation rules this out for declared writes; it survives only
    /// for systems mutated between compile and run.
    Schema(SchemaError),
}

impl fmt::Display for EvaluateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EquationFailed {
                equation,
                stage,
                source,
            } => {
                write!(f, "equation '{equation}' in stage '{stage}': {source}")
            }
            Self::Schema(e) => write!(f, "schema: {e}"),
        }
    }
}

impl Error for EvaluateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EquationFailed { source, .. } => Some(source),
            Self::Schema(e) => Some(e),
        }
    }
}

impl From<SchemaError> for EvaluateError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

/// An ordered list of equation groups awaiting validation.
pub struct Pipeline {
    kernel: Box<dyn Kernel>,
    groups: Vec<Group>,
}

impl Pipeline {
    /// Start an empty pipeline evaluating with the given kernel.
    pub fn new(kernel: Box<dyn Kernel>) -> Self {
        Self {
            kernel,
            groups: Vec::new(),
        }
    }

    /// Append a group.
    pub fn push(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// The groups pushed so far, in order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Validate every declaration and seal the pipeline.
    ///
    /// Checks, in order: the pipeline and every group are non-empty,
    /// stages strictly ascend, every declared collection and property
    /// resolves against `system`, no write conflicts exist within any
    /// group, and the ghost layer covers the kernel support at the
    /// largest smoothing length present.
    pub fn compile(
        self,
        system: &ParticleSystem,
        domain: &DomainManager,
    ) -> Result<CompiledPipeline, PipelineError> {
        if self.groups.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }
        for pair in self.groups.windows(2) {
            if pair[1].stage() <= pair[0].stage() {
                return Err(PipelineError::StageOrder {
                    previous: pair[0].stage(),
                    next: pair[1].stage(),
                });
            }
        }

        for group in &self.groups {
            if group.equations().is_empty() {
                return Err(PipelineError::EmptyGroup {
                    stage: group.stage(),
                });
            }
            Self::check_declarations(system, group)?;
            Self::check_write_conflicts(group)?;
        }

        let mut h_max = f64::NEG_INFINITY;
        for collection in system.iter() {
            for &h in collection.scalar("h").map_err(|source| {
                PipelineError::Schema {
                    equation: "<support check>".into(),
                    source,
                }
            })? {
                h_max = h_max.max(h);
            }
        }
        if h_max.is_finite() {
            domain.domain().validate_support(self.kernel.as_ref(), h_max)?;
        }

        Ok(CompiledPipeline {
            kernel: self.kernel,
            groups: self.groups,
        })
    }

    fn check_declarations(system: &ParticleSystem, group: &Group) -> Result<(), PipelineError> {
        for eq in group.equations() {
            let wrap = |source: SchemaError| PipelineError::Schema {
                equation: eq.name().to_string(),
                source,
            };
            let dest = system.collection(eq.dest()).map_err(wrap)?;
            for property in eq.reads_dest() {
                dest.scalar(property).map_err(wrap)?;
            }
            for (property, _) in eq.writes() {
                dest.scalar(property).map_err(wrap)?;
            }
            for name in eq.sources() {
                let source = system.collection(name).map_err(wrap)?;
                for property in eq.reads_source() {
                    source.scalar(property).map_err(wrap)?;
                }
            }
        }
        Ok(())
    }

    fn check_write_conflicts(group: &Group) -> Result<(), PipelineError> {
        let mut writers: IndexMap<(String, String), (WriteMode, String)> = IndexMap::new();
        for eq in group.equations() {
            for &(property, mode) in eq.writes() {
                let key = (eq.dest().to_string(), property.to_string());
                match writers.get(&key) {
                    None => {
                        writers.insert(key, (mode, eq.name().to_string()));
                    }
                    Some((prior_mode, prior)) => {
                        if *prior_mode == WriteMode::Assign || mode == WriteMode::Assign {
                            return Err(PipelineError::WriteConflict {
                                collection: key.0,
                                property: key.1,
                                first: prior.clone(),
                                second: eq.name().to_string(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("groups", &self.groups).finish()
    }
}

/// A validated pipeline, ready for repeated evaluation.
pub struct CompiledPipeline {
    kernel: Box<dyn Kernel>,
    groups: Vec<Group>,
}

impl CompiledPipeline {
    /// The kernel the pipeline evaluates with.
    pub fn kernel(&self) -> &dyn Kernel {
        self.kernel.as_ref()
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Evaluate every group against the current positions.
    ///
    /// The caller must have refreshed `domain` since positions last
    /// moved. Each group reads the state committed before it started;
    /// its staged writes commit at the group barrier, so later groups
    /// observe them and ghost images mirror them immediately.
    pub fn run(
        &self,
        system: &mut ParticleSystem,
        domain: &DomainManager,
        time: f64,
    ) -> Result<(), EvaluateError> {
        for group in &self.groups {
            let mut staging = GroupStaging::default();
            for eq in group.equations() {
                let dest = system.collection(eq.dest())?;
                for &(property, mode) in eq.writes() {
                    if staging.has(eq.dest(), property) {
                        continue;
                    }
                    let data = match mode {
                        WriteMode::Assign => dest.scalar(property)?.to_vec(),
                        WriteMode::Accumulate => vec![0.0; dest.len()],
                    };
                    staging.insert(eq.dest(), property, mode, data);
                }
            }

            for eq in group.equations() {
                let mut scope = EquationScope::new(
                    system,
                    domain,
                    self.kernel.as_ref(),
                    eq.dest(),
                    eq.sources(),
                    time,
                    &mut staging,
                );
                eq.compute(&mut scope)
                    .map_err(|source| EvaluateError::EquationFailed {
                        equation: eq.name().to_string(),
                        stage: group.stage(),
                        source,
                    })?;
            }

            for ((collection, property), data) in staging.drain() {
                system.collection_mut(&collection)?.set_scalar(&property, &data)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CompiledPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPipeline")
            .field("groups", &self.groups)
            .finish()
    }
}
