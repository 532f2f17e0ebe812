//! The equation trait and its declaration vocabulary.

use crate::scope::EquationScope;
use silt_core::EquationError;
use std::fmt;

/// How an equation publishes a destination property at the group barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Sole writer: the published buffer replaces the property.
    ///
    /// Two `Assign` writers (or an `Assign` next to an `Accumulate`) on
    /// the same property in one group is a configuration error.
    Assign,
    /// Shared writer: contributions sum into a zero-seeded buffer.
    ///
    /// Any number of `Accumulate` writers may share a property; the sum
    /// is associative, so their order within the group is irrelevant.
    Accumulate,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign => write!(f, "assign"),
            Self::Accumulate => write!(f, "accumulate"),
        }
    }
}

/// The fixed stages of one acceleration evaluation.
///
/// Groups must be pushed in strictly ascending stage order: densities
/// before the state equation, extrapolated wall velocities before the
/// wall pressure, everything before the momentum sums.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Summation densities and particle volumes.
    Density,
    /// Equation of state plus wall-velocity extrapolation.
    StateAndExtrapolation,
    /// Wall pressure boundary condition.
    BoundaryCondition,
    /// Momentum accelerations.
    Momentum,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Density => write!(f, "density"),
            Self::StateAndExtrapolation => write!(f, "state-and-extrapolation"),
            Self::BoundaryCondition => write!(f, "boundary-condition"),
            Self::Momentum => write!(f, "momentum"),
        }
    }
}

/// Whether a group needs remote (ghost-side) data that earlier groups
/// have not already fully resolved.
///
/// Ghost images read through to their live source particles, so both
/// variants execute identically here; the flag is checked pipeline
/// structure, and records which groups would need a ghost refresh
/// under a copying ghost implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locality {
    /// Draws remote contributions not yet settled by earlier groups.
    WithRemote,
    /// Consumes only per-particle state and quantities fully resolved
    /// by the groups before it.
    Local,
}

/// One interaction or per-particle equation.
///
/// Equations declare everything they touch up front: the destination
/// collection, the source collections their neighbor sums draw from,
/// and the properties they read and write. The pipeline validates the
/// declarations once at compile time and never again.
///
/// `compute` sees the state committed before its group started and
/// publishes through the scope; nothing an equation publishes is
/// visible to its own group.
pub trait Equation: Send {
    /// Diagnostic name, used in error reports.
    fn name(&self) -> &str;

    /// Destination collection the equation writes.
    fn dest(&self) -> &str;

    /// Source collections the neighbor sums draw from.
    ///
    /// Empty for per-particle equations.
    fn sources(&self) -> &[String];

    /// Properties read from the destination collection.
    fn reads_dest(&self) -> &'static [&'static str] {
        &[]
    }

    /// Properties read from every source collection.
    fn reads_source(&self) -> &'static [&'static str] {
        &[]
    }

    /// Properties written on the destination, with their write modes.
    fn writes(&self) -> &'static [(&'static str, WriteMode)];

    /// Evaluate the equation against the pre-group state.
    fn compute(&self, scope: &mut EquationScope<'_>) -> Result<(), EquationError>;
}

/// An ordered set of equations sharing one barrier.
///
/// Every equation in a group reads the state committed before the group
/// started; all published buffers commit together when the last
/// equation finishes.
pub struct Group {
    stage: Stage,
    locality: Locality,
    equations: Vec<Box<dyn Equation>>,
}

impl Group {
    /// Create an empty group at the given stage.
    pub fn new(stage: Stage, locality: Locality) -> Self {
        Self {
            stage,
            locality,
            equations: Vec::new(),
        }
    }

    /// Append an equation.
    pub fn with(mut self, equation: Box<dyn Equation>) -> Self {
        self.equations.push(equation);
        self
    }

    /// The group's stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The group's declared locality.
    pub fn locality(&self) -> Locality {
        self.locality
    }

    /// The group's equations, in insertion order.
    pub fn equations(&self) -> &[Box<dyn Equation>] {
        &self.equations
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("stage", &self.stage)
            .field("locality", &self.locality)
            .field(
                "equations",
                &self
                    .equations
                    .iter()
                    .map(|e| e.name().to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_order_as_evaluation_order() {
        assert!(Stage::Density < Stage::StateAndExtrapolation);
        assert!(Stage::StateAndExtrapolation < Stage::BoundaryCondition);
        assert!(Stage::BoundaryCondition < Stage::Momentum);
    }

    #[test]
    fn stage_display_is_kebab_case() {
        assert_eq!(Stage::StateAndExtrapolation.to_string(), "state-and-extrapolation");
    }
}
