//! The standard four-group pipeline and its collection schemas.

use crate::equation::{Group, Locality, Stage};
use crate::equations::{
    MomentumEquationArtificialStress, MomentumEquationPressureGradient, MomentumEquationViscosity,
    SetWallVelocity, SolidWallNoSlipBC, SolidWallPressureBC, StateEquation, SummationDensity,
};
use crate::pipeline::Pipeline;
use silt_core::{FlowConfig, QuinticSpline};
use silt_particles::CollectionBuilder;

/// Schema for a fluid collection.
///
/// Standard kinematics plus the number density, advection velocities,
/// the two acceleration pairs, and the squared velocity magnitude
/// maintained by the integrator.
pub fn fluid_schema(name: impl Into<String>) -> CollectionBuilder {
    CollectionBuilder::new(name).with_zeroed(&[
        "V", "uhat", "vhat", "au", "av", "auhat", "avhat", "vmag2",
    ])
}

/// Schema for a solid (wall) collection.
///
/// Standard kinematics plus the number density and the wall
/// extrapolation buffers: the Shepard weight sum, the filtered fluid
/// velocity, and the dummy no-slip velocity.
pub fn solid_schema(name: impl Into<String>) -> CollectionBuilder {
    CollectionBuilder::new(name).with_zeroed(&["V", "wij", "uf", "vf", "ug", "vg"])
}

/// The transport-velocity pipeline for one fluid moving past one wall.
///
/// Four groups: summation density on both collections; the state
/// equation and wall-velocity extrapolation; the wall pressure; and the
/// momentum sums (pressure gradient, fluid viscosity, wall no-slip
/// friction, artificial stress). Reference quantities come from the
/// flow configuration; the body force enters both the fluid momentum
/// balance and the wall pressure's hydrostatic correction.
pub fn standard_pipeline(config: &FlowConfig, fluid: &str, solid: &str) -> Pipeline {
    let p0 = config.p0();
    let mut pipeline = Pipeline::new(Box::new(QuinticSpline));

    pipeline.push(
        Group::new(Stage::Density, Locality::WithRemote)
            .with(Box::new(SummationDensity::new(fluid, &[fluid, solid])))
            .with(Box::new(SummationDensity::new(solid, &[fluid, solid]))),
    );

    pipeline.push(
        Group::new(Stage::StateAndExtrapolation, Locality::WithRemote)
            .with(Box::new(StateEquation::new(fluid, p0, config.rho0, config.b)))
            .with(Box::new(SetWallVelocity::new(solid, &[fluid]))),
    );

    pipeline.push(
        Group::new(Stage::BoundaryCondition, Locality::WithRemote).with(Box::new(
            SolidWallPressureBC::new(
                solid,
                &[fluid],
                config.rho0,
                p0,
                config.b,
                config.fx,
                config.fy,
            ),
        )),
    );

    // Every quantity the momentum sums read (rho, p, V, the dummy
    // velocities) is committed by the groups above, so this final
    // stage needs no remote refresh of its own.
    pipeline.push(
        Group::new(Stage::Momentum, Locality::Local)
            .with(Box::new(MomentumEquationPressureGradient::new(
                fluid,
                &[fluid, solid],
                p0,
                config.fx,
                config.fy,
                0.0,
            )))
            .with(Box::new(MomentumEquationViscosity::new(
                fluid,
                &[fluid],
                config.nu,
            )))
            .with(Box::new(SolidWallNoSlipBC::new(fluid, &[solid], config.nu)))
            .with(Box::new(MomentumEquationArtificialStress::new(
                fluid,
                &[fluid],
            ))),
    );

    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_and_locality_flags_match_the_flow_regime() {
        let pipeline = standard_pipeline(&FlowConfig::default(), "fluid", "solid");
        let flags: Vec<_> = pipeline
            .groups()
            .iter()
            .map(|g| (g.stage(), g.locality()))
            .collect();
        assert_eq!(
            flags,
            vec![
                (Stage::Density, Locality::WithRemote),
                (Stage::StateAndExtrapolation, Locality::WithRemote),
                (Stage::BoundaryCondition, Locality::WithRemote),
                // The momentum sums consume only committed upstream
                // state, so the final group is local-only.
                (Stage::Momentum, Locality::Local),
            ]
        );
    }
}
