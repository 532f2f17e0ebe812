//! Solver loop on a small quiescent lattice with an obstacle.

use silt_core::{FlowConfig, QuinticSpline};
use silt_domain::{DomainBox, DomainManager};
use silt_particles::{ParticleCollection, ParticleSystem};
use silt_solver::{Solver, SolverError, TimestepBounds};
use silt_sph::{fluid_schema, solid_schema, standard_pipeline};
use std::cell::RefCell;
use std::rc::Rc;

fn config() -> FlowConfig {
    FlowConfig {
        length: 1.0,
        height: 1.0,
        rho0: 1000.0,
        c0: 0.1,
        u_ref: 0.01,
        nu: 1e-4,
        fx: 1e-4,
        fy: 0.0,
        dx: 0.05,
        hdx: 1.0,
        b: 1.0,
        obstacle_radius: 0.15,
        tf: 1.0,
    }
}

fn seed(collection: &mut ParticleCollection, pts: &[(f64, f64)], config: &FlowConfig) {
    let xs: Vec<f64> = pts.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = pts.iter().map(|p| p.1).collect();
    collection.set_scalar("x", &xs).unwrap();
    collection.set_scalar("y", &ys).unwrap();
    collection
        .fill("m", config.rho0 * config.dx * config.dx)
        .unwrap();
    collection.fill("h", config.h()).unwrap();
    collection.fill("rho", config.rho0).unwrap();
}

fn quiescent_setup(config: &FlowConfig) -> (ParticleSystem, DomainManager) {
    let n = 20;
    let mut fluid_pts = Vec::new();
    let mut solid_pts = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let x = (i as f64 + 0.5) * config.dx;
            let y = (j as f64 + 0.5) * config.dx;
            let (cx, cy) = (x - 0.5, y - 0.5);
            if (cx * cx + cy * cy).sqrt() < config.obstacle_radius {
                solid_pts.push((x, y));
            } else {
                fluid_pts.push((x, y));
            }
        }
    }

    let mut fluid = fluid_schema("fluid").build(fluid_pts.len()).unwrap();
    seed(&mut fluid, &fluid_pts, config);
    let mut solid = solid_schema("solid").build(solid_pts.len()).unwrap();
    seed(&mut solid, &solid_pts, config);

    let mut sys = ParticleSystem::new();
    sys.add(fluid).unwrap();
    sys.add(solid).unwrap();

    let b = DomainBox::new(0.0, 1.0, 0.0, 1.0, true, true, 0.2).unwrap();
    let mut dm = DomainManager::new(b, &QuinticSpline, config.h()).unwrap();
    dm.update(&mut sys).unwrap();
    (sys, dm)
}

fn solver(config: &FlowConfig) -> Solver {
    let (sys, dm) = quiescent_setup(config);
    let pipeline = standard_pipeline(config, "fluid", "solid");
    Solver::new(config, sys, dm, pipeline, "fluid").unwrap()
}

#[test]
fn quiescent_lattice_steps_stay_finite() {
    let config = config();
    let mut solver = solver(&config);
    for _ in 0..5 {
        solver.step().unwrap();
    }
    assert_eq!(solver.steps(), 5);
    assert!((solver.time() - 5.0 * solver.dt()).abs() < 1e-12);

    let fluid = solver.system().collection("fluid").unwrap();
    for prop in ["x", "y", "u", "v", "rho", "p", "vmag2"] {
        for &value in fluid.scalar(prop).unwrap() {
            assert!(value.is_finite(), "{prop} diverged");
        }
    }
    // Gentle forcing: nothing should approach the sound speed.
    for &vmag2 in fluid.scalar("vmag2").unwrap() {
        assert!(vmag2.sqrt() < config.c0);
    }
    // Positions stay wrapped, up to the sub-step drift after the last
    // correct (the next evaluate would wrap it).
    for &x in fluid.scalar("x").unwrap() {
        assert!((-0.01..1.01).contains(&x), "x = {x}");
    }
}

#[test]
fn body_force_sets_fluid_in_motion() {
    let config = config();
    let mut solver = solver(&config);
    for _ in 0..3 {
        solver.step().unwrap();
    }
    let fluid = solver.system().collection("fluid").unwrap();
    let mean_u: f64 =
        fluid.scalar("u").unwrap().iter().sum::<f64>() / fluid.len() as f64;
    assert!(mean_u > 0.0, "mean u = {mean_u}");
}

#[test]
fn walls_never_move() {
    let config = config();
    let mut solver = solver(&config);
    let before = solver
        .system()
        .collection("solid")
        .unwrap()
        .scalar("x")
        .unwrap()
        .to_vec();
    for _ in 0..3 {
        solver.step().unwrap();
    }
    let after = solver.system().collection("solid").unwrap();
    assert_eq!(after.scalar("x").unwrap(), before.as_slice());
    assert_eq!(after.scalar("u").unwrap(), vec![0.0; after.len()].as_slice());
}

#[test]
fn run_until_stops_on_time() {
    let config = config();
    let mut solver = solver(&config);
    let dt = solver.dt();
    solver.run_until(3.2 * dt).unwrap();
    // A fractional target takes the step that crosses it; the loop
    // never stops short of the requested time.
    assert_eq!(solver.steps(), 4);
    assert!(solver.time() >= 3.2 * dt);
}

#[test]
fn run_reaches_final_time() {
    let mut config = config();
    let dt = TimestepBounds::from_config(&config).dt();
    config.tf = 3.3 * dt;
    let mut solver = solver(&config);
    solver.run().unwrap();
    assert!(
        solver.time() >= config.tf,
        "stopped at t = {} with tf = {}",
        solver.time(),
        config.tf
    );
    assert_eq!(solver.steps(), 4);
}

#[test]
fn output_hook_fires_on_schedule() {
    let config = config();
    let mut solver = solver(&config);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    solver.on_output(
        2,
        Box::new(move |step, _, _| sink.borrow_mut().push(step)),
    );
    for _ in 0..5 {
        solver.step().unwrap();
    }
    assert_eq!(*seen.borrow(), vec![2, 4]);
}

#[test]
fn divergence_is_fatal_and_named() {
    let config = config();
    let (mut sys, dm) = quiescent_setup(&config);
    sys.collection_mut("fluid")
        .unwrap()
        .scalar_mut("u")
        .unwrap()[7] = f64::NAN;
    let pipeline = standard_pipeline(&config, "fluid", "solid");
    let mut solver = Solver::new(&config, sys, dm, pipeline, "fluid").unwrap();

    match solver.step() {
        Err(SolverError::NonFinite {
            collection,
            property,
            index,
            ..
        }) => {
            assert_eq!(collection, "fluid");
            assert_eq!(property, "u");
            assert_eq!(index, 7);
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}

#[test]
fn empty_fluid_rejected_at_construction() {
    let config = config();
    let b = DomainBox::new(0.0, 1.0, 0.0, 1.0, true, true, 0.2).unwrap();
    let mut dm = DomainManager::new(b, &QuinticSpline, config.h()).unwrap();
    let mut sys = ParticleSystem::new();
    sys.add(fluid_schema("fluid").build(0).unwrap()).unwrap();
    let mut solid = solid_schema("solid").build(1).unwrap();
    solid.set_scalar("x", &[0.5]).unwrap();
    solid.set_scalar("y", &[0.5]).unwrap();
    sys.add(solid).unwrap();
    dm.update(&mut sys).unwrap();

    let pipeline = standard_pipeline(&config, "fluid", "solid");
    assert!(matches!(
        Solver::new(&config, sys, dm, pipeline, "fluid"),
        Err(SolverError::Schema(_))
    ));
}
