//! Incompressible viscous flow past a periodic lattice of cylinders.
//!
//! The reference benchmark: a unit cell of the cylinder lattice at
//! Re = 1, driven by a uniform body force. Runs a short stretch of the
//! flow at a coarsened resolution and prints the peak velocity as the
//! forcing spins the fluid up.

use silt::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reference quantities of the benchmark, coarsened to 50 particles
    // per side so the example finishes quickly.
    let mut config = FlowConfig::default();
    config.dx = config.length / 50.0;
    config.validate()?;

    let dx = config.dx;
    let ghost_extent = 5.0 * 1.5 * dx;
    let half = 0.5 * config.length;

    // One cell-centered lattice over the unit cell; the cylinder is
    // carved out of it below. Both halves share one schema carrying the
    // fluid and wall properties.
    let n = (config.length / dx).round() as usize;
    let mut xs = Vec::with_capacity(n * n);
    let mut ys = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            xs.push((i as f64 + 0.5) * dx);
            ys.push((j as f64 + 0.5) * dx);
        }
    }

    let mut all = fluid_schema("fluid")
        .with_zeroed(&["wij", "uf", "vf", "ug", "vg"])
        .build(n * n)?;
    all.set_scalar("x", &xs)?;
    all.set_scalar("y", &ys)?;
    all.fill("m", config.rho0 * dx * dx)?;
    all.fill("h", config.h())?;
    all.fill("rho", config.rho0)?;

    // The cylinder sits at the cell center.
    let (mut solid, fluid) = all.partition(|x, y| {
        let (cx, cy) = (x - half, y - half);
        (cx * cx + cy * cy).sqrt() <= config.obstacle_radius
    });
    solid.rename("solid");
    fluid.require_non_empty()?;
    solid.require_non_empty()?;
    println!(
        "lattice cylinders: {} fluid, {} solid, dx = {dx:.2e}, h = {:.2e}",
        fluid.len(),
        solid.len(),
        config.h()
    );

    let mut system = ParticleSystem::new();
    system.add(fluid)?;
    system.add(solid)?;

    let boxx = DomainBox::new(
        0.0,
        config.length,
        0.0,
        config.height,
        true,
        true,
        ghost_extent,
    )?;
    let mut domain = DomainManager::new(boxx, &QuinticSpline, config.h())?;
    domain.update(&mut system)?;

    let pipeline = standard_pipeline(&config, "fluid", "solid");
    let mut solver = Solver::new(&config, system, domain, pipeline, "fluid")?;
    println!(
        "dt = {:.4e} (bounds: {:?})",
        solver.dt(),
        TimestepBounds::from_config(&config)
    );

    solver.on_output(
        5,
        Box::new(|step, t, system| {
            let fluid = system.collection("fluid").unwrap();
            let vmax = fluid
                .scalar("vmag2")
                .unwrap()
                .iter()
                .fold(0.0f64, |a, &b| a.max(b))
                .sqrt();
            println!("step {step:4}  t = {t:10.4}  |v|max = {vmax:.4e}");
        }),
    );

    solver.run_until(25.0 * solver.dt())?;

    let fluid = solver.system().collection("fluid").unwrap();
    let vmax = fluid
        .scalar("vmag2")
        .unwrap()
        .iter()
        .fold(0.0f64, |a, &b| a.max(b))
        .sqrt();
    println!(
        "done after {} steps: t = {:.4}, |v|max = {vmax:.4e} (u_ref = {:.1e})",
        solver.steps(),
        solver.time(),
        config.u_ref
    );
    Ok(())
}
