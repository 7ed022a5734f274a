// demos/hover.rs

use twin_rotor_sim::{tick, SimConfig, SimError, SimulationState};

fn main() -> Result<(), SimError> {
    // An optional JSON or YAML file overrides the defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::<f64>::from_path(path)?,
        None => SimConfig::default(),
    };

    let mut sim = SimulationState::new(config)?;
    {
        let controller = sim.controller_mut();
        controller.set_rate_stabilization(true);
        controller.set_attitude_stabilization(true)?;
        controller.set_altitude_stabilization(true);
    }

    // Hold 300 px while leaning a quarter of the maximum roll to the right.
    sim.set_stick(0.25, -0.2);

    let dt = 0.002; // time step
    let steps_per_line = 250;

    println!("     t,        x,        y,      alt,    roll°,     left,    right");
    for step in 0..=5000 {
        let Some(frame) = tick(&mut sim, dt) else {
            break;
        };
        if step % steps_per_line == 0 {
            let state = frame.state;
            println!(
                "{:6.2}, {:-8.2}, {:-8.2}, {:-8.2}, {:-8.2}, {:-8.3}, {:-8.3}",
                frame.time,
                state.x,
                state.y,
                sim.body().altitude(sim.config().arena.height),
                state.angle.to_degrees(),
                state.left_thrust,
                state.right_thrust,
            );
        }
    }

    // Let go of the stick: idle throttle, level attitude.
    sim.release_stick();
    for _ in 0..1000 {
        tick(&mut sim, dt);
    }
    println!();
    println!("After release, last telemetry lines:");
    let lines: Vec<&str> = sim.telemetry().lines().collect();
    for line in lines.iter().rev().take(3).rev() {
        println!("{line}");
    }
    Ok(())
}
