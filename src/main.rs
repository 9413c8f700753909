//! Water Rocket headless runner
//!
//! Flies one launch at a fixed step and prints the outcome.
//! Usage: `water-rocket [config.json] [seed]`

use water_rocket::sim::FlightPhase;
use water_rocket::{SimConfig, Simulation, cues_for};

/// Fixed step for headless runs (s)
const STEP: f64 = 0.02;
/// Give up after this many steps
const MAX_STEPS: usize = 10_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Water Rocket (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => 0,
    };

    let mut sim = Simulation::new(config, seed)?;
    sim.launch();

    let mut max_altitude = 0.0_f64;
    let mut max_speed = 0.0_f64;
    let mut steps = 0;
    while !sim.phase().is_terminal() && steps < MAX_STEPS {
        sim.step(STEP);
        steps += 1;

        let telemetry = sim.telemetry();
        max_altitude = max_altitude.max(telemetry.altitude);
        max_speed = max_speed.max(telemetry.speed);

        for event in sim.drain_events() {
            for cue in cues_for(&event) {
                log::debug!("Cue {:?}", cue);
            }
        }
    }

    let telemetry = sim.telemetry();
    if !telemetry.is_finite() {
        log::error!("Non-finite telemetry: {:?}", telemetry);
    }

    println!();
    println!("  Water rocket flight");
    println!("  ──────────────────────────────────────────────");
    println!(
        "  Water:   {:>6.0} %     Pressure: {:>5.1} bar",
        config.water_pct(),
        config.pressure_bar
    );
    println!(
        "  Nozzle:  {:>6.1} mm    Angle:    {:>5.0} deg",
        config.nozzle_diameter_mm, config.launch_angle_deg
    );
    println!("  Dry mass:{:>6.0} g", config.dry_mass_kg * 1000.0);
    println!();
    println!("  Outcome:      {}", telemetry.phase);
    if let (FlightPhase::Failed, Some(reason)) = (telemetry.phase, sim.state().fail_reason) {
        println!("  Reason:       {}", reason);
    }
    println!("  Distance:     {:>8.2} m", telemetry.flight_distance);
    println!("  Max altitude: {:>8.2} m", max_altitude);
    println!("  Max speed:    {:>8.2} m/s", max_speed);
    println!("  Flight time:  {:>8.2} s ({} steps)", telemetry.time, steps);
    println!();

    Ok(())
}
