//! Time-stepped flight integrator
//!
//! Advances a `SimState` by one variable step. Pure function of the previous
//! state and `dt`; the caller owns the clock.

use glam::DVec2;
use rand::Rng;

use super::failure::predict_failure;
use super::state::{FlightPhase, SimState};
use crate::config::SimConfig;
use crate::consts::*;

/// Build the state a launch command produces.
///
/// A failed prediction puts the bottle in `FailBounce` with a random pop
/// velocity drawn from `rng`.
pub fn launch_state<R: Rng>(config: SimConfig, rng: &mut R) -> SimState {
    let mut state = SimState::new(config);
    let verdict = predict_failure(&config);

    if verdict.failed {
        let vx = rng.random_range(2.4..4.2);
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let vy = rng.random_range(4.8..6.2);

        state.phase = FlightPhase::FailBounce;
        state.fail_reason = verdict.reason;
        state.velocity = DVec2::new(vx * sign, vy);
        log::info!(
            "Launch failed: {}",
            verdict.reason.map(|r| r.message()).unwrap_or("unknown")
        );
    } else {
        state.phase = FlightPhase::Powered;
        log::info!(
            "Launch: {:.0}% water, {:.1} bar, {:.0} deg",
            config.water_pct(),
            config.pressure_bar,
            config.launch_angle_deg
        );
    }

    state
}

/// Advance the flight by `dt` seconds
pub fn advance(state: &mut SimState, dt: f64) {
    if state.phase == FlightPhase::Landed || state.paused {
        return;
    }

    let thrust = if state.phase == FlightPhase::Powered {
        expel_water(state, dt)
    } else {
        state.gas_pressure = ATM_PRESSURE;
        0.0
    };

    let mass = state.total_mass();
    let speed = state.velocity.length();
    let drag = if speed > SPEED_EPSILON {
        let magnitude = 0.5 * RHO_AIR * DRAG_COEFF * REF_AREA * speed * speed;
        -state.velocity / speed * magnitude
    } else {
        DVec2::ZERO
    };
    let thrust_vec = if state.phase == FlightPhase::FailBounce {
        DVec2::ZERO
    } else {
        state.launch_direction() * thrust
    };
    let gravity = DVec2::new(0.0, -mass * GRAVITY);

    state.velocity += (thrust_vec + drag + gravity) / mass * dt;
    state.position += state.velocity * dt;
    state.thrust = thrust;
    state.time += dt;

    if state.position.y <= 0.0 && state.time > GROUND_TIME_GUARD && state.phase != FlightPhase::Idle
    {
        ground_contact(state);
    }
}

/// Water expulsion for one powered step. Returns the thrust magnitude.
fn expel_water(state: &mut SimState, dt: f64) -> f64 {
    let water_volume = state.water_mass / RHO_WATER;
    let gas_volume = (BOTTLE_VOLUME - water_volume).max(GAS_VOLUME_FLOOR);
    let gas_pressure = state.initial_pressure * (state.initial_gas_volume / gas_volume).powf(GAMMA);
    let delta_p = (gas_pressure - ATM_PRESSURE).max(0.0);

    if state.water_mass <= 0.0 || delta_p <= 0.0 {
        state.phase = FlightPhase::Coasting;
        state.gas_pressure = ATM_PRESSURE;
        return 0.0;
    }

    let exhaust_vel = (2.0 * delta_p / RHO_WATER).sqrt();
    let mass_flow = DISCHARGE_COEFF * state.nozzle_area * RHO_WATER * exhaust_vel;
    let used = state.water_mass.min(mass_flow * dt);
    let thrust = mass_flow * exhaust_vel + delta_p * state.nozzle_area;

    state.water_mass = (state.water_mass - used).max(0.0);
    state.gas_pressure = gas_pressure;

    if state.water_mass <= WATER_EXHAUSTED || delta_p <= COAST_DELTA_P {
        state.phase = FlightPhase::Coasting;
    }
    thrust
}

/// Resolve a touchdown. Altitude is clamped, then the phase decides.
fn ground_contact(state: &mut SimState) {
    state.position.y = 0.0;

    match state.phase {
        // Only a bottle moving into the ground bounces
        FlightPhase::FailBounce if state.velocity.y < 0.0 => {
            let vy = -state.velocity.y * BOUNCE_RESTITUTION;
            let vx = state.velocity.x * BOUNCE_HORIZONTAL_DAMPING;
            state.fail_bounce_count += 1;

            let settled = vy.abs() < SETTLE_VY && vx.abs() < SETTLE_VX;
            if settled || state.fail_bounce_count >= MAX_FAIL_BOUNCES {
                state.phase = FlightPhase::Failed;
                state.velocity = DVec2::ZERO;
                state.last_flight_distance = state.position.x;
                state.fail_alert_shown = true;
                log::info!(
                    "Failure sequence at rest after {} bounce(s), x = {:.2} m",
                    state.fail_bounce_count,
                    state.position.x
                );
            } else {
                state.velocity = DVec2::new(vx, vy);
            }
        }
        FlightPhase::FailBounce => {}
        FlightPhase::Failed => {
            state.velocity = DVec2::ZERO;
            state.last_flight_distance = state.position.x;
        }
        _ => {
            if state.velocity.y <= 0.0 {
                state.phase = FlightPhase::Landed;
                state.velocity = DVec2::ZERO;
                state.last_flight_distance = state.position.x;
                log::info!(
                    "Landed at t = {:.2} s, distance {:.2} m",
                    state.time,
                    state.position.x
                );
            }
        }
    }
}
