//! Read-only telemetry snapshot for display

use serde::{Deserialize, Serialize};

use super::state::{FlightPhase, SimState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Altitude, never negative (m)
    pub altitude: f64,
    /// Current downrange position (m)
    pub distance: f64,
    /// Distance of the finished flight, or the current position mid-flight (m)
    pub flight_distance: f64,
    /// Speed (m/s)
    pub speed: f64,
    /// Absolute gas pressure (kPa)
    pub pressure_kpa: f64,
    /// Thrust (N)
    pub thrust: f64,
    /// Water left (g)
    pub remaining_water_g: f64,
    /// Elapsed simulation time (s)
    pub time: f64,
    pub phase: FlightPhase,
    pub paused: bool,
}

impl Telemetry {
    /// False if any numeric field is NaN or infinite
    pub fn is_finite(&self) -> bool {
        [
            self.altitude,
            self.distance,
            self.flight_distance,
            self.speed,
            self.pressure_kpa,
            self.thrust,
            self.remaining_water_g,
            self.time,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Project the flight state into a display snapshot
pub fn project_telemetry(state: &SimState) -> Telemetry {
    let flight_distance = if state.last_flight_distance > 0.0 {
        state.last_flight_distance
    } else {
        state.position.x
    };
    // A failing bottle never shows thrust
    let thrust = if state.phase == FlightPhase::FailBounce {
        0.0
    } else {
        state.thrust
    };

    Telemetry {
        altitude: state.position.y.max(0.0),
        distance: state.position.x,
        flight_distance,
        speed: state.velocity.length(),
        pressure_kpa: state.gas_pressure / 1000.0,
        thrust,
        remaining_water_g: (state.water_mass * 1000.0).max(0.0),
        time: state.time,
        phase: state.phase,
        paused: state.paused,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use glam::DVec2;

    #[test]
    fn test_idle_snapshot() {
        let telemetry = project_telemetry(&SimState::new(SimConfig::default()));
        assert_eq!(telemetry.phase, FlightPhase::Idle);
        assert_eq!(telemetry.altitude, 0.0);
        assert_eq!(telemetry.speed, 0.0);
        assert!((telemetry.pressure_kpa - 709.275).abs() < 1e-9);
        assert!((telemetry.remaining_water_g - 700.0).abs() < 1e-6);
        assert!(telemetry.is_finite());
    }

    #[test]
    fn test_altitude_clamped_and_speed() {
        let mut state = SimState::new(SimConfig::default());
        state.position = DVec2::new(2.0, -0.3);
        state.velocity = DVec2::new(3.0, 4.0);
        let telemetry = project_telemetry(&state);
        assert_eq!(telemetry.altitude, 0.0);
        assert_eq!(telemetry.distance, 2.0);
        assert_eq!(telemetry.flight_distance, 2.0);
        assert!((telemetry.speed - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_flight_distance_prefers_finished_flight() {
        let mut state = SimState::new(SimConfig::default());
        state.position = DVec2::new(5.0, 0.0);
        state.last_flight_distance = 42.0;
        assert_eq!(project_telemetry(&state).flight_distance, 42.0);
    }

    #[test]
    fn test_fail_bounce_hides_thrust() {
        let mut state = SimState::new(SimConfig::default());
        state.phase = FlightPhase::FailBounce;
        state.thrust = 12.0;
        assert_eq!(project_telemetry(&state).thrust, 0.0);
    }

    #[test]
    fn test_projection_has_no_side_effects() {
        let state = SimState::new(SimConfig::default());
        let a = project_telemetry(&state);
        let b = project_telemetry(&state);
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_finite_detects_nan() {
        let mut telemetry = project_telemetry(&SimState::new(SimConfig::default()));
        telemetry.speed = f64::NAN;
        assert!(!telemetry.is_finite());
    }
}
