//! Flight state and core simulation types
//!
//! One `SimState` exists per run. Launch and reset replace it wholesale.

use std::collections::VecDeque;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::failure::FailureReason;
use crate::config::SimConfig;
use crate::consts::*;
use crate::deg_to_rad;

/// Current phase of flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightPhase {
    /// On the pad, waiting for launch
    Idle,
    /// Water is being expelled, thrust active
    Powered,
    /// Ballistic flight, no thrust
    Coasting,
    /// Launch failed, bottle tumbles and bounces without thrust
    FailBounce,
    /// Failure sequence finished (terminal)
    Failed,
    /// Touched down after a normal flight (terminal)
    Landed,
}

impl FlightPhase {
    /// Phases the driver advances every frame
    pub fn is_active(self) -> bool {
        matches!(
            self,
            FlightPhase::Powered | FlightPhase::Coasting | FlightPhase::FailBounce
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, FlightPhase::Failed | FlightPhase::Landed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlightPhase::Idle => "idle",
            FlightPhase::Powered => "powered",
            FlightPhase::Coasting => "coasting",
            FlightPhase::FailBounce => "fail-bounce",
            FlightPhase::Failed => "failed",
            FlightPhase::Landed => "landed",
        }
    }
}

impl std::fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete flight state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Configuration this state was built from
    pub config: SimConfig,

    /// Position (x: downrange, y: altitude), metres
    pub position: DVec2,
    /// Velocity, m/s
    pub velocity: DVec2,

    /// Water left in the bottle (kg)
    pub water_mass: f64,
    /// Current absolute gas pressure (Pa)
    pub gas_pressure: f64,
    /// Absolute gas pressure at launch (Pa)
    pub initial_pressure: f64,
    /// Gas volume at launch (m³)
    pub initial_gas_volume: f64,
    /// Nozzle cross-section (m²)
    pub nozzle_area: f64,
    /// Launch angle from horizontal (radians)
    pub angle_rad: f64,
    /// Dry mass (kg)
    pub dry_mass: f64,
    /// Thrust magnitude from the last step (N)
    pub thrust: f64,

    pub phase: FlightPhase,
    /// Elapsed simulation time (s)
    pub time: f64,
    /// Host clock reading of the previous frame (ms)
    pub last_tick: Option<f64>,
    /// Recent positions, oldest first
    pub trajectory: VecDeque<DVec3>,
    /// Ground contacts during a failure sequence
    pub fail_bounce_count: u32,
    pub paused: bool,
    pub fail_reason: Option<FailureReason>,
    /// Set once the failure sequence comes to rest, for the alert overlay
    pub fail_alert_shown: bool,
    /// Downrange distance of the last finished flight (m)
    pub last_flight_distance: f64,
}

impl SimState {
    /// Derive the fixed and initial quantities for a fresh run
    pub fn new(config: SimConfig) -> Self {
        let water_volume = BOTTLE_VOLUME * config.water_ratio;
        let gas_volume = (BOTTLE_VOLUME - water_volume).max(GAS_VOLUME_FLOOR);
        let initial_pressure = (config.pressure_bar + 1.0) * ATM_PRESSURE;
        let nozzle_radius = config.nozzle_diameter_mm / 1000.0 / 2.0;

        let mut trajectory = VecDeque::with_capacity(MAX_TRAJECTORY_POINTS);
        trajectory.push_back(DVec3::ZERO);

        Self {
            config,
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            water_mass: water_volume * RHO_WATER,
            gas_pressure: initial_pressure,
            initial_pressure,
            initial_gas_volume: gas_volume,
            nozzle_area: std::f64::consts::PI * nozzle_radius * nozzle_radius,
            angle_rad: deg_to_rad(config.launch_angle_deg),
            dry_mass: config.dry_mass_kg,
            thrust: 0.0,
            phase: FlightPhase::Idle,
            time: 0.0,
            last_tick: None,
            trajectory,
            fail_bounce_count: 0,
            paused: false,
            fail_reason: None,
            fail_alert_shown: false,
            last_flight_distance: 0.0,
        }
    }

    /// Unit vector along the launch rail
    pub fn launch_direction(&self) -> DVec2 {
        DVec2::new(self.angle_rad.cos(), self.angle_rad.sin())
    }

    /// Water plus dry mass, floored away from zero
    pub fn total_mass(&self) -> f64 {
        (self.dry_mass + self.water_mass).max(MASS_FLOOR)
    }

    /// Position as shown to consumers (altitude never negative)
    pub fn display_position(&self) -> DVec3 {
        DVec3::new(self.position.x, self.position.y.max(0.0), 0.0)
    }

    /// Append the current position to the trajectory window
    pub fn record_trajectory(&mut self) {
        self.trajectory.push_back(self.display_position());
        while self.trajectory.len() > MAX_TRAJECTORY_POINTS {
            self.trajectory.pop_front();
        }
    }
}

/// Build a fresh idle state from a configuration
pub fn build_state(config: SimConfig) -> SimState {
    SimState::new(config)
}
