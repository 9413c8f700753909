//! Water Rocket - A water-propelled rocket flight simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state, failure gate, integrator, telemetry)
//! - `config`: Launch configuration, setup ranges and JSON persistence
//! - `driver`: Frame pump and launch/pause/reset commands
//! - `cues`: Phase transition cues for the presentation layer

pub mod config;
pub mod cues;
pub mod driver;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use cues::{Cue, cues_for};
pub use driver::Simulation;

/// Physical and tuning constants
pub mod consts {
    /// Standard atmospheric pressure (Pa)
    pub const ATM_PRESSURE: f64 = 101_325.0;
    /// Density of water (kg/m³)
    pub const RHO_WATER: f64 = 1000.0;
    /// Density of air (kg/m³)
    pub const RHO_AIR: f64 = 1.2;
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;
    /// Bottle volume (m³), a 2 L bottle
    pub const BOTTLE_VOLUME: f64 = 0.002;

    /// Body reference area for drag (m²), roughly a 100 mm bottle
    pub const REF_AREA: f64 = 0.0075;
    /// Nozzle discharge coefficient
    pub const DISCHARGE_COEFF: f64 = 0.65;
    /// Body drag coefficient
    pub const DRAG_COEFF: f64 = 0.75;
    /// Adiabatic exponent for air
    pub const GAMMA: f64 = 1.4;

    /// Largest time step a single advance may take (s)
    pub const MAX_DT: f64 = 0.05;
    /// Trajectory window size
    pub const MAX_TRAJECTORY_POINTS: usize = 1400;

    /// Smallest gas volume used in the expansion law (m³)
    pub const GAS_VOLUME_FLOOR: f64 = 1e-6;
    /// Smallest total mass used as a divisor (kg)
    pub const MASS_FLOOR: f64 = 1e-3;
    /// Below this speed drag is zero (m/s)
    pub const SPEED_EPSILON: f64 = 1e-3;
    /// Water mass treated as exhausted (kg)
    pub const WATER_EXHAUSTED: f64 = 1e-5;
    /// Pressure differential at which powered flight ends (Pa)
    pub const COAST_DELTA_P: f64 = 200.0;
    /// Ground contact is ignored before this much flight time (s)
    pub const GROUND_TIME_GUARD: f64 = 0.05;

    /// Vertical restitution on a failure bounce
    pub const BOUNCE_RESTITUTION: f64 = 0.3;
    /// Horizontal damping on a failure bounce
    pub const BOUNCE_HORIZONTAL_DAMPING: f64 = 0.45;
    /// Failure bounces before the rocket is forced to rest
    pub const MAX_FAIL_BOUNCES: u32 = 4;
    /// A bounce below both of these speeds settles the rocket (m/s)
    pub const SETTLE_VY: f64 = 0.35;
    pub const SETTLE_VX: f64 = 0.5;
}

/// Clamp a value to [0, 1]
#[inline]
pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}
