//! Deterministic simulation module
//!
//! All flight physics lives here. This module must be pure and deterministic:
//! - Time only advances through `advance`
//! - Randomness only through an injected RNG
//! - No rendering, audio or platform dependencies

pub mod events;
pub mod failure;
pub mod state;
pub mod telemetry;
pub mod tick;

pub use events::PhaseEvent;
pub use failure::{FailureReason, FailureVerdict, predict_failure, risk_score};
pub use state::{FlightPhase, SimState, build_state};
pub use telemetry::{Telemetry, project_telemetry};
pub use tick::{advance, launch_state};
