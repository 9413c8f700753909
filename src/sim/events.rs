//! Phase transition events
//!
//! The presentation layer subscribes to these instead of polling the phase.

use serde::{Deserialize, Serialize};

use super::state::FlightPhase;

/// An edge in the flight phase state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub from: FlightPhase,
    pub to: FlightPhase,
    /// Simulation time of the transition (s)
    pub time: f64,
}

impl PhaseEvent {
    /// Returns an event when the phase actually changed
    pub fn between(from: FlightPhase, to: FlightPhase, time: f64) -> Option<Self> {
        (from != to).then_some(Self { from, to, time })
    }

    pub fn entered(&self, phase: FlightPhase) -> bool {
        self.to == phase && self.from != phase
    }
}
