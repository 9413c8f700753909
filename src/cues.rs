//! Presentation cues derived from phase transitions
//!
//! The audio layer plays these; nothing here touches an audio API.

use serde::{Deserialize, Serialize};

use crate::sim::{FlightPhase, PhaseEvent};

/// Cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Rocket leaves the pad under thrust
    LaunchStart,
    /// Start the looping in-flight sound (no-op if already playing)
    FlightLoopStart,
    /// Stop the looping in-flight sound
    FlightLoopStop,
}

/// Cues to fire for one phase transition
pub fn cues_for(event: &PhaseEvent) -> Vec<Cue> {
    match event.to {
        FlightPhase::Powered => vec![Cue::LaunchStart],
        FlightPhase::Coasting | FlightPhase::FailBounce => vec![Cue::FlightLoopStart],
        FlightPhase::Landed | FlightPhase::Failed => vec![Cue::FlightLoopStop],
        // Reset from a flight silences everything
        FlightPhase::Idle if event.from != FlightPhase::Idle => vec![Cue::FlightLoopStop],
        FlightPhase::Idle => Vec::new(),
    }
}
