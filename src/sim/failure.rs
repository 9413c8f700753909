//! Pre-launch failure prediction
//!
//! Runs once when the launch command arrives, never per step.

use serde::{Deserialize, Serialize};

use crate::clamp01;
use crate::config::SimConfig;

/// Pressure above which the bottle always ruptures (bar)
pub const MAX_SAFE_PRESSURE_BAR: f64 = 8.0;
/// Minimum water fill for usable thrust (%)
pub const MIN_WATER_PCT: f64 = 10.0;
/// Maximum water fill that leaves an air cushion (%)
pub const MAX_WATER_PCT: f64 = 70.0;
/// Composite risk above which the launch fails
pub const RISK_THRESHOLD: f64 = 0.6;

/// Why a launch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    PressureTooHigh,
    InsufficientWater,
    InsufficientAirCushion,
    Imbalance,
}

impl FailureReason {
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::PressureTooHigh => {
                "Unstable setup: pressure too high, the bottle ruptured."
            }
            FailureReason::InsufficientWater => "Too little water: insufficient thrust.",
            FailureReason::InsufficientAirCushion => {
                "Too much water: insufficient air cushion."
            }
            FailureReason::Imbalance => "Pressure and water are out of balance: launch failed.",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of the pre-launch check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureVerdict {
    pub failed: bool,
    pub reason: Option<FailureReason>,
}

impl FailureVerdict {
    pub fn ok() -> Self {
        Self {
            failed: false,
            reason: None,
        }
    }

    pub fn fail(reason: FailureReason) -> Self {
        Self {
            failed: true,
            reason: Some(reason),
        }
    }
}

/// Weighted risk in [0, 1] from pressure excess and water imbalance
pub fn risk_score(config: &SimConfig) -> f64 {
    let water_pct = config.water_pct();
    let risk = 0.7 * clamp01((config.pressure_bar - 7.5) / 2.0)
        + 0.3 * clamp01((MIN_WATER_PCT - water_pct) / 10.0)
        + 0.3 * clamp01((water_pct - MAX_WATER_PCT) / 10.0);
    clamp01(risk)
}

/// Decide whether this configuration fails at launch
pub fn predict_failure(config: &SimConfig) -> FailureVerdict {
    let water_pct = config.water_pct();

    if config.pressure_bar > MAX_SAFE_PRESSURE_BAR {
        return FailureVerdict::fail(FailureReason::PressureTooHigh);
    }
    if water_pct < MIN_WATER_PCT {
        return FailureVerdict::fail(FailureReason::InsufficientWater);
    }
    if water_pct > MAX_WATER_PCT {
        return FailureVerdict::fail(FailureReason::InsufficientAirCushion);
    }

    if risk_score(config) > RISK_THRESHOLD {
        return FailureVerdict::fail(FailureReason::Imbalance);
    }
    FailureVerdict::ok()
}
