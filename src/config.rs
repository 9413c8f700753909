//! Launch configuration
//!
//! Immutable for the duration of a run. Edits from the setup UI are applied
//! by the driver only while the rocket is idle.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Water fill ratio range offered by the setup UI
pub const WATER_RATIO_RANGE: RangeInclusive<f64> = 0.05..=0.80;
/// Gauge pressure range offered by the setup UI (bar)
pub const PRESSURE_BAR_RANGE: RangeInclusive<f64> = 1.0..=10.0;
/// Launch angle range offered by the setup UI (degrees from horizontal)
pub const LAUNCH_ANGLE_RANGE: RangeInclusive<f64> = 15.0..=85.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Out of range: {what} = {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rocket launch configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fraction of the bottle filled with water (0, 1]
    pub water_ratio: f64,
    /// Gauge pressure of the compressed air at launch (bar)
    pub pressure_bar: f64,
    /// Nozzle exit diameter (mm)
    pub nozzle_diameter_mm: f64,
    /// Launch angle from horizontal (degrees)
    pub launch_angle_deg: f64,
    /// Rocket mass without water (kg)
    pub dry_mass_kg: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            water_ratio: 0.35,
            pressure_bar: 6.0,
            nozzle_diameter_mm: 9.0,
            launch_angle_deg: 60.0,
            dry_mass_kg: 0.140,
        }
    }
}

impl SimConfig {
    /// Water fill as a percentage
    pub fn water_pct(&self) -> f64 {
        self.water_ratio * 100.0
    }

    /// Clamp the slider-driven fields to the setup UI ranges
    pub fn clamped_to_setup_ranges(mut self) -> Self {
        self.water_ratio = self
            .water_ratio
            .clamp(*WATER_RATIO_RANGE.start(), *WATER_RATIO_RANGE.end());
        self.pressure_bar = self
            .pressure_bar
            .clamp(*PRESSURE_BAR_RANGE.start(), *PRESSURE_BAR_RANGE.end());
        self.launch_angle_deg = self
            .launch_angle_deg
            .clamp(*LAUNCH_ANGLE_RANGE.start(), *LAUNCH_ANGLE_RANGE.end());
        self
    }

    /// Reject values the physics core cannot turn into a meaningful flight.
    ///
    /// The core stays finite for any numeric input; this is the upstream gate
    /// for nonsense like a zero nozzle or a massless rocket.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("water_ratio", self.water_ratio),
            ("pressure_bar", self.pressure_bar),
            ("nozzle_diameter_mm", self.nozzle_diameter_mm),
            ("launch_angle_deg", self.launch_angle_deg),
            ("dry_mass_kg", self.dry_mass_kg),
        ];
        for (what, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { what, value });
            }
        }

        if self.water_ratio <= 0.0 || self.water_ratio > 1.0 {
            return Err(ConfigError::OutOfRange {
                what: "water_ratio",
                value: self.water_ratio,
            });
        }
        if self.pressure_bar < 0.0 {
            return Err(ConfigError::OutOfRange {
                what: "pressure_bar",
                value: self.pressure_bar,
            });
        }
        if self.nozzle_diameter_mm <= 0.0 {
            return Err(ConfigError::OutOfRange {
                what: "nozzle_diameter_mm",
                value: self.nozzle_diameter_mm,
            });
        }
        if self.dry_mass_kg <= 0.0 {
            return Err(ConfigError::OutOfRange {
                what: "dry_mass_kg",
                value: self.dry_mass_kg,
            });
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded launch config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)?;
        log::info!("Launch config saved to {}", path.display());
        Ok(())
    }
}
