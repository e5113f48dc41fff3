//! Erosion configuration.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Parameters for particle-based hydraulic erosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Number of droplets to simulate.
    pub iterations: u32,
    /// Sediment capacity factor.
    pub capacity: f32,
    /// Erosion brush radius in cells. `0` erodes a single cell.
    pub radius: u32,
    /// Floor on the slope term of the capacity, so flats still carry sediment.
    pub min_slope: f32,
    /// How strongly a droplet keeps its previous direction (0-1).
    pub inertia: f32,
    /// Fraction of free capacity picked up per step (0-1).
    pub erode_speed: f32,
    /// Fraction of excess sediment dropped per step (0-1).
    pub deposit_speed: f32,
    /// Acceleration applied along height differences.
    pub gravity: f32,
    /// Maximum number of steps a droplet may take.
    pub max_lifetime: u32,
    /// Water volume at spawn.
    pub initial_volume: f32,
    /// Speed at spawn.
    pub initial_velocity: f32,
    /// Fraction of water lost per step (0-1).
    pub evaporate_speed: f32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            iterations: 70_000,
            capacity: 4.0,
            radius: 3,
            min_slope: 0.01,
            inertia: 0.05,
            erode_speed: 0.3,
            deposit_speed: 0.3,
            gravity: 4.0,
            max_lifetime: 30,
            initial_volume: 1.0,
            initial_velocity: 1.0,
            evaporate_speed: 0.01,
        }
    }
}

impl ErosionConfig {
    /// Fewer, slower droplets with a wide brush.
    pub fn gentle() -> Self {
        Self {
            iterations: 30_000,
            capacity: 2.0,
            radius: 4,
            erode_speed: 0.15,
            deposit_speed: 0.4,
            ..Default::default()
        }
    }

    /// Many droplets with a narrow brush that cut deep channels.
    pub fn aggressive() -> Self {
        Self {
            iterations: 200_000,
            capacity: 8.0,
            radius: 2,
            inertia: 0.1,
            erode_speed: 0.5,
            deposit_speed: 0.2,
            max_lifetime: 64,
            ..Default::default()
        }
    }

    /// Checks that every parameter lies in the range the droplet model assumes.
    ///
    /// This cannot rule out a negative velocity radicand; that depends on the
    /// terrain as well as `gravity`, and is handled per step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("capacity", self.capacity),
            ("min_slope", self.min_slope),
            ("inertia", self.inertia),
            ("erode_speed", self.erode_speed),
            ("deposit_speed", self.deposit_speed),
            ("gravity", self.gravity),
            ("initial_volume", self.initial_volume),
            ("initial_velocity", self.initial_velocity),
            ("evaporate_speed", self.evaporate_speed),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("inertia", self.inertia),
            ("erode_speed", self.erode_speed),
            ("deposit_speed", self.deposit_speed),
            ("evaporate_speed", self.evaporate_speed),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value: value as f64,
                    expected: "[0, 1]",
                });
            }
        }

        if self.min_slope < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "min_slope",
                value: self.min_slope as f64,
                expected: ">= 0",
            });
        }
        if self.initial_velocity < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "initial_velocity",
                value: self.initial_velocity as f64,
                expected: ">= 0",
            });
        }
        if self.initial_volume <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "initial_volume",
                value: self.initial_volume as f64,
                expected: "> 0",
            });
        }
        if self.max_lifetime == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_lifetime",
                value: 0.0,
                expected: ">= 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ErosionConfig::default().validate().is_ok());
        assert!(ErosionConfig::gentle().validate().is_ok());
        assert!(ErosionConfig::aggressive().validate().is_ok());
    }

    #[test]
    fn test_unit_interval_fields() {
        let cfg = ErosionConfig {
            evaporate_speed: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "evaporate_speed", .. })
        ));

        let cfg = ErosionConfig {
            erode_speed: 1.01,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "erode_speed", .. })
        ));
    }

    #[test]
    fn test_lifetime_and_volume() {
        let cfg = ErosionConfig {
            max_lifetime: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ErosionConfig {
            initial_volume: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "initial_volume", .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let cfg = ErosionConfig {
            gravity: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotFinite { field: "gravity", .. })
        ));
    }

    #[test]
    fn test_zero_radius_is_allowed() {
        let cfg = ErosionConfig {
            radius: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
