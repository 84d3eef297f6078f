//! Stateless aerodynamic load formulas used to size canopies and rigging.

use serde::Serialize;
use thiserror::Error;

use chute_core::validate::is_positive;

#[derive(Debug, Error, PartialEq)]
pub enum ForceError {
    #[error("suspension line length must be positive (got {0} m)")]
    NonPositiveLineLength(f64),
    #[error("line stiffness must be positive (got {0} N/m)")]
    NonPositiveStiffness(f64),
    #[error("at least one suspension line is required")]
    NoLines,
}

/// Dynamic pressure `½ρv²` (Pa).
#[inline]
pub fn dynamic_pressure_pa(density_kg_m3: f64, velocity_m_s: f64) -> f64 {
    0.5 * density_kg_m3 * velocity_m_s * velocity_m_s
}

/// Drag force `½ρv²·A·Cd` (N).
pub fn drag_force_n(
    density_kg_m3: f64,
    velocity_m_s: f64,
    reference_area_m2: f64,
    drag_coefficient: f64,
) -> f64 {
    dynamic_pressure_pa(density_kg_m3, velocity_m_s) * reference_area_m2 * drag_coefficient
}

/// Opening force `½·Cl·ρ·A·v²·(1 + L/D)` (N).
pub fn opening_force_n(
    density_kg_m3: f64,
    velocity_m_s: f64,
    reference_area_m2: f64,
    lift_coefficient: f64,
    lift_to_drag: f64,
) -> f64 {
    lift_coefficient
        * dynamic_pressure_pa(density_kg_m3, velocity_m_s)
        * reference_area_m2
        * (1.0 + lift_to_drag)
}

/// Classical opening shock `Cx·q·(Cd·S0)` (N).
pub fn opening_shock_n(
    density_kg_m3: f64,
    velocity_m_s: f64,
    drag_area_m2: f64,
    opening_force_coefficient: f64,
) -> f64 {
    opening_force_coefficient * dynamic_pressure_pa(density_kg_m3, velocity_m_s) * drag_area_m2
}

/// Hookean approximation of the line-stretch load at full deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnatchModel {
    pub line_count: u32,
    pub line_stiffness_n_m: f64,
}

impl Default for SnatchModel {
    fn default() -> Self {
        Self {
            line_count: 4,
            line_stiffness_n_m: 1.0e5,
        }
    }
}

impl SnatchModel {
    pub fn new(line_count: u32, line_stiffness_n_m: f64) -> Result<Self, ForceError> {
        if line_count == 0 {
            return Err(ForceError::NoLines);
        }
        if !is_positive(line_stiffness_n_m) {
            return Err(ForceError::NonPositiveStiffness(line_stiffness_n_m));
        }
        Ok(Self {
            line_count,
            line_stiffness_n_m,
        })
    }

    /// Simplified line elongation `Δv / (2·L)`.
    pub fn elongation(&self, delta_v_m_s: f64, line_length_m: f64) -> Result<f64, ForceError> {
        if !is_positive(line_length_m) {
            return Err(ForceError::NonPositiveLineLength(line_length_m));
        }
        Ok(delta_v_m_s / (2.0 * line_length_m))
    }

    /// `n_lines · k · elongation` (N).
    pub fn snatch_force_n(&self, delta_v_m_s: f64, line_length_m: f64) -> Result<f64, ForceError> {
        let elongation = self.elongation(delta_v_m_s, line_length_m)?;
        Ok(f64::from(self.line_count) * self.line_stiffness_n_m * elongation)
    }
}
