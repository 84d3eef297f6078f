//! Angle-of-attack oscillation of the payload/canopy system.
//!
//! The swing is modelled as an underdamped harmonic oscillator,
//! `θ(t) = θ₀·exp(−ζ·ωₙ·t)·cos(ω_d·t)` with `ω_d = ωₙ·sqrt(1 − ζ²)`.
//! Angles are paired with altitudes either from a generated trajectory or, without one,
//! from a uniform descent at terminal velocity.

use log::debug;
use serde::Serialize;
use thiserror::Error;

use chute_core::units::{deg_to_rad, rad_to_deg};
use chute_core::validate::is_positive;
use chute_trajectory::{PhaseBoundaries, Trajectory, DEFAULT_STEP_BUDGET};

#[derive(Debug, Error, PartialEq)]
pub enum OscillationError {
    #[error("damping ratio must lie in [0, 1) for an underdamped swing (got {0})")]
    DampingOutOfRange(f64),
    #[error("natural frequency must be positive (got {0} rad/s)")]
    NonPositiveNaturalFrequency(f64),
    #[error("initial angle must be finite (got {0}°)")]
    NonFiniteInitialAngle(f64),
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("descent rate must be finite and non-negative (got {0} m/s)")]
    InvalidDescentRate(f64),
    #[error("oscillation series needs {required} samples but the step budget is {budget}")]
    StepBudgetExceeded { required: usize, budget: usize },
}

/// Damped-oscillator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OscillationParams {
    pub damping_ratio: f64,
    pub natural_frequency_rad_s: f64,
    pub initial_angle_deg: f64,
}

impl Default for OscillationParams {
    fn default() -> Self {
        Self {
            damping_ratio: 0.15,
            natural_frequency_rad_s: 0.8,
            initial_angle_deg: 5.0,
        }
    }
}

/// One point of an oscillation series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OscillationSample {
    pub time_s: f64,
    pub angle_of_attack_deg: f64,
    pub altitude_m: f64,
}

/// Time-ordered angle/altitude pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OscillationSeries {
    samples: Vec<OscillationSample>,
}

impl OscillationSeries {
    pub fn samples(&self) -> &[OscillationSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OscillationSample> {
        self.samples.iter()
    }

    /// Largest absolute angle in the series (degrees).
    pub fn peak_angle_deg(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.angle_of_attack_deg.abs())
            .fold(0.0, f64::max)
    }

    /// Time after which every sample stays within `threshold_deg`, if it settles at all.
    pub fn settling_time_s(&self, threshold_deg: f64) -> Option<f64> {
        let last_outside = self
            .samples
            .iter()
            .rposition(|s| s.angle_of_attack_deg.abs() > threshold_deg);
        match last_outside {
            None => self.samples.first().map(|s| s.time_s),
            Some(idx) => self.samples.get(idx + 1).map(|s| s.time_s),
        }
    }
}

/// Uniform descent used to pair angles with altitudes when no trajectory is available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UniformDescent {
    pub initial_altitude_m: f64,
    /// Downward speed (positive).
    pub descent_rate_m_s: f64,
    pub max_time_s: f64,
    pub time_step_s: f64,
}

impl UniformDescent {
    pub fn altitude_at(&self, time_s: f64) -> f64 {
        (self.initial_altitude_m - self.descent_rate_m_s * time_s).max(0.0)
    }

    /// Altitudes at deployment and full inflation under the uniform-descent approximation.
    pub fn marker_altitudes(&self, boundaries: &PhaseBoundaries) -> (f64, f64) {
        (
            self.altitude_at(boundaries.deploy_time_s),
            self.altitude_at(boundaries.full_inflation_time_s),
        )
    }

    /// Sample times `0, dt, 2dt, …` strictly below `max_time_s`.
    fn sample_count(&self) -> usize {
        (self.max_time_s / self.time_step_s - 1e-9).ceil().max(0.0) as usize
    }

    fn validate(&self) -> Result<(), OscillationError> {
        for (name, value) in [
            ("initial altitude", self.initial_altitude_m),
            ("maximum time", self.max_time_s),
            ("time step", self.time_step_s),
        ] {
            if !is_positive(value) {
                return Err(OscillationError::NonPositive { name, value });
            }
        }
        if !(self.descent_rate_m_s.is_finite() && self.descent_rate_m_s >= 0.0) {
            return Err(OscillationError::InvalidDescentRate(self.descent_rate_m_s));
        }
        Ok(())
    }
}

/// Validated oscillator that evaluates the damped swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillationEstimator {
    params: OscillationParams,
    initial_angle_rad: f64,
    damped_frequency_rad_s: f64,
}

impl OscillationEstimator {
    /// Reject overdamped (`ζ ≥ 1`) and otherwise invalid parameters.
    pub fn new(params: OscillationParams) -> Result<Self, OscillationError> {
        let zeta = params.damping_ratio;
        if !(zeta.is_finite() && (0.0..1.0).contains(&zeta)) {
            return Err(OscillationError::DampingOutOfRange(zeta));
        }
        if !is_positive(params.natural_frequency_rad_s) {
            return Err(OscillationError::NonPositiveNaturalFrequency(
                params.natural_frequency_rad_s,
            ));
        }
        if !params.initial_angle_deg.is_finite() {
            return Err(OscillationError::NonFiniteInitialAngle(
                params.initial_angle_deg,
            ));
        }
        Ok(Self {
            params,
            initial_angle_rad: deg_to_rad(params.initial_angle_deg),
            damped_frequency_rad_s: params.natural_frequency_rad_s * (1.0 - zeta * zeta).sqrt(),
        })
    }

    pub fn params(&self) -> &OscillationParams {
        &self.params
    }

    pub fn damped_frequency_rad_s(&self) -> f64 {
        self.damped_frequency_rad_s
    }

    /// Period of the damped swing (s).
    pub fn damped_period_s(&self) -> f64 {
        std::f64::consts::TAU / self.damped_frequency_rad_s
    }

    fn decay(&self, time_s: f64) -> f64 {
        (-self.params.damping_ratio * self.params.natural_frequency_rad_s * time_s).exp()
    }

    /// Angle of attack at `time_s` (degrees).
    pub fn angle_deg_at(&self, time_s: f64) -> f64 {
        let theta =
            self.initial_angle_rad * self.decay(time_s) * (self.damped_frequency_rad_s * time_s).cos();
        rad_to_deg(theta)
    }

    /// Decay envelope `θ₀·exp(−ζ·ωₙ·t)` (degrees).
    pub fn envelope_deg_at(&self, time_s: f64) -> f64 {
        rad_to_deg(self.initial_angle_rad * self.decay(time_s))
    }

    /// One angle per trajectory sample, paired with that sample's altitude.
    pub fn coupled(&self, trajectory: &Trajectory) -> OscillationSeries {
        let samples = trajectory
            .iter()
            .map(|s| OscillationSample {
                time_s: s.time_s,
                angle_of_attack_deg: self.angle_deg_at(s.time_s),
                altitude_m: s.altitude_m,
            })
            .collect();
        OscillationSeries { samples }
    }

    /// Angles over `[0, t_max)` paired with a uniform descent at `descent_rate_m_s`.
    pub fn standalone(&self, descent: &UniformDescent) -> Result<OscillationSeries, OscillationError> {
        descent.validate()?;
        let required = descent.sample_count();
        if required > DEFAULT_STEP_BUDGET {
            return Err(OscillationError::StepBudgetExceeded {
                required,
                budget: DEFAULT_STEP_BUDGET,
            });
        }
        let samples: Vec<OscillationSample> = (0..required)
            .map(|i| {
                let time_s = i as f64 * descent.time_step_s;
                OscillationSample {
                    time_s,
                    angle_of_attack_deg: self.angle_deg_at(time_s),
                    altitude_m: descent.altitude_at(time_s),
                }
            })
            .collect();
        debug!(
            "standalone oscillation series: {} samples at {:.3} m/s",
            samples.len(),
            descent.descent_rate_m_s
        );
        Ok(OscillationSeries { samples })
    }
}

/// Kinematic angle `atan(v_vertical / v_horizontal)` in degrees; 90° with no horizontal motion.
pub fn kinematic_angle_of_attack_deg(vertical_speed_m_s: f64, horizontal_speed_m_s: f64) -> f64 {
    if horizontal_speed_m_s == 0.0 {
        return 90.0;
    }
    rad_to_deg((vertical_speed_m_s / horizontal_speed_m_s).atan())
}

/// Kinematic angle for every trajectory sample at a constant horizontal speed, as `(time, angle)`.
pub fn kinematic_angle_series(trajectory: &Trajectory, horizontal_speed_m_s: f64) -> Vec<(f64, f64)> {
    trajectory
        .iter()
        .map(|s| {
            (
                s.time_s,
                kinematic_angle_of_attack_deg(s.vertical_velocity_m_s, horizontal_speed_m_s),
            )
        })
        .collect()
}
