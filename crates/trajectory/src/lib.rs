//! Closed-form descent trajectory under a parachute.
//!
//! The descent is split into three phases evaluated analytically at fixed time steps:
//!
//! 1. free fall until the deployment time,
//! 2. inflation, modelled as a constant acceleration that carries the free-fall velocity to the
//!    terminal velocity over the inflation window (limited to 4 g unless the uncapped model is
//!    selected),
//! 3. terminal descent at constant velocity.
//!
//! Each phase starts from the altitude and velocity reached at the end of the previous one.
//! Horizontal drift accumulates at a constant speed independently of the vertical phases.

mod lookup;
mod sample;

pub use lookup::StateLookup;
pub use sample::{Trajectory, TrajectorySample, TrajectorySummary};

use std::iter::FusedIterator;

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use chute_atmosphere::Environment;
use chute_core::constants::MAX_INFLATION_LOAD_FACTOR;
use chute_core::validate::{is_non_negative, is_positive};
use chute_parachute::Parachute;
use chute_payload::Payload;

pub use chute_core::flight::{DEFAULT_DEPLOY_TIME_S, DEFAULT_MAX_TIME_S, DEFAULT_TIME_STEP_S};
/// Upper bound on the number of samples a single generation may allocate.
pub const DEFAULT_STEP_BUDGET: usize = 1_000_000;

/// Tolerance applied when converting the horizon into a step count.
const STEP_COUNT_EPSILON: f64 = 1e-9;

/// How the inflation-phase acceleration is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InflationModel {
    /// Required acceleration limited to ±4 g.
    #[default]
    Capped,
    /// Required acceleration applied as is.
    Uncapped,
}

/// Vertical regime active at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DescentPhase {
    FreeFall,
    Inflation,
    TerminalDescent,
}

#[derive(Debug, Error, PartialEq)]
pub enum TrajectoryError {
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("deployment time cannot be negative (got {0} s)")]
    NegativeDeployTime(f64),
    #[error("horizontal speed must be finite (got {0} m/s)")]
    NonFiniteHorizontalSpeed(f64),
    #[error(
        "terminal velocity is unreachable with density {density_kg_m3} kg/m³ and drag area {drag_area_m2} m²"
    )]
    UnreachableTerminalVelocity {
        density_kg_m3: f64,
        drag_area_m2: f64,
    },
    #[error("trajectory needs up to {required} samples but the step budget is {budget}")]
    StepBudgetExceeded { required: usize, budget: usize },
}

/// Physical inputs of one descent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescentInputs {
    /// Payload plus parachute mass.
    pub total_mass_kg: f64,
    pub gravity_m_s2: f64,
    pub air_density_kg_m3: f64,
    pub drag_area_m2: f64,
    pub initial_altitude_m: f64,
    pub max_time_s: f64,
    pub deploy_time_s: f64,
    pub inflation_time_s: f64,
    pub horizontal_speed_m_s: f64,
}

/// Timing choices for a descent built from component models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPlan {
    pub max_time_s: f64,
    pub deploy_time_s: f64,
    pub time_step_s: f64,
    /// Falls back to the environment's horizontal wind when `None`.
    pub horizontal_speed_m_s: Option<f64>,
    pub inflation_model: InflationModel,
    pub step_budget: usize,
}

impl Default for FlightPlan {
    fn default() -> Self {
        Self {
            max_time_s: DEFAULT_MAX_TIME_S,
            deploy_time_s: DEFAULT_DEPLOY_TIME_S,
            time_step_s: DEFAULT_TIME_STEP_S,
            horizontal_speed_m_s: None,
            inflation_model: InflationModel::default(),
            step_budget: DEFAULT_STEP_BUDGET,
        }
    }
}

impl DescentInputs {
    /// Gather the descent inputs from the environment, payload, and canopy models.
    pub fn from_models(
        environment: &Environment,
        payload: &Payload,
        parachute: &Parachute,
        plan: &FlightPlan,
    ) -> Self {
        Self {
            total_mass_kg: payload.mass_kg + parachute.mass_kg(),
            gravity_m_s2: environment.gravity_m_s2(),
            air_density_kg_m3: environment.density_kg_m3(),
            drag_area_m2: parachute.drag_area_m2(),
            initial_altitude_m: environment.altitude_m(),
            max_time_s: plan.max_time_s,
            deploy_time_s: plan.deploy_time_s,
            inflation_time_s: parachute.inflation_time_s(),
            horizontal_speed_m_s: plan
                .horizontal_speed_m_s
                .unwrap_or(environment.wind().horizontal_m_s),
        }
    }

    fn validate(&self) -> Result<(), TrajectoryError> {
        for (name, value) in [
            ("total mass", self.total_mass_kg),
            ("gravity", self.gravity_m_s2),
            ("initial altitude", self.initial_altitude_m),
            ("maximum time", self.max_time_s),
            ("inflation time", self.inflation_time_s),
        ] {
            if !is_positive(value) {
                return Err(TrajectoryError::NonPositive { name, value });
            }
        }
        if !is_non_negative(self.deploy_time_s) {
            return Err(TrajectoryError::NegativeDeployTime(self.deploy_time_s));
        }
        if !self.horizontal_speed_m_s.is_finite() {
            return Err(TrajectoryError::NonFiniteHorizontalSpeed(
                self.horizontal_speed_m_s,
            ));
        }
        Ok(())
    }
}

/// Descent speed at which drag balances weight: `sqrt(2·m·g / (ρ·CdA))`.
pub fn terminal_velocity_m_s(
    mass_kg: f64,
    gravity_m_s2: f64,
    density_kg_m3: f64,
    drag_area_m2: f64,
) -> Result<f64, TrajectoryError> {
    if !is_positive(density_kg_m3) || !is_positive(drag_area_m2) {
        return Err(TrajectoryError::UnreachableTerminalVelocity {
            density_kg_m3,
            drag_area_m2,
        });
    }
    if !is_positive(mass_kg) {
        return Err(TrajectoryError::NonPositive {
            name: "mass",
            value: mass_kg,
        });
    }
    if !is_positive(gravity_m_s2) {
        return Err(TrajectoryError::NonPositive {
            name: "gravity",
            value: gravity_m_s2,
        });
    }
    Ok((2.0 * mass_kg * gravity_m_s2 / (density_kg_m3 * drag_area_m2)).sqrt())
}

/// Altitude, velocity, and acceleration from the closed-form phase equations.
///
/// The altitude is not floored at zero here; samples are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kinematics {
    pub phase: DescentPhase,
    pub altitude_m: f64,
    pub vertical_velocity_m_s: f64,
    pub vertical_acceleration_m_s2: f64,
}

/// State at the two phase transitions, evaluated with the incoming phase's equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseBoundaries {
    pub deploy_time_s: f64,
    pub deploy_altitude_m: f64,
    pub deploy_velocity_m_s: f64,
    pub full_inflation_time_s: f64,
    pub full_inflation_altitude_m: f64,
    pub full_inflation_velocity_m_s: f64,
}

/// Validated descent configuration that produces trajectories on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryEngine {
    inputs: DescentInputs,
    time_step_s: f64,
    step_budget: usize,
    inflation_model: InflationModel,
    terminal_velocity_m_s: f64,
    inflation_acceleration_m_s2: f64,
}

impl TrajectoryEngine {
    /// Validate the inputs and resolve the terminal velocity before any sampling.
    pub fn new(inputs: DescentInputs, time_step_s: f64) -> Result<Self, TrajectoryError> {
        inputs.validate()?;
        if !is_positive(time_step_s) {
            return Err(TrajectoryError::NonPositive {
                name: "time step",
                value: time_step_s,
            });
        }
        let terminal_velocity_m_s = terminal_velocity_m_s(
            inputs.total_mass_kg,
            inputs.gravity_m_s2,
            inputs.air_density_kg_m3,
            inputs.drag_area_m2,
        )?;

        let mut engine = Self {
            inputs,
            time_step_s,
            step_budget: DEFAULT_STEP_BUDGET,
            inflation_model: InflationModel::default(),
            terminal_velocity_m_s,
            inflation_acceleration_m_s2: 0.0,
        };
        engine.inflation_acceleration_m_s2 = engine.resolve_inflation_acceleration();
        engine.check_step_budget()?;
        Ok(engine)
    }

    /// Build an engine from component models and a flight plan.
    pub fn from_models(
        environment: &Environment,
        payload: &Payload,
        parachute: &Parachute,
        plan: &FlightPlan,
    ) -> Result<Self, TrajectoryError> {
        let inputs = DescentInputs::from_models(environment, payload, parachute, plan);
        Self::new(inputs, plan.time_step_s)?
            .with_inflation_model(plan.inflation_model)
            .with_step_budget(plan.step_budget)
    }

    pub fn with_inflation_model(mut self, model: InflationModel) -> Self {
        self.inflation_model = model;
        self.inflation_acceleration_m_s2 = self.resolve_inflation_acceleration();
        self
    }

    /// Replace the sample budget; fails when the horizon needs more samples than allowed.
    pub fn with_step_budget(mut self, budget: usize) -> Result<Self, TrajectoryError> {
        self.step_budget = budget;
        self.check_step_budget()?;
        Ok(self)
    }

    pub fn inputs(&self) -> &DescentInputs {
        &self.inputs
    }

    pub fn time_step_s(&self) -> f64 {
        self.time_step_s
    }

    pub fn inflation_model(&self) -> InflationModel {
        self.inflation_model
    }

    pub fn terminal_velocity_m_s(&self) -> f64 {
        self.terminal_velocity_m_s
    }

    /// Acceleration that carries the deployment velocity to `-v_t` over the inflation window.
    pub fn required_inflation_acceleration_m_s2(&self) -> f64 {
        (-self.terminal_velocity_m_s - self.deploy_velocity_m_s()) / self.inputs.inflation_time_s
    }

    /// Acceleration actually applied during inflation.
    pub fn inflation_acceleration_m_s2(&self) -> f64 {
        self.inflation_acceleration_m_s2
    }

    /// `true` when the 4 g limit reduced the required inflation acceleration.
    pub fn inflation_cap_engaged(&self) -> bool {
        self.inflation_acceleration_m_s2 != self.required_inflation_acceleration_m_s2()
    }

    /// Largest number of samples a generation can produce: `floor(t_max / dt) + 1`.
    ///
    /// Saturates at `usize::MAX` for horizons that cannot be counted.
    pub fn max_sample_count(&self) -> usize {
        (self.step_count() as usize).saturating_add(1)
    }

    /// `floor(t_max / dt)`, kept in floating point so huge ratios compare safely.
    fn step_count(&self) -> f64 {
        (self.inputs.max_time_s / self.time_step_s + STEP_COUNT_EPSILON).floor()
    }

    pub fn phase_at(&self, time_s: f64) -> DescentPhase {
        let deploy = self.inputs.deploy_time_s;
        if time_s < deploy {
            DescentPhase::FreeFall
        } else if time_s < deploy + self.inputs.inflation_time_s {
            DescentPhase::Inflation
        } else {
            DescentPhase::TerminalDescent
        }
    }

    /// Evaluate the active phase's closed-form equations at `time_s`.
    pub fn kinematics_at(&self, time_s: f64) -> Kinematics {
        match self.phase_at(time_s) {
            DescentPhase::FreeFall => self.free_fall(time_s),
            DescentPhase::Inflation => self.inflation(time_s - self.inputs.deploy_time_s),
            DescentPhase::TerminalDescent => {
                let t_rel =
                    time_s - self.inputs.deploy_time_s - self.inputs.inflation_time_s;
                self.terminal(t_rel)
            }
        }
    }

    /// Phase transition states, each computed with the phase that ends there.
    pub fn boundaries(&self) -> PhaseBoundaries {
        let deploy = self.free_fall(self.inputs.deploy_time_s);
        let inflated = self.inflation(self.inputs.inflation_time_s);
        PhaseBoundaries {
            deploy_time_s: self.inputs.deploy_time_s,
            deploy_altitude_m: deploy.altitude_m,
            deploy_velocity_m_s: deploy.vertical_velocity_m_s,
            full_inflation_time_s: self.inputs.deploy_time_s + self.inputs.inflation_time_s,
            full_inflation_altitude_m: inflated.altitude_m,
            full_inflation_velocity_m_s: inflated.vertical_velocity_m_s,
        }
    }

    /// Lazily walk the descent one time step at a time.
    pub fn samples(&self) -> Samples<'_> {
        Samples {
            engine: self,
            step: 0,
            limit: self.max_sample_count(),
            grounded: false,
        }
    }

    /// Generate the full descent, stopping at the first sample on the ground or at `t_max`.
    pub fn generate(&self) -> Trajectory {
        if self.inflation_cap_engaged() {
            warn!(
                "inflation acceleration limited to {:.2} m/s² (required {:.2} m/s²)",
                self.inflation_acceleration_m_s2,
                self.required_inflation_acceleration_m_s2()
            );
        }
        let samples: Vec<TrajectorySample> = self.samples().collect();
        let trajectory = Trajectory::new(samples, self.time_step_s);
        debug!(
            "generated {} samples (v_t = {:.3} m/s, a_infl = {:.3} m/s², landed = {})",
            trajectory.len(),
            self.terminal_velocity_m_s,
            self.inflation_acceleration_m_s2,
            trajectory.landed()
        );
        trajectory
    }

    fn sample_at_step(&self, step: usize) -> TrajectorySample {
        let time_s = step as f64 * self.time_step_s;
        let state = self.kinematics_at(time_s);
        TrajectorySample {
            time_s,
            altitude_m: state.altitude_m.max(0.0),
            vertical_velocity_m_s: state.vertical_velocity_m_s,
            horizontal_position_m: self.inputs.horizontal_speed_m_s
                * self.time_step_s
                * (step + 1) as f64,
            vertical_acceleration_m_s2: state.vertical_acceleration_m_s2,
            phase: state.phase,
        }
    }

    fn deploy_velocity_m_s(&self) -> f64 {
        -self.inputs.gravity_m_s2 * self.inputs.deploy_time_s
    }

    fn free_fall(&self, time_s: f64) -> Kinematics {
        let g = self.inputs.gravity_m_s2;
        Kinematics {
            phase: DescentPhase::FreeFall,
            altitude_m: self.inputs.initial_altitude_m - 0.5 * g * time_s * time_s,
            vertical_velocity_m_s: -g * time_s,
            vertical_acceleration_m_s2: -g,
        }
    }

    fn inflation(&self, t_rel: f64) -> Kinematics {
        let entry = self.free_fall(self.inputs.deploy_time_s);
        let v0 = entry.vertical_velocity_m_s;
        let a = self.inflation_acceleration_m_s2;
        Kinematics {
            phase: DescentPhase::Inflation,
            altitude_m: entry.altitude_m + v0 * t_rel + 0.5 * a * t_rel * t_rel,
            vertical_velocity_m_s: v0 + a * t_rel,
            vertical_acceleration_m_s2: a,
        }
    }

    fn terminal(&self, t_rel: f64) -> Kinematics {
        let entry = self.inflation(self.inputs.inflation_time_s);
        Kinematics {
            phase: DescentPhase::TerminalDescent,
            altitude_m: entry.altitude_m - self.terminal_velocity_m_s * t_rel,
            vertical_velocity_m_s: -self.terminal_velocity_m_s,
            vertical_acceleration_m_s2: 0.0,
        }
    }

    fn resolve_inflation_acceleration(&self) -> f64 {
        let required = self.required_inflation_acceleration_m_s2();
        match self.inflation_model {
            InflationModel::Uncapped => required,
            InflationModel::Capped => {
                let cap = MAX_INFLATION_LOAD_FACTOR * self.inputs.gravity_m_s2;
                required.clamp(-cap, cap)
            }
        }
    }

    fn check_step_budget(&self) -> Result<(), TrajectoryError> {
        // steps + 1 samples exceed the budget exactly when steps >= budget
        if self.step_count() >= self.step_budget as f64 {
            return Err(TrajectoryError::StepBudgetExceeded {
                required: self.max_sample_count(),
                budget: self.step_budget,
            });
        }
        Ok(())
    }
}

/// Iterator over trajectory samples; ends after the first grounded sample or at `t_max`.
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    engine: &'a TrajectoryEngine,
    step: usize,
    limit: usize,
    grounded: bool,
}

impl Iterator for Samples<'_> {
    type Item = TrajectorySample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.grounded || self.step >= self.limit {
            return None;
        }
        let sample = self.engine.sample_at_step(self.step);
        self.step += 1;
        if sample.altitude_m <= 0.0 {
            self.grounded = true;
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.grounded {
            (0, Some(0))
        } else {
            (0, Some(self.limit.saturating_sub(self.step)))
        }
    }
}

impl FusedIterator for Samples<'_> {}
