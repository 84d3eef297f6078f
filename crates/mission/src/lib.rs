//! Descent planner: builds the trajectory, load estimates, and oscillation series for a
//! payload/canopy combination deployed in a given environment.

pub mod loads;
pub mod scenario;

use log::info;
use serde::Serialize;
use thiserror::Error;

use chute_atmosphere::{AtmosphereError, AtmosphericConditions, Environment};
use chute_forces::ForceError;
use chute_oscillation::{OscillationError, OscillationEstimator, OscillationParams, OscillationSeries};
use chute_parachute::{Parachute, ParachuteError};
use chute_payload::{Payload, PayloadError};
use chute_trajectory::{
    FlightPlan, PhaseBoundaries, Trajectory, TrajectoryEngine, TrajectoryError, TrajectorySummary,
};

pub use loads::{LoadCase, LoadSummary};

/// Top-level descent planning error.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("environment: {0}")]
    Atmosphere(#[from] AtmosphereError),
    #[error("payload: {0}")]
    Payload(#[from] PayloadError),
    #[error("parachute: {0}")]
    Parachute(#[from] ParachuteError),
    #[error("loads: {0}")]
    Forces(#[from] ForceError),
    #[error("trajectory: {0}")]
    Trajectory(#[from] TrajectoryError),
    #[error("oscillation: {0}")]
    Oscillation(#[from] OscillationError),
}

/// Validated models and settings for one descent.
#[derive(Debug, Clone)]
pub struct DescentConfig {
    pub name: String,
    pub payload: Payload,
    pub parachute: Parachute,
    pub environment: Environment,
    pub flight: FlightPlan,
    pub oscillation: Option<OscillationParams>,
    pub loads: LoadCase,
}

/// Everything computed for a descent.
#[derive(Debug, Clone, Serialize)]
pub struct DescentProfile {
    pub name: String,
    pub conditions: AtmosphericConditions,
    pub total_mass_kg: f64,
    pub terminal_velocity_m_s: f64,
    pub inflation_acceleration_m_s2: f64,
    pub inflation_cap_engaged: bool,
    pub boundaries: PhaseBoundaries,
    pub summary: TrajectorySummary,
    pub loads: LoadSummary,
    pub trajectory: Trajectory,
    pub oscillation: Option<OscillationSeries>,
}

/// Build the engine from the component models and evaluate every derived quantity.
///
/// All configuration errors surface before any trajectory is generated.
pub fn plan_descent(config: &DescentConfig) -> Result<DescentProfile, MissionError> {
    let engine = TrajectoryEngine::from_models(
        &config.environment,
        &config.payload,
        &config.parachute,
        &config.flight,
    )?;
    let estimator = config
        .oscillation
        .map(OscillationEstimator::new)
        .transpose()?;
    let loads = loads::evaluate(
        &config.loads,
        &engine,
        &config.environment,
        &config.payload,
        &config.parachute,
    )?;

    let trajectory = engine.generate();
    let oscillation = estimator.map(|estimator| estimator.coupled(&trajectory));
    info!(
        "planned descent '{}': {} samples, terminal velocity {:.2} m/s",
        config.name,
        trajectory.len(),
        engine.terminal_velocity_m_s()
    );

    Ok(DescentProfile {
        name: config.name.clone(),
        conditions: config.environment.conditions(),
        total_mass_kg: engine.inputs().total_mass_kg,
        terminal_velocity_m_s: engine.terminal_velocity_m_s(),
        inflation_acceleration_m_s2: engine.inflation_acceleration_m_s2(),
        inflation_cap_engaged: engine.inflation_cap_engaged(),
        boundaries: engine.boundaries(),
        summary: trajectory.summary(),
        loads,
        trajectory,
        oscillation,
    })
}
