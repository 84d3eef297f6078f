//! Load estimates evaluated against a configured descent.

use serde::Serialize;

use chute_atmosphere::Environment;
use chute_core::units::load_factor;
use chute_forces::{
    ForceError, SnatchModel, drag_force_n, opening_force_n, opening_shock_n,
};
use chute_parachute::Parachute;
use chute_payload::Payload;
use chute_trajectory::TrajectoryEngine;

/// Coefficients feeding the load formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadCase {
    pub lift_coefficient: f64,
    pub lift_to_drag: f64,
    pub payload_drag_coefficient: f64,
    pub snatch: SnatchModel,
}

impl Default for LoadCase {
    fn default() -> Self {
        Self {
            lift_coefficient: 1.75,
            lift_to_drag: 0.5,
            payload_drag_coefficient: 1.05,
            snatch: SnatchModel::default(),
        }
    }
}

/// Forces expected over a descent, all in newtons unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadSummary {
    pub weight_n: f64,
    pub deployment_speed_m_s: f64,
    pub canopy_drag_at_terminal_n: f64,
    pub payload_drag_at_deployment_n: f64,
    /// Evaluated on the canopy reference area, not the payload frontal area.
    pub opening_force_n: f64,
    pub opening_shock_n: f64,
    pub snatch_force_n: f64,
    pub peak_inflation_load_factor: f64,
}

pub(crate) fn evaluate(
    case: &LoadCase,
    engine: &TrajectoryEngine,
    environment: &Environment,
    payload: &Payload,
    parachute: &Parachute,
) -> Result<LoadSummary, ForceError> {
    let density = environment.density_kg_m3();
    let inputs = engine.inputs();
    let deployment_speed = engine.boundaries().deploy_velocity_m_s.abs();

    Ok(LoadSummary {
        weight_n: inputs.total_mass_kg * inputs.gravity_m_s2,
        deployment_speed_m_s: deployment_speed,
        canopy_drag_at_terminal_n: drag_force_n(
            density,
            engine.terminal_velocity_m_s(),
            parachute.reference_area_m2(),
            parachute.drag_coefficient(),
        ),
        payload_drag_at_deployment_n: drag_force_n(
            density,
            deployment_speed,
            payload.frontal_area_m2(),
            case.payload_drag_coefficient,
        ),
        opening_force_n: opening_force_n(
            density,
            deployment_speed,
            parachute.reference_area_m2(),
            case.lift_coefficient,
            case.lift_to_drag,
        ),
        opening_shock_n: opening_shock_n(
            density,
            deployment_speed,
            parachute.drag_area_m2(),
            parachute.opening_force_coefficient(),
        ),
        snatch_force_n: case
            .snatch
            .snatch_force_n(deployment_speed, parachute.suspension_line_length_m())?,
        peak_inflation_load_factor: load_factor(engine.inflation_acceleration_m_s2()),
    })
}
