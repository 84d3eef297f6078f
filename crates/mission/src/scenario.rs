//! Conversion from parsed scenario files into validated descent models.

use chute_atmosphere::{AtmosphereInputs, Environment, Wind};
use chute_config::{InflationModelConfig, ScenarioConfig};
use chute_forces::SnatchModel;
use chute_oscillation::OscillationParams;
use chute_parachute::{CanopyShape, Parachute, ParachuteSpec};
use chute_payload::{Payload, PayloadShape};
use chute_trajectory::{DEFAULT_STEP_BUDGET, FlightPlan, InflationModel};

use crate::{DescentConfig, LoadCase, MissionError};

/// Validate a scenario and build its models; unknown shapes are rejected here.
pub fn from_config(config: &ScenarioConfig) -> Result<DescentConfig, MissionError> {
    let payload_cfg = &config.payload;
    let payload = Payload::new(
        payload_cfg.name.clone(),
        payload_cfg.mass_kg,
        payload_cfg.shape.parse::<PayloadShape>()?,
        payload_cfg.width_m,
        payload_cfg.height_m,
        payload_cfg.depth_m,
    )?;

    let chute_cfg = &config.parachute;
    let parachute = Parachute::new(ParachuteSpec {
        diameter_m: chute_cfg.diameter_m,
        drag_coefficient: chute_cfg.drag_coefficient,
        shape: chute_cfg.shape.parse::<CanopyShape>()?,
        mass_kg: chute_cfg.mass_kg,
        suspension_line_length_m: chute_cfg.suspension_line_length_m,
        opening_force_coefficient: chute_cfg.opening_force_coefficient,
        inflation_time_s: chute_cfg.inflation_time_s,
    })?;

    let env_cfg = &config.environment;
    let defaults = AtmosphereInputs::default();
    let wind_defaults = Wind::default();
    let environment = Environment::new(AtmosphereInputs {
        altitude_m: env_cfg.altitude_m,
        sea_level_temperature_k: env_cfg
            .sea_level_temperature_k
            .unwrap_or(defaults.sea_level_temperature_k),
        sea_level_pressure_pa: env_cfg
            .sea_level_pressure_pa
            .unwrap_or(defaults.sea_level_pressure_pa),
        lapse_rate_k_m: env_cfg.lapse_rate_k_m.unwrap_or(defaults.lapse_rate_k_m),
        gravity_m_s2: env_cfg.gravity_m_s2.unwrap_or(defaults.gravity_m_s2),
        gas_constant_j_kg_k: defaults.gas_constant_j_kg_k,
        wind: Wind {
            horizontal_m_s: env_cfg
                .wind_horizontal_m_s
                .unwrap_or(wind_defaults.horizontal_m_s),
            vertical_m_s: env_cfg
                .wind_vertical_m_s
                .unwrap_or(wind_defaults.vertical_m_s),
            direction_deg: env_cfg
                .wind_direction_deg
                .unwrap_or(wind_defaults.direction_deg),
        },
    })?;

    let flight_cfg = &config.flight;
    let flight = FlightPlan {
        max_time_s: flight_cfg.t_max_s,
        deploy_time_s: flight_cfg.t_deploy_s,
        time_step_s: flight_cfg.dt_s,
        horizontal_speed_m_s: flight_cfg.horizontal_speed_m_s,
        inflation_model: match flight_cfg.inflation_model {
            InflationModelConfig::Capped => InflationModel::Capped,
            InflationModelConfig::Uncapped => InflationModel::Uncapped,
        },
        step_budget: flight_cfg.step_budget.unwrap_or(DEFAULT_STEP_BUDGET),
    };

    let oscillation = config.oscillation.as_ref().map(|osc| OscillationParams {
        damping_ratio: osc.damping_ratio,
        natural_frequency_rad_s: osc.natural_frequency_rad_s,
        initial_angle_deg: osc.initial_angle_deg,
    });

    let loads_cfg = &config.loads;
    let loads = LoadCase {
        lift_coefficient: loads_cfg.lift_coefficient,
        lift_to_drag: loads_cfg.lift_to_drag,
        payload_drag_coefficient: loads_cfg.payload_drag_coefficient,
        snatch: SnatchModel::new(loads_cfg.line_count, loads_cfg.line_stiffness_n_m)?,
    };

    Ok(DescentConfig {
        name: config.name.clone(),
        payload,
        parachute,
        environment,
        flight,
        oscillation,
        loads,
    })
}
