//! Standard-atmosphere environment evaluated once at the deployment altitude.
//!
//! Temperature falls linearly with the tropospheric lapse rate; pressure follows the
//! barometric formula for a constant lapse rate and density comes from the ideal gas law.

use serde::Serialize;
use thiserror::Error;

use chute_core::constants::{
    GAS_CONSTANT_AIR_J_KG_K, GRAVITY_M_S2, SEA_LEVEL_PRESSURE_PA, SEA_LEVEL_TEMPERATURE_K,
    TROPOSPHERE_LAPSE_RATE_K_M,
};
use chute_core::validate::is_positive;

/// Wind acting on the descending system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wind {
    pub horizontal_m_s: f64,
    pub vertical_m_s: f64,
    /// Meteorological direction the wind blows from (degrees).
    pub direction_deg: f64,
}

impl Default for Wind {
    fn default() -> Self {
        Self {
            horizontal_m_s: 5.0,
            vertical_m_s: 0.5,
            direction_deg: 90.0,
        }
    }
}

/// Raw inputs describing the atmosphere at the deployment point.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereInputs {
    pub altitude_m: f64,
    pub sea_level_temperature_k: f64,
    pub sea_level_pressure_pa: f64,
    pub lapse_rate_k_m: f64,
    pub gravity_m_s2: f64,
    pub gas_constant_j_kg_k: f64,
    pub wind: Wind,
}

impl Default for AtmosphereInputs {
    fn default() -> Self {
        Self {
            altitude_m: 4_000.0,
            sea_level_temperature_k: SEA_LEVEL_TEMPERATURE_K,
            sea_level_pressure_pa: SEA_LEVEL_PRESSURE_PA,
            lapse_rate_k_m: TROPOSPHERE_LAPSE_RATE_K_M,
            gravity_m_s2: GRAVITY_M_S2,
            gas_constant_j_kg_k: GAS_CONSTANT_AIR_J_KG_K,
            wind: Wind::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AtmosphereError {
    #[error("altitude must be positive (got {0} m)")]
    NonPositiveAltitude(f64),
    #[error("{name} must be positive (got {value})")]
    NonPositiveParameter { name: &'static str, value: f64 },
    #[error("altitude {altitude_m} m lies beyond the lapse-rate validity limit of {limit_m:.1} m")]
    BeyondLapseRateLimit { altitude_m: f64, limit_m: f64 },
    #[error("wind components must be finite")]
    NonFiniteWind,
}

/// Immutable atmospheric state derived from [`AtmosphereInputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    inputs: AtmosphereInputs,
    temperature_k: f64,
    pressure_pa: f64,
    density_kg_m3: f64,
}

impl Environment {
    /// Validate the inputs and evaluate temperature, pressure, and density once.
    pub fn new(inputs: AtmosphereInputs) -> Result<Self, AtmosphereError> {
        if !is_positive(inputs.altitude_m) {
            return Err(AtmosphereError::NonPositiveAltitude(inputs.altitude_m));
        }
        for (name, value) in [
            ("sea-level temperature", inputs.sea_level_temperature_k),
            ("sea-level pressure", inputs.sea_level_pressure_pa),
            ("lapse rate", inputs.lapse_rate_k_m),
            ("gravity", inputs.gravity_m_s2),
            ("gas constant", inputs.gas_constant_j_kg_k),
        ] {
            if !is_positive(value) {
                return Err(AtmosphereError::NonPositiveParameter { name, value });
            }
        }
        let wind = &inputs.wind;
        if !(wind.horizontal_m_s.is_finite()
            && wind.vertical_m_s.is_finite()
            && wind.direction_deg.is_finite())
        {
            return Err(AtmosphereError::NonFiniteWind);
        }

        let limit_m = lapse_rate_limit_m(&inputs);
        if inputs.altitude_m >= limit_m {
            return Err(AtmosphereError::BeyondLapseRateLimit {
                altitude_m: inputs.altitude_m,
                limit_m,
            });
        }

        let temperature_k = temperature_k(&inputs);
        let pressure_pa = pressure_pa(&inputs);
        let density_kg_m3 = pressure_pa / (inputs.gas_constant_j_kg_k * temperature_k);

        Ok(Self {
            inputs,
            temperature_k,
            pressure_pa,
            density_kg_m3,
        })
    }

    /// Standard atmosphere and default wind at the given altitude.
    pub fn at_altitude(altitude_m: f64) -> Result<Self, AtmosphereError> {
        Self::new(AtmosphereInputs {
            altitude_m,
            ..AtmosphereInputs::default()
        })
    }

    pub fn inputs(&self) -> &AtmosphereInputs {
        &self.inputs
    }

    pub fn altitude_m(&self) -> f64 {
        self.inputs.altitude_m
    }

    pub fn gravity_m_s2(&self) -> f64 {
        self.inputs.gravity_m_s2
    }

    pub fn wind(&self) -> &Wind {
        &self.inputs.wind
    }

    pub fn temperature_k(&self) -> f64 {
        self.temperature_k
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure_pa
    }

    pub fn density_kg_m3(&self) -> f64 {
        self.density_kg_m3
    }

    /// Snapshot of the derived quantities for reporting.
    pub fn conditions(&self) -> AtmosphericConditions {
        AtmosphericConditions {
            altitude_m: self.inputs.altitude_m,
            temperature_k: self.temperature_k,
            pressure_pa: self.pressure_pa,
            density_kg_m3: self.density_kg_m3,
            gravity_m_s2: self.inputs.gravity_m_s2,
            wind: self.inputs.wind,
        }
    }
}

/// Plain record of the evaluated atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtmosphericConditions {
    pub altitude_m: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub gravity_m_s2: f64,
    pub wind: Wind,
}

/// Altitude at which the linear temperature profile reaches absolute zero.
pub fn lapse_rate_limit_m(inputs: &AtmosphereInputs) -> f64 {
    inputs.sea_level_temperature_k / inputs.lapse_rate_k_m
}

fn temperature_k(inputs: &AtmosphereInputs) -> f64 {
    inputs.sea_level_temperature_k - inputs.lapse_rate_k_m * inputs.altitude_m
}

fn pressure_pa(inputs: &AtmosphereInputs) -> f64 {
    let exponent = inputs.gravity_m_s2 / (inputs.gas_constant_j_kg_k * inputs.lapse_rate_k_m);
    let ratio = 1.0 - inputs.lapse_rate_k_m * inputs.altitude_m / inputs.sea_level_temperature_k;
    inputs.sea_level_pressure_pa * ratio.powf(exponent)
}
