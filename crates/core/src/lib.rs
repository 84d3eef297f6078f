//! Physical constants and shared primitives for the parachute descent workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Gravitational acceleration used throughout the descent models (m/s²).
    pub const GRAVITY_M_S2: f64 = 9.81;
    /// Specific gas constant of dry air (J/(kg·K)).
    pub const GAS_CONSTANT_AIR_J_KG_K: f64 = 287.05;
    /// ISA sea-level temperature (K).
    pub const SEA_LEVEL_TEMPERATURE_K: f64 = 288.15;
    /// ISA sea-level pressure (Pa).
    pub const SEA_LEVEL_PRESSURE_PA: f64 = 101_325.0;
    /// ISA sea-level air density (kg/m³).
    pub const SEA_LEVEL_DENSITY_KG_M3: f64 = 1.225;
    /// Tropospheric temperature lapse rate (K/m).
    pub const TROPOSPHERE_LAPSE_RATE_K_M: f64 = 0.0065;
    /// Largest deceleration the inflation phase may impose, in multiples of g.
    pub const MAX_INFLATION_LOAD_FACTOR: f64 = 4.0;
}

/// Flight-plan defaults shared by the trajectory engine and scenario files.
pub mod flight {
    /// Sampling step (s).
    pub const DEFAULT_TIME_STEP_S: f64 = 0.1;
    /// Simulation horizon (s).
    pub const DEFAULT_MAX_TIME_S: f64 = 60.0;
    /// Delay from release to canopy deployment (s).
    pub const DEFAULT_DEPLOY_TIME_S: f64 = 2.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::GRAVITY_M_S2;

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }

    /// Express an acceleration (m/s²) as a load factor in multiples of g.
    #[inline]
    pub fn load_factor(acceleration_m_s2: f64) -> f64 {
        acceleration_m_s2.abs() / GRAVITY_M_S2
    }
}

/// Argument checks shared by the model constructors.
pub mod validate {
    /// `true` when `value` is finite and strictly positive.
    #[inline]
    pub fn is_positive(value: f64) -> bool {
        value.is_finite() && value > 0.0
    }

    /// `true` when `value` is finite and not negative.
    #[inline]
    pub fn is_non_negative(value: f64) -> bool {
        value.is_finite() && value >= 0.0
    }
}
