//! Scenario configuration models and loaders.
//!
//! Shapes stay as strings here; they are parsed into the closed shape enumerations when a
//! scenario is turned into models.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use chute_core::flight::{DEFAULT_DEPLOY_TIME_S, DEFAULT_MAX_TIME_S, DEFAULT_TIME_STEP_S};

/// One complete descent scenario.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub payload: PayloadConfig,
    pub parachute: ParachuteConfig,
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub flight: FlightConfig,
    #[serde(default)]
    pub oscillation: Option<OscillationConfig>,
    #[serde(default)]
    pub loads: LoadsConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PayloadConfig {
    pub name: String,
    pub mass_kg: f64,
    pub shape: String,
    pub width_m: f64,
    pub height_m: f64,
    #[serde(default)]
    pub depth_m: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ParachuteConfig {
    pub diameter_m: f64,
    pub drag_coefficient: f64,
    #[serde(default = "default_canopy_shape")]
    pub shape: String,
    #[serde(default)]
    pub mass_kg: Option<f64>,
    #[serde(default)]
    pub suspension_line_length_m: Option<f64>,
    #[serde(default)]
    pub opening_force_coefficient: Option<f64>,
    #[serde(default)]
    pub inflation_time_s: Option<f64>,
}

/// Atmosphere overrides; unset values use the ISA sea-level defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EnvironmentConfig {
    pub altitude_m: f64,
    #[serde(default)]
    pub sea_level_temperature_k: Option<f64>,
    #[serde(default)]
    pub sea_level_pressure_pa: Option<f64>,
    #[serde(default)]
    pub lapse_rate_k_m: Option<f64>,
    #[serde(default)]
    pub gravity_m_s2: Option<f64>,
    #[serde(default)]
    pub wind_horizontal_m_s: Option<f64>,
    #[serde(default)]
    pub wind_vertical_m_s: Option<f64>,
    #[serde(default)]
    pub wind_direction_deg: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FlightConfig {
    #[serde(default = "default_max_time_s")]
    pub t_max_s: f64,
    #[serde(default = "default_deploy_time_s")]
    pub t_deploy_s: f64,
    #[serde(default = "default_time_step_s")]
    pub dt_s: f64,
    #[serde(default)]
    pub horizontal_speed_m_s: Option<f64>,
    #[serde(default)]
    pub inflation_model: InflationModelConfig,
    #[serde(default)]
    pub step_budget: Option<usize>,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            t_max_s: default_max_time_s(),
            t_deploy_s: default_deploy_time_s(),
            dt_s: default_time_step_s(),
            horizontal_speed_m_s: None,
            inflation_model: InflationModelConfig::default(),
            step_budget: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InflationModelConfig {
    #[default]
    Capped,
    Uncapped,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OscillationConfig {
    #[serde(default = "default_damping_ratio")]
    pub damping_ratio: f64,
    #[serde(default = "default_natural_frequency")]
    pub natural_frequency_rad_s: f64,
    #[serde(default = "default_initial_angle")]
    pub initial_angle_deg: f64,
}

/// Coefficients for the load estimates.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoadsConfig {
    #[serde(default = "default_lift_coefficient")]
    pub lift_coefficient: f64,
    #[serde(default = "default_lift_to_drag")]
    pub lift_to_drag: f64,
    #[serde(default = "default_payload_drag_coefficient")]
    pub payload_drag_coefficient: f64,
    #[serde(default = "default_line_count")]
    pub line_count: u32,
    #[serde(default = "default_line_stiffness")]
    pub line_stiffness_n_m: f64,
}

impl Default for LoadsConfig {
    fn default() -> Self {
        Self {
            lift_coefficient: default_lift_coefficient(),
            lift_to_drag: default_lift_to_drag(),
            payload_drag_coefficient: default_payload_drag_coefficient(),
            line_count: default_line_count(),
            line_stiffness_n_m: default_line_stiffness(),
        }
    }
}

fn default_canopy_shape() -> String {
    "hemispherical".to_string()
}

fn default_max_time_s() -> f64 {
    DEFAULT_MAX_TIME_S
}

fn default_deploy_time_s() -> f64 {
    DEFAULT_DEPLOY_TIME_S
}

fn default_time_step_s() -> f64 {
    DEFAULT_TIME_STEP_S
}

fn default_damping_ratio() -> f64 {
    0.15
}

fn default_natural_frequency() -> f64 {
    0.8
}

fn default_initial_angle() -> f64 {
    5.0
}

fn default_lift_coefficient() -> f64 {
    1.75
}

fn default_lift_to_drag() -> f64 {
    0.5
}

fn default_payload_drag_coefficient() -> f64 {
    1.05
}

fn default_line_count() -> u32 {
    4
}

fn default_line_stiffness() -> f64 {
    1.0e5
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no scenarios found at {0}")]
    Empty(PathBuf),
    #[error("scenario '{0}' not found")]
    NotFound(String),
}

/// Load scenarios from a TOML file, a YAML list, or a directory of TOML files.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ConfigError> {
    let path = path.as_ref();
    let scenarios: Vec<ScenarioConfig> = load_records(path)?;
    if scenarios.is_empty() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }
    Ok(scenarios)
}

/// Parse a single scenario from TOML text.
pub fn parse_scenario_toml(contents: &str) -> Result<ScenarioConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Pick a scenario by case-insensitive name, or the first one when no name is given.
pub fn select_scenario(
    scenarios: &[ScenarioConfig],
    requested: Option<&str>,
) -> Result<ScenarioConfig, ConfigError> {
    match requested {
        Some(name) => {
            let upper = name.to_uppercase();
            scenarios
                .iter()
                .find(|s| s.name.to_uppercase() == upper)
                .cloned()
                .ok_or_else(|| ConfigError::NotFound(name.to_string()))
        }
        None => scenarios
            .first()
            .cloned()
            .ok_or_else(|| ConfigError::NotFound("<first>".to_string())),
    }
}

fn load_records<T>(path: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
