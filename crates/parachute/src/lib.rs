//! Canopy model: shape presets, fixed drag area, and the time-varying inflated area.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use chute_core::validate::{is_non_negative, is_positive};

/// Canopy planforms with tabulated opening behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanopyShape {
    Flat,
    Hemispherical,
    Conical,
    Ribbon,
    Reefed,
    GuideSurface,
    Square,
}

/// Opening-force coefficient and inflation time associated with a canopy shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningPreset {
    pub opening_force_coefficient: f64,
    pub inflation_time_s: f64,
}

impl CanopyShape {
    pub const ALL: [CanopyShape; 7] = [
        CanopyShape::Flat,
        CanopyShape::Hemispherical,
        CanopyShape::Conical,
        CanopyShape::Ribbon,
        CanopyShape::Reefed,
        CanopyShape::GuideSurface,
        CanopyShape::Square,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanopyShape::Flat => "flat",
            CanopyShape::Hemispherical => "hemispherical",
            CanopyShape::Conical => "conical",
            CanopyShape::Ribbon => "ribbon",
            CanopyShape::Reefed => "reefed",
            CanopyShape::GuideSurface => "guide_surface",
            CanopyShape::Square => "square",
        }
    }

    pub fn opening_preset(self) -> OpeningPreset {
        let (opening_force_coefficient, inflation_time_s) = match self {
            CanopyShape::Flat => (1.8, 0.7),
            CanopyShape::Hemispherical => (1.5, 1.0),
            CanopyShape::Conical => (1.3, 1.2),
            CanopyShape::Ribbon => (1.0, 1.8),
            CanopyShape::Reefed => (0.6, 2.0),
            CanopyShape::GuideSurface => (1.4, 1.0),
            CanopyShape::Square => (1.2, 1.0),
        };
        OpeningPreset {
            opening_force_coefficient,
            inflation_time_s,
        }
    }

    /// Suspension line length as a multiple of the canopy diameter.
    pub fn line_length_ratio(self) -> f64 {
        match self {
            CanopyShape::Flat | CanopyShape::Ribbon | CanopyShape::Reefed => 1.0,
            CanopyShape::Hemispherical => 1.2,
            CanopyShape::Conical | CanopyShape::GuideSurface => 1.3,
            CanopyShape::Square => 1.1,
        }
    }

    /// Nominal area; `diameter_m` is the side length for square canopies.
    pub fn reference_area_m2(self, diameter_m: f64) -> f64 {
        match self {
            CanopyShape::Square => diameter_m * diameter_m,
            _ => PI / 4.0 * diameter_m * diameter_m,
        }
    }
}

impl fmt::Display for CanopyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanopyShape {
    type Err = ParachuteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        CanopyShape::ALL
            .into_iter()
            .find(|shape| shape.as_str() == normalized)
            .ok_or_else(|| ParachuteError::UnknownShape(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParachuteError {
    #[error("unknown canopy shape `{0}`")]
    UnknownShape(String),
    #[error("{name} must be positive (got {value})")]
    NonPositiveParameter { name: &'static str, value: f64 },
    #[error("parachute mass cannot be negative (got {0} kg)")]
    NegativeMass(f64),
}

/// User-facing description of a canopy; unset fields fall back to the shape presets.
#[derive(Debug, Clone, PartialEq)]
pub struct ParachuteSpec {
    pub diameter_m: f64,
    pub drag_coefficient: f64,
    pub shape: CanopyShape,
    pub mass_kg: Option<f64>,
    pub suspension_line_length_m: Option<f64>,
    pub opening_force_coefficient: Option<f64>,
    pub inflation_time_s: Option<f64>,
}

impl ParachuteSpec {
    pub fn new(diameter_m: f64, drag_coefficient: f64, shape: CanopyShape) -> Self {
        Self {
            diameter_m,
            drag_coefficient,
            shape,
            mass_kg: None,
            suspension_line_length_m: None,
            opening_force_coefficient: None,
            inflation_time_s: None,
        }
    }
}

/// Validated canopy with all derived properties resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parachute {
    diameter_m: f64,
    drag_coefficient: f64,
    shape: CanopyShape,
    mass_kg: f64,
    suspension_line_length_m: f64,
    opening_force_coefficient: f64,
    inflation_time_s: f64,
    reference_area_m2: f64,
    drag_area_m2: f64,
}

/// One point of the sampled inflation profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InflationSample {
    pub time_s: f64,
    pub drag_area_m2: f64,
}

impl Parachute {
    pub fn new(spec: ParachuteSpec) -> Result<Self, ParachuteError> {
        let preset = spec.shape.opening_preset();
        let mass_kg = spec.mass_kg.unwrap_or(0.0);
        if !is_non_negative(mass_kg) {
            return Err(ParachuteError::NegativeMass(mass_kg));
        }
        let suspension_line_length_m = spec
            .suspension_line_length_m
            .unwrap_or(spec.shape.line_length_ratio() * spec.diameter_m);
        let opening_force_coefficient = spec
            .opening_force_coefficient
            .unwrap_or(preset.opening_force_coefficient);
        let inflation_time_s = spec.inflation_time_s.unwrap_or(preset.inflation_time_s);

        for (name, value) in [
            ("diameter", spec.diameter_m),
            ("drag coefficient", spec.drag_coefficient),
            ("suspension line length", suspension_line_length_m),
            ("opening force coefficient", opening_force_coefficient),
            ("inflation time", inflation_time_s),
        ] {
            if !is_positive(value) {
                return Err(ParachuteError::NonPositiveParameter { name, value });
            }
        }

        let reference_area_m2 = spec.shape.reference_area_m2(spec.diameter_m);
        Ok(Self {
            diameter_m: spec.diameter_m,
            drag_coefficient: spec.drag_coefficient,
            shape: spec.shape,
            mass_kg,
            suspension_line_length_m,
            opening_force_coefficient,
            inflation_time_s,
            reference_area_m2,
            drag_area_m2: spec.drag_coefficient * reference_area_m2,
        })
    }

    pub fn diameter_m(&self) -> f64 {
        self.diameter_m
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn shape(&self) -> CanopyShape {
        self.shape
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn suspension_line_length_m(&self) -> f64 {
        self.suspension_line_length_m
    }

    pub fn opening_force_coefficient(&self) -> f64 {
        self.opening_force_coefficient
    }

    pub fn inflation_time_s(&self) -> f64 {
        self.inflation_time_s
    }

    pub fn reference_area_m2(&self) -> f64 {
        self.reference_area_m2
    }

    /// Fully inflated drag area `Cd · S0`.
    pub fn drag_area_m2(&self) -> f64 {
        self.drag_area_m2
    }

    /// Drag area `time_s` seconds after deployment; grows quadratically until fully open.
    pub fn inflated_drag_area_m2(&self, time_s: f64) -> f64 {
        if time_s <= 0.0 {
            0.0
        } else if time_s < self.inflation_time_s {
            self.drag_area_m2 * (time_s / self.inflation_time_s).powi(2)
        } else {
            self.drag_area_m2
        }
    }

    pub fn is_fully_inflated(&self, time_s: f64) -> bool {
        time_s >= self.inflation_time_s
    }

    /// Sample the inflation profile over `[0, inflation_time]`, always ending at full area.
    pub fn inflation_profile(&self, samples: usize) -> Vec<InflationSample> {
        let intervals = samples.max(2) - 1;
        (0..=intervals)
            .map(|i| {
                let time_s = self.inflation_time_s * i as f64 / intervals as f64;
                InflationSample {
                    time_s,
                    drag_area_m2: self.inflated_drag_area_m2(time_s),
                }
            })
            .collect()
    }
}
