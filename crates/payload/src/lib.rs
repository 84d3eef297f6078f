//! Payload geometry: volume, frontal area, density, and centre of gravity by shape.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use chute_core::validate::is_positive;

/// Supported payload envelopes. `width` is the diameter for cylinders and spheres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    Cuboid,
    Cylinder,
    Sphere,
}

impl PayloadShape {
    pub fn as_str(self) -> &'static str {
        match self {
            PayloadShape::Cuboid => "cuboid",
            PayloadShape::Cylinder => "cylinder",
            PayloadShape::Sphere => "sphere",
        }
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayloadShape {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cuboid" => Ok(PayloadShape::Cuboid),
            "cylinder" => Ok(PayloadShape::Cylinder),
            "sphere" => Ok(PayloadShape::Sphere),
            _ => Err(PayloadError::UnknownShape(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("unknown payload shape `{0}` (expected cuboid, cylinder, or sphere)")]
    UnknownShape(String),
    #[error("payload mass must be positive (got {0} kg)")]
    NonPositiveMass(f64),
    #[error("payload {name} must be positive (got {value} m)")]
    NonPositiveDimension { name: &'static str, value: f64 },
}

/// A rigid payload hanging below the canopy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub name: String,
    pub mass_kg: f64,
    pub shape: PayloadShape,
    pub width_m: f64,
    pub height_m: f64,
    pub depth_m: f64,
}

impl Payload {
    /// Build a payload, defaulting `depth_m` to the width when absent.
    pub fn new(
        name: impl Into<String>,
        mass_kg: f64,
        shape: PayloadShape,
        width_m: f64,
        height_m: f64,
        depth_m: Option<f64>,
    ) -> Result<Self, PayloadError> {
        if !is_positive(mass_kg) {
            return Err(PayloadError::NonPositiveMass(mass_kg));
        }
        let depth_m = depth_m.unwrap_or(width_m);
        for (name, value) in [("width", width_m), ("height", height_m), ("depth", depth_m)] {
            if !is_positive(value) {
                return Err(PayloadError::NonPositiveDimension { name, value });
            }
        }
        Ok(Self {
            name: name.into(),
            mass_kg,
            shape,
            width_m,
            height_m,
            depth_m,
        })
    }

    fn radius_m(&self) -> f64 {
        self.width_m / 2.0
    }

    pub fn volume_m3(&self) -> f64 {
        match self.shape {
            PayloadShape::Cuboid => self.width_m * self.height_m * self.depth_m,
            PayloadShape::Cylinder => PI * self.radius_m().powi(2) * self.height_m,
            PayloadShape::Sphere => 4.0 / 3.0 * PI * self.radius_m().powi(3),
        }
    }

    /// Area projected onto the plane normal to the descent direction.
    pub fn frontal_area_m2(&self) -> f64 {
        match self.shape {
            PayloadShape::Cuboid => self.width_m * self.height_m,
            PayloadShape::Cylinder | PayloadShape::Sphere => PI * self.radius_m().powi(2),
        }
    }

    pub fn density_kg_m3(&self) -> f64 {
        self.mass_kg / self.volume_m3()
    }

    /// Geometric centre `(x, y, z)` measured from the envelope corner.
    pub fn center_of_gravity_m(&self) -> [f64; 3] {
        match self.shape {
            PayloadShape::Cuboid => [self.width_m / 2.0, self.height_m / 2.0, self.depth_m / 2.0],
            PayloadShape::Cylinder => [self.width_m / 2.0, self.height_m / 2.0, self.width_m / 2.0],
            PayloadShape::Sphere => {
                let r = self.radius_m();
                [r, r, r]
            }
        }
    }
}
