//! Generated trajectory storage and derived summaries.

use serde::Serialize;

use crate::DescentPhase;

/// One fixed-step record of the descent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub time_s: f64,
    /// Floored at zero.
    pub altitude_m: f64,
    pub vertical_velocity_m_s: f64,
    pub horizontal_position_m: f64,
    pub vertical_acceleration_m_s2: f64,
    pub phase: DescentPhase,
}

/// Time-ordered descent samples. Never empty: generation always emits the `t = 0` sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    time_step_s: f64,
    samples: Vec<TrajectorySample>,
}

/// Headline figures of a generated trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub sample_count: usize,
    pub landed: bool,
    pub final_time_s: f64,
    pub final_altitude_m: f64,
    pub horizontal_drift_m: f64,
    pub peak_speed_m_s: f64,
    pub peak_acceleration_m_s2: f64,
}

impl Trajectory {
    pub(crate) fn new(samples: Vec<TrajectorySample>, time_step_s: f64) -> Self {
        debug_assert!(!samples.is_empty());
        Self {
            time_step_s,
            samples,
        }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn time_step_s(&self) -> f64 {
        self.time_step_s
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
        self.samples.iter()
    }

    pub fn first(&self) -> &TrajectorySample {
        &self.samples[0]
    }

    pub fn last(&self) -> &TrajectorySample {
        &self.samples[self.samples.len() - 1]
    }

    /// Whether the descent reached the ground before the time horizon.
    pub fn landed(&self) -> bool {
        self.last().altitude_m <= 0.0
    }

    pub fn landing_time_s(&self) -> Option<f64> {
        self.landed().then(|| self.last().time_s)
    }

    pub fn horizontal_drift_m(&self) -> f64 {
        self.last().horizontal_position_m
    }

    pub fn peak_speed_m_s(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.vertical_velocity_m_s.abs())
            .fold(0.0, f64::max)
    }

    pub fn peak_acceleration_m_s2(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.vertical_acceleration_m_s2.abs())
            .fold(0.0, f64::max)
    }

    /// First sample of the given phase, if the descent reached it.
    pub fn phase_entry(&self, phase: DescentPhase) -> Option<&TrajectorySample> {
        self.samples.iter().find(|s| s.phase == phase)
    }

    pub fn summary(&self) -> TrajectorySummary {
        let last = self.last();
        TrajectorySummary {
            sample_count: self.len(),
            landed: self.landed(),
            final_time_s: last.time_s,
            final_altitude_m: last.altitude_m,
            horizontal_drift_m: last.horizontal_position_m,
            peak_speed_m_s: self.peak_speed_m_s(),
            peak_acceleration_m_s2: self.peak_acceleration_m_s2(),
        }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
