//! Nearest-sample state queries over a generated trajectory.

use log::warn;
use serde::Serialize;

use crate::sample::{Trajectory, TrajectorySample};

/// Result of a state-at-time query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateLookup {
    /// Sample closest in time to the query.
    Nearest { sample: TrajectorySample },
    /// Query outside the generated interval; the boundary sample is returned instead.
    OutOfRange {
        requested_time_s: f64,
        sample: TrajectorySample,
    },
}

impl StateLookup {
    pub fn sample(&self) -> &TrajectorySample {
        match self {
            StateLookup::Nearest { sample } | StateLookup::OutOfRange { sample, .. } => sample,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, StateLookup::OutOfRange { .. })
    }
}

impl Trajectory {
    /// Sample nearest to `time_s`; ties resolve to the earlier sample.
    ///
    /// Queries past the last sample (or before `t = 0`, or NaN) return the boundary sample
    /// flagged as out of range.
    pub fn state_at(&self, time_s: f64) -> StateLookup {
        let first = *self.first();
        let last = *self.last();
        if time_s.is_nan() || time_s > last.time_s {
            warn!(
                "requested time {time_s:.3} s exceeds the simulated interval (up to {:.3} s); returning last state",
                last.time_s
            );
            return StateLookup::OutOfRange {
                requested_time_s: time_s,
                sample: last,
            };
        }
        if time_s < first.time_s {
            warn!("requested time {time_s:.3} s precedes the simulation start; returning first state");
            return StateLookup::OutOfRange {
                requested_time_s: time_s,
                sample: first,
            };
        }

        let samples = self.samples();
        let idx = samples.partition_point(|s| s.time_s < time_s);
        let sample = if idx == 0 {
            samples[0]
        } else if idx == samples.len() {
            samples[idx - 1]
        } else {
            let before = samples[idx - 1];
            let after = samples[idx];
            if (time_s - before.time_s) <= (after.time_s - time_s) {
                before
            } else {
                after
            }
        };
        StateLookup::Nearest { sample }
    }
}
