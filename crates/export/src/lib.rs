//! Render descent series as CSV and reports as JSON onto any writer.

use std::io::Write;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to flush output: {0}")]
    Io(#[from] std::io::Error),
}

pub mod trajectory {
    use super::*;
    use chute_trajectory::{DescentPhase, Trajectory};

    pub const HEADER: [&str; 6] = [
        "time_s",
        "altitude_m",
        "vertical_velocity_m_s",
        "vertical_acceleration_m_s2",
        "horizontal_position_m",
        "phase",
    ];

    fn phase_label(phase: DescentPhase) -> &'static str {
        match phase {
            DescentPhase::FreeFall => "free_fall",
            DescentPhase::Inflation => "inflation",
            DescentPhase::TerminalDescent => "terminal_descent",
        }
    }

    /// Write one CSV row per sample, matching [`HEADER`] ordering.
    pub fn write_csv<W: Write>(writer: W, trajectory: &Trajectory) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(HEADER)?;
        for s in trajectory {
            csv.write_record([
                format!("{:.3}", s.time_s),
                format!("{:.3}", s.altitude_m),
                format!("{:.4}", s.vertical_velocity_m_s),
                format!("{:.4}", s.vertical_acceleration_m_s2),
                format!("{:.3}", s.horizontal_position_m),
                phase_label(s.phase).to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

pub mod oscillation {
    use super::*;
    use chute_oscillation::OscillationSeries;

    pub const HEADER: [&str; 3] = ["time_s", "angle_of_attack_deg", "altitude_m"];

    pub fn write_csv<W: Write>(writer: W, series: &OscillationSeries) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(HEADER)?;
        for s in series.iter() {
            csv.write_record([
                format!("{:.3}", s.time_s),
                format!("{:.4}", s.angle_of_attack_deg),
                format!("{:.3}", s.altitude_m),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

pub mod report {
    use super::*;
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    /// Pretty-printed JSON followed by a newline.
    pub fn write_json<W: Write, T: Serialize>(mut writer: W, report: &T) -> Result<(), ExportError> {
        to_writer_pretty(&mut writer, report)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
