use std::io;
use std::path::PathBuf;

use clap::Parser;
use log::warn;
use parachute_descent::config::{load_scenarios, select_scenario};
use parachute_descent::mission::{plan_descent, scenario};

/// Sweep canopy diameter and deployment delay for one scenario and tabulate the outcome.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Canopy diameter × deployment time sensitivity sweep (CSV on stdout)"
)]
struct Cli {
    /// Scenario file (TOML or YAML list) or directory of TOML scenarios
    #[arg(long, default_value = "configs/scenarios")]
    scenario: PathBuf,

    /// Scenario name (case-insensitive, defaults to the first scenario found)
    #[arg(long)]
    name: Option<String>,

    /// Canopy diameters in m
    #[arg(long, value_delimiter = ',', default_value = "4,6,8,10,12")]
    diameters: Vec<f64>,

    /// Deployment delays in s
    #[arg(long, value_delimiter = ',', default_value = "0,1,2,3")]
    deploy_times: Vec<f64>,
}

const HEADER: [&str; 9] = [
    "diameter_m",
    "t_deploy_s",
    "terminal_velocity_m_s",
    "landed",
    "final_time_s",
    "final_altitude_m",
    "drift_m",
    "peak_load_factor",
    "opening_shock_n",
];

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let scenarios = load_scenarios(&cli.scenario)?;
    let base = select_scenario(&scenarios, cli.name.as_deref())?;

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record(HEADER)?;

    for &diameter in &cli.diameters {
        for &deploy in &cli.deploy_times {
            let mut cell = base.clone();
            cell.parachute.diameter_m = diameter;
            cell.flight.t_deploy_s = deploy;
            cell.oscillation = None;

            let profile = match scenario::from_config(&cell).and_then(|cfg| plan_descent(&cfg)) {
                Ok(profile) => profile,
                Err(err) => {
                    warn!("skipping d = {diameter} m, t_deploy = {deploy} s: {err}");
                    continue;
                }
            };
            let summary = &profile.summary;
            writer.write_record([
                format!("{diameter:.2}"),
                format!("{deploy:.2}"),
                format!("{:.3}", profile.terminal_velocity_m_s),
                summary.landed.to_string(),
                format!("{:.2}", summary.final_time_s),
                format!("{:.1}", summary.final_altitude_m),
                format!("{:.2}", summary.horizontal_drift_m),
                format!("{:.3}", profile.loads.peak_inflation_load_factor),
                format!("{:.1}", profile.loads.opening_shock_n),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}
