use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use parachute_descent::config::{InflationModelConfig, ScenarioConfig, load_scenarios, select_scenario};
use parachute_descent::export;
use parachute_descent::mission::{DescentConfig, DescentProfile, plan_descent, scenario};
use parachute_descent::oscillation::OscillationParams;
use parachute_descent::trajectory::StateLookup;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Parachute descent estimator (free fall, inflation, terminal descent)"
)]
struct Cli {
    /// Scenario file (TOML or YAML list) or directory of TOML scenarios
    #[arg(long, default_value = "configs/scenarios")]
    scenario: PathBuf,

    /// Scenario name (case-insensitive, defaults to the first scenario found)
    #[arg(long)]
    name: Option<String>,

    /// Deployment altitude in m (overrides the scenario)
    #[arg(long)]
    altitude: Option<f64>,

    /// Time from release to canopy deployment in s
    #[arg(long)]
    deploy_time: Option<f64>,

    /// Simulation horizon in s
    #[arg(long)]
    max_time: Option<f64>,

    /// Sampling step in s
    #[arg(long)]
    time_step: Option<f64>,

    /// Constant horizontal drift speed in m/s (defaults to the horizontal wind)
    #[arg(long)]
    horizontal_speed: Option<f64>,

    /// Inflation-phase acceleration model
    #[arg(long, value_enum)]
    inflation_model: Option<InflationMode>,

    /// Print the sampled state nearest to this time (s) instead of the full report
    #[arg(long)]
    at: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Series emitted with `--format csv`
    #[arg(long, value_enum, default_value_t = Series::Trajectory)]
    series: Series,
}

#[derive(Copy, Clone, ValueEnum, Debug, PartialEq, Eq)]
enum InflationMode {
    Capped,
    Uncapped,
}

#[derive(Copy, Clone, ValueEnum, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Copy, Clone, ValueEnum, Debug, PartialEq, Eq)]
enum Series {
    Trajectory,
    Oscillation,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let scenarios = load_scenarios(&cli.scenario)?;
    let mut selected = select_scenario(&scenarios, cli.name.as_deref())?;
    apply_overrides(&mut selected, &cli);

    let mut config = scenario::from_config(&selected)?;
    if cli.series == Series::Oscillation && config.oscillation.is_none() {
        config.oscillation = Some(OscillationParams::default());
    }
    let profile = plan_descent(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(query) = cli.at {
        let lookup = profile.trajectory.state_at(query);
        match cli.format {
            OutputFormat::Json => export::report::write_json(&mut out, &lookup)?,
            _ => print_state(&mut out, query, &lookup)?,
        }
        return Ok(());
    }

    match cli.format {
        OutputFormat::Text => print_report(&mut out, &config, &profile)?,
        OutputFormat::Json => export::report::write_json(&mut out, &profile)?,
        OutputFormat::Csv => match cli.series {
            Series::Trajectory => export::trajectory::write_csv(&mut out, &profile.trajectory)?,
            Series::Oscillation => {
                let series = profile
                    .oscillation
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("oscillation series was not computed"))?;
                export::oscillation::write_csv(&mut out, series)?
            }
        },
    }
    Ok(())
}

fn apply_overrides(scenario: &mut ScenarioConfig, cli: &Cli) {
    if let Some(altitude) = cli.altitude {
        scenario.environment.altitude_m = altitude;
    }
    if let Some(deploy) = cli.deploy_time {
        scenario.flight.t_deploy_s = deploy;
    }
    if let Some(max_time) = cli.max_time {
        scenario.flight.t_max_s = max_time;
    }
    if let Some(dt) = cli.time_step {
        scenario.flight.dt_s = dt;
    }
    if let Some(speed) = cli.horizontal_speed {
        scenario.flight.horizontal_speed_m_s = Some(speed);
    }
    if let Some(mode) = cli.inflation_model {
        scenario.flight.inflation_model = match mode {
            InflationMode::Capped => InflationModelConfig::Capped,
            InflationMode::Uncapped => InflationModelConfig::Uncapped,
        };
    }
}

fn print_state(out: &mut impl Write, query: f64, lookup: &StateLookup) -> io::Result<()> {
    if lookup.is_out_of_range() {
        writeln!(
            out,
            "[WARNING] requested time {:.1} s lies outside the simulated interval; showing boundary state",
            query
        )?;
    }
    let s = lookup.sample();
    writeln!(out, "{:>25}: {:.3}", "Time [s]", s.time_s)?;
    writeln!(out, "{:>25}: {:.3}", "Altitude [m]", s.altitude_m)?;
    writeln!(out, "{:>25}: {:.3}", "Vertical Speed [m/s]", s.vertical_velocity_m_s)?;
    writeln!(out, "{:>25}: {:.3}", "Acceleration [m/s²]", s.vertical_acceleration_m_s2)?;
    writeln!(out, "{:>25}: {:.3}", "Horizontal Position [m]", s.horizontal_position_m)?;
    Ok(())
}

fn print_report(
    out: &mut impl Write,
    config: &DescentConfig,
    profile: &DescentProfile,
) -> io::Result<()> {
    let env = &profile.conditions;
    let payload = &config.payload;
    let chute = &config.parachute;
    let loads = &profile.loads;
    let summary = &profile.summary;
    let bounds = &profile.boundaries;

    writeln!(out, "=== Descent Profile: {} ===", profile.name)?;
    writeln!(
        out,
        "Environment    : h = {:.0} m, T = {:.2} K, P = {:.2} Pa, rho = {:.3} kg/m³",
        env.altitude_m, env.temperature_k, env.pressure_pa, env.density_kg_m3
    )?;
    writeln!(
        out,
        "Wind           : horizontal = {:.1} m/s (from {:.0}°), vertical = {:.1} m/s",
        env.wind.horizontal_m_s, env.wind.direction_deg, env.wind.vertical_m_s
    )?;
    let cog = payload.center_of_gravity_m();
    writeln!(
        out,
        "Payload        : {} ({}), m = {:.2} kg, V = {:.4} m³, rho = {:.1} kg/m³, A = {:.4} m², CoG = ({:.3}, {:.3}, {:.3}) m",
        payload.name,
        payload.shape,
        payload.mass_kg,
        payload.volume_m3(),
        payload.density_kg_m3(),
        payload.frontal_area_m2(),
        cog[0],
        cog[1],
        cog[2]
    )?;
    writeln!(
        out,
        "Parachute      : {} d = {:.2} m, Cd = {:.2}, CdA = {:.4} m², Cx = {:.2}, t_inf = {:.2} s, lines = {:.2} m",
        chute.shape(),
        chute.diameter_m(),
        chute.drag_coefficient(),
        chute.drag_area_m2(),
        chute.opening_force_coefficient(),
        chute.inflation_time_s(),
        chute.suspension_line_length_m()
    )?;
    writeln!(
        out,
        "Terminal speed : {:.3} m/s (total mass {:.2} kg)",
        profile.terminal_velocity_m_s, profile.total_mass_kg
    )?;
    writeln!(
        out,
        "Inflation      : a = {:.3} m/s² ({:.2} g){}",
        profile.inflation_acceleration_m_s2,
        loads.peak_inflation_load_factor,
        if profile.inflation_cap_engaged { " [4 g cap]" } else { "" }
    )?;
    writeln!(
        out,
        "Deployment     : t = {:.2} s, h = {:.1} m, v = {:.2} m/s",
        bounds.deploy_time_s, bounds.deploy_altitude_m, bounds.deploy_velocity_m_s
    )?;
    writeln!(
        out,
        "Full inflation : t = {:.2} s, h = {:.1} m, v = {:.2} m/s",
        bounds.full_inflation_time_s, bounds.full_inflation_altitude_m, bounds.full_inflation_velocity_m_s
    )?;
    writeln!(
        out,
        "Loads          : weight = {:.1} N, opening = {:.1} N, shock = {:.1} N, snatch = {:.1} N, payload drag = {:.1} N",
        loads.weight_n,
        loads.opening_force_n,
        loads.opening_shock_n,
        loads.snatch_force_n,
        loads.payload_drag_at_deployment_n
    )?;
    if summary.landed {
        writeln!(
            out,
            "Touchdown      : t = {:.2} s, drift = {:.2} m",
            summary.final_time_s, summary.horizontal_drift_m
        )?;
    } else {
        writeln!(
            out,
            "Horizon        : t = {:.2} s reached at h = {:.1} m, drift = {:.2} m",
            summary.final_time_s, summary.final_altitude_m, summary.horizontal_drift_m
        )?;
    }
    if let Some(series) = &profile.oscillation {
        writeln!(
            out,
            "Oscillation    : peak = {:.2}°, within 1° after {}",
            series.peak_angle_deg(),
            series
                .settling_time_s(1.0)
                .map(|t| format!("{t:.1} s"))
                .unwrap_or_else(|| "never".to_string())
        )?;
    }
    Ok(())
}
