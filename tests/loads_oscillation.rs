use parachute_descent::forces::{
    ForceError, SnatchModel, drag_force_n, dynamic_pressure_pa, opening_force_n, opening_shock_n,
};
use parachute_descent::oscillation::{
    OscillationError, OscillationEstimator, OscillationParams, UniformDescent,
    kinematic_angle_of_attack_deg, kinematic_angle_series,
};
use parachute_descent::trajectory::{DescentInputs, TrajectoryEngine};

fn engine() -> TrajectoryEngine {
    let inputs = DescentInputs {
        total_mass_kg: 80.0,
        gravity_m_s2: 9.81,
        air_density_kg_m3: 1.225,
        drag_area_m2: 20.0,
        initial_altitude_m: 1000.0,
        max_time_s: 30.0,
        deploy_time_s: 2.0,
        inflation_time_s: 1.0,
        horizontal_speed_m_s: 4.0,
    };
    TrajectoryEngine::new(inputs, 0.1).expect("engine")
}

#[test]
fn aerodynamic_load_formulas() {
    assert!((dynamic_pressure_pa(1.225, 10.0) - 61.25).abs() < 1e-12);
    assert!((drag_force_n(1.225, 10.0, 2.0, 1.5) - 183.75).abs() < 1e-9);
    assert!((opening_force_n(1.225, 10.0, 2.0, 1.75, 0.5) - 321.5625).abs() < 1e-9);
    assert!((opening_shock_n(1.225, 10.0, 3.0, 1.5) - 275.625).abs() < 1e-9);
}

#[test]
fn snatch_force_follows_line_stretch() {
    let snatch = SnatchModel::default();
    assert_eq!(snatch.elongation(80.0, 5.0), Ok(8.0));
    let force = snatch.snatch_force_n(80.0, 5.0).unwrap();
    assert!((force - 3.2e6).abs() < 1e-6);

    let doubled = SnatchModel::new(8, 1.0e5).unwrap();
    assert!((doubled.snatch_force_n(80.0, 5.0).unwrap() - 6.4e6).abs() < 1e-6);
}

#[test]
fn snatch_model_validation() {
    assert_eq!(SnatchModel::new(0, 1.0e5), Err(ForceError::NoLines));
    assert_eq!(
        SnatchModel::new(4, 0.0),
        Err(ForceError::NonPositiveStiffness(0.0))
    );
    assert_eq!(
        SnatchModel::default().elongation(10.0, 0.0),
        Err(ForceError::NonPositiveLineLength(0.0))
    );
}

#[test]
fn damped_swing_starts_at_initial_angle_and_decays() {
    let estimator = OscillationEstimator::new(OscillationParams::default()).unwrap();
    assert!((estimator.angle_deg_at(0.0) - 5.0).abs() < 1e-9);
    let expected_wd = 0.8 * (1.0_f64 - 0.15 * 0.15).sqrt();
    assert!((estimator.damped_frequency_rad_s() - expected_wd).abs() < 1e-12);
    assert!((estimator.damped_period_s() * expected_wd - std::f64::consts::TAU).abs() < 1e-9);

    for t in [1.0, 5.0, 20.0] {
        assert!(estimator.angle_deg_at(t).abs() <= estimator.envelope_deg_at(t) + 1e-12);
    }
    assert!(estimator.envelope_deg_at(20.0) < estimator.envelope_deg_at(1.0));
}

#[test]
fn overdamped_or_invalid_parameters_are_rejected() {
    let critical = OscillationParams {
        damping_ratio: 1.0,
        ..OscillationParams::default()
    };
    assert_eq!(
        OscillationEstimator::new(critical),
        Err(OscillationError::DampingOutOfRange(1.0))
    );
    let negative = OscillationParams {
        damping_ratio: -0.1,
        ..OscillationParams::default()
    };
    assert!(OscillationEstimator::new(negative).is_err());
    let frozen = OscillationParams {
        natural_frequency_rad_s: 0.0,
        ..OscillationParams::default()
    };
    assert_eq!(
        OscillationEstimator::new(frozen),
        Err(OscillationError::NonPositiveNaturalFrequency(0.0))
    );
}

#[test]
fn coupled_series_follows_trajectory_samples() {
    let trajectory = engine().generate();
    let estimator = OscillationEstimator::new(OscillationParams::default()).unwrap();
    let series = estimator.coupled(&trajectory);
    assert_eq!(series.len(), trajectory.len());
    for (angle, sample) in series.iter().zip(trajectory.iter()) {
        assert_eq!(angle.time_s, sample.time_s);
        assert_eq!(angle.altitude_m, sample.altitude_m);
    }
    assert!((series.peak_angle_deg() - 5.0).abs() < 1e-9);
    let settled = series.settling_time_s(1.0).expect("settles within the horizon");
    assert!(settled > 0.0);
    assert!(series.iter().filter(|s| s.time_s >= settled).all(|s| s.angle_of_attack_deg.abs() <= 1.0));
}

#[test]
fn standalone_series_uses_uniform_descent() {
    let estimator = OscillationEstimator::new(OscillationParams::default()).unwrap();
    let descent = UniformDescent {
        initial_altitude_m: 1000.0,
        descent_rate_m_s: 5.0,
        max_time_s: 60.0,
        time_step_s: 0.1,
    };
    let series = estimator.standalone(&descent).unwrap();
    assert_eq!(series.len(), 600);
    let last = series.samples().last().unwrap();
    assert!(last.time_s < 60.0);
    assert!((last.altitude_m - (1000.0 - 5.0 * last.time_s)).abs() < 1e-9);

    let (deploy_alt, inflated_alt) = descent.marker_altitudes(&engine().boundaries());
    assert!((deploy_alt - 990.0).abs() < 1e-9);
    assert!((inflated_alt - 985.0).abs() < 1e-9);
}

#[test]
fn standalone_series_floors_altitude_and_validates() {
    let estimator = OscillationEstimator::new(OscillationParams::default()).unwrap();
    let short_drop = UniformDescent {
        initial_altitude_m: 10.0,
        descent_rate_m_s: 5.0,
        max_time_s: 5.0,
        time_step_s: 0.5,
    };
    let series = estimator.standalone(&short_drop).unwrap();
    assert!(series.iter().all(|s| s.altitude_m >= 0.0));
    assert_eq!(series.samples().last().unwrap().altitude_m, 0.0);

    let bad = UniformDescent {
        descent_rate_m_s: -1.0,
        ..short_drop
    };
    assert_eq!(
        estimator.standalone(&bad),
        Err(OscillationError::InvalidDescentRate(-1.0))
    );
}

#[test]
fn kinematic_angle_of_attack() {
    assert_eq!(kinematic_angle_of_attack_deg(-10.0, 0.0), 90.0);
    assert!((kinematic_angle_of_attack_deg(-10.0, 10.0) + 45.0).abs() < 1e-9);

    let trajectory = engine().generate();
    let series = kinematic_angle_series(&trajectory, 4.0);
    assert_eq!(series.len(), trajectory.len());
    assert_eq!(series[0], (0.0, 0.0));
}
