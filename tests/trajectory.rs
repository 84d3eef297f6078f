use parachute_descent::trajectory::{
    DescentInputs, DescentPhase, InflationModel, StateLookup, TrajectoryEngine, TrajectoryError,
    terminal_velocity_m_s,
};

const G: f64 = 9.81;

fn reference_inputs() -> DescentInputs {
    DescentInputs {
        total_mass_kg: 80.0,
        gravity_m_s2: G,
        air_density_kg_m3: 1.225,
        drag_area_m2: 0.75,
        initial_altitude_m: 1000.0,
        max_time_s: 60.0,
        deploy_time_s: 2.0,
        inflation_time_s: 2.0,
        horizontal_speed_m_s: 3.0,
    }
}

fn reference_engine() -> TrajectoryEngine {
    TrajectoryEngine::new(reference_inputs(), 0.1).expect("valid inputs")
}

/// Late deployment with a large canopy: needs roughly 9 g to reach terminal speed in 1 s.
fn hard_opening_inputs() -> DescentInputs {
    DescentInputs {
        drag_area_m2: 20.0,
        initial_altitude_m: 2000.0,
        deploy_time_s: 10.0,
        inflation_time_s: 1.0,
        ..reference_inputs()
    }
}

#[test]
fn terminal_velocity_matches_drag_balance() {
    let v_t = terminal_velocity_m_s(80.0, G, 1.225, 0.75).unwrap();
    assert!((v_t - 41.33).abs() < 0.01, "v_t = {v_t}");
    assert!((reference_engine().terminal_velocity_m_s() - v_t).abs() < 1e-12);
}

#[test]
fn free_fall_altitude_before_deployment() {
    let trajectory = reference_engine().generate();
    let lookup = trajectory.state_at(1.9);
    assert!(!lookup.is_out_of_range());
    let sample = lookup.sample();
    assert_eq!(sample.phase, DescentPhase::FreeFall);
    assert!((sample.altitude_m - 982.3).abs() < 0.05, "z = {}", sample.altitude_m);
    assert!((sample.vertical_velocity_m_s + G * 1.9).abs() < 1e-6);
    assert_eq!(sample.vertical_acceleration_m_s2, -G);
}

#[test]
fn terminal_phase_holds_exact_terminal_velocity() {
    let engine = reference_engine();
    let v_t = engine.terminal_velocity_m_s();
    let trajectory = engine.generate();
    let terminal: Vec<_> = trajectory
        .iter()
        .filter(|s| s.phase == DescentPhase::TerminalDescent)
        .collect();
    assert!(!terminal.is_empty());
    for sample in terminal {
        assert_eq!(sample.vertical_velocity_m_s, -v_t);
        assert_eq!(sample.vertical_acceleration_m_s2, 0.0);
    }
}

#[test]
fn uncapped_opening_is_continuous_at_both_boundaries() {
    let engine = reference_engine();
    assert!(!engine.inflation_cap_engaged());
    let eps = 1e-9;
    for boundary in [2.0, 4.0] {
        let before = engine.kinematics_at(boundary - eps);
        let after = engine.kinematics_at(boundary);
        assert!(
            (before.altitude_m - after.altitude_m).abs() < 1e-6,
            "altitude jump at t = {boundary}"
        );
        assert!(
            (before.vertical_velocity_m_s - after.vertical_velocity_m_s).abs() < 1e-6,
            "velocity jump at t = {boundary}"
        );
    }
    let bounds = engine.boundaries();
    assert!((bounds.deploy_altitude_m - (1000.0 - 0.5 * G * 4.0)).abs() < 1e-9);
    assert!((bounds.full_inflation_velocity_m_s + engine.terminal_velocity_m_s()).abs() < 1e-9);
}

#[test]
fn required_acceleration_points_toward_terminal_velocity() {
    let engine = reference_engine();
    let v_t = engine.terminal_velocity_m_s();
    let expected = (-v_t + G * 2.0) / 2.0;
    assert!((engine.required_inflation_acceleration_m_s2() - expected).abs() < 1e-12);
    // v_t exceeds the deployment speed, so the canopy keeps accelerating the fall
    assert!(engine.inflation_acceleration_m_s2() < 0.0);
}

#[test]
fn samples_are_time_ordered_and_never_climb() {
    let engine = reference_engine();
    let trajectory = engine.generate();
    assert!(trajectory.len() <= engine.max_sample_count());
    assert_eq!(trajectory.first().time_s, 0.0);
    for pair in trajectory.samples().windows(2) {
        assert!(pair[1].time_s > pair[0].time_s);
        assert!(pair[1].altitude_m <= pair[0].altitude_m);
        assert!(pair[1].altitude_m >= 0.0);
    }
}

#[test]
fn generation_stops_at_first_grounded_sample() {
    let trajectory = reference_engine().generate();
    assert!(trajectory.landed());
    assert_eq!(trajectory.last().altitude_m, 0.0);
    let grounded = trajectory.iter().filter(|s| s.altitude_m == 0.0).count();
    assert_eq!(grounded, 1);
    let landing = trajectory.landing_time_s().expect("landed");
    assert!(landing > 26.0 && landing < 26.5, "landing at {landing}");
}

#[test]
fn horizon_ends_descent_when_still_airborne() {
    let inputs = DescentInputs {
        max_time_s: 5.0,
        ..reference_inputs()
    };
    let trajectory = TrajectoryEngine::new(inputs, 0.1).unwrap().generate();
    assert_eq!(trajectory.len(), 51);
    assert!(!trajectory.landed());
    assert!(trajectory.landing_time_s().is_none());
    assert!((trajectory.last().time_s - 5.0).abs() < 1e-9);
}

#[test]
fn horizontal_position_advances_one_step_ahead() {
    let trajectory = reference_engine().generate();
    let first = trajectory.first();
    assert!((first.horizontal_position_m - 0.3).abs() < 1e-12);
    let tenth = &trajectory.samples()[9];
    assert!((tenth.horizontal_position_m - 3.0).abs() < 1e-9);
}

#[test]
fn generation_is_repeatable() {
    let engine = reference_engine();
    assert_eq!(engine.generate(), engine.generate());
    let lazily: Vec<_> = engine.samples().collect();
    assert_eq!(lazily.as_slice(), engine.generate().samples());
}

#[test]
fn zero_deploy_time_skips_free_fall() {
    let inputs = DescentInputs {
        deploy_time_s: 0.0,
        ..reference_inputs()
    };
    let trajectory = TrajectoryEngine::new(inputs, 0.1).unwrap().generate();
    assert!(trajectory.phase_entry(DescentPhase::FreeFall).is_none());
    assert_eq!(trajectory.first().phase, DescentPhase::Inflation);
    assert_eq!(trajectory.first().altitude_m, 1000.0);
}

#[test]
fn capped_model_limits_inflation_to_four_g() {
    let engine = TrajectoryEngine::new(hard_opening_inputs(), 0.1).unwrap();
    assert_eq!(engine.inflation_model(), InflationModel::Capped);
    assert!(engine.inflation_cap_engaged());
    assert!((engine.inflation_acceleration_m_s2() - 4.0 * G).abs() < 1e-12);
    assert!(engine.required_inflation_acceleration_m_s2() > 4.0 * G);

    // altitude stays continuous even though velocity jumps to -v_t
    let eps = 1e-9;
    let before = engine.kinematics_at(11.0 - eps);
    let after = engine.kinematics_at(11.0);
    assert!((before.altitude_m - after.altitude_m).abs() < 1e-6);
    assert!((before.vertical_velocity_m_s - after.vertical_velocity_m_s).abs() > 1.0);
}

#[test]
fn uncapped_model_applies_required_acceleration() {
    let engine = TrajectoryEngine::new(hard_opening_inputs(), 0.1)
        .unwrap()
        .with_inflation_model(InflationModel::Uncapped);
    assert!(!engine.inflation_cap_engaged());
    assert_eq!(
        engine.inflation_acceleration_m_s2(),
        engine.required_inflation_acceleration_m_s2()
    );
    let bounds = engine.boundaries();
    assert!((bounds.full_inflation_velocity_m_s + engine.terminal_velocity_m_s()).abs() < 1e-9);
}

#[test]
fn state_lookup_resolves_nearest_and_ties_to_earlier() {
    let trajectory = reference_engine().generate();
    let near = trajectory.state_at(0.26);
    assert!((near.sample().time_s - 0.3).abs() < 1e-9);
    let tie = trajectory.state_at(0.25);
    assert!((tie.sample().time_s - 0.2).abs() < 1e-9);
    assert!(matches!(trajectory.state_at(0.0), StateLookup::Nearest { .. }));
}

#[test]
fn state_lookup_outside_interval_returns_boundary_sample() {
    let trajectory = reference_engine().generate();
    let late = trajectory.state_at(10_000.0);
    assert!(late.is_out_of_range());
    assert_eq!(late.sample(), trajectory.last());

    let early = trajectory.state_at(-1.0);
    assert!(early.is_out_of_range());
    assert_eq!(early.sample(), trajectory.first());

    match trajectory.state_at(f64::NAN) {
        StateLookup::OutOfRange { sample, .. } => assert_eq!(&sample, trajectory.last()),
        other => panic!("NaN query should be out of range, got {other:?}"),
    }
}

#[test]
fn missing_drag_makes_terminal_velocity_unreachable() {
    let no_air = DescentInputs {
        air_density_kg_m3: 0.0,
        ..reference_inputs()
    };
    assert!(matches!(
        TrajectoryEngine::new(no_air, 0.1),
        Err(TrajectoryError::UnreachableTerminalVelocity { .. })
    ));

    let no_canopy = DescentInputs {
        drag_area_m2: 0.0,
        ..reference_inputs()
    };
    assert!(matches!(
        TrajectoryEngine::new(no_canopy, 0.1),
        Err(TrajectoryError::UnreachableTerminalVelocity { .. })
    ));
}

#[test]
fn invalid_inputs_are_rejected_before_sampling() {
    let negative_deploy = DescentInputs {
        deploy_time_s: -1.0,
        ..reference_inputs()
    };
    assert_eq!(
        TrajectoryEngine::new(negative_deploy, 0.1),
        Err(TrajectoryError::NegativeDeployTime(-1.0))
    );

    assert!(matches!(
        TrajectoryEngine::new(reference_inputs(), 0.0),
        Err(TrajectoryError::NonPositive { name: "time step", .. })
    ));

    let zero_mass = DescentInputs {
        total_mass_kg: 0.0,
        ..reference_inputs()
    };
    assert!(matches!(
        TrajectoryEngine::new(zero_mass, 0.1),
        Err(TrajectoryError::NonPositive { name: "total mass", .. })
    ));
}

#[test]
fn step_budget_bounds_sample_allocation() {
    let engine = reference_engine();
    assert_eq!(engine.max_sample_count(), 601);
    assert_eq!(
        engine.clone().with_step_budget(100),
        Err(TrajectoryError::StepBudgetExceeded {
            required: 601,
            budget: 100
        })
    );
    assert!(engine.with_step_budget(601).is_ok());

    let tiny_step = TrajectoryEngine::new(reference_inputs(), 1e-5);
    assert!(matches!(
        tiny_step,
        Err(TrajectoryError::StepBudgetExceeded { .. })
    ));
}

#[test]
fn uncountable_horizon_is_rejected_by_step_budget() {
    let inputs = DescentInputs {
        max_time_s: 1.0e25,
        ..reference_inputs()
    };
    match TrajectoryEngine::new(inputs, 1.0e-3) {
        Err(TrajectoryError::StepBudgetExceeded { required, budget }) => {
            assert_eq!(required, usize::MAX);
            assert_eq!(budget, 1_000_000);
        }
        other => panic!("expected a step budget error, got {other:?}"),
    }

    let engine = reference_engine();
    assert!(matches!(
        engine.with_step_budget(usize::MAX),
        Ok(ref e) if e.max_sample_count() == 601
    ));
}

#[test]
fn summary_reports_peaks() {
    let trajectory = TrajectoryEngine::new(hard_opening_inputs(), 0.1)
        .unwrap()
        .generate();
    let summary = trajectory.summary();
    assert_eq!(summary.sample_count, trajectory.len());
    assert!((summary.peak_acceleration_m_s2 - 4.0 * G).abs() < 1e-9);
    assert!(summary.peak_speed_m_s >= G * 10.0 - 1e-9);
}
