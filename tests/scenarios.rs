use reactor_arcade as ra;

#[test]
fn held_withdrawal_melts_down() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();
    let dt = 0.016;

    let mut tripped = false;
    for _ in 0..3750 {
        x.adjust_rod(&p, 1.0);
        x.update(&p, dt);
        if x.phase == ra::Phase::Critical {
            tripped = true;
            break;
        }
    }

    assert!(tripped, "expected a meltdown within 60 s");
    assert!(x.temperature >= 1000.0);

    // Critical latches; nothing moves afterwards
    let frozen = x;
    x.update(&p, dt);
    assert_eq!(x, frozen);
}

#[test]
fn freefall_stalls_after_grace() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();
    let dt = 0.016;

    for _ in 0..3750 {
        x.update(&p, dt);
        if x.phase.is_terminal() {
            break;
        }
    }

    assert_eq!(x.phase, ra::Phase::Stalled, "expected a stall within 60 s");
    assert!(x.time_running > 2.0);
}

#[test]
fn autopilot_rides_the_curve_without_tripping() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();
    let mut pilot = ra::RodPilot::new(ra::RodPilotConfig::default());
    let dt = 0.016;

    let mut max_temp: f64 = 0.0;
    for _ in 0..3750 {
        let dir = pilot.update(&x, dt);
        assert!((-1.0..=1.0).contains(&dir), "direction {dir} out of range");

        x.adjust_rod(&p, dir);
        x.update(&p, dt);

        max_temp = max_temp.max(x.temperature);
        assert_eq!(
            x.phase,
            ra::Phase::Running,
            "round ended at t={}",
            x.time_running
        );
    }

    assert!(max_temp > 600.0, "pilot never got the core hot: {max_temp}");
    assert!(x.points > 0.0);
}

#[test]
fn voluntary_shutdown_banks_the_score() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();
    let mut pilot = ra::RodPilot::new(ra::RodPilotConfig::default());
    let dt = 0.016;

    for _ in 0..625 {
        let dir = pilot.update(&x, dt);
        x.adjust_rod(&p, dir);
        x.update(&p, dt);
    }
    assert_eq!(x.phase, ra::Phase::Running);
    x.emergency_shutdown();

    let mut store = ra::MemoryScoreStore::default();
    let record = ra::bank(&mut store, x.points).unwrap();
    assert_eq!(record, Some(x.points.floor() as u64));
    assert!(x.points >= 1.0, "a 10 s ride should bank something");
}
