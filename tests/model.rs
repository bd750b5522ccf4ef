use reactor_arcade as ra;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn initial_configuration() {
    let x = ra::ReactorState::default();

    assert!(close(x.rod_position, 50.0));
    assert!(close(x.power, 50.0));
    assert!(close(x.power_velocity, 0.0));
    assert!(close(x.temperature, 400.0));
    assert!(close(x.points, 0.0));
    assert!(close(x.time_running, 0.0));
    assert_eq!(x.phase, ra::Phase::Running);
}

#[test]
fn golden_single_step() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();

    x.update(&p, 1.0);

    // Centered rods add no acceleration; gravity alone drops them by 10.
    assert!(close(x.rod_position, 40.0), "rod {}", x.rod_position);
    assert!(close(x.power_velocity, 0.0));
    assert!(close(x.power, 50.0));
    // Temperature lags halfway toward 300 + 50 * 7 = 650.
    assert!(close(x.temperature, 525.0), "temp {}", x.temperature);

    let expected_points = (225.0_f64 / 700.0).powi(3) * 100.0 * 1.0 * 10.0;
    assert!(
        close(x.points, expected_points),
        "points {} != {}",
        x.points,
        expected_points
    );
    assert!(close(x.time_running, 1.0));
    assert_eq!(x.phase, ra::Phase::Running);
}

#[test]
fn invariants_hold_under_arbitrary_driving() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let p = ra::ReactorParams::default();
    let mut rng = StdRng::seed_from_u64(7);

    for round in 0..20 {
        let mut x = ra::ReactorState::default();
        for _ in 0..2000 {
            x.adjust_rod(&p, rng.gen_range(-1.0..=1.0));
            x.update(&p, rng.gen_range(0.0..0.12));

            assert!(
                (0.0..=100.0).contains(&x.rod_position),
                "round {round}: rod {}",
                x.rod_position
            );
            assert!(
                (0.0..=150.0).contains(&x.power),
                "round {round}: power {}",
                x.power
            );
            assert!(x.temperature >= 300.0, "round {round}: temp {}", x.temperature);
        }
    }
}

#[test]
fn points_never_decrease_while_running() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let p = ra::ReactorParams::default();
    let mut rng = StdRng::seed_from_u64(99);
    let mut x = ra::ReactorState::default();
    let mut last = 0.0;

    for _ in 0..5000 {
        x.adjust_rod(&p, rng.gen_range(-1.0..=1.0));
        x.update(&p, rng.gen_range(0.0..0.05));
        if x.phase != ra::Phase::Running {
            break;
        }
        assert!(x.points >= last, "points fell from {last} to {}", x.points);
        last = x.points;
    }
}

#[test]
fn score_rate_follows_temperature_cubed() {
    let p = ra::ReactorParams::default();

    // Hold each state at equilibrium (power matching temperature) so a tick
    // leaves the temperature untouched and only the score moves.
    let mut hot = ra::ReactorState::default();
    hot.temperature = 650.0;
    hot.power = 50.0;

    let mut warm = ra::ReactorState::default();
    warm.temperature = 475.0;
    warm.power = 25.0;

    let dt = 0.01;
    hot.update(&p, dt);
    warm.update(&p, dt);

    // (350/700)³ against (175/700)³ is exactly a factor of 8
    assert!(
        close(hot.points / warm.points, 8.0),
        "ratio {}",
        hot.points / warm.points
    );
}

#[test]
fn stall_waits_for_the_grace_period() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();

    // Cold idle core pinned at the floor from the first tick
    x.rod_position = 0.0;
    x.power = 0.0;
    x.temperature = 300.0;

    for _ in 0..4 {
        x.update(&p, 0.5);
        assert_eq!(x.phase, ra::Phase::Running, "stalled at t={}", x.time_running);
    }

    // Entering at exactly t = 2.0 is still within the grace period
    x.update(&p, 0.5);
    assert_eq!(x.phase, ra::Phase::Running);

    x.update(&p, 0.5);
    assert_eq!(x.phase, ra::Phase::Stalled);
    assert!(close(x.points, 0.0));

    // Stall latches and time stops accruing
    let t = x.time_running;
    x.update(&p, 1.0);
    assert_eq!(x.phase, ra::Phase::Stalled);
    assert!(close(x.time_running, t));
}

#[test]
fn shutdown_banks_points_and_freezes_the_core() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();

    for _ in 0..120 {
        x.adjust_rod(&p, 1.0);
        x.update(&p, 0.016);
    }
    assert_eq!(x.phase, ra::Phase::Running);
    assert!(x.points > 0.0);

    let banked = x.points;
    let temp = x.temperature;
    let power = x.power;

    x.emergency_shutdown();
    assert_eq!(x.phase, ra::Phase::Shutdown);
    assert!(close(x.rod_position, 0.0));
    assert!(close(x.power_velocity, 0.0));
    assert!(close(x.points, banked));
    assert!(close(x.temperature, temp));
    assert!(close(x.power, power));

    // Further input and ticks are inert
    let frozen = x;
    x.adjust_rod(&p, 1.0);
    x.update(&p, 0.5);
    x.emergency_shutdown();
    assert_eq!(x, frozen);
}

#[test]
fn shutdown_is_rejected_after_meltdown() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();
    x.power = 150.0;
    x.temperature = 999.0;

    x.update(&p, 0.1);
    assert_eq!(x.phase, ra::Phase::Critical);

    let rod = x.rod_position;
    x.emergency_shutdown();
    assert_eq!(x.phase, ra::Phase::Critical);
    assert!(close(x.rod_position, rod), "rods dropped on a dead core");
}

#[test]
fn reset_restores_initial_configuration() {
    let p = ra::ReactorParams::default();
    let mut x = ra::ReactorState::default();

    for _ in 0..300 {
        x.adjust_rod(&p, 1.0);
        x.update(&p, 0.05);
    }
    x.emergency_shutdown();

    x.reset();
    assert_eq!(x, ra::ReactorState::default());
}
