use anyhow::Result;
use clap::{Parser, ValueEnum};
use highscore::FileScoreStore;
use pilot::{RodPilot, RodPilotConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sim::{ReactorParams, ReactorState};

#[derive(Clone, Debug, ValueEnum)]
enum Scenario {
    /// No input: the rods sink, the core cools off and stalls
    Freefall,
    /// Full withdrawal held every tick until the trip
    Meltdown,
    /// Autopilot holds the target temperature
    Pilot,
    /// Autopilot, then a voluntary shutdown to bank the score
    Bank,
    /// Autopilot with Gaussian input noise for livelier traces
    Jitter,
}

#[derive(Parser, Debug)]
#[command(
    name = "reactor-arcade",
    version,
    about = "Reactor balancing arcade game (headless driver)"
)]
struct Args {
    #[arg(value_enum, long, default_value = "pilot")]
    scenario: Scenario,

    /// Total simulated time in seconds
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// Fixed time step in milliseconds
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,

    /// Pilot target temperature (°C)
    #[arg(long, default_value_t = 800.0)]
    target_temp: f64,

    /// Bank scenario: shut down once this much simulated time has passed
    #[arg(long, default_value_t = 45.0)]
    bank_after: f64,

    /// RNG seed for the jitter scenario
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// High-score file to update after the round
    #[arg(long)]
    score_file: Option<std::path::PathBuf>,
}

#[derive(serde::Serialize)]
struct TraceRow {
    t_s: f64,
    rod: f64,
    power: f64,
    power_velocity: f64,
    temp_c: f64,
    multiplier: f64,
    points: f64,
    phase: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let dt_s = (args.dt_ms as f64) / 1000.0;
    let steps = (args.seconds / dt_s).ceil() as u64;

    let p = ReactorParams::default();
    let mut reactor = ReactorState::default();

    let mut autopilot = RodPilot::new(RodPilotConfig {
        target_temp_c: args.target_temp,
        ..Default::default()
    });

    let mut rng = StdRng::seed_from_u64(args.seed);
    let jitter = Normal::new(0.0, 0.35)?;

    // JSONL trace to stdout, one object per tick
    for k in 0..steps {
        let t_s = (k as f64) * dt_s;

        let direction = match args.scenario {
            Scenario::Freefall => 0.0,
            Scenario::Meltdown => 1.0,
            Scenario::Pilot | Scenario::Bank => autopilot.update(&reactor, dt_s),
            Scenario::Jitter => {
                (autopilot.update(&reactor, dt_s) + jitter.sample(&mut rng)).clamp(-1.0, 1.0)
            }
        };

        if direction != 0.0 {
            reactor.adjust_rod(&p, direction);
        }

        if matches!(args.scenario, Scenario::Bank) && reactor.time_running >= args.bank_after {
            reactor.emergency_shutdown();
        }

        reactor.update(&p, dt_s);

        let row = TraceRow {
            t_s,
            rod: reactor.rod_position,
            power: reactor.power,
            power_velocity: reactor.power_velocity,
            temp_c: reactor.temperature,
            multiplier: reactor.score_multiplier(&p),
            points: reactor.points,
            phase: format!("{:?}", reactor.phase),
        };
        println!("{}", serde_json::to_string(&row)?);

        if reactor.phase.is_terminal() {
            break;
        }
    }

    eprintln!(
        "round over: phase={:?} points={} time={:.2}s",
        reactor.phase,
        reactor.points.floor(),
        reactor.time_running
    );

    if let Some(path) = args.score_file {
        let mut store = FileScoreStore::new(path);
        if let Some(record) = highscore::bank(&mut store, reactor.points)? {
            eprintln!("new high score: {record}");
        }
    }

    Ok(())
}
