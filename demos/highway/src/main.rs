//! highway: smallest end-to-end demo for the simcars driving simulator.
//!
//! Synthesises a drone-style recording of a straight multi-lane highway,
//! then re-simulates every car except the ego vehicle with a
//! velocity-goal controller.  Goals are drawn faster than the recorded
//! speeds, so cars close in on slower traffic ahead and some collide.
//!
//! Usage: `highway [config.json]`.  Every config field is optional; see
//! [`DemoConfig`] for the defaults.  Set `RUST_LOG=debug` to see every
//! collision, `RUST_LOG=trace` for the collision response itself.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use glam::DVec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use sc_agent::{DrivingAgent, DrivingSceneState, KinematicField, Kinematics, RangePolicy, RecordedAgentBuilder};
use sc_behavior::VelocityGoalController;
use sc_core::{Duration, SimConfig, Time};
use sc_physics::TickReport;
use sc_sim::{SimObserver, SimulationSceneBuilder};

const EGO: &str = "ego";

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sim:              SimConfig,
    seed:             u64,
    lanes:            usize,
    cars_per_lane:    usize,
    lane_width:       f64,
    /// Mean bumper-to-bumper gap between recorded cars, in metres.
    spacing:          f64,
    /// Recorded speeds are drawn from `[min_speed, max_speed]` m/s.
    min_speed:        f64,
    max_speed:        f64,
    /// Goal speed = recorded speed + a draw from `[0, goal_boost]`.
    goal_boost:       f64,
    goal_secs:        f64,
    max_acceleration: f64,
    duration_secs:    f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim:              SimConfig { allow_late_start: true, ..SimConfig::default() },
            seed:             42,
            lanes:            3,
            cars_per_lane:    6,
            lane_width:       3.5,
            spacing:          25.0,
            min_speed:        20.0,
            max_speed:        30.0,
            goal_boost:       8.0,
            goal_secs:        4.0,
            max_acceleration: 3.0,
            duration_secs:    20.0,
        }
    }
}

fn load_config() -> Result<DemoConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {path}"))?;
            serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {path}"))
        }
        None => Ok(DemoConfig::default()),
    }
}

// ── Synthetic recording ───────────────────────────────────────────────────────

/// One car cruising along +x, sampled every time step over the demo.
fn record_car(
    name:   &str,
    start:  DVec2,
    speed:  f64,
    goal:   Option<f64>,
    config: &DemoConfig,
) -> Result<Arc<dyn DrivingAgent>> {
    let step = config.sim.time_step;
    let samples = (Duration::from_secs_f64(config.duration_secs).as_millis() / step.as_millis()).max(1);

    let mut builder = RecordedAgentBuilder::new(name).bounding_box(4.5, 1.8).ttc_slot();
    if let Some(goal) = goal {
        builder = builder.velocity_goal(goal, Duration::from_secs_f64(config.goal_secs));
    }
    for k in 0..=samples {
        let time = Time(0) + step * k;
        let position = start + DVec2::X * speed * (time - Time(0)).as_secs_f64();
        builder = builder.sample(time, &Kinematics::cruising(position, 0.0, speed));
    }
    Ok(Arc::new(builder.build()?))
}

/// Every recorded car on the highway plus the replayed ego vehicle.
fn build_traffic(config: &DemoConfig) -> Result<(Vec<Arc<dyn DrivingAgent>>, Arc<dyn DrivingAgent>)> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut cars = Vec::with_capacity(config.lanes * config.cars_per_lane);

    for lane in 0..config.lanes {
        let y = lane as f64 * config.lane_width;
        let mut x = 0.0;
        for index in 0..config.cars_per_lane {
            x += config.spacing * rng.gen_range(0.6..1.4);
            let speed = rng.gen_range(config.min_speed..=config.max_speed);
            let goal = speed + rng.gen_range(0.0..=config.goal_boost);
            let name = format!("lane{lane}_car{index}");
            cars.push(record_car(&name, DVec2::new(x, y), speed, Some(goal), config)?);
        }
    }

    let ego_speed = 0.5 * (config.min_speed + config.max_speed);
    let ego = record_car(EGO, DVec2::new(-config.spacing, 0.0), ego_speed, None, config)?;
    Ok((cars, ego))
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Counts collisions and tracks the smallest time-to-collision seen by the
/// ego vehicle.
struct HighwayStats {
    ticks:       usize,
    collisions:  usize,
    ego_min_ttc: Option<(Time, Duration)>,
}

impl HighwayStats {
    fn new() -> Self {
        Self { ticks: 0, collisions: 0, ego_min_ttc: None }
    }
}

impl SimObserver for HighwayStats {
    fn on_tick_end(&mut self, time: Time, state: &DrivingSceneState, report: &TickReport) {
        self.ticks += 1;
        self.collisions += report.collisions.len();
        for (a, b) in &report.collisions {
            log::info!("{time}: {a} and {b} collide");
        }

        let ttc = state.get(EGO).and_then(|ego| ego.ttc());
        if let Some(ttc) = ttc.filter(|ttc| *ttc != Duration::MAX) {
            if self.ego_min_ttc.is_none_or(|(_, min)| ttc < min) {
                self.ego_min_ttc = Some((time, ttc));
            }
        }
    }

    fn on_sim_end(&mut self, final_time: Time) {
        log::info!("simulation ended at {final_time} after {} ticks", self.ticks);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    println!("=== highway: simcars driving simulator ===");
    println!(
        "Lanes: {}  |  Cars per lane: {}  |  Duration: {} s  |  Step: {}  |  Seed: {}",
        config.lanes, config.cars_per_lane, config.duration_secs, config.sim.time_step, config.seed,
    );
    println!();

    // 1. Synthesise the recording.
    let (cars, ego) = build_traffic(&config)?;
    let names: Vec<String> = cars.iter().map(|car| car.name().to_owned()).collect();

    // 2. Build the scene.
    let controller = VelocityGoalController::new(config.max_acceleration)?;
    let mut scene = SimulationSceneBuilder::new(config.sim.clone(), controller)
        .agents(cars)
        .replayed(ego)
        .build()?;
    println!("Scene window: [{}, {})", scene.start(), scene.end());

    // 3. Run.
    let mut stats = HighwayStats::new();
    let t0 = Instant::now();
    scene.run(&mut stats)?;
    let elapsed = t0.elapsed();

    // 4. Summarise.
    let final_time = scene.time();
    println!();
    println!("Ran {} ticks in {:.3} s", stats.ticks, elapsed.as_secs_f64());
    println!("Collisions: {}", stats.collisions);
    match stats.ego_min_ttc {
        Some((time, ttc)) => println!("Smallest ego time-to-collision: {ttc} at {time}"),
        None => println!("Ego never on a collision course"),
    }

    println!();
    println!("{:<14} {:>12} {:>12} {:>10}", "car", "recorded x", "simulated x", "speed");
    for name in &names {
        let state = scene.driving_agent_state(name, final_time, RangePolicy::Partial)?;
        let (Ok(position), Ok(speed)) = (
            state.vector(KinematicField::Position),
            state.scalar(KinematicField::AlignedLinearVelocity),
        ) else {
            println!("{name:<14} {:>12} {:>12} {:>10}", "-", "-", "-");
            continue;
        };
        let Some(overlay) = scene.agent_ids(name).first().and_then(|id| scene.overlay(*id)) else {
            continue;
        };
        let recorded = overlay.source().driving_agent_state(final_time, RangePolicy::Partial)?;
        let Ok(recorded) = recorded.vector(KinematicField::Position) else {
            continue;
        };
        println!("{name:<14} {:>12.1} {:>12.1} {:>10.1}", recorded.x, position.x, speed);
    }

    Ok(())
}
