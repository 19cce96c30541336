//! Simulation observer trait for progress reporting and data collection.

use sc_agent::DrivingSceneState;
use sc_core::Time;
use sc_physics::TickReport;

/// Callbacks invoked by [`DrivingSimulationScene::run`][crate::DrivingSimulationScene::run]
/// around every tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: collision counter
///
/// ```rust
/// use sc_agent::DrivingSceneState;
/// use sc_core::Time;
/// use sc_physics::TickReport;
/// use sc_sim::SimObserver;
///
/// #[derive(Default)]
/// struct CollisionCounter(usize);
///
/// impl SimObserver for CollisionCounter {
///     fn on_tick_end(&mut self, _time: Time, _state: &DrivingSceneState, report: &TickReport) {
///         self.0 += report.collisions.len();
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the tick that computes the state at `time`.
    fn on_tick_start(&mut self, _time: Time) {}

    /// Called once the state at `time` has been computed and propagated.
    fn on_tick_end(&mut self, _time: Time, _state: &DrivingSceneState, _report: &TickReport) {}

    /// Called once after the last tick of a run.
    fn on_sim_end(&mut self, _final_time: Time) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
