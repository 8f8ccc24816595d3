//! The headless fixed-timestep run loop.
//!
//! One [`GameRunner::step`] is one simulation tick, in a fixed order:
//! poll result in, flight tick, ground collision, gate evaluation against
//! the freshly integrated position, rollback gates, deferred scheduler.
//! The caller owns the outcome store and the rumble sink and lends them
//! per tick, mirroring how the lifecycle borrows its collaborators.

use glam::Vec3;
use skyrace_config::Config;
use skyrace_course::{Compass, CourseTracker, FlightRecorder, GateDescriptor, PoseSample};
use skyrace_flight::{
    FlightLifecycle, FlightModel, GameEvents, LifecycleEvent, OutcomeSink, RunOutcome,
    TickScheduler,
};
use skyrace_input::{InputSource, PilotAxes, RumbleSink};

use crate::course_file::CourseFile;
use crate::hud::{self, HudTicker};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// Finish line crossed with the course clear.
    Won,
    /// Crashed; the delayed loss notification has fired.
    Lost,
    /// The tick budget ran out first.
    OutOfTime,
}

/// Captures the lifecycle's game-over notification for the loop.
#[derive(Default)]
struct EndCapture {
    outcome: Option<RunOutcome>,
}

impl GameEvents for EndCapture {
    fn game_over(&mut self, outcome: RunOutcome) {
        self.outcome = Some(outcome);
    }
}

/// Everything one run needs, wired together from config and course.
pub struct GameRunner {
    dt: f32,
    model: FlightModel,
    tracker: CourseTracker,
    rollback_gates: Vec<GateDescriptor>,
    rollback_duration: f32,
    recorder: FlightRecorder,
    compass: Compass,
    lifecycle: FlightLifecycle,
    scheduler: TickScheduler<LifecycleEvent>,
}

impl GameRunner {
    /// Spawn a run: craft at the course spawn pose, recorder seeded,
    /// compass on the first checkpoint.
    #[must_use]
    pub fn new(config: &Config, course: &CourseFile) -> Self {
        let model = FlightModel::new(
            config.flight.clone(),
            course.spawn,
            course.spawn_orientation(),
        );
        let tracker = CourseTracker::new(course.checkpoints.clone(), course.finish.clone());

        let mut recorder = FlightRecorder::new(
            config.game.record_interval,
            config.game.max_recorded_states,
        );
        recorder.seed(Self::pose_of(&model));

        let mut compass = Compass::new();
        compass.set_target(tracker.current_target());

        Self {
            dt: config.tick_dt(),
            model,
            tracker,
            rollback_gates: course.rollback_gates.clone(),
            rollback_duration: config.game.rollback_duration,
            recorder,
            compass,
            lifecycle: FlightLifecycle::new(&config.game),
            scheduler: TickScheduler::new(),
        }
    }

    /// The flight model, for readouts.
    #[must_use]
    pub fn model(&self) -> &FlightModel {
        &self.model
    }

    /// The course tracker, for progress readouts.
    #[must_use]
    pub fn tracker(&self) -> &CourseTracker {
        &self.tracker
    }

    /// The compass pointing at the current objective.
    #[must_use]
    pub fn compass(&self) -> &Compass {
        &self.compass
    }

    /// Whether a rollback ride is in progress.
    #[must_use]
    pub fn is_rolling_back(&self) -> bool {
        self.recorder.is_rolling_back()
    }

    /// Advance one tick. Returns the run's end once it is decided.
    pub fn step(
        &mut self,
        axes: PilotAxes,
        mut outcomes: Option<&mut dyn OutcomeSink>,
        mut rumble: Option<&mut dyn RumbleSink>,
    ) -> Option<RunEnd> {
        let mut capture = EndCapture::default();

        if self.recorder.is_rolling_back() {
            // The ride owns the craft; controls and gates are suspended.
            if let Some(pose) = self.recorder.rollback_step(self.dt) {
                self.model
                    .restore_pose(pose.position, pose.orientation, pose.velocity);
            }
        } else if self.lifecycle.is_flying() {
            self.model.tick(self.dt, axes);
            let pose = Self::pose_of(&self.model);
            self.recorder.tick(self.dt, &pose);

            if self.model.altitude() <= 0.0 {
                self.lifecycle.on_collision(
                    &mut self.scheduler,
                    outcomes.as_deref_mut().map(|o| o as &mut dyn OutcomeSink),
                    rumble.as_deref_mut().map(|r| r as &mut dyn RumbleSink),
                );
            } else {
                let crossing = self.tracker.evaluate(pose.position);
                if crossing.consumed {
                    self.recorder.on_checkpoint(&pose);
                    self.compass.set_target(self.tracker.current_target());
                }
                if crossing.won {
                    self.lifecycle.on_win(
                        outcomes.as_deref_mut().map(|o| o as &mut dyn OutcomeSink),
                        Some(&mut capture),
                    );
                } else if !crossing.consumed
                    && let Some(gate) = Self::hit_gate(&self.rollback_gates, pose.position)
                {
                    tracing::info!(gate = %gate.name, "Rollback gate hit");
                    self.recorder.begin_rollback(pose, self.rollback_duration);
                }
            }
        }

        for event in self.scheduler.advance(self.dt) {
            self.lifecycle.on_deferred(
                event,
                Some(&mut capture),
                rumble.as_deref_mut().map(|r| r as &mut dyn RumbleSink),
            );
        }

        match capture.outcome {
            Some(RunOutcome::Win) => Some(RunEnd::Won),
            Some(RunOutcome::Lose) => Some(RunEnd::Lost),
            None => None,
        }
    }

    /// Drive the loop to completion: poll, step, HUD line at 1 Hz.
    /// `max_seconds` bounds the run for demo and test sessions.
    pub fn run(
        &mut self,
        source: &mut dyn InputSource,
        mut outcomes: Option<&mut dyn OutcomeSink>,
        mut rumble: Option<&mut dyn RumbleSink>,
        max_seconds: f32,
    ) -> RunEnd {
        let max_ticks = (max_seconds / self.dt).ceil() as u64;
        let mut hud = HudTicker::new(1.0);

        for _ in 0..max_ticks {
            let axes = source.poll();
            if let Some(end) = self.step(
                axes,
                outcomes.as_deref_mut().map(|o| o as &mut dyn OutcomeSink),
                rumble.as_deref_mut().map(|r| r as &mut dyn RumbleSink),
            ) {
                self.scheduler.cancel_all();
                return end;
            }
            if hud.tick(self.dt) {
                tracing::info!(
                    "{} | {} | Checkpoints left: {}",
                    hud::speed_line(self.model.speed()),
                    hud::altitude_line(self.model.altitude()),
                    self.tracker.remaining()
                );
            }
        }
        tracing::warn!(max_seconds, "Run hit the tick budget");
        self.scheduler.cancel_all();
        RunEnd::OutOfTime
    }

    fn pose_of(model: &FlightModel) -> PoseSample {
        let state = model.state();
        PoseSample {
            position: state.position,
            orientation: state.orientation,
            velocity: state.velocity,
        }
    }

    fn hit_gate(gates: &[GateDescriptor], position: Vec3) -> Option<&GateDescriptor> {
        gates
            .iter()
            .find(|gate| position.distance_squared(gate.position) <= gate.radius * gate.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::MemoryOutcomeStore;
    use glam::Vec3;
    use skyrace_config::Config;
    use skyrace_input::ScriptedSource;

    /// Tuning with the stall force disabled so a level, hands-off path
    /// stays perfectly straight along `-Z`.
    fn test_config() -> Config {
        let mut config = Config::default();
        config.flight.stall_speed = 0.5;
        config
    }

    fn gate(name: &str, z: f32, radius: f32) -> GateDescriptor {
        GateDescriptor {
            name: name.to_owned(),
            position: Vec3::new(0.0, 50.0, z),
            radius,
        }
    }

    fn straight_course() -> CourseFile {
        CourseFile {
            checkpoints: vec![gate("1", -100.0, 20.0), gate("2", -200.0, 20.0)],
            finish: Some(gate("finish", -300.0, 20.0)),
            rollback_gates: Vec::new(),
            spawn: Vec3::new(0.0, 50.0, 0.0),
            spawn_heading: 0.0,
        }
    }

    #[test]
    fn test_straight_run_clears_course_and_wins() {
        let config = test_config();
        let mut runner = GameRunner::new(&config, &straight_course());
        let mut outcomes = MemoryOutcomeStore::new();
        let mut source = ScriptedSource::hold(PilotAxes::new(1.0, 0.0, 0.0));

        let end = runner.run(&mut source, Some(&mut outcomes), None, 60.0);
        assert_eq!(end, RunEnd::Won);
        assert!(runner.tracker().is_clear());
        assert!(runner.tracker().has_won());
        assert_eq!(outcomes.take(), Some(RunOutcome::Win));
    }

    #[test]
    fn test_checkpoints_consume_in_order_along_the_path() {
        let config = test_config();
        let mut runner = GameRunner::new(&config, &straight_course());
        let axes = PilotAxes::new(1.0, 0.0, 0.0);

        let mut remaining_seen = vec![runner.tracker().remaining()];
        for _ in 0..3000 {
            if runner.step(axes, None, None).is_some() {
                break;
            }
            let remaining = runner.tracker().remaining();
            if remaining != *remaining_seen.last().unwrap() {
                remaining_seen.push(remaining);
            }
        }
        assert_eq!(remaining_seen, vec![2, 1, 0]);
    }

    #[test]
    fn test_ground_contact_loses_after_notice_delay() {
        let config = test_config();
        let mut runner = GameRunner::new(&config, &straight_course());
        let mut outcomes = MemoryOutcomeStore::new();
        // Hold the nose down until the ground.
        let mut source = ScriptedSource::hold(PilotAxes::new(1.0, 0.6, 0.0));

        let end = runner.run(&mut source, Some(&mut outcomes), None, 60.0);
        assert_eq!(end, RunEnd::Lost);
        assert_eq!(outcomes.take(), Some(RunOutcome::Lose));
    }

    #[test]
    fn test_loss_notice_waits_out_the_crash_delay() {
        let config = test_config();
        let mut runner = GameRunner::new(&config, &straight_course());
        let dive = PilotAxes::new(1.0, 0.6, 0.0);

        let mut crash_tick = None;
        let mut end_tick = None;
        for tick in 0..3000u32 {
            let end = runner.step(dive, None, None);
            if crash_tick.is_none() && runner.model().altitude() <= 0.0 {
                crash_tick = Some(tick);
            }
            if let Some(end) = end {
                assert_eq!(end, RunEnd::Lost);
                end_tick = Some(tick);
                break;
            }
        }
        let crash_tick = crash_tick.expect("craft never hit the ground");
        let end_tick = end_tick.expect("loss notice never fired");
        let delay_ticks = (end_tick - crash_tick) as f32 * runner.dt;
        assert!((delay_ticks - config.game.crash_notify_delay).abs() < 0.1);
    }

    #[test]
    fn test_rollback_gate_sends_craft_back() {
        let config = test_config();
        let mut course = straight_course();
        course.checkpoints.clear();
        course.finish = None;
        course.rollback_gates = vec![gate("curse", -120.0, 15.0)];
        let mut runner = GameRunner::new(&config, &course);
        let axes = PilotAxes::new(1.0, 0.0, 0.0);

        // Fly until the gate triggers.
        let mut triggered = false;
        for _ in 0..1500 {
            runner.step(axes, None, None);
            if runner.is_rolling_back() {
                triggered = true;
                break;
            }
        }
        assert!(triggered, "rollback gate never triggered");

        // Ride the rollback out; the craft returns near the spawn seed.
        for _ in 0..200 {
            runner.step(axes, None, None);
            if !runner.is_rolling_back() {
                break;
            }
        }
        assert!(!runner.is_rolling_back());
        assert!(runner.model().state().position.z > -20.0);
    }

    #[test]
    fn test_checkpoint_purges_rollback_history() {
        let config = test_config();
        let mut course = straight_course();
        // Rollback gate behind the first checkpoint.
        course.rollback_gates = vec![gate("curse", -140.0, 15.0)];
        let mut runner = GameRunner::new(&config, &course);
        let axes = PilotAxes::new(1.0, 0.0, 0.0);

        let mut triggered_at = None;
        for _ in 0..3000 {
            runner.step(axes, None, None);
            if runner.is_rolling_back() {
                triggered_at = Some(runner.model().state().position.z);
                break;
            }
        }
        assert!(triggered_at.is_some(), "rollback gate never triggered");
        // Checkpoint 1 at z=-100 was consumed before the gate at z=-140.
        assert_eq!(runner.tracker().remaining(), 1);

        for _ in 0..200 {
            runner.step(axes, None, None);
            if !runner.is_rolling_back() {
                break;
            }
        }
        // The ride ends at the checkpoint's purge point, not the spawn.
        let z = runner.model().state().position.z;
        assert!(z < -80.0 && z > -140.0, "landed at z={z}");
    }

    #[test]
    fn test_win_stops_the_simulation() {
        let config = test_config();
        let mut runner = GameRunner::new(&config, &straight_course());
        let axes = PilotAxes::new(1.0, 0.0, 0.0);

        let mut end = None;
        for _ in 0..3000 {
            if let Some(e) = runner.step(axes, None, None) {
                end = Some(e);
                break;
            }
        }
        assert_eq!(end, Some(RunEnd::Won));

        // Further steps no longer move the craft.
        let frozen = runner.model().state().position;
        for _ in 0..10 {
            runner.step(axes, None, None);
        }
        assert_eq!(runner.model().state().position, frozen);
    }

    #[test]
    fn test_out_of_time_when_nothing_happens() {
        let config = test_config();
        let mut course = straight_course();
        course.checkpoints = vec![gate("1", -100_000.0, 20.0)];
        course.finish = None;
        let mut runner = GameRunner::new(&config, &course);
        let mut source = ScriptedSource::hold(PilotAxes::NEUTRAL);

        assert_eq!(runner.run(&mut source, None, None, 1.0), RunEnd::OutOfTime);
    }
}
