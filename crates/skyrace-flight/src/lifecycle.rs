//! The flying/crashed state machine and its crash side effects.
//!
//! The transition to `Crashed` is one-way and idempotent: however many
//! collision events the physics layer delivers, the outcome is persisted
//! once, the rumble fires once, and exactly one delayed loss notification
//! is scheduled. Missing collaborators degrade gracefully; the state
//! still transitions, the side effect is skipped.

use skyrace_config::GameConfig;
use skyrace_input::RumbleSink;

use crate::defer::TickScheduler;

/// Lifecycle state of a craft. `Crashed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightPhase {
    /// Simulating normally.
    #[default]
    Flying,
    /// Hit something solid; integration disabled for this entity.
    Crashed,
}

/// Result of a finished run, as persisted for the menu scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Crossed the finish line with the course clear.
    Win,
    /// Crashed.
    Lose,
}

impl RunOutcome {
    /// The persisted string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunOutcome::Win => "win",
            RunOutcome::Lose => "lose",
        }
    }
}

/// Persists the last run's outcome for the next menu scene.
pub trait OutcomeSink {
    /// Record `outcome` as the last run's result.
    fn record(&mut self, outcome: RunOutcome);
}

/// External game-outcome collaborator (scene transitions, etc.).
pub trait GameEvents {
    /// The run is over.
    fn game_over(&mut self, outcome: RunOutcome);
}

/// Events the lifecycle defers onto the tick clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Deliver the delayed loss notification.
    LossNotice,
    /// Stop the crash rumble burst.
    RumbleStop,
}

/// Crash/win orchestration for a single craft instance.
#[derive(Debug)]
pub struct FlightLifecycle {
    phase: FlightPhase,
    finished: bool,
    crash_notify_delay: f32,
    rumble_intensity: f32,
    rumble_duration: f32,
}

impl FlightLifecycle {
    /// A flying lifecycle with the session's crash feedback settings.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: FlightPhase::Flying,
            finished: false,
            crash_notify_delay: config.crash_notify_delay,
            rumble_intensity: config.rumble_intensity,
            rumble_duration: config.rumble_duration,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Whether the craft still simulates.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.phase == FlightPhase::Flying && !self.finished
    }

    /// Handle a solid collision.
    ///
    /// First call while flying transitions to `Crashed`, persists the
    /// lose outcome, requests the rumble burst, and schedules the delayed
    /// loss notification plus the rumble stop. Re-entrant calls are
    /// ignored. Returns `true` when the transition happened.
    pub fn on_collision(
        &mut self,
        scheduler: &mut TickScheduler<LifecycleEvent>,
        outcomes: Option<&mut dyn OutcomeSink>,
        rumble: Option<&mut dyn RumbleSink>,
    ) -> bool {
        if self.phase == FlightPhase::Crashed || self.finished {
            return false;
        }
        self.phase = FlightPhase::Crashed;
        tracing::info!("Crashed; loss notice in {:.1}s", self.crash_notify_delay);

        if let Some(outcomes) = outcomes {
            outcomes.record(RunOutcome::Lose);
        }
        if let Some(rumble) = rumble {
            rumble.rumble(self.rumble_intensity, self.rumble_duration);
            scheduler.schedule(self.rumble_duration, LifecycleEvent::RumbleStop);
        }
        scheduler.schedule(self.crash_notify_delay, LifecycleEvent::LossNotice);
        true
    }

    /// Handle a win reported by the course tracker.
    ///
    /// Persists the win outcome and notifies the collaborator immediately
    /// (no delay). Ignored once crashed or already finished. Returns
    /// `true` when the win was accepted.
    pub fn on_win(
        &mut self,
        outcomes: Option<&mut dyn OutcomeSink>,
        events: Option<&mut dyn GameEvents>,
    ) -> bool {
        if !self.is_flying() {
            return false;
        }
        self.finished = true;
        tracing::info!("Course complete");

        if let Some(outcomes) = outcomes {
            outcomes.record(RunOutcome::Win);
        }
        if let Some(events) = events {
            events.game_over(RunOutcome::Win);
        }
        true
    }

    /// Dispatch a deferred event fired by the scheduler.
    pub fn on_deferred(
        &mut self,
        event: LifecycleEvent,
        events: Option<&mut dyn GameEvents>,
        rumble: Option<&mut dyn RumbleSink>,
    ) {
        match event {
            LifecycleEvent::LossNotice => {
                if let Some(events) = events {
                    events.game_over(RunOutcome::Lose);
                }
            }
            LifecycleEvent::RumbleStop => {
                if let Some(rumble) = rumble {
                    rumble.stop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrace_config::GameConfig;

    #[derive(Default)]
    struct Recorded {
        outcomes: Vec<RunOutcome>,
        notices: Vec<RunOutcome>,
        bursts: usize,
        stops: usize,
    }

    impl OutcomeSink for Recorded {
        fn record(&mut self, outcome: RunOutcome) {
            self.outcomes.push(outcome);
        }
    }

    impl GameEvents for Recorded {
        fn game_over(&mut self, outcome: RunOutcome) {
            self.notices.push(outcome);
        }
    }

    struct RumbleCount<'a>(&'a mut Recorded);

    impl RumbleSink for RumbleCount<'_> {
        fn rumble(&mut self, _intensity: f32, _seconds: f32) {
            self.0.bursts += 1;
        }

        fn stop(&mut self) {
            self.0.stops += 1;
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            crash_notify_delay: 3.0,
            rumble_duration: 2.0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_collision_transitions_to_crashed() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut scheduler = TickScheduler::new();
        let mut side = Recorded::default();

        assert!(lifecycle.on_collision(&mut scheduler, Some(&mut side), None));
        assert_eq!(lifecycle.phase(), FlightPhase::Crashed);
        assert!(!lifecycle.is_flying());
        assert_eq!(side.outcomes, vec![RunOutcome::Lose]);
        // Loss notice pending, no rumble bound so no stop scheduled.
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_repeated_collisions_are_idempotent() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut scheduler = TickScheduler::new();
        let mut side = Recorded::default();

        assert!(lifecycle.on_collision(&mut scheduler, Some(&mut side), None));
        assert!(!lifecycle.on_collision(&mut scheduler, Some(&mut side), None));
        assert!(!lifecycle.on_collision(&mut scheduler, Some(&mut side), None));

        assert_eq!(side.outcomes.len(), 1);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_loss_notice_fires_after_delay() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut scheduler = TickScheduler::new();
        let mut side = Recorded::default();

        lifecycle.on_collision(&mut scheduler, Some(&mut side), None);

        // 2.9s: nothing yet.
        for _ in 0..145 {
            assert!(scheduler.advance(0.02).is_empty());
        }
        // Crossing 3.0s delivers the notice.
        let fired = scheduler.advance(0.2);
        assert_eq!(fired, vec![LifecycleEvent::LossNotice]);
        for event in fired {
            lifecycle.on_deferred(event, Some(&mut side), None);
        }
        assert_eq!(side.notices, vec![RunOutcome::Lose]);
    }

    #[test]
    fn test_crash_rumble_bursts_once_and_stops() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut scheduler = TickScheduler::new();
        let mut side = Recorded::default();

        lifecycle.on_collision(&mut scheduler, None, Some(&mut RumbleCount(&mut side)));
        assert_eq!(side.bursts, 1);
        // Rumble stop scheduled alongside the loss notice.
        assert_eq!(scheduler.pending(), 2);

        for event in scheduler.advance(2.5) {
            lifecycle.on_deferred(event, None, Some(&mut RumbleCount(&mut side)));
        }
        assert_eq!(side.stops, 1);
    }

    #[test]
    fn test_teardown_cancels_pending_notice() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut scheduler = TickScheduler::new();
        let mut side = Recorded::default();

        lifecycle.on_collision(&mut scheduler, Some(&mut side), None);
        scheduler.cancel_all();
        assert!(scheduler.advance(10.0).is_empty());
        assert!(side.notices.is_empty());
    }

    #[test]
    fn test_win_notifies_immediately() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut side = Recorded::default();

        let mut events = Recorded::default();
        assert!(lifecycle.on_win(Some(&mut side), Some(&mut events)));
        assert_eq!(side.outcomes, vec![RunOutcome::Win]);
        assert_eq!(events.notices, vec![RunOutcome::Win]);
    }

    #[test]
    fn test_win_after_crash_is_ignored() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut scheduler = TickScheduler::new();

        lifecycle.on_collision(&mut scheduler, None, None);
        assert!(!lifecycle.on_win(None, None));
    }

    #[test]
    fn test_duplicate_win_is_ignored() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut side = Recorded::default();

        assert!(lifecycle.on_win(Some(&mut side), None));
        assert!(!lifecycle.on_win(Some(&mut side), None));
        assert_eq!(side.outcomes.len(), 1);
    }

    #[test]
    fn test_collision_without_collaborators_still_transitions() {
        let mut lifecycle = FlightLifecycle::new(&config());
        let mut scheduler = TickScheduler::new();

        assert!(lifecycle.on_collision(&mut scheduler, None, None));
        assert_eq!(lifecycle.phase(), FlightPhase::Crashed);
    }

    #[test]
    fn test_outcome_strings_match_persisted_flag_values() {
        assert_eq!(RunOutcome::Win.as_str(), "win");
        assert_eq!(RunOutcome::Lose.as_str(), "lose");
    }
}
