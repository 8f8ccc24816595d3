//! Pose recording and the checkpoint-rollback mechanic.
//!
//! While the craft flies, [`FlightRecorder`] samples its pose on a fixed
//! interval into a bounded history. A rollback smoothly carries the
//! craft back to the oldest retained sample over a configured duration;
//! recording pauses for the ride and the history re-seeds at the
//! destination. Clearing a checkpoint wipes the history so a rollback
//! never undoes course progress.

use glam::{Quat, Vec3};
use std::collections::VecDeque;

/// One recorded pose: enough to put the craft back where it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    /// World position.
    pub position: Vec3,
    /// World orientation.
    pub orientation: Quat,
    /// World velocity, so restored speed matches the sample.
    pub velocity: Vec3,
}

impl PoseSample {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            position: from.position.lerp(to.position, t),
            orientation: from.orientation.slerp(to.orientation, t).normalize(),
            velocity: from.velocity.lerp(to.velocity, t),
        }
    }
}

/// Hermite ease between 0 and 1; flat at both ends so the rollback ride
/// starts and lands gently.
fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone)]
struct ActiveRollback {
    from: PoseSample,
    to: PoseSample,
    duration: f32,
    elapsed: f32,
}

/// Interval pose recorder with bounded history and smoothed rollback.
#[derive(Debug, Clone)]
pub struct FlightRecorder {
    samples: VecDeque<PoseSample>,
    capacity: usize,
    interval: f32,
    since_last: f32,
    active: Option<ActiveRollback>,
}

impl FlightRecorder {
    /// A recorder sampling every `interval` seconds, keeping at most
    /// `capacity` samples (oldest evicted first).
    #[must_use]
    pub fn new(interval: f32, capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            interval: interval.max(0.0),
            since_last: 0.0,
            active: None,
        }
    }

    /// Record `pose` immediately, restarting the interval clock. Used to
    /// seed the history at spawn and after a checkpoint wipe.
    pub fn seed(&mut self, pose: PoseSample) {
        self.push(pose);
        self.since_last = 0.0;
    }

    /// Advance the interval clock and record `current` when it elapses.
    /// Recording is paused while a rollback is in flight.
    pub fn tick(&mut self, dt: f32, current: &PoseSample) {
        if self.active.is_some() {
            return;
        }
        self.since_last += dt;
        if self.since_last >= self.interval {
            self.since_last -= self.interval;
            self.push(*current);
        }
    }

    /// Wipe the history and re-seed at `current`. Called when a
    /// checkpoint is cleared so a later rollback cannot cross it.
    pub fn on_checkpoint(&mut self, current: &PoseSample) {
        self.samples.clear();
        self.seed(*current);
        tracing::debug!("Recorder history purged at checkpoint");
    }

    /// Begin a smoothed return from `current` to the oldest retained
    /// sample, taking `duration` seconds. Refused while another rollback
    /// runs, with an empty history, or a non-positive duration.
    pub fn begin_rollback(&mut self, current: PoseSample, duration: f32) -> bool {
        if self.active.is_some() || duration <= 0.0 {
            return false;
        }
        let Some(to) = self.samples.front().copied() else {
            return false;
        };
        tracing::info!(duration, "Rollback started");
        self.active = Some(ActiveRollback {
            from: current,
            to,
            duration,
            elapsed: 0.0,
        });
        true
    }

    /// Advance an in-flight rollback by `dt` and return the pose to put
    /// the craft at. On the final step the history re-seeds at the
    /// destination and the recorder resumes. `None` when idle.
    pub fn rollback_step(&mut self, dt: f32) -> Option<PoseSample> {
        let active = self.active.as_mut()?;
        active.elapsed += dt;
        let t = (active.elapsed / active.duration).min(1.0);
        let pose = PoseSample::interpolate(&active.from, &active.to, smoothstep(t));

        if t >= 1.0 {
            let destination = active.to;
            self.active = None;
            self.samples.clear();
            self.seed(destination);
            tracing::info!("Rollback complete");
        }
        Some(pose)
    }

    /// Whether a rollback is currently carrying the craft.
    #[must_use]
    pub fn is_rolling_back(&self) -> bool {
        self.active.is_some()
    }

    /// Most recently recorded sample.
    #[must_use]
    pub fn latest(&self) -> Option<&PoseSample> {
        self.samples.back()
    }

    /// Sample by index, oldest first.
    #[must_use]
    pub fn sample_at(&self, index: usize) -> Option<&PoseSample> {
        self.samples.get(index)
    }

    /// Discard the newest sample and return the one before it, stepping
    /// the history back one state. `None` once only one sample remains.
    pub fn step_back(&mut self) -> Option<PoseSample> {
        if self.samples.len() < 2 || self.active.is_some() {
            return None;
        }
        self.samples.pop_back();
        self.samples.back().copied()
    }

    /// The sample roughly `seconds` ago, bounded by the retained history.
    #[must_use]
    pub fn sample_back_by(&self, seconds: f32) -> Option<&PoseSample> {
        if self.samples.is_empty() || self.interval <= 0.0 {
            return self.samples.front();
        }
        let steps = (seconds / self.interval).round() as usize;
        let index = self.samples.len().saturating_sub(1).saturating_sub(steps);
        self.samples.get(index)
    }

    /// Retained sample count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all history and abort any in-flight rollback.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.active = None;
        self.since_last = 0.0;
    }

    fn push(&mut self, pose: PoseSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(pose);
    }
}
