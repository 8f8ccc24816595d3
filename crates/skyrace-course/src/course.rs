//! Ordered checkpoint progression and the win gate.
//!
//! Checkpoints form a strict sequence: only the head of the remaining
//! queue is live, flying through any later gate does nothing. The finish
//! line only counts once every checkpoint has been consumed, and a win
//! is reported exactly once per run.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A checkpoint as authored in a course file: a named sphere the craft
/// has to pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDescriptor {
    /// Display name, also the ordering key.
    pub name: String,
    /// World-space center.
    pub position: Vec3,
    /// Trigger radius in world units.
    pub radius: f32,
}

/// Stable identity of a gate within one course, assigned in authored
/// order before sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GateId(pub(crate) u32);

#[derive(Debug, Clone)]
struct Gate {
    id: GateId,
    descriptor: GateDescriptor,
}

/// What the compass should point at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CourseTarget {
    /// The live checkpoint.
    Checkpoint(GateId, Vec3),
    /// All checkpoints consumed; head for the finish line.
    Finish(Vec3),
    /// Nothing left to chase (won, or no finish line authored).
    None,
}

/// What a gate crossing produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    /// A live checkpoint was consumed.
    pub consumed: bool,
    /// The finish line accepted a clear course; fires at most once.
    pub won: bool,
}

impl GateOutcome {
    /// Nothing happened.
    pub const NONE: Self = Self {
        consumed: false,
        won: false,
    };
}

/// Tracks which checkpoints remain and arbitrates the finish line.
#[derive(Debug, Clone)]
pub struct CourseTracker {
    remaining: Vec<Gate>,
    finish: Option<GateDescriptor>,
    won: bool,
}

impl CourseTracker {
    /// Build a tracker from authored gates, sorting them into run order.
    ///
    /// When every checkpoint name parses as an integer the order is
    /// numeric, so `"10"` comes after `"2"`. Otherwise names sort
    /// lexically.
    #[must_use]
    pub fn new(checkpoints: Vec<GateDescriptor>, finish: Option<GateDescriptor>) -> Self {
        let mut gates: Vec<Gate> = checkpoints
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| Gate {
                id: GateId(index as u32),
                descriptor,
            })
            .collect();

        let numeric: Option<Vec<i64>> = gates
            .iter()
            .map(|gate| gate.descriptor.name.trim().parse::<i64>().ok())
            .collect();
        match numeric {
            Some(keys) => {
                let mut keyed: Vec<(i64, Gate)> = keys.into_iter().zip(gates).collect();
                keyed.sort_by_key(|(key, _)| *key);
                gates = keyed.into_iter().map(|(_, gate)| gate).collect();
            }
            None => gates.sort_by(|a, b| a.descriptor.name.cmp(&b.descriptor.name)),
        }

        tracing::debug!(
            checkpoints = gates.len(),
            has_finish = finish.is_some(),
            "Course loaded"
        );
        Self {
            remaining: gates,
            finish,
            won: false,
        }
    }

    /// The live checkpoint, if any remain.
    #[must_use]
    pub fn active_checkpoint(&self) -> Option<(GateId, &GateDescriptor)> {
        self.remaining
            .first()
            .map(|gate| (gate.id, &gate.descriptor))
    }

    /// Checkpoints still to fly.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Whether every checkpoint has been consumed.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Whether the finish line has already accepted this run.
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Where the compass should point right now.
    #[must_use]
    pub fn current_target(&self) -> CourseTarget {
        if let Some(gate) = self.remaining.first() {
            return CourseTarget::Checkpoint(gate.id, gate.descriptor.position);
        }
        if !self.won && let Some(finish) = &self.finish {
            return CourseTarget::Finish(finish.position);
        }
        CourseTarget::None
    }

    /// The craft flew through checkpoint `id`.
    ///
    /// Consumes the gate only when it is the live head; dormant gates
    /// further down the sequence ignore the crossing.
    pub fn enter_checkpoint(&mut self, id: GateId) -> GateOutcome {
        match self.remaining.first() {
            Some(head) if head.id == id => {
                let gate = self.remaining.remove(0);
                tracing::info!(
                    name = %gate.descriptor.name,
                    remaining = self.remaining.len(),
                    "Checkpoint cleared"
                );
                GateOutcome {
                    consumed: true,
                    won: false,
                }
            }
            _ => GateOutcome::NONE,
        }
    }

    /// The craft flew through the finish line.
    ///
    /// Accepted only with a clear course, and only once per run.
    pub fn enter_finish(&mut self) -> GateOutcome {
        if !self.is_clear() || self.won {
            return GateOutcome::NONE;
        }
        self.won = true;
        tracing::info!("Finish line crossed with course clear");
        GateOutcome {
            consumed: false,
            won: true,
        }
    }

    /// Spatial crossing check for one tick, run after the craft's
    /// position update: tests the live checkpoint's sphere, then the
    /// finish sphere once the course is clear.
    pub fn evaluate(&mut self, position: Vec3) -> GateOutcome {
        if let Some((id, descriptor)) = self.active_checkpoint() {
            if position.distance_squared(descriptor.position) <= descriptor.radius * descriptor.radius
            {
                return self.enter_checkpoint(id);
            }
            return GateOutcome::NONE;
        }
        if let Some(finish) = &self.finish
            && !self.won
            && position.distance_squared(finish.position) <= finish.radius * finish.radius
        {
            return self.enter_finish();
        }
        GateOutcome::NONE
    }

    /// Drop every remaining checkpoint, e.g. on run teardown.
    pub fn purge(&mut self) {
        self.remaining.clear();
    }
}
