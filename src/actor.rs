//! Actor records: identity, kind, priority, position, and behavior.
//!
//! An actor pairs a plain state block with a boxed action the scheduler
//! invokes once per scheduling slot. The action sees its own state, the host
//! game-mode context, and the frame delta, and reports a [`Verdict`] that
//! drives re-queue vs eviction.

use crate::grid::TileCoord;
use serde::{Deserialize, Serialize};

/// Unique identifier for an actor, supplied at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// Category tag used to index and count actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Mobile creature.
    Critter,
    /// Rooted growth.
    Flora,
    /// Produces other actors over time.
    Spawner,
    /// Environmental threat.
    Hazard,
}

impl Default for ActorKind {
    fn default() -> Self {
        Self::Critter
    }
}

/// Scheduling key; lower values are serviced sooner.
pub type Priority = u32;

/// Result an action reports back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Stay scheduled, with this priority for the next turn.
    Continue(Priority),
    /// Leave the simulation; the registry evicts the actor and runs its
    /// teardown.
    Stop,
}

/// The plain data block an action receives for its own actor.
///
/// Identity and kind are fixed at creation. Priority changes only through
/// the verdict the action returns; position is free for the action to move.
#[derive(Debug, Clone)]
pub struct ActorState {
    id: ActorId,
    kind: ActorKind,
    priority: Priority,
    /// Coordinate in the owning grid's space.
    pub position: TileCoord,
}

impl ActorState {
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub(crate) fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }
}

/// Per-actor behavior invoked once per scheduling slot.
pub type Action<M> = Box<dyn FnMut(&mut ActorState, &mut M, f32) -> Verdict + Send>;

/// One-shot cleanup run when the actor is removed.
pub type Teardown<M> = Box<dyn FnOnce(&mut M) + Send>;

/// A registered simulation entity.
///
/// Owned exclusively by the registry once registered; destruction happens
/// only through the registry's removal path, which runs the teardown.
pub struct Actor<M> {
    state: ActorState,
    action: Action<M>,
    teardown: Option<Teardown<M>>,
    /// Stamped by the registry at registration; queue entries carry the same
    /// stamp so entries orphaned by removal are skipped, not re-serviced.
    epoch: u64,
}

impl<M> Actor<M> {
    /// Create an actor at priority 0 with no teardown.
    pub fn new<F>(id: ActorId, kind: ActorKind, position: TileCoord, action: F) -> Self
    where
        F: FnMut(&mut ActorState, &mut M, f32) -> Verdict + Send + 'static,
    {
        Self {
            state: ActorState {
                id,
                kind,
                priority: 0,
                position,
            },
            action: Box::new(action),
            teardown: None,
            epoch: 0,
        }
    }

    /// Set the initial scheduling priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.state.priority = priority;
        self
    }

    /// Attach a cleanup hook run once at removal.
    pub fn with_teardown<F>(mut self, teardown: F) -> Self
    where
        F: FnOnce(&mut M) + Send + 'static,
    {
        self.teardown = Some(Box::new(teardown));
        self
    }

    pub fn state(&self) -> &ActorState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ActorState {
        &mut self.state
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn set_epoch(&mut self, epoch: u64) {
        self.epoch = epoch;
    }

    /// Run the action against this actor's own state block.
    pub(crate) fn run(&mut self, mode: &mut M, dt: f32) -> Verdict {
        let Self { state, action, .. } = self;
        action(state, mode, dt)
    }

    /// Detach the teardown, leaving the actor without one.
    pub(crate) fn take_teardown(&mut self) -> Option<Teardown<M>> {
        self.teardown.take()
    }

    /// Consume the actor, running its teardown if one was attached.
    pub(crate) fn finish(self, mode: &mut M) {
        if let Some(teardown) = self.teardown {
            teardown(mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_priority_and_position() {
        let actor: Actor<()> = Actor::new(
            ActorId(1),
            ActorKind::Flora,
            TileCoord::new(4, 2),
            |_state, _mode, _dt| Verdict::Stop,
        )
        .with_priority(9);

        assert_eq!(actor.state().id(), ActorId(1));
        assert_eq!(actor.state().kind(), ActorKind::Flora);
        assert_eq!(actor.state().priority(), 9);
        assert_eq!(actor.state().position, TileCoord::new(4, 2));
    }

    #[test]
    fn test_run_hands_the_action_its_own_state() {
        let mut actor: Actor<()> = Actor::new(
            ActorId(2),
            ActorKind::Critter,
            TileCoord::new(0, 0),
            |state, _mode, _dt| {
                state.position.x += 1;
                Verdict::Continue(5)
            },
        );

        let verdict = actor.run(&mut (), 0.1);
        assert_eq!(verdict, Verdict::Continue(5));
        assert_eq!(actor.state().position, TileCoord::new(1, 0));
        // Priority only moves when the scheduler applies the verdict.
        assert_eq!(actor.state().priority(), 0);
    }

    #[test]
    fn test_finish_runs_teardown_once() {
        let actor: Actor<Vec<u64>> = Actor::new(
            ActorId(7),
            ActorKind::Hazard,
            TileCoord::new(0, 0),
            |_state, _mode: &mut Vec<u64>, _dt| Verdict::Stop,
        )
        .with_teardown(|log| log.push(7));

        let mut log = Vec::new();
        actor.finish(&mut log);
        assert_eq!(log, vec![7]);
    }

    #[test]
    fn test_finish_without_teardown_is_quiet() {
        let actor: Actor<Vec<u64>> = Actor::new(
            ActorId(8),
            ActorKind::Spawner,
            TileCoord::new(0, 0),
            |_state, _mode, _dt| Verdict::Stop,
        );

        let mut log = Vec::new();
        actor.finish(&mut log);
        assert!(log.is_empty());
    }
}
