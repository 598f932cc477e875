//! Budgeted tick driver over two priority-ordered queues.
//!
//! Each tick runs the pre-tick hooks, merges the pending queue into the
//! active queue, then drains at most `budget` actors in ascending priority
//! order. Ties break first-in-first-out through a monotonic sequence stamp,
//! so equal-priority actors share the budget fairly across ticks instead of
//! depending on heap internals.
//!
//! The scheduler is single-threaded and cooperative: `tick` runs to
//! completion on the caller's thread, and hooks and actions never overlap.

use crate::actor::{Actor, ActorId, ActorKind, ActorState, Priority, Verdict};
use crate::registry::Registry;
use log::debug;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Pre-tick maintenance hook, run in registration order before the drain.
pub type TickHook<M> = Box<dyn FnMut(&mut M, f32) + Send>;

/// Queue slot for one scheduled actor.
///
/// Ordering is (priority, seq): ascending priority first, then queue order
/// within a priority band. The epoch mirrors the actor's registration stamp
/// so slots left behind by removal are recognized as ghosts at pop time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    priority: Priority,
    seq: u64,
    id: ActorId,
    epoch: u64,
}

/// The budgeted tick driver.
///
/// Owns the registry and both queues. An actor registered here is serviced
/// at most once per tick; when the budget runs out the remainder simply
/// waits, keeping per-tick cost independent of population size.
pub struct Scheduler<M> {
    registry: Registry<M>,
    active: BinaryHeap<Reverse<QueueEntry>>,
    pending: BinaryHeap<Reverse<QueueEntry>>,
    hooks: Vec<TickHook<M>>,
    budget: usize,
    next_seq: u64,
}

impl<M> Scheduler<M> {
    /// Create a scheduler with no pre-tick hooks.
    pub fn new(budget: usize) -> Self {
        Self::with_hooks(budget, Vec::new())
    }

    /// Create a scheduler with an ordered hook list.
    pub fn with_hooks(budget: usize, hooks: Vec<TickHook<M>>) -> Self {
        Self {
            registry: Registry::new(),
            active: BinaryHeap::new(),
            pending: BinaryHeap::new(),
            hooks,
            budget,
            next_seq: 0,
        }
    }

    /// Register an actor and queue it for the next rotation.
    ///
    /// Returns `false` (changing nothing) if the id is already live.
    pub fn register(&mut self, actor: Actor<M>) -> bool {
        let id = actor.state().id();
        let priority = actor.state().priority();
        match self.registry.insert(actor) {
            Some(epoch) => {
                let seq = self.stamp();
                self.pending.push(Reverse(QueueEntry {
                    priority,
                    seq,
                    id,
                    epoch,
                }));
                true
            }
            None => false,
        }
    }

    /// Evict an actor, running its teardown. Idempotent.
    ///
    /// Any queue slot the actor still holds becomes a ghost and is dropped,
    /// without charging the budget, the next time it surfaces.
    pub fn remove(&mut self, id: ActorId, mode: &mut M) -> bool {
        self.registry.remove(id, mode)
    }

    /// Run one scheduling turn: hooks, rotation, then the budgeted drain.
    pub fn tick(&mut self, mode: &mut M, dt: f32) {
        for hook in &mut self.hooks {
            hook(mode, dt);
        }

        // Rotation happens up front: everything queued since the last drain
        // joins the active set. Leftovers from a budget-starved tick keep
        // their earlier stamps and stay ahead of same-priority actors queued
        // after them.
        self.active.append(&mut self.pending);

        let mut remaining = self.budget;
        while remaining > 0 {
            let entry = match self.active.pop() {
                Some(Reverse(entry)) => entry,
                None => break,
            };
            let verdict = match self.registry.run_action(entry.id, entry.epoch, mode, dt) {
                Some(verdict) => verdict,
                None => {
                    // Ghost slot: the actor was evicted or re-registered
                    // since this entry was queued.
                    debug!("[Scheduler] dropping stale entry for actor {:?}", entry.id);
                    continue;
                }
            };
            remaining -= 1;
            match verdict {
                Verdict::Continue(priority) => {
                    self.registry.set_priority(entry.id, priority);
                    let seq = self.stamp();
                    self.pending.push(Reverse(QueueEntry {
                        priority,
                        seq,
                        id: entry.id,
                        epoch: entry.epoch,
                    }));
                }
                Verdict::Stop => {
                    self.registry.remove(entry.id, mode);
                }
            }
        }
    }

    /// Evict every actor (running teardowns) and clear both queues.
    pub fn destroy(&mut self, mode: &mut M) {
        self.registry.destroy(mode);
        self.active.clear();
        self.pending.clear();
    }

    /// Live population size for a kind.
    pub fn count(&self, kind: ActorKind) -> usize {
        self.registry.count(kind)
    }

    /// Iterate the state blocks of a kind's live members.
    pub fn active(&self, kind: ActorKind) -> impl Iterator<Item = &ActorState> + '_ {
        self.registry.active(kind)
    }

    /// Iterate every live actor's state block.
    pub fn states(&self) -> impl Iterator<Item = &ActorState> + '_ {
        self.registry.states()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.registry.contains(id)
    }

    /// Total live population.
    pub fn population(&self) -> usize {
        self.registry.len()
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Entries across both queues, ghosts included.
    pub fn queue_depth(&self) -> usize {
        self.active.len() + self.pending.len()
    }

    fn stamp(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
