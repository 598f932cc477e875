//! Actor registry: the owned population arena and its kind index.
//!
//! The registry is the sole owner of actor lifetime. It keeps the global
//! id-to-actor map and a per-kind id set in lockstep, so membership checks
//! and kind counts are O(1). Every registration stamps a fresh epoch on the
//! actor; scheduler queue entries carry the stamp, letting the drain loop
//! tell a live actor from a ghost left behind by remove-then-re-register.

use crate::actor::{Actor, ActorId, ActorKind, ActorState, Priority, Verdict};
use std::collections::{HashMap, HashSet};

pub struct Registry<M> {
    actors: HashMap<ActorId, Actor<M>>,
    kinds: HashMap<ActorKind, HashSet<ActorId>>,
    next_epoch: u64,
}

impl<M> Registry<M> {
    pub fn new() -> Self {
        Self {
            actors: HashMap::new(),
            kinds: HashMap::new(),
            next_epoch: 0,
        }
    }

    /// Insert a new actor, stamping its registration epoch.
    ///
    /// Returns the epoch, or `None` if the id is already live (the duplicate
    /// is dropped without side effects).
    pub(crate) fn insert(&mut self, mut actor: Actor<M>) -> Option<u64> {
        let id = actor.state().id();
        if self.actors.contains_key(&id) {
            return None;
        }
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        actor.set_epoch(epoch);
        self.kinds
            .entry(actor.state().kind())
            .or_default()
            .insert(id);
        self.actors.insert(id, actor);
        Some(epoch)
    }

    /// Remove an actor, running its teardown with the mode context.
    ///
    /// The teardown fires first, while the actor is still a tracked member;
    /// the map and kind index entries go away after it returns.
    /// Idempotent: removing an absent id returns `false` and does nothing.
    pub fn remove(&mut self, id: ActorId, mode: &mut M) -> bool {
        let teardown = match self.actors.get_mut(&id) {
            Some(actor) => actor.take_teardown(),
            None => return false,
        };
        if let Some(teardown) = teardown {
            teardown(mode);
        }
        if let Some(actor) = self.actors.remove(&id) {
            if let Some(members) = self.kinds.get_mut(&actor.state().kind()) {
                members.remove(&id);
            }
        }
        true
    }

    /// Live population size for a kind. O(1); 0 for kinds never registered.
    pub fn count(&self, kind: ActorKind) -> usize {
        self.kinds.get(&kind).map_or(0, HashSet::len)
    }

    /// Iterate the state blocks of a kind's live members.
    ///
    /// Lazy and non-owning; iteration order is unspecified.
    pub fn active(&self, kind: ActorKind) -> impl Iterator<Item = &ActorState> + '_ {
        self.kinds
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|id| self.actors.get(id).map(Actor::state))
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    /// Total live population across all kinds.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Iterate every live actor's state block.
    pub fn states(&self) -> impl Iterator<Item = &ActorState> + '_ {
        self.actors.values().map(Actor::state)
    }

    /// Run an actor's action if it is live under the given epoch.
    ///
    /// `None` means the entry was a ghost: the id is gone, or it was
    /// re-registered since the entry was queued.
    pub(crate) fn run_action(
        &mut self,
        id: ActorId,
        epoch: u64,
        mode: &mut M,
        dt: f32,
    ) -> Option<Verdict> {
        self.actors
            .get_mut(&id)
            .filter(|actor| actor.epoch() == epoch)
            .map(|actor| actor.run(mode, dt))
    }

    pub(crate) fn set_priority(&mut self, id: ActorId, priority: Priority) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.state_mut().set_priority(priority);
        }
    }

    /// Evict every actor, running each teardown.
    pub fn destroy(&mut self, mode: &mut M) {
        for (_, actor) in self.actors.drain() {
            actor.finish(mode);
        }
        self.kinds.clear();
    }
}

impl<M> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileCoord;

    fn critter(id: u64) -> Actor<Vec<u64>> {
        Actor::new(
            ActorId(id),
            ActorKind::Critter,
            TileCoord::new(0, 0),
            |_state, _mode: &mut Vec<u64>, _dt| Verdict::Continue(0),
        )
        .with_teardown(move |log| log.push(id))
    }

    fn flora(id: u64) -> Actor<Vec<u64>> {
        Actor::new(
            ActorId(id),
            ActorKind::Flora,
            TileCoord::new(0, 0),
            |_state, _mode, _dt| Verdict::Continue(0),
        )
    }

    #[test]
    fn test_count_tracks_register_and_remove() {
        let mut registry = Registry::new();
        let mut mode = Vec::new();

        assert_eq!(registry.count(ActorKind::Critter), 0);

        registry.insert(critter(1));
        registry.insert(critter(2));
        registry.insert(flora(3));
        assert_eq!(registry.count(ActorKind::Critter), 2);
        assert_eq!(registry.count(ActorKind::Flora), 1);
        assert_eq!(registry.count(ActorKind::Hazard), 0);
        assert_eq!(registry.len(), 3);

        registry.remove(ActorId(1), &mut mode);
        assert_eq!(registry.count(ActorKind::Critter), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_insert_is_silent() {
        let mut registry = Registry::new();

        assert!(registry.insert(critter(1)).is_some());
        assert!(registry.insert(critter(1)).is_none());
        assert_eq!(registry.count(ActorKind::Critter), 1);
    }

    #[test]
    fn test_remove_is_idempotent_and_runs_teardown_once() {
        let mut registry = Registry::new();
        let mut mode = Vec::new();

        registry.insert(critter(5));
        assert!(registry.remove(ActorId(5), &mut mode));
        assert!(!registry.contains(ActorId(5)));
        assert_eq!(registry.count(ActorKind::Critter), 0);
        assert!(!registry.remove(ActorId(5), &mut mode));
        assert_eq!(mode, vec![5]);
    }

    #[test]
    fn test_active_yields_live_members_only() {
        let mut registry = Registry::new();
        let mut mode = Vec::new();

        registry.insert(critter(1));
        registry.insert(critter(2));
        registry.remove(ActorId(1), &mut mode);

        let ids: Vec<ActorId> = registry
            .active(ActorKind::Critter)
            .map(ActorState::id)
            .collect();
        assert_eq!(ids, vec![ActorId(2)]);
        assert_eq!(registry.active(ActorKind::Hazard).count(), 0);
    }

    #[test]
    fn test_run_action_checks_the_epoch() {
        let mut registry = Registry::new();
        let mut mode = Vec::new();

        let epoch = registry.insert(critter(9)).unwrap();
        assert!(registry.run_action(ActorId(9), epoch, &mut mode, 0.1).is_some());
        assert!(registry.run_action(ActorId(9), epoch + 1, &mut mode, 0.1).is_none());

        // Re-registering the same id invalidates the old stamp.
        registry.remove(ActorId(9), &mut mode);
        let fresh = registry.insert(critter(9)).unwrap();
        assert!(registry.run_action(ActorId(9), epoch, &mut mode, 0.1).is_none());
        assert!(registry.run_action(ActorId(9), fresh, &mut mode, 0.1).is_some());
    }

    #[test]
    fn test_destroy_tears_down_everything() {
        let mut registry = Registry::new();
        let mut mode = Vec::new();

        registry.insert(critter(1));
        registry.insert(critter(2));
        registry.insert(flora(3));
        registry.destroy(&mut mode);

        assert!(registry.is_empty());
        assert_eq!(registry.count(ActorKind::Critter), 0);
        mode.sort_unstable();
        assert_eq!(mode, vec![1, 2]);
    }
}
