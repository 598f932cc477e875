//! Public API for the simulation.
//!
//! This module provides the main interface for a host (game shell, server,
//! or test harness) to drive the simulation.
//!
//! ## Fixed Timestep
//!
//! The world uses a fixed timestep internally (default 30 Hz). When
//! `step(mode, dt)` is called, time accumulates and fixed updates run as
//! needed. This keeps behavior deterministic regardless of frame rate.
//!
//! ## Scheduling
//!
//! Each fixed update runs the mode's `update` first, then one scheduler
//! tick: hooks, rotation, and the budgeted drain. Actors are registered
//! through the world between steps; hook-driven spawning queues requests on
//! the mode, and the host registers them before the next step.

use crate::actor::{Actor, ActorId, ActorKind, ActorState};
use crate::config::SimConfig;
use crate::grid::Grid;
use crate::mode::GameMode;
use crate::scheduler::{Scheduler, TickHook};
use crate::world::Snapshot;
use std::sync::Arc;

/// The main simulation world container.
///
/// Owns the scheduler and a shared handle to the grid, providing a clean
/// API for:
/// - Driving the mode lifecycle and the fixed-step loop
/// - Registering and removing actors
/// - Extracting state snapshots
pub struct SimWorld<M: GameMode> {
    scheduler: Scheduler<M>,
    /// Shared so the host's mode can hold a second handle for actions.
    grid: Arc<Grid>,
    tick: u64,
    time: f32,
    /// Accumulated time for fixed timestep.
    time_accumulator: f32,
    config: SimConfig,
}

impl<M: GameMode> SimWorld<M> {
    /// Create a world with default configuration and no hooks.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a world with custom configuration.
    pub fn with_config(config: SimConfig) -> Self {
        Self::with_hooks(config, Vec::new())
    }

    /// Create a world with pre-tick hooks, run in order every tick.
    pub fn with_hooks(config: SimConfig, hooks: Vec<TickHook<M>>) -> Self {
        let grid = Arc::new(Grid::new(
            config.grid_width,
            config.grid_height,
            config.default_tile,
        ));
        Self::with_grid(config, hooks, grid)
    }

    /// Create a world around a pre-built grid (e.g., one carrying a
    /// transition rule). The config's grid dimensions are ignored.
    pub fn with_grid(config: SimConfig, hooks: Vec<TickHook<M>>, grid: Arc<Grid>) -> Self {
        Self {
            scheduler: Scheduler::with_hooks(config.action_budget, hooks),
            grid,
            tick: 0,
            time: 0.0,
            time_accumulator: 0.0,
            config,
        }
    }

    /// Run the mode's startup hook. Call once before stepping.
    pub fn start(&mut self, mode: &mut M) {
        mode.init();
    }

    /// Step the simulation forward by `dt` seconds.
    ///
    /// Accumulates time and runs zero or more fixed updates, each advancing
    /// the mode and the scheduler by one tick.
    pub fn step(&mut self, mode: &mut M, dt: f32) {
        let fixed_dt = self.config.fixed_timestep;
        self.time_accumulator += dt;

        while self.time_accumulator >= fixed_dt {
            self.fixed_update(mode, fixed_dt);
            self.time_accumulator -= fixed_dt;
        }
    }

    /// Run a single fixed timestep update.
    fn fixed_update(&mut self, mode: &mut M, dt: f32) {
        mode.update(dt);
        self.scheduler.tick(mode, dt);
        self.tick += 1;
        self.time += dt;
    }

    /// Tear down every actor, then run the mode's shutdown hook.
    pub fn shutdown(&mut self, mode: &mut M) {
        self.scheduler.destroy(mode);
        mode.shutdown();
    }

    /// Register an actor. Returns `false` if its id is already live.
    pub fn register(&mut self, actor: Actor<M>) -> bool {
        self.scheduler.register(actor)
    }

    /// Evict an actor, running its teardown. Idempotent.
    pub fn remove(&mut self, id: ActorId, mode: &mut M) -> bool {
        self.scheduler.remove(id, mode)
    }

    /// Live population size for a kind.
    pub fn count(&self, kind: ActorKind) -> usize {
        self.scheduler.count(kind)
    }

    /// Iterate the state blocks of a kind's live members.
    pub fn active(&self, kind: ActorKind) -> impl Iterator<Item = &ActorState> + '_ {
        self.scheduler.active(kind)
    }

    /// Total live population.
    pub fn population(&self) -> usize {
        self.scheduler.population()
    }

    /// Get a shared handle to the grid.
    pub fn grid(&self) -> Arc<Grid> {
        Arc::clone(&self.grid)
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get the elapsed simulation time.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Get a snapshot of the current simulation state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(self.tick, self.time, self.scheduler.states(), &self.grid)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }
}

impl<M: GameMode> Default for SimWorld<M> {
    fn default() -> Self {
        Self::new()
    }
}
