//! Host game-mode boundary.

/// Context the host supplies to the simulation.
///
/// Hooks, actions, and teardowns all receive the mode by mutable reference,
/// so host state (score, settings, a grid handle) stays reachable without
/// the core knowing its shape. The lifecycle methods default to no-ops; the
/// [`SimWorld`](crate::SimWorld) façade calls them around the fixed-step
/// loop.
pub trait GameMode {
    /// Called once when the world starts.
    fn init(&mut self) {}

    /// Called once per fixed step, before the scheduler tick.
    fn update(&mut self, _dt: f32) {}

    /// Called once at shutdown, after every actor has been torn down.
    fn shutdown(&mut self) {}
}
