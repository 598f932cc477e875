//! World construction knobs.

use crate::tile::TileKind;

/// Configuration for a simulation world.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Fixed timestep in seconds (e.g., 1/30 = 0.0333 for 30 Hz).
    pub fixed_timestep: f32,
    /// Maximum actor actions performed per tick.
    pub action_budget: usize,
    /// Grid width in tiles.
    pub grid_width: i32,
    /// Grid height in tiles.
    pub grid_height: i32,
    /// Tile kind the grid is filled with at construction.
    pub default_tile: TileKind,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 30.0, // 30 Hz
            action_budget: 64,
            grid_width: 32,
            grid_height: 32,
            default_tile: TileKind::Grass,
        }
    }
}
