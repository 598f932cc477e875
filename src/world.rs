//! Host-facing snapshot types.
//!
//! A `Snapshot` is a serializable view of the simulation state, built from
//! the registry and grid so a host can poll world state without reaching
//! into the core. Grid contents are flattened into row-major vectors.

use crate::actor::{ActorKind, ActorState, Priority};
use crate::grid::Grid;
use log::warn;
use serde::{Deserialize, Serialize};

/// Kind byte used for coordinates with no tile in a sparse or grown grid.
pub const MISSING_TILE: u8 = 255;

/// Upper bound on the flattened cell count a [`GridSnapshot`] will allocate.
pub const MAX_SNAPSHOT_CELLS: usize = 1 << 20;

/// Snapshot of a single actor's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub id: u64,
    pub kind: ActorKind,
    pub priority: Priority,
    pub x: i32,
    pub y: i32,
}

impl ActorSnapshot {
    fn from_state(state: &ActorState) -> Self {
        Self {
            id: state.id().0,
            kind: state.kind(),
            priority: state.priority(),
            x: state.position.x,
            y: state.position.y,
        }
    }
}

/// Flattened snapshot of the grid.
///
/// Cell vectors are dense over the live extent. An extent past
/// [`MAX_SNAPSHOT_CELLS`] is reported with empty vectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: i32,
    pub height: i32,
    /// Row-major tile kinds as `u8`; [`MISSING_TILE`] marks absent cells.
    pub kinds: Vec<u8>,
    /// Row-major blocked flags.
    pub blocked: Vec<bool>,
    /// Row-major food flags.
    pub food: Vec<bool>,
}

impl GridSnapshot {
    /// Flatten the grid over its live extent.
    ///
    /// A single key far from the origin grows the extent to cover it, so the
    /// flattened cell count is capped at [`MAX_SNAPSHOT_CELLS`]; past the cap
    /// only the dimensions are reported and a warning is logged.
    pub fn from_grid(grid: &Grid) -> Self {
        let width = grid.width();
        let height = grid.height();
        let cells = (width.max(0) as u64) * (height.max(0) as u64);
        if cells > MAX_SNAPSHOT_CELLS as u64 {
            warn!(
                "[Snapshot] extent {}x{} exceeds {} cells; cell data omitted",
                width, height, MAX_SNAPSHOT_CELLS
            );
            return Self {
                width,
                height,
                ..Self::default()
            };
        }
        let len = cells as usize;

        let mut kinds = vec![MISSING_TILE; len];
        let mut blocked = vec![false; len];
        let mut food = vec![false; len];
        grid.for_each(|coord, tile| {
            // Keys below the origin fall outside the flattened extent.
            if coord.x < 0 || coord.y < 0 || coord.x >= width || coord.y >= height {
                return;
            }
            let index = (coord.y * width + coord.x) as usize;
            kinds[index] = tile.kind as u8;
            blocked[index] = tile.blocked;
            food[index] = tile.has_food;
        });

        Self {
            width,
            height,
            kinds,
            blocked,
            food,
        }
    }
}

/// Complete simulation state snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub time: f32,
    /// All actor states, sorted by id for stable output.
    pub actors: Vec<ActorSnapshot>,
    /// Flattened grid contents.
    pub grid: GridSnapshot,
}

impl Snapshot {
    /// Build a snapshot from live actor states and the grid.
    pub fn from_state<'a, I>(tick: u64, time: f32, states: I, grid: &Grid) -> Self
    where
        I: Iterator<Item = &'a ActorState>,
    {
        let mut actors: Vec<ActorSnapshot> = states.map(ActorSnapshot::from_state).collect();
        actors.sort_by_key(|actor| actor.id);

        Self {
            tick,
            time,
            actors,
            grid: GridSnapshot::from_grid(grid),
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
