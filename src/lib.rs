//! Loam - Simulation Core
//!
//! A budgeted, fixed-timestep actor simulation over a shared tile grid.
//! Each tick services at most a configured number of actors in priority
//! order; the grid is a concurrent tile map keyed by integer coordinates.

pub mod actor;
pub mod api;
pub mod bimap;
pub mod config;
pub mod grid;
pub mod mode;
pub mod registry;
pub mod scheduler;
pub mod tile;
pub mod world;

pub use actor::*;
pub use api::SimWorld;
pub use bimap::{BiMap, BiMapError};
pub use config::SimConfig;
pub use grid::{Grid, TileCoord};
pub use mode::GameMode;
pub use registry::Registry;
pub use scheduler::{Scheduler, TickHook};
pub use tile::{AllowAll, Tile, TileKind, TileOptions, TileRule};
pub use world::{ActorSnapshot, GridSnapshot, Snapshot, MAX_SNAPSHOT_CELLS, MISSING_TILE};
