//! Tile cells and the options-commit mutation path.
//!
//! Tiles are plain copyable values stored in the grid. Callers never write
//! grid state field-by-field: kind changes are described on a transient
//! [`TileOptions`] snapshot and committed back in one step, which gives the
//! grid's [`TileRule`] a single place to inspect or veto a transition.

use serde::{Deserialize, Serialize};

/// Tile type at a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open grass - walkable, can carry food.
    Grass,
    /// Packed dirt - walkable, barren.
    Dirt,
    /// Loose sand - walkable, barren.
    Sand,
    /// Standing water - blocks movement.
    Water,
    /// Bare rock - blocks movement.
    Rock,
}

impl Default for TileKind {
    fn default() -> Self {
        Self::Grass
    }
}

impl TileKind {
    /// Whether freshly placed tiles of this kind block movement.
    pub fn default_blocked(&self) -> bool {
        matches!(self, TileKind::Water | TileKind::Rock)
    }

    /// Whether food can grow on this kind of tile.
    pub fn grows_food(&self) -> bool {
        matches!(self, TileKind::Grass)
    }
}

/// A single cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Type of terrain at this cell.
    pub kind: TileKind,
    /// Whether actors may enter this cell.
    pub blocked: bool,
    /// Whether food is currently present.
    pub has_food: bool,
}

impl Tile {
    /// Create a tile of the given kind with that kind's default flags.
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            blocked: kind.default_blocked(),
            has_food: false,
        }
    }

    /// Snapshot the editable subset of this tile.
    pub fn options(&self) -> TileOptions {
        TileOptions { kind: self.kind }
    }

    /// Run `configure` over an options snapshot, then commit the result.
    ///
    /// Fields the options do not carry keep their current values.
    pub fn apply<F>(&mut self, configure: F)
    where
        F: FnOnce(&mut TileOptions),
    {
        let mut options = self.options();
        configure(&mut options);
        self.commit(options);
    }

    /// Write an options snapshot back onto this tile.
    pub fn commit(&mut self, options: TileOptions) {
        self.kind = options.kind;
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TileKind::default())
    }
}

/// Editable subset of a tile, filled in by a configure function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOptions {
    /// Tile type to commit.
    pub kind: TileKind,
}

/// Transition rule consulted before a tile commit lands.
///
/// The grid holds one rule shared by every tile. `before_commit` runs after
/// the caller's configure function and may rewrite the proposed options
/// (including reverting the kind) or adjust the tile's flags to match the
/// incoming kind. The rule must tolerate concurrent invocation on distinct
/// tiles; `set_all` fans commits out across worker threads.
pub trait TileRule: Send + Sync {
    fn before_commit(&self, tile: &mut Tile, proposed: &mut TileOptions);
}

/// Rule that admits every transition unchanged.
#[derive(Debug, Default)]
pub struct AllowAll;

impl TileRule for AllowAll {
    fn before_commit(&self, _tile: &mut Tile, _proposed: &mut TileOptions) {}
}
