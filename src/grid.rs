//! Concurrent tile store keyed by integer coordinates.
//!
//! The grid is a sharded map from [`TileCoord`] to [`Tile`]. Every operation
//! takes `&self`: point access is safe from any thread, and `set_all` fans
//! the same mutation out across worker threads, touching each entry exactly
//! once before it returns. A missing coordinate is tolerated, not an error;
//! it logs a warning and the call falls through.

use crate::tile::{AllowAll, Tile, TileKind, TileOptions, TileRule};
use dashmap::DashMap;
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Integer coordinate of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Coordinate-keyed store of tiles.
///
/// Constructed dense (`width * height` tiles of a default kind) and grown
/// one tile at a time with [`Grid::insert`]. The extent accessors are live
/// scans over the current keys, so they stay correct for grown grids.
pub struct Grid {
    tiles: DashMap<TileCoord, Tile>,
    rule: Arc<dyn TileRule>,
}

impl Grid {
    /// Create a grid fully populated with `default` tiles.
    pub fn new(width: i32, height: i32, default: TileKind) -> Self {
        Self::with_rule(width, height, default, Arc::new(AllowAll))
    }

    /// Create a grid whose commits are screened by `rule`.
    pub fn with_rule(width: i32, height: i32, default: TileKind, rule: Arc<dyn TileRule>) -> Self {
        let tiles = DashMap::with_capacity((width.max(0) as usize) * (height.max(0) as usize));
        for y in 0..height {
            for x in 0..width {
                tiles.insert(TileCoord::new(x, y), Tile::new(default));
            }
        }
        Self { tiles, rule }
    }

    /// Get a copy of the tile at `coord`, or `None` for a missing coordinate.
    pub fn get(&self, coord: TileCoord) -> Option<Tile> {
        let tile = self.tiles.get(&coord).map(|entry| *entry.value());
        if tile.is_none() {
            warn!("[Grid] no tile at ({}, {})", coord.x, coord.y);
        }
        tile
    }

    /// Coordinate-pair convenience form of [`Grid::get`].
    pub fn get_xy(&self, x: i32, y: i32) -> Option<Tile> {
        self.get(TileCoord::new(x, y))
    }

    /// Apply an options-commit mutation to the tile at `coord`.
    ///
    /// A missing coordinate logs a warning and mutates nothing.
    pub fn set<F>(&self, coord: TileCoord, configure: F)
    where
        F: FnOnce(&mut TileOptions),
    {
        match self.tiles.get_mut(&coord) {
            Some(mut entry) => commit_with_rule(self.rule.as_ref(), entry.value_mut(), configure),
            None => warn!("[Grid] set at missing ({}, {}) ignored", coord.x, coord.y),
        }
    }

    /// Apply the same options-commit mutation to every tile.
    ///
    /// The work is fanned out across the rayon pool; `configure` runs once
    /// per tile, on independent tiles concurrently, and every entry is
    /// committed before this call returns.
    pub fn set_all<F>(&self, configure: F)
    where
        F: Fn(&mut TileOptions) + Send + Sync,
    {
        let coords: Vec<TileCoord> = self.tiles.iter().map(|entry| *entry.key()).collect();
        coords.into_par_iter().for_each(|coord| {
            if let Some(mut entry) = self.tiles.get_mut(&coord) {
                commit_with_rule(self.rule.as_ref(), entry.value_mut(), &configure);
            }
        });
    }

    /// Place a fresh tile of `kind` at `coord`, growing the grid if the
    /// coordinate lies beyond the constructed extent.
    pub fn insert(&self, coord: TileCoord, kind: TileKind) {
        self.tiles.insert(coord, Tile::new(kind));
    }

    /// Current width: one past the largest x key. Live O(n) scan; cache the
    /// result if you need it every frame.
    pub fn width(&self) -> i32 {
        self.tiles
            .iter()
            .map(|entry| entry.key().x)
            .max()
            .map_or(0, |x| x + 1)
    }

    /// Current height: one past the largest y key. Live O(n) scan.
    pub fn height(&self) -> i32 {
        self.tiles
            .iter()
            .map(|entry| entry.key().y)
            .max()
            .map_or(0, |y| y + 1)
    }

    /// Number of tiles currently stored.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Visit every tile as a copy. Iteration order is unspecified.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(TileCoord, Tile),
    {
        for entry in self.tiles.iter() {
            visit(*entry.key(), *entry.value());
        }
    }
}

/// Run one options-commit cycle under the grid's transition rule.
fn commit_with_rule<F>(rule: &dyn TileRule, tile: &mut Tile, configure: F)
where
    F: FnOnce(&mut TileOptions),
{
    let mut options = tile.options();
    configure(&mut options);
    rule.before_commit(tile, &mut options);
    tile.commit(options);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_construction() {
        let grid = Grid::new(3, 2, TileKind::Grass);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);

        let tile = grid.get_xy(2, 1).unwrap();
        assert_eq!(tile.kind, TileKind::Grass);
    }

    #[test]
    fn test_get_out_of_range_is_missing() {
        let grid = Grid::new(3, 2, TileKind::Grass);
        // Logs a warning but stays recoverable.
        assert!(grid.get_xy(5, 5).is_none());
        assert!(grid.get_xy(-1, 0).is_none());
    }

    #[test]
    fn test_empty_grid_extent() {
        let grid = Grid::new(0, 0, TileKind::Dirt);
        assert!(grid.is_empty());
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.height(), 0);
    }

    #[test]
    fn test_set_changes_only_configured_fields() {
        let grid = Grid::new(2, 2, TileKind::Grass);
        grid.set(TileCoord::new(0, 0), |options| options.kind = TileKind::Water);

        let tile = grid.get_xy(0, 0).unwrap();
        assert_eq!(tile.kind, TileKind::Water);
        // The default rule does not re-derive flags on a kind change.
        assert!(!tile.blocked);
        assert!(!tile.has_food);

        // Other tiles untouched.
        assert_eq!(grid.get_xy(1, 1).unwrap().kind, TileKind::Grass);
    }

    #[test]
    fn test_set_on_missing_coordinate_is_a_noop() {
        let grid = Grid::new(2, 2, TileKind::Grass);
        grid.set(TileCoord::new(9, 9), |options| options.kind = TileKind::Rock);

        assert_eq!(grid.len(), 4);
        assert!(grid.get_xy(9, 9).is_none());
        assert_eq!(grid.get_xy(0, 0).unwrap().kind, TileKind::Grass);
    }

    #[test]
    fn test_set_all_touches_every_tile() {
        let grid = Grid::new(8, 8, TileKind::Grass);
        grid.set_all(|options| options.kind = TileKind::Sand);

        let mut sand = 0;
        grid.for_each(|_, tile| {
            if tile.kind == TileKind::Sand {
                sand += 1;
            }
        });
        assert_eq!(sand, 64);
    }

    #[test]
    fn test_insert_grows_extent() {
        let grid = Grid::new(3, 3, TileKind::Dirt);
        grid.insert(TileCoord::new(9, 4), TileKind::Rock);

        assert_eq!(grid.len(), 10);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 5);
        assert!(grid.get_xy(9, 4).unwrap().blocked);
    }

    struct NoWater;

    impl TileRule for NoWater {
        fn before_commit(&self, tile: &mut Tile, proposed: &mut TileOptions) {
            if proposed.kind == TileKind::Water {
                proposed.kind = tile.kind;
            }
        }
    }

    #[test]
    fn test_rule_can_veto_a_transition() {
        let grid = Grid::with_rule(2, 2, TileKind::Grass, Arc::new(NoWater));
        grid.set(TileCoord::new(1, 0), |options| options.kind = TileKind::Water);
        assert_eq!(grid.get_xy(1, 0).unwrap().kind, TileKind::Grass);

        grid.set(TileCoord::new(1, 0), |options| options.kind = TileKind::Sand);
        assert_eq!(grid.get_xy(1, 0).unwrap().kind, TileKind::Sand);
    }

    struct DeriveFlags;

    impl TileRule for DeriveFlags {
        fn before_commit(&self, tile: &mut Tile, proposed: &mut TileOptions) {
            tile.blocked = proposed.kind.default_blocked();
            tile.has_food = proposed.kind.grows_food();
        }
    }

    #[test]
    fn test_rule_can_react_to_a_transition() {
        let grid = Grid::with_rule(2, 2, TileKind::Grass, Arc::new(DeriveFlags));
        grid.set(TileCoord::new(0, 1), |options| options.kind = TileKind::Water);

        let tile = grid.get_xy(0, 1).unwrap();
        assert_eq!(tile.kind, TileKind::Water);
        assert!(tile.blocked);
        assert!(!tile.has_food);
    }

    #[test]
    fn test_point_access_during_set_all() {
        let grid = Grid::new(32, 32, TileKind::Grass);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                grid.set_all(|options| options.kind = TileKind::Dirt);
            });
            scope.spawn(|| {
                for i in 0..32 {
                    let tile = grid.get_xy(i, i).unwrap();
                    assert!(matches!(tile.kind, TileKind::Grass | TileKind::Dirt));
                }
            });
        });

        let mut dirt = 0;
        grid.for_each(|_, tile| {
            if tile.kind == TileKind::Dirt {
                dirt += 1;
            }
        });
        assert_eq!(dirt, 32 * 32);
    }
}
