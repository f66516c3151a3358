use log::debug;

use crate::api::TileGrid;
use crate::error::ConfigError;
use crate::rules::CollisionRules;
use crate::types::*;

/// Dense description of a tile map. `tiles` is row-major, `columns * rows` long.
#[derive(Copy, Clone, Debug)]
pub struct TileMapDesc<'a> {
    pub columns: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tiles: &'a [Option<TileId>],
}

#[derive(Copy, Clone, Debug)]
struct Cell {
    id: TileId,
    groups: GroupMask,
}

/// Bundled [`TileGrid`]: fixed-size map with group masks cached per cell.
#[derive(Clone, Debug)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    cells: Vec<Option<Cell>>,
}

impl TileMap {
    pub fn new(desc: TileMapDesc<'_>, rules: &CollisionRules) -> Result<Self, ConfigError> {
        if desc.tile_width == 0 || desc.tile_height == 0 {
            return Err(ConfigError::ZeroTileSize { width: desc.tile_width, height: desc.tile_height });
        }
        let expected = desc.columns as usize * desc.rows as usize;
        if desc.tiles.len() != expected {
            return Err(ConfigError::GridSize { expected, actual: desc.tiles.len() });
        }
        let cells: Vec<Option<Cell>> = desc
            .tiles
            .iter()
            .map(|t| t.map(|id| Cell { id, groups: rules.groups_for_tile(id) }))
            .collect();
        debug!(
            "built {}x{} tile map ({}x{} px tiles, {} occupied)",
            desc.columns,
            desc.rows,
            desc.tile_width,
            desc.tile_height,
            cells.iter().filter(|c| c.is_some()).count()
        );
        Ok(Self {
            columns: desc.columns,
            rows: desc.rows,
            tile_width: desc.tile_width,
            tile_height: desc.tile_height,
            cells,
        })
    }

    /// All-empty map of the given size.
    pub fn empty(columns: u32, rows: u32, tile_width: u32, tile_height: u32) -> Result<Self, ConfigError> {
        let tiles = vec![None; columns as usize * rows as usize];
        Self::new(TileMapDesc { columns, rows, tile_width, tile_height, tiles: &tiles }, &CollisionRules::default())
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Place or clear one cell. Returns `false` if the cell is outside the map.
    pub fn set_tile(&mut self, grid_x: i32, grid_y: i32, tile: Option<TileId>, rules: &CollisionRules) -> bool {
        let Some(i) = self.index(grid_x, grid_y) else { return false };
        self.cells[i] = tile.map(|id| Cell { id, groups: rules.groups_for_tile(id) });
        true
    }

    fn index(&self, grid_x: i32, grid_y: i32) -> Option<usize> {
        if grid_x < 0 || grid_y < 0 || grid_x as u32 >= self.columns || grid_y as u32 >= self.rows {
            return None;
        }
        Some(grid_y as usize * self.columns as usize + grid_x as usize)
    }
}

impl TileGrid for TileMap {
    fn tile_at(&self, grid_x: i32, grid_y: i32) -> Option<TileRef> {
        let cell = self.cells[self.index(grid_x, grid_y)?]?;
        Some(TileRef {
            id: Some(cell.id),
            grid_x,
            grid_y,
            width: self.tile_width,
            height: self.tile_height,
        })
    }

    fn group_membership(&self, tile: &TileRef) -> GroupMask {
        self.index(tile.grid_x, tile.grid_y)
            .and_then(|i| self.cells[i])
            .filter(|c| Some(c.id) == tile.id)
            .map(|c| c.groups)
            .unwrap_or_default()
    }

    fn tile_width(&self) -> u32 {
        self.tile_width
    }

    fn tile_height(&self) -> u32 {
        self.tile_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{GroupDef, RulesDef};

    fn rules() -> CollisionRules {
        CollisionRules::from_def(&RulesDef {
            groups: vec![GroupDef::new("solid").tiles(0, 0, 4), GroupDef::new("water").tile(1, 0)],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_zero_tile_size_is_fatal() {
        assert!(matches!(TileMap::empty(4, 4, 0, 16), Err(ConfigError::ZeroTileSize { width: 0, height: 16 })));
        assert!(matches!(TileMap::empty(4, 4, 16, 0), Err(ConfigError::ZeroTileSize { .. })));
    }

    #[test]
    fn test_wrong_cell_count_rejected() {
        let tiles = [None; 3];
        let desc = TileMapDesc { columns: 2, rows: 2, tile_width: 8, tile_height: 8, tiles: &tiles };
        assert!(matches!(TileMap::new(desc, &rules()), Err(ConfigError::GridSize { expected: 4, actual: 3 })));
    }

    #[test]
    fn test_lookup_and_membership() {
        let r = rules();
        let tiles = [Some(TileId::new(0, 2)), None, None, Some(TileId::new(1, 0))];
        let map = TileMap::new(TileMapDesc { columns: 2, rows: 2, tile_width: 16, tile_height: 8, tiles: &tiles }, &r).unwrap();

        let t = map.tile_at(0, 0).unwrap();
        assert_eq!(t.id, Some(TileId::new(0, 2)));
        assert_eq!((t.width, t.height), (16, 8));
        assert!(map.group_membership(&t).contains(r.group_id("solid").unwrap()));

        assert!(map.tile_at(1, 0).is_none());
        let w = map.tile_at(1, 1).unwrap();
        assert_eq!(map.group_membership(&w), GroupMask::single(r.group_id("water").unwrap()));

        assert!(map.tile_at(-1, 0).is_none());
        assert!(map.tile_at(2, 0).is_none());
        assert!(map.tile_at(0, 2).is_none());
    }

    #[test]
    fn test_set_tile() {
        let r = rules();
        let mut map = TileMap::empty(3, 3, 16, 16).unwrap();
        assert!(map.set_tile(1, 2, Some(TileId::new(0, 4)), &r));
        assert!(!map.set_tile(3, 0, Some(TileId::new(0, 4)), &r));
        let t = map.tile_at(1, 2).unwrap();
        assert!(!map.group_membership(&t).is_empty());
        assert!(map.set_tile(1, 2, None, &r));
        assert!(map.tile_at(1, 2).is_none());
        // stale refs report no groups
        assert!(map.group_membership(&t).is_empty());
    }
}
