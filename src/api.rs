use glam::DVec2;

use crate::group::CollisionCategory;
use crate::types::*;

/// Read-only view of a tile grid, as the resolver consumes it.
///
/// Implementations must guarantee non-zero tile dimensions. The resolver only
/// reads, so a grid shared across threads must not be edited mid-step.
pub trait TileGrid {
    /// Tile occupying cell `(grid_x, grid_y)`, or `None` for holes and cells
    /// outside the map.
    fn tile_at(&self, grid_x: i32, grid_y: i32) -> Option<TileRef>;

    /// Groups the tile belongs to.
    fn group_membership(&self, tile: &TileRef) -> GroupMask;

    /// Cell width in world units. Must be non-zero; a grid reporting zero
    /// gets an empty result (and a warning) from every resolve.
    fn tile_width(&self) -> u32;

    /// Cell height in world units. Same contract as [`tile_width`](Self::tile_width).
    fn tile_height(&self) -> u32;
}

/// Public contract of the resolver, as the simulation consumes it.
pub trait ResolverApi {
    /// Resolve one sample point moving from `old` to `new` (entity origin,
    /// before the category offset) against `grid`. A category that was not
    /// built by this resolver's rule set yields an empty result.
    fn resolve<G: TileGrid + ?Sized>(
        &self,
        category: &CollisionCategory,
        old: DVec2,
        new: DVec2,
        grid: &G,
    ) -> CollisionResult;

    /// Resolve several categories for one entity, in the given order.
    fn resolve_all<G: TileGrid + ?Sized>(
        &self,
        categories: &[CategoryId],
        old: DVec2,
        new: DVec2,
        grid: &G,
    ) -> Vec<(CategoryId, CollisionResult)>;
}
