use glam::DVec2;
use tilebonk::*;

const RULES: &str = r#"(
    formulas: [
        (
            name: "floor",
            range: (output_axis: Y, min_x: 0, max_x: 15, min_y: 8, max_y: 15),
            function: Linear(a: 0.0, b: 0.0),
            constraint: { Top: ["ground", "slope"] },
        ),
        (
            name: "slope_up",
            range: (output_axis: Y, min_x: 0, max_x: 15, min_y: 0, max_y: 15),
            function: Linear(a: -1.0, b: 16.0),
        ),
    ],
    groups: [
        (name: "ground", tiles: [Range(sheet: 0, first: 0, last: 3)], formulas: ["floor"]),
        (name: "slope", tiles: [Tile(sheet: 0, index: 8)], formulas: ["slope_up"]),
    ],
    categories: [
        (name: "feet", axis: Y, offset_x: 8, offset_y: 16, groups: ["ground", "slope"]),
    ],
)"#;

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let rules = CollisionRules::from_ron_str(RULES)?;
    let ground = Some(TileId::new(0, 1));
    let slope = Some(TileId::new(0, 8));
    #[rustfmt::skip]
    let tiles = [
        None,   None,   None,   None,   slope,
        ground, ground, ground, slope,  ground,
    ];
    let map = TileMap::new(
        TileMapDesc { columns: 5, rows: 2, tile_width: 16, tile_height: 16, tiles: &tiles },
        &rules,
    )?;

    println!("map {}x{} tiles, {:?}", map.columns(), map.rows(), rules.stats());

    let resolver = CollisionResolver::new(&rules, ResolverConfig::default());
    let feet = rules.category_id("feet").expect("rules define a `feet` category");

    // Walk right with a constant downward pull, clamping to whatever the feet hit.
    let mut pos = DVec2::new(0.0, 2.0);
    for tick in 0..40 {
        let old = pos;
        pos += DVec2::new(2.0, 3.0);
        for (_, hit) in resolver.resolve_all(&[feet], old, pos, &map) {
            rules.category(feet).apply(&hit, &mut pos);
            println!(
                "tick {tick:>2} pos=({:>5.1},{:>5.1}) tile=({},{}) hit={:?}",
                pos.x, pos.y, hit.tile.grid_x, hit.tile.grid_y, hit.y
            );
        }
    }
    Ok(())
}
