//! Plain-text rendering of the tile grid.

use meltdown_core::{FruitSet, Tile, TileKind};
use meltdown_world::TileGrid;

/// Renders one character per tile, one line per row.
pub(crate) fn render_grid(grid: &TileGrid) -> String {
    let mut out = String::new();
    for (cell, tile) in grid.cells() {
        if cell.column() == 0 && cell.row() > 0 {
            out.push('\n');
        }
        out.push(glyph(tile));
    }
    out
}

fn glyph(tile: Tile) -> char {
    match tile.decode() {
        (TileKind::Corner, _) => '+',
        (TileKind::Wall, _) => '#',
        (TileKind::Ice, _) => '~',
        (TileKind::Enemy, 0) => 'H',
        (TileKind::Enemy, 1) => 'B',
        (TileKind::Enemy, 2) => 'M',
        (TileKind::Player, 0) => '1',
        (TileKind::Player, 1) => '2',
        (TileKind::Fruit, _) => match tile.fruit_set() {
            Some(FruitSet::Primary) => '*',
            _ => 'o',
        },
        (TileKind::Ground, _) => '.',
        (TileKind::Structure, _) => '^',
        _ => '?',
    }
}
