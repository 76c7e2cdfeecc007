pub mod border;
pub mod config;
pub mod density;
pub mod error;
pub mod fill;
pub mod graph;
pub mod map_types;
pub mod sampling;
pub mod subdivision;
pub mod tile_map;

mod symmetric_map;

pub use config::GenerationParameters;
pub use error::{ConfigurationError, GenerationError, SubdivisionError};
pub use map_types::terrain::{regenerate_map, CancelHandle, GenerationState, TerrainGenerator};
pub use tile_map::TileMap;

use serde::{Deserialize, Serialize};

/// Implement this to allow the procedural generation algorithms to write into your tile map.
pub trait TileGrid {
    /// Side length of the (square) grid. Valid cells are `[0, size) x [0, size)`.
    fn size(&self) -> u32;

    fn has_tile(&self, cell: Cell) -> bool;

    /// `kind` is the opaque tile tag to write into `cell`.
    fn set_tile(&mut self, cell: Cell, kind: TileKind);

    /// Writes into the density layer, which is independent of tile occupancy.
    fn set_density(&mut self, cell: Cell, value: f32);

    /// Clears both the tile and the density layers.
    fn clear(&mut self);

    fn contains(&self, cell: Cell) -> bool {
        let size = self.size() as i32;

        cell.x >= 0 && cell.y >= 0 && cell.x < size && cell.y < size
    }
}

/// Integer tile coordinates. Signed so that neighbors of edge cells are representable.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The four axis neighbors, in right, left, up, down order.
    pub fn neighbors(&self) -> [Cell; 4] {
        [
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x - 1, self.y),
            Cell::new(self.x, self.y + 1),
            Cell::new(self.x, self.y - 1),
        ]
    }
}

/// A sampled point in continuous domain coordinates. Identity is its index in the sampled
/// sequence.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Site {
    pub x: f32,
    pub y: f32,
}

impl Site {
    pub const fn new(x: f32, y: f32) -> Self {
        Site { x, y }
    }

    /// Euclidean distance. Bit-identical on every platform, so it avoids `hypot`.
    pub fn distance(&self, other: &Site) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;

        (dx * dx + dy * dy).sqrt()
    }

    /// The grid cell containing this site, clamped into `[0, size)`.
    pub fn cell(&self, size: u32) -> Cell {
        let max = size.saturating_sub(1) as i32;
        let x = (self.x.floor() as i32).max(0).min(max);
        let y = (self.y.floor() as i32).max(0).min(max);

        Cell::new(x, y)
    }
}

/// A boundary segment of the planar subdivision, separating the cells of `sites.0` and
/// `sites.1`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Edge {
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub sites: (usize, usize),
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TileKind(pub u8);

pub const GROUND_TILE: TileKind = TileKind(1);
pub const GROUND_TILE_ALT: TileKind = TileKind(2);

/// Even sites get `GROUND_TILE`, odd sites get `GROUND_TILE_ALT`.
pub fn alternating_ground(site_index: usize) -> TileKind {
    if site_index % 2 == 0 {
        GROUND_TILE
    } else {
        GROUND_TILE_ALT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_distance_is_exact_for_pythagorean_triples() {
        assert_eq!(Site::new(0.0, 0.0).distance(&Site::new(3.0, 4.0)), 5.0);
        assert_eq!(Site::new(10.0, 7.0).distance(&Site::new(-2.0, 12.0)), 13.0);
        assert_eq!(Site::new(1.5, 1.5).distance(&Site::new(1.5, 1.5)), 0.0);
    }

    #[test]
    fn test_site_distance_matches_squared_sum() {
        let center = Site::new(256.0, 256.0);
        for i in 0..1000 {
            let site = Site::new(i as f32 * 0.513, 511.0 - i as f32 * 0.377);
            let dx = site.x - center.x;
            let dy = site.y - center.y;
            let expected = (dx * dx + dy * dy).sqrt();

            assert_eq!(site.distance(&center).to_bits(), expected.to_bits());
            assert_eq!(center.distance(&site).to_bits(), expected.to_bits());
        }
    }
}
