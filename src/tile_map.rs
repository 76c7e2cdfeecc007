use crate::{Cell, TileGrid, TileKind};

/// A dense, square, in-memory `TileGrid` with a tile layer and a density layer.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    size: u32,
    tiles: Vec<Option<TileKind>>,
    density: Vec<Option<f32>>,
}

impl TileMap {
    pub fn new(size: u32) -> Self {
        let len = size as usize * size as usize;

        TileMap {
            size,
            tiles: vec![None; len],
            density: vec![None; len],
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y as usize * self.size as usize + cell.x as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, cell: Cell) -> Option<TileKind> {
        self.index(cell).and_then(|i| self.tiles[i])
    }

    pub fn density(&self, cell: Cell) -> Option<f32> {
        self.index(cell).and_then(|i| self.density[i])
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let size = self.size as i32;

        (0..size).flat_map(move |y| (0..size).map(move |x| Cell::new(x, y)))
    }
}

impl TileGrid for TileMap {
    fn size(&self) -> u32 {
        self.size
    }

    fn has_tile(&self, cell: Cell) -> bool {
        self.tile(cell).is_some()
    }

    fn set_tile(&mut self, cell: Cell, kind: TileKind) {
        if let Some(i) = self.index(cell) {
            self.tiles[i] = Some(kind);
        } else {
            log::warn!("Ignoring tile write outside the map at {:?}", cell);
        }
    }

    fn set_density(&mut self, cell: Cell, value: f32) {
        if let Some(i) = self.index(cell) {
            self.density[i] = Some(value);
        }
    }

    fn clear(&mut self) {
        self.tiles.iter_mut().for_each(|t| *t = None);
        self.density.iter_mut().for_each(|d| *d = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GROUND_TILE;

    #[test]
    fn out_of_bounds_cells_are_empty_and_ignored() {
        let mut map = TileMap::new(4);
        map.set_tile(Cell::new(4, 0), GROUND_TILE);
        map.set_tile(Cell::new(-1, 2), GROUND_TILE);

        assert_eq!(map.tile_count(), 0);
        assert!(!map.has_tile(Cell::new(4, 0)));
    }

    #[test]
    fn clear_resets_both_layers() {
        let mut map = TileMap::new(4);
        map.set_tile(Cell::new(1, 2), GROUND_TILE);
        map.set_density(Cell::new(3, 3), 0.25);
        assert_eq!(map.density(Cell::new(3, 3)), Some(0.25));

        map.clear();

        assert_eq!(map, TileMap::new(4));
    }

    #[test]
    fn cells_cover_the_map_once() {
        let map = TileMap::new(3);
        let cells: Vec<_> = map.cells().collect();

        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[5], Cell::new(2, 1));
    }
}
