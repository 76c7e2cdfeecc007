use crate::{Cell, TileGrid, TileKind};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FillTermination {
    /// A pass filled nothing, so the region is enclosed.
    Natural,
    /// The pass budget ran out while the region was still growing.
    Capped,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FillOutcome {
    pub filled: usize,
    pub passes: u32,
    pub termination: FillTermination,
}

impl FillOutcome {
    pub fn hit_cap(&self) -> bool {
        self.termination == FillTermination::Capped
    }
}

fn claim(grid: &mut impl TileGrid, cell: Cell, kind: TileKind) -> bool {
    if !grid.contains(cell) || grid.has_tile(cell) {
        return false;
    }
    grid.set_tile(cell, kind);

    true
}

/// Breadth-first, four-connected fill from `seed` into empty cells, one ring per pass.
///
/// Occupied cells are never overwritten, so the first fill to reach a cell owns it. An
/// occupied `seed` fills nothing. Cells outside the grid act as occupied.
pub fn fill_region(
    seed: Cell,
    kind: TileKind,
    grid: &mut impl TileGrid,
    iteration_cap: u32,
) -> FillOutcome {
    if !claim(grid, seed, kind) {
        return FillOutcome {
            filled: 0,
            passes: 0,
            termination: FillTermination::Natural,
        };
    }

    let mut filled = 1;
    let mut frontier = vec![seed];
    let mut passes = 0;
    while passes < iteration_cap {
        passes += 1;
        let mut next_frontier = Vec::new();
        for cell in frontier.drain(..) {
            for &n in cell.neighbors().iter() {
                if claim(grid, n, kind) {
                    next_frontier.push(n);
                }
            }
        }

        if next_frontier.is_empty() {
            return FillOutcome {
                filled,
                passes,
                termination: FillTermination::Natural,
            };
        }
        filled += next_frontier.len();
        frontier = next_frontier;
    }

    FillOutcome {
        filled,
        passes,
        termination: FillTermination::Capped,
    }
}
