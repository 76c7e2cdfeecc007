use crate::{Cell, TileGrid};

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use stats::OnlineStats;

/// Samples smooth Perlin noise per cell and normalizes it into `[0, 1]`.
pub struct DensityField {
    noise: Perlin,
    scaler: f64,
    map_size: f64,
}

impl DensityField {
    pub fn new(scaler: f32, map_size: u32) -> Self {
        DensityField {
            noise: Perlin::default(),
            scaler: scaler as f64,
            map_size: map_size.max(1) as f64,
        }
    }

    pub fn compute(&self, x: u32, y: u32) -> f32 {
        let nx = x as f64 / self.map_size * self.scaler;
        let ny = y as f64 / self.map_size * self.scaler;
        let value = (self.noise.get([nx, ny]) + 1.0) / 2.0;

        value.max(0.0).min(1.0) as f32
    }
}

/// Convenience wrapper for evaluating a single cell.
pub fn compute_density(x: u32, y: u32, scaler: f32, map_size: u32) -> f32 {
    DensityField::new(scaler, map_size).compute(x, y)
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DensitySummary {
    pub mean: f64,
    pub std_dev: f64,
}

/// Writes a density value into every cell of `grid`. Does not look at the tile layer.
pub fn fill_map_with_density(field: &DensityField, grid: &mut impl TileGrid) -> DensitySummary {
    let size = grid.size();
    let mut stats = OnlineStats::new();
    for y in 0..size {
        for x in 0..size {
            let value = field.compute(x, y);
            stats.add(value);
            grid.set_density(Cell::new(x as i32, y as i32), value);
        }
    }

    DensitySummary {
        mean: stats.mean(),
        std_dev: stats.stddev(),
    }
}
