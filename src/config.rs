use crate::{error::ConfigurationError, Site};

use serde::{Deserialize, Serialize};

/// Largest accepted `domain_size`. The grid holds `domain_size^2` tiles.
pub const MAX_DOMAIN_SIZE: u32 = 2048;

/// Everything one generation run needs. Created per request and never mutated during a run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Side length of the square domain, in tiles.
    pub domain_size: u32,
    /// How many sites the jittered grid aims for. The sampler may return fewer.
    pub target_site_count: u32,
    /// Jitter disk radius as a fraction of the covering cell side. In `[0, 0.9]`.
    pub min_spacing_factor: f32,
    /// Fraction of half the domain that may be filled. In `[0, 1]`.
    pub fill_radius_fraction: f32,
    /// Fraction of the fill radius that is always filled. In `[0, 1]`.
    pub cut_fraction: f32,
    /// Chance that a site in the border band is left empty. In `[0, 1]`.
    pub border_save_chance: f32,
    /// Frequency multiplier for the density noise. In `[0, 10]`.
    pub noise_scaler: f32,
    pub seed: u64,
    /// Maximum flood fill passes per region. Defaults to twice the jittered-grid cell side.
    pub fill_iteration_cap: Option<u32>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        GenerationParameters {
            domain_size: 512,
            target_site_count: 200,
            min_spacing_factor: 0.7,
            fill_radius_fraction: 0.8,
            cut_fraction: 0.8,
            border_save_chance: 0.5,
            noise_scaler: 0.5,
            seed: 0,
            fill_iteration_cap: None,
        }
    }
}

fn check_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigurationError> {
    // NaN fails the range check too.
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

impl GenerationParameters {
    /// Parses parameters from RON. Fields that are left out take their default values.
    pub fn from_ron(text: &str) -> Result<Self, ConfigurationError> {
        let params: Self = ron::de::from_str(text).map_err(ConfigurationError::Parse)?;
        params.validate()?;

        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.domain_size == 0 {
            return Err(ConfigurationError::EmptyDomain);
        }
        if self.domain_size > MAX_DOMAIN_SIZE {
            return Err(ConfigurationError::DomainTooLarge {
                size: self.domain_size,
                max: MAX_DOMAIN_SIZE,
            });
        }
        if self.target_site_count == 0 {
            return Err(ConfigurationError::NoSites);
        }
        // At most one site per tile.
        let tiles = self.domain_size as u64 * self.domain_size as u64;
        if self.target_site_count as u64 > tiles {
            return Err(ConfigurationError::TooManySites {
                count: self.target_site_count,
                max: tiles,
            });
        }
        if self.fill_iteration_cap == Some(0) {
            return Err(ConfigurationError::ZeroIterationCap);
        }
        check_range("min_spacing_factor", self.min_spacing_factor, 0.0, 0.9)?;
        check_range("fill_radius_fraction", self.fill_radius_fraction, 0.0, 1.0)?;
        check_range("cut_fraction", self.cut_fraction, 0.0, 1.0)?;
        check_range("border_save_chance", self.border_save_chance, 0.0, 1.0)?;
        check_range("noise_scaler", self.noise_scaler, 0.0, 10.0)?;

        Ok(())
    }

    /// Side length of one jittered-grid covering cell.
    pub fn cell_side(&self) -> f32 {
        let area = self.domain_size as f32 * self.domain_size as f32;

        (area / self.target_site_count as f32).sqrt()
    }

    pub fn center(&self) -> Site {
        let half = (self.domain_size / 2) as f32;

        Site::new(half, half)
    }

    pub fn fill_radius(&self) -> f32 {
        self.fill_radius_fraction * self.domain_size as f32 / 2.0
    }

    pub fn iteration_cap(&self) -> u32 {
        self.fill_iteration_cap
            .unwrap_or_else(|| (2.0 * self.cell_side()).ceil().max(1.0) as u32)
    }
}
