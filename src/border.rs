use crate::{config::GenerationParameters, sampling::RandomSource, Site};

/// Decides which sites get their region filled: everything inside the core radius, nothing
/// outside the fill radius, and a random subset of the band in between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderPolicy {
    pub center: Site,
    pub fill_radius: f32,
    pub cut_fraction: f32,
    pub save_border_chance: f32,
}

impl BorderPolicy {
    pub fn from_parameters(params: &GenerationParameters) -> Self {
        BorderPolicy {
            center: params.center(),
            fill_radius: params.fill_radius(),
            cut_fraction: params.cut_fraction,
            save_border_chance: params.border_save_chance,
        }
    }

    pub fn core_radius(&self) -> f32 {
        self.fill_radius * self.cut_fraction
    }

    /// Only draws from `rng` for sites in the border band.
    pub fn should_fill(&self, site: &Site, rng: &mut impl RandomSource) -> bool {
        let d = site.distance(&self.center);
        if d >= self.fill_radius {
            return false;
        }
        if d < self.core_radius() {
            return true;
        }

        rng.next_unit_float() > self.save_border_chance
    }
}
