use crate::{
    alternating_ground,
    border::BorderPolicy,
    config::GenerationParameters,
    density::{fill_map_with_density, DensityField, DensitySummary},
    error::{ConfigurationError, GenerationError},
    fill::{fill_region, FillOutcome},
    graph::SiteGraph,
    sampling::{seeded_rng, JitteredGridSpec},
    subdivision::{subdivide, SubdivisionAdapter, VoronoiSubdivision},
    tile_map::TileMap,
    Edge, Site, TileGrid, TileKind,
};

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GenerationReport {
    pub sites_sampled: usize,
    pub sites_accepted: usize,
    pub cells_filled: usize,
    pub capped_fills: usize,
    pub islands: usize,
    pub density: DensitySummary,
}

/// Everything one run produced besides the grid contents.
#[derive(Clone, Debug)]
pub struct GenerationState {
    pub parameters: GenerationParameters,
    pub sites: Vec<Site>,
    pub edges: Vec<Edge>,
    pub site_graph: SiteGraph,
    /// Per site, the fill outcome if the border policy accepted it.
    pub fills: Vec<Option<FillOutcome>>,
    pub report: GenerationReport,
}

impl GenerationState {
    pub fn is_accepted(&self, site: usize) -> bool {
        self.fills.get(site).map_or(false, |f| f.is_some())
    }
}

#[derive(Serialize)]
struct DebugExport<'a> {
    sites: &'a [Site],
    edges: &'a [Edge],
}

/// Lets another thread abandon whatever run is in flight. The next `regenerate` starts fresh.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    epoch: Arc<AtomicU64>,
}

impl CancelHandle {
    pub fn supersede(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    fn begin(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }
}

/// Runs the sample, subdivide, fill and density stages and keeps the last completed run for
/// debug export.
pub struct TerrainGenerator<A = VoronoiSubdivision> {
    adapter: A,
    cancel: CancelHandle,
    last: Option<GenerationState>,
}

impl TerrainGenerator<VoronoiSubdivision> {
    pub fn voronoi() -> Self {
        TerrainGenerator::new(VoronoiSubdivision)
    }
}

impl Default for TerrainGenerator<VoronoiSubdivision> {
    fn default() -> Self {
        TerrainGenerator::voronoi()
    }
}

impl<A: SubdivisionAdapter> TerrainGenerator<A> {
    pub fn new(adapter: A) -> Self {
        TerrainGenerator {
            adapter,
            cancel: CancelHandle::default(),
            last: None,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Sites and edges of the last completed run. Never touches a grid.
    pub fn debug_export(&self) -> Option<(&[Site], &[Edge])> {
        self.last
            .as_ref()
            .map(|s| (s.sites.as_slice(), s.edges.as_slice()))
    }

    pub fn export_ron(&self) -> Result<String, GenerationError> {
        let (sites, edges) = self
            .debug_export()
            .ok_or(GenerationError::NothingToExport)?;

        ron::ser::to_string_pretty(&DebugExport { sites, edges }, PrettyConfig::default())
            .map_err(GenerationError::Export)
    }

    pub fn last_state(&self) -> Option<&GenerationState> {
        self.last.as_ref()
    }

    /// Clears `grid` and fills it from scratch. On error the grid is left cleared, or untouched
    /// if the parameters were rejected.
    pub fn regenerate(
        &mut self,
        params: &GenerationParameters,
        grid: &mut impl TileGrid,
        tile_kind: impl Fn(usize) -> TileKind,
    ) -> Result<&GenerationState, GenerationError> {
        let epoch = self.cancel.begin();
        params.validate()?;
        if grid.size() != params.domain_size {
            return Err(ConfigurationError::GridSizeMismatch {
                expected: params.domain_size,
                actual: grid.size(),
            }
            .into());
        }

        log::info!("Generating terrain with seed {}", params.seed);
        grid.clear();

        let state = match self.run(params, grid, tile_kind, epoch) {
            Ok(state) => state,
            Err(e) => {
                grid.clear();
                return Err(e);
            }
        };
        log::debug!("Generation report = {:?}", state.report);

        Ok(&*self.last.insert(state))
    }

    fn check_current(&self, epoch: u64) -> Result<(), GenerationError> {
        if self.cancel.is_current(epoch) {
            Ok(())
        } else {
            log::debug!("Abandoning superseded generation");
            Err(GenerationError::Superseded)
        }
    }

    fn run(
        &self,
        params: &GenerationParameters,
        grid: &mut impl TileGrid,
        tile_kind: impl Fn(usize) -> TileKind,
        epoch: u64,
    ) -> Result<GenerationState, GenerationError> {
        let size = params.domain_size as f32;
        let mut rng = seeded_rng(params.seed);

        let sampler = JitteredGridSpec {
            width: size,
            height: size,
            target_count: params.target_site_count,
            min_spacing_factor: params.min_spacing_factor,
        };
        let sites = sampler.sample(&mut rng);
        log::debug!(
            "Sampled {} sites (target {})",
            sites.len(),
            params.target_site_count
        );
        self.check_current(epoch)?;

        let edges = subdivide(&self.adapter, &sites, size, size)?;
        let site_graph = SiteGraph::from_edges(sites.len(), &edges);
        self.check_current(epoch)?;

        let policy = BorderPolicy::from_parameters(params);
        let iteration_cap = params.iteration_cap();
        let mut fills = Vec::with_capacity(sites.len());
        for (i, site) in sites.iter().enumerate() {
            if !policy.should_fill(site, &mut rng) {
                fills.push(None);
                continue;
            }
            self.check_current(epoch)?;

            let outcome = fill_region(
                site.cell(params.domain_size),
                tile_kind(i),
                grid,
                iteration_cap,
            );
            if outcome.hit_cap() {
                log::debug!("Fill from site {} hit the cap of {} passes", i, iteration_cap);
            }
            fills.push(Some(outcome));
        }

        let accepted: Vec<&FillOutcome> = fills.iter().flatten().collect();
        let capped_fills = accepted.iter().filter(|f| f.hit_cap()).count();
        if capped_fills > 0 {
            log::warn!(
                "{} of {} fills hit the iteration cap",
                capped_fills,
                accepted.len()
            );
        }
        let islands = site_graph
            .islands(|s| fills[s].map_or(false, |f| f.filled > 0))
            .len();
        self.check_current(epoch)?;

        let field = DensityField::new(params.noise_scaler, params.domain_size);
        let density = fill_map_with_density(&field, grid);
        self.check_current(epoch)?;

        let report = GenerationReport {
            sites_sampled: sites.len(),
            sites_accepted: accepted.len(),
            cells_filled: accepted.iter().map(|f| f.filled).sum(),
            capped_fills,
            islands,
            density,
        };

        Ok(GenerationState {
            parameters: params.clone(),
            sites,
            edges,
            site_graph,
            fills,
            report,
        })
    }
}

/// One-shot generation into a fresh `TileMap`, using alternating ground tiles.
pub fn regenerate_map(
    params: &GenerationParameters,
) -> Result<(TileMap, GenerationState), GenerationError> {
    let mut map = TileMap::new(params.domain_size);
    let mut generator = TerrainGenerator::voronoi();
    let state = generator.regenerate(params, &mut map, alternating_ground)?.clone();

    Ok((map, state))
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
