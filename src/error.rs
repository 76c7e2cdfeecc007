use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("domain size must be positive")]
    EmptyDomain,
    #[error("target site count must be positive")]
    NoSites,
    #[error("domain size {size} exceeds the maximum of {max}")]
    DomainTooLarge { size: u32, max: u32 },
    #[error("target site count {count} exceeds one site per tile ({max})")]
    TooManySites { count: u32, max: u64 },
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("fill iteration cap must be positive")]
    ZeroIterationCap,
    #[error("grid size {actual} does not match domain size {expected}")]
    GridSizeMismatch { expected: u32, actual: u32 },
    #[error("failed to parse generation parameters: {0}")]
    Parse(#[source] ron::Error),
}

#[derive(Debug, Error)]
pub enum SubdivisionError {
    #[error("site {index} at ({x}, {y}) was rejected by the triangulation: {reason}")]
    RejectedSite {
        index: usize,
        x: f32,
        y: f32,
        reason: String,
    },
    #[error("x and y coordinate arrays differ in length ({xs} vs {ys})")]
    MismatchedCoordinates { xs: usize, ys: usize },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Subdivision(#[from] SubdivisionError),
    #[error("generation was superseded by a newer request")]
    Superseded,
    #[error("no completed generation to export")]
    NothingToExport,
    #[error("failed to serialize debug export: {0}")]
    Export(#[source] ron::Error),
}
