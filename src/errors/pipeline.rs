use thiserror::Error;

use super::{FeedError, MapError};
use crate::overlay::EarthquakeOverlay;
use crate::pipeline::Stage;

/// Underlying cause of a halted pipeline
#[derive(Error, Debug)]
pub enum StageFailure {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// The pipeline stopped before the map was composed.
///
/// Whatever was built before the failing stage is handed back unchanged, so a
/// boundary failure never costs the caller the earthquake overlay.
#[derive(Error, Debug)]
#[error("Pipeline halted at {stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    pub source: StageFailure,
    pub earthquakes: Option<EarthquakeOverlay>,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<StageFailure>) -> Self {
        Self {
            stage,
            source: source.into(),
            earthquakes: None,
        }
    }

    pub fn with_earthquakes(mut self, overlay: EarthquakeOverlay) -> Self {
        self.earthquakes = Some(overlay);
        self
    }

    /// True when a feed could not be reached or read
    pub fn is_transport_error(&self) -> bool {
        matches!(&self.source, StageFailure::Feed(err) if err.is_transport_error())
    }

    /// True when a malformed record or document halted the run
    pub fn is_data_error(&self) -> bool {
        matches!(&self.source, StageFailure::Feed(err) if err.is_data_error())
    }
}
