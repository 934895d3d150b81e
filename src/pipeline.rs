//! The fetch, build and compose sequence.
//!
//! ```text
//! FetchEarthquakes -> BuildEarthquakeOverlay -> FetchBoundaries
//!     -> BuildBoundaryOverlay -> ComposeMap -> Rendered
//! ```
//!
//! Each stage hands its result to the next by value. The boundary fetch only
//! starts once the earthquake overlay exists, and nothing is retried.

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, info};

use crate::describe::InteractionHandler;
use crate::errors::PipelineError;
use crate::feed::{parse_boundary_collection, parse_event_collection, FeedSource, RecordPolicy};
use crate::map::{compose_map, MapComposition, MapSettings};
use crate::overlay::{build_boundary_overlay, build_earthquake_overlay, BoundaryStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    FetchEarthquakes,
    BuildEarthquakeOverlay,
    FetchBoundaries,
    BuildBoundaryOverlay,
    ComposeMap,
    Rendered,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::FetchEarthquakes => Some(Stage::BuildEarthquakeOverlay),
            Stage::BuildEarthquakeOverlay => Some(Stage::FetchBoundaries),
            Stage::FetchBoundaries => Some(Stage::BuildBoundaryOverlay),
            Stage::BuildBoundaryOverlay => Some(Stage::ComposeMap),
            Stage::ComposeMap => Some(Stage::Rendered),
            Stage::Rendered => None,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::FetchEarthquakes => "fetch earthquakes",
            Stage::BuildEarthquakeOverlay => "build earthquake overlay",
            Stage::FetchBoundaries => "fetch boundaries",
            Stage::BuildBoundaryOverlay => "build boundary overlay",
            Stage::ComposeMap => "compose map",
            Stage::Rendered => "rendered",
        };
        write!(f, "{}", name)
    }
}

pub struct Pipeline {
    earthquake_source: Box<dyn FeedSource>,
    boundary_source: Box<dyn FeedSource>,
    handler: Arc<dyn InteractionHandler>,
    record_policy: RecordPolicy,
    boundary_style: BoundaryStyle,
    settings: MapSettings,
}

impl Pipeline {
    pub fn new(
        earthquake_source: Box<dyn FeedSource>,
        boundary_source: Box<dyn FeedSource>,
        handler: Arc<dyn InteractionHandler>,
    ) -> Self {
        Self {
            earthquake_source,
            boundary_source,
            handler,
            record_policy: RecordPolicy::default(),
            boundary_style: BoundaryStyle::default(),
            settings: MapSettings::default(),
        }
    }

    pub fn with_record_policy(mut self, policy: RecordPolicy) -> Self {
        self.record_policy = policy;
        self
    }

    pub fn with_boundary_style(mut self, style: BoundaryStyle) -> Self {
        self.boundary_style = style;
        self
    }

    pub fn with_settings(mut self, settings: MapSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Runs every stage up to and including `ComposeMap`. Reaching
    /// [`Stage::Rendered`] is up to the caller that writes the map out.
    pub async fn run(&self) -> Result<MapComposition, PipelineError> {
        let mut stage = Stage::FetchEarthquakes;
        info!(
            "Stage: {} from {}",
            stage,
            self.earthquake_source.location()
        );
        let body = self
            .earthquake_source
            .fetch()
            .await
            .map_err(|e| PipelineError::new(stage, e))?;
        let events = parse_event_collection(&body, self.record_policy)
            .map_err(|e| PipelineError::new(stage, e))?;

        stage = advance(stage);
        let earthquakes = build_earthquake_overlay(
            &self.settings.earthquake_overlay_name,
            &events,
            self.handler.clone(),
        );

        stage = advance(stage);
        debug!("Boundary source: {}", self.boundary_source.location());
        let fetched = match self.boundary_source.fetch().await {
            Ok(body) => parse_boundary_collection(&body),
            Err(e) => Err(e),
        };
        let features = match fetched {
            Ok(features) => features,
            Err(e) => return Err(PipelineError::new(stage, e).with_earthquakes(earthquakes)),
        };

        stage = advance(stage);
        let boundaries = build_boundary_overlay(
            &self.settings.boundary_overlay_name,
            features,
            self.boundary_style.clone(),
            self.handler.clone(),
        );

        stage = advance(stage);
        if let Err(e) = self.settings.validate() {
            return Err(PipelineError::new(stage, e).with_earthquakes(earthquakes));
        }
        // Both overlays carry the validated names, so this cannot fail on them
        compose_map(earthquakes, boundaries, &self.settings)
            .map_err(|e| PipelineError::new(stage, e))
    }
}

fn advance(stage: Stage) -> Stage {
    let next = stage.next().unwrap_or(stage);
    info!("Stage: {}", next);
    next
}
