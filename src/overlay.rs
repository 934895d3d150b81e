use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::describe::{describe, Activation, InteractionHandler};
use crate::feed::{BoundaryFeature, EventRecord};
use crate::style::MarkerStyle;

pub const DEFAULT_EARTHQUAKE_OVERLAY: &str = "Earthquakes";
pub const DEFAULT_BOUNDARY_OVERLAY: &str = "Tectonic Plates";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    /// Position of the source event in the feed
    pub id: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub style: MarkerStyle,
    pub popup: String,
}

impl CircleMarker {
    pub fn from_event(id: usize, event: &EventRecord, popup: String) -> Self {
        Self {
            id,
            latitude: event.latitude,
            longitude: event.longitude,
            style: MarkerStyle::for_event(event.depth, event.magnitude),
            popup,
        }
    }
}

/// Circle markers for every earthquake, in feed order.
#[derive(Debug, Clone, Serialize)]
pub struct EarthquakeOverlay {
    pub name: String,
    pub markers: Vec<CircleMarker>,
    #[serde(skip)]
    handler: Arc<dyn InteractionHandler>,
}

impl EarthquakeOverlay {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn handler(&self) -> &Arc<dyn InteractionHandler> {
        &self.handler
    }

    /// Simulates a click on a marker. Returns false when there is no such marker.
    pub fn activate(&self, index: usize) -> bool {
        activate(&self.handler, &self.name, index, self.markers.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryStyle {
    pub color: String,
    pub fill_color: String,
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        Self {
            color: "orange".to_string(),
            fill_color: "red".to_string(),
        }
    }
}

/// Boundary shapes drawn with one uniform style.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryOverlay {
    pub name: String,
    pub features: Vec<BoundaryFeature>,
    pub style: BoundaryStyle,
    #[serde(skip)]
    handler: Arc<dyn InteractionHandler>,
}

impl BoundaryOverlay {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn activate(&self, index: usize) -> bool {
        activate(&self.handler, &self.name, index, self.features.len())
    }

    pub fn to_feature_collection(&self) -> Value {
        let features: Vec<Value> = self.features.iter().map(BoundaryFeature::to_geojson).collect();
        serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

fn activate(
    handler: &Arc<dyn InteractionHandler>,
    overlay: &str,
    index: usize,
    len: usize,
) -> bool {
    if index >= len {
        debug!("Ignoring activation of {}[{}], overlay has {} shapes", overlay, index, len);
        return false;
    }
    handler.on_activate(&Activation { overlay, index });
    true
}

/// One marker per event, styled by depth and magnitude, with a popup.
pub fn build_earthquake_overlay(
    name: &str,
    events: &[EventRecord],
    handler: Arc<dyn InteractionHandler>,
) -> EarthquakeOverlay {
    let markers: Vec<CircleMarker> = events
        .iter()
        .enumerate()
        .map(|(id, event)| CircleMarker::from_event(id, event, describe(event)))
        .collect();
    info!("Built '{}' overlay with {} markers", name, markers.len());

    EarthquakeOverlay {
        name: name.to_string(),
        markers,
        handler,
    }
}

pub fn build_boundary_overlay(
    name: &str,
    features: Vec<BoundaryFeature>,
    style: BoundaryStyle,
    handler: Arc<dyn InteractionHandler>,
) -> BoundaryOverlay {
    info!("Built '{}' overlay with {} features", name, features.len());
    BoundaryOverlay {
        name: name.to_string(),
        features,
        style,
        handler,
    }
}
