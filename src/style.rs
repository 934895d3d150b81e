//! Earthquake marker styling.
//!
//! Depth colouring is driven by a single bucket table. [`color_for_depth`]
//! walks it from the deepest bucket down, and [`legend_entries`] lists it in
//! ascending order, so the map legend cannot drift from the marker colours.

use serde::Serialize;

/// Stroke colour shared by every earthquake marker
pub const MARKER_STROKE_COLOR: &str = "gray";
/// Stroke weight shared by every earthquake marker
pub const MARKER_STROKE_WEIGHT: f64 = 1.0;
/// Fill opacity shared by every earthquake marker
pub const MARKER_FILL_OPACITY: f64 = 0.7;
/// Radius in pixels per unit of magnitude
pub const RADIUS_PER_MAGNITUDE: f64 = 5.0;

/// One row of the depth colour table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthBucket {
    /// Exclusive lower bound in kilometres; `None` for the catch-all bucket
    pub above: Option<f64>,
    pub label: &'static str,
    pub color: &'static str,
}

impl DepthBucket {
    pub fn contains(&self, depth: f64) -> bool {
        match self.above {
            Some(bound) => depth > bound,
            None => true,
        }
    }
}

/// Depth buckets, shallowest first. The first entry is the catch-all and
/// also covers negative depths.
pub const DEPTH_BUCKETS: [DepthBucket; 6] = [
    DepthBucket {
        above: None,
        label: "-10-10",
        color: "#F7FF00",
    },
    DepthBucket {
        above: Some(10.0),
        label: "10-30",
        color: "#FFCE03",
    },
    DepthBucket {
        above: Some(30.0),
        label: "30-50",
        color: "#FDA500",
    },
    DepthBucket {
        above: Some(50.0),
        label: "50-70",
        color: "#FF6204",
    },
    DepthBucket {
        above: Some(70.0),
        label: "70-90",
        color: "#B01E03",
    },
    DepthBucket {
        above: Some(90.0),
        label: "90+",
        color: "#690202",
    },
];

/// Bucket for a depth in kilometres. Upper bounds are inclusive, so a depth of
/// exactly 90 lands in `70-90`.
pub fn bucket_for_depth(depth: f64) -> &'static DepthBucket {
    DEPTH_BUCKETS
        .iter()
        .rev()
        .find(|bucket| bucket.contains(depth))
        .unwrap_or(&DEPTH_BUCKETS[0])
}

pub fn color_for_depth(depth: f64) -> &'static str {
    bucket_for_depth(depth).color
}

/// Marker radius for a magnitude. Not clamped: zero or negative magnitudes
/// give a zero or negative radius.
pub fn radius_for_magnitude(magnitude: f64) -> f64 {
    magnitude * RADIUS_PER_MAGNITUDE
}

/// A (label, colour) pair shown in the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

pub fn legend_entries() -> Vec<LegendEntry> {
    DEPTH_BUCKETS
        .iter()
        .map(|bucket| LegendEntry {
            label: bucket.label.to_string(),
            color: bucket.color.to_string(),
        })
        .collect()
}

/// Leaflet path options for a circle marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub radius: f64,
    pub weight: f64,
}

impl MarkerStyle {
    pub fn for_event(depth: f64, magnitude: f64) -> Self {
        Self {
            color: MARKER_STROKE_COLOR.to_string(),
            fill_color: color_for_depth(depth).to_string(),
            fill_opacity: MARKER_FILL_OPACITY,
            radius: radius_for_magnitude(magnitude),
            weight: MARKER_STROKE_WEIGHT,
        }
    }
}
