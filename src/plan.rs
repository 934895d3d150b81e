//! Plan file structure.
//!
//! Data structures for the plan file. Every field is optional; the `get_*`
//! accessors fill in the defaults.
//!
//! ```text
//! Plan
//!   ├── meta: Option<Meta>
//!   │   └── name: Option<String>
//!   ├── feeds: Option<FeedConfig>
//!   │   ├── earthquakes: Option<String>
//!   │   ├── boundaries: Option<String>
//!   │   ├── timeout_secs: Option<u64>
//!   │   └── malformed_records: Option<RecordPolicy>   (reject | skip)
//!   ├── map: Option<MapConfig>
//!   │   ├── container, center, zoom
//!   │   ├── earthquake_overlay, boundary_overlay
//!   │   ├── boundary_color, boundary_fill_color
//!   │   ├── min_radius
//!   │   └── base_layers: Option<Vec<BaseLayer>>
//!   └── export: ExportProfile
//!       └── profiles: Vec<ExportProfileItem>
//!           ├── filename: String
//!           └── exporter: ExportFileType   (HTML | JSON)
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::export::ExportFileType;
use crate::feed::RecordPolicy;
use crate::map::{BaseLayer, MapSettings};
use crate::overlay::BoundaryStyle;

pub const DEFAULT_EARTHQUAKE_FEED: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
pub const DEFAULT_BOUNDARY_FEED: &str =
    "https://raw.githubusercontent.com/python-visualization/folium-example-data/main/world_countries.json";
pub const DEFAULT_OUTPUT: &str = "map.html";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Meta {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Plan {
    pub meta: Option<Meta>,
    pub feeds: Option<FeedConfig>,
    pub map: Option<MapConfig>,
    #[serde(default)]
    pub export: ExportProfile,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FeedConfig {
    pub earthquakes: Option<String>,
    pub boundaries: Option<String>,
    pub timeout_secs: Option<u64>,
    pub malformed_records: Option<RecordPolicy>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MapConfig {
    pub container: Option<String>,
    pub center: Option<[f64; 2]>,
    pub zoom: Option<f64>,
    pub earthquake_overlay: Option<String>,
    pub boundary_overlay: Option<String>,
    pub boundary_color: Option<String>,
    pub boundary_fill_color: Option<String>,
    pub min_radius: Option<f64>,
    pub base_layers: Option<Vec<BaseLayer>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ExportProfile {
    pub profiles: Vec<ExportProfileItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExportProfileItem {
    pub filename: String,
    pub exporter: ExportFileType,
}

/// Resolved feed settings
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub earthquakes: String,
    pub boundaries: String,
    pub timeout: Option<Duration>,
    pub record_policy: RecordPolicy,
}

impl Plan {
    pub fn get_name(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|meta| meta.name.as_deref())
    }

    pub fn get_feed_settings(&self) -> FeedSettings {
        let feeds = self.feeds.clone().unwrap_or_default();
        FeedSettings {
            earthquakes: feeds
                .earthquakes
                .unwrap_or_else(|| DEFAULT_EARTHQUAKE_FEED.to_string()),
            boundaries: feeds
                .boundaries
                .unwrap_or_else(|| DEFAULT_BOUNDARY_FEED.to_string()),
            timeout: feeds.timeout_secs.map(Duration::from_secs),
            record_policy: feeds.malformed_records.unwrap_or_default(),
        }
    }

    pub fn get_map_settings(&self) -> MapSettings {
        let defaults = MapSettings::default();
        let map = self.map.clone().unwrap_or_default();
        MapSettings {
            container: map.container.unwrap_or(defaults.container),
            center: map.center.unwrap_or(defaults.center),
            zoom: map.zoom.unwrap_or(defaults.zoom),
            base_layers: map.base_layers.unwrap_or(defaults.base_layers),
            earthquake_overlay_name: map
                .earthquake_overlay
                .unwrap_or(defaults.earthquake_overlay_name),
            boundary_overlay_name: map
                .boundary_overlay
                .unwrap_or(defaults.boundary_overlay_name),
            min_radius: map.min_radius.or(defaults.min_radius),
        }
    }

    pub fn get_boundary_style(&self) -> BoundaryStyle {
        let defaults = BoundaryStyle::default();
        match &self.map {
            Some(map) => BoundaryStyle {
                color: map.boundary_color.clone().unwrap_or(defaults.color),
                fill_color: map.boundary_fill_color.clone().unwrap_or(defaults.fill_color),
            },
            None => defaults,
        }
    }

    /// Export profiles; a single HTML export to `map.html` when none are listed.
    pub fn get_export_profiles(&self) -> Vec<ExportProfileItem> {
        if self.export.profiles.is_empty() {
            vec![ExportProfileItem {
                filename: DEFAULT_OUTPUT.to_string(),
                exporter: ExportFileType::HTML,
            }]
        } else {
            self.export.profiles.clone()
        }
    }

    /// The plan written by `quakemap init`, with every default spelled out.
    pub fn template() -> Self {
        let settings = MapSettings::default();
        let style = BoundaryStyle::default();
        Plan {
            meta: Some(Meta {
                name: Some("Earthquakes of the past week".to_string()),
            }),
            feeds: Some(FeedConfig {
                earthquakes: Some(DEFAULT_EARTHQUAKE_FEED.to_string()),
                boundaries: Some(DEFAULT_BOUNDARY_FEED.to_string()),
                timeout_secs: None,
                malformed_records: Some(RecordPolicy::Reject),
            }),
            map: Some(MapConfig {
                container: Some(settings.container),
                center: Some(settings.center),
                zoom: Some(settings.zoom),
                earthquake_overlay: Some(settings.earthquake_overlay_name),
                boundary_overlay: Some(settings.boundary_overlay_name),
                boundary_color: Some(style.color),
                boundary_fill_color: Some(style.fill_color),
                min_radius: None,
                base_layers: Some(settings.base_layers),
            }),
            export: ExportProfile {
                profiles: vec![
                    ExportProfileItem {
                        filename: "out/map.html".to_string(),
                        exporter: ExportFileType::HTML,
                    },
                    ExportProfileItem {
                        filename: "out/map.json".to_string(),
                        exporter: ExportFileType::JSON,
                    },
                ],
            },
        }
    }
}
