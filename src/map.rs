//! Map composition: base layers, overlays, layer control and legend.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{MapError, MapResult};
use crate::overlay::{
    BoundaryOverlay, EarthquakeOverlay, DEFAULT_BOUNDARY_OVERLAY, DEFAULT_EARTHQUAKE_OVERLAY,
};
use crate::style::{legend_entries, LegendEntry};

pub const DEFAULT_CONTAINER: &str = "map";
pub const DEFAULT_CENTER: [f64; 2] = [25.0, 0.0];
pub const DEFAULT_ZOOM: f64 = 2.3;
const MAX_ZOOM: f64 = 24.0;

/// A tile provider offered in the layer control.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BaseLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
}

impl BaseLayer {
    pub fn new(name: &str, url: &str, attribution: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            attribution: attribution.to_string(),
        }
    }
}

/// Street, topographic and satellite tiles, in that order.
pub fn default_base_layers() -> Vec<BaseLayer> {
    vec![
        BaseLayer::new(
            "Street Map",
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
        ),
        BaseLayer::new(
            "Topographic Map",
            "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            "Map data: &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, \
             <a href=\"http://viewfinderpanoramas.org\">SRTM</a> | Map style: &copy; \
             <a href=\"https://opentopomap.org\">OpenTopoMap</a> \
             (<a href=\"https://creativecommons.org/licenses/by-sa/3.0/\">CC-BY-SA</a>)",
        ),
        BaseLayer::new(
            "Satellite Image",
            "http://services.arcgisonline.com/arcgis/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            "Source: Esri, Maxar, Earthstar Geographics, and the GIS User Community",
        ),
    ]
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub container: String,
    /// `[latitude, longitude]`
    pub center: [f64; 2],
    pub zoom: f64,
    pub base_layers: Vec<BaseLayer>,
    pub earthquake_overlay_name: String,
    pub boundary_overlay_name: String,
    /// Display floor for marker radii; `None` draws radii as computed
    pub min_radius: Option<f64>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            base_layers: default_base_layers(),
            earthquake_overlay_name: DEFAULT_EARTHQUAKE_OVERLAY.to_string(),
            boundary_overlay_name: DEFAULT_BOUNDARY_OVERLAY.to_string(),
            min_radius: None,
        }
    }
}

impl MapSettings {
    /// Checks the settings against the overlay names they configure, before
    /// any overlay is handed to [`compose_map`].
    pub fn validate(&self) -> MapResult<()> {
        validate_layers(
            self,
            &self.earthquake_overlay_name,
            &self.boundary_overlay_name,
        )?;
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LayerControl {
    pub base_layers: Vec<String>,
    pub active_base_layer: String,
    pub overlays: Vec<String>,
    pub collapsed: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub position: String,
    pub entries: Vec<LegendEntry>,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            title: "Depth".to_string(),
            position: "bottomright".to_string(),
            entries: legend_entries(),
        }
    }
}

/// Everything needed to render the final map.
#[derive(Serialize, Debug, Clone)]
pub struct MapComposition {
    pub settings: MapSettings,
    pub control: LayerControl,
    pub legend: Legend,
    pub earthquakes: EarthquakeOverlay,
    pub boundaries: BoundaryOverlay,
}

fn validate_container(container: &str) -> MapResult<()> {
    let valid = container
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic())
        && container
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(MapError::InvalidContainer(container.to_string()))
    }
}

fn validate_viewport(settings: &MapSettings) -> MapResult<()> {
    let [lat, lng] = settings.center;
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(MapError::InvalidViewport(format!(
            "latitude {} is outside -90..90",
            lat
        )));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(MapError::InvalidViewport(format!(
            "longitude {} is outside -180..180",
            lng
        )));
    }
    if !settings.zoom.is_finite() || !(0.0..=MAX_ZOOM).contains(&settings.zoom) {
        return Err(MapError::InvalidViewport(format!(
            "zoom {} is outside 0..{}",
            settings.zoom, MAX_ZOOM
        )));
    }
    Ok(())
}

/// Returns the active base layer once the layer list, container, viewport and
/// layer names all check out.
fn validate_layers<'a>(
    settings: &'a MapSettings,
    earthquake_name: &str,
    boundary_name: &str,
) -> MapResult<&'a BaseLayer> {
    let active = settings.base_layers.first().ok_or(MapError::NoBaseLayers)?;
    validate_container(&settings.container)?;
    validate_viewport(settings)?;

    let mut names = IndexSet::new();
    let all_names = settings
        .base_layers
        .iter()
        .map(|layer| layer.name.as_str())
        .chain([earthquake_name, boundary_name]);
    for name in all_names {
        if !names.insert(name) {
            return Err(MapError::DuplicateLayerName(name.to_string()));
        }
    }
    Ok(active)
}

/// Assembles the map. The first base layer starts active and both overlays
/// start visible.
pub fn compose_map(
    earthquakes: EarthquakeOverlay,
    boundaries: BoundaryOverlay,
    settings: &MapSettings,
) -> MapResult<MapComposition> {
    let active = validate_layers(settings, &earthquakes.name, &boundaries.name)?;

    let control = LayerControl {
        base_layers: settings.base_layers.iter().map(|l| l.name.clone()).collect(),
        active_base_layer: active.name.clone(),
        overlays: vec![earthquakes.name.clone(), boundaries.name.clone()],
        collapsed: false,
    };

    info!(
        "Composed map with {} base layers, {} markers and {} boundary features",
        control.base_layers.len(),
        earthquakes.len(),
        boundaries.len()
    );

    Ok(MapComposition {
        settings: settings.clone(),
        control,
        legend: Legend::default(),
        earthquakes,
        boundaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::NoopInteraction;
    use crate::overlay::{build_boundary_overlay, build_earthquake_overlay, BoundaryStyle};
    use crate::style::{color_for_depth, DEPTH_BUCKETS};
    use std::sync::Arc;

    fn overlays() -> (EarthquakeOverlay, BoundaryOverlay) {
        let handler = Arc::new(NoopInteraction);
        (
            build_earthquake_overlay(DEFAULT_EARTHQUAKE_OVERLAY, &[], handler.clone()),
            build_boundary_overlay(
                DEFAULT_BOUNDARY_OVERLAY,
                vec![],
                BoundaryStyle::default(),
                handler,
            ),
        )
    }

    #[test]
    fn test_compose_defaults() {
        let (quakes, plates) = overlays();
        let map = compose_map(quakes, plates, &MapSettings::default()).unwrap();

        assert_eq!(
            map.control.base_layers,
            vec!["Street Map", "Topographic Map", "Satellite Image"]
        );
        assert_eq!(map.control.active_base_layer, "Street Map");
        assert_eq!(map.control.overlays, vec!["Earthquakes", "Tectonic Plates"]);
        assert!(!map.control.collapsed);
        assert_eq!(map.settings.center, [25.0, 0.0]);
        assert_eq!(map.settings.zoom, 2.3);
        assert_eq!(map.settings.container, "map");
        assert!(map
            .settings
            .base_layers
            .iter()
            .all(|layer| !layer.attribution.is_empty()));
    }

    #[test]
    fn test_legend_mirrors_bucket_table() {
        let (quakes, plates) = overlays();
        let map = compose_map(quakes, plates, &MapSettings::default()).unwrap();

        assert_eq!(map.legend.title, "Depth");
        assert_eq!(map.legend.position, "bottomright");
        assert_eq!(map.legend.entries.len(), DEPTH_BUCKETS.len());
        let colors: Vec<&str> = map.legend.entries.iter().map(|e| e.color.as_str()).collect();
        assert_eq!(
            colors,
            vec!["#F7FF00", "#FFCE03", "#FDA500", "#FF6204", "#B01E03", "#690202"]
        );
        assert_eq!(colors[4], color_for_depth(90.0));
        assert_eq!(colors[5], color_for_depth(90.5));
    }

    #[test]
    fn test_no_base_layers() {
        let (quakes, plates) = overlays();
        let settings = MapSettings {
            base_layers: vec![],
            ..MapSettings::default()
        };
        assert_eq!(
            compose_map(quakes, plates, &settings).unwrap_err(),
            MapError::NoBaseLayers
        );
    }

    #[test]
    fn test_duplicate_layer_names() {
        let (quakes, plates) = overlays();
        let settings = MapSettings {
            boundary_overlay_name: "Street Map".to_string(),
            ..MapSettings::default()
        };
        let plates = build_boundary_overlay(
            &settings.boundary_overlay_name,
            plates.features.clone(),
            BoundaryStyle::default(),
            Arc::new(NoopInteraction),
        );
        assert_eq!(
            compose_map(quakes, plates, &settings).unwrap_err(),
            MapError::DuplicateLayerName("Street Map".to_string())
        );
    }

    #[test]
    fn test_invalid_container() {
        for container in ["", "1map", "map view", "map\"><script>"] {
            let (quakes, plates) = overlays();
            let settings = MapSettings {
                container: container.to_string(),
                ..MapSettings::default()
            };
            assert_eq!(
                compose_map(quakes, plates, &settings).unwrap_err(),
                MapError::InvalidContainer(container.to_string())
            );
        }
    }

    #[test]
    fn test_invalid_viewport() {
        for (center, zoom) in [([95.0, 0.0], 2.0), ([0.0, 200.0], 2.0), ([0.0, 0.0], f64::NAN)] {
            let (quakes, plates) = overlays();
            let settings = MapSettings {
                center,
                zoom,
                ..MapSettings::default()
            };
            assert!(matches!(
                compose_map(quakes, plates, &settings),
                Err(MapError::InvalidViewport(_))
            ));
        }
    }

    #[test]
    fn test_settings_validate_without_overlays() {
        assert_eq!(MapSettings::default().validate(), Ok(()));

        let clash = MapSettings {
            earthquake_overlay_name: "Satellite Image".to_string(),
            ..MapSettings::default()
        };
        assert_eq!(
            clash.validate(),
            Err(MapError::DuplicateLayerName("Satellite Image".to_string()))
        );

        let same_overlays = MapSettings {
            boundary_overlay_name: DEFAULT_EARTHQUAKE_OVERLAY.to_string(),
            ..MapSettings::default()
        };
        assert_eq!(
            same_overlays.validate(),
            Err(MapError::DuplicateLayerName(DEFAULT_EARTHQUAKE_OVERLAY.to_string()))
        );

        let empty = MapSettings {
            base_layers: vec![],
            ..MapSettings::default()
        };
        assert_eq!(empty.validate(), Err(MapError::NoBaseLayers));
    }
}
