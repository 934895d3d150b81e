use serde::Serialize;
use serde_json::json;

use crate::common::script_json;
use crate::errors::ExportResult;
use crate::map::MapComposition;
use crate::overlay::CircleMarker;
use crate::style::MarkerStyle;

const DEFAULT_TITLE: &str = "Earthquakes and Tectonic Plates";

#[derive(Serialize)]
struct HtmlMarker<'a> {
    lat: f64,
    lng: f64,
    style: MarkerStyle,
    popup: &'a str,
}

impl<'a> HtmlMarker<'a> {
    fn new(marker: &'a CircleMarker, min_radius: Option<f64>) -> Self {
        let mut style = marker.style.clone();
        if let Some(floor) = min_radius {
            style.radius = style.radius.max(floor);
        }
        Self {
            lat: marker.latitude,
            lng: marker.longitude,
            style,
            popup: &marker.popup,
        }
    }
}

pub fn render(composition: &MapComposition, title: Option<&str>) -> ExportResult<String> {
    let settings = &composition.settings;
    let markers: Vec<HtmlMarker> = composition
        .earthquakes
        .markers
        .iter()
        .map(|marker| HtmlMarker::new(marker, settings.min_radius))
        .collect();

    let handlebars = crate::common::get_handlebars();
    let res = handlebars.render_template(
        &get_template(),
        &json!({
            "title": title.unwrap_or(DEFAULT_TITLE),
            "container": settings.container,
            "center": script_json(&settings.center)?,
            "zoom": settings.zoom,
            "base_layers": script_json(&settings.base_layers)?,
            "active_base_layer": composition.control.active_base_layer,
            "earthquake_name": composition.earthquakes.name,
            "boundary_name": composition.boundaries.name,
            "markers": script_json(&markers)?,
            "boundaries": script_json(&composition.boundaries.to_feature_collection())?,
            "boundary_style": script_json(&composition.boundaries.style)?,
            "legend": script_json(&composition.legend)?,
            "collapsed": composition.control.collapsed,
            "click_script": composition.earthquakes.handler().client_script(),
        }),
    )?;
    Ok(res)
}

pub fn get_template() -> String {
    include_str!("to_html.hbs").to_string()
}
