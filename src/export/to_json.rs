use serde_json::json;

use crate::errors::ExportResult;
use crate::map::MapComposition;

/// Pretty JSON of the composed map: settings, control, legend and both overlays.
pub fn render(composition: &MapComposition, title: Option<&str>) -> ExportResult<String> {
    let document = json!({
        "title": title,
        "settings": composition.settings,
        "control": composition.control,
        "legend": composition.legend,
        "earthquakes": composition.earthquakes,
        "boundaries": composition.boundaries,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}
