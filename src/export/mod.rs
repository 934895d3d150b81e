pub mod to_html;
pub mod to_json;

use serde::{Deserialize, Serialize};

use crate::errors::ExportResult;
use crate::map::MapComposition;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFileType {
    HTML,
    JSON,
}

/// Renders a composed map with the chosen exporter.
pub fn render(
    exporter: ExportFileType,
    composition: &MapComposition,
    title: Option<&str>,
) -> ExportResult<String> {
    match exporter {
        ExportFileType::HTML => to_html::render(composition, title),
        ExportFileType::JSON => to_json::render(composition, title),
    }
}
