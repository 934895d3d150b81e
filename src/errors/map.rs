use thiserror::Error;

/// Map composition errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    /// At least one base layer is required
    #[error("Map needs at least one base layer")]
    NoBaseLayers,

    /// Two entries in the layer control share a name
    #[error("Layer name '{0}' is used more than once")]
    DuplicateLayerName(String),

    /// Container id must be usable as an HTML id and CSS selector
    #[error("Invalid container id '{0}'")]
    InvalidContainer(String),

    /// Center or zoom is outside what the map can display
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),
}
