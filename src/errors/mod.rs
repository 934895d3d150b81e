//! Domain-specific error types for quakemap
//!
//! Each stage of the map pipeline reports failures through its own error enum,
//! so callers can tell a network problem apart from a malformed record or a
//! bad map configuration.
//!
//! # Error Categories
//!
//! - **FeedError**: fetching and parsing the earthquake and boundary feeds
//! - **MapError**: assembling base layers, overlays and the viewport
//! - **ExportError**: rendering a composed map to HTML or JSON
//! - **PipelineError**: a feed or map failure tagged with the stage that halted
//!
//! # Examples
//!
//! ```rust
//! use quakemap::errors::FeedError;
//!
//! let err = FeedError::MalformedRecord {
//!     index: 3,
//!     reason: "missing properties.mag".to_string(),
//! };
//! assert!(err.is_data_error());
//! ```

pub mod export;
pub mod feed;
pub mod map;
pub mod pipeline;

pub use export::ExportError;
pub use feed::FeedError;
pub use map::MapError;
pub use pipeline::{PipelineError, StageFailure};

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Result type alias for map composition
pub type MapResult<T> = Result<T, MapError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_result_alias() {
        let result: FeedResult<()> = Err(FeedError::InvalidDocument("empty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_map_result_alias() {
        let result: MapResult<()> = Err(MapError::NoBaseLayers);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_result_alias() {
        let result: ExportResult<String> = Err(ExportError::Template("boom".to_string()));
        assert!(result.is_err());
    }
}
