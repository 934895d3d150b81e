//! Feed error types
//!
//! Covers everything between a feed location and a validated list of records:
//! transport, HTTP status, document shape and per-record validation.

use thiserror::Error;

/// Feed fetching and parsing errors
#[derive(Error, Debug)]
pub enum FeedError {
    /// Location could not be interpreted as a URL or path
    #[error("Invalid feed location '{0}'")]
    InvalidLocation(String),

    /// Transport-level failure while talking to the feed
    #[error("Request to {url} failed: {source}")]
    Request {
        /// Feed URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Feed answered with a non-success status
    #[error("Feed {url} returned HTTP {status}")]
    HttpStatus {
        /// Feed URL
        url: String,
        /// Status code returned by the server
        status: u16,
    },

    /// Local feed file could not be read
    #[error("Failed to read feed file {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Body is not a GeoJSON feature collection
    #[error("Invalid feed document: {0}")]
    InvalidDocument(String),

    /// A single feature failed validation
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord {
        /// Position of the feature in the feed
        index: usize,
        /// What was wrong with it
        reason: String,
    },
}

impl FeedError {
    /// Check if the failure came from the network or the filesystem
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            FeedError::Request { .. } | FeedError::HttpStatus { .. } | FeedError::Io { .. }
        )
    }

    /// Check if the feed was reachable but its content was unusable
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            FeedError::InvalidDocument(_) | FeedError::MalformedRecord { .. }
        )
    }
}
