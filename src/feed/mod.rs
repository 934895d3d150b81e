//! Feed sources and GeoJSON ingestion.
//!
//! A [`FeedSource`] only produces the raw body; parsing and validation live in
//! [`records`] so both the HTTP and file sources share the same rules.

pub mod records;

pub use records::{
    parse_boundary_collection, parse_event_collection, BoundaryFeature, EventRecord,
    RecordPolicy,
};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::errors::{FeedError, FeedResult};

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable location for logs and errors
    fn location(&self) -> String;

    async fn fetch(&self) -> FeedResult<String>;
}

/// Fetches a feed over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(url: Url, timeout: Option<Duration>) -> FeedResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| FeedError::Request {
            url: url.to_string(),
            source,
        })?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    fn location(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> FeedResult<String> {
        info!("Fetching {}", self.url);
        let url = self.url.to_string();
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| FeedError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FeedError::Request { url, source })?;
        debug!("Received {} bytes from {}", body.len(), self.url);
        Ok(body)
    }
}

/// Reads a feed from a local file.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> FeedResult<String> {
        info!("Reading {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }
}

/// Picks a source for a configured location. `http(s)://` goes over the
/// network; `file://` URLs and plain paths are read from disk, with relative
/// paths resolved against `base_dir`.
pub fn source_for(
    location: &str,
    base_dir: &Path,
    timeout: Option<Duration>,
) -> FeedResult<Box<dyn FeedSource>> {
    let location = location.trim();
    if location.is_empty() {
        return Err(FeedError::InvalidLocation(location.to_string()));
    }

    match Url::parse(location) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Ok(Box::new(HttpFeedSource::new(url, timeout)?))
        }
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| FeedError::InvalidLocation(location.to_string()))?;
            Ok(Box::new(FileFeedSource::new(path)))
        }
        // Single-letter schemes are Windows drive letters
        Ok(url) if url.scheme().len() > 1 => {
            Err(FeedError::InvalidLocation(location.to_string()))
        }
        _ => {
            let path = Path::new(location);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            };
            Ok(Box::new(FileFeedSource::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers a single request with `response`, or never answers when it is `None`.
    async fn serve_once(response: Option<String>) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            match response {
                Some(response) => {
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.unwrap();
                }
                None => tokio::time::sleep(Duration::from_secs(10)).await,
            }
        });
        Url::parse(&format!("http://{}/feed.geojson", addr)).unwrap()
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[test]
    fn test_source_for_http() {
        let source = source_for(
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson",
            Path::new("."),
            None,
        )
        .unwrap();
        assert!(source.location().starts_with("https://earthquake.usgs.gov/"));
    }

    #[test]
    fn test_source_for_relative_path() {
        let source = source_for("data/quakes.geojson", Path::new("/srv/plans"), None).unwrap();
        assert_eq!(source.location(), "/srv/plans/data/quakes.geojson");
    }

    #[test]
    fn test_source_for_rejects_unknown_scheme() {
        match source_for("ftp://example.org/feed.json", Path::new("."), None) {
            Err(err) => assert!(matches!(err, FeedError::InvalidLocation(_))),
            Ok(source) => panic!("ftp location gave a source for {}", source.location()),
        }
        assert!(source_for("   ", Path::new("."), None).is_err());
    }

    #[tokio::test]
    async fn test_file_source_reads_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.geojson");
        std::fs::write(&path, r#"{"features": []}"#).unwrap();

        let body = FileFeedSource::new(&path).fetch().await.unwrap();
        assert_eq!(body, r#"{"features": []}"#);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let err = FileFeedSource::new("/definitely/not/here.geojson")
            .fetch()
            .await
            .unwrap_err();
        assert!(err.is_transport_error());
    }

    #[tokio::test]
    async fn test_http_source_returns_body() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        let url = serve_once(Some(http_response("200 OK", body))).await;

        let source = HttpFeedSource::new(url, None).unwrap();
        assert_eq!(source.fetch().await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_http_source_maps_error_status() {
        let url = serve_once(Some(http_response("503 Service Unavailable", "busy"))).await;
        let expected = url.to_string();

        let err = HttpFeedSource::new(url, None).unwrap().fetch().await.unwrap_err();
        match err {
            FeedError::HttpStatus { url, status } => {
                assert_eq!(status, 503);
                assert_eq!(url, expected);
            }
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_times_out() {
        let url = serve_once(None).await;

        let source = HttpFeedSource::new(url, Some(Duration::from_millis(200))).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Request { .. }));
        assert!(err.is_transport_error());
    }
}
