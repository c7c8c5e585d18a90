//! Retrieval collaborators that buffer raw specification text
//!
//! The parsing core only consumes already-fetched text; all blocking I/O
//! lives behind the [`SpecSource`] trait and completes before parsing.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::SpecLoadError;

/// A source of raw specification text
#[async_trait]
pub trait SpecSource: Send + Sync {
    /// Identifier attached to errors and log lines (file path or URL)
    fn origin(&self) -> String;

    /// Retrieve the full document text
    async fn retrieve(&self) -> Result<String, SpecLoadError>;
}

/// Local specification file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SpecSource for FileSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    async fn retrieve(&self) -> Result<String, SpecLoadError> {
        debug!(path = %self.path.display(), "reading specification file");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| SpecLoadError::Io {
                origin: self.origin(),
                source: err,
            })
    }
}

/// Remote specification fetched over HTTP(S)
pub struct UrlSource {
    url: String,
    client: reqwest::Client,
}

impl UrlSource {
    /// Create a source for a target URL; bare URLs get an assumed `https://`
    pub fn new(target: &str) -> Self {
        Self {
            url: normalize_target_url(target),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SpecSource for UrlSource {
    fn origin(&self) -> String {
        self.url.clone()
    }

    async fn retrieve(&self) -> Result<String, SpecLoadError> {
        debug!(url = %self.url, "fetching specification over HTTP");

        let wrap = |err: reqwest::Error| SpecLoadError::Http {
            origin: self.url.clone(),
            source: err,
        };

        self.client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(wrap)?
            .text()
            .await
            .map_err(wrap)
    }
}

/// Prefix a scheme-less target URL with `https://`
pub fn normalize_target_url(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{target}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_target_url() {
        assert_eq!(
            normalize_target_url("api.example.com"),
            "https://api.example.com"
        );
        assert_eq!(
            normalize_target_url("http://api.example.com"),
            "http://api.example.com"
        );
        assert_eq!(
            normalize_target_url("https://api.example.com/spec"),
            "https://api.example.com/spec"
        );
    }

    #[tokio::test]
    async fn test_file_source_reads_content() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "openapi: 3.0.0").unwrap();

        let source = FileSource::new(file.path());
        let content = source.retrieve().await.unwrap();
        assert_eq!(content, "openapi: 3.0.0");
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_io_error() {
        let source = FileSource::new("/definitely/not/here.yaml");
        let err = source.retrieve().await.unwrap_err();
        assert!(matches!(err, SpecLoadError::Io { ref origin, .. }
            if origin == "/definitely/not/here.yaml"));
    }
}
