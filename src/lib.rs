//! ApiScan library
//!
//! Loads a heterogeneous API description document (OpenAPI 3.x or Swagger
//! 2.x, JSON or YAML) from a file or URL and normalizes it into one
//! version-agnostic [`ApiSpec`] for report generation and future security
//! scanning.

pub mod cli;
pub mod fetch;
pub mod report;
pub mod spec;
pub mod utils;

pub use fetch::{FileSource, SpecSource, UrlSource};
pub use report::{JsonReportGenerator, ReportGenerator};
pub use spec::{
    ApiSpec, Endpoint, HttpMethod, Parameter, ParameterLocation, RequestBody, Response, Schema,
    SecurityScheme, SecurityType, SpecParser,
};

use tracing::info;

/// Main application context that coordinates retrieval and parsing
pub struct ApiScanner {
    parser: SpecParser,
}

impl Default for ApiScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiScanner {
    pub fn new() -> Self {
        Self {
            parser: SpecParser::new(),
        }
    }

    /// Load and normalize a specification from any source
    pub async fn load(&self, source: &dyn SpecSource) -> Result<ApiSpec, SpecLoadError> {
        let origin = source.origin();
        info!(origin, "loading API specification");

        let content = source.retrieve().await?;
        let spec = self.parser.parse(&content, &origin)?;

        info!(
            origin,
            title = %spec.title,
            endpoints = spec.endpoint_count(),
            "API specification loaded"
        );
        Ok(spec)
    }

    /// Load a specification from a local file
    pub async fn load_file(
        &self,
        path: impl Into<std::path::PathBuf>,
    ) -> Result<ApiSpec, SpecLoadError> {
        self.load(&FileSource::new(path)).await
    }

    /// Load a specification from a target URL
    ///
    /// A bare URL with no scheme is assumed to be `https://`.
    pub async fn load_url(&self, target: &str) -> Result<ApiSpec, SpecLoadError> {
        self.load(&UrlSource::new(target)).await
    }
}

/// Fatal conditions raised while loading a specification
///
/// Every variant names the offending source (file path or URL). Missing
/// optional fields are defaulted by the parser and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum SpecLoadError {
    #[error("{origin}: document is neither valid JSON nor valid YAML: {detail}")]
    Format { origin: String, detail: String },

    #[error("{origin}: no OpenAPI or Swagger version marker found")]
    UnsupportedDocument { origin: String },

    #[error("{origin}: unknown security scheme type `{value}`")]
    UnknownSecurityType { origin: String, value: String },

    #[error("{origin}: schema nesting exceeds {limit} levels")]
    SchemaTooDeep { origin: String, limit: usize },

    #[error("failed to read {origin}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {origin}")]
    Http {
        origin: String,
        #[source]
        source: reqwest::Error,
    },
}

impl SpecLoadError {
    /// The source identifier (file path or URL) the failure refers to
    pub fn origin(&self) -> &str {
        match self {
            Self::Format { origin, .. }
            | Self::UnsupportedDocument { origin }
            | Self::UnknownSecurityType { origin, .. }
            | Self::SchemaTooDeep { origin, .. }
            | Self::Io { origin, .. }
            | Self::Http { origin, .. } => origin,
        }
    }
}
