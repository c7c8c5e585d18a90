//! Normalized, version-agnostic API specification model

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The single media type supported for request and response bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialization syntax a document was written in
///
/// Informational only; both syntaxes produce the same generic tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecFormat {
    Json,
    Yaml,
}

/// Specification dialect identified by the document's version marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecDialect {
    /// OpenAPI 3.x (`openapi` marker)
    OpenApiV3,
    /// Swagger 2.x (`swagger` marker)
    SwaggerV2,
}

/// HTTP methods recognized as operations under a path entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Parse a path-item key into a method, case-insensitively
    ///
    /// Non-method keys (`parameters`, `summary`, vendor extensions) yield
    /// `None` and are skipped by the operation extractor.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    #[default]
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    /// Parse an `in` value; unrecognized or absent values default to `query`
    pub fn from_in_value(value: Option<&str>) -> Self {
        match value {
            Some("query") => Self::Query,
            Some("header") => Self::Header,
            Some("path") => Self::Path,
            Some("cookie") => Self::Cookie,
            _ => Self::Query,
        }
    }
}

/// Closed vocabulary of reusable security scheme types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
}

impl SecurityType {
    /// Map a declared `type` value onto the closed vocabulary
    ///
    /// The Swagger 2 `basic` value normalizes to `Http`; anything else
    /// outside the vocabulary yields `None`, which the extractor treats as
    /// fatal for the whole load.
    pub fn from_type_value(value: &str) -> Option<Self> {
        match value {
            "apiKey" => Some(Self::ApiKey),
            "http" | "basic" => Some(Self::Http),
            "oauth2" => Some(Self::OAuth2),
            "openIdConnect" => Some(Self::OpenIdConnect),
            _ => None,
        }
    }
}

/// The normalized specification produced by one load call
///
/// Immutable once assembled; handed by reference to report and scan
/// collaborators and discarded afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSpec {
    /// API title (`info.title`, defaults to "Untitled API")
    pub title: String,

    /// API version (`info.version`, defaults to "1.0.0")
    pub version: String,

    /// Resolved base URL, empty when the document declares none
    pub base_url: String,

    /// Path entries in document order; never contains an empty operation list
    pub endpoints: IndexMap<String, Vec<Endpoint>>,

    /// Reusable security scheme declarations
    pub security_schemes: Vec<SecurityScheme>,
}

impl ApiSpec {
    /// Total number of operations across all path entries
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.values().map(Vec::len).sum()
    }
}

/// One HTTP method bound to one path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: String,
    pub summary: String,
    pub description: String,

    /// Parameters in declaration order; duplicate names are kept distinct
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,

    /// Responses keyed by status-code string, in document order
    pub responses: IndexMap<String, Response>,

    /// Names of security schemes the operation requires
    pub security_requirements: Vec<String>,
    pub tags: Vec<String>,
}

/// A single operation parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub data_type: String,
    pub format: String,
    pub description: String,
}

/// Request body restricted to the single supported media type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    pub content_type: String,
    pub schema: Option<Schema>,
    pub description: String,
}

/// One response entry for a status code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status_code: String,
    pub description: String,
    pub schema: Option<Schema>,
}

/// Recursive payload type descriptor
///
/// Always a tree of owned nodes; reference pointers are never followed, so
/// cycles cannot occur in a parsed schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: String,

    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub properties: IndexMap<String, Schema>,

    /// Element schema for array types
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Box<Schema>>,

    pub format: String,
    pub description: String,

    /// Whether the enclosing object lists this property as required
    #[serde(default)]
    pub required: bool,
}

/// A reusable named authentication mechanism declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScheme {
    pub name: String,
    #[serde(rename = "type")]
    pub scheme_type: SecurityType,

    /// Where the credential is carried (`header`, `query`, `cookie`)
    pub location: String,

    /// HTTP auth scheme (`bearer`, `basic`, ...)
    pub scheme: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_keys_are_case_insensitive() {
        assert_eq!(HttpMethod::from_key("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_key("trace"), Some(HttpMethod::Trace));
        assert_eq!(HttpMethod::from_key("parameters"), None);
        assert_eq!(HttpMethod::from_key("x-internal"), None);
    }

    #[test]
    fn test_parameter_location_defaults_to_query() {
        assert_eq!(
            ParameterLocation::from_in_value(None),
            ParameterLocation::Query
        );
        assert_eq!(
            ParameterLocation::from_in_value(Some("body")),
            ParameterLocation::Query
        );
        assert_eq!(
            ParameterLocation::from_in_value(Some("cookie")),
            ParameterLocation::Cookie
        );
    }

    #[test]
    fn test_security_type_vocabulary() {
        assert_eq!(
            SecurityType::from_type_value("oauth2"),
            Some(SecurityType::OAuth2)
        );
        assert_eq!(
            SecurityType::from_type_value("basic"),
            Some(SecurityType::Http)
        );
        assert_eq!(SecurityType::from_type_value("bogus"), None);
    }
}
