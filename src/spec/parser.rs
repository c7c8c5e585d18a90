//! Specification parsing and normalization
//!
//! Converts raw document text (JSON or YAML, OpenAPI 3.x or Swagger 2.x)
//! into one version-agnostic [`ApiSpec`]. Parsing is synchronous and
//! stateless; every call produces a fresh immutable model.

use serde_json::Value;
use tracing::debug;

use super::types::{
    ApiSpec, Endpoint, HttpMethod, Parameter, ParameterLocation, RequestBody, Response, Schema,
    SecurityScheme, SecurityType, SpecDialect, SpecFormat, JSON_CONTENT_TYPE,
};
use crate::SpecLoadError;

/// Maximum nesting depth accepted for schema trees
///
/// References are never resolved, so a well-formed document cannot recurse;
/// anything deeper than this is malformed or hostile input.
pub const MAX_SCHEMA_DEPTH: usize = 64;

pub struct SpecParser;

impl Default for SpecParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw document text into a normalized specification
    ///
    /// `origin` identifies the document (file path or URL) and is attached
    /// to every fatal error.
    pub fn parse(&self, content: &str, origin: &str) -> Result<ApiSpec, SpecLoadError> {
        let (root, format) = detect_format(content, origin)?;
        let dialect = classify_document(&root, origin)?;
        debug!(?format, ?dialect, origin, "classified specification document");

        let info = root.get("info");
        let title = info
            .and_then(|i| i.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("Untitled API")
            .to_string();
        let version = info
            .and_then(|i| i.get("version"))
            .and_then(Value::as_str)
            .unwrap_or("1.0.0")
            .to_string();

        let base_url = resolve_base_url(&root, dialect);
        let endpoints = extract_endpoints(&root, origin)?;
        let security_schemes = extract_security_schemes(&root, dialect, origin)?;

        debug!(
            origin,
            paths = endpoints.len(),
            schemes = security_schemes.len(),
            "normalized specification assembled"
        );

        Ok(ApiSpec {
            title,
            version,
            base_url,
            endpoints,
            security_schemes,
        })
    }
}

/// Classify raw text as JSON or YAML and parse it into a generic tree
///
/// JSON is attempted first with the strict parser; YAML second. Both maps
/// preserve document order.
///
/// Both parsers cap raw nesting at 128 levels, roughly twice the
/// schema-level bound, so a document that overruns them is over the nesting
/// limit rather than malformed and is reported as such.
fn detect_format(content: &str, origin: &str) -> Result<(Value, SpecFormat), SpecLoadError> {
    match serde_json::from_str::<Value>(content) {
        Ok(root) => return Ok((root, SpecFormat::Json)),
        Err(json_err) if is_recursion_limit(&json_err) => return Err(nesting_overflow(origin)),
        Err(_) => {}
    }

    match serde_yaml::from_str::<Value>(content) {
        Ok(root) => Ok((root, SpecFormat::Yaml)),
        Err(yaml_err) if is_recursion_limit(&yaml_err) => Err(nesting_overflow(origin)),
        Err(yaml_err) => Err(SpecLoadError::Format {
            origin: origin.to_string(),
            detail: yaml_err.to_string(),
        }),
    }
}

fn is_recursion_limit<E: std::fmt::Display>(err: &E) -> bool {
    err.to_string().contains("recursion limit exceeded")
}

fn nesting_overflow(origin: &str) -> SpecLoadError {
    SpecLoadError::SchemaTooDeep {
        origin: origin.to_string(),
        limit: MAX_SCHEMA_DEPTH,
    }
}

/// Identify the dialect from the document's explicit version marker
///
/// Documents carrying neither marker are rejected outright; an "unknown"
/// dialect cannot be parsed safely downstream.
fn classify_document(root: &Value, origin: &str) -> Result<SpecDialect, SpecLoadError> {
    if let Some(obj) = root.as_object() {
        if obj.contains_key("openapi") {
            return Ok(SpecDialect::OpenApiV3);
        }
        if obj.contains_key("swagger") {
            return Ok(SpecDialect::SwaggerV2);
        }
    }

    Err(SpecLoadError::UnsupportedDocument {
        origin: origin.to_string(),
    })
}

/// Derive the serving base URL from dialect-specific fields
fn resolve_base_url(root: &Value, dialect: SpecDialect) -> String {
    match dialect {
        SpecDialect::OpenApiV3 => root
            .get("servers")
            .and_then(Value::as_array)
            .and_then(|servers| servers.first())
            .and_then(|server| server.get("url"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        SpecDialect::SwaggerV2 => {
            let host = match root.get("host").and_then(Value::as_str) {
                Some(host) => host,
                None => return String::new(),
            };
            let scheme = root
                .get("schemes")
                .and_then(Value::as_array)
                .and_then(|schemes| schemes.first())
                .and_then(Value::as_str)
                .unwrap_or("https");
            let base_path = root.get("basePath").and_then(Value::as_str).unwrap_or("");
            format!("{scheme}://{host}{base_path}")
        }
    }
}

/// Walk every path entry and extract the operations under it
///
/// Only keys from the closed HTTP-method vocabulary become operations;
/// path-level shared parameters and vendor extensions are ignored. Paths
/// with no recognized operation are pruned from the result.
fn extract_endpoints(
    root: &Value,
    origin: &str,
) -> Result<indexmap::IndexMap<String, Vec<Endpoint>>, SpecLoadError> {
    let mut endpoints = indexmap::IndexMap::new();

    let paths = match root.get("paths").and_then(Value::as_object) {
        Some(paths) => paths,
        None => return Ok(endpoints),
    };

    for (path, item) in paths {
        let item_obj = match item.as_object() {
            Some(obj) => obj,
            None => continue,
        };

        let mut path_endpoints = Vec::new();
        for (key, operation) in item_obj {
            let method = match HttpMethod::from_key(key) {
                Some(method) => method,
                None => continue,
            };
            path_endpoints.push(extract_operation(path, method, operation, origin)?);
        }

        if path_endpoints.is_empty() {
            debug!(origin, path, "path entry has no recognized operations, dropping");
            continue;
        }

        endpoints.insert(path.clone(), path_endpoints);
    }

    Ok(endpoints)
}

fn extract_operation(
    path: &str,
    method: HttpMethod,
    operation: &Value,
    origin: &str,
) -> Result<Endpoint, SpecLoadError> {
    let tags = operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Endpoint {
        path: path.to_string(),
        method,
        operation_id: str_field(operation, "operationId"),
        summary: str_field(operation, "summary"),
        description: str_field(operation, "description"),
        parameters: extract_parameters(operation),
        request_body: extract_request_body(operation, origin)?,
        responses: extract_responses(operation, origin)?,
        security_requirements: extract_security_requirements(operation),
        tags,
    })
}

/// Extract the ordered parameter list of one operation
///
/// Duplicate names are preserved as distinct entries; entries without a
/// name are skipped.
fn extract_parameters(operation: &Value) -> Vec<Parameter> {
    let nodes = match operation.get("parameters").and_then(Value::as_array) {
        Some(nodes) => nodes,
        None => return Vec::new(),
    };

    let mut parameters = Vec::new();
    for node in nodes {
        let name = match node.get("name").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => continue,
        };

        let type_descriptor = node.get("schema");
        parameters.push(Parameter {
            name,
            location: ParameterLocation::from_in_value(
                node.get("in").and_then(Value::as_str),
            ),
            required: node
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            data_type: type_descriptor
                .and_then(|schema| schema.get("type"))
                .and_then(Value::as_str)
                .unwrap_or("string")
                .to_string(),
            format: type_descriptor
                .and_then(|schema| schema.get("format"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            description: str_field(node, "description"),
        });
    }

    parameters
}

/// Extract the request body when a JSON media type entry is present
///
/// A `requestBody` whose content map carries only other media types yields
/// no request body at all.
fn extract_request_body(
    operation: &Value,
    origin: &str,
) -> Result<Option<RequestBody>, SpecLoadError> {
    let body = match operation.get("requestBody") {
        Some(body) => body,
        None => return Ok(None),
    };

    let media = match body
        .get("content")
        .and_then(|content| content.get(JSON_CONTENT_TYPE))
    {
        Some(media) => media,
        None => return Ok(None),
    };

    let schema = media
        .get("schema")
        .map(|node| parse_schema(node, 0, origin))
        .transpose()?;

    Ok(Some(RequestBody {
        content_type: JSON_CONTENT_TYPE.to_string(),
        schema,
        description: str_field(body, "description"),
    }))
}

fn extract_responses(
    operation: &Value,
    origin: &str,
) -> Result<indexmap::IndexMap<String, Response>, SpecLoadError> {
    let mut responses = indexmap::IndexMap::new();

    let nodes = match operation.get("responses").and_then(Value::as_object) {
        Some(nodes) => nodes,
        None => return Ok(responses),
    };

    for (status_code, node) in nodes {
        // A response without JSON content keeps its description but no schema.
        let schema = node
            .get("content")
            .and_then(|content| content.get(JSON_CONTENT_TYPE))
            .and_then(|media| media.get("schema"))
            .map(|schema| parse_schema(schema, 0, origin))
            .transpose()?;

        responses.insert(
            status_code.clone(),
            Response {
                status_code: status_code.clone(),
                description: str_field(node, "description"),
                schema,
            },
        );
    }

    Ok(responses)
}

fn extract_security_requirements(operation: &Value) -> Vec<String> {
    let mut requirements = Vec::new();

    if let Some(entries) = operation.get("security").and_then(Value::as_array) {
        for entry in entries {
            if let Some(obj) = entry.as_object() {
                requirements.extend(obj.keys().cloned());
            }
        }
    }

    requirements
}

/// Recursively parse a schema node into an owned tree
///
/// Only directly-present scalar fields, `properties`, and `items` are
/// interpreted; composition keywords and reference pointers are left
/// uninterpreted rather than rejected. Recursion is bounded so pathological
/// nesting fails the load instead of the stack.
fn parse_schema(node: &Value, depth: usize, origin: &str) -> Result<Schema, SpecLoadError> {
    if depth >= MAX_SCHEMA_DEPTH {
        return Err(SpecLoadError::SchemaTooDeep {
            origin: origin.to_string(),
            limit: MAX_SCHEMA_DEPTH,
        });
    }

    let required_names: Vec<&str> = node
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut properties = indexmap::IndexMap::new();
    if let Some(nodes) = node.get("properties").and_then(Value::as_object) {
        for (name, child) in nodes {
            let mut child_schema = parse_schema(child, depth + 1, origin)?;
            child_schema.required = required_names.contains(&name.as_str());
            properties.insert(name.clone(), child_schema);
        }
    }

    let items = node
        .get("items")
        .map(|child| parse_schema(child, depth + 1, origin))
        .transpose()?
        .map(Box::new);

    Ok(Schema {
        schema_type: str_field(node, "type"),
        properties,
        items,
        format: str_field(node, "format"),
        description: str_field(node, "description"),
        required: false,
    })
}

/// Extract the reusable security scheme declarations
///
/// A `type` value outside the closed vocabulary aborts the entire load; no
/// partial model is ever returned.
fn extract_security_schemes(
    root: &Value,
    dialect: SpecDialect,
    origin: &str,
) -> Result<Vec<SecurityScheme>, SpecLoadError> {
    let declarations = match dialect {
        SpecDialect::OpenApiV3 => root
            .get("components")
            .and_then(|components| components.get("securitySchemes")),
        SpecDialect::SwaggerV2 => root.get("securityDefinitions"),
    };

    let declarations = match declarations.and_then(Value::as_object) {
        Some(declarations) => declarations,
        None => return Ok(Vec::new()),
    };

    let mut schemes = Vec::new();
    for (name, node) in declarations {
        let type_value = node.get("type").and_then(Value::as_str).unwrap_or("");
        let scheme_type = SecurityType::from_type_value(type_value).ok_or_else(|| {
            SpecLoadError::UnknownSecurityType {
                origin: origin.to_string(),
                value: type_value.to_string(),
            }
        })?;

        schemes.push(SecurityScheme {
            name: name.clone(),
            scheme_type,
            location: str_field(node, "in"),
            scheme: str_field(node, "scheme"),
        });
    }

    Ok(schemes)
}

fn str_field(node: &Value, key: &str) -> String {
    node.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
