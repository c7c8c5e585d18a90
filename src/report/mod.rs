//! Report generation from a normalized specification

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::spec::{ApiSpec, Parameter, Schema};

/// A collaborator that renders a normalized specification to disk
pub trait ReportGenerator {
    /// Write the report into `output_dir` and return the file written
    fn generate(&self, spec: &ApiSpec, output_dir: &Path) -> Result<PathBuf>;
}

/// Renders the API schema report as pretty-printed JSON
pub struct JsonReportGenerator;

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JsonReportGenerator {
    fn generate(&self, spec: &ApiSpec, output_dir: &Path) -> Result<PathBuf> {
        let report = SchemaReport::from_spec(spec);
        let content = serde_json::to_string_pretty(&report)?;

        let report_file = output_dir.join("api-schema-report.json");
        std::fs::write(&report_file, content)
            .with_context(|| format!("failed to write report to {}", report_file.display()))?;

        info!(path = %report_file.display(), "JSON schema report generated");
        Ok(report_file)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaReport<'a> {
    api_title: &'a str,
    api_version: &'a str,
    base_url: &'a str,
    endpoints: Vec<EndpointReport<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndpointReport<'a> {
    path: &'a str,
    method: &'a str,
    operation_id: &'a str,
    summary: &'a str,
    description: &'a str,
    /// Request body schema, null when the operation takes no JSON body
    input_schema: Option<&'a Schema>,
    /// One entry per declared status code
    output_schemas: Vec<OutputSchemaReport<'a>>,
    parameters: &'a [Parameter],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputSchemaReport<'a> {
    status_code: &'a str,
    description: &'a str,
    schema: Option<&'a Schema>,
}

impl<'a> SchemaReport<'a> {
    fn from_spec(spec: &'a ApiSpec) -> Self {
        let mut endpoints = Vec::with_capacity(spec.endpoint_count());

        for (path, operations) in &spec.endpoints {
            for endpoint in operations {
                let output_schemas = endpoint
                    .responses
                    .values()
                    .map(|response| OutputSchemaReport {
                        status_code: &response.status_code,
                        description: &response.description,
                        schema: response.schema.as_ref(),
                    })
                    .collect();

                endpoints.push(EndpointReport {
                    path,
                    method: endpoint.method.as_str(),
                    operation_id: &endpoint.operation_id,
                    summary: &endpoint.summary,
                    description: &endpoint.description,
                    input_schema: endpoint
                        .request_body
                        .as_ref()
                        .and_then(|body| body.schema.as_ref()),
                    output_schemas,
                    parameters: &endpoint.parameters,
                });
            }
        }

        Self {
            api_title: &spec.title,
            api_version: &spec.version,
            base_url: &spec.base_url,
            endpoints,
        }
    }
}
