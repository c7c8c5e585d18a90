//! Specification ingestion and normalization

pub mod parser;
pub mod types;

pub use parser::{SpecParser, MAX_SCHEMA_DEPTH};
pub use types::{
    ApiSpec, Endpoint, HttpMethod, Parameter, ParameterLocation, RequestBody, Response, Schema,
    SecurityScheme, SecurityType, SpecDialect, SpecFormat,
};
