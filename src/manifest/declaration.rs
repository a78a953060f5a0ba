//! Routing declarations parsed from source resource annotations.
//!
//! # Annotation Format
//! ```text
//! name: production
//! host: this.example.com
//! path: /*
//! service: web
//! port: 80
//! ```
//!
//! # Design Decisions
//! - All five fields are required; unknown keys are ignored
//! - Values are kept verbatim; an empty `host` renders a catch-all rule
//! - `port` must fit a TCP port (0-65535)
//! - An empty annotation value is treated the same as no annotation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::SourceResource;

/// One routing entry declared by one source resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RoutingDeclaration {
    /// Route group; becomes the name of the rendered resource.
    #[serde(rename = "name")]
    pub group_name: String,

    /// Host the rule matches.
    pub host: String,

    /// Path the rule matches.
    pub path: String,

    /// Backend service name.
    pub service: String,

    /// Backend service port.
    pub port: u16,
}

/// Errors produced while parsing an annotation payload.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Payload is not valid YAML, or a field is missing or mistyped.
    #[error("malformed routing annotation: {0}")]
    Malformed(#[from] serde_yaml::Error),
}

/// Parse one annotation payload into a declaration.
pub fn parse(raw: &str) -> Result<RoutingDeclaration, ParseError> {
    Ok(serde_yaml::from_str(raw)?)
}

/// Returns the raw annotation payload of a source, if it carries a non-empty one.
pub fn annotation<'a>(source: &'a SourceResource, key: &str) -> Option<&'a str> {
    source
        .annotations
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
