//! Availability zones
//!
//! Named placement domains. Subnets and instances may be pinned to them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named failure/placement domain
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AvailabilityZone {
    /// Zone name, unique within a deployment
    pub name: String,

    /// Opaque IaaS properties, passed through untouched
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub cloud_properties: serde_json::Value,
}

impl AvailabilityZone {
    /// Create a zone without cloud properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cloud_properties: serde_json::Value::Null,
        }
    }

    /// Zone name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
