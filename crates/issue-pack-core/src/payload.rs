//! Typed payload shapes for the primary issue types.
//!
//! The package stores payloads as opaque JSON; these structs are projections
//! used for rendering.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRequestPayload {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_behavior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursortoolset_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugReportPayload {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps_to_reproduce: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_behavior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_behavior: Option<String>,
    #[serde(default)]
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRegisterPayload {
    pub repository: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSyncPayload {
    pub repository: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<String>,
}

/// A package payload projected onto the shape its type implies.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedPayload {
    FeatureRequest(FeatureRequestPayload),
    BugReport(BugReportPayload),
    PackRegister(PackRegisterPayload),
    PackSync(PackSyncPayload),
    /// `question` and `custom` carry free-form payloads.
    Opaque(serde_json::Value),
}

impl TypedPayload {
    /// Headline fields for text rendering, as (label, value) pairs.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        match self {
            TypedPayload::FeatureRequest(p) => {
                let mut rows = vec![("Title", p.title.clone()), ("Description", p.description.clone())];
                if let Some(use_case) = &p.use_case {
                    rows.push(("Use case", use_case.clone()));
                }
                if let Some(expected) = &p.expected_behavior {
                    rows.push(("Expected", expected.clone()));
                }
                rows
            }
            TypedPayload::BugReport(p) => {
                let mut rows = vec![("Title", p.title.clone()), ("Description", p.description.clone())];
                for (i, step) in p.steps_to_reproduce.iter().enumerate() {
                    rows.push(("Step", format!("{}. {}", i + 1, step)));
                }
                if let Some(expected) = &p.expected_behavior {
                    rows.push(("Expected", expected.clone()));
                }
                if let Some(actual) = &p.actual_behavior {
                    rows.push(("Actual", actual.clone()));
                }
                rows
            }
            TypedPayload::PackRegister(p) => vec![
                ("Repository", p.repository.clone()),
                ("Name", p.name.clone()),
                ("Version", p.version.clone()),
            ],
            TypedPayload::PackSync(p) => {
                let mut rows = vec![("Repository", p.repository.clone()), ("Version", p.version.clone())];
                if let Some(changes) = &p.changes {
                    rows.push(("Changes", changes.clone()));
                }
                rows
            }
            TypedPayload::Opaque(_) => Vec::new(),
        }
    }
}
