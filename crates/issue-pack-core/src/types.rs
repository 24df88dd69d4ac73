use crate::error::IssuePackError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// IssueType
// ---------------------------------------------------------------------------

/// Accepted `type` values, in display order.
pub const ISSUE_TYPE_NAMES: &[&str] = &[
    "feature-request",
    "bug-report",
    "pack-register",
    "pack-sync",
    "question",
    "custom",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    FeatureRequest,
    BugReport,
    PackRegister,
    PackSync,
    Question,
    Custom,
}

impl IssueType {
    pub fn all() -> &'static [IssueType] {
        &[
            IssueType::FeatureRequest,
            IssueType::BugReport,
            IssueType::PackRegister,
            IssueType::PackSync,
            IssueType::Question,
            IssueType::Custom,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::FeatureRequest => "feature-request",
            IssueType::BugReport => "bug-report",
            IssueType::PackRegister => "pack-register",
            IssueType::PackSync => "pack-sync",
            IssueType::Question => "question",
            IssueType::Custom => "custom",
        }
    }

    /// Label attached to issues of this type.
    pub fn label(self) -> &'static str {
        self.as_str()
    }

    /// First label in `labels` that names an issue type.
    pub fn from_labels<'a, I>(labels: I) -> Option<IssueType>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().find_map(|l| l.parse().ok())
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssueType {
    type Err = IssuePackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| IssuePackError::InvalidIssueType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
