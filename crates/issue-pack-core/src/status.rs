//! Label-driven lifecycle of a work item.
//!
//! Status lives entirely in the issue's label set: exactly one of the four
//! status labels is present at a time. Every operation that changes status
//! computes the new label set through [`next_label_set`].

use crate::error::IssuePackError;
use crate::gateway::StateFilter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marks issues managed by this tool, independent of status.
pub const MARKER_LABEL: &str = "cursortoolset";

/// Values accepted by `update`.
pub const UPDATE_STATUS_NAMES: &[&str] = &["pending", "processing"];

/// Values accepted by `close`.
pub const CLOSE_RESULT_NAMES: &[&str] = &["success", "rejected"];

/// Values accepted by `list --status`.
pub const STATUS_FILTER_NAMES: &[&str] = &["pending", "processing", "processed", "rejected", "all"];

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Processing,
    Processed,
    Rejected,
}

impl Status {
    pub fn all() -> &'static [Status] {
        &[
            Status::Pending,
            Status::Processing,
            Status::Processed,
            Status::Rejected,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Processing => "processing",
            Status::Processed => "processed",
            Status::Rejected => "rejected",
        }
    }

    pub fn label(self) -> &'static str {
        self.as_str()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Processed | Status::Rejected)
    }

    pub fn is_status_label(label: &str) -> bool {
        Status::all().iter().any(|s| s.label() == label)
    }

    /// First label in `labels` that names a status.
    pub fn from_labels<'a, I>(labels: I) -> Option<Status>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels
            .into_iter()
            .find_map(|l| Status::all().iter().copied().find(|s| s.label() == l))
    }

    /// Parse a status for `update`, which only offers the non-terminal states.
    pub fn parse_update(s: &str) -> Result<Status, IssuePackError> {
        match s {
            "pending" => Ok(Status::Pending),
            "processing" => Ok(Status::Processing),
            _ => Err(IssuePackError::InvalidStatus {
                value: s.to_string(),
                valid: UPDATE_STATUS_NAMES.join(", "),
            }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CloseResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseResult {
    Success,
    Rejected,
}

impl CloseResult {
    pub fn as_str(self) -> &'static str {
        match self {
            CloseResult::Success => "success",
            CloseResult::Rejected => "rejected",
        }
    }

    /// Terminal status recorded when closing with this result.
    pub fn status(self) -> Status {
        match self {
            CloseResult::Success => Status::Processed,
            CloseResult::Rejected => Status::Rejected,
        }
    }
}

impl fmt::Display for CloseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CloseResult {
    type Err = IssuePackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(CloseResult::Success),
            "rejected" => Ok(CloseResult::Rejected),
            _ => Err(IssuePackError::InvalidResult(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StatusFilter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Pending,
    Processing,
    Processed,
    Rejected,
    All,
}

impl StatusFilter {
    pub fn status(self) -> Option<Status> {
        match self {
            StatusFilter::Pending => Some(Status::Pending),
            StatusFilter::Processing => Some(Status::Processing),
            StatusFilter::Processed => Some(Status::Processed),
            StatusFilter::Rejected => Some(Status::Rejected),
            StatusFilter::All => None,
        }
    }

    /// Terminal statuses live on closed issues; everything else on open ones.
    pub fn state(self) -> StateFilter {
        match self {
            StatusFilter::All => StateFilter::All,
            StatusFilter::Processed | StatusFilter::Rejected => StateFilter::Closed,
            StatusFilter::Pending | StatusFilter::Processing => StateFilter::Open,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.status().map(Status::as_str).unwrap_or("all")
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = IssuePackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(StatusFilter::Pending),
            "processing" => Ok(StatusFilter::Processing),
            "processed" => Ok(StatusFilter::Processed),
            "rejected" => Ok(StatusFilter::Rejected),
            "all" => Ok(StatusFilter::All),
            _ => Err(IssuePackError::InvalidStatusFilter(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Replace the status subset of `current` with `new_status`.
///
/// Non-status labels keep their relative order; the new status label is
/// appended last.
pub fn next_label_set(current: &[String], new_status: Status) -> Vec<String> {
    let mut labels: Vec<String> = current
        .iter()
        .filter(|l| !Status::is_status_label(l))
        .cloned()
        .collect();
    labels.push(new_status.label().to_string());
    labels
}

/// Labels of a freshly created work item.
pub fn initial_labels(issue_type: crate::types::IssueType) -> Vec<String> {
    vec![
        MARKER_LABEL.to_string(),
        Status::Pending.label().to_string(),
        issue_type.label().to_string(),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
