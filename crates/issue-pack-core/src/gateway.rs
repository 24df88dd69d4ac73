//! Tracker gateway: the remote issue and gist operations the service needs.

use crate::error::Result;
use crate::repo::RepoRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Issue entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `state` query parameter for issue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: IssueState,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: User,
    /// Present when the "issue" is really a pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    /// Label names with duplicates dropped, first occurrence kept.
    pub fn label_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.labels.len());
        for label in &self.labels {
            if !names.contains(&label.name) {
                names.push(label.name.clone());
            }
        }
        names
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    pub labels: Vec<String>,
    pub state: StateFilter,
    pub per_page: u32,
}

// ---------------------------------------------------------------------------
// Gist entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistFile {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gist {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGist {
    pub description: String,
    pub public: bool,
    pub files: BTreeMap<String, GistFile>,
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// Remote calls made by `IssueService`. Each method is one round trip.
pub trait TrackerGateway: Send + Sync {
    fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<Issue>;
    fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<Issue>;
    fn list_issues(&self, repo: &RepoRef, query: &IssueQuery) -> Result<Vec<Issue>>;
    fn update_issue(&self, repo: &RepoRef, number: u64, update: &IssueUpdate) -> Result<Issue>;
    fn add_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<()>;
    fn create_gist(&self, gist: &NewGist) -> Result<Gist>;
    fn get_gist(&self, id: &str) -> Result<Gist>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_json() -> serde_json::Value {
        serde_json::json!({
            "number": 12,
            "title": "Add export",
            "body": null,
            "state": "open",
            "html_url": "https://github.com/o/r/issues/12",
            "labels": [
                {"name": "cursortoolset", "color": "ededed"},
                {"name": "pending"},
                {"name": "pending"}
            ],
            "created_at": "2024-05-01T10:20:30Z",
            "updated_at": "2024-05-02T00:00:00Z",
            "user": {"login": "octocat", "id": 1}
        })
    }

    #[test]
    fn issue_decodes_github_shape() {
        let issue: Issue = serde_json::from_value(issue_json()).unwrap();
        assert_eq!(issue.number, 12);
        assert_eq!(issue.state, IssueState::Open);
        assert_eq!(issue.body_text(), "");
        assert_eq!(issue.user.login, "octocat");
        assert!(!issue.is_pull_request());
    }

    #[test]
    fn label_names_are_deduplicated_in_order() {
        let issue: Issue = serde_json::from_value(issue_json()).unwrap();
        assert_eq!(issue.label_names(), vec!["cursortoolset", "pending"]);
        assert!(issue.has_label("cursortoolset"));
        assert!(!issue.has_label("processed"));
    }

    #[test]
    fn issue_update_omits_unset_fields() {
        let update = IssueUpdate {
            state: None,
            labels: Some(vec!["a".into()]),
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"labels": ["a"]})
        );
        let close = IssueUpdate {
            state: Some(IssueState::Closed),
            labels: None,
        };
        assert_eq!(
            serde_json::to_value(&close).unwrap(),
            serde_json::json!({"state": "closed"})
        );
    }
}
