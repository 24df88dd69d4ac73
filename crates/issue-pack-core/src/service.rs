//! The five issue package operations.
//!
//! Each operation is a short, linear sequence of gateway calls. Nothing is
//! retried and nothing is rolled back: a failure at any step aborts the
//! operation and the caller may rerun it.

use crate::error::{IssuePackError, Result};
use crate::gateway::{
    GistFile, Issue, IssueQuery, IssueState, IssueUpdate, NewGist, NewIssue, TrackerGateway,
};
use crate::link;
use crate::package::{IssuePackage, Target, PAYLOAD_FILENAME};
use crate::repo::RepoRef;
use crate::request::{CloseRequest, CreateRequest, GetRequest, ListRequest, Request, UpdateRequest};
use crate::status::{self, Status, MARKER_LABEL};
use crate::types::IssueType;
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What `create` would have done, without doing it.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunPreview {
    pub repo: RepoRef,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub title: String,
    pub labels: Vec<String>,
    pub gist_description: String,
    pub gist_files: Vec<String>,
    pub package: IssuePackage,
}

impl DryRunPreview {
    pub fn package_json(&self) -> Result<String> {
        self.package.encode()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedIssue {
    pub number: u64,
    pub issue_url: String,
    pub gist_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CreateOutcome {
    DryRun(DryRunPreview),
    Created(CreatedIssue),
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    #[serde(rename = "type", serialize_with = "empty_when_none")]
    pub issue_type: Option<IssueType>,
    #[serde(serialize_with = "empty_when_none")]
    pub status: Option<Status>,
    /// `YYYY-MM-DD`
    pub created_at: String,
    pub url: String,
}

impl IssueSummary {
    pub fn from_issue(issue: &Issue) -> Self {
        let names = issue.label_names();
        Self {
            number: issue.number,
            title: issue.title.clone(),
            issue_type: IssueType::from_labels(names.iter().map(String::as_str)),
            status: Status::from_labels(names.iter().map(String::as_str)),
            created_at: issue.created_at.date_naive().to_string(),
            url: issue.html_url.clone(),
        }
    }
}

/// Unlabelled summaries render as `""` rather than `null`.
fn empty_when_none<T, S>(value: &Option<T>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_str(""),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueDetail {
    pub issue: Issue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gist_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<IssuePackage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub number: u64,
    pub status: Status,
    pub state: IssueState,
    pub labels: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Created(CreateOutcome),
    Listed(Vec<IssueSummary>),
    Fetched(Box<IssueDetail>),
    Transitioned(Transition),
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct IssueService {
    gateway: Box<dyn TrackerGateway>,
}

impl IssueService {
    pub fn new(gateway: Box<dyn TrackerGateway>) -> Self {
        Self { gateway }
    }

    /// Run a validated request.
    pub fn execute(&self, request: Request) -> Result<Outcome> {
        match request {
            Request::Create(req) => self.create(req).map(Outcome::Created),
            Request::List(req) => self.list(&req).map(Outcome::Listed),
            Request::Get(req) => self.get(&req).map(|d| Outcome::Fetched(Box::new(d))),
            Request::Update(req) => self.update_status(&req).map(Outcome::Transitioned),
            Request::Close(req) => self.close(&req).map(Outcome::Transitioned),
        }
    }

    /// Build everything `create` would send, without a gateway.
    pub fn preview(req: CreateRequest) -> Result<DryRunPreview> {
        let draft = Draft::new(req)?;
        let mut gist_files = vec![PAYLOAD_FILENAME.to_string()];
        gist_files.extend(draft.package.attachments.iter().map(|a| a.name.clone()));
        Ok(DryRunPreview {
            repo: draft.repo,
            issue_type: draft.issue_type,
            title: draft.title,
            labels: draft.labels,
            gist_description: draft.gist_description,
            gist_files,
            package: draft.package,
        })
    }

    pub fn create(&self, req: CreateRequest) -> Result<CreateOutcome> {
        if req.dry_run {
            return Self::preview(req).map(CreateOutcome::DryRun);
        }
        let Draft {
            repo,
            issue_type,
            title,
            labels,
            gist_description: description,
            package,
        } = Draft::new(req)?;

        let mut files = BTreeMap::new();
        files.insert(
            PAYLOAD_FILENAME.to_string(),
            GistFile {
                content: package.encode()?,
                truncated: false,
            },
        );
        for attachment in &package.attachments {
            files.insert(
                attachment.name.clone(),
                GistFile {
                    content: attachment.content.clone(),
                    truncated: false,
                },
            );
        }

        let gist = self.gateway.create_gist(&NewGist {
            description,
            public: false,
            files,
        })?;
        tracing::info!(gist = %gist.html_url, "created package gist");

        let issue = self.gateway.create_issue(
            &repo,
            &NewIssue {
                body: issue_body(issue_type, &title, &gist.html_url),
                title,
                labels,
            },
        )?;
        tracing::info!(%repo, number = issue.number, "created issue");

        Ok(CreateOutcome::Created(CreatedIssue {
            number: issue.number,
            issue_url: issue.html_url,
            gist_url: gist.html_url,
        }))
    }

    pub fn list(&self, req: &ListRequest) -> Result<Vec<IssueSummary>> {
        let mut labels = vec![MARKER_LABEL.to_string()];
        if let Some(status) = req.status.status() {
            labels.push(status.label().to_string());
        }
        if let Some(issue_type) = req.issue_type {
            labels.push(issue_type.label().to_string());
        }
        let query = IssueQuery {
            labels,
            state: req.status.state(),
            per_page: req.limit,
        };

        let issues = self.gateway.list_issues(&req.repo, &query)?;
        Ok(issues
            .iter()
            .filter(|i| i.has_label(MARKER_LABEL) && !i.is_pull_request())
            .take(req.limit as usize)
            .map(IssueSummary::from_issue)
            .collect())
    }

    /// Fetch an issue and, best effort, its package. Only the issue fetch can fail.
    pub fn get(&self, req: &GetRequest) -> Result<IssueDetail> {
        let issue = self.gateway.get_issue(&req.repo, req.number)?;

        let Some(gist_ref) = link::gist_reference(issue.body_text()) else {
            tracing::debug!(number = issue.number, "issue body has no gist link");
            return Ok(IssueDetail {
                issue,
                gist_url: None,
                package: None,
            });
        };

        let package = self.load_package(&gist_ref.id);
        Ok(IssueDetail {
            issue,
            gist_url: Some(gist_ref.url),
            package,
        })
    }

    fn load_package(&self, gist_id: &str) -> Option<IssuePackage> {
        let gist = match self.gateway.get_gist(gist_id) {
            Ok(gist) => gist,
            Err(e) => {
                tracing::warn!(gist_id, error = %e, "could not fetch package gist");
                return None;
            }
        };
        let Some(file) = gist.files.get(PAYLOAD_FILENAME) else {
            tracing::warn!(gist_id, "gist has no {PAYLOAD_FILENAME}");
            return None;
        };
        if file.truncated {
            tracing::warn!(gist_id, "package file is truncated by the gist API");
        }
        match IssuePackage::decode(&file.content) {
            Ok(package) => {
                if !package.is_current_schema() {
                    tracing::warn!(gist_id, schema = %package.schema, "package uses an unknown schema");
                }
                Some(package)
            }
            Err(e) => {
                tracing::warn!(gist_id, error = %e, "could not decode package");
                None
            }
        }
    }

    pub fn update_status(&self, req: &UpdateRequest) -> Result<Transition> {
        self.transition(&req.repo, req.number, req.status, false, req.comment.as_deref())
    }

    pub fn close(&self, req: &CloseRequest) -> Result<Transition> {
        self.transition(
            &req.repo,
            req.number,
            req.result.status(),
            true,
            req.comment.as_deref(),
        )
    }

    /// Shared by update and close: relabel, set state, then comment.
    fn transition(
        &self,
        repo: &RepoRef,
        number: u64,
        new_status: Status,
        close: bool,
        comment: Option<&str>,
    ) -> Result<Transition> {
        let issue = self.gateway.get_issue(repo, number)?;
        let labels = status::next_label_set(&issue.label_names(), new_status);

        // Non-terminal statuses are listed from open issues, so moving a
        // closed issue back to one of them reopens it.
        let state = if close {
            Some(IssueState::Closed)
        } else if issue.state == IssueState::Closed {
            Some(IssueState::Open)
        } else {
            None
        };

        let updated = self.gateway.update_issue(
            repo,
            number,
            &IssueUpdate {
                state,
                labels: Some(labels.clone()),
            },
        )?;
        tracing::info!(%repo, number, status = %new_status, state = %updated.state, "issue status updated");

        if let Some(body) = comment.filter(|c| !c.trim().is_empty()) {
            self.gateway
                .add_comment(repo, number, body)
                .map_err(|e| IssuePackError::CommentFailed {
                    number,
                    status: new_status.to_string(),
                    source: Box::new(e),
                })?;
        }

        Ok(Transition {
            number,
            status: new_status,
            state: updated.state,
            labels,
            url: updated.html_url,
        })
    }
}

/// A validated create request with its package built.
struct Draft {
    repo: RepoRef,
    issue_type: IssueType,
    title: String,
    labels: Vec<String>,
    gist_description: String,
    package: IssuePackage,
}

impl Draft {
    fn new(req: CreateRequest) -> Result<Self> {
        let target = Target {
            repo: req.repo.to_string(),
            pack: req.pack,
            version: req.pack_version,
        };
        let package = IssuePackage::build(req.issue_type, target, &req.payload, req.attachments)?
            .with_source_project(req.source_project);
        Ok(Self {
            gist_description: format!("[{}] {}", req.issue_type, req.title),
            labels: status::initial_labels(req.issue_type),
            repo: req.repo,
            issue_type: req.issue_type,
            title: req.title,
            package,
        })
    }
}

/// Issue body embedding the gist link.
pub fn issue_body(issue_type: IssueType, title: &str, gist_url: &str) -> String {
    format!(
        "## {issue_type}: {title}\n\
         \n\
         **Type:** {issue_type}\n\
         **Created by:** github-issue-pack v{version}\n\
         \n\
         ### Details\n\
         \n\
         📦 [View full payload]({gist_url})\n\
         \n\
         ---\n\
         <sub>This issue was automatically created by [github-issue-pack](https://github.com/shichao402/github-issue-pack)</sub>\n",
        version = crate::VERSION,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
