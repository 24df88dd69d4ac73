//! Operation catalog and argument validation shared by every front end.
//!
//! The CLI and the MCP server both collect raw string arguments into [`Args`]
//! and call [`Request::parse`]. Required parameters and allowed values come
//! from [`Operation::params`], which also drives the MCP input schemas.

use crate::error::{IssuePackError, Result};
use crate::package::Attachment;
use crate::repo::RepoRef;
use crate::status::{
    CloseResult, Status, StatusFilter, CLOSE_RESULT_NAMES, STATUS_FILTER_NAMES,
    UPDATE_STATUS_NAMES,
};
use crate::types::{IssueType, ISSUE_TYPE_NAMES};
use std::collections::BTreeMap;

pub const DEFAULT_LIST_LIMIT: u32 = 20;
pub const MAX_LIST_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Operation catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    /// Closed set of accepted values, if any.
    pub allowed: Option<&'static [&'static str]>,
}

const fn required(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        description,
        required: true,
        allowed: None,
    }
}

const fn optional(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        description,
        required: false,
        allowed: None,
    }
}

const fn one_of(mut spec: ParamSpec, allowed: &'static [&'static str]) -> ParamSpec {
    spec.allowed = Some(allowed);
    spec
}

const REPO: ParamSpec = required("repo", "Target repository (owner/repo)");
const NUMBER: ParamSpec = required("number", "Issue number");

const CREATE_PARAMS: &[ParamSpec] = &[
    REPO,
    one_of(required("type", "Issue type"), ISSUE_TYPE_NAMES),
    required("title", "Issue title"),
    optional("payload", "Detailed content as a JSON string"),
    optional("pack", "Target pack name"),
    optional("pack_version", "Target pack version"),
    optional("source_project", "Project the request originates from"),
    one_of(optional("dry_run", "Preview without creating anything"), &["true", "false"]),
];

const LIST_PARAMS: &[ParamSpec] = &[
    REPO,
    one_of(optional("status", "Status filter (default pending)"), STATUS_FILTER_NAMES),
    one_of(optional("type", "Type filter"), ISSUE_TYPE_NAMES),
    optional("limit", "Maximum number of issues (default 20)"),
];

const GET_PARAMS: &[ParamSpec] = &[REPO, NUMBER];

const UPDATE_PARAMS: &[ParamSpec] = &[
    REPO,
    NUMBER,
    one_of(required("status", "New status"), UPDATE_STATUS_NAMES),
    optional("comment", "Comment to post after the update"),
];

const CLOSE_PARAMS: &[ParamSpec] = &[
    REPO,
    NUMBER,
    one_of(required("result", "Processing result"), CLOSE_RESULT_NAMES),
    optional("comment", "Closing note"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    Close,
}

impl Operation {
    pub fn all() -> &'static [Operation] {
        &[
            Operation::Create,
            Operation::List,
            Operation::Get,
            Operation::Update,
            Operation::Close,
        ]
    }

    /// Subcommand name.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Close => "close",
        }
    }

    /// MCP tool name.
    pub fn tool_name(self) -> &'static str {
        match self {
            Operation::Create => "github_issue_create",
            Operation::List => "github_issue_list",
            Operation::Get => "github_issue_get",
            Operation::Update => "github_issue_update",
            Operation::Close => "github_issue_close",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Operation> {
        Operation::all().iter().copied().find(|op| op.tool_name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::Create => {
                "Create a standardized GitHub issue; the full payload is packed into a gist"
            }
            Operation::List => "List standardized issues in a repository",
            Operation::Get => "Get an issue with its parsed package",
            Operation::Update => "Update the status of an issue (pending or processing)",
            Operation::Close => "Close an issue and record the processing result",
        }
    }

    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Operation::Create => CREATE_PARAMS,
            Operation::List => LIST_PARAMS,
            Operation::Get => GET_PARAMS,
            Operation::Update => UPDATE_PARAMS,
            Operation::Close => CLOSE_PARAMS,
        }
    }

    pub fn required_params(self) -> impl Iterator<Item = &'static str> {
        self.params().iter().filter(|p| p.required).map(|p| p.name)
    }
}

// ---------------------------------------------------------------------------
// Raw arguments
// ---------------------------------------------------------------------------

/// Raw string arguments as collected by a front end.
///
/// Empty or whitespace-only values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(BTreeMap<String, String>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn insert_opt(&mut self, key: &str, value: Option<impl Into<String>>) {
        if let Some(v) = value {
            self.insert(key, v);
        }
    }

    /// Decode a JSON-RPC `arguments` object.
    ///
    /// Strings are taken as-is, numbers and booleans are stringified, and
    /// `null` counts as absent. Nested arrays or objects are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        let object = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            _ => {
                return Err(IssuePackError::InvalidArgument {
                    name: "arguments".to_string(),
                    reason: "expected an object".to_string(),
                })
            }
        };

        let mut args = Self::new();
        for (key, v) in object {
            match v {
                Value::Null => {}
                Value::String(s) => args.insert(key, s.as_str()),
                Value::Number(n) => args.insert(key, n.to_string()),
                Value::Bool(b) => args.insert(key, b.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(IssuePackError::InvalidArgument {
                        name: key.clone(),
                        reason: "expected a string".to_string(),
                    })
                }
            }
        }
        Ok(args)
    }

    /// Trimmed value for identifiers and enumerations. Blank counts as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.text(key).map(str::trim)
    }

    /// Free text exactly as supplied. Blank counts as absent.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| IssuePackError::MissingArgument(key.to_string()))
    }

    fn require_text(&self, key: &str) -> Result<&str> {
        self.text(key)
            .ok_or_else(|| IssuePackError::MissingArgument(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Validated requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub repo: RepoRef,
    pub issue_type: IssueType,
    pub title: String,
    pub payload: serde_json::Value,
    pub attachments: Vec<Attachment>,
    pub pack: Option<String>,
    pub pack_version: Option<String>,
    pub source_project: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub repo: RepoRef,
    pub status: StatusFilter,
    pub issue_type: Option<IssueType>,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    pub repo: RepoRef,
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub repo: RepoRef,
    pub number: u64,
    pub status: Status,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseRequest {
    pub repo: RepoRef,
    pub number: u64,
    pub result: CloseResult,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Create(CreateRequest),
    List(ListRequest),
    Get(GetRequest),
    Update(UpdateRequest),
    Close(CloseRequest),
}

impl Request {
    /// Validate `args` for `operation`. Never touches the network.
    pub fn parse(operation: Operation, args: &Args) -> Result<Request> {
        for name in operation.required_params() {
            args.require(name)?;
        }

        let repo: RepoRef = args.require("repo")?.parse()?;
        let request = match operation {
            Operation::Create => {
                let issue_type: IssueType = args.require("type")?.parse()?;
                let title = args.require_text("title")?.to_string();
                let payload = match args.text("payload") {
                    Some(raw) => serde_json::from_str(raw)
                        .map_err(|e| IssuePackError::InvalidPayload(e.to_string()))?,
                    None => default_payload(&title),
                };
                Request::Create(CreateRequest {
                    repo,
                    issue_type,
                    title,
                    payload,
                    attachments: Vec::new(),
                    pack: args.get("pack").map(str::to_string),
                    pack_version: args.get("pack_version").map(str::to_string),
                    source_project: args.get("source_project").map(str::to_string),
                    dry_run: parse_flag("dry_run", args.get("dry_run"))?,
                })
            }
            Operation::List => Request::List(ListRequest {
                repo,
                status: args
                    .get("status")
                    .map(str::parse::<StatusFilter>)
                    .transpose()?
                    .unwrap_or_default(),
                issue_type: args.get("type").map(str::parse::<IssueType>).transpose()?,
                limit: args
                    .get("limit")
                    .map(parse_limit)
                    .transpose()?
                    .unwrap_or(DEFAULT_LIST_LIMIT),
            }),
            Operation::Get => Request::Get(GetRequest {
                repo,
                number: parse_issue_number(args.require("number")?)?,
            }),
            Operation::Update => Request::Update(UpdateRequest {
                repo,
                number: parse_issue_number(args.require("number")?)?,
                status: Status::parse_update(args.require("status")?)?,
                comment: args.text("comment").map(str::to_string),
            }),
            Operation::Close => Request::Close(CloseRequest {
                repo,
                number: parse_issue_number(args.require("number")?)?,
                result: args.require("result")?.parse()?,
                comment: args.text("comment").map(str::to_string),
            }),
        };
        Ok(request)
    }

    pub fn operation(&self) -> Operation {
        match self {
            Request::Create(_) => Operation::Create,
            Request::List(_) => Operation::List,
            Request::Get(_) => Operation::Get,
            Request::Update(_) => Operation::Update,
            Request::Close(_) => Operation::Close,
        }
    }
}

/// Payload used when the caller supplies none.
pub fn default_payload(title: &str) -> serde_json::Value {
    serde_json::json!({ "title": title, "description": "" })
}

/// Issue numbers arrive as strings on both transports.
pub fn parse_issue_number(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(IssuePackError::InvalidIssueNumber(raw.to_string())),
    }
}

fn parse_limit(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(n) if (1..=MAX_LIST_LIMIT).contains(&n) => Ok(n),
        _ => Err(IssuePackError::InvalidLimit(raw.to_string())),
    }
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<bool> {
    match raw {
        None | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(IssuePackError::InvalidArgument {
            name: name.to_string(),
            reason: format!("expected true or false, got '{other}'"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
