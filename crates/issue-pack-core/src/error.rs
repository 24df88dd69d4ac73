use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssuePackError {
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("invalid repository '{0}': expected owner/repo")]
    InvalidRepo(String),

    #[error("invalid issue type '{0}'; valid values: {valid}", valid = crate::types::ISSUE_TYPE_NAMES.join(", "))]
    InvalidIssueType(String),

    #[error("invalid status '{value}'; valid values: {valid}")]
    InvalidStatus { value: String, valid: String },

    #[error("invalid result '{0}'; valid values: {valid}", valid = crate::status::CLOSE_RESULT_NAMES.join(", "))]
    InvalidResult(String),

    #[error("invalid status filter '{0}'; valid values: {valid}", valid = crate::status::STATUS_FILTER_NAMES.join(", "))]
    InvalidStatusFilter(String),

    #[error("invalid issue number '{0}': must be a positive integer")]
    InvalidIssueNumber(String),

    #[error("invalid limit '{0}': must be an integer between 1 and 100")]
    InvalidLimit(String),

    #[error("payload is not valid JSON: {0}")]
    InvalidPayload(String),

    #[error("duplicate attachment name: {0}")]
    DuplicateAttachment(String),

    #[error("attachment name '{0}' is reserved for the package file")]
    ReservedAttachmentName(String),

    #[error("no GitHub token: pass --token, set GITHUB_TOKEN, or run 'gh auth login'")]
    MissingCredentials,

    #[error("GitHub API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode package: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("malformed issue package: {0}")]
    MalformedPackage(#[source] serde_json::Error),

    #[error("payload does not match the {shape} shape: {source}")]
    PayloadShapeMismatch {
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported package schema '{0}'")]
    UnsupportedSchema(String),

    #[error("issue #{number} moved to '{status}' but posting the comment failed: {source}")]
    CommentFailed {
        number: u64,
        status: String,
        #[source]
        source: Box<IssuePackError>,
    },
}

impl IssuePackError {
    /// True for errors raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            IssuePackError::MissingArgument(_)
                | IssuePackError::InvalidArgument { .. }
                | IssuePackError::InvalidRepo(_)
                | IssuePackError::InvalidIssueType(_)
                | IssuePackError::InvalidStatus { .. }
                | IssuePackError::InvalidResult(_)
                | IssuePackError::InvalidStatusFilter(_)
                | IssuePackError::InvalidIssueNumber(_)
                | IssuePackError::InvalidLimit(_)
                | IssuePackError::InvalidPayload(_)
                | IssuePackError::DuplicateAttachment(_)
                | IssuePackError::ReservedAttachmentName(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IssuePackError>;
