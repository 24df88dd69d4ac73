pub mod close;
pub mod create;
pub mod get;
pub mod list;
pub mod serve;
pub mod update;

use anyhow::Context;
use issue_pack_core::{
    config::ClientConfig,
    credentials,
    github::GitHubClient,
    request::{Args, Operation, Request},
    service::{IssueService, Outcome},
};
use std::time::Duration;

/// Connection settings gathered from global flags.
#[derive(Debug, Clone)]
pub struct Connection {
    pub token: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

impl Connection {
    /// Resolve credentials and build a service backed by the GitHub API.
    pub fn service(&self) -> issue_pack_core::Result<IssueService> {
        let resolved = credentials::resolve_token(self.token.as_deref())?;
        let config = ClientConfig::new(resolved.token)
            .with_api_url(self.api_url.as_str())
            .with_timeout(self.timeout);
        let client = GitHubClient::new(&config)?;
        Ok(IssueService::new(Box::new(client)))
    }
}

/// Validate `args`, then connect and execute.
pub fn execute(conn: &Connection, operation: Operation, args: &Args) -> anyhow::Result<Outcome> {
    let request = Request::parse(operation, args)?;
    execute_request(conn, request)
}

/// Connect and execute an already-validated request.
pub fn execute_request(conn: &Connection, request: Request) -> anyhow::Result<Outcome> {
    let operation = request.operation();
    let service = conn.service()?;
    service
        .execute(request)
        .with_context(|| format!("{} failed", operation.as_str()))
}
