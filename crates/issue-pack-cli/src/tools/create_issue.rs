use super::IssueTool;
use crate::output::{create_text, render_text};
use issue_pack_core::{
    request::Operation,
    service::{CreateOutcome, Outcome},
};

pub struct CreateIssueTool;

impl IssueTool for CreateIssueTool {
    fn operation(&self) -> Operation {
        Operation::Create
    }

    fn render(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Created(CreateOutcome::Created(c)) => format!(
                "Issue #{} created\n\nIssue: {}\nGist: {}",
                c.number, c.issue_url, c.gist_url
            ),
            Outcome::Created(preview) => create_text(preview),
            other => render_text(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Backend;
    use issue_pack_core::service::IssueService;
    use issue_pack_core::testing::{Call, RecordingGateway};

    fn backend() -> (Backend, RecordingGateway) {
        let gw = RecordingGateway::new();
        (Backend::new(IssueService::new(Box::new(gw.clone()))), gw)
    }

    #[test]
    fn create_returns_issue_and_gist_urls() {
        let (backend, gw) = backend();
        let text = CreateIssueTool
            .call(
                serde_json::json!({
                    "repo": "o/r",
                    "type": "feature-request",
                    "title": "Add dark mode",
                    "payload": "{\"title\":\"Add dark mode\",\"description\":\"please\"}",
                    "pack": "ui-kit"
                }),
                &backend,
            )
            .unwrap();

        assert!(text.contains("Issue #1 created"));
        assert!(text.contains("https://github.com/o/r/issues/1"));
        assert!(text.contains("https://gist.github.com/agent/"));

        let calls = gw.calls();
        assert!(matches!(calls[0], Call::CreateGist { .. }));
        assert!(matches!(calls[1], Call::CreateIssue { .. }));
    }

    #[test]
    fn dry_run_flag_accepts_json_boolean() {
        let (backend, gw) = backend();
        let text = CreateIssueTool
            .call(
                serde_json::json!({
                    "repo": "o/r",
                    "type": "bug-report",
                    "title": "X",
                    "dry_run": true
                }),
                &backend,
            )
            .unwrap();
        assert!(text.contains("cursortoolset-issue-v1"));
        assert!(text.contains("bug-report"));
        assert!(gw.calls().is_empty());
    }

    #[test]
    fn missing_title_is_a_tool_error() {
        let (backend, gw) = backend();
        let err = CreateIssueTool
            .call(
                serde_json::json!({"repo": "o/r", "type": "question"}),
                &backend,
            )
            .unwrap_err();
        assert!(err.contains("title"));
        assert!(gw.calls().is_empty());
    }

    #[test]
    fn invalid_payload_json_is_a_tool_error() {
        let (backend, gw) = backend();
        let err = CreateIssueTool
            .call(
                serde_json::json!({
                    "repo": "o/r",
                    "type": "custom",
                    "title": "X",
                    "payload": "{not json"
                }),
                &backend,
            )
            .unwrap_err();
        assert!(err.contains("payload is not valid JSON"));
        assert!(gw.calls().is_empty());
    }
}
