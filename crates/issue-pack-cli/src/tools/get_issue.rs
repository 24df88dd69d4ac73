use super::IssueTool;
use crate::output::{detail_text, render_text};
use issue_pack_core::{request::Operation, service::Outcome};

pub struct GetIssueTool;

impl IssueTool for GetIssueTool {
    fn operation(&self) -> Operation {
        Operation::Get
    }

    fn render(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Fetched(detail) => detail_text(detail),
            other => render_text(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Backend;
    use issue_pack_core::gateway::IssueState;
    use issue_pack_core::package::PAYLOAD_FILENAME;
    use issue_pack_core::service::IssueService;
    use issue_pack_core::testing::RecordingGateway;

    const PACKAGE: &str = r#"{
        "$schema": "cursortoolset-issue-v1",
        "meta": {"created_at": "2024-06-01T12:30:00Z", "github_issue_version": "0.2.0"},
        "type": "pack-register",
        "target": {"repo": "o/r"},
        "payload": {"repository": "https://github.com/a/pack", "name": "pack", "version": "1.0.0"}
    }"#;

    #[test]
    fn zero_issue_number_fails_without_gateway_call() {
        let gw = RecordingGateway::new();
        let backend = Backend::new(IssueService::new(Box::new(gw.clone())));
        let err = GetIssueTool
            .call(serde_json::json!({"repo": "o/r", "number": "0"}), &backend)
            .unwrap_err();
        assert!(err.contains("invalid issue number '0'"));
        assert!(gw.calls().is_empty());
    }

    #[test]
    fn renders_issue_with_typed_package() {
        let gw = RecordingGateway::new();
        gw.insert_issue(
            9,
            IssueState::Open,
            &["cursortoolset", "pending", "pack-register"],
            "📦 [View full payload](https://gist.github.com/agent/beef)",
        );
        gw.insert_gist("beef", &[(PAYLOAD_FILENAME, PACKAGE)]);
        let backend = Backend::new(IssueService::new(Box::new(gw)));

        let text = GetIssueTool
            .call(serde_json::json!({"repo": "o/r", "number": 9}), &backend)
            .unwrap();
        assert!(text.starts_with("Issue #9: Issue 9"));
        assert!(text.contains("Type:   pack-register"));
        assert!(text.contains("Packed: 2024-06-01 12:30:00 UTC"));
        assert!(text.contains("Name: pack"));
        assert!(text.contains("\"version\": \"1.0.0\""));
    }

    #[test]
    fn missing_issue_is_a_tool_error() {
        let gw = RecordingGateway::new();
        let backend = Backend::new(IssueService::new(Box::new(gw)));
        let err = GetIssueTool
            .call(serde_json::json!({"repo": "o/r", "number": "4"}), &backend)
            .unwrap_err();
        assert!(err.contains("404"));
    }
}
