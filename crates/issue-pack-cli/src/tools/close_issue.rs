use super::IssueTool;
use crate::output::render_text;
use issue_pack_core::{request::Operation, service::Outcome};

pub struct CloseIssueTool;

impl IssueTool for CloseIssueTool {
    fn operation(&self) -> Operation {
        Operation::Close
    }

    fn render(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Transitioned(t) => format!("Issue #{} closed ({})", t.number, t.status),
            other => render_text(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Backend;
    use issue_pack_core::gateway::IssueState;
    use issue_pack_core::service::IssueService;
    use issue_pack_core::testing::RecordingGateway;

    #[test]
    fn success_marks_processed_and_closes() {
        let gw = RecordingGateway::new();
        gw.insert_issue(8, IssueState::Open, &["cursortoolset", "processing", "pack-sync"], "");
        let backend = Backend::new(IssueService::new(Box::new(gw.clone())));

        let text = CloseIssueTool
            .call(
                serde_json::json!({"repo": "o/r", "number": "8", "result": "success"}),
                &backend,
            )
            .unwrap();
        assert_eq!(text, "Issue #8 closed (processed)");

        let issue = gw.issue(8).unwrap();
        assert_eq!(issue.state, IssueState::Closed);
        assert_eq!(
            issue.label_names(),
            vec!["cursortoolset", "pack-sync", "processed"]
        );
    }

    #[test]
    fn comment_failure_is_reported_as_tool_error() {
        let gw = RecordingGateway::new();
        gw.insert_issue(8, IssueState::Open, &["cursortoolset", "pending"], "");
        gw.fail_comments();
        let backend = Backend::new(IssueService::new(Box::new(gw.clone())));

        let err = CloseIssueTool
            .call(
                serde_json::json!({
                    "repo": "o/r",
                    "number": "8",
                    "result": "rejected",
                    "comment": "duplicate"
                }),
                &backend,
            )
            .unwrap_err();
        assert!(err.contains("issue #8 moved to 'rejected'"));
        assert_eq!(gw.issue(8).unwrap().state, IssueState::Closed);
    }

    #[test]
    fn unknown_result_is_rejected() {
        let gw = RecordingGateway::new();
        let backend = Backend::new(IssueService::new(Box::new(gw.clone())));
        let err = CloseIssueTool
            .call(
                serde_json::json!({"repo": "o/r", "number": "8", "result": "done"}),
                &backend,
            )
            .unwrap_err();
        assert!(err.contains("invalid result 'done'"));
        assert!(gw.calls().is_empty());
    }
}
