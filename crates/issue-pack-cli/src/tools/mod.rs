use issue_pack_core::{
    request::{Args, Operation, Request},
    service::{CreateOutcome, IssueService, Outcome},
};
use serde_json::Value;

pub mod close_issue;
pub mod create_issue;
pub mod get_issue;
pub mod list_issues;
pub mod update_issue;

/// The service a tool call runs against.
///
/// Credentials are resolved once when the server starts; when that fails
/// every call that passes validation reports the same error.
pub struct Backend {
    service: Result<IssueService, String>,
}

impl Backend {
    pub fn new(service: IssueService) -> Self {
        Self {
            service: Ok(service),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            service: Err(reason.into()),
        }
    }

    fn service(&self) -> Result<&IssueService, String> {
        self.service.as_ref().map_err(Clone::clone)
    }
}

pub trait IssueTool: Send + Sync {
    fn operation(&self) -> Operation;

    /// Text returned to the client on success.
    fn render(&self, outcome: &Outcome) -> String;

    fn name(&self) -> &str {
        self.operation().tool_name()
    }

    fn description(&self) -> &str {
        self.operation().description()
    }

    fn schema(&self) -> Value {
        input_schema(self.operation())
    }

    fn call(&self, args: Value, backend: &Backend) -> Result<String, String> {
        let raw = Args::from_json(&args).map_err(|e| e.to_string())?;
        let request = Request::parse(self.operation(), &raw).map_err(|e| e.to_string())?;
        let outcome = match request {
            Request::Create(req) if req.dry_run => IssueService::preview(req)
                .map(|p| Outcome::Created(CreateOutcome::DryRun(p)))
                .map_err(|e| e.to_string())?,
            request => backend
                .service()?
                .execute(request)
                .map_err(|e| e.to_string())?,
        };
        Ok(self.render(&outcome))
    }
}

/// JSON schema for an operation's parameters. Every value is a string.
pub fn input_schema(operation: Operation) -> Value {
    let mut properties = serde_json::Map::new();
    for param in operation.params() {
        let mut prop = serde_json::json!({
            "type": "string",
            "description": param.description,
        });
        if let Some(allowed) = param.allowed {
            prop["enum"] = serde_json::json!(allowed);
        }
        properties.insert(param.name.to_string(), prop);
    }
    let required: Vec<&str> = operation.required_params().collect();
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

pub fn all_tools() -> Vec<Box<dyn IssueTool>> {
    vec![
        Box::new(create_issue::CreateIssueTool),
        Box::new(list_issues::ListIssuesTool),
        Box::new(get_issue::GetIssueTool),
        Box::new(update_issue::UpdateIssueTool),
        Box::new(close_issue::CloseIssueTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use issue_pack_core::testing::RecordingGateway;

    #[test]
    fn schema_lists_required_params_and_enums() {
        let schema = input_schema(Operation::Close);
        assert_eq!(schema["type"], "object");
        assert_eq!(
            schema["required"],
            serde_json::json!(["repo", "number", "result"])
        );
        assert_eq!(
            schema["properties"]["result"]["enum"],
            serde_json::json!(["success", "rejected"])
        );
        assert_eq!(schema["properties"]["comment"]["type"], "string");
        assert!(schema["properties"]["comment"].get("enum").is_none());
    }

    #[test]
    fn every_tool_has_a_unique_name() {
        let tools = all_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
        assert!(names.iter().all(|n| n.starts_with("github_issue_")));
    }

    #[test]
    fn unavailable_backend_reports_reason_after_validation() {
        let backend = Backend::unavailable("no GitHub token");
        let tool = get_issue::GetIssueTool;

        let err = tool
            .call(serde_json::json!({"repo": "o/r", "number": "3"}), &backend)
            .unwrap_err();
        assert_eq!(err, "no GitHub token");

        // Validation still runs first.
        let err = tool
            .call(serde_json::json!({"repo": "o/r", "number": "x"}), &backend)
            .unwrap_err();
        assert!(err.contains("invalid issue number"));
    }

    #[test]
    fn dry_run_works_without_credentials() {
        let backend = Backend::unavailable("no GitHub token");
        let text = create_issue::CreateIssueTool
            .call(
                serde_json::json!({
                    "repo": "o/r",
                    "type": "question",
                    "title": "How?",
                    "dry_run": "true"
                }),
                &backend,
            )
            .unwrap();
        assert!(text.contains("Dry run"));
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let gw = RecordingGateway::new();
        let backend = Backend::new(IssueService::new(Box::new(gw.clone())));
        let err = list_issues::ListIssuesTool
            .call(serde_json::json!(["o/r"]), &backend)
            .unwrap_err();
        assert!(err.contains("arguments"));
        assert!(gw.calls().is_empty());
    }
}
