use super::IssueTool;
use crate::output::render_text;
use issue_pack_core::{request::Operation, service::Outcome};

pub struct UpdateIssueTool;

impl IssueTool for UpdateIssueTool {
    fn operation(&self) -> Operation {
        Operation::Update
    }

    fn render(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Transitioned(t) => {
                format!("Issue #{} status updated to {}", t.number, t.status)
            }
            other => render_text(other),
        }
    }
}
