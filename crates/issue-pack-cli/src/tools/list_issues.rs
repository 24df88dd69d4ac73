use super::IssueTool;
use crate::output::render_text;
use issue_pack_core::{request::Operation, service::Outcome};
use std::fmt::Write;

pub struct ListIssuesTool;

impl IssueTool for ListIssuesTool {
    fn operation(&self) -> Operation {
        Operation::List
    }

    fn render(&self, outcome: &Outcome) -> String {
        let Outcome::Listed(items) = outcome else {
            return render_text(outcome);
        };
        if items.is_empty() {
            return "No matching issues found".to_string();
        }
        let mut text = format!("Found {} issues:\n\n", items.len());
        for item in items {
            let _ = writeln!(
                text,
                "- #{} [{}] {} ({})\n  {}",
                item.number,
                item.status.map(|s| s.to_string()).unwrap_or_default(),
                item.title,
                item.issue_type.map(|t| t.to_string()).unwrap_or_default(),
                item.url
            );
        }
        text
    }
}
