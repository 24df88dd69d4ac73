use issue_pack_core::service::{
    CreateOutcome, IssueDetail, IssueSummary, Outcome, Transition,
};
use serde::Serialize;

pub const TITLE_WIDTH: usize = 40;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", format_table(headers, &rows));
}

pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers.iter().map(|h| h.to_string()).collect());
    out.push_str(&line(widths.iter().map(|&w| "-".repeat(w)).collect()));
    for row in rows {
        out.push_str(&line(row.clone()));
    }
    out
}

/// Shorten `s` to at most `max` characters, ending in `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub fn summary_rows(items: &[IssueSummary]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|i| {
            vec![
                i.number.to_string(),
                i.issue_type.map(|t| t.to_string()).unwrap_or_default(),
                i.status.map(|s| s.to_string()).unwrap_or_default(),
                truncate(&i.title, TITLE_WIDTH),
                i.created_at.clone(),
            ]
        })
        .collect()
}

pub const SUMMARY_HEADERS: &[&str] = &["#", "TYPE", "STATUS", "TITLE", "CREATED"];

pub fn create_text(outcome: &CreateOutcome) -> String {
    match outcome {
        CreateOutcome::Created(c) => format!(
            "Issue created\n   Issue: {}\n   Gist:  {}\n",
            c.issue_url, c.gist_url
        ),
        CreateOutcome::DryRun(p) => {
            let package = p
                .package_json()
                .unwrap_or_else(|e| format!("<package could not be encoded: {e}>"));
            format!(
                "Dry run: nothing was created\n\
                 Repo:   {}\n\
                 Title:  {}\n\
                 Labels: {}\n\
                 Gist:   {} ({})\n\
                 \n\
                 {}\n",
                p.repo,
                p.title,
                p.labels.join(", "),
                p.gist_description,
                p.gist_files.join(", "),
                package
            )
        }
    }
}

pub fn detail_text(detail: &IssueDetail) -> String {
    let issue = &detail.issue;
    let mut out = format!(
        "Issue #{}: {}\nState:   {}\nURL:     {}\nCreated: {}\n",
        issue.number,
        issue.title,
        issue.state,
        issue.html_url,
        issue.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    let labels = issue.label_names();
    if !labels.is_empty() {
        out.push_str(&format!("Labels:  {}\n", labels.join(", ")));
    }

    let Some(package) = &detail.package else {
        if let Some(url) = &detail.gist_url {
            out.push_str(&format!("\nPackage unavailable ({url})\n"));
        }
        return out;
    };

    out.push_str("\n--- Package ---\n");
    out.push_str(&format!("Type:   {}\n", package.issue_type));
    out.push_str(&format!("Schema: {}\n", package.schema));
    if let Some(packed) = package.created_at() {
        out.push_str(&format!("Packed: {}\n", packed.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(project) = &package.meta.source_project {
        out.push_str(&format!("Source: {project}\n"));
    }
    match package.typed_payload() {
        Ok(typed) => {
            for (label, value) in typed.summary() {
                out.push_str(&format!("{label}: {value}\n"));
            }
        }
        Err(e) => tracing::debug!(error = %e, "showing raw payload"),
    }
    let payload = serde_json::to_string_pretty(&package.payload)
        .unwrap_or_else(|_| package.payload.to_string());
    out.push_str(&format!("\nPayload:\n{payload}\n"));
    for attachment in &package.attachments {
        out.push_str(&format!(
            "Attachment: {} ({} bytes)\n",
            attachment.name,
            attachment.content.len()
        ));
    }
    out
}

pub fn transition_text(t: &Transition) -> String {
    format!("Issue #{} is now {} ({})\n", t.number, t.status, t.state)
}

/// Plain-text rendering of any outcome.
pub fn render_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created(c) => create_text(c),
        Outcome::Listed(items) if items.is_empty() => "No matching issues found\n".to_string(),
        Outcome::Listed(items) => format_table(SUMMARY_HEADERS, &summary_rows(items)),
        Outcome::Fetched(detail) => detail_text(detail),
        Outcome::Transitioned(t) => transition_text(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_titles() {
        assert_eq!(truncate("short", 40), "short");
        assert_eq!(truncate(&"a".repeat(40), 40), "a".repeat(40));
    }

    #[test]
    fn truncate_cuts_long_titles_to_width() {
        let long = "x".repeat(41);
        let cut = truncate(&long, 40);
        assert_eq!(cut.chars().count(), 40);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let title = "问题".repeat(25);
        let cut = truncate(&title, 40);
        assert_eq!(cut.chars().count(), 40);
    }

    #[test]
    fn table_aligns_columns() {
        let table = format_table(
            &["#", "TITLE"],
            &[
                vec!["1".into(), "first".into()],
                vec!["12".into(), "second".into()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "#   TITLE");
        assert_eq!(lines[1], "--  ------");
        assert_eq!(lines[2], "1   first");
        assert_eq!(lines[3], "12  second");
    }
}
