use crate::output::{print_json, print_table, summary_rows, SUMMARY_HEADERS};
use issue_pack_core::{
    request::{Args, Operation},
    service::Outcome,
};

#[derive(clap::Args)]
pub struct ListArgs {
    /// Target repository (owner/repo)
    #[arg(long, short = 'r')]
    repo: Option<String>,

    /// pending, processing, processed, rejected, all (default: pending)
    #[arg(long, short = 's')]
    status: Option<String>,

    /// Only issues of this type
    #[arg(long = "type", short = 't')]
    issue_type: Option<String>,

    /// Maximum number of issues, 1-100 (default: 20)
    #[arg(long, short = 'l')]
    limit: Option<String>,
}

pub fn run(conn: &super::Connection, args: ListArgs, json: bool) -> anyhow::Result<()> {
    let mut raw = Args::new();
    raw.insert_opt("repo", args.repo);
    raw.insert_opt("status", args.status);
    raw.insert_opt("type", args.issue_type);
    raw.insert_opt("limit", args.limit);

    let items = match super::execute(conn, Operation::List, &raw)? {
        Outcome::Listed(items) => items,
        other => anyhow::bail!("unexpected outcome for list: {other:?}"),
    };

    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("No matching issues found");
        return Ok(());
    }
    print_table(SUMMARY_HEADERS, summary_rows(&items));
    Ok(())
}
