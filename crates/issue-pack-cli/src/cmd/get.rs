use crate::output::{detail_text, print_json};
use anyhow::Context;
use issue_pack_core::{
    request::{Args, Operation},
    service::Outcome,
};
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct GetArgs {
    /// Issue number
    number: String,

    /// Target repository (owner/repo)
    #[arg(long, short = 'r')]
    repo: Option<String>,

    /// Write the issue and package as JSON to this file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

pub fn run(conn: &super::Connection, args: GetArgs, json: bool) -> anyhow::Result<()> {
    let mut raw = Args::new().with("number", args.number);
    raw.insert_opt("repo", args.repo);

    let detail = match super::execute(conn, Operation::Get, &raw)? {
        Outcome::Fetched(detail) => detail,
        other => anyhow::bail!("unexpected outcome for get: {other:?}"),
    };

    if let Some(path) = &args.output {
        let data = serde_json::to_string_pretty(&detail)?;
        std::fs::write(path, data)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved to {}", path.display());
        return Ok(());
    }

    if json {
        print_json(&detail)
    } else {
        print!("{}", detail_text(&detail));
        Ok(())
    }
}
