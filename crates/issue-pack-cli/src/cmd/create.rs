use crate::output::{create_text, print_json};
use anyhow::Context;
use issue_pack_core::{
    package::Attachment,
    request::{Args, Operation, Request},
    service::{CreateOutcome, IssueService, Outcome},
};
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Target repository (owner/repo)
    #[arg(long, short = 'r')]
    repo: Option<String>,

    /// feature-request, bug-report, question, pack-register, pack-sync, custom
    #[arg(long = "type", short = 't')]
    issue_type: Option<String>,

    /// Issue title
    #[arg(long)]
    title: Option<String>,

    /// JSON file with the detailed payload
    #[arg(long, short = 'p')]
    payload: Option<PathBuf>,

    /// File to attach to the gist (repeatable)
    #[arg(long = "attach", short = 'a')]
    attach: Vec<PathBuf>,

    /// Target pack name
    #[arg(long)]
    pack: Option<String>,

    /// Target pack version
    #[arg(long)]
    pack_version: Option<String>,

    /// Project the request originates from
    #[arg(long)]
    source_project: Option<String>,

    /// Show what would be created without calling GitHub
    #[arg(long)]
    dry_run: bool,
}

pub fn run(conn: &super::Connection, args: CreateArgs, json: bool) -> anyhow::Result<()> {
    let mut raw = Args::new();
    raw.insert_opt("repo", args.repo);
    raw.insert_opt("type", args.issue_type);
    raw.insert_opt("title", args.title);
    raw.insert_opt("pack", args.pack);
    raw.insert_opt("pack_version", args.pack_version);
    raw.insert_opt("source_project", args.source_project);
    if let Some(path) = &args.payload {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload file {}", path.display()))?;
        raw.insert("payload", text);
    }
    if args.dry_run {
        raw.insert("dry_run", "true");
    }

    let mut request = Request::parse(Operation::Create, &raw)?;
    if let Request::Create(req) = &mut request {
        req.attachments = read_attachments(&args.attach)?;
    }

    let outcome = match request {
        Request::Create(req) if req.dry_run => CreateOutcome::DryRun(IssueService::preview(req)?),
        request => match super::execute_request(conn, request)? {
            Outcome::Created(outcome) => outcome,
            other => anyhow::bail!("unexpected outcome for create: {other:?}"),
        },
    };

    if json {
        print_json(&outcome)?;
    } else {
        print!("{}", create_text(&outcome));
    }
    Ok(())
}

/// Each file becomes one attachment named after its file name.
fn read_attachments(paths: &[PathBuf]) -> anyhow::Result<Vec<Attachment>> {
    paths.iter().map(|p| read_attachment(p)).collect()
}

fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("attachment path has no file name: {}", path.display()))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read attachment {}", path.display()))?;
    Ok(Attachment {
        name: name.to_string(),
        content,
    })
}
