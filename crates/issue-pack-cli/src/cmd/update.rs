use crate::output::{print_json, transition_text};
use issue_pack_core::{
    request::{Args, Operation},
    service::Outcome,
};

#[derive(clap::Args)]
pub struct UpdateArgs {
    /// Issue number
    number: String,

    /// Target repository (owner/repo)
    #[arg(long, short = 'r')]
    repo: Option<String>,

    /// New status: pending or processing
    #[arg(long, short = 's')]
    status: Option<String>,

    /// Comment to post after the update
    #[arg(long, short = 'c')]
    comment: Option<String>,
}

pub fn run(conn: &super::Connection, args: UpdateArgs, json: bool) -> anyhow::Result<()> {
    let mut raw = Args::new().with("number", args.number);
    raw.insert_opt("repo", args.repo);
    raw.insert_opt("status", args.status);
    raw.insert_opt("comment", args.comment);

    match super::execute(conn, Operation::Update, &raw)? {
        Outcome::Transitioned(t) if json => print_json(&t),
        Outcome::Transitioned(t) => {
            print!("{}", transition_text(&t));
            Ok(())
        }
        other => anyhow::bail!("unexpected outcome for update: {other:?}"),
    }
}
