use crate::output::{print_json, transition_text};
use issue_pack_core::{
    request::{Args, Operation},
    service::Outcome,
};

#[derive(clap::Args)]
pub struct CloseArgs {
    /// Issue number
    number: String,

    /// Target repository (owner/repo)
    #[arg(long, short = 'r')]
    repo: Option<String>,

    /// Processing result: success or rejected
    #[arg(long)]
    result: Option<String>,

    /// Closing note
    #[arg(long, short = 'c')]
    comment: Option<String>,
}

pub fn run(conn: &super::Connection, args: CloseArgs, json: bool) -> anyhow::Result<()> {
    let mut raw = Args::new().with("number", args.number);
    raw.insert_opt("repo", args.repo);
    raw.insert_opt("result", args.result);
    raw.insert_opt("comment", args.comment);

    match super::execute(conn, Operation::Close, &raw)? {
        Outcome::Transitioned(t) if json => print_json(&t),
        Outcome::Transitioned(t) => {
            print!("{}", transition_text(&t));
            Ok(())
        }
        other => anyhow::bail!("unexpected outcome for close: {other:?}"),
    }
}
