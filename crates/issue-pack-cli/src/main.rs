mod cmd;
mod output;
mod tools;

use clap::{Parser, Subcommand};
use cmd::{
    close::CloseArgs, create::CreateArgs, get::GetArgs, list::ListArgs, update::UpdateArgs,
    Connection,
};
use issue_pack_core::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "github-issue",
    about = "Create and manage standardized GitHub issues whose payload lives in a gist",
    version,
    propagate_version = true
)]
struct Cli {
    /// GitHub token (default: GITHUB_TOKEN, then `gh auth token`)
    #[arg(long, global = true)]
    token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, global = true, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "GITHUB_ISSUE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an issue; the full payload is packed into a secret gist
    Create(CreateArgs),

    /// List standardized issues in a repository
    List(ListArgs),

    /// Show an issue together with its package
    Get(GetArgs),

    /// Move an issue to pending or processing
    Update(UpdateArgs),

    /// Close an issue as success or rejected
    Close(CloseArgs),

    /// Run as an MCP stdio server
    Serve,

    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout carries command output and JSON-RPC responses; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let conn = Connection {
        token: cli.token,
        api_url: cli.api_url,
        timeout: Duration::from_secs(cli.timeout),
    };

    let result = match cli.command {
        Commands::Create(args) => cmd::create::run(&conn, args, cli.json),
        Commands::List(args) => cmd::list::run(&conn, args, cli.json),
        Commands::Get(args) => cmd::get::run(&conn, args, cli.json),
        Commands::Update(args) => cmd::update::run(&conn, args, cli.json),
        Commands::Close(args) => cmd::close::run(&conn, args, cli.json),
        Commands::Serve => cmd::serve::run(&conn),
        Commands::Version => {
            println!("github-issue-pack v{}", issue_pack_core::VERSION);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
