mod cmd;
mod root;

use cadence_core::context::Invocation;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cadence",
    about = "Workflow runner that feeds staged delivery prompts to an AI coding assistant",
    version
)]
struct Cli {
    /// Workflow command ID, or `continue`, `status`, `init`
    command: String,

    /// Feature ID (e.g. F01); defaults to the first active feature
    #[arg(long)]
    feature: Option<String>,

    /// Task ID (e.g. T01) for task-scoped commands
    #[arg(long)]
    task: Option<String>,

    /// Free-text refinement request for the update commands
    #[arg(long)]
    request: Option<String>,

    /// Deploy target path
    #[arg(long)]
    target: Option<String>,

    /// Project root (default: auto-detect from .cadence/ or .git/)
    #[arg(long, env = "CADENCE_ROOT")]
    root: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command.as_str() {
        "init" => cmd::init::run(&root),
        "status" => cmd::status::run(&root),
        command => {
            let args = Invocation {
                feature: cli.feature,
                task: cli.task,
                request: cli.request,
                target: cli.target,
            };
            cmd::run::run(&root, command, args)
        }
    };

    if let Err(e) = result {
        // Full chain; stdout stays reserved for rendered output
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
