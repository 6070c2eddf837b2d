pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use brain_core::error::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let root = cli.root;
    match cli.command {
        Commands::Init { name, path } => handlers::handle_init(name, path),
        Commands::Use { name } => handlers::handle_use(name),
        Commands::Focus { project, clear } => handlers::handle_focus(project, clear),
        Commands::Add { text } => handlers::handle_add(root, text),
        Commands::Note { title, body } => handlers::handle_note(root, title, body),
        Commands::Dump => handlers::handle_dump(root),
        Commands::Refile { query, project } => handlers::handle_refile(root, query, project),
        Commands::Todo { all, project } => handlers::handle_todo(root, all, project),
        Commands::Status { query, status } => handlers::handle_status(root, query, status),
        Commands::Priority { query, value } => handlers::handle_priority(root, query, value),
        Commands::Due { query, value } => handlers::handle_due(root, query, value),
        Commands::Tag { query, tags } => handlers::handle_tag(root, query, tags),
        Commands::Untag { query, tags } => handlers::handle_untag(root, query, tags),
        Commands::Rm { query, yes } => handlers::handle_rm(root, query, yes),
        Commands::Projects => handlers::handle_projects(root),
        Commands::Project { name } => handlers::handle_project(root, name),
        Commands::Notes { project } => handlers::handle_notes(root, project),
    }
}
