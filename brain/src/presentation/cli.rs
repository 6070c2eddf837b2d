use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "brain: plain-text capture inbox and project tasks", long_about = None)]
pub struct Cli {
    /// Workspace root; bypasses the config file
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a workspace, make it active and create its dump
    Init { name: String, path: PathBuf },

    /// Switch the active workspace
    Use { name: String },

    /// Show, set or clear the focused project
    Focus {
        project: Option<String>,
        #[arg(long, conflicts_with = "project")]
        clear: bool,
    },

    /// Capture a task into the dump
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Capture a note into the dump
    Note {
        title: String,
        /// body line (repeatable)
        #[arg(long)]
        body: Vec<String>,
    },

    /// List dump items waiting to be refiled
    Dump,

    /// Move a dump item into a project (defaults to the focused project)
    Refile {
        query: String,
        project: Option<String>,
    },

    /// List tasks across projects
    Todo {
        /// include done tasks
        #[arg(long)]
        all: bool,
        #[arg(long)]
        project: Option<String>,
    },

    /// Set a task's status: open, in-progress, blocked or done
    Status { query: String, status: String },

    /// Set a task's priority: 1, 2, 3 or none
    Priority { query: String, value: String },

    /// Set a task's due date (YYYY-MM-DD) or `clear` it
    Due { query: String, value: String },

    /// Add tags to a task
    Tag {
        query: String,
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Remove tags from a task
    Untag {
        query: String,
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Delete a task line
    Rm {
        query: String,
        /// skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// List projects with task and repository counts
    Projects,

    /// Create a project
    Project { name: String },

    /// List a project's notes, newest first (defaults to the focused project)
    Notes { project: Option<String> },
}
