#![forbid(unsafe_code)]

pub mod error;
pub mod domain;
pub mod config;
pub mod brain;

pub mod util {
    pub mod ident;
    pub mod lines;
    pub mod today;
}

pub mod codec;

pub mod persist {
    pub mod append;
    pub mod atomic;
    pub mod lock;
}

pub mod dump;

pub mod todo {
    pub mod lookup;
    pub mod mutate;
    pub mod store;
}

pub mod notes;
pub mod projects;
pub mod refile;

// Re-exports: stable API surface
pub use brain::Brain;
pub use domain::{DumpItem, ItemKind, NoteFile, ProjectInfo, Status, TodoItem};
pub use dump::parse_dump;
pub use persist::atomic::atomic_write;
pub use persist::lock::{LockOptions, with_lock};
pub use refile::refile;
pub use todo::lookup::{Lookup, resolve};
pub use todo::store::{parse_all, parse_file};
pub use util::ident::generate_id;
