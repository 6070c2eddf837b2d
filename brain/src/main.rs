mod application;
mod presentation {
    pub mod cli;
}

use brain_core::error::Result;

fn main() -> Result<()> {
    application::run()
}
