mod cli;
mod logging;

pub use cli::*;
pub use logging::*;
