mod accessor;
mod infra;
mod retry;

pub use accessor::*;
pub use infra::*;
pub use retry::*;
