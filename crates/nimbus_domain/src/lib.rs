mod credentials;
mod env;
mod error;
mod retry_config;
mod service;

pub use credentials::*;
pub use env::*;
pub use error::*;
pub use retry_config::*;
pub use service::*;
