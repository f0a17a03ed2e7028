mod api;
mod nimbus_api;

pub use api::*;
pub use nimbus_api::*;
pub use nimbus_domain::*;
pub use nimbus_infra::AwsClient;
