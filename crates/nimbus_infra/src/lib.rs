mod credentials_file;
mod env;
mod error;
mod metadata;
mod nimbus_infra;
mod sdk_factory;

pub use credentials_file::NimbusCredentialsFile;
pub use env::NimbusEnvironmentInfra;
pub use error::MetadataError;
pub use metadata::NimbusMetadataInfra;
pub use nimbus_infra::*;
pub use sdk_factory::{AwsClient, NimbusClientFactory};
