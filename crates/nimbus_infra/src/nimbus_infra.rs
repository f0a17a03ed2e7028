use std::path::PathBuf;
use std::sync::Arc;

use nimbus_domain::{BuildError, CredentialSet, Environment, Region, ServiceName};
use nimbus_services::{
    ClientFactoryInfra, CredentialConfigInfra, EnvironmentInfra, InstanceMetadataInfra,
    MetadataToken,
};

use crate::credentials_file::NimbusCredentialsFile;
use crate::env::NimbusEnvironmentInfra;
use crate::metadata::NimbusMetadataInfra;
use crate::sdk_factory::{AwsClient, NimbusClientFactory};

#[derive(Clone)]
pub struct NimbusInfra {
    environment: Arc<NimbusEnvironmentInfra>,
    credentials_file: Arc<NimbusCredentialsFile>,
    metadata: Arc<NimbusMetadataInfra>,
    client_factory: Arc<NimbusClientFactory>,
}

impl NimbusInfra {
    pub fn new(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let environment = Arc::new(NimbusEnvironmentInfra::new(config_path));
        let env = environment.get_environment();

        Ok(Self {
            credentials_file: Arc::new(NimbusCredentialsFile::new(env.config_path.clone())),
            metadata: Arc::new(NimbusMetadataInfra::new(env.metadata.clone())?),
            client_factory: Arc::new(NimbusClientFactory::new()),
            environment,
        })
    }
}

impl EnvironmentInfra for NimbusInfra {
    fn get_environment(&self) -> Environment {
        self.environment.get_environment()
    }
}

impl CredentialConfigInfra for NimbusInfra {
    fn resolve_local_credentials(&self) -> Option<CredentialSet> {
        self.credentials_file.resolve_local_credentials()
    }
}

#[async_trait::async_trait]
impl InstanceMetadataInfra for NimbusInfra {
    async fn fetch_token(&self) -> anyhow::Result<MetadataToken> {
        self.metadata.fetch_token().await
    }

    async fn fetch_region(&self, token: &MetadataToken) -> anyhow::Result<Region> {
        self.metadata.fetch_region(token).await
    }
}

#[async_trait::async_trait]
impl ClientFactoryInfra for NimbusInfra {
    type Client = Arc<AwsClient>;

    async fn build_client(
        &self,
        service: &ServiceName,
        credentials: Option<&CredentialSet>,
    ) -> Result<Self::Client, BuildError> {
        self.client_factory.build_client(service, credentials).await
    }

    fn set_default_region(&self, region: Region) {
        self.client_factory.set_default_region(region)
    }
}
