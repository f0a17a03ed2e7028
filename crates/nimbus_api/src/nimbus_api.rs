use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use nimbus_infra::{AwsClient, NimbusInfra};
use nimbus_services::{
    ClientAccessor, ClientFactoryInfra, CredentialConfigInfra, EnvironmentInfra,
    InstanceMetadataInfra, RetryPolicy,
};
use tokio::sync::OnceCell;

use crate::*;

pub struct NimbusApi<F: ClientFactoryInfra> {
    accessor: Arc<ClientAccessor<F>>,
    infra: Arc<F>,
}

impl<F: ClientFactoryInfra + EnvironmentInfra> NimbusApi<F> {
    pub fn new(infra: Arc<F>) -> Self {
        let retry = RetryPolicy::new(infra.get_environment().retry_config);
        Self { accessor: Arc::new(ClientAccessor::new(infra.clone(), retry)), infra }
    }
}

impl NimbusApi<NimbusInfra> {
    /// Wires the accessor to the real config file, SDK and metadata service.
    pub fn init(config_path: Option<PathBuf>) -> Result<Self> {
        let infra = Arc::new(NimbusInfra::new(config_path)?);
        Ok(Self::new(infra))
    }
}

#[async_trait::async_trait]
impl<F> API for NimbusApi<F>
where
    F: ClientFactoryInfra + CredentialConfigInfra + InstanceMetadataInfra + EnvironmentInfra,
{
    type Client = F::Client;

    async fn get_client(&self, service: ServiceName) -> Result<Self::Client> {
        self.accessor.get_client(&service).await
    }

    fn cached_services(&self) -> Vec<ServiceName> {
        self.accessor.cached_services()
    }

    fn environment(&self) -> Environment {
        self.infra.get_environment()
    }
}

static DEFAULT_API: OnceCell<NimbusApi<NimbusInfra>> = OnceCell::const_new();

/// Returns the client for `service_name` from the process-wide accessor.
///
/// The accessor is created on first call using the default config location
/// (or `NIMBUS_CONFIG_PATH`). A failed initialization is returned and retried
/// on the next call.
pub async fn get_client(service_name: impl Into<ServiceName>) -> Result<Arc<AwsClient>> {
    let api = DEFAULT_API
        .get_or_try_init(|| async { NimbusApi::init(None) })
        .await?;
    api.get_client(service_name.into()).await
}
