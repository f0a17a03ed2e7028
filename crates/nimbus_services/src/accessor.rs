use std::sync::Arc;

use dashmap::DashMap;
use nimbus_domain::{BuildError, ServiceName};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{ClientFactoryInfra, CredentialConfigInfra, InstanceMetadataInfra, RetryPolicy};

/// Hands out one client per service name, building it on first use.
///
/// A build resolves credentials from the local config file, falls back to
/// the ambient credential chain, and as a last resort discovers the region
/// from instance metadata. The whole build is retried according to the
/// [`RetryPolicy`]. Successful builds are kept for the lifetime of the
/// accessor; failed builds leave nothing behind.
pub struct ClientAccessor<F: ClientFactoryInfra> {
    infra: Arc<F>,
    retry: RetryPolicy,
    clients: DashMap<ServiceName, Arc<OnceCell<F::Client>>>,
}

impl<F: ClientFactoryInfra> ClientAccessor<F> {
    pub fn new(infra: Arc<F>, retry: RetryPolicy) -> Self {
        Self { infra, retry, clients: DashMap::new() }
    }

    /// Returns the client already built for `service`, if any.
    pub fn cached(&self, service: &ServiceName) -> Option<F::Client> {
        self.clients
            .get(service)
            .and_then(|cell| cell.value().get().cloned())
    }

    /// Service names with a successfully built client.
    pub fn cached_services(&self) -> Vec<ServiceName> {
        let mut services: Vec<ServiceName> = self
            .clients
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| entry.key().clone())
            .collect();
        services.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        services
    }

    // The DashMap guard is released before awaiting on the cell.
    fn cell(&self, service: &ServiceName) -> Arc<OnceCell<F::Client>> {
        Arc::clone(
            &self
                .clients
                .entry(service.clone())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }
}

impl<F> ClientAccessor<F>
where
    F: ClientFactoryInfra + CredentialConfigInfra + InstanceMetadataInfra,
{
    /// Returns the client for `service`, building it if no call has
    /// succeeded yet.
    ///
    /// Concurrent callers asking for the same service wait for a single
    /// build. After all attempts fail, the last attempt's error is returned
    /// unchanged.
    pub async fn get_client(&self, service: &ServiceName) -> anyhow::Result<F::Client> {
        if let Some(client) = self.cached(service) {
            return Ok(client);
        }

        let cell = self.cell(service);
        let client = cell
            .get_or_try_init(|| self.retry.execute(|| self.build(service)))
            .await?
            .clone();
        Ok(client)
    }

    async fn build(&self, service: &ServiceName) -> anyhow::Result<F::Client> {
        let credentials = self.infra.resolve_local_credentials();

        match self.infra.build_client(service, credentials.as_ref()).await {
            Ok(client) => {
                if credentials.is_some() {
                    info!(service = %service, "Using AWS credentials from config file");
                } else {
                    info!(service = %service, "Using default AWS credential chain");
                }
                Ok(client)
            }
            Err(BuildError::MissingRegion { .. }) => {
                info!(service = %service, "No region configured, asking instance metadata");
                self.repair(service).await
            }
            Err(BuildError::Construction(err)) => {
                warn!(service = %service, error = %err, "Client construction failed, asking instance metadata for the region");
                self.repair(service).await
            }
        }
    }

    /// Discovers the region from instance metadata, installs it as the
    /// default region and builds again with the ambient chain.
    async fn repair(&self, service: &ServiceName) -> anyhow::Result<F::Client> {
        let token = self.infra.fetch_token().await?;
        let region = self.infra.fetch_region(&token).await?;
        self.infra.set_default_region(region.clone());
        info!(service = %service, region = %region, "Automatically set region");

        Ok(self.infra.build_client(service, None).await?)
    }
}
