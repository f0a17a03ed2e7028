use std::sync::{Arc, RwLock};

use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::Credentials;
use nimbus_domain::{BuildError, CredentialSet, CredentialSource, Region, ServiceName};
use nimbus_services::ClientFactoryInfra;
use tracing::debug;

const CONFIG_FILE_PROVIDER: &str = "NimbusConfigFile";

/// Shared SDK configuration resolved for one service.
///
/// Service crates build their client from it, e.g.
/// `aws_sdk_s3::Client::new(client.sdk_config())`.
#[derive(Debug, Clone)]
pub struct AwsClient {
    service: ServiceName,
    source: CredentialSource,
    config: SdkConfig,
}

impl AwsClient {
    pub fn service(&self) -> &ServiceName {
        &self.service
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn region(&self) -> Option<Region> {
        self.config.region().map(|region| Region::new(region.as_ref()))
    }
}

/// Builds [`AwsClient`]s from `aws-config`.
///
/// Explicit credentials become a static credentials provider; otherwise the
/// SDK default chain is used. A region installed through
/// [`ClientFactoryInfra::set_default_region`] applies to every build whose
/// credentials carry no region of their own.
#[derive(Default)]
pub struct NimbusClientFactory {
    default_region: RwLock<Option<Region>>,
}

impl NimbusClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn default_region(&self) -> Option<Region> {
        self.default_region
            .read()
            .map(|region| region.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn source(&self, credentials: Option<&CredentialSet>) -> CredentialSource {
        match (credentials, self.default_region()) {
            (Some(_), _) => CredentialSource::ConfigFile,
            (None, Some(region)) => CredentialSource::DiscoveredRegion(region),
            (None, None) => CredentialSource::DefaultChain,
        }
    }

    async fn load(&self, credentials: Option<&CredentialSet>) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(credentials) = credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id(),
                credentials.secret_access_key(),
                None,
                None,
                CONFIG_FILE_PROVIDER,
            ));
        }

        let region = credentials
            .and_then(|credentials| credentials.region().cloned())
            .or_else(|| self.default_region());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }

        loader.load().await
    }
}

/// Rejects configurations no client could send requests with.
fn ensure_region(service: &ServiceName, config: SdkConfig) -> Result<SdkConfig, BuildError> {
    if config.region().is_none() {
        return Err(BuildError::missing_region(service));
    }
    Ok(config)
}

#[async_trait::async_trait]
impl ClientFactoryInfra for NimbusClientFactory {
    type Client = Arc<AwsClient>;

    async fn build_client(
        &self,
        service: &ServiceName,
        credentials: Option<&CredentialSet>,
    ) -> Result<Self::Client, BuildError> {
        let source = self.source(credentials);
        let config = ensure_region(service, self.load(credentials).await)?;
        debug!(service = %service, source = %source, region = ?config.region(), "Loaded SDK config");

        Ok(Arc::new(AwsClient { service: service.clone(), source, config }))
    }

    fn set_default_region(&self, region: Region) {
        match self.default_region.write() {
            Ok(mut guard) => *guard = Some(region),
            Err(poisoned) => *poisoned.into_inner() = Some(region),
        }
    }
}
