use nimbus_domain::{BuildError, CredentialSet, Environment, Region, ServiceName};

pub trait EnvironmentInfra: Send + Sync {
    fn get_environment(&self) -> Environment;
}

/// Reads explicit credentials from the local configuration file.
///
/// Absence is never an error: a missing file, a missing `[aws]` section or a
/// missing key all resolve to `None`.
pub trait CredentialConfigInfra: Send + Sync {
    fn resolve_local_credentials(&self) -> Option<CredentialSet>;
}

/// Session token issued by the instance metadata service.
#[derive(Clone, PartialEq, Eq)]
pub struct MetadataToken(String);

impl MetadataToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for MetadataToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MetadataToken([REDACTED])")
    }
}

/// Client for the instance metadata service reachable from inside a compute
/// instance.
#[async_trait::async_trait]
pub trait InstanceMetadataInfra: Send + Sync {
    /// Requests a session token.
    async fn fetch_token(&self) -> anyhow::Result<MetadataToken>;

    /// Reads the region the instance runs in.
    async fn fetch_region(&self, token: &MetadataToken) -> anyhow::Result<Region>;
}

/// Builds service clients on behalf of the accessor.
#[async_trait::async_trait]
pub trait ClientFactoryInfra: Send + Sync {
    /// Handle returned to callers. Clones must refer to the same client.
    type Client: Clone + Send + Sync + 'static;

    /// Builds a client for `service`, using `credentials` when given and the
    /// ambient credential chain otherwise.
    async fn build_client(
        &self,
        service: &ServiceName,
        credentials: Option<&CredentialSet>,
    ) -> Result<Self::Client, BuildError>;

    /// Sets the region used by every later build that does not carry its own.
    fn set_default_region(&self, region: Region);
}
