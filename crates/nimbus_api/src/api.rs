use anyhow::Result;

use crate::*;

#[async_trait::async_trait]
pub trait API: Sync + Send {
    /// Handle returned for a service
    type Client: Send;

    /// Returns the client for a service, building it on first use
    async fn get_client(&self, service: ServiceName) -> Result<Self::Client>;

    /// Lists the services a client has been built for
    fn cached_services(&self) -> Vec<ServiceName>;

    /// Returns the current environment
    fn environment(&self) -> Environment;
}
