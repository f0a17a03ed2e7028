use std::time::Duration;

use anyhow::Context;
use nimbus_domain::{MetadataConfig, Region};
use nimbus_services::{InstanceMetadataInfra, MetadataToken};
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::MetadataError;

const TOKEN_PATH: &str = "latest/api/token";
const REGION_PATH: &str = "latest/meta-data/placement/region";
const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";

/// IMDSv2 client: a session token is requested with `PUT`, then presented on
/// every `GET`.
pub struct NimbusMetadataInfra {
    client: Client,
    config: MetadataConfig,
}

impl NimbusMetadataInfra {
    pub fn new(config: MetadataConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            // The link-local endpoint must never be reached through a proxy.
            .no_proxy()
            .build()
            .context("Failed to build instance metadata HTTP client")?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &'static str) -> Result<Url, MetadataError> {
        self.config
            .endpoint
            .join(path)
            .map_err(|source| MetadataError::InvalidUrl { path, source })
    }

    /// Sends the request and returns the trimmed, non-empty response body.
    async fn execute_request<F>(
        &self,
        method: &'static str,
        url: &Url,
        request_builder: F,
    ) -> Result<String, MetadataError>
    where
        F: FnOnce(&Client) -> reqwest::RequestBuilder,
    {
        debug!(method, url = %url, "Instance metadata request");

        let transport = |source| MetadataError::Transport {
            method,
            url: url.to_string(),
            source,
        };

        let response = request_builder(&self.client)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        let body = body.trim();
        if body.is_empty() {
            return Err(MetadataError::EmptyBody { method, url: url.to_string() });
        }

        Ok(body.to_string())
    }
}

#[async_trait::async_trait]
impl InstanceMetadataInfra for NimbusMetadataInfra {
    async fn fetch_token(&self) -> anyhow::Result<MetadataToken> {
        let url = self.url(TOKEN_PATH)?;
        let ttl = self.config.token_ttl_secs.to_string();
        let token = self
            .execute_request("PUT", &url, |client| {
                client.put(url.clone()).header(TOKEN_TTL_HEADER, ttl)
            })
            .await?;

        Ok(MetadataToken::new(token))
    }

    async fn fetch_region(&self, token: &MetadataToken) -> anyhow::Result<Region> {
        let url = self.url(REGION_PATH)?;
        let region = self
            .execute_request("GET", &url, |client| {
                client.get(url.clone()).header(TOKEN_HEADER, token.as_str())
            })
            .await?;

        Ok(Region::from(region))
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    use super::*;

    fn fixture_infra(server: &Server) -> NimbusMetadataInfra {
        let config = MetadataConfig::default().endpoint(Url::parse(&server.url()).unwrap());
        NimbusMetadataInfra::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_token_requests_six_hour_ttl() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/latest/api/token")
            .match_header("x-aws-ec2-metadata-token-ttl-seconds", "21600")
            .with_body("AQAEAtoken==\n")
            .create_async()
            .await;

        let actual = fixture_infra(&server).fetch_token().await.unwrap();

        assert_eq!(actual, MetadataToken::new("AQAEAtoken=="));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_region_presents_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/latest/meta-data/placement/region")
            .match_header("x-aws-ec2-metadata-token", "secret-token")
            .with_body("us-west-2")
            .create_async()
            .await;

        let actual = fixture_infra(&server)
            .fetch_region(&MetadataToken::new("secret-token"))
            .await
            .unwrap();

        assert_eq!(actual, Region::new("us-west-2"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", "/latest/api/token")
            .with_status(403)
            .create_async()
            .await;

        let actual = fixture_infra(&server).fetch_token().await.unwrap_err();

        let status = actual
            .downcast_ref::<MetadataError>()
            .map(|err| matches!(err, MetadataError::Status { status: 403, .. }));
        assert_eq!(status, Some(true));
    }

    #[tokio::test]
    async fn test_empty_region_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/latest/meta-data/placement/region")
            .match_header("x-aws-ec2-metadata-token", Matcher::Any)
            .with_body("  \n")
            .create_async()
            .await;

        let actual = fixture_infra(&server)
            .fetch_region(&MetadataToken::new("token"))
            .await
            .unwrap_err();

        let empty = actual
            .downcast_ref::<MetadataError>()
            .map(|err| matches!(err, MetadataError::EmptyBody { .. }));
        assert_eq!(empty, Some(true));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_fast() {
        let config = MetadataConfig::default()
            .endpoint(Url::parse("http://127.0.0.1:9").unwrap())
            .connect_timeout_ms(200u64)
            .read_timeout_ms(500u64);
        let infra = NimbusMetadataInfra::new(config).unwrap();

        let actual = infra.fetch_token().await.unwrap_err();

        let transport = actual
            .downcast_ref::<MetadataError>()
            .map(|err| matches!(err, MetadataError::Transport { .. }));
        assert_eq!(transport, Some(true));
    }
}
