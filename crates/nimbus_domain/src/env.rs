use std::path::PathBuf;

use derive_setters::Setters;
use url::Url;

use crate::RetryConfig;

/// Default TTL requested for instance metadata session tokens (six hours).
pub const DEFAULT_METADATA_TOKEN_TTL_SECS: u64 = 21600;

/// Settings for the instance metadata endpoint used to discover the region.
#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into)]
pub struct MetadataConfig {
    /// Base URL of the metadata service.
    pub endpoint: Url,
    /// TTL requested for the session token, in seconds.
    pub token_ttl_secs: u64,
    pub connect_timeout_ms: u64,
    /// Timeout for a whole request, response body included.
    pub read_timeout_ms: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse("http://169.254.169.254").expect("static endpoint URL is valid"),
            token_ttl_secs: DEFAULT_METADATA_TOKEN_TTL_SECS,
            connect_timeout_ms: 1000,
            read_timeout_ms: 2000,
        }
    }
}

/// Represents the environment the accessor runs in.
#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into)]
pub struct Environment {
    /// Location of the optional `config.ini` holding explicit credentials.
    pub config_path: PathBuf,
    /// Configuration for the retry mechanism
    pub retry_config: RetryConfig,
    /// Instance metadata service settings
    pub metadata: MetadataConfig,
}
