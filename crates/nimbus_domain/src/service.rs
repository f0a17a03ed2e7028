use derive_more::Display;

/// Identifies the cloud service a client targets, e.g. `s3` or `sqs`.
///
/// Used as the cache key of the client accessor and handed to the client
/// factory unchanged.
#[derive(Clone, Debug, PartialEq, Hash, Eq, Display)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ServiceName {
    fn from(value: String) -> Self {
        ServiceName(value)
    }
}

impl From<&str> for ServiceName {
    fn from(value: &str) -> Self {
        ServiceName(value.to_string())
    }
}

impl From<&ServiceName> for ServiceName {
    fn from(value: &ServiceName) -> Self {
        value.clone()
    }
}

/// A region identifier such as `us-west-2`.
#[derive(Clone, Debug, PartialEq, Hash, Eq, Display)]
pub struct Region(String);

impl Region {
    pub fn new<T: Into<String>>(region: T) -> Self {
        Self(region.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Region {
    fn from(value: String) -> Self {
        Region(value)
    }
}

impl From<&str> for Region {
    fn from(value: &str) -> Self {
        Region(value.to_string())
    }
}

/// Records which branch of the credential fallback chain produced a client.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum CredentialSource {
    /// Explicit keys read from the local `config.ini`.
    #[display("config file")]
    ConfigFile,
    /// The SDK's ambient credential and region discovery.
    #[display("default chain")]
    DefaultChain,
    /// The default chain, with the region discovered from instance metadata.
    #[display("discovered region {_0}")]
    DiscoveredRegion(Region),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_service_name_display() {
        let fixture = ServiceName::from("s3");
        let actual = fixture.to_string();
        let expected = "s3".to_string();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_credential_source_display() {
        let fixture = [
            CredentialSource::ConfigFile,
            CredentialSource::DefaultChain,
            CredentialSource::DiscoveredRegion(Region::new("eu-west-1")),
        ];
        let actual: Vec<String> = fixture.iter().map(ToString::to_string).collect();
        let expected = vec![
            "config file".to_string(),
            "default chain".to_string(),
            "discovered region eu-west-1".to_string(),
        ];
        assert_eq!(actual, expected);
    }
}
