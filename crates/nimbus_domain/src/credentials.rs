use crate::Region;

/// Explicit access keys read from the local configuration file.
///
/// Only constructed when both keys are present; the region is independent of
/// the keys and may be absent.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    access_key_id: String,
    secret_access_key: String,
    region: Option<Region>,
}

impl CredentialSet {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: Option<Region>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region,
        }
    }

    /// Builds a set only when both keys are present.
    pub fn from_parts(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        region: Option<String>,
    ) -> Option<Self> {
        let region = region
            .map(|region| region.trim().to_string())
            .filter(|region| !region.is_empty())
            .map(Region::from);
        Some(Self::new(access_key_id?, secret_access_key?, region))
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSet")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("region", &self.region)
            .finish()
    }
}
