use thiserror::Error;

use crate::ServiceName;

/// Reason a client factory could not produce a client.
///
/// The accessor branches on this to decide how to report the region repair
/// it performs before giving up on an attempt. The aws-config backed factory
/// only reports [`BuildError::MissingRegion`]; `Construction` is for
/// factories whose client constructors can fail.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No region could be resolved for service {service}")]
    MissingRegion { service: ServiceName },

    #[error(transparent)]
    Construction(anyhow::Error),
}

impl BuildError {
    pub fn missing_region(service: &ServiceName) -> Self {
        Self::MissingRegion { service: service.clone() }
    }
}
