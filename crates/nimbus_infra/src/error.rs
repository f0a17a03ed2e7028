use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Invalid instance metadata URL for {path}")]
    InvalidUrl {
        path: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Instance metadata request {method} {url} failed")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Instance metadata request {method} {url} returned status {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("Instance metadata request {method} {url} returned an empty body")]
    EmptyBody { method: &'static str, url: String },
}
