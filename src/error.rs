use thiserror::Error;

/// Failure talking to the anime search API. Never retried.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("anime API responded with {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("anime API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("anime API returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure loading a bundled widget document. Recovered with a fallback page.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset source not available")]
    Unavailable,

    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("invalid asset path: {0}")]
    InvalidPath(String),

    #[error("failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
