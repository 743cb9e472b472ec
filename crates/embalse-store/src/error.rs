//! Store error types.

/// Errors that can occur while talking to the content store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store endpoint or key is missing or malformed.
    #[error("store config error: {0}")]
    Config(String),

    /// The store answered with a non-success status.
    #[error("store API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the store.
        message: String,
    },

    /// An object with this name already exists in the bucket.
    #[error("object '{name}' already exists in bucket '{bucket}'")]
    ObjectExists { bucket: String, name: String },

    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Network or HTTP client error.
    #[error("store network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The store returned something that is not the expected JSON.
    #[error("store json error: {0}")]
    Json(#[from] serde_json::Error),
}
