use thiserror::Error;

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("store error: {0}")]
    Store(#[from] purge_store::StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PurgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
